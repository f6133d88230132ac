use crate::error::{WaterBoxError, WaterBoxResult};
use crate::io::prm::{
    AngleParam, BondParam, CharmmParameterSet, DihedralTerm, ImproperParam, LjParam,
};
use crate::structure::Structure;

#[derive(Clone, Debug)]
pub struct FfAtom {
    pub type_name: String,
    pub charge: f64,
    pub mass: f64,
    pub lj: LjParam,
}

#[derive(Clone, Debug)]
pub struct BondTerm {
    pub atoms: [usize; 2],
    pub param: BondParam,
}

#[derive(Clone, Debug)]
pub struct AngleTerm {
    pub atoms: [usize; 3],
    pub param: AngleParam,
}

#[derive(Clone, Debug)]
pub struct DihedralTermSet {
    pub atoms: [usize; 4],
    pub terms: Vec<DihedralTerm>,
}

#[derive(Clone, Debug)]
pub struct ImproperTerm {
    pub atoms: [usize; 4],
    pub param: ImproperParam,
}

/// The structure's type assignments resolved against a parameter set:
/// per-atom physical properties plus fully materialized bonded terms.
/// Immutable once created.
#[derive(Clone, Debug)]
pub struct ForceField {
    pub atoms: Vec<FfAtom>,
    pub bonds: Vec<BondTerm>,
    pub angles: Vec<AngleTerm>,
    pub dihedrals: Vec<DihedralTermSet>,
    pub impropers: Vec<ImproperTerm>,
}

impl ForceField {
    pub fn create(mol: &Structure, prm: &CharmmParameterSet) -> WaterBoxResult<Self> {
        let mut atoms = Vec::with_capacity(mol.n_atoms());
        for atom in mol.atoms() {
            let lj = prm.lj(&atom.type_name).ok_or_else(|| {
                WaterBoxError::Mismatch(format!(
                    "atom type {} has no nonbonded parameters",
                    atom.type_name
                ))
            })?;
            // The parameter set's ATOMS masses win over the PSF column when
            // present, matching how the structure file is re-typed.
            let mass = prm.mass(&atom.type_name).unwrap_or(atom.mass);
            atoms.push(FfAtom {
                type_name: atom.type_name.clone(),
                charge: atom.charge,
                mass,
                lj,
            });
        }

        let type_of = |i: usize| mol.atoms()[i].type_name.as_str();

        let mut bonds = Vec::with_capacity(mol.topology().bonds.len());
        for &[a, b] in &mol.topology().bonds {
            let param = prm.bond(type_of(a), type_of(b)).ok_or_else(|| {
                WaterBoxError::Mismatch(format!(
                    "no bond parameters for types {}-{}",
                    type_of(a),
                    type_of(b)
                ))
            })?;
            bonds.push(BondTerm {
                atoms: [a, b],
                param,
            });
        }

        let mut angles = Vec::with_capacity(mol.topology().angles.len());
        for &[a, b, c] in &mol.topology().angles {
            let param = prm
                .angle(type_of(a), type_of(b), type_of(c))
                .ok_or_else(|| {
                    WaterBoxError::Mismatch(format!(
                        "no angle parameters for types {}-{}-{}",
                        type_of(a),
                        type_of(b),
                        type_of(c)
                    ))
                })?;
            angles.push(AngleTerm {
                atoms: [a, b, c],
                param,
            });
        }

        let mut dihedrals = Vec::with_capacity(mol.topology().dihedrals.len());
        for &[a, b, c, d] in &mol.topology().dihedrals {
            let terms = prm
                .dihedral(type_of(a), type_of(b), type_of(c), type_of(d))
                .ok_or_else(|| {
                    WaterBoxError::Mismatch(format!(
                        "no dihedral parameters for types {}-{}-{}-{}",
                        type_of(a),
                        type_of(b),
                        type_of(c),
                        type_of(d)
                    ))
                })?;
            dihedrals.push(DihedralTermSet {
                atoms: [a, b, c, d],
                terms: terms.to_vec(),
            });
        }

        let mut impropers = Vec::with_capacity(mol.topology().impropers.len());
        for &[a, b, c, d] in &mol.topology().impropers {
            let param = prm
                .improper(type_of(a), type_of(b), type_of(c), type_of(d))
                .ok_or_else(|| {
                    WaterBoxError::Mismatch(format!(
                        "no improper parameters for types {}-{}-{}-{}",
                        type_of(a),
                        type_of(b),
                        type_of(c),
                        type_of(d)
                    ))
                })?;
            impropers.push(ImproperTerm {
                atoms: [a, b, c, d],
                param,
            });
        }

        Ok(Self {
            atoms,
            bonds,
            angles,
            dihedrals,
            impropers,
        })
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn masses(&self) -> Vec<f64> {
        self.atoms.iter().map(|a| a.mass).collect()
    }

    pub fn charges(&self) -> Vec<f64> {
        self.atoms.iter().map(|a| a.charge).collect()
    }
}
