use crate::config::{Device, Precision};
use crate::error::{WaterBoxError, WaterBoxResult};
use crate::forcefield::ForceField;
use crate::structure::Structure;

/// Flat numeric materialization of a force field, quantized to the requested
/// storage precision and tagged with the compute device. Immutable once
/// created; the mass vector feeds velocity sampling downstream.
#[derive(Clone, Debug)]
pub struct Parameters {
    masses: Vec<f64>,
    charges: Vec<f64>,
    lj_epsilon: Vec<f64>,
    lj_sigma: Vec<f64>,
    bond_atoms: Vec<[usize; 2]>,
    bond_coeffs: Vec<[f64; 2]>,
    angle_atoms: Vec<[usize; 3]>,
    angle_coeffs: Vec<[f64; 2]>,
    dihedral_atoms: Vec<[usize; 4]>,
    dihedral_coeffs: Vec<[f64; 3]>,
    precision: Precision,
    device: Device,
}

// rmin = 2^(1/6) * sigma
const RMIN_OVER_SIGMA: f64 = 1.122_462_048_309_373;

impl Parameters {
    pub fn new(
        ff: &ForceField,
        mol: &Structure,
        precision: Precision,
        device: Device,
    ) -> WaterBoxResult<Self> {
        if ff.n_atoms() != mol.n_atoms() {
            return Err(WaterBoxError::Mismatch(format!(
                "force field describes {} atoms, structure holds {}",
                ff.n_atoms(),
                mol.n_atoms()
            )));
        }
        let q = |v: f64| precision.quantize(v);

        let masses = ff.atoms.iter().map(|a| q(a.mass)).collect();
        let charges = ff.atoms.iter().map(|a| q(a.charge)).collect();
        let lj_epsilon = ff.atoms.iter().map(|a| q(a.lj.epsilon)).collect();
        let lj_sigma = ff
            .atoms
            .iter()
            .map(|a| q(2.0 * a.lj.rmin_half / RMIN_OVER_SIGMA))
            .collect();

        let bond_atoms = ff.bonds.iter().map(|b| b.atoms).collect();
        let bond_coeffs = ff
            .bonds
            .iter()
            .map(|b| [q(b.param.k), q(b.param.r0)])
            .collect();
        let angle_atoms = ff.angles.iter().map(|a| a.atoms).collect();
        let angle_coeffs = ff
            .angles
            .iter()
            .map(|a| [q(a.param.k), q(a.param.theta0)])
            .collect();

        let mut dihedral_atoms = Vec::new();
        let mut dihedral_coeffs = Vec::new();
        for set in &ff.dihedrals {
            for term in &set.terms {
                dihedral_atoms.push(set.atoms);
                dihedral_coeffs.push([q(term.k), term.periodicity as f64, q(term.phase)]);
            }
        }

        Ok(Self {
            masses,
            charges,
            lj_epsilon,
            lj_sigma,
            bond_atoms,
            bond_coeffs,
            angle_atoms,
            angle_coeffs,
            dihedral_atoms,
            dihedral_coeffs,
            precision,
            device,
        })
    }

    pub fn n_atoms(&self) -> usize {
        self.masses.len()
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn charges(&self) -> &[f64] {
        &self.charges
    }

    pub fn lj_epsilon(&self) -> &[f64] {
        &self.lj_epsilon
    }

    pub fn lj_sigma(&self) -> &[f64] {
        &self.lj_sigma
    }

    pub fn bonds(&self) -> (&[[usize; 2]], &[[f64; 2]]) {
        (&self.bond_atoms, &self.bond_coeffs)
    }

    pub fn angles(&self) -> (&[[usize; 3]], &[[f64; 2]]) {
        (&self.angle_atoms, &self.angle_coeffs)
    }

    pub fn dihedrals(&self) -> (&[[usize; 4]], &[[f64; 3]]) {
        (&self.dihedral_atoms, &self.dihedral_coeffs)
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn device(&self) -> Device {
        self.device
    }
}
