use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{WaterBoxError, WaterBoxResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BondParam {
    pub k: f64,
    pub r0: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleParam {
    pub k: f64,
    pub theta0: f64,
    /// Urey-Bradley 1-3 term (k, s0) when the parameter file carries one.
    pub urey_bradley: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DihedralTerm {
    pub k: f64,
    pub periodicity: i32,
    pub phase: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImproperParam {
    pub k: f64,
    pub psi0: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LjParam {
    pub epsilon: f64,
    pub rmin_half: f64,
    pub epsilon_14: Option<f64>,
    pub rmin_half_14: Option<f64>,
}

/// Force-field coefficients keyed by CHARMM atom-type names. Symmetric keys
/// (bond reversal, angle reversal) are resolved at lookup time, as are `X`
/// wildcards in dihedral and improper types.
#[derive(Clone, Debug, Default)]
pub struct CharmmParameterSet {
    pub masses: HashMap<String, f64>,
    pub bonds: HashMap<(String, String), BondParam>,
    pub angles: HashMap<(String, String, String), AngleParam>,
    pub dihedrals: HashMap<(String, String, String, String), Vec<DihedralTerm>>,
    pub impropers: HashMap<(String, String, String, String), ImproperParam>,
    pub nonbonded: HashMap<String, LjParam>,
}

impl CharmmParameterSet {
    pub fn mass(&self, type_name: &str) -> Option<f64> {
        self.masses.get(type_name).copied()
    }

    pub fn lj(&self, type_name: &str) -> Option<LjParam> {
        self.nonbonded.get(type_name).copied()
    }

    pub fn bond(&self, a: &str, b: &str) -> Option<BondParam> {
        self.bonds
            .get(&(a.to_string(), b.to_string()))
            .or_else(|| self.bonds.get(&(b.to_string(), a.to_string())))
            .copied()
    }

    pub fn angle(&self, a: &str, b: &str, c: &str) -> Option<AngleParam> {
        self.angles
            .get(&(a.to_string(), b.to_string(), c.to_string()))
            .or_else(|| self.angles.get(&(c.to_string(), b.to_string(), a.to_string())))
            .copied()
    }

    pub fn dihedral(&self, a: &str, b: &str, c: &str, d: &str) -> Option<&[DihedralTerm]> {
        let keys = [
            (a.to_string(), b.to_string(), c.to_string(), d.to_string()),
            (d.to_string(), c.to_string(), b.to_string(), a.to_string()),
            ("X".to_string(), b.to_string(), c.to_string(), "X".to_string()),
            ("X".to_string(), c.to_string(), b.to_string(), "X".to_string()),
        ];
        keys.iter()
            .find_map(|key| self.dihedrals.get(key))
            .map(|terms| terms.as_slice())
    }

    pub fn improper(&self, a: &str, b: &str, c: &str, d: &str) -> Option<ImproperParam> {
        let keys = [
            (a.to_string(), b.to_string(), c.to_string(), d.to_string()),
            (d.to_string(), c.to_string(), b.to_string(), a.to_string()),
            (a.to_string(), "X".to_string(), "X".to_string(), d.to_string()),
            (d.to_string(), "X".to_string(), "X".to_string(), a.to_string()),
        ];
        keys.iter()
            .find_map(|key| self.impropers.get(key))
            .copied()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Atoms,
    Bonds,
    Angles,
    Dihedrals,
    Impropers,
    Nonbonded,
    Skipped,
}

/// Parse one or more CHARMM parameter files into a single set. Later files
/// override earlier ones for identical keys.
pub fn read_parameter_files(paths: &[PathBuf]) -> WaterBoxResult<CharmmParameterSet> {
    let mut set = CharmmParameterSet::default();
    for path in paths {
        read_into(path, &mut set)?;
    }
    Ok(set)
}

fn read_into(path: &Path, set: &mut CharmmParameterSet) -> WaterBoxResult<()> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut section = Section::None;
    let mut continued = false;
    for line in reader.lines() {
        let line = line?;
        let line = match line.find('!') {
            Some(pos) => &line[..pos],
            None => &line[..],
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }
        if continued {
            // Tail of a section header whose options spilled onto this line.
            continued = trimmed.ends_with('-');
            continue;
        }
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let keyword = parts[0].to_ascii_uppercase();
        match keyword.as_str() {
            "ATOMS" => {
                section = Section::Atoms;
                continue;
            }
            "BONDS" => {
                section = Section::Bonds;
                continue;
            }
            "ANGLES" | "THETAS" => {
                section = Section::Angles;
                continue;
            }
            "DIHEDRALS" | "PHI" => {
                section = Section::Dihedrals;
                continue;
            }
            "IMPROPER" | "IMPROPERS" | "IMPHI" => {
                section = Section::Impropers;
                continue;
            }
            "NONBONDED" => {
                section = Section::Nonbonded;
                continued = trimmed.ends_with('-');
                continue;
            }
            "NBFIX" | "CMAP" | "HBOND" => {
                section = Section::Skipped;
                continue;
            }
            "END" | "RETURN" => {
                section = Section::None;
                continue;
            }
            "MASS" => {
                parse_mass(&parts, set)?;
                continue;
            }
            _ => {}
        }
        match section {
            Section::Atoms => {
                // Non-MASS lines in the ATOMS section carry nothing we use.
            }
            Section::Bonds => parse_bond(&parts, set)?,
            Section::Angles => parse_angle(&parts, set)?,
            Section::Dihedrals => parse_dihedral(&parts, set)?,
            Section::Impropers => parse_improper(&parts, set)?,
            Section::Nonbonded => parse_nonbonded(&parts, set),
            Section::None | Section::Skipped => {}
        }
    }
    Ok(())
}

fn parse_float(token: &str) -> WaterBoxResult<f64> {
    token
        .parse()
        .map_err(|_| WaterBoxError::Parse(format!("bad parameter value '{token}'")))
}

fn parse_mass(parts: &[&str], set: &mut CharmmParameterSet) -> WaterBoxResult<()> {
    if parts.len() < 4 {
        return Err(WaterBoxError::Parse(format!(
            "bad MASS line '{}'",
            parts.join(" ")
        )));
    }
    let mass = parse_float(parts[3])?;
    set.masses.insert(parts[2].to_string(), mass);
    Ok(())
}

fn parse_bond(parts: &[&str], set: &mut CharmmParameterSet) -> WaterBoxResult<()> {
    if parts.len() < 4 {
        return Err(WaterBoxError::Parse(format!(
            "bad bond parameter line '{}'",
            parts.join(" ")
        )));
    }
    let param = BondParam {
        k: parse_float(parts[2])?,
        r0: parse_float(parts[3])?,
    };
    set.bonds
        .insert((parts[0].to_string(), parts[1].to_string()), param);
    Ok(())
}

fn parse_angle(parts: &[&str], set: &mut CharmmParameterSet) -> WaterBoxResult<()> {
    if parts.len() < 5 {
        return Err(WaterBoxError::Parse(format!(
            "bad angle parameter line '{}'",
            parts.join(" ")
        )));
    }
    let urey_bradley = if parts.len() >= 7 {
        Some((parse_float(parts[5])?, parse_float(parts[6])?))
    } else {
        None
    };
    let param = AngleParam {
        k: parse_float(parts[3])?,
        theta0: parse_float(parts[4])?,
        urey_bradley,
    };
    set.angles.insert(
        (
            parts[0].to_string(),
            parts[1].to_string(),
            parts[2].to_string(),
        ),
        param,
    );
    Ok(())
}

fn parse_dihedral(parts: &[&str], set: &mut CharmmParameterSet) -> WaterBoxResult<()> {
    if parts.len() < 7 {
        return Err(WaterBoxError::Parse(format!(
            "bad dihedral parameter line '{}'",
            parts.join(" ")
        )));
    }
    let term = DihedralTerm {
        k: parse_float(parts[4])?,
        periodicity: parts[5]
            .parse()
            .map_err(|_| WaterBoxError::Parse(format!("bad dihedral periodicity '{}'", parts[5])))?,
        phase: parse_float(parts[6])?,
    };
    let key = (
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2].to_string(),
        parts[3].to_string(),
    );
    set.dihedrals.entry(key).or_default().push(term);
    Ok(())
}

fn parse_improper(parts: &[&str], set: &mut CharmmParameterSet) -> WaterBoxResult<()> {
    if parts.len() < 7 {
        return Err(WaterBoxError::Parse(format!(
            "bad improper parameter line '{}'",
            parts.join(" ")
        )));
    }
    let param = ImproperParam {
        k: parse_float(parts[4])?,
        psi0: parse_float(parts[6])?,
    };
    set.impropers.insert(
        (
            parts[0].to_string(),
            parts[1].to_string(),
            parts[2].to_string(),
            parts[3].to_string(),
        ),
        param,
    );
    Ok(())
}

fn parse_nonbonded(parts: &[&str], set: &mut CharmmParameterSet) {
    // The NONBONDED section mixes option lines (cutnb, eps, ...) with
    // per-type data lines; only lines shaped like data are taken.
    if parts.len() < 4 {
        return;
    }
    let values: Option<Vec<f64>> = parts[1..4].iter().map(|t| t.parse().ok()).collect();
    let values = match values {
        Some(values) => values,
        None => return,
    };
    let (epsilon_14, rmin_half_14) = if parts.len() >= 7 {
        match (parts[5].parse::<f64>(), parts[6].parse::<f64>()) {
            (Ok(e14), Ok(r14)) => (Some(-e14), Some(r14)),
            _ => (None, None),
        }
    } else {
        (None, None)
    };
    set.nonbonded.insert(
        parts[0].to_string(),
        LjParam {
            epsilon: -values[1],
            rmin_half: values[2],
            epsilon_14,
            rmin_half_14,
        },
    );
}
