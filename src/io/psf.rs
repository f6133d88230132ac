use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{WaterBoxError, WaterBoxResult};

#[derive(Clone, Debug, PartialEq)]
pub struct PsfAtom {
    pub segid: String,
    pub resid: i32,
    pub resname: String,
    pub name: String,
    pub type_name: String,
    pub charge: f64,
    pub mass: f64,
}

/// Connectivity and type assignments from a CHARMM PSF file. Atom indices in
/// the bonded lists are 0-based; the file stores them 1-based.
#[derive(Clone, Debug, Default)]
pub struct PsfTopology {
    pub atoms: Vec<PsfAtom>,
    pub bonds: Vec<[usize; 2]>,
    pub angles: Vec<[usize; 3]>,
    pub dihedrals: Vec<[usize; 4]>,
    pub impropers: Vec<[usize; 4]>,
}

pub fn read_psf(path: &Path) -> WaterBoxResult<PsfTopology> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }

    let mut topology = PsfTopology::default();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        let flag_pos = match line.find('!') {
            Some(pos) => pos,
            None => {
                i += 1;
                continue;
            }
        };
        // Section headers look like "    2139 !NATOM"; anything else with a
        // '!' in it (title text, remarks) is not a header.
        let count: usize = match line[..flag_pos]
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
        {
            Some(count) => count,
            None => {
                i += 1;
                continue;
            }
        };
        let flag = &line[flag_pos..];
        if flag.starts_with("!NATOM") {
            i = parse_atoms(&lines, i + 1, count, &mut topology.atoms)?;
        } else if flag.starts_with("!NBOND") {
            let indices = parse_index_list(&lines, &mut i, count * 2, topology.atoms.len())?;
            topology.bonds = indices.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
        } else if flag.starts_with("!NTHETA") {
            let indices = parse_index_list(&lines, &mut i, count * 3, topology.atoms.len())?;
            topology.angles = indices
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect();
        } else if flag.starts_with("!NPHI") {
            let indices = parse_index_list(&lines, &mut i, count * 4, topology.atoms.len())?;
            topology.dihedrals = indices
                .chunks_exact(4)
                .map(|c| [c[0], c[1], c[2], c[3]])
                .collect();
        } else if flag.starts_with("!NIMPHI") {
            let indices = parse_index_list(&lines, &mut i, count * 4, topology.atoms.len())?;
            topology.impropers = indices
                .chunks_exact(4)
                .map(|c| [c[0], c[1], c[2], c[3]])
                .collect();
        } else {
            // NTITLE, NDON, NACC and friends carry nothing this crate reads.
            i += 1;
        }
    }

    if topology.atoms.is_empty() {
        return Err(WaterBoxError::Parse(
            "psf file has no !NATOM section".into(),
        ));
    }
    Ok(topology)
}

fn parse_atoms(
    lines: &[String],
    start: usize,
    count: usize,
    atoms: &mut Vec<PsfAtom>,
) -> WaterBoxResult<usize> {
    let mut i = start;
    while atoms.len() < count {
        let line = lines
            .get(i)
            .ok_or_else(|| WaterBoxError::Parse("psf atom section truncated".into()))?;
        i += 1;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() < 8 {
            return Err(WaterBoxError::Parse(format!("bad psf atom line '{line}'")));
        }
        let resid: i32 = parts[2]
            .parse()
            .map_err(|_| WaterBoxError::Parse(format!("bad psf resid in line '{line}'")))?;
        let charge: f64 = parts[6]
            .parse()
            .map_err(|_| WaterBoxError::Parse(format!("bad psf charge in line '{line}'")))?;
        let mass: f64 = parts[7]
            .parse()
            .map_err(|_| WaterBoxError::Parse(format!("bad psf mass in line '{line}'")))?;
        atoms.push(PsfAtom {
            segid: parts[1].to_string(),
            resid,
            resname: parts[3].to_string(),
            name: parts[4].to_string(),
            type_name: parts[5].to_string(),
            charge,
            mass,
        });
    }
    Ok(i)
}

fn parse_index_list(
    lines: &[String],
    i: &mut usize,
    n_indices: usize,
    n_atoms: usize,
) -> WaterBoxResult<Vec<usize>> {
    let mut indices = Vec::with_capacity(n_indices);
    *i += 1;
    while indices.len() < n_indices {
        let line = lines
            .get(*i)
            .ok_or_else(|| WaterBoxError::Parse("psf index section truncated".into()))?;
        *i += 1;
        for token in line.split_whitespace() {
            let idx: usize = token
                .parse()
                .map_err(|_| WaterBoxError::Parse(format!("bad psf index '{token}'")))?;
            if idx == 0 || idx > n_atoms {
                return Err(WaterBoxError::Parse(format!(
                    "psf index {idx} out of range for {n_atoms} atoms"
                )));
            }
            indices.push(idx - 1);
            if indices.len() == n_indices {
                break;
            }
        }
    }
    Ok(indices)
}
