#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use xdrfile::{FileMode, Frame, Trajectory, XTCTrajectory};

use waterbox::{FixtureLayout, WaterBoxConfig};

/// Box side of the synthetic water box, nm.
pub const BOX_NM: f32 = 1.8856;

pub const TIP3P_PRM: &str = "\
* synthetic TIP3P parameter set
*

ATOMS
MASS  -1  HT    1.00800
MASS  -1  OT   15.99940

BONDS
OT   HT    450.000     0.9572
HT   HT      0.000     1.5139

ANGLES
HT   OT   HT     55.000   104.5200

DIHEDRALS

NONBONDED nbxmod  5 atom cdiel shift vatom vdistance vswitch -
cutnb 14.0 ctofnb 12.0 ctonnb 10.0 eps 1.0 e14fac 1.0 wmin 1.5
HT     0.000000  -0.046000     0.224500
OT     0.000000  -0.152100     1.768200

END
";

pub fn write_text(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write temp file");
}

pub fn water_psf(n_waters: usize) -> String {
    let mut s = String::new();
    s.push_str("PSF\n\n       1 !NTITLE\n REMARKS synthetic water box\n\n");
    s.push_str(&format!("{:8} !NATOM\n", n_waters * 3));
    for w in 0..n_waters {
        let resid = w + 1;
        let base = w * 3;
        s.push_str(&format!(
            "{:8} WAT  {:<4} TIP3 OH2  OT    -0.834000       15.9994           0\n",
            base + 1,
            resid
        ));
        s.push_str(&format!(
            "{:8} WAT  {:<4} TIP3 H1   HT     0.417000        1.0080           0\n",
            base + 2,
            resid
        ));
        s.push_str(&format!(
            "{:8} WAT  {:<4} TIP3 H2   HT     0.417000        1.0080           0\n",
            base + 3,
            resid
        ));
    }
    s.push('\n');
    s.push_str(&format!("{:8} !NBOND: bonds\n", n_waters * 3));
    let mut pairs = Vec::new();
    for w in 0..n_waters {
        let o = w * 3 + 1;
        pairs.push((o, o + 1));
        pairs.push((o, o + 2));
        pairs.push((o + 1, o + 2));
    }
    for chunk in pairs.chunks(4) {
        for (a, b) in chunk {
            s.push_str(&format!("{a:8}{b:8}"));
        }
        s.push('\n');
    }
    s.push('\n');
    s.push_str(&format!("{:8} !NTHETA: angles\n", n_waters));
    let triples: Vec<usize> = (0..n_waters).collect();
    for chunk in triples.chunks(3) {
        for w in chunk {
            let o = w * 3 + 1;
            s.push_str(&format!("{:8}{:8}{:8}", o + 1, o, o + 2));
        }
        s.push('\n');
    }
    s.push('\n');
    s.push_str("       0 !NPHI: dihedrals\n\n       0 !NIMPHI: impropers\n\n");
    s
}

/// Coordinates for a grid of rigid waters, in nm. `offset` shifts every atom
/// so distinct frames can be told apart.
pub fn water_coords_nm(n_waters: usize, offset: f32) -> Vec<[f32; 3]> {
    let mut coords = Vec::with_capacity(n_waters * 3);
    for w in 0..n_waters {
        let x = 0.31 * (w % 6) as f32 + offset;
        let y = 0.31 * ((w / 6) % 6) as f32 + offset;
        let z = 0.31 * (w / 36) as f32 + offset;
        coords.push([x, y, z]);
        coords.push([x + 0.09572, y, z]);
        coords.push([x - 0.02399, y + 0.09268, z]);
    }
    coords
}

pub fn write_xtc(path: &Path, frames: &[Vec<[f32; 3]>], box_nm: f32) {
    let box_vector = [
        [box_nm, 0.0, 0.0],
        [0.0, box_nm, 0.0],
        [0.0, 0.0, box_nm],
    ];
    write_xtc_with_box(path, frames, box_vector);
}

pub fn write_xtc_with_box(path: &Path, frames: &[Vec<[f32; 3]>], box_vector: [[f32; 3]; 3]) {
    let n_atoms = frames[0].len();
    let mut traj = XTCTrajectory::open(path, FileMode::Write).expect("open xtc for write");
    for (fi, coords) in frames.iter().enumerate() {
        let mut frame = Frame::with_len(n_atoms);
        frame.step = fi;
        frame.time = fi as f32;
        frame.box_vector = box_vector;
        frame.coords.copy_from_slice(coords);
        traj.write(&frame).expect("write xtc frame");
    }
    traj.flush().expect("flush xtc");
}

/// Write a complete fixture data set (PSF, XTC, PRM) into a fresh temp
/// directory and return it with a seeded config pointing at it.
pub fn fixture_dir(n_waters: usize, n_frames: usize) -> (TempDir, WaterBoxConfig) {
    let dir = TempDir::new().expect("create temp dir");
    write_text(&dir.path().join("structure.psf"), &water_psf(n_waters));
    write_text(&dir.path().join("parameters.prm"), TIP3P_PRM);
    let frames: Vec<Vec<[f32; 3]>> = (0..n_frames)
        .map(|fi| water_coords_nm(n_waters, 0.01 * fi as f32))
        .collect();
    write_xtc(&dir.path().join("output.xtc"), &frames, BOX_NM);
    let mut config = WaterBoxConfig::new(FixtureLayout::from_dir(dir.path()));
    config.seed = Some(1234);
    (dir, config)
}
