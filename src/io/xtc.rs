use std::path::PathBuf;

use xdrfile::{Frame, Trajectory, XTCTrajectory};

use crate::error::{WaterBoxError, WaterBoxResult};

const NM_TO_ANGSTROM: f64 = 10.0;

/// One decoded trajectory snapshot, coordinates and box lengths in Angstrom.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryFrame {
    pub coords: Vec<[f64; 3]>,
    pub box_lengths: [f64; 3],
    pub time_ps: f64,
}

pub struct XtcReader {
    traj: XTCTrajectory,
    n_atoms: usize,
    frame: Frame,
    _path: PathBuf,
}

impl XtcReader {
    pub fn open(path: impl Into<PathBuf>) -> WaterBoxResult<Self> {
        let path = path.into();
        let mut traj = XTCTrajectory::open_read(&path).map_err(map_xtc_err)?;
        let n_atoms = traj.get_num_atoms().map_err(map_xtc_err)?;
        let frame = Frame::with_len(n_atoms);
        Ok(Self {
            traj,
            n_atoms,
            frame,
            _path: path,
        })
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn read_next(&mut self) -> WaterBoxResult<Option<TrajectoryFrame>> {
        match self.traj.read(&mut self.frame) {
            Ok(()) => {
                let coords = self
                    .frame
                    .coords
                    .iter()
                    .map(|src| {
                        [
                            src[0] as f64 * NM_TO_ANGSTROM,
                            src[1] as f64 * NM_TO_ANGSTROM,
                            src[2] as f64 * NM_TO_ANGSTROM,
                        ]
                    })
                    .collect();
                Ok(Some(TrajectoryFrame {
                    coords,
                    box_lengths: orthorhombic_box(self.frame.box_vector)?,
                    time_ps: self.frame.time as f64,
                }))
            }
            Err(err) if err.is_eof() => Ok(None),
            Err(err) => Err(map_xtc_err(err)),
        }
    }

    pub fn read_all_frames(&mut self) -> WaterBoxResult<Vec<TrajectoryFrame>> {
        let mut frames = Vec::new();
        while let Some(frame) = self.read_next()? {
            frames.push(frame);
        }
        Ok(frames)
    }
}

fn orthorhombic_box(box_vec: [[f32; 3]; 3]) -> WaterBoxResult<[f64; 3]> {
    let tol = 1e-5;
    let is_orth = box_vec[0][1].abs() < tol
        && box_vec[0][2].abs() < tol
        && box_vec[1][0].abs() < tol
        && box_vec[1][2].abs() < tol
        && box_vec[2][0].abs() < tol
        && box_vec[2][1].abs() < tol;
    if !is_orth {
        return Err(WaterBoxError::Unsupported(
            "trajectory box is not orthorhombic".into(),
        ));
    }
    Ok([
        box_vec[0][0] as f64 * NM_TO_ANGSTROM,
        box_vec[1][1] as f64 * NM_TO_ANGSTROM,
        box_vec[2][2] as f64 * NM_TO_ANGSTROM,
    ])
}

fn map_xtc_err(err: xdrfile::Error) -> WaterBoxError {
    WaterBoxError::Parse(format!("xtc error: {err}"))
}
