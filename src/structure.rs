use std::path::Path;

use crate::error::{WaterBoxError, WaterBoxResult};
use crate::io::psf::{read_psf, PsfAtom, PsfTopology};
use crate::io::xtc::{TrajectoryFrame, XtcReader};

/// A molecular topology plus the trajectory frames loaded into it. The
/// topology is fixed after parsing; frames are appended by
/// `load_trajectory` and trimmed by `drop_frames`.
#[derive(Clone, Debug)]
pub struct Structure {
    topology: PsfTopology,
    frames: Vec<TrajectoryFrame>,
}

impl Structure {
    pub fn from_psf(path: &Path) -> WaterBoxResult<Self> {
        Ok(Self::from_topology(read_psf(path)?))
    }

    pub fn from_topology(topology: PsfTopology) -> Self {
        Self {
            topology,
            frames: Vec::new(),
        }
    }

    pub fn n_atoms(&self) -> usize {
        self.topology.atoms.len()
    }

    pub fn atoms(&self) -> &[PsfAtom] {
        &self.topology.atoms
    }

    pub fn topology(&self) -> &PsfTopology {
        &self.topology
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Append every frame of an XTC file. The trajectory must describe the
    /// same atoms as the topology.
    pub fn load_trajectory(&mut self, path: &Path) -> WaterBoxResult<usize> {
        let mut reader = XtcReader::open(path)?;
        if reader.n_atoms() != self.n_atoms() {
            return Err(WaterBoxError::Mismatch(format!(
                "trajectory holds {} atoms, structure holds {}",
                reader.n_atoms(),
                self.n_atoms()
            )));
        }
        let mut frames = reader.read_all_frames()?;
        let added = frames.len();
        self.frames.append(&mut frames);
        Ok(added)
    }

    /// Discard every frame except the one at `keep`.
    pub fn drop_frames(&mut self, keep: usize) -> WaterBoxResult<()> {
        if keep >= self.frames.len() {
            return Err(WaterBoxError::Invalid(format!(
                "cannot keep frame {keep}, only {} frames loaded",
                self.frames.len()
            )));
        }
        let kept = self.frames.swap_remove(keep);
        self.frames.clear();
        self.frames.push(kept);
        Ok(())
    }

    /// The one retained frame. Coordinate extraction assumes a single-frame
    /// shape, so anything other than exactly one frame is an error.
    pub fn single_frame(&self) -> WaterBoxResult<&TrajectoryFrame> {
        match self.frames.as_slice() {
            [frame] => Ok(frame),
            frames => Err(WaterBoxError::Mismatch(format!(
                "expected exactly one retained frame, found {}",
                frames.len()
            ))),
        }
    }

    pub fn coords(&self) -> WaterBoxResult<&[[f64; 3]]> {
        Ok(&self.single_frame()?.coords)
    }

    pub fn box_lengths(&self) -> WaterBoxResult<[f64; 3]> {
        Ok(self.single_frame()?.box_lengths)
    }
}
