pub mod prm;
pub mod psf;
pub mod xtc;

pub use prm::{read_parameter_files, CharmmParameterSet};
pub use psf::{read_psf, PsfAtom, PsfTopology};
pub use xtc::{TrajectoryFrame, XtcReader};
