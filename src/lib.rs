#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod forcefield;
pub mod forces;
pub mod io;
pub mod parameters;
pub mod structure;
pub mod system;
pub mod velocities;
pub mod waterbox;

pub use config::{Device, FixtureLayout, Precision, WaterBoxConfig};
pub use error::{WaterBoxError, WaterBoxResult};
pub use forcefield::ForceField;
pub use forces::Forces;
pub use io::prm::CharmmParameterSet;
pub use io::psf::{PsfAtom, PsfTopology};
pub use io::xtc::{TrajectoryFrame, XtcReader};
pub use parameters::Parameters;
pub use structure::Structure;
pub use system::System;
pub use velocities::{instantaneous_temperature, kinetic_energy, maxwell_boltzmann, BOLTZMANN};
pub use waterbox::WaterBox;
