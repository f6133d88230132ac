use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::WaterBoxConfig;
use crate::error::WaterBoxResult;
use crate::forcefield::ForceField;
use crate::forces::Forces;
use crate::io::prm::{read_parameter_files, CharmmParameterSet};
use crate::parameters::Parameters;
use crate::structure::Structure;
use crate::system::System;
use crate::velocities::maxwell_boltzmann;

pub const CUTOFF: f64 = 9.0;
pub const SWITCH_DIST: f64 = 7.5;
pub const USE_REACTION_FIELD: bool = true;

/// Initial velocities are always seeded at this fixed temperature, even when
/// the config requests a different thermostat target.
pub const VELOCITY_SEED_TEMPERATURE: f64 = 300.0;

/// A ready-to-simulate water box: loaded structure, resolved force field,
/// configured forces, and a populated batched state.
pub struct WaterBox {
    pub mol: Structure,
    pub ff: ForceField,
    pub prm: CharmmParameterSet,
    /// Second parse of the same parameter files, held untouched alongside
    /// the working set.
    pub prm_org: CharmmParameterSet,
    pub forces: Forces,
    pub system: System,
}

impl WaterBox {
    /// One linear pipeline: load structure and frame, build force machinery,
    /// assemble and populate the state. Any failure propagates unchanged.
    pub fn build(config: &WaterBoxConfig) -> WaterBoxResult<Self> {
        config.validate()?;

        let mut mol = Structure::from_psf(&config.layout.structure_path())?;
        mol.load_trajectory(&config.layout.trajectory_path())?;
        mol.drop_frames(0)?;

        let prm_paths = config.layout.parameter_paths();
        let prm = read_parameter_files(&prm_paths)?;
        let prm_org = read_parameter_files(&prm_paths)?;
        let ff = ForceField::create(&mol, &prm)?;
        let parameters = Parameters::new(&ff, &mol, config.precision, config.device)?;
        let forces = Forces::new(parameters, CUTOFF, SWITCH_DIST, USE_REACTION_FIELD)?;

        let mut system = System::new(
            mol.n_atoms(),
            config.n_replicas,
            config.precision,
            config.device,
        )?;
        system.set_positions(mol.coords()?)?;
        system.set_box(mol.box_lengths()?);

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let velocities = maxwell_boltzmann(
            forces.par().masses(),
            VELOCITY_SEED_TEMPERATURE,
            config.n_replicas,
            &mut rng,
        )?;
        system.set_velocities(velocities)?;

        Ok(Self {
            mol,
            ff,
            prm,
            prm_org,
            forces,
            system,
        })
    }
}
