use rand::Rng;

use crate::error::{WaterBoxError, WaterBoxResult};

/// Boltzmann constant in kcal/(mol K), the unit system the parameter files
/// use for energies.
pub const BOLTZMANN: f64 = 0.001987191;

fn gaussian_pair(rng: &mut impl Rng) -> (f64, f64) {
    // Box-Muller transform.
    let mut u1: f64 = rng.gen();
    if u1 <= 0.0 {
        u1 = 1e-12;
    }
    let u2: f64 = rng.gen();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = std::f64::consts::TAU * u2;
    (r * theta.cos(), r * theta.sin())
}

/// Draw per-atom velocities from the Maxwell-Boltzmann distribution at the
/// given temperature, independently for each replica. Each velocity component
/// is N(0, sqrt(kB T / m)).
pub fn maxwell_boltzmann(
    masses: &[f64],
    temperature: f64,
    n_replicas: usize,
    rng: &mut impl Rng,
) -> WaterBoxResult<Vec<Vec<[f64; 3]>>> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(WaterBoxError::Invalid(format!(
            "cannot sample velocities at temperature {temperature} K"
        )));
    }
    if n_replicas == 0 {
        return Err(WaterBoxError::Invalid(
            "replica count must be at least 1".into(),
        ));
    }
    for (i, &mass) in masses.iter().enumerate() {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(WaterBoxError::Invalid(format!(
                "atom {i} has non-positive mass {mass}"
            )));
        }
    }

    let mut replicas = Vec::with_capacity(n_replicas);
    for _ in 0..n_replicas {
        let mut velocities = Vec::with_capacity(masses.len());
        for &mass in masses {
            let std = (BOLTZMANN * temperature / mass).sqrt();
            let (g0, g1) = gaussian_pair(rng);
            let (g2, _) = gaussian_pair(rng);
            velocities.push([std * g0, std * g1, std * g2]);
        }
        replicas.push(velocities);
    }
    Ok(replicas)
}

pub fn kinetic_energy(masses: &[f64], velocities: &[[f64; 3]]) -> f64 {
    masses
        .iter()
        .zip(velocities)
        .map(|(m, v)| 0.5 * m * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]))
        .sum()
}

/// Temperature implied by a velocity set: 2 KE / (3 N kB).
pub fn instantaneous_temperature(masses: &[f64], velocities: &[[f64; 3]]) -> f64 {
    if masses.is_empty() {
        return 0.0;
    }
    2.0 * kinetic_energy(masses, velocities) / (3.0 * masses.len() as f64 * BOLTZMANN)
}
