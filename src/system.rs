use crate::config::{Device, Precision};
use crate::error::{WaterBoxError, WaterBoxResult};

/// Batched per-replica simulation state: positions, box lengths, and
/// velocities, each replica an independent copy over the same atoms.
#[derive(Clone, Debug)]
pub struct System {
    n_atoms: usize,
    n_replicas: usize,
    precision: Precision,
    device: Device,
    positions: Vec<Vec<[f64; 3]>>,
    boxes: Vec<[f64; 3]>,
    velocities: Vec<Vec<[f64; 3]>>,
}

impl System {
    pub fn new(
        n_atoms: usize,
        n_replicas: usize,
        precision: Precision,
        device: Device,
    ) -> WaterBoxResult<Self> {
        if n_replicas == 0 {
            return Err(WaterBoxError::Invalid(
                "replica count must be at least 1".into(),
            ));
        }
        Ok(Self {
            n_atoms,
            n_replicas,
            precision,
            device,
            positions: vec![vec![[0.0; 3]; n_atoms]; n_replicas],
            boxes: vec![[0.0; 3]; n_replicas],
            velocities: vec![vec![[0.0; 3]; n_atoms]; n_replicas],
        })
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn n_replicas(&self) -> usize {
        self.n_replicas
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Broadcast one coordinate frame to every replica.
    pub fn set_positions(&mut self, coords: &[[f64; 3]]) -> WaterBoxResult<()> {
        if coords.len() != self.n_atoms {
            return Err(WaterBoxError::Mismatch(format!(
                "got {} coordinates for a system of {} atoms",
                coords.len(),
                self.n_atoms
            )));
        }
        let q = |v: f64| self.precision.quantize(v);
        for replica in &mut self.positions {
            for (dst, src) in replica.iter_mut().zip(coords) {
                *dst = [q(src[0]), q(src[1]), q(src[2])];
            }
        }
        Ok(())
    }

    pub fn set_box(&mut self, box_lengths: [f64; 3]) {
        let q = |v: f64| self.precision.quantize(v);
        let quantized = [q(box_lengths[0]), q(box_lengths[1]), q(box_lengths[2])];
        for replica in &mut self.boxes {
            *replica = quantized;
        }
    }

    /// Install one velocity set per replica.
    pub fn set_velocities(&mut self, velocities: Vec<Vec<[f64; 3]>>) -> WaterBoxResult<()> {
        if velocities.len() != self.n_replicas {
            return Err(WaterBoxError::Mismatch(format!(
                "got velocities for {} replicas, system holds {}",
                velocities.len(),
                self.n_replicas
            )));
        }
        for (replica, set) in velocities.iter().enumerate() {
            if set.len() != self.n_atoms {
                return Err(WaterBoxError::Mismatch(format!(
                    "replica {replica} velocity set holds {} atoms, system holds {}",
                    set.len(),
                    self.n_atoms
                )));
            }
        }
        let q = |v: f64| self.precision.quantize(v);
        self.velocities = velocities
            .into_iter()
            .map(|set| {
                set.into_iter()
                    .map(|v| [q(v[0]), q(v[1]), q(v[2])])
                    .collect()
            })
            .collect();
        Ok(())
    }

    pub fn positions(&self) -> &[Vec<[f64; 3]>] {
        &self.positions
    }

    pub fn boxes(&self) -> &[[f64; 3]] {
        &self.boxes
    }

    pub fn velocities(&self) -> &[Vec<[f64; 3]>] {
        &self.velocities
    }
}
