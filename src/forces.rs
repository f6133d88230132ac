use crate::error::{WaterBoxError, WaterBoxResult};
use crate::parameters::Parameters;

/// Non-bonded evaluation settings bound to a parameter set. Holds no
/// per-step state; one instance serves any number of evaluations.
#[derive(Clone, Debug)]
pub struct Forces {
    par: Parameters,
    cutoff: f64,
    switch_dist: f64,
    rfa: bool,
}

impl Forces {
    pub fn new(par: Parameters, cutoff: f64, switch_dist: f64, rfa: bool) -> WaterBoxResult<Self> {
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(WaterBoxError::Invalid(format!(
                "cutoff {cutoff} must be a positive distance"
            )));
        }
        if !switch_dist.is_finite() || switch_dist <= 0.0 || switch_dist >= cutoff {
            return Err(WaterBoxError::Invalid(format!(
                "switching distance {switch_dist} must lie strictly below the cutoff {cutoff}"
            )));
        }
        Ok(Self {
            par,
            cutoff,
            switch_dist,
            rfa,
        })
    }

    pub fn par(&self) -> &Parameters {
        &self.par
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn switch_dist(&self) -> f64 {
        self.switch_dist
    }

    pub fn rfa(&self) -> bool {
        self.rfa
    }

    /// CHARMM vswitch attenuation: 1 below the switching distance, a smooth
    /// cubic in r^2 down to 0 at the cutoff, 0 beyond.
    pub fn switching_factor(&self, r: f64) -> f64 {
        if r <= self.switch_dist {
            return 1.0;
        }
        if r >= self.cutoff {
            return 0.0;
        }
        let r2 = r * r;
        let c2 = self.cutoff * self.cutoff;
        let s2 = self.switch_dist * self.switch_dist;
        let d = c2 - s2;
        (c2 - r2) * (c2 - r2) * (c2 + 2.0 * r2 - 3.0 * s2) / (d * d * d)
    }
}
