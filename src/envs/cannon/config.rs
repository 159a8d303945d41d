use {
    anyhow::Result,
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    serde::{
        Deserialize,
        Serialize,
    },
};

/// The configuration struct for the [`CannonEnv`](super::cannon_env::CannonEnv)
/// environment.
///
/// # Fields
/// * `max_speed` - The magnitude bound on the launch speed; the declared
///   action domain is `[-max_speed, max_speed]`.
/// * `min_target` / `max_target` - The range the target distance is drawn
///   from on each reset.
/// * `timelimit` - The maximum number of shots per episode.
/// * `seed` - The seed for the random number generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannonConfig {
    pub max_speed: f64,
    pub min_target: f64,
    pub max_target: f64,
    pub timelimit: usize,
    pub seed: u64,
}
impl Default for CannonConfig {
    fn default() -> Self {
        Self {
            max_speed: 100.0,
            min_target: 500.0,
            max_target: 1000.0,
            timelimit: 1,
            seed: StdRng::from_entropy().gen::<u64>(),
        }
    }
}
impl CannonConfig {
    pub fn new(
        max_speed: f64,
        min_target: f64,
        max_target: f64,
        timelimit: usize,
        seed: u64,
    ) -> Self {
        Self {
            max_speed,
            min_target,
            max_target,
            timelimit,
            seed,
        }
    }

    pub fn check(&self) -> Result<()> {
        if !(self.max_speed > 0.0) {
            return Err(anyhow::anyhow!("Max speed must be positive"));
        }

        if !(0.0 < self.min_target && self.min_target < self.max_target) {
            return Err(anyhow::anyhow!(
                "Target range must satisfy 0 < min_target < max_target"
            ));
        }

        if self.timelimit == 0 {
            return Err(anyhow::anyhow!("Timelimit must be at least 1"));
        }

        Ok(())
    }
}
