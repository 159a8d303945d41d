use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    // The total number of environment steps to train for.
    max_train_steps: usize,
    // Number of purely random actions at the very beginning of training.
    random_steps: usize,
    // Every `update_freq` total steps, run `update_freq` learning iterations.
    update_freq: usize,
    // Every `evaluate_freq` total steps, evaluate the deterministic policy.
    evaluate_freq: usize,
    // The number of episodes to average over per evaluation.
    evaluation_episodes: usize,
    // The std of the exploration noise, as a fraction of the action bound.
    noise_std: f64,
    // Affine reward adapter: stored reward is (r + shift) / scale.
    reward_shift: f64,
    reward_scale: f64,
}
impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_train_steps: 100_000,
            random_steps: 1_000,
            update_freq: 50,
            evaluate_freq: 1_000,
            evaluation_episodes: 3,
            noise_std: 0.1,
            reward_shift: 0.0,
            reward_scale: 1.0,
        }
    }
}
impl TrainConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max_train_steps: usize,
        random_steps: usize,
        update_freq: usize,
        evaluate_freq: usize,
        evaluation_episodes: usize,
        noise_std: f64,
        reward_shift: f64,
        reward_scale: f64,
    ) -> Self {
        Self {
            max_train_steps,
            random_steps,
            update_freq,
            evaluate_freq,
            evaluation_episodes,
            noise_std,
            reward_shift,
            reward_scale,
        }
    }

    pub fn cannon() -> Self {
        Self {
            max_train_steps: 3_000_000,
            random_steps: 25_000,
            update_freq: 50,
            evaluate_freq: 1_000,
            evaluation_episodes: 3,
            noise_std: 0.1,
            reward_shift: 8.0,
            reward_scale: 8.0,
        }
    }
}

impl TrainConfig {
    pub fn max_train_steps(&self) -> usize {
        self.max_train_steps
    }
    pub fn random_steps(&self) -> usize {
        self.random_steps
    }
    pub fn update_freq(&self) -> usize {
        self.update_freq
    }
    pub fn evaluate_freq(&self) -> usize {
        self.evaluate_freq
    }
    pub fn evaluation_episodes(&self) -> usize {
        self.evaluation_episodes
    }
    pub fn noise_std(&self) -> f64 {
        self.noise_std
    }

    /// The affine rescaling applied to raw rewards before storage.
    ///
    /// A normalization convenience, not a correctness requirement; the
    /// default is the identity.
    pub fn adapt_reward(
        &self,
        reward: f64,
    ) -> f64 {
        (reward + self.reward_shift) / self.reward_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cannon_reward_adapter() {
        let config = TrainConfig::cannon();
        assert_eq!(config.adapt_reward(0.0), 1.0);
        assert_eq!(config.adapt_reward(100.0), 13.5);
    }

    #[test]
    fn test_default_reward_adapter_is_identity() {
        let config = TrainConfig::default();
        assert_eq!(config.adapt_reward(-3.5), -3.5);
    }
}
