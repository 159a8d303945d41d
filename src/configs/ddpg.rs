use serde::{
    Deserialize,
    Serialize,
};

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DDPG_Config {
    // The learning rates for the Actor and Critic networks
    pub actor_learning_rate: f64,
    pub critic_learning_rate: f64,
    // The impact of the q value of the next state on the current state's q value.
    pub gamma: f64,
    // The weight for updating the target networks.
    pub tau: f64,
    // The number of neurons in the hidden layers of the Actor and Critic networks.
    pub hidden_width: usize,
    // The capacity of the replay buffer used for sampling training data.
    pub replay_buffer_capacity: usize,
    // The training batch size for each training iteration.
    pub training_batch_size: usize,
}
impl Default for DDPG_Config {
    fn default() -> Self {
        Self {
            actor_learning_rate: 0.0003,
            critic_learning_rate: 0.0003,
            gamma: 0.99,
            tau: 0.005,
            hidden_width: 256,
            replay_buffer_capacity: 1_000_000,
            training_batch_size: 64,
        }
    }
}
impl DDPG_Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        actor_learning_rate: f64,
        critic_learning_rate: f64,
        gamma: f64,
        tau: f64,
        hidden_width: usize,
        replay_buffer_capacity: usize,
        training_batch_size: usize,
    ) -> Self {
        Self {
            actor_learning_rate,
            critic_learning_rate,
            gamma,
            tau,
            hidden_width,
            replay_buffer_capacity,
            training_batch_size,
        }
    }

    pub fn cannon() -> Self {
        Self {
            actor_learning_rate: 1e-4,
            critic_learning_rate: 1e-4,
            gamma: 0.99,
            tau: 0.005,
            hidden_width: 32,
            replay_buffer_capacity: 1_000_000,
            training_batch_size: 32,
        }
    }
}
