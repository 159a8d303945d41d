mod cem;
mod ddpg;

pub use {
    cem::CrossEntropyMethod,
    ddpg::DDPG,
};

use {
    crate::components::ReplayBuffer,
    candle_core::{
        Device,
        Result,
        Tensor,
    },
};

pub trait Algorithm {
    type Config;

    fn config(&self) -> &Self::Config;
    fn from_config(
        device: &Device,
        config: &Self::Config,
        size_state: usize,
        size_action: usize,
        max_action: f64,
    ) -> Result<Box<Self>>;

    /// Select an action for the given state with the live policy.
    ///
    /// This is a pure forward pass: no gradients, no target networks, and no
    /// exploration noise. Noise injection is the caller's responsibility.
    fn choose_action(
        &self,
        state: &Tensor,
    ) -> Result<Tensor>;

    /// One learning step, improving the parameters from replayed experience.
    fn learn(&mut self) -> Result<()>;
}

pub trait OffPolicyAlgorithm: Algorithm {
    fn remember(
        &mut self,
        state: &Tensor,
        action: &Tensor,
        reward: &Tensor,
        next_state: &Tensor,
        done: &Tensor,
    );

    fn replay_buffer(&self) -> &ReplayBuffer;
}
