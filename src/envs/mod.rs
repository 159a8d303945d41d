mod cannon;

use {
    anyhow::Result,
    candle_core::{
        Device,
        Tensor,
    },
    rand::RngCore,
    std::ops::RangeInclusive,
};

pub use crate::envs::cannon::{
    CannonAction,
    CannonConfig,
    CannonEnv,
    CannonObs,
};

pub trait TensorConvertible: VectorConvertible {
    fn from_tensor(value: Tensor) -> Self;
    fn to_tensor(
        value: Self,
        device: &Device,
    ) -> candle_core::Result<Tensor>;
}

pub trait VectorConvertible {
    fn from_vec(value: Vec<f64>) -> Self;
    fn to_vec(value: Self) -> Vec<f64>;
}

pub trait Sampleable {
    fn sample(
        rng: &mut dyn RngCore,
        domain: &[RangeInclusive<f64>],
    ) -> Self;
}

/// The result of taking a single step in an environment.
#[derive(Debug)]
pub struct Step<O, A> {
    pub observation: O,
    pub action: A,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
}

pub trait Environment {
    type Config;
    type Action;
    type Observation;

    fn config(&self) -> &Self::Config;
    fn new(config: Self::Config) -> Result<Box<Self>>;
    fn reset(
        &mut self,
        seed: u64,
    ) -> Result<Self::Observation>;
    fn step(
        &mut self,
        action: Self::Action,
    ) -> Result<Step<Self::Observation, Self::Action>>;
    fn timelimit(&self) -> usize;
    fn action_space(&self) -> Vec<usize>;
    fn action_domain(&self) -> Vec<RangeInclusive<f64>>;
    fn observation_space(&self) -> Vec<usize>;
    fn observation_domain(&self) -> Vec<RangeInclusive<f64>>;
}

/// The largest absolute bound over all action dimensions.
///
/// Networks scale their outputs by this value, and the training loop clips
/// noised actions to it.
pub fn action_bound(domain: &[RangeInclusive<f64>]) -> f64 {
    domain
        .iter()
        .map(|range| range.start().abs().max(range.end().abs()))
        .fold(0.0, f64::max)
}
