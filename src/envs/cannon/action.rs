use {
    super::super::{
        Sampleable,
        TensorConvertible,
        VectorConvertible,
    },
    candle_core::{
        Device,
        Tensor,
    },
    rand::{
        Rng,
        RngCore,
    },
};

/// The action type for the [`CannonEnv`](super::cannon_env::CannonEnv)
/// environment.
///
/// A [CannonAction] is the launch speed of a single shot. The shot distance
/// depends on the square of the speed, so the sign carries no information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannonAction {
    speed: f64,
}
impl CannonAction {
    pub fn speed(&self) -> f64 {
        self.speed
    }
}

impl From<f64> for CannonAction {
    fn from(value: f64) -> Self {
        Self { speed: value }
    }
}

impl Sampleable for CannonAction {
    /// Sample a launch speed uniformly from the declared domain.
    ///
    /// This function panics if the number of ranges in the domain is not 1.
    fn sample(
        rng: &mut dyn RngCore,
        domain: &[std::ops::RangeInclusive<f64>],
    ) -> Self {
        assert!(domain.len() == 1);
        Self::from(rng.gen_range(domain[0].clone()))
    }
}

impl VectorConvertible for CannonAction {
    /// Convert a [`Vec<f64>`] into a [CannonAction]
    ///
    /// Panics if the Vec does not have exactly 1 element.
    fn from_vec(value: Vec<f64>) -> Self {
        assert!(value.len() == 1);
        Self::from(value[0])
    }

    /// Convert a [CannonAction] into a [`Vec<f64>`] of the form `[speed]`
    fn to_vec(value: Self) -> Vec<f64> {
        vec![value.speed]
    }
}

impl TensorConvertible for CannonAction {
    /// Convert a [Tensor] into a [CannonAction]
    ///
    /// Panics if the [Tensor] is not 1-dimensional with a single element.
    fn from_tensor(value: Tensor) -> Self {
        Self::from_vec(value.to_vec1::<f64>().unwrap())
    }

    /// Convert a [CannonAction] to a [Tensor] (with no batch dimension) on
    /// the given device.
    fn to_tensor(
        value: Self,
        device: &Device,
    ) -> candle_core::Result<Tensor> {
        Tensor::new(Self::to_vec(value), device)
    }
}
