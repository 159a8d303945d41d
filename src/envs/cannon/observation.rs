use {
    super::super::{
        TensorConvertible,
        VectorConvertible,
    },
    candle_core::{
        Device,
        Tensor,
    },
};

/// The observation type for the [`CannonEnv`](super::cannon_env::CannonEnv)
/// environment.
///
/// A [CannonObs] consists of the barrel angle in radians and the remaining
/// distance to the target. Before the shot the distance is the full target
/// distance; after the shot it is the (signed) miss distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannonObs {
    angle: f64,
    distance_to_target: f64,
}
impl CannonObs {
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn distance_to_target(&self) -> f64 {
        self.distance_to_target
    }
}

impl From<(f64, f64)> for CannonObs {
    /// Convert `(angle, distance_to_target)` into a [CannonObs]
    fn from(value: (f64, f64)) -> Self {
        Self {
            angle: value.0,
            distance_to_target: value.1,
        }
    }
}

impl VectorConvertible for CannonObs {
    /// Convert a [`Vec<f64>`] into a [CannonObs]
    ///
    /// Panics if the Vec does not have exactly 2 elements.
    ///
    /// The elements are assumed to be in the form `[angle, distance]`.
    fn from_vec(value: Vec<f64>) -> Self {
        assert!(value.len() == 2);
        Self::from((value[0], value[1]))
    }

    /// Convert a [CannonObs] into a [`Vec<f64>`] of the form
    /// `[angle, distance]`
    fn to_vec(value: Self) -> Vec<f64> {
        vec![value.angle, value.distance_to_target]
    }
}

impl TensorConvertible for CannonObs {
    /// Convert a [Tensor] into a [CannonObs]
    ///
    /// Panics if the [Tensor] is not 1-dimensional with 2 elements.
    fn from_tensor(value: Tensor) -> Self {
        Self::from_vec(value.to_vec1::<f64>().unwrap())
    }

    /// Convert a [CannonObs] to a [Tensor] (with no batch dimension) on
    /// the given device.
    fn to_tensor(
        value: Self,
        device: &Device,
    ) -> candle_core::Result<Tensor> {
        Tensor::new(Self::to_vec(value), device)
    }
}
