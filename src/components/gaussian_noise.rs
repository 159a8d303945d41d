use candle_core::{
    Device,
    Result,
    Tensor,
};

/// Independent zero-mean Gaussian exploration noise.
///
/// The training loop adds a sample of this to every action during the
/// exploration phase; the agent itself never injects noise.
pub struct GaussianNoise {
    std: f64,
    size_action: usize,
    device: Device,
}
impl GaussianNoise {
    pub fn new(
        std: f64,
        size_action: usize,
        device: &Device,
    ) -> Self {
        Self {
            std,
            size_action,
            device: device.clone(),
        }
    }

    pub fn sample(&self) -> Result<Tensor> {
        Tensor::randn(0.0, self.std, self.size_action, &self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_shape_and_finiteness() {
        let noise = GaussianNoise::new(0.5, 3, &Device::Cpu);
        let sample = noise.sample().unwrap();

        assert_eq!(sample.dims(), &[3]);
        for value in sample.to_vec1::<f64>().unwrap() {
            assert!(value.is_finite());
        }
    }
}
