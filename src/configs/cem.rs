use serde::{
    Deserialize,
    Serialize,
};

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CEM_Config {
    // The number of distribution-update iterations.
    pub n_iterations: usize,
    // The number of sampled actions per iteration.
    pub population_size: usize,
    // The fraction of the population kept as the elite set.
    pub elite_fraction: f64,
    // Initial standard deviation of the action distribution.
    pub initial_std: f64,
}
impl Default for CEM_Config {
    fn default() -> Self {
        Self {
            n_iterations: 100,
            population_size: 50,
            elite_fraction: 0.2,
            initial_std: 10.0,
        }
    }
}
impl CEM_Config {
    pub fn new(
        n_iterations: usize,
        population_size: usize,
        elite_fraction: f64,
        initial_std: f64,
    ) -> Self {
        Self {
            n_iterations,
            population_size,
            elite_fraction,
            initial_std,
        }
    }
}
