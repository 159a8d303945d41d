use {
    crate::{
        configs::CEM_Config,
        envs::{
            Environment,
            VectorConvertible,
        },
    },
    anyhow::Result,
    ordered_float::OrderedFloat,
    rand::thread_rng,
    rand_distr::{
        Distribution,
        Normal,
    },
    tracing::warn,
};

/// A cross-entropy method optimizer over the action distribution.
///
/// Much simpler than the gradient-based agents: every iteration samples a
/// population of actions from a per-dimension Gaussian, scores each by its
/// episodic return, and refits the Gaussian to the best-scoring fraction.
pub struct CrossEntropyMethod {
    mean: Vec<f64>,
    std: Vec<f64>,
    config: CEM_Config,
}

impl CrossEntropyMethod {
    pub fn new(
        size_action: usize,
        config: CEM_Config,
    ) -> Self {
        Self {
            mean: vec![0.0; size_action],
            std: vec![config.initial_std; size_action],
            config,
        }
    }

    /// Run the full optimization and return the final mean action.
    pub fn optimize<Env, Obs, Act>(
        &mut self,
        env: &mut Env,
    ) -> Result<Vec<f64>>
    where
        Env: Environment<Action = Act, Observation = Obs>,
        Act: Clone + VectorConvertible,
    {
        let mut rng = thread_rng();
        // truncation must never leave the elite set empty
        let n_elite = (((self.config.population_size as f64) * self.config.elite_fraction)
            as usize)
            .max(1);
        let domain = env.action_domain();

        for iteration in 0..self.config.n_iterations {
            let mut population = Vec::with_capacity(self.config.population_size);
            for _ in 0..self.config.population_size {
                // samples are clipped into the declared action domain, since
                // the environment rejects out-of-domain actions
                let action: Vec<f64> = self
                    .mean
                    .iter()
                    .zip(self.std.iter())
                    .zip(domain.iter())
                    .map(|((&mu, &sigma), range)| {
                        Normal::new(mu, sigma.max(f64::EPSILON))
                            .unwrap()
                            .sample(&mut rng)
                            .clamp(*range.start(), *range.end())
                    })
                    .collect();
                population.push(action);
            }

            let mut scored = Vec::with_capacity(population.len());
            for action in population {
                let score = episode_return::<Env, Obs, Act>(env, &action)?;
                scored.push((OrderedFloat(score), action));
            }

            let mean_score =
                scored.iter().map(|(s, _)| s.into_inner()).sum::<f64>() / scored.len() as f64;

            scored.sort_by_key(|(score, _)| *score);
            let elites: Vec<&Vec<f64>> = scored
                .iter()
                .rev()
                .take(n_elite)
                .map(|(_, action)| action)
                .collect();

            (self.mean, self.std) = refit(&elites);

            warn!(
                "CEM iteration {}/{}: mean return {mean_score:.3}",
                iteration + 1,
                self.config.n_iterations,
            );
        }

        Ok(self.mean.clone())
    }
}

/// Play one full episode with a fixed action and return its total reward.
fn episode_return<Env, Obs, Act>(
    env: &mut Env,
    action: &[f64],
) -> Result<f64>
where
    Env: Environment<Action = Act, Observation = Obs>,
    Act: Clone + VectorConvertible,
{
    use rand::Rng;

    env.reset(thread_rng().gen::<u64>())?;
    let mut total_reward = 0.0;
    loop {
        let step = env.step(<Act>::from_vec(action.to_vec()))?;
        total_reward += step.reward;
        if step.terminated || step.truncated {
            break;
        }
    }
    Ok(total_reward)
}

/// Refit the per-dimension mean and (population) std to the elite actions.
fn refit(elites: &[&Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let n = elites.len() as f64;
    let dims = elites[0].len();

    let mean: Vec<f64> = (0..dims)
        .map(|d| elites.iter().map(|a| a[d]).sum::<f64>() / n)
        .collect();
    let std: Vec<f64> = (0..dims)
        .map(|d| {
            (elites.iter().map(|a| (a[d] - mean[d]).powi(2)).sum::<f64>() / n).sqrt()
        })
        .collect();

    (mean, std)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::envs::{
            CannonConfig,
            CannonEnv,
        },
    };

    #[test]
    fn test_refit_matches_elites() {
        let a = vec![1.0, 10.0];
        let b = vec![3.0, 20.0];
        let (mean, std) = refit(&[&a, &b]);

        assert_eq!(mean, vec![2.0, 15.0]);
        assert_eq!(std, vec![1.0, 5.0]);
    }

    #[test]
    fn test_tiny_population_keeps_at_least_one_elite() {
        // population 3 with fraction 0.25 truncates to 0 elites; the floor
        // of 1 keeps the refit well-defined
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        let mut cem = CrossEntropyMethod::new(1, CEM_Config::new(2, 3, 0.25, 10.0));

        let mean = cem.optimize(&mut env).unwrap();
        assert!(mean[0].is_finite());
    }

    #[test]
    fn test_optimize_stays_finite() {
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        let mut cem = CrossEntropyMethod::new(1, CEM_Config::new(3, 16, 0.25, 10.0));

        let mean = cem.optimize(&mut env).unwrap();
        assert_eq!(mean.len(), 1);
        assert!(mean[0].is_finite());
    }
}
