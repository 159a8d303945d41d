use {
    super::{
        super::{
            Environment,
            Step,
        },
        action::CannonAction,
        config::CannonConfig,
        observation::CannonObs,
    },
    anyhow::Result,
    rand::{
        rngs::StdRng,
        Rng,
        SeedableRng,
    },
    std::{
        f64::consts::FRAC_PI_2,
        ops::RangeInclusive,
    },
    tracing::info,
};

const GRAVITY: f64 = 9.80665;

/// The range of a projectile launched at `speed` under barrel angle `angle`.
pub fn shot_distance(
    speed: f64,
    angle: f64,
) -> f64 {
    speed.powi(2) * (2.0 * angle).sin() / GRAVITY
}

/// A toy ballistics environment.
///
/// On every reset the cannon gets a random barrel angle and a random target
/// distance. The agent picks a launch speed, the shot lands, and the episode
/// ends: the reward is highest when the shot lands on the target and falls
/// off linearly with the miss distance.
pub struct CannonEnv {
    config: CannonConfig,

    angle: f64,
    target_distance: f64,
    distance_to_target: f64,

    timestep: usize,
    rng: StdRng,
}

impl Environment for CannonEnv {
    type Config = CannonConfig;
    type Action = CannonAction;
    type Observation = CannonObs;

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn new(config: CannonConfig) -> Result<Box<Self>> {
        config.check()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let angle = rng.gen_range(0.0..=FRAC_PI_2);
        let target_distance = rng.gen_range(config.min_target..=config.max_target);

        Ok(Box::new(Self {
            config,
            angle,
            target_distance,
            distance_to_target: target_distance,
            timestep: 0,
            rng,
        }))
    }

    fn reset(
        &mut self,
        seed: u64,
    ) -> Result<Self::Observation> {
        self.timestep = 0;
        self.rng = StdRng::seed_from_u64(seed);

        self.angle = self.rng.gen_range(0.0..=FRAC_PI_2);
        self.target_distance = self
            .rng
            .gen_range(self.config.min_target..=self.config.max_target);
        self.distance_to_target = self.target_distance;

        Ok(CannonObs::from((self.angle, self.distance_to_target)))
    }

    fn step(
        &mut self,
        action: Self::Action,
    ) -> Result<Step<Self::Observation, Self::Action>> {
        let speed = action.speed();
        if !speed.is_finite() {
            return Err(anyhow::anyhow!("Action is not finite: {speed}"));
        }
        if speed.abs() > self.config.max_speed {
            return Err(anyhow::anyhow!(
                "Action {speed} outside the declared action space [{}, {}]",
                -self.config.max_speed,
                self.config.max_speed,
            ));
        }

        self.timestep += 1;

        let distance = shot_distance(speed, self.angle);
        self.distance_to_target = self.target_distance - distance;

        let reward = (100.0 - self.distance_to_target.abs()).max(0.0);

        // the episode ends after one shot
        let terminated = true;
        let truncated = false;

        info!(
            concat!(
                "\nCannon shot:",
                "\nangle {:.3}, speed {:.3} --> landed at {:.1}, target {:.1}",
                "\nR: {:.3}",
            ),
            self.angle, speed, distance, self.target_distance, reward,
        );

        Ok(Step {
            observation: CannonObs::from((self.angle, self.distance_to_target)),
            action,
            reward,
            terminated,
            truncated,
        })
    }

    fn timelimit(&self) -> usize {
        self.config.timelimit
    }

    fn action_space(&self) -> Vec<usize> {
        vec![1]
    }

    fn action_domain(&self) -> Vec<RangeInclusive<f64>> {
        vec![-self.config.max_speed..=self.config.max_speed]
    }

    fn observation_space(&self) -> Vec<usize> {
        vec![2]
    }

    fn observation_domain(&self) -> Vec<RangeInclusive<f64>> {
        vec![0.0..=FRAC_PI_2, -self.config.max_target..=self.config.max_target]
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::f64::consts::FRAC_PI_4,
    };

    #[test]
    fn test_shot_distance_at_optimal_angle() {
        // at 45 degrees the range is v^2 / g
        let speed = (GRAVITY * 100.0).sqrt();
        assert!((shot_distance(speed, FRAC_PI_4) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_shot_episode() {
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        let obs = env.reset(42).unwrap();

        assert!(obs.angle() >= 0.0 && obs.angle() <= FRAC_PI_2);
        assert!(obs.distance_to_target() >= 500.0 && obs.distance_to_target() <= 1000.0);

        let step = env.step(CannonAction::from(50.0)).unwrap();
        assert!(step.terminated);
        assert!(!step.truncated);
        assert!(step.reward >= 0.0 && step.reward <= 100.0);
    }

    #[test]
    fn test_direct_hit_reward() {
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        env.reset(0).unwrap();

        // aim a speed that lands exactly on the target
        let speed = (env.target_distance * GRAVITY / (2.0 * env.angle).sin()).sqrt();
        if speed <= env.config.max_speed {
            let step = env.step(CannonAction::from(speed)).unwrap();
            assert!((step.reward - 100.0).abs() < 1e-6);
            assert!(step.observation.distance_to_target().abs() < 1e-6);
        }
    }

    #[test]
    fn test_rejects_invalid_actions() {
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        env.reset(7).unwrap();

        assert!(env.step(CannonAction::from(f64::NAN)).is_err());
        assert!(env.step(CannonAction::from(1000.0)).is_err());
        assert!(env.step(CannonAction::from(-1000.0)).is_err());
    }

    #[test]
    fn test_reset_redraws_target() {
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        let first = env.reset(1).unwrap();
        let second = env.reset(2).unwrap();

        assert!(first != second);
    }
}
