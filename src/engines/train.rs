use {
    crate::{
        agents::{
            Algorithm,
            OffPolicyAlgorithm,
        },
        components::GaussianNoise,
        configs::TrainConfig,
        envs::{
            action_bound,
            Environment,
            Sampleable,
            TensorConvertible,
        },
    },
    anyhow::Result,
    candle_core::{
        Device,
        Tensor,
    },
    rand::{
        thread_rng,
        Rng,
    },
    tracing::{
        info,
        warn,
    },
};

/// True when the episode died before reaching its time limit.
///
/// Distinguishes a true terminal end from a step-limit truncation: only the
/// former should suppress bootstrapping off the next state.
pub fn died_early(
    done: bool,
    episode_steps: usize,
    timelimit: usize,
) -> bool {
    done && episode_steps != timelimit
}

/// Train an off-policy algorithm on an environment for a budget of
/// environment steps.
///
/// Takes purely random actions for the first `random_steps` steps, then noisy
/// policy actions. Every `update_freq` steps the agent learns `update_freq`
/// times in a row, and every `evaluate_freq` steps the deterministic policy
/// is scored on `eval_env`. Returns the recorded evaluation returns.
///
/// # Arguments
///
/// * `env` - The environment to train on.
/// * `eval_env` - A separate instance of the environment for evaluations.
/// * `agent` - The agent to train.
/// * `config` - The training schedule.
/// * `device` - The device to run on.
pub fn training_loop_off_policy<Alg, Env, Obs, Act>(
    env: &mut Env,
    eval_env: &mut Env,
    agent: &mut Alg,
    config: TrainConfig,
    device: &Device,
) -> Result<Vec<f64>>
where
    Env: Environment<Action = Act, Observation = Obs>,
    Alg: Algorithm + OffPolicyAlgorithm,
    Obs: Clone + TensorConvertible,
    Act: Clone + TensorConvertible + Sampleable,
{
    warn!("action space: {:?}", env.action_space());
    warn!("observation space: {:?}", env.observation_space());

    let max_action = action_bound(&env.action_domain());
    let size_action = env.action_space().iter().product::<usize>();
    let noise = GaussianNoise::new(config.noise_std() * max_action, size_action, device);

    let mut total_steps = 0;
    let mut evaluations = Vec::new();
    let mut rng = thread_rng();

    while total_steps < config.max_train_steps() {
        let mut observation = env.reset(rng.gen::<u64>())?;
        let mut episode_steps = 0;

        loop {
            episode_steps += 1;
            let state = <Obs>::to_tensor(observation.clone(), device)?;

            // select a noised action, or randomly sample one during warm-up
            let action = if total_steps < config.random_steps() {
                <Act>::to_tensor(<Act>::sample(&mut rng, &env.action_domain()), device)?
            } else {
                (agent.choose_action(&state)? + noise.sample()?)?
                    .clamp(-max_action, max_action)?
            };

            let step = env.step(<Act>::from_tensor(action.clone()))?;
            let reward = config.adapt_reward(step.reward);
            let done = step.terminated || step.truncated;
            let dw = died_early(done, episode_steps, env.timelimit());
            total_steps += 1;

            agent.remember(
                &state,
                &action,
                &Tensor::new(vec![reward], device)?,
                &<Obs>::to_tensor(step.observation.clone(), device)?,
                &Tensor::new(vec![dw as u8 as f64], device)?,
            );
            observation = step.observation;

            // a burst of updates, rather than one update per step
            if total_steps >= config.random_steps() && total_steps % config.update_freq() == 0 {
                for _ in 0..config.update_freq() {
                    agent.learn()?;
                }
            }

            if total_steps % config.evaluate_freq() == 0 {
                let evaluation = evaluate_policy(
                    eval_env,
                    agent,
                    config.evaluation_episodes(),
                    device,
                )?;
                warn!(
                    "evaluation {} at step {total_steps}: average return {evaluation:.3}",
                    evaluations.len() + 1,
                );
                evaluations.push(evaluation);
            }

            if done {
                break;
            }
        }
        info!("episode finished after {episode_steps} steps ({total_steps} total)");
    }

    Ok(evaluations)
}

/// Average episodic return of the deterministic policy, with no exploration
/// noise, over a fixed number of episodes.
pub fn evaluate_policy<Alg, Env, Obs, Act>(
    env: &mut Env,
    agent: &Alg,
    episodes: usize,
    device: &Device,
) -> Result<f64>
where
    Env: Environment<Action = Act, Observation = Obs>,
    Alg: Algorithm,
    Obs: Clone + TensorConvertible,
    Act: Clone + TensorConvertible,
{
    let mut rng = thread_rng();
    let mut total_reward = 0.0;

    for _ in 0..episodes {
        let mut observation = env.reset(rng.gen::<u64>())?;
        loop {
            let state = <Obs>::to_tensor(observation, device)?;
            let action = agent.choose_action(&state)?;
            let step = env.step(<Act>::from_tensor(action))?;
            total_reward += step.reward;
            observation = step.observation;

            if step.terminated || step.truncated {
                break;
            }
        }
    }

    Ok(total_reward / episodes as f64)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            agents::DDPG,
            configs::DDPG_Config,
            envs::{
                CannonConfig,
                CannonEnv,
            },
        },
    };

    #[test]
    fn test_died_early_flag() {
        // terminal failure before the limit
        assert!(died_early(true, 3, 10));
        // reaching the step limit is a truncation, not a death
        assert!(!died_early(true, 10, 10));
        // episode still running
        assert!(!died_early(false, 3, 10));
    }

    #[test]
    fn test_training_loop_smoke() {
        let device = Device::Cpu;
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        let mut eval_env = *CannonEnv::new(CannonConfig::default()).unwrap();

        let max_action = action_bound(&env.action_domain());
        let mut agent = *DDPG::from_config(
            &device,
            &DDPG_Config::new(1e-3, 1e-3, 0.99, 0.005, 8, 100, 4),
            env.observation_space().iter().product::<usize>(),
            env.action_space().iter().product::<usize>(),
            max_action,
        )
        .unwrap();

        let config = TrainConfig::new(30, 10, 5, 10, 2, 0.1, 8.0, 8.0);
        let evaluations =
            training_loop_off_policy(&mut env, &mut eval_env, &mut agent, config, &device)
                .unwrap();

        // 30 steps with an evaluation every 10
        assert_eq!(evaluations.len(), 3);
        assert_eq!(agent.replay_buffer().size(), 30);
        for evaluation in evaluations {
            assert!(evaluation.is_finite());
        }
    }

    #[test]
    fn test_evaluate_policy_returns_are_in_reward_range() {
        let device = Device::Cpu;
        let mut env = *CannonEnv::new(CannonConfig::default()).unwrap();
        let agent = *DDPG::from_config(
            &device,
            &DDPG_Config::new(1e-3, 1e-3, 0.99, 0.005, 8, 100, 4),
            2,
            1,
            100.0,
        )
        .unwrap();

        let evaluation = evaluate_policy(&mut env, &agent, 3, &device).unwrap();
        assert!((0.0..=100.0).contains(&evaluation));
    }
}
