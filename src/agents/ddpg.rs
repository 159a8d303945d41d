use {
    super::{
        Algorithm,
        OffPolicyAlgorithm,
    },
    crate::{
        components::ReplayBuffer,
        configs::DDPG_Config,
    },
    candle_core::{
        DType,
        Device,
        Error,
        Module,
        Result,
        Tensor,
        Var,
    },
    candle_nn::{
        func,
        linear,
        sequential::seq,
        Activation,
        AdamW,
        Optimizer,
        ParamsAdamW,
        Sequential,
        VarBuilder,
        VarMap,
    },
    tracing::info,
};

/// Blend the named live-network variables into their target counterparts:
/// `target = tau * live + (1 - tau) * target`, elementwise.
fn track(
    varmap: &mut VarMap,
    vb: &VarBuilder,
    target_prefix: &str,
    network_prefix: &str,
    dims: &[(usize, usize)],
    tau: f64,
) -> Result<()> {
    for (i, &(in_dim, out_dim)) in dims.iter().enumerate() {
        let target_w = vb.get((out_dim, in_dim), &format!("{target_prefix}-fc{i}.weight"))?;
        let network_w = vb.get((out_dim, in_dim), &format!("{network_prefix}-fc{i}.weight"))?;
        varmap.set_one(
            format!("{target_prefix}-fc{i}.weight"),
            ((tau * network_w)? + ((1.0 - tau) * target_w)?)?,
        )?;

        let target_b = vb.get(out_dim, &format!("{target_prefix}-fc{i}.bias"))?;
        let network_b = vb.get(out_dim, &format!("{network_prefix}-fc{i}.bias"))?;
        varmap.set_one(
            format!("{target_prefix}-fc{i}.bias"),
            ((tau * network_b)? + ((1.0 - tau) * target_b)?)?,
        )?;
    }
    Ok(())
}

/// The policy network: state -> action, bounded by `max_action`.
///
/// The final layer goes through a tanh and is scaled by `max_action`, so the
/// output always lies in `[-max_action, max_action]` per dimension.
struct Actor<'a> {
    varmap: VarMap,
    vb: VarBuilder<'a>,
    network: Sequential,
    target_network: Sequential,
    dims: Vec<(usize, usize)>,
    max_action: f64,
}

impl Actor<'_> {
    fn new(
        device: &Device,
        dtype: DType,
        dims: &[(usize, usize)],
        max_action: f64,
    ) -> Result<Self> {
        let mut varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, dtype, device);

        let make_network = |prefix: &str| {
            let seq = seq()
                .add(linear(
                    dims[0].0,
                    dims[0].1,
                    vb.pp(format!("{prefix}-fc0")),
                )?)
                .add(Activation::Relu)
                .add(linear(
                    dims[1].0,
                    dims[1].1,
                    vb.pp(format!("{prefix}-fc1")),
                )?)
                .add(Activation::Relu)
                .add(linear(
                    dims[2].0,
                    dims[2].1,
                    vb.pp(format!("{prefix}-fc2")),
                )?)
                .add(func(|xs| xs.tanh()));
            Ok::<Sequential, Error>(seq)
        };

        let network = make_network("actor")?;
        let target_network = make_network("target-actor")?;

        // this sets the two networks to be equal to each other using tau = 1.0
        track(&mut varmap, &vb, "target-actor", "actor", dims, 1.0)?;

        Ok(Self {
            varmap,
            vb,
            network,
            target_network,
            dims: dims.to_vec(),
            max_action,
        })
    }

    fn forward(
        &self,
        state: &Tensor,
    ) -> Result<Tensor> {
        self.max_action * self.network.forward(state)?
    }

    fn target_forward(
        &self,
        state: &Tensor,
    ) -> Result<Tensor> {
        self.max_action * self.target_network.forward(state)?
    }

    fn track(
        &mut self,
        tau: f64,
    ) -> Result<()> {
        track(
            &mut self.varmap,
            &self.vb,
            "target-actor",
            "actor",
            &self.dims,
            tau,
        )
    }
}

/// The value network: (state, action) -> scalar value estimate, with an
/// unconstrained output.
struct Critic<'a> {
    varmap: VarMap,
    vb: VarBuilder<'a>,
    network: Sequential,
    target_network: Sequential,
    dims: Vec<(usize, usize)>,
}

impl Critic<'_> {
    fn new(
        device: &Device,
        dtype: DType,
        dims: &[(usize, usize)],
    ) -> Result<Self> {
        let mut varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, dtype, device);

        let make_network = |prefix: &str| {
            let seq = seq()
                .add(linear(
                    dims[0].0,
                    dims[0].1,
                    vb.pp(format!("{prefix}-fc0")),
                )?)
                .add(Activation::Relu)
                .add(linear(
                    dims[1].0,
                    dims[1].1,
                    vb.pp(format!("{prefix}-fc1")),
                )?)
                .add(Activation::Relu)
                .add(linear(
                    dims[2].0,
                    dims[2].1,
                    vb.pp(format!("{prefix}-fc2")),
                )?);
            Ok::<Sequential, Error>(seq)
        };

        let network = make_network("critic")?;
        let target_network = make_network("target-critic")?;

        // this sets the two networks to be equal to each other using tau = 1.0
        track(&mut varmap, &vb, "target-critic", "critic", dims, 1.0)?;

        Ok(Self {
            varmap,
            vb,
            network,
            target_network,
            dims: dims.to_vec(),
        })
    }

    fn forward(
        &self,
        state: &Tensor,
        action: &Tensor,
    ) -> Result<Tensor> {
        let xs = Tensor::cat(&[state, action], 1)?;
        self.network.forward(&xs)
    }

    fn target_forward(
        &self,
        state: &Tensor,
        action: &Tensor,
    ) -> Result<Tensor> {
        let xs = Tensor::cat(&[state, action], 1)?;
        self.target_network.forward(&xs)
    }

    fn track(
        &mut self,
        tau: f64,
    ) -> Result<()> {
        track(
            &mut self.varmap,
            &self.vb,
            "target-critic",
            "critic",
            &self.dims,
            tau,
        )
    }
}

#[allow(clippy::upper_case_acronyms)]
pub struct DDPG<'a> {
    actor: Actor<'a>,
    actor_optim: AdamW,
    critic: Critic<'a>,
    critic_optim: AdamW,
    gamma: f64,
    tau: f64,
    replay_buffer: ReplayBuffer,
    batch_size: usize,
    config: DDPG_Config,
}

impl DDPG<'_> {
    pub fn new(
        device: &Device,
        config: DDPG_Config,
        size_state: usize,
        size_action: usize,
        max_action: f64,
    ) -> Result<Self> {
        let filter_by_prefix = |varmap: &VarMap, prefix: &str| {
            varmap
                .data()
                .lock()
                .unwrap()
                .iter()
                .filter_map(|(name, var)| name.starts_with(prefix).then_some(var.clone()))
                .collect::<Vec<Var>>()
        };

        let actor = Actor::new(
            device,
            DType::F64,
            &[
                (size_state, config.hidden_width),
                (config.hidden_width, config.hidden_width),
                (config.hidden_width, size_action),
            ],
            max_action,
        )?;
        let actor_optim = AdamW::new(
            filter_by_prefix(&actor.varmap, "actor"),
            ParamsAdamW {
                lr: config.actor_learning_rate,
                ..Default::default()
            },
        )?;

        let critic = Critic::new(
            device,
            DType::F64,
            &[
                (size_state + size_action, config.hidden_width),
                (config.hidden_width, config.hidden_width),
                (config.hidden_width, 1),
            ],
        )?;
        let critic_optim = AdamW::new(
            filter_by_prefix(&critic.varmap, "critic"),
            ParamsAdamW {
                lr: config.critic_learning_rate,
                ..Default::default()
            },
        )?;

        Ok(Self {
            actor,
            actor_optim,
            critic,
            critic_optim,
            gamma: config.gamma,
            tau: config.tau,
            replay_buffer: ReplayBuffer::new(config.replay_buffer_capacity),
            batch_size: config.training_batch_size,
            config,
        })
    }
}

impl Algorithm for DDPG<'_> {
    type Config = DDPG_Config;

    fn config(&self) -> &DDPG_Config {
        &self.config
    }

    fn from_config(
        device: &Device,
        config: &DDPG_Config,
        size_state: usize,
        size_action: usize,
        max_action: f64,
    ) -> Result<Box<Self>> {
        Ok(Box::new(Self::new(
            device,
            config.clone(),
            size_state,
            size_action,
            max_action,
        )?))
    }

    fn choose_action(
        &self,
        state: &Tensor,
    ) -> Result<Tensor> {
        // Candle assumes a batch dimension, so when we don't have one we need
        // to pretend we do by un- and resqueezing the state tensor.
        self.actor.forward(&state.detach().unsqueeze(0)?)?.squeeze(0)
    }

    fn learn(&mut self) -> Result<()> {
        let (states, actions, rewards, next_states, dones) =
            match self.replay_buffer.sample(self.batch_size)? {
                Some(batch) => batch,
                None => {
                    return Err(Error::Msg(
                        "cannot learn from an empty replay buffer".to_string(),
                    ))
                }
            };

        // the target networks bootstrap the value of the next state, with no
        // gradient flowing through them and no bootstrapping past a true
        // terminal transition
        let q_target = self
            .critic
            .target_forward(&next_states, &self.actor.target_forward(&next_states)?)?;
        let not_done = dones.affine(-1.0, 1.0)?;
        let q_target = (rewards + (self.gamma * (not_done * q_target)?)?.detach())?;

        let q = self.critic.forward(&states, &actions)?;
        let diff = (q_target - q)?;

        let critic_loss = diff.sqr()?.mean_all()?;
        self.critic_optim.backward_step(&critic_loss)?;

        // the critic only scores the actor here: its variables are not held
        // by actor_optim, so this step leaves them untouched
        let actor_loss = self
            .critic
            .forward(&states, &self.actor.forward(&states)?)?
            .mean_all()?
            .neg()?;
        self.actor_optim.backward_step(&actor_loss)?;

        self.critic.track(self.tau)?;
        self.actor.track(self.tau)?;

        Ok(())
    }
}

impl OffPolicyAlgorithm for DDPG<'_> {
    fn remember(
        &mut self,
        state: &Tensor,
        action: &Tensor,
        reward: &Tensor,
        next_state: &Tensor,
        done: &Tensor,
    ) {
        info!(
            concat!(
                "\nPushing to replay buffer:",
                "\n{state:?}",
                "\n{action:?}",
                "\n{reward:?}",
                "\n{next_state:?}",
            ),
            state = state,
            action = action,
            reward = reward,
            next_state = next_state,
        );
        self.replay_buffer
            .store(state, action, reward, next_state, done)
    }

    fn replay_buffer(&self) -> &ReplayBuffer {
        &self.replay_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_actor() -> Actor<'static> {
        Actor::new(
            &Device::Cpu,
            DType::F64,
            &[(2, 4), (4, 4), (4, 1)],
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_targets_start_as_exact_copies() {
        let actor = small_actor();

        for (i, &(in_dim, out_dim)) in actor.dims.iter().enumerate() {
            let live = actor
                .vb
                .get((out_dim, in_dim), &format!("actor-fc{i}.weight"))
                .unwrap();
            let target = actor
                .vb
                .get((out_dim, in_dim), &format!("target-actor-fc{i}.weight"))
                .unwrap();
            assert_eq!(
                live.to_vec2::<f64>().unwrap(),
                target.to_vec2::<f64>().unwrap(),
            );
        }
    }

    #[test]
    fn test_track_blends_target_weights() {
        let mut actor = small_actor();
        let tau = 0.25;

        let target_old = actor
            .vb
            .get((4, 2), "target-actor-fc0.weight")
            .unwrap()
            .copy()
            .unwrap();
        let live = Tensor::ones((4, 2), DType::F64, &Device::Cpu).unwrap();
        actor.varmap.set_one("actor-fc0.weight", &live).unwrap();

        actor.track(tau).unwrap();

        let target_new = actor.vb.get((4, 2), "target-actor-fc0.weight").unwrap();
        let expected = ((tau * live).unwrap() + ((1.0 - tau) * target_old).unwrap()).unwrap();

        let got = target_new.flatten_all().unwrap().to_vec1::<f64>().unwrap();
        let want = expected.flatten_all().unwrap().to_vec1::<f64>().unwrap();
        for (g, w) in got.iter().zip(want.iter()) {
            assert!((g - w).abs() < 1e-12);
        }
    }

    #[test]
    fn test_actor_output_is_bounded() {
        let actor = small_actor();

        for state in [[0.0, 0.0], [1.0, 500.0], [-3.0, 1e6]] {
            let state = Tensor::new(&state, &Device::Cpu).unwrap().unsqueeze(0).unwrap();
            let action = actor.forward(&state).unwrap();
            for value in action.flatten_all().unwrap().to_vec1::<f64>().unwrap() {
                assert!(value.abs() <= 2.0);
            }
        }
    }

    #[test]
    fn test_saturated_actor_outputs_exactly_max_action() {
        let mut actor = small_actor();
        let device = Device::Cpu;

        // zero everything, then push the output layer bias deep into tanh
        // saturation so the raw output is exactly 1.0
        let dims = actor.dims.clone();
        for (i, &(in_dim, out_dim)) in dims.iter().enumerate() {
            actor
                .varmap
                .set_one(
                    format!("actor-fc{i}.weight"),
                    Tensor::zeros((out_dim, in_dim), DType::F64, &device).unwrap(),
                )
                .unwrap();
            actor
                .varmap
                .set_one(
                    format!("actor-fc{i}.bias"),
                    Tensor::zeros(out_dim, DType::F64, &device).unwrap(),
                )
                .unwrap();
        }
        actor
            .varmap
            .set_one(
                "actor-fc2.bias",
                Tensor::full(50.0f64, 1, &device).unwrap(),
            )
            .unwrap();

        let state = Tensor::new(&[0.3, 700.0], &device).unwrap().unsqueeze(0).unwrap();
        let action = actor.forward(&state).unwrap();
        assert_eq!(action.flatten_all().unwrap().to_vec1::<f64>().unwrap(), vec![2.0]);
    }

    #[test]
    fn test_learn_on_empty_buffer_is_fatal() {
        let mut agent = DDPG::new(
            &Device::Cpu,
            DDPG_Config::new(1e-3, 1e-3, 0.99, 0.005, 8, 100, 4),
            2,
            1,
            2.0,
        )
        .unwrap();

        assert!(agent.learn().is_err());
    }

    #[test]
    fn test_learn_after_remember() {
        let device = Device::Cpu;
        let mut agent = DDPG::new(
            &device,
            DDPG_Config::new(1e-3, 1e-3, 0.99, 0.005, 8, 100, 4),
            2,
            1,
            2.0,
        )
        .unwrap();

        for i in 0..4 {
            let state = Tensor::new(vec![i as f64, 0.5], &device).unwrap();
            let action = Tensor::new(vec![0.1 * i as f64], &device).unwrap();
            let reward = Tensor::new(vec![1.0f64], &device).unwrap();
            let next_state = Tensor::new(vec![i as f64 + 1.0, 0.5], &device).unwrap();
            let done = Tensor::new(vec![0.0f64], &device).unwrap();
            agent.remember(&state, &action, &reward, &next_state, &done);
        }

        assert_eq!(agent.replay_buffer().size(), 4);
        agent.learn().unwrap();

        let state = Tensor::new(vec![0.5, 0.5], &device).unwrap();
        let action = agent.choose_action(&state).unwrap();
        assert_eq!(action.dims(), &[1]);
        assert!(action.to_vec1::<f64>().unwrap()[0].abs() <= 2.0);
    }
}
