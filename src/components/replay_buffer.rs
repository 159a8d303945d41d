use {
    candle_core::{
        Result,
        Tensor,
    },
    rand::{
        distributions::Uniform,
        thread_rng,
        Rng,
    },
    std::collections::VecDeque,
    unzip_n::unzip_n,
};

unzip_n!(5);

/// A transition in the replay buffer.
///
/// # Fields
///
/// * `state` - The state tensor.
/// * `action` - The action tensor.
/// * `reward` - The reward tensor.
/// * `next_state` - The next state tensor.
/// * `done` - The done tensor, 1.0 when the episode ended before its time
///   limit (so bootstrapping is suppressed) and 0.0 otherwise.
#[derive(Clone)]
struct Transition {
    state: Tensor,
    action: Tensor,
    reward: Tensor,
    next_state: Tensor,
    done: Tensor,
}
impl Transition {
    fn new(
        state: &Tensor,
        action: &Tensor,
        reward: &Tensor,
        next_state: &Tensor,
        done: &Tensor,
    ) -> Self {
        Self {
            state: state.clone(),
            action: action.clone(),
            reward: reward.clone(),
            next_state: next_state.clone(),
            done: done.clone(),
        }
    }
}

/// A replay buffer for off-policy algorithms.
///
/// The replay buffer is implemented as a simple ring buffer / VecDeque:
/// once full, every store overwrites the oldest transition.
#[derive(Clone)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
    size: usize,
}
impl ReplayBuffer {
    /// Create a new replay buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            size: 0,
        }
    }

    /// The number of valid transitions in the buffer.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if the buffer is full.
    pub fn is_full(&self) -> bool {
        self.size == self.capacity
    }

    /// Store a transition in the buffer.
    ///
    /// If the buffer is full, the oldest transition is removed to make room
    /// for the new transition.
    pub fn store(
        &mut self,
        state: &Tensor,
        action: &Tensor,
        reward: &Tensor,
        next_state: &Tensor,
        done: &Tensor,
    ) {
        if self.size == self.capacity {
            self.buffer.pop_front();
        } else {
            self.size += 1;
        }
        self.buffer
            .push_back(Transition::new(state, action, reward, next_state, done));
    }

    /// Sample a random batch of transitions from the buffer.
    ///
    /// Indices are drawn independently and uniformly **with replacement**
    /// from the valid entries, so any batch size works as soon as a single
    /// transition is stored. Sampling never mutates the buffer.
    ///
    /// When the buffer is empty, `None` is returned; the caller is expected
    /// to treat that as a fatal precondition violation.
    #[allow(clippy::type_complexity)]
    pub fn sample(
        &self,
        batch_size: usize,
    ) -> Result<Option<(Tensor, Tensor, Tensor, Tensor, Tensor)>> {
        if self.size == 0 {
            Ok(None)
        } else {
            let transition_to_tuple =
                |t: &Transition| -> Result<(Tensor, Tensor, Tensor, Tensor, Tensor)> {
                    Ok((
                        t.state.unsqueeze(0)?,
                        t.action.unsqueeze(0)?,
                        t.reward.unsqueeze(0)?,
                        t.next_state.unsqueeze(0)?,
                        t.done.unsqueeze(0)?,
                    ))
                };

            let transitions: Vec<&Transition> = thread_rng()
                .sample_iter(Uniform::from(0..self.size))
                .take(batch_size)
                .map(|i| self.buffer.get(i).unwrap())
                .collect();

            let (states, actions, rewards, next_states, dones) = transitions
                .into_iter()
                .map(transition_to_tuple)
                .collect::<Result<Vec<(Tensor, Tensor, Tensor, Tensor, Tensor)>>>()?
                .into_iter()
                .unzip_n_vec();

            Ok(Some((
                Tensor::cat(&states, 0)?,
                Tensor::cat(&actions, 0)?,
                Tensor::cat(&rewards, 0)?,
                Tensor::cat(&next_states, 0)?,
                Tensor::cat(&dones, 0)?,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        candle_core::Device,
    };

    fn tagged_transition(tag: f64) -> (Tensor, Tensor, Tensor, Tensor, Tensor) {
        let device = Device::Cpu;
        (
            Tensor::new(vec![tag, tag], &device).unwrap(),
            Tensor::new(vec![tag], &device).unwrap(),
            Tensor::new(vec![tag], &device).unwrap(),
            Tensor::new(vec![tag, tag], &device).unwrap(),
            Tensor::new(vec![0.0f64], &device).unwrap(),
        )
    }

    #[test]
    fn test_ring_saturates_and_overwrites_oldest() {
        let mut buffer = ReplayBuffer::new(10);

        for tag in 0..15 {
            let (s, a, r, s_next, done) = tagged_transition(tag as f64);
            buffer.store(&s, &a, &r, &s_next, &done);
            assert!(buffer.size() <= 10);
        }

        assert_eq!(buffer.size(), 10);
        assert!(buffer.is_full());

        // tags 0..4 were overwritten in insertion order
        let tags: Vec<f64> = buffer
            .buffer
            .iter()
            .map(|t| t.reward.to_vec1::<f64>().unwrap()[0])
            .collect();
        assert_eq!(tags, (5..15).map(|t| t as f64).collect::<Vec<f64>>());
    }

    #[test]
    fn test_sample_returns_exactly_batch_size() {
        let mut buffer = ReplayBuffer::new(10);
        for tag in 0..3 {
            let (s, a, r, s_next, done) = tagged_transition(tag as f64);
            buffer.store(&s, &a, &r, &s_next, &done);
        }

        // with replacement, a batch larger than the buffer is fine
        let (states, actions, rewards, next_states, dones) =
            buffer.sample(8).unwrap().unwrap();

        assert_eq!(states.dims(), &[8, 2]);
        assert_eq!(actions.dims(), &[8, 1]);
        assert_eq!(rewards.dims(), &[8, 1]);
        assert_eq!(next_states.dims(), &[8, 2]);
        assert_eq!(dones.dims(), &[8, 1]);

        for row in rewards.to_vec2::<f64>().unwrap() {
            assert!(row[0] >= 0.0 && row[0] < 3.0);
        }
    }

    #[test]
    fn test_sample_never_returns_overwritten_entries() {
        let mut buffer = ReplayBuffer::new(10);
        for tag in 0..15 {
            let (s, a, r, s_next, done) = tagged_transition(tag as f64);
            buffer.store(&s, &a, &r, &s_next, &done);
        }

        let (_, _, rewards, _, _) = buffer.sample(64).unwrap().unwrap();
        for row in rewards.to_vec2::<f64>().unwrap() {
            assert!(row[0] >= 5.0);
        }
    }

    #[test]
    fn test_sample_empty_buffer_is_none() {
        let buffer = ReplayBuffer::new(10);
        assert!(buffer.sample(4).unwrap().is_none());
    }
}
