mod gaussian_noise;
mod replay_buffer;

pub use {
    gaussian_noise::GaussianNoise,
    replay_buffer::ReplayBuffer,
};
