mod cem;
mod ddpg;
mod train;

pub use {
    cem::CEM_Config,
    ddpg::DDPG_Config,
    train::TrainConfig,
};
