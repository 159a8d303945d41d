mod action;
mod cannon_env;
mod config;
mod observation;

pub use {
    action::CannonAction,
    cannon_env::CannonEnv,
    config::CannonConfig,
    observation::CannonObs,
};
