mod experiment;
mod train;

pub use {
    experiment::run_experiment_off_policy,
    train::{
        died_early,
        evaluate_policy,
        training_loop_off_policy,
    },
};
