use {
    super::train::training_loop_off_policy,
    crate::{
        agents::{
            Algorithm,
            OffPolicyAlgorithm,
        },
        configs::TrainConfig,
        envs::{
            action_bound,
            Environment,
            Sampleable,
            TensorConvertible,
        },
        util::write_config,
    },
    anyhow::{
        anyhow,
        Result,
    },
    candle_core::Device,
    polars::prelude::{
        DataFrame,
        NamedFrom,
        ParquetWriter,
        Series,
    },
    serde::Serialize,
    std::{
        fs::{
            create_dir_all,
            File,
        },
        path::Path,
    },
    tracing::warn,
};

/// Run a repeated training experiment with an off-policy algorithm.
///
/// Writes the environment, algorithm and training configs as RON files and
/// the evaluation returns of every repetition as parquet, under
/// `data/<path>/`. Refuses to touch a directory that already holds configs.
///
/// # Arguments
///
/// * `path` - The directory (under `data/`) the collected data is stored in.
/// * `n_repetitions` - The number of repeated, identical runs to perform.
/// * `env_config` - The configuration for the environment.
/// * `alg_config` - The configuration for the algorithm.
/// * `train_config` - The configuration for the training schedule.
/// * `device` - The device to run the experiment on.
pub fn run_experiment_off_policy<Alg, Env, Obs, Act>(
    path: &dyn AsRef<Path>,
    n_repetitions: usize,
    env_config: Env::Config,
    alg_config: Alg::Config,
    train_config: TrainConfig,
    device: &Device,
) -> Result<()>
where
    Env: Environment<Action = Act, Observation = Obs>,
    Env::Config: Clone + Serialize,
    Alg: Algorithm + OffPolicyAlgorithm,
    Alg::Config: Clone + Serialize,
    Obs: Clone + TensorConvertible,
    Act: Clone + TensorConvertible + Sampleable,
{
    let path = Path::new("data/").join(path);

    let alg_config_exists = path.join("config_algorithm.ron").try_exists()?;
    let env_config_exists = path.join("config_environment.ron").try_exists()?;
    if alg_config_exists || env_config_exists {
        Err(anyhow!(concat!(
            "Config files already exist in this directory!\n",
            "I am assuming I would be overwriting existing data!",
        )))?
    }

    create_dir_all(path.as_path())?;
    write_config(&alg_config, path.join("config_algorithm.ron"))?;
    write_config(&env_config, path.join("config_environment.ron"))?;
    write_config(&train_config, path.join("config_training.ron"))?;

    for n in 0..n_repetitions {
        warn!("Collecting data, run {n}/{n_repetitions}");

        let mut env = *Env::new(env_config.clone())?;
        let mut eval_env = *Env::new(env_config.clone())?;
        let mut agent = *Alg::from_config(
            device,
            &alg_config,
            env.observation_space().iter().product::<usize>(),
            env.action_space().iter().product::<usize>(),
            action_bound(&env.action_domain()),
        )?;

        let evaluations = training_loop_off_policy(
            &mut env,
            &mut eval_env,
            &mut agent,
            train_config.clone(),
            device,
        )?;

        let mut df = DataFrame::new(vec![Series::new(
            &format!("run_{n}_evaluations"),
            &evaluations,
        )])?;

        ParquetWriter::new(File::create(path.join(format!("run_{n}_data.parquet")))?)
            .finish(&mut df)?;
    }
    Ok(())
}
