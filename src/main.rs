use {
    anyhow::Result,
    candle_core::Device,
    cannon_rl::{
        agents::{
            CrossEntropyMethod,
            DDPG,
        },
        configs::{
            CEM_Config,
            DDPG_Config,
            TrainConfig,
        },
        engines::run_experiment_off_policy,
        envs::{
            CannonConfig,
            CannonEnv,
            Environment,
        },
        logging::setup_logging,
    },
    clap::{
        Parser,
        ValueEnum,
    },
    tracing::Level,
};

#[derive(ValueEnum, Debug, Clone)]
enum Agent {
    Ddpg,
    Cem,
}

#[derive(ValueEnum, Debug, Clone)]
enum Loglevel {
    Error, // put these only during active debugging and then downgrade later
    Warn,  // main events in the program
    Info,  // all the little details
    None,  // don't log anything
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Setup logging
    #[arg(long, value_enum, default_value_t=Loglevel::Warn)]
    log: Loglevel,

    /// The learner to run on the cannon environment.
    #[arg(long, value_enum, default_value_t=Agent::Ddpg)]
    agent: Agent,

    /// The number of repeated, identical runs.
    #[arg(long, default_value_t = 1)]
    runs: usize,

    /// Directory (under data/) to write the results to.
    #[arg(long, default_value = "cannon")]
    output: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.log {
        Loglevel::Error => setup_logging(&"debug.log", Some(Level::ERROR), Some(Level::ERROR))?,
        Loglevel::Warn => setup_logging(&"debug.log", Some(Level::WARN), Some(Level::WARN))?,
        Loglevel::Info => setup_logging(&"debug.log", Some(Level::INFO), Some(Level::INFO))?,
        Loglevel::None => (),
    };

    let device = Device::Cpu;
    match args.agent {
        Agent::Ddpg => {
            run_experiment_off_policy::<DDPG, CannonEnv, _, _>(
                &args.output,
                args.runs,
                CannonConfig::default(),
                DDPG_Config::cannon(),
                TrainConfig::cannon(),
                &device,
            )?;
        }

        Agent::Cem => {
            let mut env = *CannonEnv::new(CannonConfig::default())?;
            let mut cem = CrossEntropyMethod::new(
                env.action_space().iter().product::<usize>(),
                CEM_Config::default(),
            );
            let mean = cem.optimize(&mut env)?;
            println!("Optimal launch speed found: {mean:?}");
        }
    }
    Ok(())
}
