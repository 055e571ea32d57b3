mod args;
mod config;
mod types;
use anyhow::{bail, Result};
use args::Args;
use arcade_core::{
    record::FileRecorder, Agent as _, Env as _, Evaluator as _, Trainer,
};
use clap::Parser;
use config::ArcadeConfig;
use log::info;
use std::path::PathBuf;
use types::*;

fn create_agent(config: &ArcadeConfig) -> Result<DqnAgent> {
    let mut env = Env::build(&config.env_config(), config.seed)?;
    let input_dim = env.reset()?.len() * config.memory_config.window_length;
    let model_config = config
        .agent_config
        .model_config
        .clone()
        .input_dim(input_dim)
        .n_actions(env.n_actions());
    info!(
        "Actions: {:?}, input dimension: {}",
        env.action_meanings(),
        input_dim
    );
    let agent_config = config.agent_config.clone().model_config(model_config);
    DqnAgent::build(&agent_config)
}

fn train(config: &ArcadeConfig) -> Result<()> {
    let paths = config.paths();
    paths.create_dirs()?;
    config.save(paths.instance_dir().join("config.yaml"))?;

    let mut agent = create_agent(config)?;
    let mut trainer = Trainer::<Env>::build(
        config.trainer_config.clone(),
        config.env_config(),
        config.memory_config.clone(),
    )?
    .paths(paths.clone());
    let mut recorder = FileRecorder::new(paths.log_path());

    trainer.train(&mut agent, &mut recorder)?;

    Ok(())
}

fn test(config: &ArcadeConfig, weights: Option<&str>) -> Result<()> {
    let mut agent = create_agent(config)?;
    let path = match weights {
        Some(path) => PathBuf::from(path),
        None => config.paths().finished_weights_path(),
    };
    agent.load_params(&path)?;
    agent.eval();

    let mut evaluator = Evaluator::new(
        &config.env_config(),
        config.seed,
        config.test_episodes,
        config.memory_config.window_length,
    )?;
    let record = evaluator.evaluate(&mut agent)?;
    info!(
        "Mean episode reward over {} episodes: {}",
        config.test_episodes,
        record.get_scalar("episode_reward")?
    );

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = ArcadeConfig::from_args(&args)?;
    config.validate()?;

    match args.mode.as_str() {
        "train" => {
            train(&config)?;
            test(&config, args.weights.as_deref())?;
        }
        "test" => test(&config, args.weights.as_deref())?,
        "show_config" => println!("{}", serde_yaml::to_string(&config)?),
        mode => bail!("mode must be 'train', 'test' or 'show_config', got {:?}", mode),
    }

    Ok(())
}
