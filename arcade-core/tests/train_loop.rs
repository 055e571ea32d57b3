use anyhow::Result;
use arcade_core::{
    record::{BufferedRecorder, FileRecorder, Record, RecordValue},
    Agent, DefaultEvaluator, Env, Evaluator, ExperienceBufferBase, Frame, Policy,
    ReplayBufferBase, RunPaths, Sampler, SequentialMemory, SequentialMemoryConfig, StackedObs,
    Step, Trainer, TrainerConfig,
};
use ndarray::IxDyn;
use std::{fs, path::Path};
use tempdir::TempDir;
use test_log::test;

fn frame(v: usize) -> Frame {
    Frame::from_elem(IxDyn(&[2, 2, 1]), v as u8)
}

#[derive(Clone)]
struct CountEnvConfig {
    episode_len: usize,
}

/// Observation `t + 1` at time `t`, reward 1 per step.
struct CountEnv {
    t: usize,
    episode_len: usize,
}

impl Env for CountEnv {
    type Config = CountEnvConfig;

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            t: 0,
            episode_len: config.episode_len,
        })
    }

    fn reset(&mut self) -> Result<Frame> {
        self.t = 0;
        Ok(frame(1))
    }

    fn step(&mut self, act: usize) -> Result<(Step, Record)> {
        self.t += 1;
        let is_terminal = self.t == self.episode_len;
        let step = Step::new(act, frame(self.t + 1), 1.0, is_terminal);
        Ok((step, Record::empty()))
    }

    fn n_actions(&self) -> usize {
        2
    }
}

#[derive(Default)]
struct CountAgent {
    train: bool,
    n_opts: usize,
    states: Vec<StackedObs>,
}

impl Policy for CountAgent {
    fn sample(&mut self, state: &StackedObs) -> Result<usize> {
        self.states.push(state.clone());
        Ok(0)
    }
}

impl Agent<SequentialMemory> for CountAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt(&mut self, buffer: &mut SequentialMemory) -> Result<Option<Record>> {
        let batch = buffer.batch(4)?;
        assert_eq!(batch.len(), 4);
        self.n_opts += 1;
        Ok(Some(Record::from_scalar("loss", self.n_opts as f32)))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(path.join("params.txt"), self.n_opts.to_string())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.n_opts = fs::read_to_string(path.join("params.txt"))?.parse()?;
        Ok(())
    }
}

#[test]
fn test_sampler_transitions() -> Result<()> {
    let config = SequentialMemoryConfig::default().capacity(10).window_length(2);
    let mut memory = SequentialMemory::build(&config)?;
    let env = CountEnv::build(&CountEnvConfig { episode_len: 4 }, 0)?;
    let mut sampler = Sampler::new(env, 2);
    let mut agent = CountAgent::default();

    let mut records = vec![];
    for _ in 0..6 {
        records.push(sampler.sample_and_push(&mut agent, &mut memory)?);
    }

    assert_eq!(memory.len(), 6);
    let obs = memory.iter().map(|tr| tr.obs[&[0, 0, 0][..]]).collect::<Vec<_>>();
    assert_eq!(obs, vec![1, 2, 3, 4, 1, 2]);
    let terminal = memory.iter().map(|tr| tr.is_terminal).collect::<Vec<_>>();
    assert_eq!(terminal, vec![false, false, false, true, false, false]);

    assert_eq!(records[3].get_scalar("episode_reward")?, 4.0);
    assert_eq!(records[3].get_scalar("episode_steps")?, 4.0);
    assert!(records[4].is_empty());
    assert_eq!(sampler.n_episodes(), 1);

    // The policy sees zero frames before the first observation of an episode.
    assert_eq!(agent.states[0].frames(), &[frame(0), frame(1)]);
    assert_eq!(agent.states[3].frames(), &[frame(3), frame(4)]);
    assert_eq!(agent.states[4].frames(), &[frame(0), frame(1)]);
    Ok(())
}

#[test]
fn test_train_loop() -> Result<()> {
    let dir = TempDir::new("train_loop")?;
    let paths = RunPaths::new(dir.path(), "count", 20);
    paths.create_dirs()?;

    let config = TrainerConfig::default()
        .nb_steps(20)
        .warmup_steps(5)
        .train_interval(2)
        .log_interval(10)
        .checkpoint_interval(10);
    let memory_config = SequentialMemoryConfig::default().capacity(8).window_length(3);
    let mut trainer =
        Trainer::<CountEnv>::build(config, CountEnvConfig { episode_len: 4 }, memory_config)?
            .paths(paths.clone());
    let mut agent = CountAgent::default();
    let mut recorder = FileRecorder::new(paths.log_path());

    let opt_steps = trainer.train(&mut agent, &mut recorder)?;

    // Optimization at env steps 6, 8, ..., 20.
    assert_eq!(opt_steps, 8);
    assert_eq!(agent.n_opts, 8);
    assert!(agent.is_train());

    for step in [10, 20] {
        let text = fs::read_to_string(paths.checkpoint_path(step).join("params.txt"))?;
        assert_eq!(text, ((step - 4) / 2).to_string());
    }
    let mut loaded = CountAgent::default();
    loaded.load_params(&paths.finished_weights_path())?;
    assert_eq!(loaded.n_opts, 8);

    let text = fs::read_to_string(paths.log_path())?;
    let lines = text
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line))
        .collect::<Result<Vec<_>, _>>()?;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["env_steps"], 10.0);
    assert_eq!(lines[0]["loss_mean"], 2.0);
    assert_eq!(lines[0]["episode_reward_mean"], 4.0);
    assert_eq!(lines[1]["env_steps"], 20.0);
    assert_eq!(lines[1]["loss_max"], 8.0);
    Ok(())
}

#[test]
fn test_train_loop_flushes_last_partial_interval() -> Result<()> {
    let config = TrainerConfig::default()
        .nb_steps(15)
        .warmup_steps(5)
        .train_interval(1)
        .log_interval(10)
        .checkpoint_interval(10);
    let memory_config = SequentialMemoryConfig::default().capacity(8).window_length(3);
    let mut trainer =
        Trainer::<CountEnv>::build(config, CountEnvConfig { episode_len: 4 }, memory_config)?;
    let mut agent = CountAgent::default();
    let mut recorder = BufferedRecorder::new();

    assert_eq!(trainer.train(&mut agent, &mut recorder)?, 10);

    let records = recorder.iter().collect::<Vec<_>>();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_scalar("env_steps")?, 10.0);
    assert_eq!(records[0].get_scalar("loss_max")?, 5.0);
    assert_eq!(records[1].get_scalar("env_steps")?, 15.0);
    assert_eq!(records[1].get_scalar("loss_min")?, 6.0);
    assert_eq!(records[1].get_scalar("loss_max")?, 10.0);
    assert_eq!(records[1].get_scalar("episode_reward_mean")?, 4.0);
    Ok(())
}

#[test]
fn test_trainer_rejects_invalid_config() {
    let config = TrainerConfig::default().log_interval(0);
    let memory_config = SequentialMemoryConfig::default();
    assert!(
        Trainer::<CountEnv>::build(config, CountEnvConfig { episode_len: 4 }, memory_config)
            .is_err()
    );

    let memory_config = SequentialMemoryConfig::default().capacity(2).window_length(3);
    assert!(Trainer::<CountEnv>::build(
        TrainerConfig::default(),
        CountEnvConfig { episode_len: 4 },
        memory_config
    )
    .is_err());
}

#[test]
fn test_default_evaluator() -> Result<()> {
    let config = CountEnvConfig { episode_len: 5 };
    let mut evaluator = DefaultEvaluator::<CountEnv>::new(&config, 0, 3, 2)?;
    let mut agent = CountAgent::default();
    agent.eval();

    let record = evaluator.evaluate(&mut agent)?;
    assert_eq!(record.get_scalar("episode_reward")?, 5.0);
    assert_eq!(record.get_scalar("episode_reward_min")?, 5.0);
    assert_eq!(agent.states.len(), 15);
    assert_eq!(agent.states[5].frames(), &[frame(0), frame(1)]);
    assert!(matches!(
        record.get("episode_reward_max"),
        Some(RecordValue::Scalar(_))
    ));

    assert!(DefaultEvaluator::<CountEnv>::new(&config, 0, 0, 2).is_err());
    Ok(())
}

#[test]
fn test_memory_push_counts() -> Result<()> {
    let mut memory = SequentialMemory::build(&SequentialMemoryConfig::default().capacity(3))?;
    for t in 0..5 {
        memory.push(arcade_core::Transition::new(frame(t), 0, 0.0, false))?;
    }
    assert_eq!(ExperienceBufferBase::len(&memory), 3);
    Ok(())
}
