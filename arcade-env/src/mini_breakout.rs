//! A small Breakout-like game.
mod config;
use anyhow::{anyhow, Result};
use arcade_core::{record::Record, Env, Frame, Step};
pub use config::MiniBreakoutConfig;
use log::debug;
use ndarray::IxDyn;
use rand::{rngs::StdRng, Rng, SeedableRng};

const PADDLE: [u8; 3] = [200, 72, 72];
const BALL: [u8; 3] = [236, 236, 236];
const BRICKS: [[u8; 3]; 6] = [
    [200, 72, 72],
    [198, 108, 58],
    [180, 122, 48],
    [162, 162, 42],
    [72, 160, 72],
    [66, 72, 200],
];

/// Actions of [`MiniBreakout`], in the order of the Atari Breakout action set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiniBreakoutAction {
    /// Do nothing.
    Noop,
    /// Launch the ball.
    Fire,
    /// Move the paddle one cell to the right.
    Right,
    /// Move the paddle one cell to the left.
    Left,
}

impl MiniBreakoutAction {
    /// All actions, indexed by their action index.
    pub const ALL: [Self; 4] = [Self::Noop, Self::Fire, Self::Right, Self::Left];

    /// Name of the action.
    pub fn meaning(&self) -> &'static str {
        match self {
            Self::Noop => "NOOP",
            Self::Fire => "FIRE",
            Self::Right => "RIGHT",
            Self::Left => "LEFT",
        }
    }
}

impl TryFrom<usize> for MiniBreakoutAction {
    type Error = anyhow::Error;

    fn try_from(value: usize) -> Result<Self> {
        Self::ALL
            .get(value)
            .copied()
            .ok_or_else(|| anyhow!("Action index {} out of range", value))
    }
}

/// A paddle, a ball and a wall of bricks on a grid of cells.
///
/// The ball sits on the paddle until [`Fire`](MiniBreakoutAction::Fire)
/// launches it diagonally upwards, to the left or right at random. It moves
/// one cell per step in both directions and bounces off the side walls, the
/// top wall, the bricks and the paddle. Each destroyed brick gives a reward of
/// 1. The episode ends when the paddle misses the ball, when all bricks are
/// destroyed or after `max_steps` steps.
///
/// Observations are RGB frames of `[height, width, 3] * pixel_scale` pixels.
pub struct MiniBreakout {
    config: MiniBreakoutConfig,
    rng: StdRng,
    bricks: Vec<bool>,
    paddle_x: usize,
    ball: (isize, isize),
    velocity: (isize, isize),
    launched: bool,
    steps: usize,
}

impl MiniBreakout {
    /// The configuration of the game.
    pub fn config(&self) -> &MiniBreakoutConfig {
        &self.config
    }

    /// Number of bricks not destroyed yet.
    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|&&b| b).count()
    }

    /// Leftmost column of the paddle.
    pub fn paddle_x(&self) -> usize {
        self.paddle_x
    }

    /// Column and row of the ball.
    pub fn ball(&self) -> (isize, isize) {
        self.ball
    }

    fn paddle_row(&self) -> isize {
        self.config.height as isize - 1
    }

    fn brick_index(&self, x: isize, y: isize) -> Option<usize> {
        let row = y - 1;
        if row >= 0 && (row as usize) < self.config.brick_rows && x >= 0 {
            Some(row as usize * self.config.width + x as usize)
        } else {
            None
        }
    }

    fn ball_on_paddle(&self) -> (isize, isize) {
        let x = self.paddle_x + self.config.paddle_width / 2;
        (x as isize, self.paddle_row() - 1)
    }

    fn move_paddle(&mut self, act: MiniBreakoutAction) {
        let max_x = self.config.width - self.config.paddle_width;
        match act {
            MiniBreakoutAction::Right => self.paddle_x = (self.paddle_x + 1).min(max_x),
            MiniBreakoutAction::Left => self.paddle_x = self.paddle_x.saturating_sub(1),
            _ => {}
        }
    }

    /// Moves the ball one cell. Returns the reward and if the ball was missed.
    fn move_ball(&mut self) -> (f32, bool) {
        let (x, y) = self.ball;
        let (mut dx, mut dy) = self.velocity;

        let mut nx = x + dx;
        if nx < 0 || nx >= self.config.width as isize {
            dx = -dx;
            nx = x + dx;
        }
        let mut ny = y + dy;
        if ny < 0 {
            dy = -dy;
            ny = y + dy;
        }

        let mut reward = 0.0;
        let mut missed = false;
        if let Some(ix) = self.brick_index(nx, ny).filter(|&ix| self.bricks[ix]) {
            // The ball bounces back from its current cell, which holds no brick.
            self.bricks[ix] = false;
            reward = 1.0;
            dy = -dy;
            nx = x;
            ny = y;
        } else if ny == self.paddle_row() {
            let left = self.paddle_x as isize;
            let right = left + self.config.paddle_width as isize;
            if (left..right).contains(&nx) {
                dy = -dy;
                ny = y;
            } else {
                missed = true;
            }
        }

        self.ball = (nx, ny);
        self.velocity = (dx, dy);
        (reward, missed)
    }

    fn render(&self) -> Frame {
        let s = self.config.pixel_scale;
        let (w, h) = (self.config.width, self.config.height);
        // Black background.
        let mut frame = Frame::zeros(IxDyn(&[h * s, w * s, 3]));

        let mut fill = |x: usize, y: usize, rgb: [u8; 3]| {
            for py in y * s..(y + 1) * s {
                for px in x * s..(x + 1) * s {
                    for (c, &v) in rgb.iter().enumerate() {
                        frame[&[py, px, c][..]] = v;
                    }
                }
            }
        };

        for (ix, _) in self.bricks.iter().enumerate().filter(|&(_, &b)| b) {
            let (x, y) = (ix % w, ix / w);
            fill(x, y + 1, BRICKS[y % BRICKS.len()]);
        }
        for x in self.paddle_x..self.paddle_x + self.config.paddle_width {
            fill(x, h - 1, PADDLE);
        }
        let (bx, by) = self.ball;
        if bx >= 0 && by >= 0 && (bx as usize) < w && (by as usize) < h {
            fill(bx as usize, by as usize, BALL);
        }
        frame
    }
}

impl Env for MiniBreakout {
    type Config = MiniBreakoutConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        config.validate()?;
        let mut env = Self {
            config: config.clone(),
            rng: StdRng::seed_from_u64(seed as u64),
            bricks: vec![],
            paddle_x: 0,
            ball: (0, 0),
            velocity: (0, 0),
            launched: false,
            steps: 0,
        };
        env.reset()?;
        Ok(env)
    }

    fn reset(&mut self) -> Result<Frame> {
        self.bricks = vec![true; self.config.width * self.config.brick_rows];
        self.paddle_x = (self.config.width - self.config.paddle_width) / 2;
        self.ball = self.ball_on_paddle();
        self.velocity = (0, 0);
        self.launched = false;
        self.steps = 0;
        Ok(self.render())
    }

    fn step(&mut self, act: usize) -> Result<(Step, Record)> {
        let action = MiniBreakoutAction::try_from(act)?;
        self.move_paddle(action);

        let (reward, missed) = if self.launched {
            self.move_ball()
        } else {
            self.ball = self.ball_on_paddle();
            if action == MiniBreakoutAction::Fire {
                let dx = if self.rng.gen::<bool>() { 1 } else { -1 };
                self.velocity = (dx, -1);
                self.launched = true;
            }
            (0.0, false)
        };
        self.steps += 1;

        let cleared = self.bricks_left() == 0;
        let is_terminal = missed || cleared || self.steps >= self.config.max_steps;
        if is_terminal {
            debug!(
                "Episode ended after {} steps (missed: {}, cleared: {})",
                self.steps, missed, cleared
            );
        }

        let step = Step::new(act, self.render(), reward, is_terminal);
        Ok((step, Record::empty()))
    }

    fn n_actions(&self) -> usize {
        MiniBreakoutAction::ALL.len()
    }

    fn action_meanings(&self) -> Vec<String> {
        MiniBreakoutAction::ALL
            .iter()
            .map(|a| a.meaning().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOOP: usize = 0;
    const FIRE: usize = 1;
    const RIGHT: usize = 2;
    const LEFT: usize = 3;

    #[test]
    fn test_frame_shape() -> Result<()> {
        let config = MiniBreakoutConfig::default().size(6, 8).pixel_scale(3);
        let mut env = MiniBreakout::build(&config, 0)?;
        assert_eq!(env.reset()?.shape(), &[24, 18, 3]);
        let (step, _) = env.step(NOOP)?;
        assert_eq!(step.obs.shape(), &[24, 18, 3]);
        assert_eq!(env.n_actions(), 4);
        assert_eq!(env.action_meanings(), vec!["NOOP", "FIRE", "RIGHT", "LEFT"]);
        assert!(env.step(4).is_err());
        Ok(())
    }

    #[test]
    fn test_paddle_bounds() -> Result<()> {
        let config = MiniBreakoutConfig::default().size(8, 8).paddle_width(3);
        let mut env = MiniBreakout::build(&config, 0)?;
        for _ in 0..10 {
            env.step(LEFT)?;
        }
        assert_eq!(env.paddle_x(), 0);
        assert_eq!(env.ball(), (1, 6));
        for _ in 0..10 {
            env.step(RIGHT)?;
        }
        assert_eq!(env.paddle_x(), 5);
        assert_eq!(env.ball(), (6, 6));
        Ok(())
    }

    #[test]
    fn test_timeout_without_fire() -> Result<()> {
        let config = MiniBreakoutConfig::default().max_steps(20);
        let mut env = MiniBreakout::build(&config, 0)?;
        for t in 1..=20 {
            let (step, _) = env.step(NOOP)?;
            assert_eq!(step.reward, 0.0);
            assert_eq!(step.is_terminal, t == 20);
        }
        Ok(())
    }

    #[test]
    fn test_miss_ends_episode() -> Result<()> {
        let config = MiniBreakoutConfig::default()
            .size(8, 6)
            .brick_rows(1)
            .paddle_width(1);

        for seed in 0..4 {
            let mut env = MiniBreakout::build(&config, seed)?;
            let (step, _) = env.step(FIRE)?;
            assert!(!step.is_terminal);

            let mut total_reward = 0.0;
            let mut n_steps = 1;
            loop {
                let (step, _) = env.step(LEFT)?;
                total_reward += step.reward;
                n_steps += 1;
                if step.is_terminal {
                    break;
                }
            }
            assert_eq!(total_reward, 1.0);
            assert_eq!(n_steps, 7);
            assert_eq!(env.bricks_left(), 7);
        }
        Ok(())
    }

    #[test]
    fn test_clear_all_bricks() -> Result<()> {
        let config = MiniBreakoutConfig::default()
            .size(2, 4)
            .brick_rows(1)
            .paddle_width(2)
            .max_steps(100);

        for seed in 0..4 {
            let mut env = MiniBreakout::build(&config, seed)?;
            let mut total_reward = 0.0;
            let mut act = FIRE;
            loop {
                let (step, _) = env.step(act)?;
                total_reward += step.reward;
                act = NOOP;
                if step.is_terminal {
                    break;
                }
            }
            assert_eq!(total_reward, 2.0);
            assert_eq!(env.bricks_left(), 0);
        }
        Ok(())
    }

    #[test]
    fn test_ball_never_enters_a_brick() -> Result<()> {
        let config = MiniBreakoutConfig::default().max_steps(500);
        for seed in 0..8 {
            let mut env = MiniBreakout::build(&config, seed)?;
            let mut bricks_hit = 0.0;
            for _ in 0..2000 {
                let center = (env.paddle_x() + config.paddle_width / 2) as isize;
                let act = match env.ball().0.cmp(&center) {
                    std::cmp::Ordering::Greater => RIGHT,
                    std::cmp::Ordering::Less => LEFT,
                    std::cmp::Ordering::Equal => FIRE,
                };
                let bricks_before = env.bricks_left();
                let (step, _) = env.step(act)?;
                assert_eq!(step.reward, (bricks_before - env.bricks_left()) as f32);
                bricks_hit += step.reward;

                let (x, y) = env.ball();
                if let Some(ix) = env.brick_index(x, y) {
                    assert!(!env.bricks[ix], "ball inside a brick at ({}, {})", x, y);
                }
                if step.is_terminal {
                    env.reset()?;
                }
            }
            assert!(bricks_hit > 0.0);
        }
        Ok(())
    }

    #[test]
    fn test_same_seed_same_episode() -> Result<()> {
        let config = MiniBreakoutConfig::default();
        let mut env1 = MiniBreakout::build(&config, 7)?;
        let mut env2 = MiniBreakout::build(&config, 7)?;
        for t in 0..50 {
            let act = if t == 0 { FIRE } else { t % 4 };
            let (s1, _) = env1.step(act)?;
            let (s2, _) = env2.step(act)?;
            assert_eq!(s1.obs, s2.obs);
            assert_eq!(s1.reward, s2.reward);
            if s1.is_terminal {
                break;
            }
        }
        Ok(())
    }
}
