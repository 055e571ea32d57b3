use crate::error::CoreError;

/// Returns the index of the maximum value; ties go to the lowest index.
///
/// `values` must not be empty.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Epsilon-greedy action selection.
pub struct EpsGreedy {
    rng: fastrand::Rng,
}

impl EpsGreedy {
    /// Constructs the selector with a random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Takes a uniformly random action with probability `eps`, otherwise the
    /// action with the largest value.
    pub fn select(&mut self, values: &[f32], eps: f64) -> Result<usize, CoreError> {
        if values.is_empty() {
            return Err(CoreError::EmptyActionValues);
        }

        if self.rng.f64() < eps {
            Ok(self.rng.usize(..values.len()))
        } else {
            Ok(argmax(values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_occurrence() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9, 0.2]), 1);
        assert_eq!(argmax(&[3.0]), 0);
        assert_eq!(argmax(&[-1.0, -1.0]), 0);
        assert_eq!(argmax(&[-2.0, -1.0, -3.0]), 1);
    }

    #[test]
    fn test_eps_one_covers_all_actions() {
        let mut explorer = EpsGreedy::new(0);
        let values = [0.0, 10.0, 0.0, 0.0];
        let mut counts = [0usize; 4];
        for _ in 0..1000 {
            counts[explorer.select(&values, 1.0).unwrap()] += 1;
        }
        assert!(counts.iter().all(|&c| c > 0));
    }

    #[test]
    fn test_empty_values() {
        let mut explorer = EpsGreedy::new(0);
        assert_eq!(
            explorer.select(&[], 0.5).unwrap_err(),
            CoreError::EmptyActionValues
        );
    }
}
