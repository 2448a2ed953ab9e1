use rand::Rng;

use crate::{agent::Mode, assert_interval, error::Result, util};

use super::Choice;

/// Epsilon greedy exploration policy with a multiplicatively decaying epsilon
///
/// Epsilon never increases and never drops below its floor.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f32,
    floor: f32,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy from a starting epsilon and its floor
    ///
    /// **Errors** if `floor` is not in `[0,1]` or `epsilon` is not in `[floor,1]`
    pub fn new(epsilon: f32, floor: f32) -> Result<Self> {
        util::ensure_unit_from("epsilon_floor", floor, 0.0)?;
        util::ensure_unit_from("epsilon", epsilon, floor)?;
        Ok(Self { epsilon, floor })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Invoke the policy. Exploration is disabled entirely in [`Mode::Test`].
    pub fn choose<R: Rng>(&self, mode: Mode, rng: &mut R) -> Choice {
        let epsilon = match mode {
            Mode::Learning => self.epsilon,
            Mode::Test => 0.0,
        };
        if rng.gen::<f32>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Multiply epsilon by `factor`, clamping at the floor
    ///
    /// **Returns** the new epsilon
    ///
    /// **Panics** if `factor` is not in the interval `(0,1]`
    pub fn decay(&mut self, factor: f32) -> f32 {
        assert_interval!(factor, 0.0, 1.0);
        self.epsilon = (self.epsilon * factor).max(self.floor);
        self.epsilon
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn rejects_invalid_parameters() {
        assert!(EpsilonGreedy::new(1.0, 0.01).is_ok());
        assert!(EpsilonGreedy::new(0.0, 0.0).is_ok());
        assert!(EpsilonGreedy::new(1.2, 0.01).is_err());
        assert!(
            EpsilonGreedy::new(0.005, 0.01).is_err(),
            "Epsilon must start at or above its floor"
        );
        assert!(EpsilonGreedy::new(0.5, -0.1).is_err());
    }

    #[test]
    fn decay_is_monotonic_and_floored() {
        let mut policy = EpsilonGreedy::new(1.0, 0.01).unwrap();
        let mut last = policy.epsilon();
        for _ in 0..1000 {
            let next = policy.decay(0.95);
            assert!(next <= last, "Epsilon never increases");
            assert!(next >= 0.01, "Epsilon never drops below the floor");
            last = next;
        }
        assert_eq!(policy.epsilon(), 0.01, "Epsilon settles at the floor");
    }

    #[test]
    fn decay_multiplies() {
        let mut policy = EpsilonGreedy::new(0.8, 0.0).unwrap();
        assert_eq!(policy.decay(0.5), 0.4);
        assert_eq!(policy.decay(1.0), 0.4, "A factor of one leaves epsilon unchanged");
    }

    #[test]
    #[should_panic]
    fn decay_rejects_growth() {
        let mut policy = EpsilonGreedy::new(0.5, 0.0).unwrap();
        policy.decay(1.5);
    }

    #[test]
    fn test_mode_never_explores() {
        let policy = EpsilonGreedy::new(1.0, 0.01).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(policy.choose(Mode::Test, &mut rng), Choice::Exploit);
        }
    }

    #[test]
    fn full_epsilon_always_explores() {
        let policy = EpsilonGreedy::new(1.0, 0.01).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(policy.choose(Mode::Learning, &mut rng), Choice::Explore);
        }
    }
}
