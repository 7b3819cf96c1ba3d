//! Live adapter for the `Randomness` port.

use rand::Rng;

use crate::ports::Randomness;

/// Live randomness backed by the thread-local RNG.
pub struct LiveRandomness;

impl Randomness for LiveRandomness {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..len)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_stay_in_range() {
        let rng = LiveRandomness;
        for _ in 0..100 {
            assert!(rng.pick(3) < 3);
        }
        assert_eq!(rng.pick(1), 0);
        assert_eq!(rng.pick(0), 0);
    }
}
