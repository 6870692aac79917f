use std::sync::{Mutex, OnceLock};

use rand::{Rng, SeedableRng, rngs::StdRng};

static PROCESS_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

/// Seed every source of randomness the pipeline touches.
///
/// Covers:
/// - the process RNG behind [`next_seed`], which the HTTP inference backends
///   use to derive a deterministic per-request seed forwarded to the server.
///
/// Called once during pipeline construction; a second call within the same
/// process re-seeds the RNG.
pub fn set_seed(seed: u64) {
    let rng = StdRng::seed_from_u64(seed);
    match PROCESS_RNG.get() {
        Some(lock) => {
            *lock.lock().expect("process rng poisoned") = rng;
        }
        None => {
            let _ = PROCESS_RNG.set(Mutex::new(rng));
        }
    }
}

/// Draw the next per-request seed from the process RNG.
///
/// Falls back to entropy seeding if [`set_seed`] was never called.
pub fn next_seed() -> u64 {
    let lock = PROCESS_RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()));
    lock.lock().expect("process rng poisoned").r#gen()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        set_seed(42);
        let first: Vec<u64> = (0..4).map(|_| next_seed()).collect();
        set_seed(42);
        let second: Vec<u64> = (0..4).map(|_| next_seed()).collect();
        assert_eq!(first, second);
    }
}
