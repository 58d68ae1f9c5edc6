use rand::prelude::*;

/// Allocates unique filter identifiers.
///
/// Injected so callers can pick deterministic ids in tests and counters in
/// production documents.
pub trait IdAllocator {
    fn allocate(&mut self, prefix: &str) -> String;
}

/// Monotonic counter ids: `prefix-1`, `prefix-2`, ...
#[derive(Debug, Default)]
pub struct CounterIds {
    next: u64,
}

impl CounterIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdAllocator for CounterIds {
    fn allocate(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}-{}", self.next)
    }
}

/// Seeded random base36 suffixes, for documents where ids must not collide
/// across independently generated fragments.
#[derive(Debug)]
pub struct SeededIds {
    rng: StdRng,
}

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdAllocator for SeededIds {
    fn allocate(&mut self, prefix: &str) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let suffix: String = (0..6)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("{prefix}-{suffix}")
    }
}
