//! One-shot values riding on a re-observable stream.
//!
//! A [`Pulse`] is a value stamped with a generation. A [`PulseReader`]
//! yields each generation at most once, so re-subscribing to a state
//! stream (and receiving the same latest value again) does not re-trigger
//! the effect.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulse<T> {
    value: T,
    generation: u64,
}

impl<T> Pulse<T> {
    #[must_use]
    pub const fn new(value: T, generation: u64) -> Self {
        Self { value, generation }
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Hands out strictly increasing generations, starting at 1.
#[derive(Debug)]
pub struct PulseSource {
    next: AtomicU64,
}

impl PulseSource {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn emit<T>(&self, value: T) -> Pulse<T> {
        Pulse::new(value, self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PulseSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Remembers the last generation consumed by one observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseReader {
    last_seen: u64,
}

impl PulseReader {
    #[must_use]
    pub const fn new() -> Self {
        Self { last_seen: 0 }
    }

    /// Returns the value if this generation has not been read yet.
    pub fn read<'a, T>(&mut self, pulse: &'a Pulse<T>) -> Option<&'a T> {
        if pulse.generation <= self.last_seen {
            return None;
        }
        self.last_seen = pulse.generation;
        Some(&pulse.value)
    }
}
