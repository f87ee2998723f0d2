//! Timestamp planning module
//!
//! Turns a (possibly unknown) source duration into a [`ClipPlan`].

use crate::domain::model::Seconds;

pub mod strategy;

pub use strategy::TimestampPlanner;

/// Where planned offsets come from when the duration allows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetSource {
    /// Divide the duration into `count + 1` equal intervals
    EvenlySpaced {
        /// Number of clips
        count: usize,
    },
    /// Literal offsets supplied by the operator
    Explicit {
        /// Offsets in output order
        offsets: Vec<Seconds>,
    },
}

/// Offsets `interval * i` for `i in 1..=count`, with `interval = duration / (count + 1)`
pub fn evenly_spaced_offsets(duration: Seconds, count: usize) -> Vec<Seconds> {
    let count = count as Seconds;
    let interval = duration / count.saturating_add(1);
    (1..=count).map(|i| interval.saturating_mul(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evenly_spaced_offsets() {
        assert_eq!(evenly_spaced_offsets(120, 5), vec![20, 40, 60, 80, 100]);
        assert!(evenly_spaced_offsets(120, 0).is_empty());
    }

    #[test]
    fn test_interval_collapses_when_count_exceeds_duration() {
        assert_eq!(evenly_spaced_offsets(3, 4), vec![0, 0, 0, 0]);
    }
}
