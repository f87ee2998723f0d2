// Domain rules - Naming and offset policies

use crate::domain::model::*;

const CLIP_PREFIX: &str = "bg-clip-";
const CLIP_EXTENSION: &str = ".mp4";

/// File name for the clip with the given 1-based index
pub fn clip_file_name(index: usize) -> String {
    format!("{}{}{}", CLIP_PREFIX, index, CLIP_EXTENSION)
}

/// Index encoded in a clip file name, if the name follows the clip pattern
pub fn parse_clip_index(file_name: &str) -> Option<usize> {
    let digits = file_name
        .strip_prefix(CLIP_PREFIX)?
        .strip_suffix(CLIP_EXTENSION)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Rules for offsets that would run past the end of the source
pub struct OverrunRules;

impl OverrunRules {
    /// True when a clip starting at `start` cannot fit inside `duration`
    pub fn overruns(start: Seconds, clip_duration: Seconds, duration: Seconds) -> bool {
        start.saturating_add(clip_duration) > duration
    }

    /// Apply `policy` to a single offset. Unknown durations are never clamped.
    pub fn apply(
        policy: OverrunPolicy,
        start: Seconds,
        clip_duration: Seconds,
        duration: Option<Seconds>,
    ) -> Seconds {
        match (policy, duration) {
            (OverrunPolicy::Clamp, Some(d)) if Self::overruns(start, clip_duration, d) => {
                d.saturating_sub(clip_duration)
            }
            _ => start,
        }
    }
}
