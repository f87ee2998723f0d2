//! Timestamp planner implementation

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::domain::model::{ClipPlan, OverrunPolicy, PlanStrategy, Seconds};
use crate::domain::rules::OverrunRules;
use crate::planner::{evenly_spaced_offsets, OffsetSource};

/// Planner that picks clip start offsets for a source duration
#[derive(Debug, Clone)]
pub struct TimestampPlanner {
    source: OffsetSource,
    clip_duration: Seconds,
    min_duration: Seconds,
    fallback_offsets: Vec<Seconds>,
    overrun_policy: OverrunPolicy,
}

impl TimestampPlanner {
    /// Create a planner using the evenly spaced strategy
    pub fn new(
        count: usize,
        clip_duration: Seconds,
        min_duration: Seconds,
        fallback_offsets: Vec<Seconds>,
    ) -> Self {
        Self {
            source: OffsetSource::EvenlySpaced { count },
            clip_duration,
            min_duration,
            fallback_offsets,
            overrun_policy: OverrunPolicy::Keep,
        }
    }

    /// Planner configured from pipeline settings
    pub fn from_config(config: &PipelineConfig) -> Self {
        let planner = Self::new(
            config.clip_count,
            config.clip_duration,
            config.min_duration,
            config.fallback_offsets.clone(),
        )
        .with_overrun_policy(config.overrun_policy);

        match &config.offsets {
            Some(offsets) => planner.with_explicit_offsets(offsets.clone()),
            None => planner,
        }
    }

    /// Use operator supplied offsets instead of even spacing
    pub fn with_explicit_offsets(mut self, offsets: Vec<Seconds>) -> Self {
        self.source = OffsetSource::Explicit { offsets };
        self
    }

    pub fn with_overrun_policy(mut self, policy: OverrunPolicy) -> Self {
        self.overrun_policy = policy;
        self
    }

    /// Plan clip offsets for a source of the given duration
    pub fn plan(&self, duration: Option<Seconds>) -> ClipPlan {
        let (strategy, offsets) = match (&self.source, duration) {
            (OffsetSource::Explicit { offsets }, _) => (PlanStrategy::Explicit, offsets.clone()),
            (OffsetSource::EvenlySpaced { count }, Some(d)) if d >= self.min_duration => {
                (PlanStrategy::EvenlySpaced, evenly_spaced_offsets(d, *count))
            }
            (OffsetSource::EvenlySpaced { .. }, _) => {
                match duration {
                    Some(d) => info!(
                        "Source is {}s, shorter than {}s; using fallback offsets",
                        d, self.min_duration
                    ),
                    None => info!("Source duration unknown; using fallback offsets"),
                }
                (PlanStrategy::Fallback, self.fallback_offsets.clone())
            }
        };

        let offsets: Vec<Seconds> = offsets
            .into_iter()
            .map(|start| {
                let adjusted =
                    OverrunRules::apply(self.overrun_policy, start, self.clip_duration, duration);
                if adjusted != start {
                    debug!("Clamped offset {}s to {}s", start, adjusted);
                } else if let Some(d) = duration {
                    if OverrunRules::overruns(start, self.clip_duration, d) {
                        warn!(
                            "Offset {}s + {}s runs past the {}s source; clip may fail",
                            start, self.clip_duration, d
                        );
                    }
                }
                adjusted
            })
            .collect();

        ClipPlan::new(strategy, self.clip_duration, &offsets)
    }
}
