// Pipeline interactor - Orchestrates the clip extraction use case

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::BgClipResult;
use crate::output::{ensure_output_dir, ReportBuilder};
use crate::planner::TimestampPlanner;
use crate::ports::ExternalTool;
use crate::utils::Utils;

/// Interactor for one acquisition → probe → plan → transcode → report batch
pub struct PipelineInteractor {
    tools: Arc<dyn ExternalTool>,
    config: Arc<PipelineConfig>,
}

impl PipelineInteractor {
    /// Create new pipeline interactor with injected tools
    pub fn new(tools: Arc<dyn ExternalTool>, config: Arc<PipelineConfig>) -> Self {
        Self { tools, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage. Only fatal errors are returned; clip failures are in the report.
    pub async fn run(&self) -> BgClipResult<RunReport> {
        let started = Instant::now();
        let url = self.config.require_source_url()?;
        self.tools.ensure_available().await?;

        let source = self.acquire(url).await?;
        let duration = self.probe(&source.path).await;
        let source = source.with_duration(duration);

        let plan = self.plan(source.duration);
        info!(
            "Planned {} clip(s) using the {} strategy: {:?}",
            plan.len(),
            plan.strategy(),
            plan.offsets()
        );

        ensure_output_dir(&self.config.output_dir)?;
        let results = self.transcode_all(&source, &plan).await;
        let report = self.report(&results)?;

        info!(
            "Finished in {}: {}/{} clip(s) produced",
            Utils::format_duration(started.elapsed()),
            report.produced_count(),
            results.len()
        );
        Ok(report)
    }

    /// Acquisition stage: reuse the cached file or download it
    pub async fn acquire(&self, url: &str) -> Result<SourceMedia, DownloadError> {
        let cache_path = self.config.resolved_cache_path();

        if cache_path.exists() {
            info!("Using cached source video: {}", cache_path.display());
            return Ok(SourceMedia::new(cache_path, true));
        }

        if let Some(parent) = cache_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DownloadError::CacheDir {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        self.tools.download(url, &cache_path).await?;

        if !cache_path.exists() {
            return Err(DownloadError::MissingOutput(cache_path));
        }
        info!("Downloaded source video: {}", cache_path.display());
        Ok(SourceMedia::new(cache_path, false))
    }

    /// Probe stage: an undeterminable duration is `None`, never an error
    pub async fn probe(&self, path: &Path) -> Option<Seconds> {
        match self.tools.probe_duration(path).await {
            Ok(seconds) => {
                info!("Source duration: {}s", seconds);
                Some(seconds)
            }
            Err(e) => {
                warn!("Could not determine source duration: {}", e);
                None
            }
        }
    }

    /// Planning stage
    pub fn plan(&self, duration: Option<Seconds>) -> ClipPlan {
        TimestampPlanner::from_config(&self.config).plan(duration)
    }

    /// Transcode description for one plan entry
    pub fn transcode_spec(
        &self,
        source: &SourceMedia,
        plan: &ClipPlan,
        entry: &PlanEntry,
    ) -> TranscodeSpec {
        TranscodeSpec {
            source: source.path.clone(),
            output: ClipPlan::output_path(&self.config.output_dir, entry),
            start: entry.start,
            duration: plan.clip_duration(),
            width: self.config.width,
            fps: self.config.fps,
            codec: self.config.codec.clone(),
            crf: self.config.crf,
            preset: self.config.preset.clone(),
            faststart: true,
            strip_audio: true,
        }
    }

    /// Transcode stage. Every entry is attempted; the returned results are in plan order.
    pub async fn transcode_all(&self, source: &SourceMedia, plan: &ClipPlan) -> Vec<ClipResult> {
        let parallelism = self.config.parallelism();
        let specs: Vec<(PlanEntry, TranscodeSpec)> = plan
            .entries()
            .iter()
            .map(|entry| (*entry, self.transcode_spec(source, plan, entry)))
            .collect();

        if parallelism <= 1 {
            let mut results = Vec::with_capacity(specs.len());
            for (entry, spec) in specs {
                results.push(produce_clip(self.tools.as_ref(), entry, spec).await);
            }
            return results;
        }

        info!("Transcoding with up to {} concurrent jobs", parallelism);
        let semaphore = Arc::new(Semaphore::new(parallelism));
        let handles: Vec<_> = specs
            .into_iter()
            .map(|(entry, spec)| {
                let tools = Arc::clone(&self.tools);
                let semaphore = Arc::clone(&semaphore);
                let output = spec.output.clone();
                let handle = tokio::spawn(async move {
                    // The semaphore is never closed, so acquiring cannot fail.
                    let _permit = semaphore.acquire_owned().await.ok();
                    produce_clip(tools.as_ref(), entry, spec).await
                });
                (entry, output, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (entry, output, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Clip {} task did not complete: {}", entry.index, e);
                    ClipResult {
                        index: entry.index,
                        start: entry.start,
                        output,
                        outcome: ClipOutcome::Failed(e.to_string()),
                    }
                }
            };
            results.push(result);
        }
        results
    }

    /// Report stage
    pub fn report(&self, results: &[ClipResult]) -> BgClipResult<RunReport> {
        ReportBuilder::new(&self.config.output_dir, &self.config.preview_url)
            .with_cache_path(self.config.resolved_cache_path())
            .build(results)
    }
}

/// Produce one clip; a transcode failure becomes a failed [`ClipResult`]
pub async fn produce_clip(
    tools: &dyn ExternalTool,
    entry: PlanEntry,
    spec: TranscodeSpec,
) -> ClipResult {
    info!(
        "Creating clip {} at {} -> {}",
        entry.index,
        Utils::format_offset(entry.start),
        spec.output.display()
    );

    let outcome = match tools.transcode(&spec).await {
        Ok(()) => ClipOutcome::Produced,
        Err(e) => {
            warn!("Clip {} failed, continuing: {}", entry.index, e);
            ClipOutcome::Failed(e.to_string())
        }
    };

    ClipResult {
        index: entry.index,
        start: entry.start,
        output: spec.output,
        outcome,
    }
}
