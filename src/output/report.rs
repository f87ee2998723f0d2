//! Report stage: list clip files on disk and summarize the run

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::model::*;
use crate::domain::rules::parse_clip_index;
use crate::error::{BgClipError, BgClipResult};
use crate::utils::Utils;

/// Builds a [`RunReport`] from a directory scan and this run's results
pub struct ReportBuilder {
    output_dir: PathBuf,
    preview_url: String,
    cache_path: Option<PathBuf>,
}

impl ReportBuilder {
    pub fn new(output_dir: impl Into<PathBuf>, preview_url: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            preview_url: preview_url.into(),
            cache_path: None,
        }
    }

    /// Cached source to suggest removing once the batch is done
    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(cache_path.into());
        self
    }

    /// Scan the output directory. Files written successfully by `results` are
    /// tagged produced; every other matching file is stale.
    pub fn build(&self, results: &[ClipResult]) -> BgClipResult<RunReport> {
        self.build_inner(Some(results))
    }

    /// Directory listing only, with no run results to compare against
    pub fn build_listing(&self) -> BgClipResult<RunReport> {
        self.build_inner(None)
    }

    fn build_inner(&self, results: Option<&[ClipResult]>) -> BgClipResult<RunReport> {
        let results_or_empty = results.unwrap_or(&[]);
        let produced: HashSet<&Path> = results_or_empty
            .iter()
            .filter(|r| r.is_success())
            .map(|r| r.output.as_path())
            .collect();

        let entries = self
            .list_clip_files()
            .map_err(|e| BgClipError::OutputError {
                message: format!("cannot list {}: {}", self.output_dir.display(), e),
            })?
            .into_iter()
            .map(|(name, path, bytes)| {
                let freshness = match results {
                    None => Freshness::Unverified,
                    Some(_) if produced.contains(path.as_path()) => Freshness::Produced,
                    Some(_) => Freshness::Stale,
                };
                ReportEntry {
                    name,
                    path,
                    bytes,
                    freshness,
                }
            })
            .collect::<Vec<_>>();

        let stale = entries
            .iter()
            .filter(|e| e.freshness == Freshness::Stale)
            .count();
        if stale > 0 {
            warn!(
                "{} clip file(s) in {} were not written by this run",
                stale,
                self.output_dir.display()
            );
        }

        let cleanup_hint = self
            .cache_path
            .as_ref()
            .filter(|p| p.exists())
            .map(|p| format!("rm {}", p.display()));

        Ok(RunReport {
            generated_at: Utc::now(),
            output_dir: self.output_dir.clone(),
            entries,
            total_dir_bytes: self.total_dir_bytes(),
            results: results_or_empty.to_vec(),
            preview_url: self.preview_url.clone(),
            cleanup_hint,
        })
    }

    /// `bg-clip-*.mp4` files directly inside the output dir, ordered by index.
    /// A missing directory lists as empty.
    fn list_clip_files(&self) -> io::Result<Vec<(String, PathBuf, u64)>> {
        let read_dir = match std::fs::read_dir(&self.output_dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(index) = parse_clip_index(&name) else {
                continue;
            };
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            // Results carry paths built from the configured output dir, so match on that form.
            files.push((index, name, self.output_dir.join(entry.file_name()), metadata.len()));
        }

        files.sort_by_key(|(index, ..)| *index);
        Ok(files
            .into_iter()
            .map(|(_, name, path, bytes)| (name, path, bytes))
            .collect())
    }

    /// Total size of every file under the output directory
    fn total_dir_bytes(&self) -> u64 {
        WalkDir::new(&self.output_dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.metadata().ok())
            .map(|metadata| metadata.len())
            .sum()
    }
}

/// Human-readable rendering of a report
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Generated clips in {}:", report.output_dir.display());
    if report.entries.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for entry in &report.entries {
        let marker = match entry.freshness {
            Freshness::Produced | Freshness::Unverified => "",
            Freshness::Stale => "  [stale]",
        };
        let _ = writeln!(
            out,
            "  {:<16} {:>10}{}",
            entry.name,
            Utils::format_file_size(entry.bytes),
            marker
        );
    }
    let _ = writeln!(
        out,
        "Total size: {}",
        Utils::format_file_size(report.total_dir_bytes)
    );

    let failed: Vec<&ClipResult> = report.failed_results().collect();
    if !report.results.is_empty() {
        let _ = writeln!(
            out,
            "Clips produced this run: {}/{}",
            report.produced_count(),
            report.results.len()
        );
    }
    for result in failed {
        if let ClipOutcome::Failed(reason) = &result.outcome {
            let _ = writeln!(
                out,
                "  clip {} at {} failed: {}",
                result.index,
                Utils::format_offset(result.start),
                reason
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Preview the site at {}", report.preview_url);
    if let Some(hint) = &report.cleanup_hint {
        let _ = writeln!(out, "Remove the cached source video with: {}", hint);
    }
    out
}
