//! Integration tests for the clip pipeline using an in-memory tool fake

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use bgclip_cli::config::PipelineConfig;
use bgclip_cli::*;

const CLIP_BYTES: usize = 4096;

/// Records every call and simulates the external tools on the local disk
struct FakeTools {
    available: bool,
    download_fails: bool,
    download_writes_file: bool,
    duration: Option<Seconds>,
    downloads: AtomicUsize,
    probes: AtomicUsize,
    transcodes: Mutex<Vec<TranscodeSpec>>,
}

impl FakeTools {
    fn with_duration(duration: Option<Seconds>) -> Self {
        Self {
            available: true,
            download_fails: false,
            download_writes_file: true,
            duration,
            downloads: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
            transcodes: Mutex::new(Vec::new()),
        }
    }

    fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    fn transcodes(&self) -> Vec<TranscodeSpec> {
        self.transcodes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExternalTool for FakeTools {
    async fn ensure_available(&self) -> Result<(), ToolError> {
        if self.available {
            Ok(())
        } else {
            Err(ToolError::Missing {
                tool: "ffmpeg".to_string(),
                reason: "not found".to_string(),
            })
        }
    }

    async fn download(&self, _url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.download_fails {
            return Err(DownloadError::Failed {
                code: Some(1),
                stderr: "ERROR: Unable to download webpage".to_string(),
            });
        }
        if self.download_writes_file {
            fs::write(dest, b"source video").unwrap();
        }
        Ok(())
    }

    async fn probe_duration(&self, _path: &Path) -> Result<Seconds, ProbeError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.duration
            .ok_or_else(|| ProbeError::Unparsable("no format.duration entry".to_string()))
    }

    async fn transcode(&self, spec: &TranscodeSpec) -> Result<(), TranscodeError> {
        self.transcodes.lock().unwrap().push(spec.clone());
        // A seek past the end of the source yields no frames.
        if let Some(d) = self.duration {
            if spec.start >= d {
                return Err(TranscodeError::Failed {
                    code: Some(1),
                    stderr: "Output file is empty, nothing was encoded".to_string(),
                });
            }
        }
        fs::write(&spec.output, vec![7u8; CLIP_BYTES + spec.start as usize]).unwrap();
        Ok(())
    }
}

fn test_config(dir: &TempDir) -> PipelineConfig {
    PipelineConfig {
        source_url: Some("https://www.example.com/watch/?v=1234567890".to_string()),
        cache_path: Some(dir.path().join("cache").join("source-watch.mp4")),
        output_dir: dir.path().join("out"),
        ..Default::default()
    }
}

fn interactor(tools: &Arc<FakeTools>, config: PipelineConfig) -> PipelineInteractor {
    PipelineInteractor::new(Arc::clone(tools) as Arc<dyn ExternalTool>, Arc::new(config))
}

fn clip_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("bg-clip-"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_end_to_end_three_minute_source() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(180)));
    let config = test_config(&dir);
    let output_dir = config.output_dir.clone();

    let report = interactor(&tools, config).run().await.unwrap();

    let specs = tools.transcodes();
    let starts: Vec<Seconds> = specs.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![30, 60, 90, 120, 150]);
    for (i, spec) in specs.iter().enumerate() {
        assert_eq!(spec.output, output_dir.join(format!("bg-clip-{}.mp4", i + 1)));
        assert_eq!(spec.duration, 5);
        assert_eq!(spec.width, 1280);
        assert_eq!(spec.fps, 20);
        assert!(spec.strip_audio);
        assert!(spec.faststart);
    }

    assert_eq!(report.produced_count(), 5);
    assert!(!report.has_failures());
    assert_eq!(
        clip_files(&output_dir),
        vec![
            "bg-clip-1.mp4",
            "bg-clip-2.mp4",
            "bg-clip-3.mp4",
            "bg-clip-4.mp4",
            "bg-clip-5.mp4"
        ]
    );
}

#[tokio::test]
async fn test_report_sizes_match_disk() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(120)));
    let report = interactor(&tools, test_config(&dir)).run().await.unwrap();

    assert_eq!(report.entries.len(), 5);
    let mut total = 0;
    for entry in &report.entries {
        let on_disk = fs::metadata(&entry.path).unwrap().len();
        assert_eq!(entry.bytes, on_disk);
        assert_eq!(entry.freshness, Freshness::Produced);
        total += on_disk;
    }
    assert_eq!(report.total_dir_bytes, total);
}

#[tokio::test]
async fn test_second_run_reuses_cached_source() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(120)));
    let pipeline = interactor(&tools, test_config(&dir));

    pipeline.run().await.unwrap();
    assert_eq!(tools.downloads(), 1);

    pipeline.run().await.unwrap();
    assert_eq!(tools.downloads(), 1);
}

#[tokio::test]
async fn test_existing_cache_file_is_a_cache_hit() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let cache = config.resolved_cache_path();
    fs::create_dir_all(cache.parent().unwrap()).unwrap();
    fs::write(&cache, b"stale but accepted").unwrap();

    let tools = Arc::new(FakeTools::with_duration(Some(120)));
    let source = interactor(&tools, config).acquire("https://www.example.com/watch/?v=1").await.unwrap();

    assert!(source.cache_hit);
    assert_eq!(source.path, cache);
    assert_eq!(tools.downloads(), 0);
}

#[tokio::test]
async fn test_rerun_with_new_offsets_overwrites_same_paths() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(600)));
    let first = test_config(&dir);
    let output_dir = first.output_dir.clone();

    interactor(&tools, first.clone()).run().await.unwrap();
    let second = PipelineConfig {
        offsets: Some(vec![7, 77, 177, 277, 377]),
        ..first
    };
    let report = interactor(&tools, second).run().await.unwrap();

    assert_eq!(clip_files(&output_dir).len(), 5);
    assert!(report.entries.iter().all(|e| e.freshness == Freshness::Produced));
    let size = fs::metadata(output_dir.join("bg-clip-2.mp4")).unwrap().len();
    assert_eq!(size, (CLIP_BYTES + 77) as u64);
}

#[tokio::test]
async fn test_clip_failure_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(120)));
    let config = PipelineConfig {
        offsets: Some(vec![20, 500, 60, 80, 100]),
        ..test_config(&dir)
    };
    let output_dir = config.output_dir.clone();

    let report = interactor(&tools, config).run().await.unwrap();

    assert_eq!(tools.transcodes().len(), 5);
    assert_eq!(report.produced_count(), 4);
    let failed: Vec<usize> = report.failed_results().map(|r| r.index).collect();
    assert_eq!(failed, vec![2]);
    assert_eq!(
        clip_files(&output_dir),
        vec!["bg-clip-1.mp4", "bg-clip-3.mp4", "bg-clip-4.mp4", "bg-clip-5.mp4"]
    );
}

#[tokio::test]
async fn test_download_failure_stops_pipeline() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools {
        download_fails: true,
        ..FakeTools::with_duration(Some(120))
    });
    let config = test_config(&dir);
    let output_dir = config.output_dir.clone();

    let err = interactor(&tools, config).run().await.unwrap_err();

    assert!(matches!(err, BgClipError::Download(DownloadError::Failed { .. })));
    assert_eq!(tools.probes(), 0);
    assert!(tools.transcodes().is_empty());
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_download_without_output_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools {
        download_writes_file: false,
        ..FakeTools::with_duration(Some(120))
    });

    let err = interactor(&tools, test_config(&dir)).run().await.unwrap_err();

    assert!(matches!(err, BgClipError::Download(DownloadError::MissingOutput(_))));
    assert!(tools.transcodes().is_empty());
}

#[tokio::test]
async fn test_missing_tool_is_fatal() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools {
        available: false,
        ..FakeTools::with_duration(Some(120))
    });

    let err = interactor(&tools, test_config(&dir)).run().await.unwrap_err();

    assert!(matches!(err, BgClipError::Tool(_)));
    assert_eq!(tools.downloads(), 0);
}

#[tokio::test]
async fn test_missing_source_url_is_fatal() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(120)));
    let config = PipelineConfig {
        source_url: None,
        ..test_config(&dir)
    };

    let err = interactor(&tools, config).run().await.unwrap_err();

    assert!(matches!(err, BgClipError::Config(ConfigError::MissingSourceUrl)));
}

#[tokio::test]
async fn test_unknown_duration_uses_fallback_offsets() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(None));

    let report = interactor(&tools, test_config(&dir)).run().await.unwrap();

    let starts: Vec<Seconds> = tools.transcodes().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![5, 10, 15, 20, 25]);
    assert_eq!(report.produced_count(), 5);
}

#[tokio::test]
async fn test_short_source_fallback_clips_past_end_fail() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(12)));

    let report = interactor(&tools, test_config(&dir)).run().await.unwrap();

    let starts: Vec<Seconds> = tools.transcodes().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![5, 10, 15, 20, 25]);
    let failed: Vec<usize> = report.failed_results().map(|r| r.index).collect();
    assert_eq!(failed, vec![3, 4, 5]);
}

#[tokio::test]
async fn test_parallel_transcodes_are_joined_in_plan_order() {
    let dir = TempDir::new().unwrap();
    let tools = Arc::new(FakeTools::with_duration(Some(300)));
    let config = PipelineConfig {
        max_parallel: 3,
        ..test_config(&dir)
    };

    let report = interactor(&tools, config).run().await.unwrap();

    let indices: Vec<usize> = report.results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    assert_eq!(report.produced_count(), 5);
    assert_eq!(report.entries.len(), 5);

    let started: HashSet<Seconds> = tools.transcodes().iter().map(|s| s.start).collect();
    assert_eq!(started, HashSet::from([50, 100, 150, 200, 250]));
}

#[tokio::test]
async fn test_stale_clip_from_earlier_run_is_flagged() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    fs::create_dir_all(&config.output_dir).unwrap();
    let leftover: PathBuf = config.output_dir.join("bg-clip-9.mp4");
    fs::write(&leftover, b"old").unwrap();

    let tools = Arc::new(FakeTools::with_duration(Some(120)));
    let report = interactor(&tools, config).run().await.unwrap();

    let stale: Vec<&str> = report
        .entries
        .iter()
        .filter(|e| e.freshness == Freshness::Stale)
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(stale, vec!["bg-clip-9.mp4"]);
    assert_eq!(report.entries.len(), 6);
}

#[tokio::test]
async fn test_produce_clip_reports_failure_reason() {
    let dir = TempDir::new().unwrap();
    let tools = FakeTools::with_duration(Some(10));
    let spec = TranscodeSpec {
        source: dir.path().join("source.mp4"),
        output: dir.path().join("bg-clip-1.mp4"),
        start: 15,
        duration: 5,
        width: 1280,
        fps: 20,
        codec: "libx264".to_string(),
        crf: 28,
        preset: "slow".to_string(),
        faststart: true,
        strip_audio: true,
    };

    let result = bgclip_cli::app::produce_clip(&tools, PlanEntry { index: 1, start: 15 }, spec).await;

    assert!(!result.is_success());
    match result.outcome {
        ClipOutcome::Failed(reason) => assert!(reason.contains("nothing was encoded")),
        ClipOutcome::Produced => panic!("expected failure"),
    }
}
