// Adapters - External system implementations

pub mod cli_tools;
pub mod download_ytdlp;
pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod process;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use cli_tools::CommandLineTools;
pub use download_ytdlp::YtDlpAdapter;
pub use exec_ffmpeg::FFmpegAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::TomlConfigAdapter;
