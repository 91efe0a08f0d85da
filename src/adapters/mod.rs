// Adapters - External system implementations

pub mod clipboard;
pub mod dialog;
pub mod exec_ffmpeg;
pub mod fs_local;
pub mod launcher;
pub mod probe_ffprobe;
pub mod process;
pub mod thumbnail_ffmpeg;
pub mod toml_config;

// Re-export adapters
pub use clipboard::ClipboardAdapter;
pub use dialog::DialogAdapter;
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::FsLocalAdapter;
pub use launcher::SelfLauncher;
pub use probe_ffprobe::FFprobeAdapter;
pub use thumbnail_ffmpeg::FFmpegThumbnailAdapter;
pub use toml_config::TomlConfigAdapter;
