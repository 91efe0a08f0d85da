use std::ffi::OsString;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{
    ClipboardAdapter, DialogAdapter, FFmpegAdapter, FFmpegThumbnailAdapter, FFprobeAdapter,
    FsLocalAdapter, SelfLauncher, TomlConfigAdapter,
};
use crate::adapters::toml_config::AppConfig;
use crate::app::{
    gallery_interactor::GalleryController,
    trim_interactor::{TrimController, TrimPorts, TrimSettings},
};
use crate::domain::errors::DomainError;
use crate::ports::{
    ClipboardPort, DialogPort, FsPort, LauncherPort, MediaProbePort, ThumbnailPort, TrimPort,
};

pub trait AppContainer: Send + Sync {
    /// Fresh controller for one trimmer window
    fn trim_controller(&self) -> Result<TrimController, DomainError>;
    /// Fresh controller for one gallery window
    fn gallery_controller(&self) -> GalleryController;
    /// `None` when thumbnails are disabled
    fn thumbnail_port(&self) -> Option<Arc<dyn ThumbnailPort>>;
    fn dialog_port(&self) -> Arc<dyn DialogPort>;
    fn config(&self) -> &AppConfig;
}

pub struct DefaultAppContainer {
    config: AppConfig,
    probe_port: Arc<dyn MediaProbePort>,
    trim_port: Arc<dyn TrimPort>,
    clipboard_port: Arc<dyn ClipboardPort>,
    dialog_port: Arc<dyn DialogPort>,
    fs_port: Arc<dyn FsPort>,
    launcher_port: Arc<dyn LauncherPort>,
    thumbnail_port: Option<Arc<dyn ThumbnailPort>>,
}

impl DefaultAppContainer {
    /// Wire the production adapters. `launch_args` are forwarded to trimmer
    /// processes started from the gallery.
    pub fn new(config: &AppConfig, launch_args: Vec<OsString>) -> Result<Self, DomainError> {
        let probe_port = Arc::new(FFprobeAdapter::new(config.tools.ffprobe.clone()));
        let trim_port = Arc::new(FFmpegAdapter::new(
            config.tools.ffmpeg.clone(),
            config.trim.preset.clone(),
        ));
        let clipboard_port = Arc::new(ClipboardAdapter::new());
        let dialog_port = Arc::new(DialogAdapter::new(config.gallery.extensions.clone()));
        let fs_port = Arc::new(FsLocalAdapter::new());
        let launcher_port = Arc::new(SelfLauncher::current(launch_args)?);

        let thumbnail_port = if config.gallery.thumbnails {
            let cache_dir = config
                .gallery
                .thumbnail_dir
                .clone()
                .unwrap_or_else(TomlConfigAdapter::default_thumbnail_dir);
            let adapter = FFmpegThumbnailAdapter::new(
                config.tools.ffmpeg.clone(),
                cache_dir,
                config.gallery.thumbnail_width,
                Duration::from_secs(config.gallery.thumbnail_timeout_secs),
            );
            Some(Arc::new(adapter) as Arc<dyn ThumbnailPort>)
        } else {
            None
        };

        Ok(Self {
            config: config.clone(),
            probe_port: probe_port as Arc<dyn MediaProbePort>,
            trim_port: trim_port as Arc<dyn TrimPort>,
            clipboard_port: clipboard_port as Arc<dyn ClipboardPort>,
            dialog_port: dialog_port as Arc<dyn DialogPort>,
            fs_port: fs_port as Arc<dyn FsPort>,
            launcher_port: launcher_port as Arc<dyn LauncherPort>,
            thumbnail_port,
        })
    }

    fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.config.view.notification_timeout_ms)
    }
}

impl AppContainer for DefaultAppContainer {
    fn trim_controller(&self) -> Result<TrimController, DomainError> {
        let ports = TrimPorts {
            probe: Arc::clone(&self.probe_port),
            trimmer: Arc::clone(&self.trim_port),
            clipboard: Arc::clone(&self.clipboard_port),
            dialog: Arc::clone(&self.dialog_port),
            fs: Arc::clone(&self.fs_port),
        };
        let settings = TrimSettings {
            max_size_mb: self.config.trim.max_size_mb,
            auto_compress: self.config.trim.auto_compress,
            audio_bitrate_kbps: self.config.trim.audio_bitrate_kbps,
            notification_timeout: self.notification_timeout(),
        };
        TrimController::new(ports, settings)
    }

    fn gallery_controller(&self) -> GalleryController {
        GalleryController::new(
            Arc::clone(&self.fs_port),
            Arc::clone(&self.launcher_port),
            self.config.gallery.extensions.clone(),
            self.notification_timeout(),
        )
    }

    fn thumbnail_port(&self) -> Option<Arc<dyn ThumbnailPort>> {
        self.thumbnail_port.clone()
    }

    fn dialog_port(&self) -> Arc<dyn DialogPort> {
        Arc::clone(&self.dialog_port)
    }

    fn config(&self) -> &AppConfig {
        &self.config
    }
}
