//! # Download Dispatcher Module
//!
//! Questo modulo orchestra il download di media remoti delegando tutto il
//! lavoro di estrazione al processo esterno yt-dlp.
//!
//! ## Responsabilità:
//! - Classificazione audio-vs-video dell'URL (estensione, poi probe)
//! - Costruzione della command line yt-dlp (format selection, template
//!   di output con timestamp, flag no-playlist / no-check-certificates)
//! - Direttiva di post-processing per l'audio (estrazione mp3 a qualità fissa)
//! - Listing dei formati remoti in tabella
//!
//! ## Selezione formato:
//! - Video: `bestvideo+bestaudio/best`
//! - Audio: `bestaudio/best` + `--extract-audio --audio-format mp3
//!   --audio-quality 192`
//! - Esplicito: `-f <format_id>` scelto dall'utente dopo il listing
//!
//! ## Template di output:
//! `<output_dir>/<YYYY-MM-DD_HH-MM-SS>_%(title)s.%(ext)s` — unico schema di
//! naming generato dal sistema.
//!
//! ## Error handling:
//! Ogni fallimento per-URL è catturato, stampato su console e non abortisce
//! il loop interattivo: il retry è guidato dall'utente che reinserisce l'URL.

use crate::classifier::{self, MediaKind};
use crate::config::DownloaderConfig;
use crate::error::MediaError;
use crate::extract::{self, MediaMetadata};
use crate::platform::PlatformCommands;
use anyhow::Result;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How yt-dlp should pick the stream(s) to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSelection {
    /// Best combined video+audio
    BestVideo,
    /// Best audio stream, transcoded to the configured audio codec
    BestAudio,
    /// A user-chosen format identifier from the format listing
    Explicit(String),
}

impl FormatSelection {
    /// yt-dlp format-selection expression
    pub fn expression(&self) -> &str {
        match self {
            FormatSelection::BestVideo => "bestvideo+bestaudio/best",
            FormatSelection::BestAudio => "bestaudio/best",
            FormatSelection::Explicit(id) => id,
        }
    }
}

/// Downloads remote media through the yt-dlp executable
pub struct Downloader {
    config: DownloaderConfig,
}

impl Downloader {
    /// Create a downloader, creating the output directory idempotently.
    pub fn new(config: DownloaderConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.output_dir)?;
        info!("Output directory set to: {}", config.output_dir.display());
        Ok(Self { config })
    }

    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Classify a URL as audio or video.
    ///
    /// Extension wins when recognizable; otherwise exactly one metadata
    /// probe decides. A probe failure is logged and degrades to Video,
    /// matching the extraction library's own bias for video content.
    pub async fn detect_media_type(&self, url: &str) -> MediaKind {
        if let Some(kind) = classifier::classify_url(url) {
            debug!("Classified {} as {} by extension", url, kind.label());
            return kind;
        }

        let spinner = Self::spinner("Probing media type...");
        let result = extract::probe(url).await;
        spinner.finish_and_clear();

        match result {
            Ok(metadata) => metadata.inferred_kind(),
            Err(e) => {
                warn!("Media type probe failed for {}: {}", url, e);
                MediaKind::Video
            }
        }
    }

    /// Download a URL, picking audio or video handling automatically.
    pub async fn download(&self, url: &str) -> Result<()> {
        let selection = match self.detect_media_type(url).await {
            MediaKind::Audio => FormatSelection::BestAudio,
            _ => FormatSelection::BestVideo,
        };
        self.run_download(url, &selection).await
    }

    /// Download a URL with an explicit format identifier.
    pub async fn download_with_format(&self, url: &str, format_id: &str) -> Result<()> {
        self.run_download(url, &FormatSelection::Explicit(format_id.to_string()))
            .await
    }

    /// List the remote formats available for a URL.
    pub async fn list_formats(&self, url: &str) -> Result<MediaMetadata> {
        let spinner = Self::spinner("Fetching available formats...");
        let result = extract::probe(url).await;
        spinner.finish_and_clear();

        let metadata = result?;
        println!("Available formats for {}:", url);
        print!("{}", render_formats_table(&metadata));
        Ok(metadata)
    }

    async fn run_download(&self, url: &str, selection: &FormatSelection) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let args = self.build_download_args(url, selection, &timestamp);

        let platform = PlatformCommands::instance();
        let ytdlp_cmd = platform.get_command("yt-dlp");
        debug!("Running {} {:?}", ytdlp_cmd, args);

        // yt-dlp inherits stdio so its own progress output stays visible
        let status = tokio::process::Command::new(ytdlp_cmd)
            .args(&args)
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    anyhow::Error::from(MediaError::MissingDependency(
                        "yt-dlp is required for media download".to_string(),
                    ))
                } else {
                    anyhow::anyhow!("Failed to execute {}: {}", ytdlp_cmd, e)
                }
            })?;

        if !status.success() {
            return Err(MediaError::Extraction(format!(
                "yt-dlp exited with status {}",
                status.code().map_or("unknown".to_string(), |c| c.to_string())
            ))
            .into());
        }

        println!("✅ Download completed: {}", url);
        Ok(())
    }

    /// The exact yt-dlp command line for a download request.
    pub fn build_download_args(
        &self,
        url: &str,
        selection: &FormatSelection,
        timestamp: &str,
    ) -> Vec<String> {
        let template = self
            .config
            .output_dir
            .join(format!("{}_%(title)s.%(ext)s", timestamp));

        let mut args = vec![
            "-f".to_string(),
            selection.expression().to_string(),
            "-o".to_string(),
            template.to_string_lossy().to_string(),
        ];

        if !self.config.allow_playlist {
            args.push("--no-playlist".to_string());
        }
        if !self.config.check_certificates {
            args.push("--no-check-certificates".to_string());
        }

        if *selection == FormatSelection::BestAudio {
            args.push("--extract-audio".to_string());
            args.push("--audio-format".to_string());
            args.push(self.config.audio_format.clone());
            args.push("--audio-quality".to_string());
            args.push(self.config.audio_quality.clone());
        }

        args.push(url.to_string());
        args
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or(ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Render the format listing table (ID EXT RESOLUTION FPS FILESIZE NOTE).
pub fn render_formats_table(metadata: &MediaMetadata) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<6} {:<15} {:<4} {:<10} {}",
        "ID", "EXT", "RESOLUTION", "FPS", "FILESIZE", "NOTE"
    );
    let _ = writeln!(out, "{}", "-".repeat(60));

    for format in &metadata.formats {
        let resolution = format.resolution.as_deref().unwrap_or("N/A");
        let fps = format
            .fps
            .map_or("N/A".to_string(), |f| format!("{:.0}", f));

        let _ = writeln!(
            out,
            "{:<5} {:<6} {:<15} {:<4} {:<10} {}",
            format.format_id,
            format.ext,
            resolution,
            fps,
            format.filesize_display(),
            format.note()
        );
    }

    out
}
