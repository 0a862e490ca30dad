//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `QualityPreset` e le tabelle statiche di parametri encoder
//! - Definisce `DownloaderConfig` con directory di output e opzioni yt-dlp
//! - Fornisce validazione robusta dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//!
//! ## Tabelle preset (parità comportamentale richiesta):
//! - Qualità JPEG: low=85, medium=60, high=40
//! - Video: low={800k, crf 23}, medium={500k, crf 28}, high={300k, crf 32}
//!
//! Le tabelle sono immutabili a runtime: un preset mappa sempre sulla stessa
//! riga di parametri.
//!
//! ## Esempio:
//! ```rust,ignore
//! let settings = QualityPreset::High.video_settings();
//! assert_eq!(settings.bitrate, "300k");
//! ```

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Three-level compression quality preset.
///
/// Higher presets compress harder: "high" means high compression,
/// not high fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

/// Encoder knobs for the ffmpeg video path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSettings {
    /// Target video bitrate, e.g. "500k"
    pub bitrate: &'static str,
    /// Constant rate factor (lower = better quality)
    pub crf: u8,
}

impl QualityPreset {
    /// JPEG quality value handed to the image encoder (1-95 scale).
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityPreset::Low => 85,
            QualityPreset::Medium => 60,
            QualityPreset::High => 40,
        }
    }

    /// Bitrate/CRF row for the ffmpeg command line.
    pub fn video_settings(self) -> VideoSettings {
        match self {
            QualityPreset::Low => VideoSettings { bitrate: "800k", crf: 23 },
            QualityPreset::Medium => VideoSettings { bitrate: "500k", crf: 28 },
            QualityPreset::High => VideoSettings { bitrate: "300k", crf: 32 },
        }
    }

    /// Next preset in the fixed low -> medium -> high cycle (TUI selector).
    pub fn cycle(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for QualityPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(anyhow::anyhow!("Unknown quality preset: {}", other)),
        }
    }
}

/// Configuration for the media downloader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Directory where downloaded files are written (created if missing)
    pub output_dir: PathBuf,
    /// Post-processing audio codec for audio downloads
    pub audio_format: String,
    /// Post-processing audio quality (yt-dlp --audio-quality value)
    pub audio_quality: String,
    /// Validate HTTPS certificates (disabled by default, matching yt-dlp usage here)
    pub check_certificates: bool,
    /// Expand playlists instead of downloading the single URL
    pub allow_playlist: bool,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        let output_dir = dirs::download_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("media-downloader");
        Self {
            output_dir,
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            check_certificates: false,
            allow_playlist: false,
        }
    }
}

impl DownloaderConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Output directory must not be empty"));
        }

        if self.audio_format.is_empty() {
            return Err(anyhow::anyhow!("Audio format must not be empty"));
        }

        if self.audio_quality.is_empty() {
            return Err(anyhow::anyhow!("Audio quality must not be empty"));
        }

        Ok(())
    }

    /// Load configuration from file
    pub async fn from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: DownloaderConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_jpeg_quality_table() {
        assert_eq!(QualityPreset::Low.jpeg_quality(), 85);
        assert_eq!(QualityPreset::Medium.jpeg_quality(), 60);
        assert_eq!(QualityPreset::High.jpeg_quality(), 40);
    }

    #[test]
    fn test_video_settings_table() {
        let low = QualityPreset::Low.video_settings();
        assert_eq!(low.bitrate, "800k");
        assert_eq!(low.crf, 23);

        let medium = QualityPreset::Medium.video_settings();
        assert_eq!(medium.bitrate, "500k");
        assert_eq!(medium.crf, 28);

        let high = QualityPreset::High.video_settings();
        assert_eq!(high.bitrate, "300k");
        assert_eq!(high.crf, 32);
    }

    #[test]
    fn test_preset_cycle_and_parse() {
        assert_eq!(QualityPreset::Low.cycle(), QualityPreset::Medium);
        assert_eq!(QualityPreset::Medium.cycle(), QualityPreset::High);
        assert_eq!(QualityPreset::High.cycle(), QualityPreset::Low);

        assert_eq!("medium".parse::<QualityPreset>().unwrap(), QualityPreset::Medium);
        assert!("ultra".parse::<QualityPreset>().is_err());
    }

    #[test]
    fn test_downloader_config_validation() {
        let mut config = DownloaderConfig::default();
        assert!(config.validate().is_ok());

        config.audio_format = String::new();
        assert!(config.validate().is_err());

        config.audio_format = "mp3".to_string();
        config.output_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_downloader_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original = DownloaderConfig {
            output_dir: temp_dir.path().join("media"),
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
            check_certificates: true,
            allow_playlist: false,
        };

        original.save_to_file(&config_path).await.unwrap();
        let loaded = DownloaderConfig::from_file(&config_path).await.unwrap();

        assert_eq!(loaded.output_dir, temp_dir.path().join("media"));
        assert_eq!(loaded.audio_format, "mp3");
        assert_eq!(loaded.audio_quality, "192");
        assert!(loaded.check_certificates);
        assert!(!loaded.allow_playlist);
    }

    #[tokio::test]
    async fn test_downloader_config_missing_file_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing.json");

        let config = DownloaderConfig::from_file(&config_path).await.unwrap();
        assert_eq!(config.audio_format, "mp3");
        assert!(!config.check_certificates);
    }
}
