//! # Remote Metadata Extraction Module
//!
//! Questo modulo interroga yt-dlp in modalità metadata-only (`--dump-json`)
//! e deserializza il risultato in tipi propri.
//!
//! ## Responsabilità:
//! - Probe di un URL senza scaricare nulla (`--skip-download`)
//! - Parsing di titolo, durata, extractor e lista dei formati remoti
//! - Inferenza audio-vs-video dalla presenza del campo duration
//!
//! ## Contratto probe:
//! Tentativo singolo, best-effort: nessuna cache, nessun retry. Un
//! fallimento di yt-dlp (rete, URL non supportato) diventa
//! `MediaError::Extraction` e la decisione su come degradare spetta al
//! chiamante.

use crate::classifier::MediaKind;
use crate::error::MediaError;
use crate::platform::PlatformCommands;
use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

/// Metadata returned by a yt-dlp probe (`--dump-json`)
#[derive(Debug, Clone, Deserialize)]
pub struct MediaMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub formats: Vec<RemoteFormat>,
}

impl MediaMetadata {
    /// Infer the media kind: a positive duration means video, otherwise audio.
    pub fn inferred_kind(&self) -> MediaKind {
        match self.duration {
            Some(d) if d > 0.0 => MediaKind::Video,
            _ => MediaKind::Audio,
        }
    }
}

/// A single downloadable format descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFormat {
    #[serde(default)]
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
}

impl RemoteFormat {
    /// True when the format carries an audio stream ("none" means absent)
    pub fn has_audio(&self) -> bool {
        matches!(self.acodec.as_deref(), Some(codec) if codec != "none")
    }

    /// True when the format carries a video stream
    pub fn has_video(&self) -> bool {
        matches!(self.vcodec.as_deref(), Some(codec) if codec != "none")
    }

    /// Capability note for the format table
    pub fn note(&self) -> &'static str {
        match (self.has_audio(), self.has_video()) {
            (true, true) => "video+audio",
            (true, false) => "audio only",
            (false, true) => "video only",
            (false, false) => "",
        }
    }

    /// File size rendered in megabytes, or "N/A" when the extractor
    /// did not report one
    pub fn filesize_display(&self) -> String {
        match self.filesize {
            Some(bytes) => format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0),
            None => "N/A".to_string(),
        }
    }
}

/// Query yt-dlp for metadata without downloading anything.
pub async fn probe(url: &str) -> Result<MediaMetadata> {
    debug!("Probing metadata for: {}", url);

    let platform = PlatformCommands::instance();
    let ytdlp_cmd = platform.get_command("yt-dlp");

    let output = tokio::process::Command::new(ytdlp_cmd)
        .args([
            "--dump-json",
            "--no-warnings",
            "--no-playlist",
            "--skip-download",
            url,
        ])
        .output()
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

    if !output.status.success() {
        return Err(MediaError::Extraction(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )
        .into());
    }

    let metadata: MediaMetadata = serde_json::from_slice(&output.stdout)
        .map_err(|e| MediaError::Extraction(format!("Invalid metadata JSON: {}", e)))?;

    debug!(
        "Probe result: title='{}', extractor={}, duration={:?}, {} formats",
        metadata.title,
        metadata.extractor.as_deref().unwrap_or("unknown"),
        metadata.duration,
        metadata.formats.len()
    );

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"{
        "title": "Sample Clip",
        "extractor": "youtube",
        "duration": 212.5,
        "formats": [
            {"format_id": "140", "ext": "m4a", "acodec": "mp4a.40.2", "vcodec": "none", "filesize": 3470000},
            {"format_id": "137", "ext": "mp4", "resolution": "1920x1080", "fps": 30.0, "acodec": "none", "vcodec": "avc1.640028"},
            {"format_id": "22", "ext": "mp4", "resolution": "1280x720", "fps": 30.0, "acodec": "mp4a.40.2", "vcodec": "avc1.64001F", "filesize": 10485760}
        ]
    }"#;

    #[test]
    fn test_metadata_parsing() {
        let metadata: MediaMetadata = serde_json::from_str(SAMPLE_JSON).unwrap();

        assert_eq!(metadata.title, "Sample Clip");
        assert_eq!(metadata.extractor.as_deref(), Some("youtube"));
        assert_eq!(metadata.duration, Some(212.5));
        assert_eq!(metadata.formats.len(), 3);
        assert_eq!(metadata.inferred_kind(), MediaKind::Video);
    }

    #[test]
    fn test_metadata_without_duration_is_audio() {
        let metadata: MediaMetadata =
            serde_json::from_str(r#"{"title": "Podcast Episode"}"#).unwrap();
        assert_eq!(metadata.inferred_kind(), MediaKind::Audio);

        let metadata: MediaMetadata =
            serde_json::from_str(r#"{"title": "Empty", "duration": 0}"#).unwrap();
        assert_eq!(metadata.inferred_kind(), MediaKind::Audio);
    }

    #[test]
    fn test_format_capability_notes() {
        let metadata: MediaMetadata = serde_json::from_str(SAMPLE_JSON).unwrap();

        assert_eq!(metadata.formats[0].note(), "audio only");
        assert_eq!(metadata.formats[1].note(), "video only");
        assert_eq!(metadata.formats[2].note(), "video+audio");

        // Missing codec fields mean neither capability
        let bare: RemoteFormat = serde_json::from_str(r#"{"format_id": "0"}"#).unwrap();
        assert_eq!(bare.note(), "");
    }

    #[test]
    fn test_filesize_display() {
        let metadata: MediaMetadata = serde_json::from_str(SAMPLE_JSON).unwrap();

        assert_eq!(metadata.formats[0].filesize_display(), "3.3MB");
        assert_eq!(metadata.formats[1].filesize_display(), "N/A");
        assert_eq!(metadata.formats[2].filesize_display(), "10.0MB");
    }
}
