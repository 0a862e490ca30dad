//! # Media Classification Module
//!
//! Questo modulo determina il tipo di media a partire da path locali o URL.
//!
//! ## Responsabilità:
//! - Classificazione file locali (immagine vs video) per il compressore
//! - Classificazione URL (audio vs video) per il downloader
//! - Suggerimento del path di output `<stem>_compressed<ext>`
//!
//! ## Allow-list (compressore):
//! - **Immagini**: JPG, JPEG, PNG, GIF, BMP
//! - **Video**: MP4, AVI, MOV, MKV
//!
//! ## Allow-list (downloader, applicata al path dell'URL):
//! - **Audio**: MP3, WAV, AAC, FLAC, OGG, M4A
//! - **Video**: MP4, MKV, WEBM, FLV, AVI, MOV
//!
//! Un'estensione assente o non riconosciuta produce `Unknown` (compressore)
//! oppure `None` (downloader, che ricade sul probe di yt-dlp). Nessuna cache,
//! nessun retry: la classificazione è ricalcolata a ogni richiesta.

use std::path::{Path, PathBuf};

/// Kind of media a path or URL refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Unknown,
}

impl MediaKind {
    /// Human-readable label for status readouts
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
            MediaKind::Unknown => "Unknown",
        }
    }
}

/// Image extensions accepted by the compressor
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Video extensions accepted by the compressor
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// Audio extensions recognized in download URLs
pub const URL_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "flac", "ogg", "m4a"];

/// Video extensions recognized in download URLs
pub const URL_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm", "flv", "avi", "mov"];

/// Classify a local file by its extension (compressor allow-lists).
pub fn classify_path(path: &Path) -> MediaKind {
    let ext = match path.extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => return MediaKind::Unknown,
    };

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Image
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        MediaKind::Video
    } else {
        MediaKind::Unknown
    }
}

/// Extract the lowercase extension of a URL's final path segment.
///
/// Query string and fragment are ignored, so `https://x/y/song.mp3?t=1`
/// yields `mp3`.
pub fn url_extension(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    let last_segment = without_query.rsplit('/').next().unwrap_or("");

    let (stem, ext) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }

    Some(ext.to_lowercase())
}

/// Classify a download URL by its extension (downloader allow-lists).
///
/// Returns `None` when the extension is absent or unrecognized, which means
/// the caller has to fall back to a metadata probe.
pub fn classify_url(url: &str) -> Option<MediaKind> {
    let ext = url_extension(url)?;

    if URL_AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Audio)
    } else if URL_VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Suggested output path: `<stem>_compressed<ext>` next to the input.
pub fn suggest_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let suggested = match input.extension() {
        Some(ext) => format!("{}_compressed.{}", stem, ext.to_string_lossy()),
        None => format!("{}_compressed", stem),
    };

    match input.parent() {
        Some(parent) => parent.join(suggested),
        None => PathBuf::from(suggested),
    }
}

/// Default output extension offered for a classified input (save-dialog default).
pub fn default_output_extension(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "jpg",
        _ => "mp4",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_path_images() {
        for ext in IMAGE_EXTENSIONS {
            let path = PathBuf::from(format!("photo.{}", ext));
            assert_eq!(classify_path(&path), MediaKind::Image, "ext: {}", ext);
        }
        assert_eq!(classify_path(Path::new("PHOTO.JPG")), MediaKind::Image);
    }

    #[test]
    fn test_classify_path_videos() {
        for ext in VIDEO_EXTENSIONS {
            let path = PathBuf::from(format!("clip.{}", ext));
            assert_eq!(classify_path(&path), MediaKind::Video, "ext: {}", ext);
        }
    }

    #[test]
    fn test_classify_path_unknown() {
        assert_eq!(classify_path(Path::new("document.pdf")), MediaKind::Unknown);
        assert_eq!(classify_path(Path::new("noextension")), MediaKind::Unknown);
        assert_eq!(classify_path(Path::new("archive.tar.xz")), MediaKind::Unknown);
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://host/a/song.mp3"), Some("mp3".to_string()));
        assert_eq!(
            url_extension("https://host/a/Song.MP3?token=abc#t=10"),
            Some("mp3".to_string())
        );
        assert_eq!(url_extension("https://host/watch?v=abc123"), None);
        assert_eq!(url_extension("https://host/path/"), None);
    }

    #[test]
    fn test_classify_url() {
        assert_eq!(classify_url("https://host/track.mp3"), Some(MediaKind::Audio));
        assert_eq!(classify_url("https://host/clip.webm"), Some(MediaKind::Video));
        // Unrecognized extension or none at all: caller must probe
        assert_eq!(classify_url("https://host/page.html"), None);
        assert_eq!(classify_url("https://youtube.com/watch?v=abc"), None);
    }

    #[test]
    fn test_suggest_output_path() {
        assert_eq!(
            suggest_output_path(Path::new("/media/photo.png")),
            PathBuf::from("/media/photo_compressed.png")
        );
        assert_eq!(
            suggest_output_path(Path::new("clip.mp4")),
            PathBuf::from("clip_compressed.mp4")
        );
        assert_eq!(
            suggest_output_path(Path::new("/media/noext")),
            PathBuf::from("/media/noext_compressed")
        );
    }

    #[test]
    fn test_default_output_extension() {
        assert_eq!(default_output_extension(MediaKind::Image), "jpg");
        assert_eq!(default_output_extension(MediaKind::Video), "mp4");
        assert_eq!(default_output_extension(MediaKind::Unknown), "mp4");
    }
}
