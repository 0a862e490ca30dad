//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `MediaError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O (file non trovati, permessi, etc.)
//! - `Image`: Errori di ricodifica immagini (formati corrotti, etc.)
//! - `Ffmpeg`: Errori del processo ffmpeg (exit code non zero)
//! - `Extraction`: Errori di yt-dlp (URL non supportati, rete, parsing)
//! - `UnsupportedFormat`: Formato file non supportato
//! - `MissingDependency`: Tool esterno mancante (ffmpeg, yt-dlp)
//! - `Validation`: Errori di validazione input
//!
//! ## Esempio:
//! ```rust,ignore
//! if !tool_exists {
//!     return Err(MediaError::MissingDependency("ffmpeg".to_string()));
//! }
//! ```

/// Custom error types for media compression and download
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
