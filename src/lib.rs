//! # Media Toolkit Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per i due binari
//!
//! ## Architettura dei moduli:
//! - `config`: Preset di qualità e configurazione downloader
//! - `error`: Tipi di errore custom per diverse operazioni
//! - `classifier`: Classificazione media da path locali e URL
//! - `job`: Richiesta di compressione e ciclo di vita Idle/Processing/Done/Failed
//! - `compressor`: Dispatch immagine (crate `image`) / video (ffmpeg)
//! - `extract`: Probe metadata yt-dlp e formati remoti
//! - `downloader`: Orchestrazione download via yt-dlp
//! - `platform`: Risoluzione comandi cross-platform
//! - `tui`: Interfaccia a form del compressore (ratatui)
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use media_toolkit::{Compressor, CompressionJob, QualityPreset};
//!
//! let job = CompressionJob::new(input, output, QualityPreset::High);
//! let report = Compressor::compress(&job)?;
//! ```

pub mod classifier;
pub mod compressor;
pub mod config;
pub mod downloader;
pub mod error;
pub mod extract;
pub mod job;
pub mod platform;
pub mod tui;

pub use classifier::MediaKind;
pub use compressor::Compressor;
pub use config::{DownloaderConfig, QualityPreset};
pub use downloader::Downloader;
pub use error::MediaError;
pub use job::{CompressionJob, JobReport, JobState};
