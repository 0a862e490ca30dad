//! # Compression Job Module
//!
//! Questo modulo definisce la richiesta di compressione e il suo ciclo di vita.
//!
//! ## Responsabilità:
//! - Definisce `CompressionJob` (input, output, preset) con validazione
//! - Definisce `JobState` come stato esplicito Idle/Processing/Done/Failed
//! - Definisce `JobReport` con la dimensione finale del file prodotto
//!
//! ## Ciclo di vita:
//! Idle -> Processing -> {Done | Failed} -> Idle
//!
//! Il flag booleano "is processing" dell'interfaccia è sostituito da una
//! transizione controllata: avviare un secondo job mentre uno è in corso è
//! una precondizione verificata (`start()` fallisce), non un check ad-hoc.
//! Un job è consumato una sola volta e non è mai persistito tra le esecuzioni.

use crate::classifier::{self, MediaKind};
use crate::config::QualityPreset;
use crate::error::MediaError;
use anyhow::Result;
use std::path::PathBuf;

/// A single compression request, created on user submission.
#[derive(Debug, Clone)]
pub struct CompressionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preset: QualityPreset,
}

impl CompressionJob {
    pub fn new(input: PathBuf, output: PathBuf, preset: QualityPreset) -> Self {
        Self { input, output, preset }
    }

    /// Classified kind of the input file
    pub fn kind(&self) -> MediaKind {
        classifier::classify_path(&self.input)
    }

    /// Validate the request before dispatch
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() || self.output.as_os_str().is_empty() {
            return Err(MediaError::Validation(
                "Select both input and output files".to_string(),
            )
            .into());
        }

        if !self.input.exists() {
            return Err(MediaError::Validation(format!(
                "Input file does not exist: {}",
                self.input.display()
            ))
            .into());
        }

        if self.kind() == MediaKind::Unknown {
            return Err(MediaError::UnsupportedFormat(
                self.input.display().to_string(),
            )
            .into());
        }

        Ok(())
    }
}

/// Explicit job lifecycle state for the compressor interface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Processing,
    /// Completed successfully; carries the final status line
    Done(String),
    /// Failed; carries the user-facing error message
    Failed(String),
}

impl JobState {
    /// True while a worker thread is running
    pub fn is_busy(&self) -> bool {
        matches!(self, JobState::Processing)
    }

    /// Checked transition into `Processing`.
    ///
    /// Rejects the request while a job is in flight: a second submission is
    /// refused with a notification, never enqueued.
    pub fn start(&mut self) -> Result<()> {
        if self.is_busy() {
            return Err(MediaError::Validation("Compression in progress".to_string()).into());
        }
        *self = JobState::Processing;
        Ok(())
    }

    /// Transition out of `Processing` with the job outcome.
    pub fn finish(&mut self, outcome: Result<JobReport>) {
        *self = match outcome {
            Ok(report) => JobState::Done(report.status_line()),
            Err(e) => JobState::Failed(e.to_string()),
        };
    }

    /// Back to `Idle` (the interface's Clear control)
    pub fn reset(&mut self) {
        *self = JobState::Idle;
    }
}

/// Result of a successful compression job
#[derive(Debug, Clone)]
pub struct JobReport {
    pub output_path: PathBuf,
    pub output_bytes: u64,
}

impl JobReport {
    /// Output size in megabytes
    pub fn size_mb(&self) -> f64 {
        self.output_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Status line shown when a job completes
    pub fn status_line(&self) -> String {
        format!("Done! Size: {:.2} MB", self.size_mb())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_job_state_rejects_second_start() {
        let mut state = JobState::Idle;
        assert!(state.start().is_ok());
        assert!(state.is_busy());

        // A second job while busy is rejected, not enqueued
        assert!(state.start().is_err());

        state.finish(Ok(JobReport {
            output_path: PathBuf::from("out.mp4"),
            output_bytes: 1024,
        }));
        assert!(!state.is_busy());
        assert!(state.start().is_ok());
    }

    #[test]
    fn test_job_state_failure_clears_busy() {
        let mut state = JobState::Idle;
        state.start().unwrap();
        state.finish(Err(anyhow::anyhow!("ffmpeg exited with status 1")));

        assert!(!state.is_busy());
        assert!(matches!(state, JobState::Failed(_)));

        state.reset();
        assert_eq!(state, JobState::Idle);
    }

    #[test]
    fn test_report_status_line_two_decimals() {
        let report = JobReport {
            output_path: PathBuf::from("clip_compressed.mp4"),
            output_bytes: 5 * 1024 * 1024 + 512 * 1024,
        };
        assert_eq!(report.status_line(), "Done! Size: 5.50 MB");
    }

    #[test]
    fn test_job_validation() {
        let job = CompressionJob::new(
            PathBuf::new(),
            PathBuf::from("out.jpg"),
            QualityPreset::Medium,
        );
        assert!(job.validate().is_err());

        let job = CompressionJob::new(
            PathBuf::from("/definitely/missing/input.jpg"),
            PathBuf::from("out.jpg"),
            QualityPreset::Medium,
        );
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_job_kind() {
        let job = CompressionJob::new(
            Path::new("clip.mp4").to_path_buf(),
            Path::new("out.mp4").to_path_buf(),
            QualityPreset::High,
        );
        assert_eq!(job.kind(), MediaKind::Video);
    }
}
