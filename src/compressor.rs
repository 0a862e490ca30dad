//! # Compression Dispatcher Module
//!
//! Questo modulo esegue un singolo job di compressione, smistando tra il
//! percorso immagine e il percorso video in base alla classificazione.
//!
//! ## Responsabilità:
//! - Ricodifica immagini in-process con il crate `image`
//! - Transcodifica video con un sottoprocesso ffmpeg
//! - Normalizzazione color mode (alpha/palette -> RGB a tre canali)
//! - Verifica della dipendenza esterna ffmpeg
//!
//! ## Pipeline video:
//! `ffmpeg -i <input> -vcodec libx264 -b:v <bitrate> -crf <crf>
//! -preset medium -y <output>`
//!
//! Successo = exit code zero; un exit code diverso da zero produce
//! `MediaError::Ffmpeg` con lo stderr del processo. Un output parziale
//! lasciato da una transcodifica fallita viene rimosso best-effort.
//!
//! ## Pipeline immagine:
//! 1. Decodifica con `image::open`
//! 2. Conversione a RGB8 se il color mode ha canale alpha
//! 3. Encoding JPEG con la qualità del preset, oppure `save()` per gli
//!    altri formati (formato derivato dall'estensione di output)
//!
//! Nessuna cancellazione: un ffmpeg avviato corre fino al completamento.

use crate::config::QualityPreset;
use crate::error::MediaError;
use crate::job::{CompressionJob, JobReport};
use crate::classifier::MediaKind;
use crate::platform::PlatformCommands;
use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Executes compression jobs by delegating to the image crate or ffmpeg
pub struct Compressor;

impl Compressor {
    /// Run a single compression job to completion.
    ///
    /// Blocking: callers that need a responsive interface run this on a
    /// worker thread and collect the result over a channel.
    pub fn compress(job: &CompressionJob) -> Result<JobReport> {
        job.validate()?;

        if let Some(parent) = job.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        match job.kind() {
            MediaKind::Image => Self::compress_image(job)?,
            MediaKind::Video => Self::compress_video(job)?,
            other => {
                return Err(MediaError::UnsupportedFormat(format!(
                    "{} ({})",
                    job.input.display(),
                    other.label()
                ))
                .into())
            }
        }

        let output_bytes = fs::metadata(&job.output)?.len();
        Ok(JobReport {
            output_path: job.output.clone(),
            output_bytes,
        })
    }

    /// Re-encode an image with the preset's JPEG quality.
    fn compress_image(job: &CompressionJob) -> Result<()> {
        debug!("Compressing image: {}", job.input.display());

        let img = image::open(&job.input).map_err(MediaError::Image)?;
        let img = Self::normalize_color(img);

        let is_jpeg_output = job
            .output
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                ext == "jpg" || ext == "jpeg"
            })
            .unwrap_or(false);

        if is_jpeg_output {
            let file = fs::File::create(&job.output)?;
            let mut writer = BufWriter::new(file);
            let mut encoder =
                JpegEncoder::new_with_quality(&mut writer, job.preset.jpeg_quality());
            encoder
                .encode_image(&img.to_rgb8())
                .map_err(MediaError::Image)?;
        } else {
            // Format picked from the output extension; quality only applies
            // to the JPEG encoder
            img.save(&job.output).map_err(MediaError::Image)?;
        }

        Ok(())
    }

    /// Normalize alpha/palette color modes to plain three-channel RGB.
    ///
    /// Palette images are already expanded by the decoder, so only the
    /// alpha channel needs flattening here.
    fn normalize_color(img: DynamicImage) -> DynamicImage {
        if img.color().has_alpha() {
            DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            img
        }
    }

    /// Transcode a video through an ffmpeg subprocess.
    fn compress_video(job: &CompressionJob) -> Result<()> {
        let settings = job.preset.video_settings();
        debug!(
            "Compressing video: {} (bitrate: {}, crf: {})",
            job.input.display(),
            settings.bitrate,
            settings.crf
        );

        let platform = PlatformCommands::instance();
        let ffmpeg_cmd = platform.get_command("ffmpeg");

        let output = Command::new(ffmpeg_cmd)
            .args(Self::ffmpeg_args(&job.input, &job.output, job.preset))
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    anyhow::Error::from(MediaError::MissingDependency(
                        "ffmpeg is required for video compression".to_string(),
                    ))
                } else {
                    anyhow::anyhow!("Failed to execute {}: {}", ffmpeg_cmd, e)
                }
            })?;

        if !output.status.success() {
            // ffmpeg may have left a partial output behind
            if job.output.exists() {
                if let Err(e) = fs::remove_file(&job.output) {
                    warn!(
                        "Could not remove partial output {}: {}",
                        job.output.display(),
                        e
                    );
                }
            }
            return Err(MediaError::Ffmpeg(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// The exact ffmpeg command line for a transcode job.
    pub fn ffmpeg_args(input: &Path, output: &Path, preset: QualityPreset) -> Vec<String> {
        let settings = preset.video_settings();
        vec![
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vcodec".to_string(),
            "libx264".to_string(),
            "-b:v".to_string(),
            settings.bitrate.to_string(),
            "-crf".to_string(),
            settings.crf.to_string(),
            "-preset".to_string(),
            "medium".to_string(),
            "-y".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Check that ffmpeg is available for the video path
    pub fn check_dependencies() -> Result<()> {
        let platform = PlatformCommands::instance();
        if !platform.is_command_available_blocking("ffmpeg") {
            return Err(MediaError::MissingDependency(
                "ffmpeg is required for video compression".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_ffmpeg_args_high_preset() {
        let args = Compressor::ffmpeg_args(
            Path::new("clip.mp4"),
            Path::new("clip_compressed.mp4"),
            QualityPreset::High,
        );

        assert_eq!(
            args,
            vec![
                "-i",
                "clip.mp4",
                "-vcodec",
                "libx264",
                "-b:v",
                "300k",
                "-crf",
                "32",
                "-preset",
                "medium",
                "-y",
                "clip_compressed.mp4",
            ]
        );
    }

    #[test]
    fn test_ffmpeg_args_per_preset() {
        for (preset, bitrate, crf) in [
            (QualityPreset::Low, "800k", "23"),
            (QualityPreset::Medium, "500k", "28"),
            (QualityPreset::High, "300k", "32"),
        ] {
            let args = Compressor::ffmpeg_args(Path::new("in.mp4"), Path::new("out.mp4"), preset);
            let bv = args.iter().position(|a| a == "-b:v").unwrap();
            assert_eq!(args[bv + 1], bitrate);
            let c = args.iter().position(|a| a == "-crf").unwrap();
            assert_eq!(args[c + 1], crf);
        }
    }

    #[test]
    fn test_unsupported_input_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("notes.txt");
        std::fs::write(&input, "not media").unwrap();

        let job = CompressionJob::new(
            input,
            temp_dir.path().join("out.txt"),
            QualityPreset::Medium,
        );
        let err = Compressor::compress(&job).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_missing_input_rejected() {
        let job = CompressionJob::new(
            PathBuf::from("/no/such/photo.jpg"),
            PathBuf::from("/tmp/out.jpg"),
            QualityPreset::Low,
        );
        assert!(Compressor::compress(&job).is_err());
    }

    #[test]
    fn test_image_compression_normalizes_alpha() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.png");
        let output = temp_dir.path().join("photo_compressed.jpg");

        // RGBA input with a translucent pixel
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 128]));
        img.save(&input).unwrap();

        let job = CompressionJob::new(input, output.clone(), QualityPreset::Low);
        let report = Compressor::compress(&job).unwrap();

        assert_eq!(report.output_path, output);
        assert!(report.output_bytes > 0);

        // The JPEG output must be plain three-channel RGB
        let reloaded = image::open(&output).unwrap();
        assert!(!reloaded.color().has_alpha());
    }

    #[test]
    fn test_image_compression_non_jpeg_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.png");
        let output = temp_dir.path().join("photo_compressed.png");

        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 128, 255, 255]));
        img.save(&input).unwrap();

        let job = CompressionJob::new(input, output.clone(), QualityPreset::Medium);
        Compressor::compress(&job).unwrap();
        assert!(output.exists());
    }
}
