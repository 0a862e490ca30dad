//! # Media Compressor - Main Entry Point
//!
//! Punto di ingresso del compressore interattivo.
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (pre-compilazione del form)
//! 2. Verifica la disponibilità di ffmpeg (non fatale: i job immagine
//!    funzionano comunque)
//! 3. Configura il terminale (raw mode + alternate screen)
//! 4. Esegue l'event loop dell'applicazione
//! 5. Ripristina il terminale anche in caso di errore
//!
//! Il binario possiede lo schermo alternato, quindi non installa un
//! subscriber tracing: il feedback utente passa dalla status line e dal
//! log pane della TUI.
//!
//! ## Esempio di utilizzo:
//! ```bash
//! media-compressor --input clip.mp4 --preset high
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use media_toolkit::tui::{restore_terminal, setup_terminal, App};
use media_toolkit::{Compressor, QualityPreset};

#[derive(Parser)]
#[command(name = "media-compressor")]
#[command(about = "Compress a local image or video file through an interactive form")]
struct Args {
    /// Input media file to pre-fill the form with
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (defaults to <stem>_compressed<ext> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compression level
    #[arg(short, long)]
    preset: Option<QualityPreset>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut app = App::with_prefill(args.input, args.output, args.preset);

    if let Err(e) = Compressor::check_dependencies() {
        // Image jobs still work without ffmpeg; surface the gap in the log
        app.log(format!("Warning: {}", e));
    }

    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal);
    restore_terminal(&mut terminal)?;

    result
}
