//! # Media Downloader - Main Entry Point
//!
//! Punto di ingresso del downloader interattivo.
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (directory di output, verbose)
//! 2. Configura il logging con `tracing` (INFO o DEBUG)
//! 3. Verifica la disponibilità di yt-dlp
//! 4. Esegue il menu interattivo: download, listing formati, uscita
//!
//! Ogni fallimento per-URL è stampato e il loop continua: il retry è
//! l'utente che reinserisce l'URL.
//!
//! ## Esempio di utilizzo:
//! ```bash
//! media-downloader --output-dir ~/Downloads/media --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use media_toolkit::platform::PlatformCommands;
use media_toolkit::{Downloader, DownloaderConfig};

#[derive(Parser)]
#[command(name = "media-downloader")]
#[command(about = "Download remote video/audio by delegating to yt-dlp")]
struct Args {
    /// Directory where downloaded files are written
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = DownloaderConfig::default();
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    if !PlatformCommands::instance().is_command_available("yt-dlp").await {
        return Err(anyhow::anyhow!(
            "yt-dlp is required for media download but was not found on PATH"
        ));
    }

    let downloader = Downloader::new(config)?;
    println!("Output directory: {}", downloader.config().output_dir.display());

    run_menu(&downloader).await
}

/// Interactive text menu: download, list formats, anything else exits.
async fn run_menu(downloader: &Downloader) -> Result<()> {
    loop {
        println!();
        println!("1. Download media");
        println!("2. List available formats");
        println!("Else. Exit");

        let choice = prompt("Enter your choice: ")?;

        match choice.as_str() {
            "1" => {
                let url = prompt("Enter the media URL: ")?;
                if !url.is_empty() {
                    download_one(downloader, &url).await;
                }
            }
            "2" => {
                let url = prompt("Enter the media URL: ")?;
                if url.is_empty() {
                    continue;
                }

                match downloader.list_formats(&url).await {
                    Ok(_) => {
                        let answer = prompt("Download this media? (y/n): ")?;
                        if answer.eq_ignore_ascii_case("y") {
                            let format_id =
                                prompt("Enter format ID (leave blank for best quality): ")?;
                            if format_id.is_empty() {
                                download_one(downloader, &url).await;
                            } else {
                                download_with_format(downloader, &url, &format_id).await;
                            }
                        }
                    }
                    Err(e) => println!("❌ Error listing formats: {}", e),
                }
            }
            _ => break,
        }
    }

    Ok(())
}

/// One best-effort download; failures are reported and the loop continues.
async fn download_one(downloader: &Downloader, url: &str) {
    if let Err(e) = downloader.download(url).await {
        println!("❌ Failed to download {}: {}", url, e);
    }
}

async fn download_with_format(downloader: &Downloader, url: &str, format_id: &str) {
    if let Err(e) = downloader.download_with_format(url, format_id).await {
        println!("❌ Failed to download {}: {}", url, e);
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
