//! # Platform-specific utilities
//!
//! Questo modulo centralizza tutta la logica per la gestione cross-platform
//! dei comandi e delle dipendenze esterne (ffmpeg, yt-dlp).

use std::collections::HashMap;
use std::sync::OnceLock;

/// Platform-specific command manager
pub struct PlatformCommands {
    commands: HashMap<&'static str, &'static str>,
    which_command: &'static str,
}

impl PlatformCommands {
    /// Get the singleton instance
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<PlatformCommands> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    /// Initialize platform-specific commands
    fn new() -> Self {
        let (commands, which_command) = if cfg!(windows) {
            let mut commands = HashMap::new();
            commands.insert("ffmpeg", "ffmpeg.exe");
            commands.insert("yt-dlp", "yt-dlp.exe");
            (commands, "where")
        } else {
            let mut commands = HashMap::new();
            commands.insert("ffmpeg", "ffmpeg");
            commands.insert("yt-dlp", "yt-dlp");
            (commands, "which")
        };

        Self { commands, which_command }
    }

    /// Get the platform-specific command name
    pub fn get_command<'a>(&self, base_name: &'a str) -> &'a str {
        self.commands.get(base_name).unwrap_or(&base_name)
    }

    /// Get the command used to check if a program exists
    pub fn which_command(&self) -> &str {
        self.which_command
    }

    /// Check if a command is available on the system (async, downloader side)
    pub async fn is_command_available(&self, base_name: &str) -> bool {
        let command_name = self.get_command(base_name);

        let result = tokio::process::Command::new(self.which_command)
            .arg(command_name)
            .output()
            .await;

        match result {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    /// Check if a command is available on the system (blocking, compressor side)
    pub fn is_command_available_blocking(&self, base_name: &str) -> bool {
        let command_name = self.get_command(base_name);

        let result = std::process::Command::new(self.which_command)
            .arg(command_name)
            .output();

        match result {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}
