//! This module defines the core application logic for the compressor TUI.
//!
//! It manages the form state, handles user input, and runs compression jobs
//! on a background worker thread. The worker never touches view state: it
//! reports its outcome over an mpsc channel that the event loop drains, and
//! the `JobState` transition check guarantees at most one job in flight.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
    time::Duration,
};

use crate::{
    classifier::{self, MediaKind},
    compressor::Compressor,
    config::QualityPreset,
    job::{CompressionJob, JobReport, JobState},
};

use super::ui;

/// Outcome message sent from the worker thread to the event loop.
#[derive(Debug)]
pub enum WorkerEvent {
    Finished(Result<JobReport>),
}

/// Readout for the currently selected input file.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub kind: MediaKind,
    pub size_mb: f64,
}

impl FileInfo {
    fn for_path(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            name: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            kind: classifier::classify_path(path),
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        })
    }
}

/// Items in the compressor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Input,
    Output,
    Preset,
    Compress,
    Clear,
}

/// The main application struct, holding the state of the TUI.
pub struct App {
    pub input_path: String,
    pub output_path: String,
    pub preset: QualityPreset,
    pub state: JobState,
    pub status_message: String,
    pub file_info: Option<FileInfo>,
    pub logs: Vec<String>,
    menu_items: Vec<MenuItem>,
    menu_index: usize,
    currently_editing: Option<MenuItem>,
    input_text: String,
    rx: Option<mpsc::Receiver<WorkerEvent>>,
    exiting: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            output_path: String::new(),
            preset: QualityPreset::Medium,
            state: JobState::Idle,
            status_message: String::from("Ready"),
            file_info: None,
            logs: Vec::new(),
            menu_items: vec![
                MenuItem::Input,
                MenuItem::Output,
                MenuItem::Preset,
                MenuItem::Compress,
                MenuItem::Clear,
            ],
            menu_index: 0,
            currently_editing: None,
            input_text: String::new(),
            rx: None,
            exiting: false,
        }
    }
}

impl App {
    /// Create an app with the form pre-filled from CLI arguments.
    pub fn with_prefill(
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        preset: Option<QualityPreset>,
    ) -> Self {
        let mut app = Self::default();
        if let Some(input) = input {
            app.input_path = input.to_string_lossy().to_string();
            app.refresh_input();
        }
        if let Some(output) = output {
            app.output_path = output.to_string_lossy().to_string();
        }
        if let Some(preset) = preset {
            app.preset = preset;
        }
        app
    }

    /// Runs the main application loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.exiting {
            terminal.draw(|f| ui::draw(f, self))?;
            self.handle_events()?;
            self.handle_worker_events();
        }
        Ok(())
    }

    /// Append a line to the log pane (used by the binary for startup notes).
    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
        if self.logs.len() > 100 {
            self.logs.remove(0);
        }
    }

    /// Drains the worker channel and applies the job outcome.
    fn handle_worker_events(&mut self) {
        let Some(rx) = self.rx.as_ref() else {
            return;
        };

        if let Ok(WorkerEvent::Finished(outcome)) = rx.try_recv() {
            self.state.finish(outcome);
            self.status_message = match &self.state {
                JobState::Done(line) => line.clone(),
                JobState::Failed(e) => format!("Error: {}", e),
                _ => self.status_message.clone(),
            };
            let line = self.status_message.clone();
            self.log(line);
            // The trigger is usable again whatever the outcome was
            self.rx = None;
        }
    }

    /// Handles user input events.
    fn handle_events(&mut self) -> Result<()> {
        if !event::poll(Duration::from_millis(100))? {
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            if self.currently_editing.is_some() {
                self.handle_editing_events(key.code);
            } else {
                self.handle_form_events(key.code);
            }
        }

        Ok(())
    }

    fn handle_form_events(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Char('q') | KeyCode::Esc => {
                // The worker thread is detached; a running ffmpeg finishes
                // or dies with the process
                self.exiting = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_index = self.menu_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_index = (self.menu_index + 1).min(self.menu_items.len() - 1);
            }
            KeyCode::Left | KeyCode::Right
                if self.menu_items[self.menu_index] == MenuItem::Preset =>
            {
                self.preset = self.preset.cycle();
            }
            KeyCode::Enter => self.handle_menu_selection(),
            _ => {}
        }
    }

    fn handle_menu_selection(&mut self) {
        match self.menu_items[self.menu_index] {
            MenuItem::Input | MenuItem::Output => {
                self.start_editing(self.menu_items[self.menu_index])
            }
            MenuItem::Preset => self.preset = self.preset.cycle(),
            MenuItem::Compress => self.start_compression(),
            MenuItem::Clear => self.clear_all(),
        }
    }

    fn start_editing(&mut self, item: MenuItem) {
        self.currently_editing = Some(item);
        self.input_text = match item {
            MenuItem::Input => self.input_path.clone(),
            MenuItem::Output => self.output_path.clone(),
            _ => String::new(),
        };
    }

    fn handle_editing_events(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Enter => self.finish_editing(),
            KeyCode::Char(c) => self.input_text.push(c),
            KeyCode::Backspace => {
                self.input_text.pop();
            }
            KeyCode::Esc => {
                self.currently_editing = None;
                self.input_text.clear();
            }
            _ => {}
        }
    }

    fn finish_editing(&mut self) {
        match self.currently_editing {
            Some(MenuItem::Input) => {
                self.input_path = self.input_text.clone();
                self.refresh_input();
            }
            Some(MenuItem::Output) => self.output_path = self.input_text.clone(),
            _ => {}
        }
        self.currently_editing = None;
        self.input_text.clear();
    }

    /// Recompute the file readout and suggest an output path for a new input.
    fn refresh_input(&mut self) {
        let path = PathBuf::from(&self.input_path);
        self.file_info = FileInfo::for_path(&path);

        if self.file_info.is_some() {
            self.output_path = classifier::suggest_output_path(&path)
                .to_string_lossy()
                .to_string();
        }
    }

    /// Starts the background compression thread.
    fn start_compression(&mut self) {
        if self.input_path.is_empty() || self.output_path.is_empty() {
            self.status_message = String::from("Select both input and output files");
            return;
        }

        // Checked precondition: a second job while one is in flight is
        // rejected with a notification, never enqueued
        if self.state.start().is_err() {
            self.status_message = String::from("Compression in progress");
            return;
        }

        self.status_message = String::from("Compressing...");

        let job = CompressionJob::new(
            PathBuf::from(&self.input_path),
            PathBuf::from(&self.output_path),
            self.preset,
        );

        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);

        thread::spawn(move || {
            let outcome = Compressor::compress(&job);
            let _ = tx.send(WorkerEvent::Finished(outcome));
        });
    }

    /// Resets the whole form (the interface's Clear control).
    fn clear_all(&mut self) {
        if self.state.is_busy() {
            self.status_message = String::from("Compression in progress");
            return;
        }

        self.input_path.clear();
        self.output_path.clear();
        self.preset = QualityPreset::Medium;
        self.file_info = None;
        self.state.reset();
        self.status_message = String::from("Ready");
    }

    // Accessors for the renderer

    pub fn menu_items(&self) -> &[MenuItem] {
        &self.menu_items
    }

    pub fn menu_index(&self) -> usize {
        self.menu_index
    }

    pub fn is_editing(&self) -> bool {
        self.currently_editing.is_some()
    }

    pub fn editing_item(&self) -> Option<MenuItem> {
        self.currently_editing
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }
}
