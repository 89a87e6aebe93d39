//! TUI application state and key handling

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Color;

use super::event::{Event, EventHandler};
use super::ui::Terminal;
use super::utils::category_color;
use super::views;
use crate::domain::{CategoryId, DrawSession, SessionError, SessionEvent};
use crate::storage::DrawConfig;

/// Frames the preview flashes after a commit
const CELEBRATION_FRAMES: u8 = 12;

const HELP: &str = "space/enter:start-stop s:start x:stop r:reset q:quit";

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    ConfirmReset,
}

/// Application state
pub struct App {
    /// The draw engine
    session: DrawSession,

    /// Events published by the session
    session_events: mpsc::Receiver<SessionEvent>,

    /// Display colour per category
    colors: HashMap<CategoryId, Color>,

    input_mode: InputMode,

    /// Status message to display
    status_message: Option<String>,

    /// Remaining celebration frames
    celebration: u8,

    should_quit: bool,
}

impl App {
    /// Create a new application
    pub fn new(config: &DrawConfig, seed: Option<u64>) -> Result<Self> {
        let mut session = DrawSession::new(&config.categories, config.session_options(seed))
            .context("Invalid category configuration")?;

        let (tx, rx) = mpsc::channel();
        session.subscribe(move |event| {
            // The receiver lives as long as the app, so a failed send only
            // happens during teardown
            let _ = tx.send(event.clone());
        });

        let colors = session
            .registry()
            .categories()
            .enumerate()
            .map(|(index, category)| {
                (category.id().clone(), category_color(category.color(), index))
            })
            .collect();

        Ok(Self {
            session,
            session_events: rx,
            colors,
            input_mode: InputMode::Normal,
            status_message: None,
            celebration: 0,
            should_quit: false,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            self.session.poll(Instant::now());
            self.drain_session_events();

            terminal.draw(|frame| views::board::draw(frame, self))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize => {} // Terminal handles resize automatically
                Event::Frame => self.celebration = self.celebration.saturating_sub(1),
            }
        }

        Ok(())
    }

    /// React to what the session published since the last frame
    fn drain_session_events(&mut self) {
        while let Ok(event) = self.session_events.try_recv() {
            match event {
                SessionEvent::PreviewUpdated(_) => {}
                SessionEvent::DrawCommitted(entry) => {
                    self.celebration = CELEBRATION_FRAMES;
                    self.status_message = Some(format!(
                        "Draw #{}: {} ({})",
                        entry.position, entry.value, entry.category
                    ));
                }
                SessionEvent::PoolsExhausted => {
                    self.status_message =
                        Some("All numbers have been drawn! Press r to restart.".to_string());
                }
            }
        }
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::ConfirmReset => {
                self.handle_confirm_key(key);
                Ok(())
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.session.is_spinning() {
                    self.stop()?;
                } else {
                    self.start()?;
                }
            }
            KeyCode::Char('s') => self.start()?,
            KeyCode::Char('x') => self.stop()?,
            KeyCode::Char('r') => {
                // Nothing to lose once everything is drawn or nothing was drawn yet
                if self.session.is_exhausted() || self.session.history().is_empty() {
                    self.reset();
                } else {
                    self.input_mode = InputMode::ConfirmReset;
                }
            }
            KeyCode::Char('?') => {
                self.status_message = Some(HELP.to_string());
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.reset();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn start(&mut self) -> Result<()> {
        match self.session.start() {
            Ok(_) => {
                self.status_message = None;
                self.celebration = 0;
                Ok(())
            }
            Err(e) => self.refuse(e),
        }
    }

    fn stop(&mut self) -> Result<()> {
        match self.session.stop() {
            Ok(_) => {
                self.drain_session_events();
                Ok(())
            }
            Err(e) => self.refuse(e),
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.drain_session_events();
        self.celebration = 0;
        self.status_message = Some("Pools restored, history cleared".to_string());
    }

    /// Shows rejections in the status bar; anything else is fatal
    fn refuse(&mut self, error: SessionError) -> Result<()> {
        match error.rejection() {
            Some(reason) => {
                self.status_message = Some(format!("Can't do that: {}", reason));
                Ok(())
            }
            None => Err(error.into()),
        }
    }

    // Accessors for views

    pub fn session(&self) -> &DrawSession {
        &self.session
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration > 0
    }

    /// Alternates while celebrating, for flashing
    pub fn celebration_phase(&self) -> bool {
        self.celebration % 2 == 1
    }

    pub fn color_of(&self, category: &CategoryId) -> Color {
        self.colors.get(category).copied().unwrap_or(Color::Gray)
    }
}
