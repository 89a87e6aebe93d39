//! Event handling for the TUI

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Terminal events
#[derive(Debug)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize event
    Resize,
    /// No input within one frame
    Frame,
}

/// Reads terminal input on a separate thread
///
/// The thread only forwards input and frame wake-ups. The draw session is
/// driven from the main loop, so commands and ticks never run concurrently.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Create a new event handler waking at least every `frame_ms` milliseconds
    pub fn new(frame_ms: u64) -> Self {
        let frame_rate = Duration::from_millis(frame_ms);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || loop {
            if event::poll(frame_rate).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    let forwarded = match evt {
                        // Only press events, not release
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                        _ => None,
                    };
                    if let Some(event) = forwarded {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            } else if tx.send(Event::Frame).is_err() {
                break;
            }
        });

        Self { rx }
    }

    /// Receive the next event (blocking)
    pub fn next(&self) -> Result<Event> {
        Ok(self.rx.recv()?)
    }
}
