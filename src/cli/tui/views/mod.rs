//! TUI views

pub mod board;
