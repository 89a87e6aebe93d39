//! Tombola - live raffle drawing from weighted number pools
//!
//! Numbers are drawn without replacement from disjoint category pools.
//! An operator starts a spin, a rapidly changing preview is shown, and
//! stopping commits the previewed number.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{CategorySpec, Draw, DrawSession, HistoryEntry, SessionEvent, SessionState};
