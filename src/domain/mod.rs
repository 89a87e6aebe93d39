//! Draw engine for Tombola
//!
//! Contains the pools, the weighted selector and the draw session without
//! any I/O or presentation concerns.

mod category;
mod ledger;
mod registry;
mod selector;
mod session;
mod timer;

pub use category::{
    Category, CategoryId, CategorySpec, ConfigError, Draw, DrawValue, ValueFormat, DEFAULT_SUFFIX,
    MAX_COUNT, MAX_WEIGHT,
};
pub use ledger::{HistoryEntry, HistoryLedger};
pub use registry::{Pool, PoolRegistry, RegistryError};
pub use selector::{tickets_for, WeightedSelector, TICKET_RESOLUTION};
pub use session::{DrawSession, Rejection, SessionError, SessionEvent, SessionOptions, SessionState};
pub use timer::{TickTimer, DEFAULT_TICK_INTERVAL};
