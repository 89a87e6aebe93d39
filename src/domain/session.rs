//! Draw session state machine
//!
//! The session owns the pool registry, the history ledger, the random
//! source and the tick timer. All mutation goes through `start`, `tick`,
//! `stop` and `reset`.
//!
//! ```text
//!   Idle --start--> Spinning --tick--> Spinning
//!    ^                 |
//!    +------stop-------+   (commits the last preview)
//! ```
//!
//! Stopping always commits the preview that was on display. A fresh pick
//! is never made at stop time, so what the audience saw is what gets
//! recorded.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::category::{CategorySpec, ConfigError, Draw};
use super::ledger::{HistoryEntry, HistoryLedger};
use super::registry::{PoolRegistry, RegistryError};
use super::selector::WeightedSelector;
use super::timer::{TickTimer, DEFAULT_TICK_INTERVAL};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Spinning,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Spinning => f.write_str("spinning"),
        }
    }
}

/// Why a command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadySpinning,
    NotSpinning,
    Exhausted,
    /// Pending values remain, but only in zero-weight categories
    NothingSelectable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Rejection::AlreadySpinning => "a spin is already running",
            Rejection::NotSpinning => "no spin is running",
            Rejection::Exhausted => "all numbers have been drawn",
            Rejection::NothingSelectable => "only zero-weight categories have numbers left",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Rejected: {0}")]
    Rejected(Rejection),

    #[error("Inconsistent draw state: {0}")]
    Inconsistent(#[from] RegistryError),

    #[error("Inconsistent draw state: spinning without a preview")]
    MissingPreview,
}

impl SessionError {
    /// The rejection reason, if this is a recoverable refusal
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            SessionError::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

/// Notifications for presentation-layer observers
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PreviewUpdated(Draw),
    DrawCommitted(HistoryEntry),
    PoolsExhausted,
}

type Observer = Box<dyn FnMut(&SessionEvent)>;

/// Construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub tick_interval: Duration,
    /// Fixed seed for reproducible draws; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }
}

/// A live drawing session
pub struct DrawSession<R = StdRng> {
    initial: PoolRegistry,
    registry: PoolRegistry,
    ledger: HistoryLedger,
    selector: WeightedSelector,
    rng: R,
    state: SessionState,
    preview: Option<Draw>,
    timer: TickTimer,
    observers: Vec<Observer>,
}

impl DrawSession<StdRng> {
    /// Creates a session seeded from `options.seed` or from entropy
    pub fn new(specs: &[CategorySpec], options: SessionOptions) -> Result<Self, ConfigError> {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(specs, options.tick_interval, rng)
    }
}

impl<R: Rng> DrawSession<R> {
    /// Creates a session with an explicit random source
    pub fn with_rng(
        specs: &[CategorySpec],
        tick_interval: Duration,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let initial = PoolRegistry::initialize(specs)?;
        Ok(Self {
            registry: initial.clone(),
            initial,
            ledger: HistoryLedger::new(),
            selector: WeightedSelector::new(),
            rng,
            state: SessionState::Idle,
            preview: None,
            timer: TickTimer::new(tick_interval),
            observers: Vec::new(),
        })
    }

    /// Registers an observer for session events
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Starts spinning now
    pub fn start(&mut self) -> Result<Draw, SessionError> {
        self.start_at(Instant::now())
    }

    /// Starts spinning, showing a first preview immediately and scheduling
    /// the next tick one interval after `now`
    pub fn start_at(&mut self, now: Instant) -> Result<Draw, SessionError> {
        if self.state == SessionState::Spinning {
            return Err(SessionError::Rejected(Rejection::AlreadySpinning));
        }
        if self.registry.is_exhausted() {
            return Err(SessionError::Rejected(Rejection::Exhausted));
        }

        let draw = self
            .selector
            .pick(&self.registry, &mut self.rng)
            .ok_or(SessionError::Rejected(Rejection::NothingSelectable))?;

        self.state = SessionState::Spinning;
        self.timer.arm(now);
        self.set_preview(draw.clone());
        Ok(draw)
    }

    /// Replaces the preview with an independent pick; does nothing when idle
    pub fn tick(&mut self) -> Option<&Draw> {
        if self.state != SessionState::Spinning {
            return None;
        }

        // The registry does not change while spinning, so a pick that
        // succeeded at start keeps succeeding
        if let Some(draw) = self.selector.pick(&self.registry, &mut self.rng) {
            self.set_preview(draw);
        }
        self.preview.as_ref()
    }

    /// Fires a tick if one is due at `now`. Returns true when it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state != SessionState::Spinning || !self.timer.is_due(now) {
            return false;
        }
        self.tick();
        self.timer.arm(now);
        true
    }

    /// Stops the spin and commits the displayed preview
    pub fn stop(&mut self) -> Result<HistoryEntry, SessionError> {
        if self.state != SessionState::Spinning {
            return Err(SessionError::Rejected(Rejection::NotSpinning));
        }
        let draw = self.preview.clone().ok_or(SessionError::MissingPreview)?;

        self.registry.remove(&draw.category, draw.value.number)?;

        // No tick may fire once the commit is being finalized
        self.timer.cancel();
        let entry = self.ledger.append(draw, Utc::now()).clone();
        self.state = SessionState::Idle;

        self.emit(SessionEvent::DrawCommitted(entry.clone()));
        self.check_exhausted();
        Ok(entry)
    }

    /// Restores the initial pools and clears history and preview
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.registry = self.initial.clone();
        self.ledger.clear();
        self.preview = None;
        self.state = SessionState::Idle;
        self.check_exhausted();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state == SessionState::Spinning
    }

    /// Current preview; after a stop this is the committed draw
    pub fn preview(&self) -> Option<&Draw> {
        self.preview.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.registry.is_exhausted()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    pub fn tick_interval(&self) -> Duration {
        self.timer.interval()
    }

    /// Time until the next scheduled tick, `None` when idle
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.until_next(now)
    }

    fn set_preview(&mut self, draw: Draw) {
        self.preview = Some(draw.clone());
        self.emit(SessionEvent::PreviewUpdated(draw));
    }

    fn check_exhausted(&mut self) {
        if self.registry.is_exhausted() {
            self.emit(SessionEvent::PoolsExhausted);
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn session(specs: &[CategorySpec], seed: u64) -> DrawSession {
        DrawSession::new(
            specs,
            SessionOptions {
                seed: Some(seed),
                ..SessionOptions::default()
            },
        )
        .unwrap()
    }

    fn two_small() -> Vec<CategorySpec> {
        vec![CategorySpec::new("A", 3), CategorySpec::new("B", 3)]
    }

    /// Every category's pending and committed numbers partition its initial set
    fn assert_partition(session: &DrawSession) {
        for pool in session.registry().pools() {
            let pending: HashSet<u32> = pool.pending().iter().copied().collect();
            let committed: Vec<u32> = session.history().committed(pool.id()).collect();
            let committed_set: HashSet<u32> = committed.iter().copied().collect();

            assert_eq!(committed.len(), committed_set.len(), "duplicate commit");
            assert!(pending.is_disjoint(&committed_set));

            let union: HashSet<u32> = pending.union(&committed_set).copied().collect();
            let initial: HashSet<u32> = (1..=pool.category().count()).collect();
            assert_eq!(union, initial);
        }
    }

    #[test]
    fn new_session_is_idle() {
        let session = session(&two_small(), 1);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.preview(), None);
        assert!(session.history().is_empty());
        assert!(!session.is_exhausted());
    }

    #[test]
    fn invalid_config_fails_construction() {
        let result = DrawSession::new(&[CategorySpec::new("A", 0)], SessionOptions::default());
        assert!(matches!(result, Err(ConfigError::NonPositiveCount(_, 0))));
    }

    #[test]
    fn start_shows_preview_and_spins() {
        let mut session = session(&two_small(), 1);
        let draw = session.start().unwrap();

        assert_eq!(session.state(), SessionState::Spinning);
        assert_eq!(session.preview(), Some(&draw));
    }

    #[test]
    fn start_rejected_while_spinning() {
        let mut session = session(&two_small(), 1);
        session.start().unwrap();

        let err = session.start().unwrap_err();
        assert_eq!(err, SessionError::Rejected(Rejection::AlreadySpinning));
        assert_eq!(session.state(), SessionState::Spinning);
    }

    #[test]
    fn stop_rejected_when_idle() {
        let mut session = session(&two_small(), 1);
        let err = session.stop().unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NotSpinning));
        assert!(session.history().is_empty());
    }

    #[test]
    fn stop_commits_last_preview() {
        let mut session = session(&two_small(), 3);
        session.start().unwrap();
        for _ in 0..10 {
            session.tick();
        }
        let shown = session.preview().cloned().unwrap();

        let entry = session.stop().unwrap();
        assert_eq!(entry.draw(), shown);
        assert_eq!(entry.position, 1);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.preview(), Some(&shown));
        assert!(!session
            .registry()
            .pending(&shown.category)
            .unwrap()
            .contains(&shown.value.number));
    }

    #[test]
    fn tick_is_noop_when_idle() {
        let mut session = session(&two_small(), 1);
        assert_eq!(session.tick(), None);
        assert_eq!(session.preview(), None);
    }

    #[test]
    fn poll_follows_timer() {
        let mut session = DrawSession::with_rng(
            &two_small(),
            Duration::from_millis(100),
            StdRng::seed_from_u64(5),
        )
        .unwrap();
        let t0 = Instant::now();
        session.start_at(t0).unwrap();

        assert!(!session.poll(t0 + Duration::from_millis(50)));
        assert!(session.poll(t0 + Duration::from_millis(100)));
        assert!(!session.poll(t0 + Duration::from_millis(150)));
        assert!(session.poll(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn no_tick_after_stop() {
        let mut session = session(&two_small(), 1);
        let t0 = Instant::now();
        session.start_at(t0).unwrap();
        let entry = session.stop().unwrap();

        assert_eq!(session.until_next_tick(t0), None);
        assert!(!session.poll(t0 + Duration::from_secs(10)));
        assert_eq!(session.preview(), Some(&entry.draw()));
    }

    #[test]
    fn five_draws_from_two_pools() {
        let mut session = session(&two_small(), 42);

        for n in 1..=5 {
            session.start().unwrap();
            session.tick();
            session.stop().unwrap();
            assert_eq!(session.history().len(), n);
            assert!(!session.is_exhausted());
            assert_partition(&session);
        }

        let distinct: HashSet<_> = session.history().all().map(HistoryEntry::draw).collect();
        assert_eq!(distinct.len(), 5);

        session.start().unwrap();
        session.stop().unwrap();
        assert!(session.is_exhausted());
        assert_eq!(
            session.start().unwrap_err(),
            SessionError::Rejected(Rejection::Exhausted)
        );
    }

    #[test]
    fn single_value_exhausts_then_resets() {
        let mut session = session(&[CategorySpec::new("A", 1)], 1);

        session.start().unwrap();
        let entry = session.stop().unwrap();
        assert_eq!(entry.value.number, 1);
        assert!(session.is_exhausted());
        assert_eq!(session.state(), SessionState::Idle);

        assert_eq!(
            session.start().unwrap_err().rejection(),
            Some(Rejection::Exhausted)
        );

        session.reset();
        assert!(session.start().is_ok());
    }

    #[test]
    fn reset_restores_initial_pools() {
        let mut session = session(&two_small(), 9);
        let initial = session.registry().clone();

        for _ in 0..4 {
            session.start().unwrap();
            session.stop().unwrap();
        }
        session.start().unwrap();
        session.reset();

        assert_eq!(session.registry(), &initial);
        assert!(session.history().is_empty());
        assert_eq!(session.preview(), None);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.poll(Instant::now() + Duration::from_secs(1)));
    }

    #[test]
    fn zero_weight_only_rejects_start() {
        let specs = vec![
            CategorySpec::new("zero", 2).with_weight(0.0),
            CategorySpec::new("one", 1),
        ];
        let mut session = session(&specs, 1);
        session.start().unwrap();
        session.stop().unwrap();

        assert!(!session.is_exhausted());
        assert_eq!(
            session.start().unwrap_err().rejection(),
            Some(Rejection::NothingSelectable)
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn observers_receive_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut session = session(&[CategorySpec::new("A", 1)], 1);
        let sink = Rc::clone(&events);
        session.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        session.start().unwrap();
        session.tick();
        let entry = session.stop().unwrap();

        let events = events.borrow();
        assert!(matches!(events[0], SessionEvent::PreviewUpdated(_)));
        assert!(matches!(events[1], SessionEvent::PreviewUpdated(_)));
        assert_eq!(events[2], SessionEvent::DrawCommitted(entry));
        assert_eq!(events[3], SessionEvent::PoolsExhausted);
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn same_seed_same_draws() {
        let run = |seed| {
            let mut session = session(&two_small(), seed);
            (0..6)
                .map(|_| {
                    session.start().unwrap();
                    session.tick();
                    session.stop().unwrap().draw()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[derive(Debug, Clone)]
    enum Command {
        Start,
        Tick,
        Stop,
        Reset,
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            3 => Just(Command::Start),
            3 => Just(Command::Tick),
            3 => Just(Command::Stop),
            1 => Just(Command::Reset),
        ]
    }

    proptest! {
        #[test]
        fn commands_preserve_partition(
            seed in any::<u64>(),
            commands in proptest::collection::vec(command(), 0..80),
        ) {
            let specs = vec![
                CategorySpec::new("A", 4).with_weight(2.0),
                CategorySpec::new("B", 3),
                CategorySpec::new("C", 2).with_weight(0.5),
                CategorySpec::new("Z", 2).with_weight(0.0),
            ];
            let mut session = session(&specs, seed);
            let mut stops = 0;

            for command in commands {
                let was_spinning = session.is_spinning();
                let was_exhausted = session.is_exhausted();
                let selectable = session
                    .registry()
                    .non_empty_categories()
                    .any(|pool| pool.category().weight() > 0.0);
                match command {
                    Command::Start => {
                        let expected = if was_spinning {
                            Some(Rejection::AlreadySpinning)
                        } else if was_exhausted {
                            Some(Rejection::Exhausted)
                        } else if !selectable {
                            Some(Rejection::NothingSelectable)
                        } else {
                            None
                        };
                        let result = session.start();
                        prop_assert_eq!(result.err().and_then(|e| e.rejection()), expected);
                    }
                    Command::Tick => {
                        session.tick();
                    }
                    Command::Stop => {
                        let result = session.stop();
                        prop_assert_eq!(result.is_ok(), was_spinning);
                        if result.is_ok() {
                            stops += 1;
                        }
                    }
                    Command::Reset => {
                        session.reset();
                        stops = 0;
                    }
                }
                prop_assert_eq!(session.history().len(), stops);
                prop_assert_eq!(session.history().committed(&"Z".into()).count(), 0);
                prop_assert!(!session.is_exhausted());
                assert_partition(&session);
            }
        }
    }
}
