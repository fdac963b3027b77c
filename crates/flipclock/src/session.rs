//! Pomodoro session timer
//!
//! A countdown that alternates between work and break sessions. The timer
//! never reads the clock: the owner calls `tick` once per elapsed second
//! while it runs and `poll` to let the delayed auto-advance fire.
//!
//! States are `Idle(kind, remaining)` and `Running(kind, remaining)`. When a
//! session reaches zero the timer pauses, reports `SessionComplete`, and
//! `ADVANCE_DELAY` later loads the other session kind.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::schedule::Schedule;

/// Pause between a session completing and the next one being loaded
pub const ADVANCE_DELAY: Duration = Duration::from_secs(1);

/// Kind of session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionKind {
    #[default]
    Work,
    Break,
}

impl SessionKind {
    /// The kind a natural transition moves to
    pub fn next(self) -> Self {
        match self {
            SessionKind::Work => SessionKind::Break,
            SessionKind::Break => SessionKind::Work,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Work => "work",
            SessionKind::Break => "break",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Work => "Work",
            SessionKind::Break => "Break",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DurationError {
    #[error("{kind} duration must be at least one second")]
    Zero { kind: SessionKind },
}

/// Configured session lengths in seconds. Both are at least one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Durations {
    #[serde(rename = "work_secs")]
    work: u32,
    #[serde(rename = "break_secs")]
    rest: u32,
}

impl Durations {
    pub fn new(work_secs: u32, break_secs: u32) -> Result<Self, DurationError> {
        if work_secs == 0 {
            return Err(DurationError::Zero {
                kind: SessionKind::Work,
            });
        }
        if break_secs == 0 {
            return Err(DurationError::Zero {
                kind: SessionKind::Break,
            });
        }
        Ok(Self {
            work: work_secs,
            rest: break_secs,
        })
    }

    pub fn from_minutes(work_mins: u32, break_mins: u32) -> Result<Self, DurationError> {
        Self::new(work_mins.saturating_mul(60), break_mins.saturating_mul(60))
    }

    pub fn work_secs(&self) -> u32 {
        self.work
    }

    pub fn break_secs(&self) -> u32 {
        self.rest
    }

    pub fn for_kind(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.work,
            SessionKind::Break => self.rest,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work: 25 * 60,
            rest: 5 * 60,
        }
    }
}

/// What the timer reports back to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A session counted down to zero
    SessionComplete(SessionKind),
    /// The delayed natural transition loaded the next session
    Advanced { from: SessionKind, to: SessionKind },
}

/// Work/break countdown
#[derive(Debug)]
pub struct SessionTimer {
    durations: Durations,
    /// Length of the loaded session, latched while running
    total: u32,
    remaining: u32,
    running: bool,
    kind: SessionKind,
    completed_work_sessions: u32,
    /// At most one entry: the kind that just completed
    advance: Schedule<SessionKind>,
}

impl SessionTimer {
    /// A paused work session with the full work duration loaded
    pub fn new(durations: Durations) -> Self {
        let total = durations.for_kind(SessionKind::Work);
        Self {
            durations,
            total,
            remaining: total,
            running: false,
            kind: SessionKind::Work,
            completed_work_sessions: 0,
            advance: Schedule::new(),
        }
    }

    /// Start counting down. Returns false when already running or when the
    /// session has finished and is waiting for the auto-advance.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining == 0 {
            return false;
        }
        self.running = true;
        debug!(kind = %self.kind, remaining = self.remaining, "timer started");
        true
    }

    /// Stop counting down, keeping the remaining time
    pub fn pause(&mut self) {
        if self.running {
            debug!(kind = %self.kind, remaining = self.remaining, "timer paused");
        }
        self.running = false;
    }

    /// Reload the full duration of the current kind and pause.
    /// Cancels a pending auto-advance.
    pub fn reset(&mut self) {
        self.cancel_advance();
        self.running = false;
        self.load(self.kind);
    }

    /// Load `kind` with its full duration and pause.
    /// Cancels a pending auto-advance.
    pub fn switch_mode(&mut self, kind: SessionKind) {
        self.cancel_advance();
        self.running = false;
        self.kind = kind;
        self.load(kind);
    }

    /// Apply new durations. An idle timer reloads the current kind right
    /// away; a running one keeps its latched countdown until the next reset,
    /// mode switch or natural transition.
    pub fn set_durations(&mut self, durations: Durations) {
        self.durations = durations;
        if !self.running && self.advance.is_empty() {
            self.load(self.kind);
        }
    }

    /// One elapsed second. Returns `SessionComplete` on the tick that
    /// reaches zero; ticks while paused do nothing.
    pub fn tick(&mut self, now: Instant) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }

        if self.remaining > 1 {
            self.remaining -= 1;
            return None;
        }

        self.remaining = 0;
        self.running = false;
        self.advance.clear();
        self.advance.after(now, ADVANCE_DELAY, self.kind);
        info!(kind = %self.kind, "session complete");
        Some(TimerEvent::SessionComplete(self.kind))
    }

    /// Run the auto-advance if it has come due
    pub fn poll(&mut self, now: Instant) -> Option<TimerEvent> {
        let completed = self.advance.take_due(now).pop()?;
        let next = completed.next();

        if completed == SessionKind::Break {
            self.completed_work_sessions += 1;
        }
        self.kind = next;
        self.load(next);

        info!(from = %completed, to = %next, completed = self.completed_work_sessions, "advanced");
        Some(TimerEvent::Advanced {
            from: completed,
            to: next,
        })
    }

    fn load(&mut self, kind: SessionKind) {
        self.total = self.durations.for_kind(kind);
        self.remaining = self.total;
    }

    fn cancel_advance(&mut self) {
        if !self.advance.is_empty() {
            debug!("pending auto-advance cancelled");
            self.advance.clear();
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    /// Length of the loaded session
    pub fn total_secs(&self) -> u32 {
        self.total
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.total - self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn is_advance_pending(&self) -> bool {
        !self.advance.is_empty()
    }

    /// When the pending auto-advance comes due
    pub fn next_due(&self) -> Option<Instant> {
        self.advance.next_due()
    }

    /// Progress through the loaded session (0-100)
    pub fn progress_percent(&self) -> f64 {
        f64::from(self.elapsed_secs()) / f64::from(self.total) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    /// Tick `n` times one second apart, collecting events
    fn run_ticks(timer: &mut SessionTimer, t0: Instant, n: u32) -> Vec<TimerEvent> {
        (1..=n)
            .filter_map(|i| timer.tick(t0 + secs(u64::from(i))))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let timer = SessionTimer::new(Durations::new(10, 4).unwrap());
        assert_eq!(timer.kind(), SessionKind::Work);
        assert_eq!(timer.remaining_secs(), 10);
        assert!(!timer.is_running());
        assert_eq!(timer.completed_work_sessions(), 0);
        assert_eq!(timer.progress_percent(), 0.0);
    }

    #[test]
    fn test_zero_durations_rejected() {
        assert_eq!(
            Durations::new(0, 5),
            Err(DurationError::Zero {
                kind: SessionKind::Work
            })
        );
        assert_eq!(
            Durations::from_minutes(25, 0),
            Err(DurationError::Zero {
                kind: SessionKind::Break
            })
        );
    }

    #[test]
    fn test_work_session_completes_once_and_advances_to_break() {
        for work in [1, 2, 7, 60] {
            let t0 = Instant::now();
            let mut timer = SessionTimer::new(Durations::new(work, 3).unwrap());
            assert!(timer.start());

            let events = run_ticks(&mut timer, t0, work);
            assert_eq!(events, vec![TimerEvent::SessionComplete(SessionKind::Work)]);
            assert_eq!(timer.remaining_secs(), 0);
            assert!(!timer.is_running());
            assert!(timer.is_advance_pending());

            let done = t0 + secs(u64::from(work));
            assert_eq!(timer.poll(done), None);
            assert_eq!(
                timer.poll(done + ADVANCE_DELAY),
                Some(TimerEvent::Advanced {
                    from: SessionKind::Work,
                    to: SessionKind::Break
                })
            );
            assert_eq!(timer.kind(), SessionKind::Break);
            assert_eq!(timer.remaining_secs(), 3);
            assert!(!timer.is_running());
            assert_eq!(timer.completed_work_sessions(), 0);
        }
    }

    #[test]
    fn test_pomodoro_scenario() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::from_minutes(25, 5).unwrap());
        timer.start();

        let mut completions = Vec::new();
        for i in 1..=1500u32 {
            if let Some(event) = timer.tick(t0 + secs(u64::from(i))) {
                completions.push((i, event));
            }
        }
        assert_eq!(
            completions,
            vec![(1500, TimerEvent::SessionComplete(SessionKind::Work))]
        );

        timer.poll(t0 + secs(1501));
        assert_eq!(timer.kind(), SessionKind::Break);
        assert_eq!(timer.remaining_secs(), 300);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_counter_increments_once_per_full_cycle() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(2, 1).unwrap());

        let mut now = t0;
        for cycle in 1..=3 {
            for _ in 0..2 {
                timer.start();
                let total = timer.remaining_secs();
                for _ in 0..total {
                    now += secs(1);
                    timer.tick(now);
                }
                now += ADVANCE_DELAY;
                assert!(timer.poll(now).is_some());
            }
            assert_eq!(timer.kind(), SessionKind::Work);
            assert_eq!(timer.completed_work_sessions(), cycle);
        }
    }

    #[test]
    fn test_manual_operations_never_count() {
        let mut timer = SessionTimer::new(Durations::new(5, 3).unwrap());
        for _ in 0..4 {
            timer.switch_mode(SessionKind::Break);
            timer.reset();
            timer.switch_mode(SessionKind::Work);
            timer.reset();
        }
        assert_eq!(timer.completed_work_sessions(), 0);
    }

    #[test]
    fn test_ticks_while_paused_are_ignored() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(10, 3).unwrap());
        timer.start();
        run_ticks(&mut timer, t0, 3);
        timer.pause();
        timer.pause();

        assert!(run_ticks(&mut timer, t0, 20).is_empty());
        assert_eq!(timer.remaining_secs(), 7);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_start_is_a_noop_when_running_or_finished() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(1, 3).unwrap());
        assert!(timer.start());
        assert!(!timer.start());

        timer.tick(t0 + secs(1));
        assert!(!timer.start());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_reset_restores_current_kind() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(10, 4).unwrap());
        timer.start();
        run_ticks(&mut timer, t0, 6);
        timer.reset();
        assert_eq!(timer.remaining_secs(), 10);
        assert!(!timer.is_running());

        timer.switch_mode(SessionKind::Break);
        timer.start();
        run_ticks(&mut timer, t0, 2);
        timer.reset();
        assert_eq!(timer.kind(), SessionKind::Break);
        assert_eq!(timer.remaining_secs(), 4);
    }

    #[test]
    fn test_switch_mode_while_running() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::from_minutes(25, 5).unwrap());
        timer.start();
        run_ticks(&mut timer, t0, 42);

        timer.switch_mode(SessionKind::Break);
        assert!(!timer.is_running());
        assert_eq!(timer.kind(), SessionKind::Break);
        assert_eq!(timer.remaining_secs(), 300);
        assert_eq!(timer.completed_work_sessions(), 0);
    }

    #[test]
    fn test_manual_switch_cancels_pending_advance() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(1, 3).unwrap());
        timer.start();
        timer.tick(t0 + secs(1));
        assert!(timer.is_advance_pending());

        timer.switch_mode(SessionKind::Work);
        assert!(!timer.is_advance_pending());
        assert_eq!(timer.poll(t0 + secs(10)), None);
        assert_eq!(timer.kind(), SessionKind::Work);
        assert_eq!(timer.remaining_secs(), 1);
    }

    #[test]
    fn test_reset_cancels_pending_advance() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(2, 1).unwrap());
        timer.switch_mode(SessionKind::Break);
        timer.start();
        timer.tick(t0 + secs(1));

        timer.reset();
        assert_eq!(timer.poll(t0 + secs(10)), None);
        assert_eq!(timer.kind(), SessionKind::Break);
        assert_eq!(timer.remaining_secs(), 1);
        assert_eq!(timer.completed_work_sessions(), 0);
    }

    #[test]
    fn test_advance_window_ignores_ticks_and_start() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(1, 1).unwrap());
        timer.start();
        assert_eq!(
            timer.tick(t0 + secs(1)),
            Some(TimerEvent::SessionComplete(SessionKind::Work))
        );

        // Still inside the advance delay
        let late = t0 + secs(1) + Duration::from_millis(500);
        assert_eq!(timer.tick(late), None);
        assert_eq!(timer.remaining_secs(), 0);
        timer.pause();
        assert!(!timer.start());
        assert!(!timer.is_running());
        assert!(timer.is_advance_pending());

        assert_eq!(
            timer.poll(t0 + secs(2)),
            Some(TimerEvent::Advanced {
                from: SessionKind::Work,
                to: SessionKind::Break,
            })
        );
        assert_eq!(timer.remaining_secs(), 1);
        assert_eq!(timer.completed_work_sessions(), 0);

        timer.start();
        assert_eq!(
            timer.tick(t0 + secs(3)),
            Some(TimerEvent::SessionComplete(SessionKind::Break))
        );
        assert_eq!(timer.tick(t0 + secs(3)), None);
        timer.poll(t0 + secs(4));
        assert_eq!(timer.kind(), SessionKind::Work);
        assert_eq!(timer.completed_work_sessions(), 1);
    }

    #[test]
    fn test_config_change_while_idle_reloads() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(10, 4).unwrap());
        timer.start();
        run_ticks(&mut timer, t0, 3);
        timer.pause();

        timer.set_durations(Durations::new(20, 4).unwrap());
        assert_eq!(timer.remaining_secs(), 20);
        assert_eq!(timer.total_secs(), 20);
    }

    #[test]
    fn test_config_change_while_running_is_latched() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(10, 4).unwrap());
        timer.start();
        run_ticks(&mut timer, t0, 3);

        timer.set_durations(Durations::new(20, 8).unwrap());
        assert_eq!(timer.remaining_secs(), 7);
        assert_eq!(timer.total_secs(), 10);

        // The natural transition picks up the new break length
        run_ticks(&mut timer, t0 + secs(3), 7);
        timer.poll(t0 + secs(11));
        assert_eq!(timer.kind(), SessionKind::Break);
        assert_eq!(timer.remaining_secs(), 8);

        timer.switch_mode(SessionKind::Work);
        assert_eq!(timer.remaining_secs(), 20);
    }

    #[test]
    fn test_config_change_waits_for_pending_advance() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(1, 4).unwrap());
        timer.start();
        timer.tick(t0 + secs(1));

        timer.set_durations(Durations::new(1, 9).unwrap());
        assert_eq!(timer.remaining_secs(), 0);
        timer.poll(t0 + secs(2));
        assert_eq!(timer.remaining_secs(), 9);
    }

    #[test]
    fn test_progress_percent() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(4, 1).unwrap());
        timer.start();
        run_ticks(&mut timer, t0, 1);
        assert_eq!(timer.progress_percent(), 25.0);
        run_ticks(&mut timer, t0, 3);
        assert_eq!(timer.progress_percent(), 100.0);
    }

    #[test]
    fn test_remaining_never_exceeds_total() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new(Durations::new(3, 2).unwrap());
        let mut now = t0;
        for step in 0..40u32 {
            match step % 7 {
                0 => {
                    timer.start();
                }
                3 => timer.set_durations(Durations::new(3 + step % 4, 2).unwrap()),
                5 => timer.pause(),
                _ => {}
            }
            now += secs(1);
            timer.tick(now);
            timer.poll(now);
            assert!(timer.remaining_secs() <= timer.total_secs());
        }
    }
}
