//! Flip card state
//!
//! A card shows one field (hours, minutes or seconds). When the field's value
//! changes the card keeps showing the old value while it folds, swaps to the
//! new value at `FLIP_MIDPOINT`, and finishes at `FLIP_DURATION`.
//!
//! A newer value arriving mid-flip cancels the steps scheduled for the older
//! one, so a late swap can never put a stale value back on the card.

use std::time::{Duration, Instant};

use crate::schedule::Schedule;

/// When the shown value swaps to the new one
pub const FLIP_MIDPOINT: Duration = Duration::from_millis(200);
/// When the flip finishes
pub const FLIP_DURATION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardSize {
    #[default]
    Large,
    Small,
}

/// Where a card is in its flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipPhase {
    Idle,
    /// Old value still shown
    Folding,
    /// New value shown, flip not finished
    Unfolding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Swap,
    Settle,
}

#[derive(Debug)]
pub struct FlipCard {
    shown: String,
    target: String,
    flipping: bool,
    size: CardSize,
    steps: Schedule<Step>,
}

impl FlipCard {
    pub fn new(value: impl Into<String>, size: CardSize) -> Self {
        let value = value.into();
        Self {
            shown: value.clone(),
            target: value,
            flipping: false,
            size,
            steps: Schedule::new(),
        }
    }

    /// Point the card at a new value. Returns false if it already targets it.
    pub fn update(&mut self, now: Instant, value: &str) -> bool {
        if value == self.target {
            return false;
        }

        self.steps.clear();
        self.target = value.to_string();
        self.flipping = true;
        self.steps.after(now, FLIP_MIDPOINT, Step::Swap);
        self.steps.after(now, FLIP_DURATION, Step::Settle);
        true
    }

    /// Run due flip steps. Returns true if anything visible changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for step in self.steps.take_due(now) {
            match step {
                Step::Swap => {
                    if self.shown != self.target {
                        self.shown = self.target.clone();
                        changed = true;
                    }
                }
                Step::Settle => {
                    self.flipping = false;
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn shown(&self) -> &str {
        &self.shown
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_flipping(&self) -> bool {
        self.flipping
    }

    pub fn size(&self) -> CardSize {
        self.size
    }

    pub fn phase(&self) -> FlipPhase {
        if !self.flipping {
            FlipPhase::Idle
        } else if self.shown != self.target {
            FlipPhase::Folding
        } else {
            FlipPhase::Unfolding
        }
    }

    /// When the next flip step comes due
    pub fn next_due(&self) -> Option<Instant> {
        self.steps.next_due()
    }
}
