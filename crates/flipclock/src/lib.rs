//! flipclock - Flip-card clock and Pomodoro timer
//!
//! "One card per field. One flip per second."
//!
//! The core of the terminal view:
//! - `session`: the Pomodoro work/break countdown state machine
//! - `flip`: the buffered value behind each flip card
//! - `schedule`: cancellable delayed actions owned by those components
//! - `sound`: the completion chime
//!
//! Neither the timer nor the cards read the clock themselves. The caller
//! passes `Instant`s in and calls `poll` to run whatever has come due.

pub mod flip;
pub mod schedule;
pub mod session;
pub mod sound;

pub use flip::{CardSize, FlipCard, FlipPhase};
pub use schedule::Schedule;
pub use session::{DurationError, Durations, SessionKind, SessionTimer, TimerEvent};
pub use sound::{Chime, Silent, SoundBackend};
