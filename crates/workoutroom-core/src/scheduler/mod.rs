//! Tick scheduling.
//!
//! Split in two:
//! - [`TickScheduler`]: synchronous and deterministic. Applies the drift
//!   guard, ticks the engine, detects phase changes and keeps the bounded
//!   [`NotificationHistory`].
//! - [`TickDriver`]: the real-time source, a tokio interval task that calls
//!   back once per period.

mod driver;
mod history;
mod tick;

pub use driver::TickDriver;
pub use history::NotificationHistory;
pub use tick::{PhaseChange, TickOutcome, TickScheduler};
