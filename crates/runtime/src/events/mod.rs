//! Decision events and per-tick reports.
//!
//! The engine publishes [`DecisionEvent`]s whenever arbitration changes course
//! and returns a [`TickReport`] for every tick. Both are observational: no
//! subscriber can influence a decision.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{DecisionEvent, TickReport};
