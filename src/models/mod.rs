//! Core data models for the match ledger.

mod game;
mod ids;
mod penalty;
mod roster;
mod stats;
mod team;
mod validation;
mod window;

pub use game::*;
pub use ids::*;
pub use penalty::*;
pub use roster::*;
pub use stats::*;
pub use team::*;
pub use validation::*;
pub use window::*;
