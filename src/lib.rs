//! # ddsequence
//!
//! Match ledger for a fixed five-player 2v2 group.
//!
//! ## Architecture
//!
//! - **models**: Roster, team keys, match and penalty records, query windows
//! - **calculate**: Rankings, streaks, sessions, rank changes, rank-up
//!   conditions, dashboard events and yearly recaps
//! - **storage**: JSON Lines persistence
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
