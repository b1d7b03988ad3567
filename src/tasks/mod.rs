//! Background Tasks Module
//!
//! Periodic maintenance that runs independently of caller traffic.
//!
//! # Tasks
//! - Expiry reaper: removes expired cache entries at each cache's configured
//!   cleanup interval

mod cleanup;

pub use cleanup::spawn_reaper;
