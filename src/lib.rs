//! Arena shooter simulation core.
//!
//! Everything under this crate is pure game logic driven by an accumulated
//! `dt` and an injected random source. Terminal I/O lives in the binary.

pub mod collision;
pub mod combat;
pub mod compute;
pub mod config;
pub mod enemies;
pub mod entities;
pub mod error;
pub mod interfaces;
pub mod player;
pub mod tuning;
pub mod waves;
