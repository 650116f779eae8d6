//! Ports module (Hexagonal Architecture)
//!
//! Interfaces the intake engine needs from the outside world.

pub mod outbound;

pub use outbound::*;
