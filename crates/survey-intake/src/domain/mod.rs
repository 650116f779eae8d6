//! Domain module
//!
//! Survey intake rules: value objects, validators and the form aggregate.

pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregates::*;
pub use events::*;
pub use services::*;
pub use value_objects::*;
