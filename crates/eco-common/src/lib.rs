//! Common types and utilities shared across the eco-score crates.

pub mod bbox;
pub mod category;
pub mod error;
pub mod location;

pub use bbox::BoundingBox;
pub use category::{Color, ScoreCategory};
pub use error::{EcoError, EcoResult};
pub use location::Location;
