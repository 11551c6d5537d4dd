//! Shared types for the longstrip reader: the error enum and the
//! geometry primitives every other crate speaks in.

pub mod error;
pub mod geometry;

pub use error::{LongstripError, Result};
pub use geometry::{Rect, Viewport};
