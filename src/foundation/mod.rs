//! Shared primitives: error taxonomy, time and geometry types, pixel math.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
