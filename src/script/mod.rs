//! Script model: the parsed title plus ordered sentence/asset segments.

pub(crate) mod model;
pub(crate) mod schema;
