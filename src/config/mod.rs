//! Render configuration, passed explicitly into the compositor and renderer.

pub(crate) mod settings;
