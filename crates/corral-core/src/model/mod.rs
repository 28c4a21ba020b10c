//! Typed record model shared by every pipeline stage.

pub mod record;
