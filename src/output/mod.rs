//! Rendering and export of trial and comparison results.

pub mod json;
pub mod plot;
pub mod terminal;
