//! Export pipeline: turn the ranked tiers into a shareable PNG.
//!
//! Split into pure layout math ([`layout`]), the embedded label font
//! ([`font`]), and the rasterizer itself ([`render`]). The split keeps the
//! geometry testable without touching pixels.

pub mod layout;

mod font;
mod render;

pub use render::{EXPORT_FILENAME, ExportArtifact, ExportError, render};
