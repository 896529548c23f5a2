//! # glyphscan-core
//!
//! Core types for glyphscan.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other glyphscan crates. It provides:
//!
//! - Geometry types (Position, Bounds)
//! - The character grid being analyzed
//! - Glyph alphabet and glyph classes used for tolerant matching
//! - The closed set of UI element kinds
//! - Detector configuration
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - the detector and the binary depend
//! on this one, but this crate has no dependencies on other glyphscan crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod grid;
pub mod kind;

// Re-export commonly used types
pub use config::{DetectorConfig, PatternConfig, RenderSettings, ScanSettings, TemplateConfig};
pub use error::{Error, Result};
pub use geometry::{Bounds, Position};
pub use glyph::{classify, GlyphClass};
pub use grid::Grid;
pub use kind::ElementKind;
