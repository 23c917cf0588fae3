//! # Mask Module
//!
//! Device-specific geometry for LED mask displays.
//!
//! ## Modules
//!
//! - [`config`]: Mask pixel grid and packing limits

pub mod config;

pub use config::{MASK_HEIGHT, MASK_WIDTH, MaskGeometry, PACKED_ROWS};
