#![forbid(unsafe_code)]

//! Property data model for the Metropoly asset generator (headless).
//!
//! - [`PropertyStore`] loads property records from JSON, CSV or spreadsheet files and normalizes
//!   every alternate column spelling into one [`PropertyRecord`] shape.
//! - [`Palette`] maps symbolic color names to CSS colors, read from an HTML style sheet.
//! - [`BoardConfig`] carries every sizing and naming decision explicitly; there is no global state.

pub mod config;
pub mod error;
pub mod manifest;
pub mod palette;
pub mod property;
pub mod store;

pub use config::{BoardConfig, CanonicalPerimeters, FileNaming, PixelSizes, SizingPolicy};
pub use error::{Error, Result};
pub use manifest::BoardManifest;
pub use palette::Palette;
pub use property::{CardType, Lane, PositionKind, PropertyRecord};
pub use store::{DataFormat, LaneNames, PropertyStore};

#[cfg(test)]
mod tests;
