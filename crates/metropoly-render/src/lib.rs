#![forbid(unsafe_code)]

//! Ring layout and SVG/HTML rendering for Metropoly boards, tiles and cards.

pub mod board;
pub mod catalog;
pub mod html;
pub mod model;
pub mod output;
pub mod ring;
pub mod svg;

use crate::catalog::{GeneratedTileCatalog, TileCatalog};
use crate::model::Traversal;
use std::path::PathBuf;
use std::sync::Arc;

pub use board::layout_board;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] metropoly_core::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read font {}: {source}", path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported font file extension: {extension:?}")]
    UnsupportedFont { extension: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub tile_catalog: Arc<dyn TileCatalog + Send + Sync>,
    pub traversal: Traversal,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            tile_catalog: Arc::new(GeneratedTileCatalog::default()),
            traversal: Traversal::default(),
        }
    }
}

impl LayoutOptions {
    pub fn with_tile_catalog(mut self, catalog: impl TileCatalog + Send + Sync + 'static) -> Self {
        self.tile_catalog = Arc::new(catalog);
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }
}
