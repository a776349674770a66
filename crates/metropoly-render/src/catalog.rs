use metropoly_core::FileNaming;
use std::path::PathBuf;

/// Maps a property name to the tile image file the board should reference.
///
/// Returning `None` means the tile does not exist; the board then uses the null tile and records
/// a diagnostic.
pub trait TileCatalog {
    fn resolve(&self, property_name: &str) -> Option<String>;
}

/// Looks tile files up on disk, under [`FileNaming::tiles_dir`] unless told otherwise.
#[derive(Debug, Clone)]
pub struct DirectoryTileCatalog {
    root: PathBuf,
    naming: FileNaming,
}

impl DirectoryTileCatalog {
    pub fn new(naming: FileNaming) -> Self {
        Self {
            root: naming.tiles_dir.clone(),
            naming,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl TileCatalog for DirectoryTileCatalog {
    fn resolve(&self, property_name: &str) -> Option<String> {
        let file = self.naming.tile_file_name(property_name);
        self.root.join(&file).is_file().then_some(file)
    }
}

/// Assumes every tile is (or will be) generated alongside the board.
#[derive(Debug, Clone, Default)]
pub struct GeneratedTileCatalog {
    naming: FileNaming,
}

impl GeneratedTileCatalog {
    pub fn new(naming: FileNaming) -> Self {
        Self { naming }
    }
}

impl TileCatalog for GeneratedTileCatalog {
    fn resolve(&self, property_name: &str) -> Option<String> {
        Some(self.naming.tile_file_name(property_name))
    }
}
