#![forbid(unsafe_code)]

//! `metropoly` generates the printable assets of a Metropoly board: one tile and one title deed
//! card per property, and a board of three nested rings (blue, yellow, red) that references the
//! tiles by relative path.
//!
//! # Features
//!
//! - `render`: enable ring layout + SVG/HTML rendering (`metropoly::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use metropoly_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use metropoly_render::catalog::{DirectoryTileCatalog, GeneratedTileCatalog, TileCatalog};
    pub use metropoly_render::html::{HtmlRenderOptions, render_board_html};
    pub use metropoly_render::model::{
        BoardLayout, Diagnostic, DiagnosticKind, RingGeometry, RingLayout, Rotation, TileCell,
        Traversal,
    };
    pub use metropoly_render::output::{Artifact, write_artifact, write_artifacts};
    pub use metropoly_render::svg::{AssetRenderOptions, BoardSvgOptions, EmbeddedFont};
    pub use metropoly_render::{LayoutOptions, layout_board};

    use metropoly_core::{BoardConfig, BoardManifest, Palette, PropertyRecord, PropertyStore};
    use std::path::Path;

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Data(#[from] metropoly_core::Error),
        #[error(transparent)]
        Render(#[from] metropoly_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Board output flavor. Each flavor walks the rings in its own order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum BoardFormat {
        #[default]
        Html,
        Svg,
    }

    impl BoardFormat {
        pub fn traversal(self) -> Traversal {
            match self {
                BoardFormat::Html => Traversal::Table,
                BoardFormat::Svg => Traversal::Pixel,
            }
        }

        pub fn extension(self) -> &'static str {
            match self {
                BoardFormat::Html => "html",
                BoardFormat::Svg => "svg",
            }
        }
    }

    /// Bundles the configuration, palette and font shared by every asset of one run.
    #[derive(Debug, Clone, Default)]
    pub struct AssetGenerator {
        pub config: BoardConfig,
        pub palette: Palette,
        pub font: Option<EmbeddedFont>,
    }

    impl AssetGenerator {
        pub fn new(config: BoardConfig, palette: Palette) -> Self {
            Self {
                config,
                palette,
                font: None,
            }
        }

        pub fn with_font(mut self, font: EmbeddedFont) -> Self {
            self.font = Some(font);
            self
        }

        pub fn asset_options(&self) -> AssetRenderOptions {
            AssetRenderOptions {
                pixels: self.config.pixels,
                font: self.font.clone(),
            }
        }

        pub fn tile_svg(&self, record: &PropertyRecord) -> String {
            metropoly_render::svg::render_tile_svg(record, &self.palette, &self.asset_options())
        }

        pub fn card_svg(&self, record: &PropertyRecord) -> String {
            metropoly_render::svg::render_card_svg(record, &self.palette, &self.asset_options())
        }

        pub fn null_tile_svg(&self) -> String {
            metropoly_render::svg::render_null_tile_svg(&self.palette, &self.asset_options())
        }

        /// Tiles (plus the null tile) under `dir`, defaulting to the configured tiles directory.
        pub fn tile_artifacts(&self, store: &PropertyStore, dir: Option<&Path>) -> Vec<Artifact> {
            let dir = dir.unwrap_or(self.config.files.tiles_dir.as_path());
            metropoly_render::output::tile_artifacts(
                store,
                &self.palette,
                &self.config.files,
                &self.asset_options(),
                dir,
            )
        }

        pub fn card_artifacts(&self, store: &PropertyStore, dir: Option<&Path>) -> Vec<Artifact> {
            let dir = dir.unwrap_or(self.config.files.cards_dir.as_path());
            metropoly_render::output::card_artifacts(
                store,
                &self.palette,
                &self.config.files,
                &self.asset_options(),
                dir,
            )
        }

        pub fn layout_board(
            &self,
            manifest: &BoardManifest,
            store: &PropertyStore,
            format: BoardFormat,
            catalog: Option<std::sync::Arc<dyn TileCatalog + Send + Sync>>,
        ) -> BoardLayout {
            let mut options = LayoutOptions::default().with_traversal(format.traversal());
            options.tile_catalog = match catalog {
                Some(catalog) => catalog,
                None => std::sync::Arc::new(GeneratedTileCatalog::new(self.config.files.clone())),
            };
            layout_board(manifest, store, &self.config, &options)
        }

        pub fn render_board(&self, layout: &BoardLayout, format: BoardFormat) -> String {
            match format {
                BoardFormat::Html => render_board_html(
                    layout,
                    &HtmlRenderOptions {
                        cell_size: self.config.pixels.cell_size,
                        ..HtmlRenderOptions::default()
                    },
                ),
                BoardFormat::Svg => metropoly_render::svg::render_board_svg(
                    layout,
                    &BoardSvgOptions {
                        placeholder_rects: false,
                        background: self
                            .palette
                            .get(metropoly_core::palette::BACKGROUND_KEY)
                            .map(str::to_string),
                    },
                ),
            }
        }
    }

    /// Loads the store, builds the manifest from it unless one is given, lays out and renders the
    /// board in one call.
    pub fn render_board_file(
        props_path: &Path,
        manifest_path: Option<&Path>,
        generator: &AssetGenerator,
        format: BoardFormat,
    ) -> Result<(String, BoardLayout)> {
        let store = PropertyStore::load(props_path)?;
        let manifest = match manifest_path {
            Some(path) => BoardManifest::load(path)?,
            None => BoardManifest::from_store(&store),
        };
        let layout = generator.layout_board(&manifest, &store, format, None);
        Ok((generator.render_board(&layout, format), layout))
    }
}
