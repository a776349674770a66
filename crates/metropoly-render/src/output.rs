use crate::svg::{AssetRenderOptions, render_card_svg, render_null_tile_svg, render_tile_svg};
use crate::{Error, Result};
use metropoly_core::{FileNaming, Palette, PropertyStore};
use std::path::{Path, PathBuf};

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// One tile per record plus the null tile, all under `dir`.
pub fn tile_artifacts(
    store: &PropertyStore,
    palette: &Palette,
    naming: &FileNaming,
    options: &AssetRenderOptions,
    dir: &Path,
) -> Vec<Artifact> {
    let mut out: Vec<Artifact> = store
        .iter()
        .map(|record| Artifact {
            path: dir.join(naming.tile_file_name(&record.name)),
            contents: render_tile_svg(record, palette, options),
        })
        .collect();
    out.push(Artifact {
        path: dir.join(&naming.null_tile_file),
        contents: render_null_tile_svg(palette, options),
    });
    out
}

pub fn card_artifacts(
    store: &PropertyStore,
    palette: &Palette,
    naming: &FileNaming,
    options: &AssetRenderOptions,
    dir: &Path,
) -> Vec<Artifact> {
    store
        .iter()
        .map(|record| Artifact {
            path: dir.join(naming.card_file_name(&record.name)),
            contents: render_card_svg(record, palette, options),
        })
        .collect()
}

/// Writes `contents` to `path`, creating parent directories first.
pub fn write_artifact(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

pub fn write_artifacts(artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        write_artifact(&artifact.path, &artifact.contents)?;
    }
    Ok(())
}
