use crate::property::Lane;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How ring side lengths are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingPolicy {
    /// Every ring uses its canonical perimeter regardless of how many tiles it holds.
    #[default]
    Fixed,
    /// Each ring shrinks to the smallest square that holds its tiles.
    Fit,
    /// The outer ring uses its canonical perimeter; inner rings step down by `nest_step`.
    Nested,
}

/// Largest accepted canonical perimeter (a ring of side 1025).
pub const MAX_CANONICAL_PERIMETER: u32 = 4096;

/// Perimeter (tile count) per lane used by [`SizingPolicy::Fixed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalPerimeters {
    pub blue: u32,
    pub yellow: u32,
    pub red: u32,
}

impl Default for CanonicalPerimeters {
    fn default() -> Self {
        Self {
            blue: 64,
            yellow: 60,
            red: 56,
        }
    }
}

impl CanonicalPerimeters {
    pub fn get(&self, lane: Lane) -> u32 {
        match lane {
            Lane::Blue => self.blue,
            Lane::Yellow => self.yellow,
            Lane::Red => self.red,
        }
    }
}

/// Output file naming and directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileNaming {
    pub tile_prefix: String,
    pub card_prefix: String,
    pub null_tile_file: String,
    pub tiles_dir: PathBuf,
    pub cards_dir: PathBuf,
    pub board_dir: PathBuf,
    pub board_file_stem: String,
    /// Prefix the board uses to reference tile images, relative to the board file.
    pub board_image_prefix: String,
}

impl Default for FileNaming {
    fn default() -> Self {
        Self {
            tile_prefix: "casilla_".to_string(),
            card_prefix: "tarjeta_".to_string(),
            null_tile_file: "casilla_NULL.svg".to_string(),
            tiles_dir: PathBuf::from("repo").join("casillas"),
            cards_dir: PathBuf::from("repo").join("tarjetas"),
            board_dir: PathBuf::from("repo").join("tablero"),
            board_file_stem: "tablero".to_string(),
            board_image_prefix: "../casillas/".to_string(),
        }
    }
}

impl FileNaming {
    pub fn tile_file_name(&self, property_name: &str) -> String {
        format!("{}{}.svg", self.tile_prefix, sanitize_file_stem(property_name))
    }

    pub fn card_file_name(&self, property_name: &str) -> String {
        format!("{}{}.svg", self.card_prefix, sanitize_file_stem(property_name))
    }

    /// `file_name` as seen from the board file.
    pub fn board_image_path(&self, file_name: &str) -> String {
        format!("{}{}", self.board_image_prefix, file_name).replace('\\', "/")
    }

    pub fn board_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.board_file_stem, extension)
    }
}

/// Replaces characters that cannot appear in a file name; everything else (spaces, accents) is kept.
pub fn sanitize_file_stem(name: &str) -> String {
    let out: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if out.is_empty() {
        "_".to_string()
    } else {
        out
    }
}

/// Pixel sizes shared by the asset and board renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PixelSizes {
    /// Edge of a (square) tile image and of a board cell.
    pub cell_size: f64,
    pub card_width: f64,
    pub card_height: f64,
}

impl Default for PixelSizes {
    fn default() -> Self {
        Self {
            cell_size: 150.0,
            card_width: 200.0,
            card_height: 350.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub sizing: SizingPolicy,
    pub canonical_perimeters: CanonicalPerimeters,
    /// How many cells each ring is smaller than the ring containing it.
    pub nest_step: u32,
    pub files: FileNaming,
    pub pixels: PixelSizes,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            sizing: SizingPolicy::default(),
            canonical_perimeters: CanonicalPerimeters::default(),
            nest_step: 1,
            files: FileNaming::default(),
            pixels: PixelSizes::default(),
        }
    }
}

impl BoardConfig {
    /// Loads a `.json`, `.yaml` or `.yml` file; omitted keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match extension.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            _ => return Err(Error::UnsupportedFormat { extension }),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.nest_step == 0 {
            return Err(Error::InvalidConfig {
                message: "nestStep must be at least 1".to_string(),
            });
        }
        for lane in Lane::ALL {
            let perimeter = self.canonical_perimeters.get(lane);
            if perimeter > MAX_CANONICAL_PERIMETER {
                return Err(Error::InvalidConfig {
                    message: format!(
                        "canonicalPerimeters.{lane} must be at most {MAX_CANONICAL_PERIMETER}, got {perimeter}"
                    ),
                });
            }
        }
        let sizes = [
            ("cellSize", self.pixels.cell_size),
            ("cardWidth", self.pixels.card_width),
            ("cardHeight", self.pixels.card_height),
        ];
        for (key, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{key} must be a positive number, got {value}"),
                });
            }
        }
        Ok(())
    }
}
