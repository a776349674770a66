use crate::{Error, Result};
use base64::Engine as _;
use std::path::Path;

/// A font file inlined into SVG output as a base64 `@font-face` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFont {
    pub family: String,
    mime: &'static str,
    format: &'static str,
    data: String,
}

impl EmbeddedFont {
    /// The family name is the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (mime, format) = match extension.as_str() {
            "ttf" => ("font/ttf", "truetype"),
            "otf" => ("font/otf", "opentype"),
            "woff" => ("font/woff", "woff"),
            "woff2" => ("font/woff2", "woff2"),
            _ => return Err(Error::UnsupportedFont { extension }),
        };
        let bytes = std::fs::read(path).map_err(|source| Error::Font {
            path: path.to_path_buf(),
            source,
        })?;
        let family = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Embedded")
            .to_string();
        Ok(Self::from_bytes(family, mime, format, &bytes))
    }

    fn from_bytes(family: String, mime: &'static str, format: &'static str, bytes: &[u8]) -> Self {
        Self {
            family,
            mime,
            format,
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn font_face_rule(&self) -> String {
        format!(
            r#"@font-face {{ font-family: "{}"; src: url(data:{};base64,{}) format("{}"); }}"#,
            self.family.replace('"', ""),
            self.mime,
            self.data,
            self.format
        )
    }

    /// `font-family` value that prefers this font and falls back to `fallback`.
    pub fn family_list(&self, fallback: &str) -> String {
        format!("'{}', {}", self.family.replace(['"', '\''], ""), fallback)
    }
}
