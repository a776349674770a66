//! Symbolic color names (`basicBG`, `red`, `lightBlue`, ...) resolved to CSS colors.
//!
//! The palette source is an HTML page whose `<style>` blocks declare CSS custom properties
//! (`--red: #e53935;`). A bare `.css` file is accepted as well.

use crate::{Error, Result};
use indexmap::IndexMap;
use lol_html::{RewriteStrSettings, rewrite_str, text};
use regex::Regex;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

pub const BACKGROUND_KEY: &str = "basicBG";
pub const BORDER_KEY: &str = "borderBlack";

/// Used when a record names a color the palette does not define.
pub const FALLBACK_COLOR: &str = "#9e9e9e";

const BUILTIN_COLORS: &[(&str, &str)] = &[
    ("basicBG", "#f4f1e8"),
    ("borderBlack", "#010101"),
    ("red", "#e53935"),
    ("orange", "#fb8c00"),
    ("yellow", "#fdd835"),
    ("green", "#43a047"),
    ("blue", "#1e88e5"),
    ("pink", "#ec407a"),
    ("lightBlue", "#81d4fa"),
    ("brown", "#8d6e63"),
    ("purple", "#8e24aa"),
    ("teal", "#00897b"),
    ("lavender", "#b39ddb"),
    ("lightGreen", "#9ccc65"),
    ("deepBlue", "#283593"),
    ("gold", "#ffb300"),
    ("chineseRed", "#c62828"),
];

fn custom_property_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"--([A-Za-z_][A-Za-z0-9_-]*)\s*:\s*([^;}]+)").expect("valid regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: IndexMap<String, String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Palette {
    pub fn empty() -> Self {
        Self {
            colors: IndexMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let colors = BUILTIN_COLORS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { colors }
    }

    /// Built-in colors overridden by the declarations found in `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let is_css = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("css"));
        let parsed = if is_css {
            Self::from_css(&text)
        } else {
            Self::from_html(&text)?
        };
        let mut palette = Self::builtin();
        palette.extend(parsed);
        Ok(palette)
    }

    /// Collects custom properties from every `<style>` element.
    pub fn from_html(html: &str) -> Result<Self> {
        let mut css = String::new();
        rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: vec![text!("style", |chunk| {
                    css.push_str(chunk.as_str());
                    Ok(())
                })],
                ..RewriteStrSettings::new()
            },
        )
        .map_err(|e| Error::Palette {
            message: e.to_string(),
        })?;
        Ok(Self::from_css(&css))
    }

    /// Declarations whose value is not a color SVG understands are skipped with a warning.
    pub fn from_css(css: &str) -> Self {
        let mut palette = Self::empty();
        for caps in custom_property_regex().captures_iter(css) {
            let name = &caps[1];
            let value = caps[2].trim();
            if svgtypes::Color::from_str(value).is_err() {
                tracing::warn!(name, value, "skipping palette entry that is not a color");
                continue;
            }
            palette.insert(name, value);
        }
        palette
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.colors.insert(name.into(), value.into());
    }

    pub fn extend(&mut self, other: Palette) {
        self.colors.extend(other.colors);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    /// Like [`Palette::get`], but logs and substitutes [`FALLBACK_COLOR`] for unknown names.
    pub fn resolve(&self, name: &str) -> &str {
        match self.get(name) {
            Some(color) => color,
            None => {
                tracing::warn!(color = name, "unknown palette color; using fallback");
                FALLBACK_COLOR
            }
        }
    }

    pub fn background(&self) -> &str {
        self.resolve(BACKGROUND_KEY)
    }

    pub fn border(&self) -> &str {
        self.resolve(BORDER_KEY)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text_color(background: &str) -> &'static str {
    let Ok(color) = svgtypes::Color::from_str(background) else {
        return "black";
    };
    let luminance = 0.2126 * f64::from(color.red)
        + 0.7152 * f64::from(color.green)
        + 0.0722 * f64::from(color.blue);
    if luminance > 150.0 { "black" } else { "white" }
}
