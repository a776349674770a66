//! Canonical property records and the one-time normalization of raw data rows.
//!
//! Data files in the wild spell the same column several ways (`name`, `Nombre`, `posición`, ...).
//! Every loader funnels its rows through [`RawRecord`] and [`normalize_record`], so the rest of the
//! workspace only ever sees [`PropertyRecord`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three concentric board tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Blue,
    Yellow,
    Red,
}

impl Lane {
    /// Outer to inner.
    pub const ALL: [Lane; 3] = [Lane::Blue, Lane::Yellow, Lane::Red];

    pub fn as_str(self) -> &'static str {
        match self {
            Lane::Blue => "blue",
            Lane::Yellow => "yellow",
            Lane::Red => "red",
        }
    }

    /// Nesting depth, `0` for the outermost ring.
    pub fn depth(self) -> usize {
        match self {
            Lane::Blue => 0,
            Lane::Yellow => 1,
            Lane::Red => 2,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match fold_key(s).as_str() {
            "blue" | "azul" => Ok(Lane::Blue),
            "yellow" | "amarillo" => Ok(Lane::Yellow),
            "red" | "rojo" => Ok(Lane::Red),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    #[default]
    Regular,
    Corner,
}

impl FromStr for PositionKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match fold_key(s).as_str() {
            "regular" | "normal" => Ok(PositionKind::Regular),
            "corner" | "esquina" => Ok(PositionKind::Corner),
            _ => Err(()),
        }
    }
}

/// Card template number, `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardType(u8);

impl CardType {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for CardType {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for CardType {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("card type {value} is outside 1..=7"))
    }
}

impl From<CardType> for u8 {
    fn from(value: CardType) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub name: String,
    pub color_key: String,
    pub lane: Lane,
    pub image_ref: String,
    pub price: f64,
    pub base_rent: f64,
    pub card_type: CardType,
    pub position_kind: PositionKind,
    /// Index the data file claims for this property within its lane listing.
    pub position: Option<u32>,
}

impl PropertyRecord {
    pub fn is_corner(&self) -> bool {
        self.position_kind == PositionKind::Corner
    }
}

/// A canonical record field together with the spellings accepted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    ColorKey,
    Lane,
    ImageRef,
    Price,
    BaseRent,
    CardType,
    PositionKind,
    Position,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::ColorKey,
        Field::Lane,
        Field::ImageRef,
        Field::Price,
        Field::BaseRent,
        Field::CardType,
        Field::PositionKind,
        Field::Position,
    ];

    pub fn canonical_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::ColorKey => "colorKey",
            Field::Lane => "lane",
            Field::ImageRef => "imageRef",
            Field::Price => "price",
            Field::BaseRent => "baseRent",
            Field::CardType => "cardType",
            Field::PositionKind => "positionKind",
            Field::Position => "position",
        }
    }

    /// Folded aliases (see [`fold_key`]).
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "nombre"],
            Field::ColorKey => &["colorkey", "color"],
            Field::Lane => &["lane", "carril"],
            Field::ImageRef => &["imageref", "image", "imagen"],
            Field::Price => &["price", "precio"],
            Field::BaseRent => &["baserent", "rent", "rentabase"],
            Field::CardType => &["cardtype", "type", "tipo"],
            Field::PositionKind => &["positionkind", "kind"],
            Field::Position => &["position", "posicion"],
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            Field::Name | Field::ColorKey | Field::Lane | Field::Price | Field::BaseRent
        )
    }

    pub fn matches_key(self, key: &str) -> bool {
        let folded = fold_key(key);
        self.aliases().iter().any(|alias| *alias == folded)
    }
}

/// Lowercases, drops `_`, `-` and spaces, and strips Spanish diacritics.
pub fn fold_key(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Cell value as delivered by a loader, before any field-specific parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RawValue {
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Empty,
            serde_json::Value::Bool(b) => RawValue::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(RawValue::Empty, RawValue::Number),
            serde_json::Value::String(s) => RawValue::from_text(s),
            other => RawValue::Text(other.to_string()),
        }
    }

    pub fn from_text(text: &str) -> Self {
        let t = text.trim();
        if t.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(t.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }

    fn display(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Bool(b) => b.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        let n = match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    fn as_integer(&self) -> Option<i64> {
        let n = self.as_number()?;
        (n.fract() == 0.0).then_some(n as i64)
    }
}

/// An unnormalized row: `(source key, value)` pairs in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub entries: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn push(&mut self, key: impl Into<String>, value: RawValue) {
        self.entries.push((key.into(), value));
    }

    /// First non-empty value under any alias of `field`.
    pub fn get(&self, field: Field) -> Option<&RawValue> {
        self.entries
            .iter()
            .filter(|(key, _)| field.matches_key(key))
            .map(|(_, value)| value)
            .find(|value| !value.is_empty())
    }
}

/// Turns a raw row into a [`PropertyRecord`]. `index` is the zero-based row number, used in errors.
pub fn normalize_record(index: usize, raw: &RawRecord) -> Result<PropertyRecord> {
    let required = |field: Field| -> Result<&RawValue> {
        raw.get(field).ok_or(Error::MissingField {
            index,
            field: field.canonical_name(),
        })
    };
    let invalid = |field: Field, value: &RawValue| Error::InvalidField {
        index,
        field: field.canonical_name(),
        value: value.display(),
    };

    let name = required(Field::Name)?.display();
    let color_key = required(Field::ColorKey)?.display();

    let lane_raw = required(Field::Lane)?;
    let lane = lane_raw
        .display()
        .parse::<Lane>()
        .map_err(|_| invalid(Field::Lane, lane_raw))?;

    let price_raw = required(Field::Price)?;
    let price = price_raw
        .as_number()
        .ok_or_else(|| invalid(Field::Price, price_raw))?;

    let rent_raw = required(Field::BaseRent)?;
    let base_rent = rent_raw
        .as_number()
        .ok_or_else(|| invalid(Field::BaseRent, rent_raw))?;

    let image_ref = raw
        .get(Field::ImageRef)
        .map(RawValue::display)
        .unwrap_or_default();

    let card_type = match raw.get(Field::CardType) {
        None => CardType::default(),
        Some(v) => v
            .as_integer()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(CardType::new)
            .ok_or_else(|| invalid(Field::CardType, v))?,
    };

    let position_kind = match raw.get(Field::PositionKind) {
        None => PositionKind::default(),
        Some(v) => v
            .display()
            .parse::<PositionKind>()
            .map_err(|_| invalid(Field::PositionKind, v))?,
    };

    let position = match raw.get(Field::Position) {
        None => None,
        Some(v) => Some(
            v.as_integer()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| invalid(Field::Position, v))?,
        ),
    };

    Ok(PropertyRecord {
        name,
        color_key,
        lane,
        image_ref,
        price,
        base_rent,
        card_type,
        position_kind,
        position,
    })
}

/// Formats a money amount without a trailing `.0` for whole numbers.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        let mut raw = RawRecord::default();
        for (k, v) in pairs {
            raw.push(*k, RawValue::from_text(v));
        }
        raw
    }

    #[test]
    fn fold_key_ignores_case_separators_and_accents() {
        assert_eq!(fold_key("Posición"), "posicion");
        assert_eq!(fold_key("renta_base"), "rentabase");
        assert_eq!(fold_key(" baseRent "), "baserent");
    }

    #[test]
    fn spanish_spellings_normalize_to_the_canonical_record() {
        let raw = row(&[
            ("Nombre", "El Colli"),
            ("color", "brown"),
            ("Carril", "rojo"),
            ("imagen", "caseta.png"),
            ("precio", "60"),
            ("renta_base", "10"),
            ("tipo", "3"),
            ("posición", "4"),
        ]);
        let record = normalize_record(0, &raw).unwrap();
        assert_eq!(record.name, "El Colli");
        assert_eq!(record.lane, Lane::Red);
        assert_eq!(record.image_ref, "caseta.png");
        assert_eq!(record.price, 60.0);
        assert_eq!(record.base_rent, 10.0);
        assert_eq!(record.card_type.get(), 3);
        assert_eq!(record.position_kind, PositionKind::Regular);
        assert_eq!(record.position, Some(4));
    }

    #[test]
    fn missing_required_field_is_reported_with_its_canonical_name() {
        let raw = row(&[("name", "Boardwalk"), ("lane", "blue"), ("price", "400")]);
        let err = normalize_record(7, &raw).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                index: 7,
                field: "colorKey"
            }
        ));
    }

    #[test]
    fn card_type_outside_range_is_invalid() {
        let raw = row(&[
            ("name", "Boardwalk"),
            ("color", "green"),
            ("lane", "yellow"),
            ("price", "400"),
            ("rent", "50"),
            ("type", "9"),
        ]);
        let err = normalize_record(0, &raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Property record #0 has invalid cardType: \"9\""
        );
    }

    #[test]
    fn blank_optional_values_fall_back_to_defaults() {
        let raw = row(&[
            ("name", "GO"),
            ("color", "gold"),
            ("lane", "blue"),
            ("price", "0"),
            ("rent", "0"),
            ("kind", "esquina"),
            ("type", ""),
            ("position", ""),
        ]);
        let record = normalize_record(0, &raw).unwrap();
        assert!(record.is_corner());
        assert_eq!(record.card_type, CardType::default());
        assert_eq!(record.position, None);
    }

    #[test]
    fn format_amount_trims_whole_numbers() {
        assert_eq!(format_amount(60.0), "60");
        assert_eq!(format_amount(62.5), "62.5");
    }
}
