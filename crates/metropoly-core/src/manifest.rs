use crate::property::Lane;
use crate::store::{LaneNames, PropertyStore};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which property goes on which ring, in board order.
///
/// Either read from a manifest file (`{"blue": {"lane": [...], "corners": [...]}, ...}`) or
/// derived from a [`PropertyStore`] by grouping records per lane and position kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardManifest {
    pub blue: LaneNames,
    pub yellow: LaneNames,
    pub red: LaneNames,
}

impl BoardManifest {
    pub fn from_store(store: &PropertyStore) -> Self {
        Self {
            blue: store.lane_names(Lane::Blue),
            yellow: store.lane_names(Lane::Yellow),
            red: store.lane_names(Lane::Red),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidManifest {
            message: e.to_string(),
        })
    }

    pub fn get(&self, lane: Lane) -> &LaneNames {
        match lane {
            Lane::Blue => &self.blue,
            Lane::Yellow => &self.yellow,
            Lane::Red => &self.red,
        }
    }
}
