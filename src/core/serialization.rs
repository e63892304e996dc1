//! JSON serialization for facilities and validation results.

use crate::core::error::CobieResult;
use crate::core::model::Facility;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A value that can be saved to and loaded from JSON.
pub trait JsonDocument: Serialize + DeserializeOwned + Sized {
    /// Serialize to a pretty-printed JSON string.
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from a JSON string.
    fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read from a JSON file.
    fn read_json_file(path: impl AsRef<Path>) -> CobieResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json(&content)?)
    }

    /// Write to a JSON file, replacing any existing content.
    fn write_json_file(&self, path: impl AsRef<Path>) -> CobieResult<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }
}

impl JsonDocument for Facility {}
