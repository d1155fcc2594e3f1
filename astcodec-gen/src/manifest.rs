//! Persistent field numbering.
//!
//! Field numbers are what the wire format identifies fields by, so they must
//! never change once data was written with them. The manifest remembers, for
//! every record, the field names in numbering order. Fields added to a struct
//! are appended; fields removed from it keep their slot as a placeholder so
//! the number is never handed out to a different field.

use std::{collections::BTreeMap, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// Format version of the manifest file.
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldManifest {
    pub version: u32,
    /// Record name -> field names, the index being the field number.
    #[serde(default)]
    pub types: BTreeMap<String, Vec<String>>,
}

impl Default for FieldManifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            types: BTreeMap::new(),
        }
    }
}

/// One numbered field slot of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: String,
    pub number: u64,
    /// `false` for a placeholder kept for a removed field.
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub slots: Vec<FieldSlot>,
}

impl FieldLayout {
    pub fn number_of(&self, name: &str) -> Option<u64> {
        self.slots
            .iter()
            .find(|slot| slot.present && slot.name == name)
            .map(|slot| slot.number)
    }

    pub fn present(&self) -> impl Iterator<Item = &FieldSlot> {
        self.slots.iter().filter(|slot| slot.present)
    }

    fn names(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.name.clone()).collect()
    }
}

impl FieldManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse manifest text. `file` only names the source in errors.
    pub fn parse(text: &str, file: &str) -> GenResult<Self> {
        let manifest: FieldManifest =
            toml::from_str(text).map_err(|source| GenError::ManifestParseError {
                source,
                file: file.to_string(),
            })?;

        if manifest.version != MANIFEST_VERSION {
            return Err(GenError::ManifestVersion {
                file: file.to_string(),
                found: manifest.version,
                expected: MANIFEST_VERSION,
            });
        }
        Ok(manifest)
    }

    /// Load the manifest at `path`; a missing file is an empty manifest.
    pub fn load(path: &Path) -> GenResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, &path.display().to_string()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No field manifest at '{}', numbering from scratch",
                    path.display()
                );
                Ok(Self::new())
            }
            Err(source) => Err(GenError::IoError {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn to_toml(&self) -> GenResult<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn save(&self, path: &Path) -> GenResult<()> {
        std::fs::write(path, self.to_toml()?).map_err(|source| GenError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number the current `fields` of `record` against its history.
    pub fn layout(&self, record: &str, fields: &[&str]) -> FieldLayout {
        let history = self.types.get(record).map(Vec::as_slice).unwrap_or_default();

        let mut slots: Vec<FieldSlot> = history
            .iter()
            .enumerate()
            .map(|(number, name)| FieldSlot {
                name: name.clone(),
                number: number as u64,
                present: fields.contains(&name.as_str()),
            })
            .collect();

        for slot in slots.iter().filter(|slot| !slot.present) {
            info!(
                "Field '{}' of '{record}' is gone, number {} stays reserved",
                slot.name, slot.number
            );
        }

        for &name in fields {
            if history.iter().any(|known| known == name) {
                continue;
            }
            let number = slots.len() as u64;
            if !history.is_empty() {
                info!("New field '{name}' of '{record}' gets number {number}");
            }
            slots.push(FieldSlot {
                name: name.to_string(),
                number,
                present: true,
            });
        }

        FieldLayout { slots }
    }

    /// Remember `layout` as the numbering of `record`.
    pub fn record(&mut self, record: &str, layout: &FieldLayout) {
        self.types.insert(record.to_string(), layout.names());
    }
}
