use nexus_common::WorldId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::definition::WorldDefinition;
use crate::error::ConfigError;

/// On-disk shape of a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    worlds: Vec<WorldDefinition>,
}

/// All four world definitions, keyed by id.
///
/// A catalog always holds every [`WorldId`] and every definition in it has
/// passed [`WorldDefinition::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct WorldCatalog {
    worlds: BTreeMap<WorldId, WorldDefinition>,
}

impl Default for WorldCatalog {
    fn default() -> Self {
        Self {
            worlds: WorldId::ALL
                .into_iter()
                .map(|id| (id, WorldDefinition::builtin(id)))
                .collect(),
        }
    }
}

impl WorldCatalog {
    /// Build a catalog from explicit definitions.
    pub fn from_definitions(
        defs: impl IntoIterator<Item = WorldDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut worlds = BTreeMap::new();
        for def in defs {
            def.validate()?;
            let id = def.id;
            if worlds.insert(id, def).is_some() {
                return Err(ConfigError::DuplicateWorld(id));
            }
        }
        for id in WorldId::ALL {
            if !worlds.contains_key(&id) {
                return Err(ConfigError::MissingWorld(id));
            }
        }
        Ok(Self { worlds })
    }

    /// Load from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let catalog = Self::load_from_str(&content)?;
        tracing::info!(path = %path.display(), "world catalog loaded");
        Ok(catalog)
    }

    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::from_definitions(file.worlds)
    }

    pub fn definition(&self, id: WorldId) -> Result<&WorldDefinition, ConfigError> {
        self.worlds.get(&id).ok_or(ConfigError::MissingWorld(id))
    }

    pub fn definitions(&self) -> impl Iterator<Item = &WorldDefinition> {
        self.worlds.values()
    }

    /// Serialize back to the YAML shape [`WorldCatalog::load_from_str`] reads.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        let file = CatalogFile {
            worlds: self.worlds.values().cloned().collect(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}
