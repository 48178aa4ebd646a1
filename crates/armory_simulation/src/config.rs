//! Configuration: loadout персонажа + арсенал в RON
//!
//! Пример `config/armory.ron`:
//!
//! ```ron
//! (
//!     log_level: Info,
//!     weapons: [
//!         (id: "melee_sword", name: "Combat Sword", damage: 25.0),
//!     ],
//!     loadout: (
//!         socket_name: "hand_r_socket",
//!         weapon_templates: ["melee_sword"],
//!         auto_equip_on_start: true,
//!     ),
//! )
//! ```

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::components::{WeaponEquipment, DEFAULT_WEAPON_SOCKET};
use crate::logger::LogLevel;
use crate::weapon_system::{WeaponDefinition, WeaponDefinitions, WeaponId};

/// Ошибки загрузки конфигурации
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Loadout ссылается на несуществующий weapon id
    #[error("Unknown weapon '{0}' referenced by loadout")]
    UnknownWeapon(WeaponId),
}

/// Loadout конфигурация персонажа (задаётся один раз снаружи)
///
/// Вставка компонента добавляет `WeaponEquipment` (required);
/// `initialize_weapon_equipment` применяет конфиг на следующем Update.
#[derive(Component, Debug, Clone, Deserialize)]
#[require(WeaponEquipment)]
pub struct EquipmentConfig {
    #[serde(default = "default_socket_name")]
    pub socket_name: String,
    /// Weapon для toggle / auto-equip (None = inventory[0])
    #[serde(default)]
    pub default_weapon: Option<WeaponId>,
    /// Templates для pre-spawn (порядок = индексы в inventory)
    #[serde(default)]
    pub weapon_templates: Vec<WeaponId>,
    #[serde(default)]
    pub auto_equip_on_start: bool,
}

fn default_socket_name() -> String {
    DEFAULT_WEAPON_SOCKET.to_string()
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            socket_name: default_socket_name(),
            default_weapon: None,
            weapon_templates: Vec::new(),
            auto_equip_on_start: false,
        }
    }
}

impl EquipmentConfig {
    /// Все weapon ids, на которые ссылается loadout
    pub fn referenced_ids(&self) -> impl Iterator<Item = &WeaponId> {
        self.weapon_templates.iter().chain(self.default_weapon.iter())
    }

    /// Проверить что все ids есть в definitions
    pub fn validate(&self, definitions: &WeaponDefinitions) -> Result<(), ConfigError> {
        match self.referenced_ids().find(|id| !definitions.contains(id)) {
            Some(id) => Err(ConfigError::UnknownWeapon(id.clone())),
            None => Ok(()),
        }
    }
}

/// Корневой config файл
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArmoryConfig {
    #[serde(default)]
    pub log_level: LogLevel,
    /// Пусто = встроенные `WeaponDefinitions::default()`
    #[serde(default)]
    pub weapons: Vec<WeaponDefinition>,
    #[serde(default)]
    pub loadout: EquipmentConfig,
}

impl ArmoryConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    pub fn definitions(&self) -> WeaponDefinitions {
        if self.weapons.is_empty() {
            WeaponDefinitions::default()
        } else {
            WeaponDefinitions::from_definitions(self.weapons.iter().cloned())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.loadout.validate(&self.definitions())
    }
}
