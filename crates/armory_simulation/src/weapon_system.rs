//! Weapon System: definitions (templates) и spawn инстансов
//!
//! # Архитектура
//!
//! **WeaponDefinition**: статический template (id + name + damage + prefab):
//! - Хранится в `WeaponDefinitions` resource (HashMap lookup)
//! - Immutable данные
//! - Hardcoded в `WeaponDefinitions::default()` или из RON (`ArmoryConfig`)
//!
//! **Weapon entity**: runtime инстанс:
//! - `spawn_weapon` материализует один инстанс из definition
//! - Спавнится stowed: скрыт, без коллизий, без физики
//! - Принадлежит владельцу через `OwnedBy`
//!
//! # Пример использования
//!
//! ```ignore
//! let def = definitions.get(&"melee_sword".into())?;
//! let sword = spawn_weapon(&mut commands, def, character);
//! ```

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, RigidBodyDisabled};
use serde::Deserialize;
use std::collections::HashMap;

use crate::components::{OwnedBy, Weapon, WeaponPresentation};

// ============================================================================
// WeaponId
// ============================================================================

/// Weapon definition identifier (unique string ID)
///
/// # Examples
/// - "melee_sword"
/// - "pistol_basic"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(transparent)]
pub struct WeaponId(pub String);

impl From<&str> for WeaponId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for WeaponId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// WeaponDefinition (статические данные)
// ============================================================================

/// Static weapon definition ("weapon class")
#[derive(Clone, Debug, Deserialize)]
pub struct WeaponDefinition {
    pub id: WeaponId,
    #[serde(default = "default_weapon_name")]
    pub name: String,
    #[serde(default = "default_weapon_damage")]
    pub damage: f32,
    /// Путь к визуалу (mesh/prefab), пусто = без визуала
    #[serde(default)]
    pub prefab_path: String,
}

fn default_weapon_name() -> String {
    "Default Weapon".to_string()
}

fn default_weapon_damage() -> f32 {
    10.0
}

impl WeaponDefinition {
    /// Definition с дефолтными name/damage
    pub fn new(id: impl Into<WeaponId>) -> Self {
        Self {
            id: id.into(),
            name: default_weapon_name(),
            damage: default_weapon_damage(),
            prefab_path: String::new(),
        }
    }

    /// Runtime компонент для нового инстанса
    pub fn to_weapon(&self) -> Weapon {
        Weapon {
            definition_id: self.id.clone(),
            name: self.name.clone(),
            damage: self.damage,
            prefab_path: self.prefab_path.clone(),
        }
    }
}

// ============================================================================
// WeaponDefinitions (Resource)
// ============================================================================

/// Weapon definitions lookup table (resource)
#[derive(Resource, Clone, Debug)]
pub struct WeaponDefinitions {
    definitions: HashMap<WeaponId, WeaponDefinition>,
}

impl WeaponDefinitions {
    /// Пустой registry
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Registry из списка (последний дубликат id побеждает)
    pub fn from_definitions(definitions: impl IntoIterator<Item = WeaponDefinition>) -> Self {
        let mut defs = Self::new();
        for definition in definitions {
            defs.add(definition);
        }
        defs
    }

    pub fn get(&self, id: &WeaponId) -> Option<&WeaponDefinition> {
        self.definitions.get(id)
    }

    pub fn add(&mut self, definition: WeaponDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn contains(&self, id: &WeaponId) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn all_ids(&self) -> Vec<&WeaponId> {
        self.definitions.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for WeaponDefinitions {
    /// Hardcoded definitions (базовый арсенал)
    fn default() -> Self {
        Self::from_definitions([
            WeaponDefinition {
                id: "melee_sword".into(),
                name: "Combat Sword".to_string(),
                damage: 25.0,
                prefab_path: "weapons/sword.glb".to_string(),
            },
            WeaponDefinition {
                id: "dagger".into(),
                name: "Combat Dagger".to_string(),
                damage: 15.0,
                prefab_path: "weapons/sword.glb".to_string(), // Временно sword model
            },
            WeaponDefinition {
                id: "pistol_basic".into(),
                name: "Basic Pistol".to_string(),
                damage: 10.0,
                prefab_path: "weapons/pistol.glb".to_string(),
            },
            WeaponDefinition {
                id: "rifle_basic".into(),
                name: "Basic Rifle".to_string(),
                damage: 20.0,
                prefab_path: "weapons/pistol.glb".to_string(), // Временно pistol model
            },
        ])
    }
}

// ============================================================================
// Spawn
// ============================================================================

/// Spawn одного stowed инстанса оружия для `owner`
///
/// Оружие скрыто, коллизии и физика выключены до attach.
pub fn spawn_weapon(commands: &mut Commands, definition: &WeaponDefinition, owner: Entity) -> Entity {
    commands
        .spawn((
            definition.to_weapon(),
            WeaponPresentation::stowed(),
            Transform::default(),
            ColliderDisabled,
            RigidBodyDisabled,
            OwnedBy(owner),
        ))
        .id()
}
