//! Armory Simulation Core
//!
//! Weapon equipment на Bevy 0.16 (headless ECS)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state (inventory, equipped weapon, правила equip/unequip)
//! - Presentation host = меши, sockets, рендер (через `AttachmentHost`)

use bevy::prelude::*;

// Публичные модули
pub mod components;
pub mod config;
pub mod equipment;
pub mod logger;
pub mod weapon_system;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::{ArmoryConfig, ConfigError, EquipmentConfig};
pub use equipment::{
    AttachmentHost, EquipError, EquipmentObserver, EquipmentPlugin, EquipmentRequestFailed,
    WeaponEquipped, WeaponRemovedFromInventory, WeaponUnequipped,
};
pub use logger::*;
pub use weapon_system::{spawn_weapon, WeaponDefinition, WeaponDefinitions, WeaponId};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct ArmoryPlugin;

impl Plugin for ArmoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EquipmentPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// `TransformPlugin` нужен для GlobalTransform (attach/detach сохраняют world transform).
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, TransformPlugin, ArmoryPlugin));

    app
}
