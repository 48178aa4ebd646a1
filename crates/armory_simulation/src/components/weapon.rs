//! Weapon компоненты: данные оружия + presentation state
//!
//! Weapon entity пассивна: её меняет только `WeaponEquipment` через `AttachmentHost`.
//! Физика/коллизии выражены rapier markers (`ColliderDisabled`, `RigidBodyDisabled`).

use bevy::prelude::*;
use crate::weapon_system::WeaponId;

/// Weapon record (name, damage, visual handle)
///
/// Создаётся из `WeaponDefinition` при spawn, дальше не меняется.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(WeaponPresentation, Transform)]
pub struct Weapon {
    /// Ссылка на definition (template, из которого заспавнен)
    pub definition_id: WeaponId,
    pub name: String,
    pub damage: f32,
    /// Opaque visual handle: resolve делает presentation host
    pub prefab_path: String,
}

/// Presentation state оружия
///
/// Инвариант: `mount.is_some()` ⇔ оружие attached и видимо.
/// Всё остальное оружие в inventory скрыто.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponPresentation {
    pub visible: bool,
    pub mount: Option<WeaponMount>,
}

impl WeaponPresentation {
    /// Скрытое, ни к чему не прикреплённое оружие
    pub fn stowed() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.mount.is_some()
    }
}

/// Куда прикреплено оружие (target entity + socket name)
#[derive(Debug, Clone, PartialEq, Eq, Reflect)]
pub struct WeaponMount {
    pub target: Entity,
    pub socket: String,
}

/// Владелец оружия (entity с `WeaponEquipment`)
///
/// Когда equipment владельца удаляется, `despawn_owned_weapons` удаляет и оружие.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct OwnedBy(pub Entity);
