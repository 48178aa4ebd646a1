//! Equipment system events
//!
//! # Architecture
//!
//! **Intents (caller → ECS):**
//! - `EquipWeaponIntent` → equip конкретный weapon entity
//! - `UnequipWeaponIntent` → unequip текущий
//! - `ToggleWeaponIntent` → equip default / inventory[0] или unequip
//! - `EquipWeaponByIndexIntent` → equip inventory[index]
//! - `AddWeaponToInventoryIntent` / `RemoveWeaponAtIntent` → inventory mutations
//!
//! **Notifications (ECS → presentation / gameplay):**
//! - `WeaponEquipped` / `WeaponUnequipped`: weapon lifecycle hooks
//! - `WeaponRemovedFromInventory`: weapon больше не принадлежит owner
//! - `EquipmentRequestFailed`: intent отклонён (state не изменён)

use bevy::prelude::*;

use super::EquipError;

// ============================================================================
// Intents
// ============================================================================

/// Equip weapon entity
///
/// # Flow
/// 1. Validate weapon + socket
/// 2. Unequip текущий (если есть и отличается)
/// 3. Attach → `WeaponEquipped`
#[derive(Event, Clone, Debug)]
pub struct EquipWeaponIntent {
    pub entity: Entity,
    pub weapon: Entity,
}

/// Unequip текущий weapon
#[derive(Event, Clone, Debug)]
pub struct UnequipWeaponIntent {
    pub entity: Entity,
}

/// Toggle (hotkey "holster/draw")
#[derive(Event, Clone, Debug)]
pub struct ToggleWeaponIntent {
    pub entity: Entity,
}

/// Equip weapon из inventory по индексу
#[derive(Event, Clone, Debug)]
pub struct EquipWeaponByIndexIntent {
    pub entity: Entity,
    pub index: usize,
}

/// Append weapon в inventory (weapon получает `OwnedBy(entity)`)
#[derive(Event, Clone, Debug)]
pub struct AddWeaponToInventoryIntent {
    pub entity: Entity,
    pub weapon: Entity,
}

/// Удалить inventory[index] (если equipped: сначала unequip)
#[derive(Event, Clone, Debug)]
pub struct RemoveWeaponAtIntent {
    pub entity: Entity,
    pub index: usize,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponEquipped {
    pub owner: Entity,
    pub weapon: Entity,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponUnequipped {
    pub owner: Entity,
    pub weapon: Entity,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeaponRemovedFromInventory {
    pub owner: Entity,
    pub weapon: Entity,
}

#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct EquipmentRequestFailed {
    pub entity: Entity,
    pub error: EquipError,
}
