//! Equipment module: один активный weapon на character
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Caller/AI emits intent events
//! - Systems вызывают `WeaponEquipment` state machine
//! - Notifications (`WeaponEquipped` / `WeaponUnequipped`) для presentation layer
//!
//! **Seams:**
//! - `AttachmentHost`: scene graph (Bevy: `WeaponRig`)
//! - `EquipmentObserver`: notifications (Bevy: `EquipmentNotices`)
//!
//! **Weapon lifecycle:**
//! - Equip → attach к socket, visible, collision off
//! - Unequip → detach (world transform сохраняется), hidden
//! - Owner despawn → owned weapons despawn

use bevy::prelude::*;

pub mod error;
pub mod events;
pub mod host;
pub mod rig;
pub mod systems;

// Re-exports
pub use error::*;
pub use events::*;
pub use host::*;
pub use rig::*;
pub use systems::*;

use crate::weapon_system::WeaponDefinitions;

/// Equipment plugin (lifecycle + intents)
pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeaponDefinitions>()
            // Intents
            .add_event::<EquipWeaponIntent>()
            .add_event::<UnequipWeaponIntent>()
            .add_event::<ToggleWeaponIntent>()
            .add_event::<EquipWeaponByIndexIntent>()
            .add_event::<AddWeaponToInventoryIntent>()
            .add_event::<RemoveWeaponAtIntent>()
            // Notifications
            .add_event::<WeaponEquipped>()
            .add_event::<WeaponUnequipped>()
            .add_event::<WeaponRemovedFromInventory>()
            .add_event::<EquipmentRequestFailed>()
            // Порядок важен: chain вставляет apply_deferred между системами,
            // поэтому заспавненные templates видны auto-equip в том же кадре
            .add_systems(
                Update,
                (
                    initialize_weapon_equipment,
                    auto_equip_on_start,
                    process_add_to_inventory,
                    process_remove_from_inventory,
                    process_equip_weapon,
                    process_equip_by_index,
                    process_unequip_weapon,
                    process_toggle_weapon,
                    despawn_owned_weapons,
                )
                    .chain(),
            );
    }
}
