//! Seams между equipment state machine и внешним миром
//!
//! - `AttachmentHost`: scene graph (attach/detach к socket)
//! - `EquipmentObserver`: получатель notifications (equipped/unequipped)
//!
//! State machine знает только эти traits, поэтому тестируется без App.

use bevy::prelude::Entity;

use super::EquipError;

/// Scene graph capability: attach/detach оружия к socket на target
pub trait AttachmentHost {
    /// Entity существует и является оружием
    fn is_weapon(&self, weapon: Entity) -> bool;

    /// Socket существует на target
    fn has_socket(&self, target: Entity, socket: &str) -> bool;

    /// Snap к socket (location/rotation), world scale сохраняется,
    /// физика и коллизии оружия выключаются.
    fn attach(&mut self, weapon: Entity, target: Entity, socket: &str) -> Result<(), EquipError>;

    /// Снять с socket, сохранив world transform; оружие скрыто и без коллизий.
    /// Не может провалиться.
    fn detach(&mut self, weapon: Entity);
}

/// Fire-and-forget notifications от state machine
pub trait EquipmentObserver {
    fn on_equipped(&mut self, weapon: Entity);
    fn on_unequipped(&mut self, weapon: Entity);
}

/// Observer который ничего не слушает
impl EquipmentObserver for () {
    fn on_equipped(&mut self, _weapon: Entity) {}
    fn on_unequipped(&mut self, _weapon: Entity) {}
}
