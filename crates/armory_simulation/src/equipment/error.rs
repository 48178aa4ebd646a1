//! Equipment errors
//!
//! Все ошибки non-fatal: возвращаются caller'у синхронно и логируются.
//! Ни одна ошибка не оставляет manager в частично обновлённом состоянии.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    /// Пустая / не-weapon entity
    #[error("entity {0:?} is not a weapon")]
    InvalidWeapon(Entity),

    /// Attach target не резолвнут при инициализации (configuration error)
    #[error("no attachment target resolved for this equipment")]
    AttachTargetMissing,

    /// Socket отсутствует на target (configuration error)
    #[error("socket '{socket}' does not exist on {target:?}")]
    SocketMissing { target: Entity, socket: String },

    #[error("no weapon is currently equipped")]
    NothingEquipped,

    /// Toggle без default weapon и с пустым inventory
    #[error("no default weapon and inventory is empty")]
    NothingToEquip,

    #[error("inventory index {index} out of range (size {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Weapon уже в inventory другого owner
    #[error("weapon {weapon:?} is already owned by {owner:?}")]
    OwnedByOther { weapon: Entity, owner: Entity },

    /// Intent адресован entity без `WeaponEquipment`
    #[error("entity {0:?} has no WeaponEquipment")]
    MissingEquipment(Entity),
}
