//! ECS Components для equipment domain
//!
//! Организация по доменам:
//! - weapon: данные оружия + presentation state (Weapon, WeaponPresentation, OwnedBy)
//! - attachment: sockets на host mesh (AttachmentSockets)
//! - equipment: state machine персонажа (WeaponEquipment)

pub mod weapon;
pub mod attachment;
pub mod equipment;

// Re-exports для удобного импорта
pub use weapon::*;
pub use attachment::*;
pub use equipment::*;
