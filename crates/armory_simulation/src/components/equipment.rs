//! Equipment component: один активный weapon + inventory
//!
//! # Архитектура
//!
//! **WeaponEquipment**: state machine на character entity.
//! - States: `Unequipped` / `Equipped(weapon)` (`current_weapon`)
//! - `inventory`: ordered список weapon entities (порядок вставки сохраняется,
//!   уникальность не проверяется)
//! - `default_weapon`: для toggle / auto-equip
//! - `attach_target`: резолвится один раз при инициализации
//!
//! Все mutations синхронные: каждая операция либо полностью применяется,
//! либо возвращает `EquipError` и не трогает state (кроме уже выполненного
//! implicit unequip внутри `equip`).
//!
//! Scene graph и notifications: через `AttachmentHost` / `EquipmentObserver`.

use bevy::prelude::*;

use crate::components::attachment::DEFAULT_WEAPON_SOCKET;
use crate::equipment::{AttachmentHost, EquipError, EquipmentObserver};
use crate::logger::{log, log_error, log_info, log_warning};

/// Результат toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Equipped(Entity),
    Unequipped(Entity),
}

/// Weapon equipment manager (один socket, один активный weapon)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponEquipment {
    /// Attachment point на target mesh (фиксируется при конфигурации)
    socket_name: String,
    /// Resolved mesh/socket owner (None = configuration error, все equip падают)
    attach_target: Option<Entity>,
    current_weapon: Option<Entity>,
    inventory: Vec<Entity>,
    default_weapon: Option<Entity>,
}

impl Default for WeaponEquipment {
    fn default() -> Self {
        Self::new(DEFAULT_WEAPON_SOCKET)
    }
}

impl WeaponEquipment {
    pub fn new(socket_name: impl Into<String>) -> Self {
        Self {
            socket_name: socket_name.into(),
            attach_target: None,
            current_weapon: None,
            inventory: Vec::new(),
            default_weapon: None,
        }
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    pub fn socket_name(&self) -> &str {
        &self.socket_name
    }

    pub fn set_socket_name(&mut self, socket_name: impl Into<String>) {
        self.socket_name = socket_name.into();
    }

    pub fn attach_target(&self) -> Option<Entity> {
        self.attach_target
    }

    /// Зафиксировать attach target (None = нет mesh, equip недоступен)
    pub fn resolve_attach_target(&mut self, target: Option<Entity>) {
        if target.is_none() {
            log_error(&format!(
                "WeaponEquipment: no attachment target with socket '{}'",
                self.socket_name
            ));
        }
        self.attach_target = target;
    }

    pub fn default_weapon(&self) -> Option<Entity> {
        self.default_weapon
    }

    pub fn set_default_weapon(&mut self, weapon: Option<Entity>) {
        self.default_weapon = weapon;
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn equipped(&self) -> Option<Entity> {
        self.current_weapon
    }

    pub fn is_equipped(&self) -> bool {
        self.current_weapon.is_some()
    }

    pub fn get_at(&self, index: usize) -> Option<Entity> {
        self.inventory.get(index).copied()
    }

    pub fn inventory_size(&self) -> usize {
        self.inventory.len()
    }

    pub fn inventory(&self) -> &[Entity] {
        &self.inventory
    }

    /// Weapon всё ещё принадлежит manager'у (inventory, default или equipped)
    pub fn owns(&self, weapon: Entity) -> bool {
        self.inventory.contains(&weapon)
            || self.default_weapon == Some(weapon)
            || self.current_weapon == Some(weapon)
    }

    /// Кандидат для toggle / auto-equip: default, иначе inventory[0]
    pub fn fallback_weapon(&self) -> Option<Entity> {
        self.default_weapon.or_else(|| self.inventory.first().copied())
    }

    // ------------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------------

    /// Equip weapon в socket
    ///
    /// # Flow
    /// 1. Validate weapon (не пустой) → повторный equip текущего = Ok без события
    /// 2. Validate attach target + socket
    /// 3. Implicit unequip текущего (OnUnequipped)
    /// 4. Attach → commit + OnEquipped; при ошибке остаёмся Unequipped
    pub fn equip(
        &mut self,
        weapon: Entity,
        host: &mut impl AttachmentHost,
        observer: &mut impl EquipmentObserver,
    ) -> Result<(), EquipError> {
        if !host.is_weapon(weapon) {
            log_warning(&format!("EquipWeapon: {:?} is not a weapon", weapon));
            return Err(EquipError::InvalidWeapon(weapon));
        }

        if self.current_weapon == Some(weapon) {
            log(&format!("EquipWeapon: {:?} already equipped", weapon));
            return Ok(());
        }

        let Some(target) = self.attach_target else {
            log_error("EquipWeapon: attachment target is missing");
            return Err(EquipError::AttachTargetMissing);
        };

        if !host.has_socket(target, &self.socket_name) {
            log_error(&format!(
                "EquipWeapon: socket '{}' does not exist on {:?}",
                self.socket_name, target
            ));
            return Err(EquipError::SocketMissing {
                target,
                socket: self.socket_name.clone(),
            });
        }

        if self.current_weapon.is_some() {
            self.unequip(host, observer)?;
        }

        if let Err(err) = host.attach(weapon, target, &self.socket_name) {
            log_error(&format!("EquipWeapon: attach {:?} failed: {}", weapon, err));
            return Err(err);
        }

        self.current_weapon = Some(weapon);
        observer.on_equipped(weapon);
        log_info(&format!("✅ Equipped weapon {:?} to '{}'", weapon, self.socket_name));
        Ok(())
    }

    /// Unequip текущего weapon, возвращает снятый weapon
    pub fn unequip(
        &mut self,
        host: &mut impl AttachmentHost,
        observer: &mut impl EquipmentObserver,
    ) -> Result<Entity, EquipError> {
        let Some(weapon) = self.current_weapon.take() else {
            log_warning("UnequipWeapon: no weapon currently equipped");
            return Err(EquipError::NothingEquipped);
        };

        host.detach(weapon);
        observer.on_unequipped(weapon);
        log_info(&format!("🗑️ Unequipped weapon {:?}", weapon));
        Ok(weapon)
    }

    /// Toggle: Equipped → unequip; Unequipped → equip default / inventory[0]
    pub fn toggle(
        &mut self,
        host: &mut impl AttachmentHost,
        observer: &mut impl EquipmentObserver,
    ) -> Result<ToggleOutcome, EquipError> {
        if self.is_equipped() {
            return self.unequip(host, observer).map(ToggleOutcome::Unequipped);
        }

        let Some(weapon) = self.fallback_weapon() else {
            log_warning("ToggleWeapon: no default weapon and inventory is empty");
            return Err(EquipError::NothingToEquip);
        };

        self.equip(weapon, host, observer)
            .map(|()| ToggleOutcome::Equipped(weapon))
    }

    /// Equip `inventory[index]`
    pub fn equip_by_index(
        &mut self,
        index: usize,
        host: &mut impl AttachmentHost,
        observer: &mut impl EquipmentObserver,
    ) -> Result<(), EquipError> {
        let Some(weapon) = self.get_at(index) else {
            log_warning(&format!(
                "EquipWeaponByIndex: index {} out of range (size {})",
                index,
                self.inventory.len()
            ));
            return Err(self.out_of_range(index));
        };

        self.equip(weapon, host, observer)
    }

    // ------------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------------

    /// Append в конец inventory
    pub fn add_to_inventory(
        &mut self,
        weapon: Entity,
        host: &impl AttachmentHost,
    ) -> Result<(), EquipError> {
        if !host.is_weapon(weapon) {
            log_warning(&format!("AddToInventory: {:?} is not a weapon", weapon));
            return Err(EquipError::InvalidWeapon(weapon));
        }

        self.inventory.push(weapon);
        log(&format!(
            "AddToInventory: {:?} at index {}",
            weapon,
            self.inventory.len() - 1
        ));
        Ok(())
    }

    /// Append инстанса, только что заспавненного через Commands
    ///
    /// Queries его ещё не видят, поэтому `is_weapon` не проверяется.
    pub(crate) fn push_spawned(&mut self, weapon: Entity) {
        self.inventory.push(weapon);
    }

    /// Удалить `inventory[index]` (последующие индексы сдвигаются на 1)
    ///
    /// Если это текущий weapon: сначала unequip.
    pub fn remove_at(
        &mut self,
        index: usize,
        host: &mut impl AttachmentHost,
        observer: &mut impl EquipmentObserver,
    ) -> Result<Entity, EquipError> {
        let Some(weapon) = self.get_at(index) else {
            log_warning(&format!(
                "RemoveFromInventory: index {} out of range (size {})",
                index,
                self.inventory.len()
            ));
            return Err(self.out_of_range(index));
        };

        if self.current_weapon == Some(weapon) {
            self.unequip(host, observer)?;
        }

        self.inventory.remove(index);

        // Дубликат в inventory: default остаётся
        if self.default_weapon == Some(weapon) && !self.inventory.contains(&weapon) {
            self.default_weapon = None;
        }

        log(&format!("RemoveFromInventory: {:?} from index {}", weapon, index));
        Ok(weapon)
    }

    fn out_of_range(&self, index: usize) -> EquipError {
        EquipError::IndexOutOfRange {
            index,
            len: self.inventory.len(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
