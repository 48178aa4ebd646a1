//! Equipment system implementations
//!
//! # Systems
//!
//! **Lifecycle:**
//! - `initialize_weapon_equipment`: resolve attach target, spawn templates, default weapon
//! - `auto_equip_on_start`: equip default / inventory[0] после spawn
//! - `despawn_owned_weapons`: owner без equipment → его оружие удаляется
//!
//! **Intents:**
//! - `process_add_to_inventory` / `process_remove_from_inventory`
//! - `process_equip_weapon` / `process_equip_by_index`
//! - `process_unequip_weapon` / `process_toggle_weapon`

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, RigidBodyDisabled};

use super::events::*;
use super::rig::{EquipmentNotices, WeaponRig};
use super::EquipError;
use crate::components::{AttachmentSockets, OwnedBy, Weapon, WeaponEquipment};
use crate::config::EquipmentConfig;
use crate::logger::{log, log_error, log_info};
use crate::weapon_system::{spawn_weapon, WeaponDefinitions};

/// Marker: equipment ждёт auto-equip (weapons заспавнены, но ещё не в World)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PendingAutoEquip;

// ============================================================================
// Lifecycle
// ============================================================================

/// Применить `EquipmentConfig` к свежему `WeaponEquipment`
///
/// # Flow
/// 1. Resolve attach target: сам character, иначе первый child с `AttachmentSockets`
/// 2. Spawn одного stowed инстанса на template (порядок конфига = индексы inventory)
/// 3. Resolve default weapon: первый инстанс того же id, иначе отдельный инстанс вне inventory
/// 4. `auto_equip_on_start` → `PendingAutoEquip`
pub fn initialize_weapon_equipment(
    mut commands: Commands,
    mut characters: Query<
        (Entity, &EquipmentConfig, &mut WeaponEquipment, Option<&Children>),
        Added<EquipmentConfig>,
    >,
    mounts: Query<(), With<AttachmentSockets>>,
    definitions: Res<WeaponDefinitions>,
) {
    for (entity, config, mut equipment, children) in characters.iter_mut() {
        equipment.set_socket_name(config.socket_name.clone());

        let target = if mounts.contains(entity) {
            Some(entity)
        } else {
            children.and_then(|children| {
                let children: &[Entity] = children;
                children.iter().copied().find(|child| mounts.contains(*child))
            })
        };
        equipment.resolve_attach_target(target);

        // Templates → inventory
        for template in &config.weapon_templates {
            let Some(definition) = definitions.get(template) else {
                log_error(&format!("WeaponEquipment {:?}: unknown weapon template '{}'", entity, template));
                continue;
            };

            let weapon = spawn_weapon(&mut commands, definition, entity);
            equipment.push_spawned(weapon);
        }

        // Default weapon
        if let Some(default_id) = &config.default_weapon {
            let from_templates = config
                .weapon_templates
                .iter()
                .filter(|id| definitions.contains(id))
                .position(|id| id == default_id)
                .and_then(|index| equipment.get_at(index));

            let default_weapon = match (from_templates, definitions.get(default_id)) {
                (Some(weapon), _) => Some(weapon),
                (None, Some(definition)) => Some(spawn_weapon(&mut commands, definition, entity)),
                (None, None) => {
                    log_error(&format!("WeaponEquipment {:?}: unknown default weapon '{}'", entity, default_id));
                    None
                }
            };
            equipment.set_default_weapon(default_weapon);
        }

        if config.auto_equip_on_start {
            commands.entity(entity).insert(PendingAutoEquip);
        }

        log_info(&format!(
            "WeaponEquipment {:?} initialized: {} weapons, socket '{}'",
            entity,
            equipment.inventory_size(),
            equipment.socket_name()
        ));
    }
}

/// Auto-equip: default weapon, иначе inventory[0]
pub fn auto_equip_on_start(
    mut characters: Query<(Entity, &mut WeaponEquipment), With<PendingAutoEquip>>,
    mut rig: WeaponRig,
    mut notices: EquipmentNotices,
) {
    for (entity, mut equipment) in characters.iter_mut() {
        rig.commands().entity(entity).remove::<PendingAutoEquip>();

        if equipment.is_equipped() {
            continue;
        }

        let Some(weapon) = equipment.fallback_weapon() else {
            log(&format!("WeaponEquipment {:?}: auto-equip skipped, nothing to equip", entity));
            continue;
        };

        let result = equipment.equip(weapon, &mut rig, &mut notices.for_owner(entity));
        notices.report(entity, result);
    }
}

/// Owner потерял `WeaponEquipment` (или despawn) → удалить его оружие
pub fn despawn_owned_weapons(
    mut commands: Commands,
    mut removed: RemovedComponents<WeaponEquipment>,
    weapons: Query<(Entity, &OwnedBy), With<Weapon>>,
) {
    for owner in removed.read() {
        for (weapon, owned_by) in weapons.iter() {
            if owned_by.0 == owner {
                commands.entity(weapon).despawn();
                log(&format!("despawn_owned_weapons: {:?} (owner {:?})", weapon, owner));
            }
        }
    }
}

// ============================================================================
// Inventory intents
// ============================================================================

pub fn process_add_to_inventory(
    mut events: EventReader<AddWeaponToInventoryIntent>,
    mut equipment: Query<&mut WeaponEquipment>,
    owners: Query<&OwnedBy>,
    mut rig: WeaponRig,
    mut notices: EquipmentNotices,
) {
    for intent in events.read() {
        let Ok(mut manager) = equipment.get_mut(intent.entity) else {
            notices.report::<()>(intent.entity, Err(EquipError::MissingEquipment(intent.entity)));
            continue;
        };

        // Один owner на weapon: иначе despawn одного owner'а удалит оружие другого
        if let Ok(&OwnedBy(owner)) = owners.get(intent.weapon) {
            if owner != intent.entity {
                notices.report::<()>(
                    intent.entity,
                    Err(EquipError::OwnedByOther {
                        weapon: intent.weapon,
                        owner,
                    }),
                );
                continue;
            }
        }

        let result = manager.add_to_inventory(intent.weapon, &rig);
        if notices.report(intent.entity, result).is_some() {
            // Inventory оружие всегда stowed: без коллизий и физики
            rig.commands().entity(intent.weapon).insert((
                OwnedBy(intent.entity),
                ColliderDisabled,
                RigidBodyDisabled,
            ));
        }
    }
}

pub fn process_remove_from_inventory(
    mut events: EventReader<RemoveWeaponAtIntent>,
    mut equipment: Query<&mut WeaponEquipment>,
    mut rig: WeaponRig,
    mut notices: EquipmentNotices,
) {
    for intent in events.read() {
        let Ok(mut manager) = equipment.get_mut(intent.entity) else {
            notices.report::<()>(intent.entity, Err(EquipError::MissingEquipment(intent.entity)));
            continue;
        };

        let result = manager.remove_at(intent.index, &mut rig, &mut notices.for_owner(intent.entity));
        if let Some(weapon) = notices.report(intent.entity, result) {
            // Последняя ссылка снята: lifetime у caller'а
            if !manager.owns(weapon) {
                rig.commands().entity(weapon).remove::<OwnedBy>();
            }
            notices.removed(intent.entity, weapon);
        }
    }
}

// ============================================================================
// Equip / Unequip intents
// ============================================================================

pub fn process_equip_weapon(
    mut events: EventReader<EquipWeaponIntent>,
    mut equipment: Query<&mut WeaponEquipment>,
    mut rig: WeaponRig,
    mut notices: EquipmentNotices,
) {
    for intent in events.read() {
        let Ok(mut manager) = equipment.get_mut(intent.entity) else {
            notices.report::<()>(intent.entity, Err(EquipError::MissingEquipment(intent.entity)));
            continue;
        };

        let result = manager.equip(intent.weapon, &mut rig, &mut notices.for_owner(intent.entity));
        notices.report(intent.entity, result);
    }
}

pub fn process_equip_by_index(
    mut events: EventReader<EquipWeaponByIndexIntent>,
    mut equipment: Query<&mut WeaponEquipment>,
    mut rig: WeaponRig,
    mut notices: EquipmentNotices,
) {
    for intent in events.read() {
        let Ok(mut manager) = equipment.get_mut(intent.entity) else {
            notices.report::<()>(intent.entity, Err(EquipError::MissingEquipment(intent.entity)));
            continue;
        };

        let result = manager.equip_by_index(intent.index, &mut rig, &mut notices.for_owner(intent.entity));
        notices.report(intent.entity, result);
    }
}

pub fn process_unequip_weapon(
    mut events: EventReader<UnequipWeaponIntent>,
    mut equipment: Query<&mut WeaponEquipment>,
    mut rig: WeaponRig,
    mut notices: EquipmentNotices,
) {
    for intent in events.read() {
        let Ok(mut manager) = equipment.get_mut(intent.entity) else {
            notices.report::<()>(intent.entity, Err(EquipError::MissingEquipment(intent.entity)));
            continue;
        };

        let result = manager.unequip(&mut rig, &mut notices.for_owner(intent.entity));
        notices.report(intent.entity, result);
    }
}

pub fn process_toggle_weapon(
    mut events: EventReader<ToggleWeaponIntent>,
    mut equipment: Query<&mut WeaponEquipment>,
    mut rig: WeaponRig,
    mut notices: EquipmentNotices,
) {
    for intent in events.read() {
        let Ok(mut manager) = equipment.get_mut(intent.entity) else {
            notices.report::<()>(intent.entity, Err(EquipError::MissingEquipment(intent.entity)));
            continue;
        };

        let result = manager.toggle(&mut rig, &mut notices.for_owner(intent.entity));
        if let Some(outcome) = notices.report(intent.entity, result) {
            log(&format!("🔄 Toggle {:?} → {:?}", intent.entity, outcome));
        }
    }
}
