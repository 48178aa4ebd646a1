//! Bevy adapters для equipment seams
//!
//! - `WeaponRig`: `AttachmentHost` поверх ECS scene graph (Transform + hierarchy + rapier markers)
//! - `EquipmentNotices`: `EquipmentObserver` поверх EventWriters
//!
//! Оба: `SystemParam`, поэтому любая система получает их одним параметром.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, RigidBodyDisabled};
use std::marker::PhantomData;

use super::events::*;
use super::host::{AttachmentHost, EquipmentObserver};
use super::EquipError;
use crate::components::{AttachmentSockets, Weapon, WeaponMount, WeaponPresentation};
use crate::logger::{log, log_warning};

// ============================================================================
// WeaponRig (AttachmentHost)
// ============================================================================

/// ECS scene graph для attach/detach оружия
///
/// Attach:
/// - Transform = socket offset (location + rotation), world scale сохраняется
/// - weapon становится child target'а
/// - `RigidBodyDisabled` + `ColliderDisabled`
///
/// Detach:
/// - world transform сохраняется (из GlobalTransform, если есть)
/// - parent link удаляется, оружие скрыто, `ColliderDisabled` остаётся
#[derive(SystemParam)]
pub struct WeaponRig<'w, 's> {
    commands: Commands<'w, 's>,
    weapons: Query<
        'w,
        's,
        (
            &'static mut WeaponPresentation,
            &'static mut Transform,
            Option<&'static GlobalTransform>,
        ),
        With<Weapon>,
    >,
    mounts: Query<'w, 's, (&'static AttachmentSockets, Option<&'static GlobalTransform>)>,
}

impl<'w, 's> WeaponRig<'w, 's> {
    pub fn commands(&mut self) -> &mut Commands<'w, 's> {
        &mut self.commands
    }
}

impl AttachmentHost for WeaponRig<'_, '_> {
    fn is_weapon(&self, weapon: Entity) -> bool {
        self.weapons.contains(weapon)
    }

    fn has_socket(&self, target: Entity, socket: &str) -> bool {
        self.mounts
            .get(target)
            .is_ok_and(|(sockets, _)| sockets.contains(socket))
    }

    fn attach(&mut self, weapon: Entity, target: Entity, socket: &str) -> Result<(), EquipError> {
        let socket_missing = || EquipError::SocketMissing {
            target,
            socket: socket.to_string(),
        };

        let Ok((sockets, target_global)) = self.mounts.get(target) else {
            return Err(socket_missing());
        };
        let offset = sockets.offset(socket).ok_or_else(socket_missing)?;

        let Ok((mut presentation, mut transform, weapon_global)) = self.weapons.get_mut(weapon) else {
            return Err(EquipError::InvalidWeapon(weapon));
        };

        // Scale: KeepWorld → local = world / parent (вырожденный parent scale: world как есть)
        let world_scale = weapon_global.map_or(transform.scale, |global| global.compute_transform().scale);
        let parent_scale = target_global.map_or(Vec3::ONE, |global| global.compute_transform().scale);
        let local_scale = if parent_scale.cmpeq(Vec3::ZERO).any() {
            world_scale
        } else {
            world_scale / parent_scale
        };
        *transform = offset.with_scale(local_scale);

        presentation.visible = true;
        presentation.mount = Some(WeaponMount {
            target,
            socket: socket.to_string(),
        });

        self.commands.entity(target).add_child(weapon);
        self.commands
            .entity(weapon)
            .insert((RigidBodyDisabled, ColliderDisabled));

        log(&format!("attach: {:?} → {:?} at '{}'", weapon, target, socket));
        Ok(())
    }

    fn detach(&mut self, weapon: Entity) {
        let Ok((mut presentation, mut transform, global)) = self.weapons.get_mut(weapon) else {
            log_warning(&format!("detach: {:?} is not a weapon", weapon));
            return;
        };

        // KeepWorld: для mounted оружия world = target * local socket transform,
        // GlobalTransform оружия может быть от прошлого кадра (attach в этом же Update)
        let mounted_world = presentation
            .mount
            .as_ref()
            .and_then(|mount| self.mounts.get(mount.target).ok())
            .and_then(|(_, target_global)| target_global)
            .map(|target_global| target_global.mul_transform(*transform));

        if let Some(world) = mounted_world.or_else(|| global.copied()) {
            *transform = world.compute_transform();
        }

        presentation.visible = false;
        presentation.mount = None;

        self.commands
            .entity(weapon)
            .remove::<ChildOf>()
            .insert(ColliderDisabled);

        log(&format!("detach: {:?}", weapon));
    }
}

// ============================================================================
// EquipmentNotices (EquipmentObserver)
// ============================================================================

/// Все notification writers equipment домена
#[derive(SystemParam)]
pub struct EquipmentNotices<'w, 's> {
    equipped: EventWriter<'w, WeaponEquipped>,
    unequipped: EventWriter<'w, WeaponUnequipped>,
    removed: EventWriter<'w, WeaponRemovedFromInventory>,
    failed: EventWriter<'w, EquipmentRequestFailed>,
    marker: PhantomData<&'s ()>,
}

impl<'w, 's> EquipmentNotices<'w, 's> {
    /// Observer для конкретного owner (events несут owner entity)
    pub fn for_owner(&mut self, owner: Entity) -> OwnerNotifier<'_, 'w, 's> {
        OwnerNotifier {
            owner,
            notices: self,
        }
    }

    pub fn removed(&mut self, owner: Entity, weapon: Entity) {
        self.removed.write(WeaponRemovedFromInventory { owner, weapon });
    }

    /// Err → `EquipmentRequestFailed`, Ok → значение
    pub fn report<T>(&mut self, entity: Entity, result: Result<T, EquipError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                log_warning(&format!("⚠️ Equipment request for {:?} failed: {}", entity, error));
                self.failed.write(EquipmentRequestFailed { entity, error });
                None
            }
        }
    }
}

/// `EquipmentObserver` привязанный к owner
pub struct OwnerNotifier<'a, 'w, 's> {
    owner: Entity,
    notices: &'a mut EquipmentNotices<'w, 's>,
}

impl EquipmentObserver for OwnerNotifier<'_, '_, '_> {
    fn on_equipped(&mut self, weapon: Entity) {
        self.notices.equipped.write(WeaponEquipped {
            owner: self.owner,
            weapon,
        });
    }

    fn on_unequipped(&mut self, weapon: Entity) {
        self.notices.unequipped.write(WeaponUnequipped {
            owner: self.owner,
            weapon,
        });
    }
}
