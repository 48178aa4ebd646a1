//! Equipment integration test
//!
//! Headless App + intent events → WeaponEquipment state + scene graph
//!
//! Проверяем:
//! - Bulk init из EquipmentConfig (templates, default weapon, auto-equip)
//! - Equip/Unequip/Toggle/EquipByIndex/RemoveAt через intents
//! - Attach/detach: hierarchy, visibility, rapier markers, transforms
//! - Configuration errors (нет socket / нет target) → EquipmentRequestFailed

use armory_simulation::equipment::*;
use armory_simulation::*;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, RigidBodyDisabled};

const SOCKET_OFFSET: Vec3 = Vec3::new(0.3, 1.2, 0.1);

/// Все notifications за время теста (каждый event ровно один раз)
#[derive(Resource, Default)]
struct Recorded {
    equipped: Vec<WeaponEquipped>,
    unequipped: Vec<WeaponUnequipped>,
    removed: Vec<WeaponRemovedFromInventory>,
    failed: Vec<EquipmentRequestFailed>,
}

fn record_notifications(
    mut recorded: ResMut<Recorded>,
    mut equipped: EventReader<WeaponEquipped>,
    mut unequipped: EventReader<WeaponUnequipped>,
    mut removed: EventReader<WeaponRemovedFromInventory>,
    mut failed: EventReader<EquipmentRequestFailed>,
) {
    recorded.equipped.extend(equipped.read().copied());
    recorded.unequipped.extend(unequipped.read().copied());
    recorded.removed.extend(removed.read().copied());
    recorded.failed.extend(failed.read().cloned());
}

/// Helper: headless App + recorder
fn create_equipment_app() -> App {
    let mut app = create_headless_app();
    app.init_resource::<Recorded>()
        .add_systems(PostUpdate, record_notifications);
    app
}

fn loadout(templates: &[&str]) -> EquipmentConfig {
    EquipmentConfig {
        weapon_templates: templates.iter().map(|id| WeaponId::from(*id)).collect(),
        ..default()
    }
}

/// Helper: spawn character с socket на себе
fn spawn_character(app: &mut App, config: EquipmentConfig) -> Entity {
    app.world_mut()
        .spawn((
            Transform::default(),
            AttachmentSockets::single(DEFAULT_WEAPON_SOCKET, Transform::from_translation(SOCKET_OFFSET)),
            config,
        ))
        .id()
}

fn equipment(app: &App, character: Entity) -> &WeaponEquipment {
    app.world()
        .get::<WeaponEquipment>(character)
        .expect("character has WeaponEquipment")
}

fn recorded(app: &App) -> &Recorded {
    app.world().resource::<Recorded>()
}

fn send<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
    app.update();
}

fn assert_attached(app: &App, weapon: Entity, target: Entity) {
    let presentation = app.world().get::<WeaponPresentation>(weapon).expect("weapon");
    assert!(presentation.visible);
    assert_eq!(presentation.mount.as_ref().map(|mount| mount.target), Some(target));
    assert_eq!(app.world().get::<ChildOf>(weapon).map(|c| c.parent()), Some(target));
    assert!(app.world().get::<ColliderDisabled>(weapon).is_some());
    assert!(app.world().get::<RigidBodyDisabled>(weapon).is_some());
}

fn assert_stowed(app: &App, weapon: Entity) {
    let presentation = app.world().get::<WeaponPresentation>(weapon).expect("weapon");
    assert!(!presentation.visible);
    assert!(!presentation.is_attached());
    assert!(app.world().get::<ChildOf>(weapon).is_none());
    assert!(app.world().get::<ColliderDisabled>(weapon).is_some());
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_templates_spawned_stowed_in_config_order() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword", "pistol_basic"]));

    app.update();

    let equipment = equipment(&app, character);
    assert_eq!(equipment.inventory_size(), 2);
    assert!(!equipment.is_equipped());

    let ids: Vec<_> = equipment
        .inventory()
        .iter()
        .map(|weapon| app.world().get::<Weapon>(*weapon).expect("weapon").definition_id.clone())
        .collect();
    assert_eq!(ids, vec![WeaponId::from("melee_sword"), WeaponId::from("pistol_basic")]);

    for weapon in equipment.inventory() {
        assert_stowed(&app, *weapon);
        assert_eq!(app.world().get::<OwnedBy>(*weapon), Some(&OwnedBy(character)));
    }
    assert!(recorded(&app).equipped.is_empty());
}

#[test]
fn test_unknown_template_skipped() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword", "laser_cannon", "dagger"]));

    app.update();

    assert_eq!(equipment(&app, character).inventory_size(), 2);
}

#[test]
fn test_auto_equip_picks_first_inventory_weapon() {
    let mut app = create_equipment_app();
    let character = spawn_character(
        &mut app,
        EquipmentConfig {
            auto_equip_on_start: true,
            ..loadout(&["melee_sword", "pistol_basic"])
        },
    );

    app.update();

    let equipment = equipment(&app, character);
    let first = equipment.get_at(0).expect("inventory[0]");
    let second = equipment.get_at(1).expect("inventory[1]");
    assert_eq!(equipment.equipped(), Some(first));

    assert_attached(&app, first, character);
    assert_stowed(&app, second);

    let transform = app.world().get::<Transform>(first).expect("transform");
    assert_eq!(transform.translation, SOCKET_OFFSET);

    assert_eq!(
        recorded(&app).equipped,
        vec![WeaponEquipped { owner: character, weapon: first }]
    );
    assert!(recorded(&app).unequipped.is_empty());
}

#[test]
fn test_auto_equip_prefers_default_weapon() {
    let mut app = create_equipment_app();
    let character = spawn_character(
        &mut app,
        EquipmentConfig {
            default_weapon: Some("pistol_basic".into()),
            auto_equip_on_start: true,
            ..loadout(&["melee_sword", "pistol_basic"])
        },
    );

    app.update();

    let equipment = equipment(&app, character);
    assert_eq!(equipment.default_weapon(), equipment.get_at(1));
    assert_eq!(equipment.equipped(), equipment.get_at(1));
}

#[test]
fn test_default_weapon_outside_inventory() {
    let mut app = create_equipment_app();
    let character = spawn_character(
        &mut app,
        EquipmentConfig {
            default_weapon: Some("dagger".into()),
            auto_equip_on_start: true,
            ..loadout(&["melee_sword"])
        },
    );

    app.update();

    let equipment = equipment(&app, character);
    let dagger = equipment.equipped().expect("dagger equipped");
    assert_eq!(equipment.inventory_size(), 1);
    assert!(!equipment.inventory().contains(&dagger));
    assert_eq!(
        app.world().get::<Weapon>(dagger).map(|w| w.definition_id.clone()),
        Some(WeaponId::from("dagger"))
    );
    assert_eq!(app.world().get::<OwnedBy>(dagger), Some(&OwnedBy(character)));
}

#[test]
fn test_auto_equip_with_empty_loadout_is_noop() {
    let mut app = create_equipment_app();
    let character = spawn_character(
        &mut app,
        EquipmentConfig {
            auto_equip_on_start: true,
            ..default()
        },
    );

    app.update();

    assert!(!equipment(&app, character).is_equipped());
    assert!(recorded(&app).failed.is_empty());
}

#[test]
fn test_attach_target_resolved_to_mesh_child() {
    let mut app = create_equipment_app();
    let character = app
        .world_mut()
        .spawn((Transform::default(), EquipmentConfig {
            auto_equip_on_start: true,
            ..loadout(&["melee_sword"])
        }))
        .id();
    let mesh = app
        .world_mut()
        .spawn((
            Transform::default(),
            AttachmentSockets::single(DEFAULT_WEAPON_SOCKET, Transform::IDENTITY),
            ChildOf(character),
        ))
        .id();

    app.update();

    let equipment = equipment(&app, character);
    assert_eq!(equipment.attach_target(), Some(mesh));

    let sword = equipment.equipped().expect("sword equipped");
    assert_attached(&app, sword, mesh);
}

// ============================================================================
// Toggle / Equip / Unequip
// ============================================================================

#[test]
fn test_toggle_equips_then_unequips() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword"]));
    app.update();
    let sword = equipment(&app, character).get_at(0).expect("sword");

    send(&mut app, ToggleWeaponIntent { entity: character });
    assert_eq!(equipment(&app, character).equipped(), Some(sword));
    assert_attached(&app, sword, character);

    send(&mut app, ToggleWeaponIntent { entity: character });
    assert!(!equipment(&app, character).is_equipped());
    assert_stowed(&app, sword);

    assert_eq!(recorded(&app).equipped.len(), 1);
    assert_eq!(
        recorded(&app).unequipped,
        vec![WeaponUnequipped { owner: character, weapon: sword }]
    );
}

#[test]
fn test_toggle_with_nothing_available_fails() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, EquipmentConfig::default());
    app.update();

    send(&mut app, ToggleWeaponIntent { entity: character });

    assert!(!equipment(&app, character).is_equipped());
    assert_eq!(
        recorded(&app).failed,
        vec![EquipmentRequestFailed { entity: character, error: EquipError::NothingToEquip }]
    );
}

#[test]
fn test_unequip_keeps_world_transform() {
    let mut app = create_equipment_app();
    let character = app
        .world_mut()
        .spawn((
            Transform::from_xyz(10.0, 0.0, 0.0),
            AttachmentSockets::single(DEFAULT_WEAPON_SOCKET, Transform::from_translation(SOCKET_OFFSET)),
            EquipmentConfig {
                auto_equip_on_start: true,
                ..loadout(&["melee_sword"])
            },
        ))
        .id();
    app.update();
    let sword = equipment(&app, character).equipped().expect("sword equipped");

    send(&mut app, UnequipWeaponIntent { entity: character });

    let transform = app.world().get::<Transform>(sword).expect("transform");
    assert!(transform
        .translation
        .abs_diff_eq(Vec3::new(10.0, 0.0, 0.0) + SOCKET_OFFSET, 1e-5));
}

#[test]
fn test_switching_weapons_unequips_previous_once() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword", "pistol_basic"]));
    app.update();
    let sword = equipment(&app, character).get_at(0).expect("sword");
    let pistol = equipment(&app, character).get_at(1).expect("pistol");

    send(&mut app, EquipWeaponIntent { entity: character, weapon: sword });
    send(&mut app, EquipWeaponIntent { entity: character, weapon: pistol });

    assert_eq!(equipment(&app, character).equipped(), Some(pistol));
    assert_attached(&app, pistol, character);
    assert_stowed(&app, sword);

    let recorded = recorded(&app);
    assert_eq!(
        recorded.equipped,
        vec![
            WeaponEquipped { owner: character, weapon: sword },
            WeaponEquipped { owner: character, weapon: pistol },
        ]
    );
    assert_eq!(
        recorded.unequipped,
        vec![WeaponUnequipped { owner: character, weapon: sword }]
    );
}

#[test]
fn test_repeat_equip_emits_single_event() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword"]));
    app.update();
    let sword = equipment(&app, character).get_at(0).expect("sword");

    send(&mut app, EquipWeaponIntent { entity: character, weapon: sword });
    send(&mut app, EquipWeaponIntent { entity: character, weapon: sword });

    assert_eq!(equipment(&app, character).equipped(), Some(sword));
    assert_eq!(recorded(&app).equipped.len(), 1);
    assert!(recorded(&app).unequipped.is_empty());
    assert!(recorded(&app).failed.is_empty());
}

#[test]
fn test_equip_non_weapon_fails() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, EquipmentConfig::default());
    let rock = app.world_mut().spawn(Transform::default()).id();
    app.update();

    send(&mut app, EquipWeaponIntent { entity: character, weapon: rock });

    assert!(!equipment(&app, character).is_equipped());
    assert_eq!(recorded(&app).failed[0].error, EquipError::InvalidWeapon(rock));
}

#[test]
fn test_unequip_with_nothing_equipped_fails_silently() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword"]));
    app.update();

    send(&mut app, UnequipWeaponIntent { entity: character });

    assert!(recorded(&app).unequipped.is_empty());
    assert_eq!(
        recorded(&app).failed,
        vec![EquipmentRequestFailed { entity: character, error: EquipError::NothingEquipped }]
    );
}

#[test]
fn test_equip_by_index() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword", "pistol_basic"]));
    app.update();

    send(&mut app, EquipWeaponByIndexIntent { entity: character, index: 1 });

    let equipment = equipment(&app, character);
    assert_eq!(equipment.equipped(), equipment.get_at(1));
}

#[test]
fn test_equip_by_index_out_of_range_keeps_state() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword", "pistol_basic"]));
    app.update();

    send(&mut app, EquipWeaponByIndexIntent { entity: character, index: 0 });
    let sword = equipment(&app, character).equipped();

    send(&mut app, EquipWeaponByIndexIntent { entity: character, index: 5 });

    assert_eq!(equipment(&app, character).equipped(), sword);
    assert_eq!(
        recorded(&app).failed[0].error,
        EquipError::IndexOutOfRange { index: 5, len: 2 }
    );
    assert_eq!(recorded(&app).equipped.len(), 1);
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_missing_socket_fails_equip() {
    let mut app = create_equipment_app();
    let character = app
        .world_mut()
        .spawn((
            Transform::default(),
            AttachmentSockets::single("back_socket", Transform::IDENTITY),
            loadout(&["melee_sword"]),
        ))
        .id();
    app.update();

    send(&mut app, ToggleWeaponIntent { entity: character });

    assert!(!equipment(&app, character).is_equipped());
    assert_eq!(
        recorded(&app).failed[0].error,
        EquipError::SocketMissing {
            target: character,
            socket: DEFAULT_WEAPON_SOCKET.to_string(),
        }
    );
    assert_stowed(&app, equipment(&app, character).get_at(0).expect("sword"));
}

#[test]
fn test_missing_attach_target_fails_every_equip() {
    let mut app = create_equipment_app();
    let character = app
        .world_mut()
        .spawn((Transform::default(), loadout(&["melee_sword"])))
        .id();
    app.update();

    assert_eq!(equipment(&app, character).attach_target(), None);

    send(&mut app, ToggleWeaponIntent { entity: character });
    send(&mut app, EquipWeaponByIndexIntent { entity: character, index: 0 });

    assert!(!equipment(&app, character).is_equipped());
    let errors: Vec<_> = recorded(&app).failed.iter().map(|f| f.error.clone()).collect();
    assert_eq!(errors, vec![EquipError::AttachTargetMissing, EquipError::AttachTargetMissing]);
}

#[test]
fn test_intent_for_entity_without_equipment() {
    let mut app = create_equipment_app();
    let stranger = app.world_mut().spawn(Transform::default()).id();
    app.update();

    send(&mut app, ToggleWeaponIntent { entity: stranger });

    assert_eq!(recorded(&app).failed[0].error, EquipError::MissingEquipment(stranger));
}

// ============================================================================
// Inventory
// ============================================================================

#[test]
fn test_add_to_inventory_takes_ownership() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword"]));
    let rifle = app
        .world_mut()
        .spawn(WeaponDefinition::new("rifle_basic").to_weapon())
        .id();
    app.update();

    send(&mut app, AddWeaponToInventoryIntent { entity: character, weapon: rifle });

    let equipment = equipment(&app, character);
    assert_eq!(equipment.inventory_size(), 2);
    assert_eq!(equipment.get_at(1), Some(rifle));
    assert_eq!(app.world().get::<OwnedBy>(rifle), Some(&OwnedBy(character)));
    assert_stowed(&app, rifle);
}

#[test]
fn test_add_non_weapon_to_inventory_fails() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, EquipmentConfig::default());
    let rock = app.world_mut().spawn(Transform::default()).id();
    app.update();

    send(&mut app, AddWeaponToInventoryIntent { entity: character, weapon: rock });

    assert_eq!(equipment(&app, character).inventory_size(), 0);
    assert_eq!(recorded(&app).failed[0].error, EquipError::InvalidWeapon(rock));
}

#[test]
fn test_remove_equipped_weapon_unequips_first() {
    let mut app = create_equipment_app();
    let character = spawn_character(
        &mut app,
        EquipmentConfig {
            auto_equip_on_start: true,
            ..loadout(&["melee_sword", "pistol_basic"])
        },
    );
    app.update();
    let sword = equipment(&app, character).get_at(0).expect("sword");
    let pistol = equipment(&app, character).get_at(1).expect("pistol");

    send(&mut app, RemoveWeaponAtIntent { entity: character, index: 0 });

    let equipment = equipment(&app, character);
    assert!(!equipment.is_equipped());
    assert_eq!(equipment.inventory(), &[pistol]);

    assert_stowed(&app, sword);
    assert!(app.world().get::<OwnedBy>(sword).is_none());

    let recorded = recorded(&app);
    assert_eq!(
        recorded.unequipped,
        vec![WeaponUnequipped { owner: character, weapon: sword }]
    );
    assert_eq!(
        recorded.removed,
        vec![WeaponRemovedFromInventory { owner: character, weapon: sword }]
    );
}

#[test]
fn test_remove_out_of_range_fails() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword"]));
    app.update();

    send(&mut app, RemoveWeaponAtIntent { entity: character, index: 3 });

    assert_eq!(equipment(&app, character).inventory_size(), 1);
    assert_eq!(
        recorded(&app).failed[0].error,
        EquipError::IndexOutOfRange { index: 3, len: 1 }
    );
    assert!(recorded(&app).removed.is_empty());
}

// ============================================================================
// Lifetime
// ============================================================================

#[test]
fn test_owner_despawn_destroys_owned_weapons() {
    let mut app = create_equipment_app();
    let character = spawn_character(
        &mut app,
        EquipmentConfig {
            default_weapon: Some("dagger".into()),
            auto_equip_on_start: true,
            ..loadout(&["melee_sword", "pistol_basic"])
        },
    );
    app.update();

    let mut weapons = app.world_mut().query::<&Weapon>();
    assert_eq!(weapons.iter(app.world()).count(), 3);

    app.world_mut().despawn(character);
    app.update();

    assert_eq!(weapons.iter(app.world()).count(), 0);
}

#[test]
fn test_removed_weapon_survives_owner_despawn() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword", "pistol_basic"]));
    app.update();
    let sword = equipment(&app, character).get_at(0).expect("sword");

    send(&mut app, RemoveWeaponAtIntent { entity: character, index: 0 });
    app.world_mut().despawn(character);
    app.update();

    assert!(app.world().get_entity(sword).is_ok());
    assert!(app.world().get::<Weapon>(sword).is_some());
}

#[test]
fn test_remove_duplicate_entry_keeps_ownership() {
    let mut app = create_equipment_app();
    let character = spawn_character(&mut app, loadout(&["melee_sword"]));
    app.update();
    let sword = equipment(&app, character).get_at(0).expect("sword");

    send(&mut app, AddWeaponToInventoryIntent { entity: character, weapon: sword });
    send(&mut app, RemoveWeaponAtIntent { entity: character, index: 0 });

    assert_eq!(equipment(&app, character).inventory(), &[sword]);
    assert_eq!(app.world().get::<OwnedBy>(sword), Some(&OwnedBy(character)));

    app.world_mut().despawn(character);
    app.update();

    assert!(app.world().get_entity(sword).is_err());
}

#[test]
fn test_add_weapon_owned_by_other_character_fails() {
    let mut app = create_equipment_app();
    let first = spawn_character(&mut app, loadout(&["melee_sword"]));
    let second = spawn_character(&mut app, EquipmentConfig::default());
    app.update();
    let sword = equipment(&app, first).get_at(0).expect("sword");

    send(&mut app, AddWeaponToInventoryIntent { entity: second, weapon: sword });

    assert_eq!(equipment(&app, second).inventory_size(), 0);
    assert_eq!(app.world().get::<OwnedBy>(sword), Some(&OwnedBy(first)));
    assert_eq!(
        recorded(&app).failed[0].error,
        EquipError::OwnedByOther { weapon: sword, owner: first }
    );
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn test_equip_and_unequip_in_same_frame_keeps_socket_pose() {
    let mut app = create_equipment_app();
    let character = app
        .world_mut()
        .spawn((
            Transform::from_xyz(10.0, 0.0, 0.0),
            AttachmentSockets::single(DEFAULT_WEAPON_SOCKET, Transform::from_translation(SOCKET_OFFSET)),
            loadout(&["melee_sword"]),
        ))
        .id();
    app.update();
    let sword = equipment(&app, character).get_at(0).expect("sword");

    app.world_mut().send_event(EquipWeaponIntent { entity: character, weapon: sword });
    app.world_mut().send_event(UnequipWeaponIntent { entity: character });
    app.update();

    assert!(!equipment(&app, character).is_equipped());
    assert_stowed(&app, sword);

    let transform = app.world().get::<Transform>(sword).expect("transform");
    assert!(transform
        .translation
        .abs_diff_eq(Vec3::new(10.0, 0.0, 0.0) + SOCKET_OFFSET, 1e-5));
}

#[test]
fn test_attach_to_zero_scale_target_keeps_finite_scale() {
    let mut app = create_equipment_app();
    let character = app
        .world_mut()
        .spawn((
            Transform::from_scale(Vec3::new(0.0, 1.0, 1.0)),
            AttachmentSockets::single(DEFAULT_WEAPON_SOCKET, Transform::IDENTITY),
            loadout(&["melee_sword"]),
        ))
        .id();
    app.update();

    send(&mut app, ToggleWeaponIntent { entity: character });

    let sword = equipment(&app, character).equipped().expect("sword equipped");
    let transform = app.world().get::<Transform>(sword).expect("transform");
    assert!(transform.scale.is_finite());
    assert_eq!(transform.scale, Vec3::ONE);
}
