//! Headless симуляция Armory
//!
//! Загружает loadout из RON (первый аргумент), спавнит персонажа
//! и прогоняет несколько equipment intents.

use armory_simulation::equipment::{EquipWeaponByIndexIntent, ToggleWeaponIntent};
use armory_simulation::{
    create_headless_app, log_error, log_info, set_log_level, ArmoryConfig, AttachmentSockets,
    WeaponEquipment,
};
use bevy::prelude::*;

/// Loadout по умолчанию (без аргумента)
const BUILTIN_CONFIG: &str = include_str!("../../../config/armory.ron");

fn main() {
    let mut app = create_headless_app();

    let loaded = match std::env::args().nth(1) {
        Some(path) => ArmoryConfig::load(&path),
        None => ArmoryConfig::from_ron_str(BUILTIN_CONFIG),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            log_error(&format!("Failed to load config: {}", err));
            std::process::exit(1);
        }
    };

    set_log_level(config.log_level);
    log_info(&format!(
        "Starting Armory headless simulation ({} weapon definitions)",
        config.definitions().len()
    ));

    app.insert_resource(config.definitions());

    let character = app
        .world_mut()
        .spawn((
            Name::new("Character"),
            Transform::default(),
            AttachmentSockets::single(config.loadout.socket_name.clone(), Transform::from_xyz(0.3, 1.2, 0.1)),
            config.loadout.clone(),
        ))
        .id();

    // Init + auto-equip
    app.update();
    report(&mut app, character, "spawn");

    app.world_mut().send_event(ToggleWeaponIntent { entity: character });
    app.update();
    report(&mut app, character, "toggle");

    app.world_mut().send_event(EquipWeaponByIndexIntent { entity: character, index: 1 });
    app.update();
    report(&mut app, character, "equip #1");

    app.world_mut().send_event(ToggleWeaponIntent { entity: character });
    app.update();
    report(&mut app, character, "toggle");

    log_info("Simulation complete!");
}

fn report(app: &mut App, character: Entity, step: &str) {
    let Some(equipment) = app.world().get::<WeaponEquipment>(character) else {
        log_error(&format!("{}: character has no WeaponEquipment", step));
        return;
    };

    log_info(&format!(
        "{}: equipped {:?}, inventory {}",
        step,
        equipment.equipped(),
        equipment.inventory_size()
    ));
}
