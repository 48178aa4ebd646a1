//! Attachment компоненты: именованные sockets на host mesh

use bevy::prelude::*;

/// Socket name по умолчанию (правая рука скелета)
pub const DEFAULT_WEAPON_SOCKET: &str = "hand_r_socket";

/// Набор sockets на entity (character или его mesh child)
///
/// `WeaponEquipment` резолвит attach target один раз при инициализации:
/// сначала сам character, затем первый child с этим компонентом.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AttachmentSockets {
    pub sockets: Vec<Socket>,
}

/// Attachment point: имя + локальный offset относительно target
#[derive(Debug, Clone, Reflect)]
pub struct Socket {
    pub name: String,
    pub offset: Transform,
}

impl AttachmentSockets {
    /// Один socket (типичный случай: рука персонажа)
    pub fn single(name: impl Into<String>, offset: Transform) -> Self {
        Self::default().with_socket(name, offset)
    }

    pub fn with_socket(mut self, name: impl Into<String>, offset: Transform) -> Self {
        self.sockets.push(Socket {
            name: name.into(),
            offset,
        });
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.offset(name).is_some()
    }

    /// Локальный offset socket'а (None = socket не существует)
    pub fn offset(&self, name: &str) -> Option<Transform> {
        self.sockets
            .iter()
            .find(|socket| socket.name == name)
            .map(|socket| socket.offset)
    }
}
