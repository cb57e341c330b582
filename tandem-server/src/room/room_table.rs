use serde::Serialize;
use std::collections::HashMap;
use tandem_core::{ConnectionId, RoomId};

/// Maximum number of occupants a room may hold.
pub const ROOM_CAPACITY: usize = 2;

/// Outcome of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The room did not exist and the joiner is now its only occupant.
    Created,
    /// The joiner became (or already was) an occupant of an existing room.
    Joined,
    /// The room already holds two occupants; nothing changed.
    Full,
}

/// What the table looked like after a connection left its room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    pub remaining: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoomStats {
    pub rooms: usize,
    pub connections: usize,
}

/// Room membership in both directions: room to occupants, connection to room.
///
/// Every mutation keeps the two maps consistent and drops a room the moment
/// its last occupant leaves.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<RoomId, Vec<ConnectionId>>,
    members: HashMap<ConnectionId, RoomId>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, conn_id: ConnectionId, room_id: &RoomId) -> Admission {
        let occupancy = self.occupancy(room_id.as_str());

        if self.members.get(&conn_id) == Some(room_id) {
            return if occupancy >= ROOM_CAPACITY {
                Admission::Full
            } else {
                Admission::Joined
            };
        }

        if occupancy >= ROOM_CAPACITY {
            return Admission::Full;
        }

        // A connection lives in one room at a time.
        self.release(conn_id);

        self.rooms
            .entry(room_id.clone())
            .or_default()
            .push(conn_id);
        self.members.insert(conn_id, room_id.clone());

        if occupancy == 0 {
            Admission::Created
        } else {
            Admission::Joined
        }
    }

    /// Occupants of `room_id` other than `sender`. Empty unless `sender` is
    /// itself an occupant of that room.
    pub fn relay_targets(&self, sender: ConnectionId, room_id: &str) -> Vec<ConnectionId> {
        if self.members.get(&sender).map(RoomId::as_str) != Some(room_id) {
            return Vec::new();
        }

        self.rooms
            .get(room_id)
            .map(|occupants| {
                occupants
                    .iter()
                    .copied()
                    .filter(|id| *id != sender)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes `conn_id` from its room, deleting the room if it is now empty.
    pub fn release(&mut self, conn_id: ConnectionId) -> Option<Departure> {
        let room_id = self.members.remove(&conn_id)?;

        let remaining = match self.rooms.get_mut(&room_id) {
            Some(occupants) => {
                occupants.retain(|id| *id != conn_id);
                occupants.len()
            }
            None => 0,
        };

        if remaining == 0 {
            self.rooms.remove(&room_id);
        }

        Some(Departure { room_id, remaining })
    }

    pub fn occupancy(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, Vec::len)
    }

    #[cfg(test)]
    fn occupants(&self, room_id: &str) -> &[ConnectionId] {
        match self.rooms.get(room_id) {
            Some(occupants) => occupants.as_slice(),
            None => &[],
        }
    }

    #[cfg(test)]
    fn room_of(&self, conn_id: ConnectionId) -> Option<&RoomId> {
        self.members.get(&conn_id)
    }

    pub fn stats(&self) -> RoomStats {
        RoomStats {
            rooms: self.rooms.len(),
            connections: self.members.len(),
        }
    }
}
