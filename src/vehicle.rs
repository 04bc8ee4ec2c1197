use crate::{EventId, VehicleId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a vehicle is held in place by an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VehicleStatus {
    /// The vehicle moves with the traffic density.
    #[default]
    Free,
    /// The vehicle is stopped behind the given event.
    Blocked(EventId),
}

/// A point vehicle on the lane.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vehicle {
    /// The vehicle's ID.
    pub(crate) id: VehicleId,
    /// The position along the lane in m.
    pub(crate) pos: f64,
    /// The velocity in m/s.
    pub(crate) vel: f64,
    /// Whether the vehicle is blocked.
    pub(crate) status: VehicleStatus,
}

impl Vehicle {
    /// Creates a new, unblocked vehicle.
    pub fn new(id: VehicleId, pos: f64, vel: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            status: VehicleStatus::Free,
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The position along the lane in m.
    pub fn pos(&self) -> f64 {
        self.pos
    }

    /// The vehicle's velocity in m/s.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// The event blocking the vehicle, if any.
    pub fn blocked_by(&self) -> Option<EventId> {
        match self.status {
            VehicleStatus::Blocked(id) => Some(id),
            VehicleStatus::Free => None,
        }
    }

    /// Whether the vehicle is blocked by an event.
    pub fn is_blocked(&self) -> bool {
        self.blocked_by().is_some()
    }

    /// Where the vehicle would be after `dt` seconds at its current velocity.
    pub(crate) fn projected_pos(&self, dt: f64) -> f64 {
        self.pos + self.vel * dt
    }

    /// Stops the vehicle behind an event without moving it.
    pub(crate) fn block(&mut self, event: EventId) {
        self.vel = 0.0;
        self.status = VehicleStatus::Blocked(event);
    }

    /// Releases the vehicle from whatever event was blocking it.
    pub(crate) fn release(&mut self) {
        self.status = VehicleStatus::Free;
    }

    /// Moves the vehicle at the given velocity for `dt` seconds.
    pub(crate) fn integrate(&mut self, vel: f64, dt: f64) {
        self.vel = vel;
        self.pos += vel * dt;
    }
}
