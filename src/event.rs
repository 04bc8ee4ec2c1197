use crate::error::ConfigError;
use crate::util::Interval;
use crate::EventId;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A temporary point obstruction on the lane, such as a blockage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    /// The event's ID.
    pub id: EventId,
    /// The position of the obstruction in m.
    pub position: f64,
    /// The time the obstruction appears, in s.
    pub start_time: f64,
    /// The time the obstruction clears, in s.
    pub end_time: f64,
}

impl Event {
    /// Creates a new event, which must start before it ends.
    pub fn new(id: EventId, position: f64, start_time: f64, end_time: f64) -> Result<Self, ConfigError> {
        let event = Self {
            id,
            position,
            start_time,
            end_time,
        };
        event.validate()?;
        Ok(event)
    }

    /// Checks that the event is finite and starts before it ends.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.position.is_finite() && self.start_time.is_finite() && self.end_time.is_finite();
        if finite && self.start_time < self.end_time {
            Ok(())
        } else {
            Err(ConfigError::InvalidEvent { id: self.id })
        }
    }

    /// The time window of the event.
    pub fn window(&self) -> Interval<f64> {
        Interval::new(self.start_time, self.end_time)
    }

    /// Whether the event is in effect at time `t`.
    /// The start and end instants themselves are inactive.
    pub fn is_active(&self, t: f64) -> bool {
        self.window().contains_open(t)
    }
}

/// Checks that every event is valid and that no two share an ID.
pub fn validate_events(events: &[Event]) -> Result<(), ConfigError> {
    let mut ids: HashSet<EventId> = HashSet::new();
    for event in events {
        event.validate()?;
        if !ids.insert(event.id) {
            return Err(ConfigError::DuplicateEventId(event.id));
        }
    }
    Ok(())
}
