//! Error types.

use crate::{EventId, VehicleId};
use thiserror::Error;

/// An invalid model configuration. The offending value must not be used.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The flow parameters do not satisfy `0 < peak_density < max_density`
    /// and `peak_flow > 0`, or one of them is not finite.
    #[error("invalid flow parameters: max density {max_density}, peak density {peak_density}, peak flow {peak_flow}")]
    InvalidFlowParams {
        max_density: f64,
        peak_density: f64,
        peak_flow: f64,
    },
    /// The fundamental diagram failed one of its boundary identities.
    #[error("flow at density {density} should be {expected}, instead got {actual}")]
    BoundaryIdentity {
        density: f64,
        expected: f64,
        actual: f64,
    },
    /// An event whose window is empty or not finite.
    #[error("event {id} must start before it ends")]
    InvalidEvent { id: EventId },
    /// Two events share the same ID.
    #[error("duplicate event id {0}")]
    DuplicateEventId(EventId),
    /// The initial vehicle spacing is not a positive finite number.
    #[error("vehicle spacing must be positive, got {0}")]
    InvalidSpacing(f64),
    /// More vehicles than there are vehicle IDs.
    #[error("too many vehicles: {0}")]
    TooManyVehicles(usize),
}

/// A vehicle found ahead of its successor in the ordered sequence.
/// This is a modelling bug: it is reported, never repaired.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error(
    "order invariant failed at index {index}: vehicle {} at {} is ahead of vehicle {} at {}",
    .current.0, .current.1, .next.0, .next.1
)]
pub struct OrderViolation {
    /// The index of `current` in the vehicle sequence.
    pub index: usize,
    /// The ID and position of the vehicle at `index`.
    pub current: (VehicleId, f64),
    /// The ID and position of the vehicle at `index + 1`.
    pub next: (VehicleId, f64),
}

/// The ways a single simulation step can fail.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum StepError {
    /// The time step was not a positive finite number.
    #[error("time step must be positive, got {0}")]
    InvalidTimeStep(f64),
    /// The incoming state broke the ordering invariant.
    #[error(transparent)]
    Order(#[from] OrderViolation),
}

/// Any error raised by the crate.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("simulation error: {0}")]
    Step(#[from] StepError),
}
