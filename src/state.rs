use crate::error::{ConfigError, OrderViolation, StepError};
use crate::event::{validate_events, Event};
use crate::flow::FlowFunction;
use crate::math::Point2d;
use crate::vehicle::Vehicle;
use crate::VehicleId;
use itertools::Itertools;
use smallvec::SmallVec;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The spacing in m assumed ahead of the lead vehicle, which sees free flow.
const FREE_FLOW_SPACING: f64 = 10000.0;

/// A snapshot of the lane at one instant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationState {
    /// The simulation time in s.
    time: f64,
    /// The vehicles, in non-decreasing order of position.
    vehicles: Vec<Vehicle>,
    /// The events, fixed for the whole run.
    events: Vec<Event>,
}

impl SimulationState {
    /// Creates a state at `time`. The vehicle order is not checked here;
    /// [Self::next] rejects a state whose vehicles are out of order.
    pub fn new(time: f64, vehicles: Vec<Vehicle>, events: Vec<Event>) -> Self {
        Self {
            time,
            vehicles,
            events,
        }
    }

    /// The simulation time in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The vehicles, ordered from the rearmost to the lead vehicle.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Gets the vehicle with the given ID.
    pub fn get_vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// The vehicle furthest along the lane.
    pub fn lead_vehicle(&self) -> Option<&Vehicle> {
        self.vehicles.last()
    }

    /// Returns the events in effect at time `t`, in list order.
    pub fn active_events(&self, t: f64) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |event| event.is_active(t))
    }

    /// Checks that no vehicle is ahead of its successor.
    pub fn check_order(&self) -> Result<(), OrderViolation> {
        let found = self
            .vehicles
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (current, next))| next.pos < current.pos);
        match found {
            Some((index, (current, next))) => Err(OrderViolation {
                index,
                current: (current.id, current.pos),
                next: (next.id, next.pos),
            }),
            None => Ok(()),
        }
    }

    /// Computes the state `dt` seconds later.
    ///
    /// Each vehicle is advanced using only this state. A blocked vehicle stays put
    /// while its event is active. A free vehicle which would reach an active event
    /// within `dt` at its current velocity is stopped short of it, blocked by the
    /// first such event in event order. Any other vehicle moves at the velocity
    /// given by the density implied by the gap to the vehicle ahead.
    pub fn next(&self, flow: &FlowFunction, dt: f64) -> Result<SimulationState, StepError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(StepError::InvalidTimeStep(dt));
        }
        if let Err(violation) = self.check_order() {
            log::error!("{}", violation);
            return Err(violation.into());
        }

        let time = self.time + dt;
        let active: SmallVec<[&Event; 4]> = self.active_events(time).collect();
        log::trace!("stepping to t={} with {} active events", time, active.len());

        let vehicles = self
            .vehicles
            .iter()
            .enumerate()
            .map(|(idx, vehicle)| {
                let mut vehicle = *vehicle;

                if let Some(event_id) = vehicle.blocked_by() {
                    if active.iter().any(|event| event.id == event_id) {
                        return vehicle;
                    }
                    log::debug!("t={}: vehicle {} released by event {}", time, vehicle.id, event_id);
                    vehicle.release();
                }

                let blocker = active.iter().find(|event| {
                    vehicle.pos < event.position && vehicle.projected_pos(dt) >= event.position
                });
                if let Some(event) = blocker {
                    log::debug!("t={}: vehicle {} blocked by event {}", time, vehicle.id, event.id);
                    vehicle.block(event.id);
                    return vehicle;
                }

                let spacing = self
                    .vehicles
                    .get(idx + 1)
                    .map_or(FREE_FLOW_SPACING, |next| next.pos - vehicle.pos);
                let density = 1.0 / spacing;
                vehicle.integrate(flow.velocity(density), dt);
                vehicle
            })
            .collect();

        Ok(SimulationState {
            time,
            vehicles,
            events: self.events.clone(),
        })
    }
}

/// Builds the starting state of a run at time zero.
///
/// Vehicle `i` (with ID `i + 1`) starts `spacing * i` metres behind `lead_position`,
/// so the vehicle with ID 1 leads. All vehicles start free at `initial_velocity`.
pub fn initial_state(
    vehicle_count: usize,
    spacing: f64,
    initial_velocity: f64,
    lead_position: f64,
    events: &[Event],
) -> Result<SimulationState, ConfigError> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(ConfigError::InvalidSpacing(spacing));
    }
    let vehicle_count = check_vehicle_count(vehicle_count)?;
    validate_events(events)?;

    let vehicles = (0..vehicle_count)
        .map(|i| {
            let pos = lead_position - spacing * f64::from(i);
            Vehicle::new(VehicleId(i + 1), pos, initial_velocity)
        })
        .rev()
        .collect();

    Ok(SimulationState::new(0.0, vehicles, events.to_vec()))
}

/// Checks that every vehicle can be given a distinct ID starting from 1.
pub(crate) fn check_vehicle_count(vehicle_count: usize) -> Result<u32, ConfigError> {
    u32::try_from(vehicle_count).map_err(|_| ConfigError::TooManyVehicles(vehicle_count))
}

/// The sequence of snapshots produced by a run, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct History {
    states: Vec<SimulationState>,
}

impl History {
    /// Creates a history starting with the given state.
    pub fn new(initial: SimulationState) -> Self {
        Self {
            states: vec![initial],
        }
    }

    /// Appends a snapshot.
    pub fn push(&mut self, state: SimulationState) {
        self.states.push(state);
    }

    pub fn states(&self) -> &[SimulationState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Reconstructs the trajectory of every vehicle as a polyline of
    /// `(time, position)` points, ordered by time.
    pub fn trajectories(&self) -> BTreeMap<VehicleId, Vec<Point2d>> {
        let mut trajectories: BTreeMap<VehicleId, Vec<Point2d>> = BTreeMap::new();
        for state in &self.states {
            for vehicle in &state.vehicles {
                trajectories
                    .entry(vehicle.id)
                    .or_default()
                    .push(Point2d::new(state.time, vehicle.pos));
            }
        }
        trajectories
    }
}
