use crate::error::{ConfigError, Error, StepError};
use crate::event::{validate_events, Event};
use crate::flow::{FlowFunction, FlowParams};
use crate::interface::{compute_interfaces, Interface};
use crate::state::{check_vehicle_count, initial_state, History, SimulationState};
use crate::util::Interval;
use crate::vehicle::Vehicle;
use crate::EventId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The parameters of a simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SimulationConfig {
    /// The fundamental diagram.
    pub flow: FlowParams,
    /// The number of vehicles.
    pub vehicle_count: usize,
    /// The initial gap between consecutive vehicles in m.
    pub spacing: f64,
    /// The initial velocity of every vehicle in m/s.
    pub initial_velocity: f64,
    /// The initial position of the lead vehicle in m.
    pub lead_position: f64,
    /// The obstructions.
    pub events: Vec<Event>,
    /// The time step in s.
    pub dt: f64,
    /// The number of steps in a full run.
    pub num_steps: usize,
    /// The time span analysed for interfaces, in s.
    pub time_bounds: Interval<f64>,
    /// The lane span analysed for interfaces, in m.
    pub position_bounds: Interval<f64>,
    /// Whether to keep every snapshot of the run.
    pub record_history: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            flow: FlowParams::default(),
            vehicle_count: 400,
            spacing: 20.0,
            initial_velocity: 10.0,
            lead_position: 400.01,
            events: vec![Event {
                id: EventId(100000),
                position: 500.0,
                start_time: 10.0,
                end_time: 20.0,
            }],
            dt: 0.5,
            num_steps: 400,
            time_bounds: Interval::new(-100.0, 150.0),
            position_bounds: Interval::new(-100.0, 1000.0),
            record_history: true,
        }
    }
}

impl SimulationConfig {
    /// Checks every parameter, returning the flow function on success.
    pub fn validate(&self) -> Result<FlowFunction, Error> {
        let flow = FlowFunction::new(self.flow)?;
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(StepError::InvalidTimeStep(self.dt).into());
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(ConfigError::InvalidSpacing(self.spacing).into());
        }
        check_vehicle_count(self.vehicle_count)?;
        validate_events(&self.events)?;
        Ok(flow)
    }
}

/// A single-lane traffic simulation.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The fundamental diagram.
    flow: FlowFunction,
    /// The current state.
    state: SimulationState,
    /// Every state so far, if recorded.
    history: Option<History>,
    /// The bounds used for interface analysis.
    time_bounds: Interval<f64>,
    position_bounds: Interval<f64>,
    /// The position of the lead vehicle at the start of the run.
    upstream_position: f64,
    /// The number of steps taken.
    frame: usize,
}

impl Simulation {
    /// Creates a new simulation from a configuration.
    pub fn new(config: &SimulationConfig) -> Result<Self, Error> {
        let flow = config.validate()?;
        let state = initial_state(
            config.vehicle_count,
            config.spacing,
            config.initial_velocity,
            config.lead_position,
            &config.events,
        )?;
        Ok(Self::from_state(flow, state, config))
    }

    /// Creates a simulation starting from an existing state.
    pub fn from_state(flow: FlowFunction, state: SimulationState, config: &SimulationConfig) -> Self {
        let upstream_position = state
            .lead_vehicle()
            .map_or(config.lead_position, |vehicle| vehicle.pos());
        let history = config.record_history.then(|| History::new(state.clone()));
        Self {
            flow,
            state,
            history,
            time_bounds: config.time_bounds,
            position_bounds: config.position_bounds,
            upstream_position,
            frame: 0,
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// On error the simulation is left at the last valid state.
    pub fn step(&mut self, dt: f64) -> Result<(), StepError> {
        let next = self.state.next(&self.flow, dt)?;
        if let Some(history) = &mut self.history {
            history.push(next.clone());
        }
        self.state = next;
        self.frame += 1;
        Ok(())
    }

    /// Takes `steps` steps of `dt` seconds each, stopping at the first error.
    pub fn run(&mut self, steps: usize, dt: f64) -> Result<(), StepError> {
        for _ in 0..steps {
            self.step(dt)?;
        }
        Ok(())
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The current simulation time in s.
    pub fn time(&self) -> f64 {
        self.state.time()
    }

    pub fn flow(&self) -> &FlowFunction {
        &self.flow
    }

    /// The current state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Every state so far, oldest first, if history is being recorded.
    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.state.vehicles().iter()
    }

    /// Computes the density interfaces for this run's events.
    pub fn interfaces(&self) -> Vec<Interface> {
        compute_interfaces(
            self.state.events(),
            &self.flow,
            self.time_bounds,
            self.position_bounds,
            self.upstream_position,
        )
    }
}
