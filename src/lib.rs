pub use cgmath;
pub use error::{ConfigError, Error, OrderViolation, StepError};
pub use event::Event;
pub use flow::{flow_range, FlowFunction, FlowParams};
pub use interface::{closest_segment_above, compute_interfaces, shock_speed, Interface, InterfaceKind};
pub use simulation::{Simulation, SimulationConfig};
pub use state::{initial_state, History, SimulationState};
pub use util::Interval;
pub use vehicle::{Vehicle, VehicleStatus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod error;
mod event;
mod flow;
mod interface;
pub mod math;
mod simulation;
mod state;
mod util;
mod vehicle;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
        pub struct $name(pub u32);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type! {
    /// Unique ID of a [Vehicle], stable for the whole run.
    VehicleId
}

id_type! {
    /// Unique ID of an [Event].
    EventId
}
