use crate::error::ConfigError;
use crate::math::Point2d;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The parameters of a triangular fundamental diagram.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlowParams {
    /// The jam density in vehicles/m, at which flow drops to zero.
    pub max_density: f64,
    /// The density of maximum flow in vehicles/m.
    pub peak_density: f64,
    /// The maximum flow in vehicles/s.
    pub peak_flow: f64,
}

impl Default for FlowParams {
    fn default() -> Self {
        // 2 vehicles per 10 m, peak at a third of that, 40 vehicles per minute.
        let max_density = 2.0 / 10.0;
        Self {
            max_density,
            peak_density: max_density / 3.0,
            peak_flow: 40.0 / 60.0,
        }
    }
}

/// A fundamental diagram, mapping density (vehicles/m) to flow (vehicles/s).
///
/// The diagram is triangular: flow rises linearly from zero to `peak_flow`
/// at `peak_density`, then falls linearly back to zero at `max_density`.
/// Negative densities and densities at or beyond `max_density` have no flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowFunction {
    params: FlowParams,
}

impl FlowFunction {
    /// Creates a flow function, verifying that the parameters are ordered
    /// and that the boundary identities hold exactly.
    pub fn new(params: FlowParams) -> Result<Self, ConfigError> {
        let FlowParams {
            max_density,
            peak_density,
            peak_flow,
        } = params;
        let finite = [max_density, peak_density, peak_flow]
            .iter()
            .all(|v| v.is_finite());
        if !finite || peak_density <= 0.0 || peak_density >= max_density || peak_flow <= 0.0 {
            return Err(ConfigError::InvalidFlowParams {
                max_density,
                peak_density,
                peak_flow,
            });
        }

        let flow = Self { params };
        // Holds for every valid triple today; guards later changes to `flow`.
        for (density, expected) in [
            (0.0, 0.0),
            (max_density, 0.0),
            (peak_density, peak_flow),
        ] {
            let actual = flow.flow(density);
            if actual != expected {
                return Err(ConfigError::BoundaryIdentity {
                    density,
                    expected,
                    actual,
                });
            }
        }
        Ok(flow)
    }

    /// The parameters of the diagram.
    pub fn params(&self) -> FlowParams {
        self.params
    }

    /// The jam density in vehicles/m.
    pub fn max_density(&self) -> f64 {
        self.params.max_density
    }

    /// The density of maximum flow in vehicles/m.
    pub fn peak_density(&self) -> f64 {
        self.params.peak_density
    }

    /// The maximum flow in vehicles/s.
    pub fn peak_flow(&self) -> f64 {
        self.params.peak_flow
    }

    /// Computes the flow in vehicles/s for the given density in vehicles/m.
    pub fn flow(&self, density: f64) -> f64 {
        let FlowParams {
            max_density,
            peak_density,
            peak_flow,
        } = self.params;
        if density < 0.0 {
            0.0
        } else if density < peak_density {
            peak_flow * (density / peak_density)
        } else if density < max_density {
            peak_flow * ((max_density - density) / (max_density - peak_density))
        } else {
            0.0
        }
    }

    /// The velocity in m/s of traffic at the given density, `flow / density`.
    ///
    /// Not defined at zero density, where this returns `NaN`;
    /// use [Self::free_flow_speed] for the limiting value.
    pub fn velocity(&self, density: f64) -> f64 {
        self.flow(density) / density
    }

    /// The velocity of traffic as density approaches zero, in m/s.
    pub fn free_flow_speed(&self) -> f64 {
        self.params.peak_flow / self.params.peak_density
    }

    /// Samples `count` evenly spaced points `(density, flow)` over `[0, max_density)`.
    pub fn sample(&self, count: usize) -> Vec<Point2d> {
        let step = self.params.max_density / count as f64;
        (0..count)
            .map(|i| i as f64 * step)
            .map(|density| Point2d::new(density, self.flow(density)))
            .collect()
    }
}

/// The smallest and largest flow among a set of samples, if there are any.
pub fn flow_range(samples: &[Point2d]) -> Option<(f64, f64)> {
    let mut flows = samples.iter().map(|p| p.y);
    let first = flows.next()?;
    Some(flows.fold((first, first), |(min, max), y| (min.min(y), max.max(y))))
}
