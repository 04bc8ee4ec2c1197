//! Density interfaces of the kinematic wave model in time-position space.
//!
//! Points are `(time, position)`: x is time in s and y is position in m,
//! so "above" a point means further along the lane at the same instant.

use crate::event::Event;
use crate::flow::FlowFunction;
use crate::math::{is_finite_point, ray_segment_intersection, segment_point_above, Point2d, Vector2d};
use crate::util::Interval;
use crate::EventId;
use cgmath::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A density low enough to stand in for free-flowing inflow, in vehicles/m.
const INFLOW_DENSITY: f64 = 1.0 / 100000.0;

/// The time span in s covered by each shock front.
const SHOCK_FRONT_LENGTH: f64 = 100.0;

/// What produced an interface.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterfaceKind {
    /// The far-field boundary above which nothing is simulated.
    Empty,
    /// The leading edge of the free-flowing inflow.
    Inflow,
    /// The obstruction itself, held at the event's position.
    Blockage(EventId),
    /// The edge of the queue spreading from an obstruction.
    ///
    /// `speed` is `None` when the densities either side do not define one,
    /// in which case the front has zero length.
    ShockFront { event: EventId, speed: Option<f64> },
}

/// A boundary between two density regimes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interface {
    /// The end points of the boundary, as `(time, position)`.
    pub coords: [Point2d; 2],
    /// The density in vehicles/m on the far side of the boundary, if known.
    pub density_above: Option<f64>,
    /// The density in vehicles/m on the near side of the boundary, if known.
    pub density_below: Option<f64>,
    pub kind: InterfaceKind,
}

/// Finds the interface directly above `point`, along with the point on it.
///
/// Interfaces are extended to infinite lines for this search. Interfaces
/// below the point, or parallel to the vertical (giving a non-finite hit),
/// are skipped. A hit exactly at `point` counts as above. Ties go to the
/// earliest interface.
pub fn closest_segment_above(point: Point2d, interfaces: &[Interface]) -> Option<(&Interface, Point2d)> {
    interfaces
        .iter()
        .map(|interface| (interface, segment_point_above(point, interface.coords)))
        .filter(|(_, above)| is_finite_point(*above))
        .filter(|(_, above)| above.y - point.y >= 0.0)
        .min_by(|(_, a), (_, b)| {
            let da = (*a - point).magnitude();
            let db = (*b - point).magnitude();
            da.total_cmp(&db)
        })
}

/// The speed in m/s of the shock between two densities, by the Rankine-Hugoniot relation.
///
/// `None` if either density is unknown or the two are equal.
pub fn shock_speed(flow: &FlowFunction, upstream: Option<f64>, downstream: Option<f64>) -> Option<f64> {
    let (ku, kd) = (upstream?, downstream?);
    let speed = (flow.flow(ku) - flow.flow(kd)) / (ku - kd);
    speed.is_finite().then_some(speed)
}

/// Derives the boundaries between density regions caused by a free-flowing
/// inflow and a sequence of temporary obstructions.
///
/// # Parameters
/// * `events` - The obstructions, processed in the given order.
/// * `flow` - The fundamental diagram.
/// * `time_bounds` - The time span of the far-field boundary.
/// * `position_bounds` - The far-field boundary lies at `position_bounds.max`.
/// * `upstream_position` - The position of the inflow's leading edge at time zero.
///
/// # Returns
/// The far-field boundary, the inflow boundary, then a blockage and a shock
/// front for each event, in that order. Nothing is clipped to the bounds.
pub fn compute_interfaces(
    events: &[Event],
    flow: &FlowFunction,
    time_bounds: Interval<f64>,
    position_bounds: Interval<f64>,
    upstream_position: f64,
) -> Vec<Interface> {
    let empty = Interface {
        coords: [
            Point2d::new(time_bounds.min, position_bounds.max),
            Point2d::new(time_bounds.max, position_bounds.max),
        ],
        density_above: None,
        density_below: None,
        kind: InterfaceKind::Empty,
    };

    let start = Point2d::new(0.0, upstream_position);
    let velocity = flow.velocity(INFLOW_DENSITY);
    let ray = [start, start + Vector2d::new(1.0, velocity)];
    let inflow = Interface {
        coords: [start, ray_segment_intersection(ray, empty.coords)],
        density_above: None,
        density_below: Some(INFLOW_DENSITY),
        kind: InterfaceKind::Inflow,
    };

    let mut interfaces = Vec::with_capacity(2 + 2 * events.len());
    interfaces.push(empty);
    interfaces.push(inflow);

    for event in events {
        let start = Point2d::new(event.start_time, event.position);
        let end = Point2d::new(event.end_time, event.position);

        let upstream = match closest_segment_above(start, &interfaces) {
            Some((above, _)) => above.density_below,
            None => {
                log::warn!("no interface above event {} at {:?}", event.id, start);
                None
            }
        };
        let jammed = Some(flow.max_density());

        interfaces.push(Interface {
            coords: [start, end],
            density_above: upstream,
            density_below: jammed,
            kind: InterfaceKind::Blockage(event.id),
        });

        let speed = shock_speed(flow, upstream, jammed);
        log::debug!(
            "event {}: upstream density {:?}, jam density {}, shock speed {:?}",
            event.id,
            upstream,
            flow.max_density(),
            speed
        );
        let far_end = match speed {
            Some(speed) => start + Vector2d::new(1.0, speed) * SHOCK_FRONT_LENGTH,
            None => start,
        };
        interfaces.push(Interface {
            coords: [start, far_end],
            density_above: jammed,
            density_below: upstream,
            kind: InterfaceKind::ShockFront {
                event: event.id,
                speed,
            },
        });
    }

    interfaces
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::flow::FlowParams;
    use assert_approx_eq::assert_approx_eq;

    fn horizontal(y: f64, density_below: f64) -> Interface {
        Interface {
            coords: [Point2d::new(0.0, y), Point2d::new(10.0, y)],
            density_above: None,
            density_below: Some(density_below),
            kind: InterfaceKind::Empty,
        }
    }

    #[test]
    fn closest_above_picks_nearest() {
        let interfaces = [horizontal(50.0, 0.1), horizontal(20.0, 0.2), horizontal(-5.0, 0.3)];
        let (interface, point) = closest_segment_above(Point2d::new(3.0, 0.0), &interfaces).unwrap();
        assert_eq!(interface.density_below, Some(0.2));
        assert_approx_eq!(point.x, 3.0, 1e-9);
        assert_approx_eq!(point.y, 20.0, 1e-9);
    }

    #[test]
    fn closest_above_none_when_all_below() {
        let interfaces = [horizontal(-1.0, 0.1), horizontal(-5.0, 0.3)];
        assert!(closest_segment_above(Point2d::new(3.0, 0.0), &interfaces).is_none());
        assert!(closest_segment_above(Point2d::new(3.0, 0.0), &[]).is_none());
    }

    #[test]
    fn closest_above_ties_go_to_first() {
        let interfaces = [horizontal(7.0, 0.1), horizontal(7.0, 0.2)];
        let (interface, _) = closest_segment_above(Point2d::new(3.0, 0.0), &interfaces).unwrap();
        assert_eq!(interface.density_below, Some(0.1));
    }

    #[test]
    fn closest_above_skips_vertical_segments() {
        let vertical = Interface {
            coords: [Point2d::new(3.0, 0.0), Point2d::new(3.0, 10.0)],
            ..horizontal(0.0, 0.5)
        };
        let interfaces = [vertical, horizontal(30.0, 0.1)];
        let (interface, _) = closest_segment_above(Point2d::new(1.0, 0.0), &interfaces).unwrap();
        assert_eq!(interface.density_below, Some(0.1));
    }

    #[test]
    fn shock_speed_relation() {
        let flow = FlowFunction::new(FlowParams::default()).unwrap();
        let speed = shock_speed(&flow, Some(INFLOW_DENSITY), Some(0.2)).unwrap();
        assert_approx_eq!(speed, 1e-4 / (1e-5 - 0.2), 1e-12);
        assert!(speed < 0.0);
        assert_eq!(shock_speed(&flow, None, Some(0.2)), None);
        assert_eq!(shock_speed(&flow, Some(0.2), None), None);
        assert_eq!(shock_speed(&flow, Some(0.2), Some(0.2)), None);
    }

    #[test]
    fn zero_length_front_is_never_above() {
        let front = Interface {
            coords: [Point2d::new(1.0, 5.0), Point2d::new(1.0, 5.0)],
            ..horizontal(0.0, 0.5)
        };
        let interfaces = [front, horizontal(30.0, 0.1)];
        let (interface, _) = closest_segment_above(Point2d::new(0.0, 0.0), &interfaces).unwrap();
        assert_eq!(interface.density_below, Some(0.1));
    }
}
