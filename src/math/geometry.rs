use super::{Point2d, Vector2d};

/// The z component of the cross product of two 2D vectors.
pub fn cross(a: Vector2d, b: Vector2d) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Intersects a ray with the line through a segment.
///
/// # Parameters
/// * `ray` - A ray starting at `ray[0]` and pointing through `ray[1]`.
/// * `segment` - The two end points of the segment.
///
/// # Returns
/// The point `p + t * r` where the ray's line meets the segment's line.
/// The segment's extents are not checked, and neither is the sign of `t`.
/// Parallel or collinear inputs divide by zero, producing a non-finite point.
pub fn ray_segment_intersection(ray: [Point2d; 2], segment: [Point2d; 2]) -> Point2d {
    let p = ray[0];
    let r = ray[1] - ray[0];
    let q = segment[0];
    let s = segment[1] - segment[0];
    let t = cross(q - p, s) / cross(r, s);
    p + r * t
}

/// Finds the point on the segment's line directly above `point`,
/// where "up" is the positive y axis.
pub fn segment_point_above(point: Point2d, segment: [Point2d; 2]) -> Point2d {
    let ray = [point, point + Vector2d::unit_y()];
    ray_segment_intersection(ray, segment)
}

/// Returns true if both coordinates of the point are finite.
pub fn is_finite_point(point: Point2d) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn cross_product() {
        assert_eq!(cross(Vector2d::unit_x(), Vector2d::unit_y()), 1.0);
        assert_eq!(cross(Vector2d::unit_y(), Vector2d::unit_x()), -1.0);
        assert_eq!(cross(Vector2d::new(2.0, 4.0), Vector2d::new(1.0, 2.0)), 0.0);
    }

    #[test]
    fn ray_meets_horizontal_segment() {
        let ray = [Point2d::new(0.0, 400.0), Point2d::new(1.0, 410.0)];
        let segment = [Point2d::new(-100.0, 1000.0), Point2d::new(150.0, 1000.0)];
        let hit = ray_segment_intersection(ray, segment);
        assert_approx_eq!(hit.x, 60.0, 1e-9);
        assert_approx_eq!(hit.y, 1000.0, 1e-9);
    }

    #[test]
    fn segment_is_treated_as_a_line() {
        // The hit lies beyond the segment's end points.
        let segment = [Point2d::new(0.0, 0.0), Point2d::new(1.0, 1.0)];
        let above = segment_point_above(Point2d::new(5.0, -3.0), segment);
        assert_approx_eq!(above.x, 5.0, 1e-9);
        assert_approx_eq!(above.y, 5.0, 1e-9);
    }

    #[test]
    fn point_above_can_be_below() {
        let segment = [Point2d::new(0.0, 2.0), Point2d::new(10.0, 2.0)];
        let above = segment_point_above(Point2d::new(3.0, 5.0), segment);
        assert_approx_eq!(above.y, 2.0, 1e-9);
    }

    #[test]
    fn parallel_inputs_are_not_finite() {
        let ray = [Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0)];
        let segment = [Point2d::new(0.0, 1.0), Point2d::new(5.0, 1.0)];
        assert!(!is_finite_point(ray_segment_intersection(ray, segment)));

        // Collinear: 0 / 0.
        let segment = [Point2d::new(2.0, 0.0), Point2d::new(5.0, 0.0)];
        let hit = ray_segment_intersection(ray, segment);
        assert!(hit.x.is_nan());

        // A vertical segment is parallel to the upward ray.
        let vertical = [Point2d::new(1.0, 0.0), Point2d::new(1.0, 4.0)];
        assert!(!is_finite_point(segment_point_above(Point2d::new(3.0, 0.0), vertical)));
    }
}
