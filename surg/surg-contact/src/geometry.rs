//! Segment geometry shared by the cutting volume test.

use nalgebra::Point3;

/// Closest point on segment `a`-`b` to an arbitrary point `p`.
///
/// Projects `p` onto the line through `a` and `b` and clamps the projection
/// parameter to `[0, 1]`. A degenerate segment (squared length below
/// `epsilon_sq`) returns `a` directly so no division by zero can occur.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use surg_contact::closest_point_on_segment;
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(2.0, 0.0, 0.0);
/// let p = Point3::new(1.0, 1.0, 0.0);
///
/// let closest = closest_point_on_segment(&a, &b, &p, 1e-6);
/// assert_eq!(closest, Point3::new(1.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn closest_point_on_segment(
    a: &Point3<f64>,
    b: &Point3<f64>,
    p: &Point3<f64>,
    epsilon_sq: f64,
) -> Point3<f64> {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    if length_sq < epsilon_sq {
        return *a;
    }

    let t = ((p - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    a + ab * t
}
