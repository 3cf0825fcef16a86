//! Deterministic direction sampling over the sphere.

use geom_types::Vector3;

/// Generate a near-uniform direction bundle via the Fibonacci spiral.
///
/// The i-th of `count` directions has polar angle
/// `acos(1 - 2(i + 0.5) / count)` from +Z and azimuth `pi (1 + sqrt 5) i`.
/// Directions are then clamped to the field of view: `up_fov` and
/// `down_fov` are the permitted elevations above and below the horizon
/// in degrees, and out-of-range directions are discarded, so the
/// returned bundle may be smaller than `count`.
///
/// The sequence is deterministic: the same inputs always produce the
/// same bundle.
///
/// # Example
///
/// ```
/// use view_analysis::fibonacci_directions;
///
/// // The full sphere keeps every direction
/// let full = fibonacci_directions(100, 90.0, 90.0);
/// assert_eq!(full.len(), 100);
///
/// // A tight horizontal band keeps only a fraction
/// let band = fibonacci_directions(100, 10.0, 10.0);
/// assert!(band.len() < 30);
/// for dir in &band {
///     assert!(dir.z.abs() < 0.18); // sin(10 degrees)
/// }
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
// Precision: ray counts are far below f64's integer range
pub fn fibonacci_directions(count: usize, up_fov: f32, down_fov: f32) -> Vec<Vector3<f32>> {
    // The golden-angle accumulates large azimuths; stay in f64 until the
    // final components so high ray counts keep their distribution
    let golden = std::f64::consts::PI * (1.0 + 5.0_f64.sqrt());
    let n = count as f64;

    let up_limit = f64::from(up_fov).to_radians().sin();
    let down_limit = -f64::from(down_fov).to_radians().sin();

    let mut directions = Vec::with_capacity(count);
    for i in 0..count {
        let z = 1.0 - 2.0 * (i as f64 + 0.5) / n;
        if z > up_limit + 1e-12 || z < down_limit - 1e-12 {
            continue;
        }
        let ring = (1.0 - z * z).max(0.0).sqrt();
        let azimuth = golden * i as f64;
        directions.push(Vector3::new(
            (ring * azimuth.cos()) as f32,
            (ring * azimuth.sin()) as f32,
            z as f32,
        ));
    }
    directions
}
