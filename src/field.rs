//! The Leipnik–Newton vector field.
//!
//! ```text
//! dx = -alpha*x + y + 10*y*z
//! dy = -x - 0.4*y + 5*x*z
//! dz =  beta*z - 5*x*y
//! ```
//!
//! The field is a pure function of the state and the two parameters. It does
//! no guarding of its own: NaN or infinite inputs propagate to the output.
//! Keeping states finite is the job of the [`integrator`](crate::integrator).

use glam::DVec3;

/// Evaluate the field at `(x, y, z)`.
///
/// # Example
///
/// ```
/// use leipnik::field::deriv;
///
/// let (dx, dy, dz) = deriv(1.0, 0.0, 0.0, 0.5, 0.5);
/// assert_eq!((dx, dy, dz), (-0.5, -1.0, 0.0));
/// ```
#[inline]
pub fn deriv(x: f64, y: f64, z: f64, alpha: f64, beta: f64) -> (f64, f64, f64) {
    let dx = -alpha * x + y + 10.0 * y * z;
    let dy = -x - 0.4 * y + 5.0 * x * z;
    let dz = beta * z - 5.0 * x * y;
    (dx, dy, dz)
}

/// Vector form of [`deriv`].
#[inline]
pub fn deriv_vec(p: DVec3, alpha: f64, beta: f64) -> DVec3 {
    let (dx, dy, dz) = deriv(p.x, p.y, p.z, alpha, beta);
    DVec3::new(dx, dy, dz)
}
