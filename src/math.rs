use std::f32::consts::TAU;

use glam::{Mat3, Vec3};
use rand::Rng;

/// Approximation of `1 / sqrt(x)` for strictly positive `x`.
///
/// Uses a bit-level initial guess refined by one Newton iteration. The relative error stays below
/// 0.2% over the whole positive range, which is plenty for the pairwise force computation.
#[inline]
pub fn fast_inverse_sqrt(x: f32) -> f32 {
    let half = 0.5 * x;
    let guess = f32::from_bits(0x5f37_59df - (x.to_bits() >> 1));

    guess * (1.5 - half * guess * guess)
}

/// A half-line in space, used to pick bodies under a cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Normalized direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing its direction.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Returns the squared distance from the origin to the sphere if the ray hits it.
    ///
    /// Spheres behind the origin are only hit if they contain it.
    #[inline]
    pub fn hits_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let difference = center - self.origin;
        let distance_squared = difference.length_squared();
        let radius_squared = radius * radius;

        if distance_squared <= radius_squared {
            return Some(distance_squared);
        }

        let dot = difference.dot(self.direction);

        // `distance² - dot²` is the squared distance between the ray and the center.
        (dot > 0.0 && distance_squared - dot * dot <= radius_squared).then_some(distance_squared)
    }
}

/// Returns a uniformly oriented orbital basis.
///
/// The first column is the radial axis and the second the direction of motion, both unit length and
/// orthogonal.
pub fn random_basis<R: Rng + ?Sized>(rng: &mut R) -> Mat3 {
    let a = rng.gen_range(0.0..TAU);
    let b = rng.gen_range(0.0..TAU);

    Mat3::from_rotation_x(a) * Mat3::from_rotation_y(b)
}
