use std::{collections::VecDeque, f32::consts::PI};

use glam::Vec3;

/// Radius of a body of the given mass, assuming unit density.
///
/// `radius = cbrt(3 * mass / (4 * π))`, or zero if the mass is zero or negative.
///
/// ```
/// # use planets::body::radius_of;
/// let volume = 4.0 / 3.0 * std::f32::consts::PI * radius_of(100.0).powi(3);
///
/// assert!((volume - 100.0).abs() < 1e-3);
/// assert_eq!(radius_of(-1.0), 0.0);
/// ```
#[inline]
pub fn radius_of(mass: f32) -> f32 {
    if mass <= 0.0 {
        0.0
    } else {
        (3.0 * mass / (4.0 * PI)).cbrt()
    }
}

/// A point-mass simulated by a [`Universe`](crate::universe::Universe).
///
/// The [radius](Body::radius) is derived from the [mass](Body::mass) and kept up to date by
/// [`set_mass`](Body::set_mass). A body with a mass of zero or less is removed on the next
/// integration step.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Position in space.
    pub position: Vec3,
    /// Velocity in simulated units, see [`VELOCITY_FACTOR`](crate::config::VELOCITY_FACTOR).
    pub velocity: Vec3,
    mass: f32,
    radius: f32,
    trail: VecDeque<Vec3>,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, 100.0)
    }
}

impl Body {
    /// Creates a new body with an empty trail.
    pub fn new(position: Vec3, velocity: Vec3, mass: f32) -> Self {
        Self {
            position,
            velocity,
            mass,
            radius: radius_of(mass),
            trail: VecDeque::new(),
        }
    }

    /// Mass of the body.
    #[inline]
    pub const fn mass(&self) -> f32 {
        self.mass
    }

    /// Radius of the body, derived from its mass.
    #[inline]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Sets the mass of the body and updates its radius.
    #[inline]
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.radius = radius_of(mass);
    }

    /// Momentum of the body.
    #[inline]
    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }

    /// Recorded past positions, oldest first. The last point follows the body.
    #[inline]
    pub fn trail(&self) -> &VecDeque<Vec3> {
        &self.trail
    }

    /// Forgets every recorded position.
    #[inline]
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Records the current position in the trail.
    ///
    /// The last point of the trail always follows the body. Once the body is farther than
    /// `min_spacing` (a squared distance) from the point before it, that last point is kept and a
    /// new one starts following. At most `max_length` points are kept, dropping the oldest ones.
    pub fn update_trail(&mut self, max_length: usize, min_spacing: f32) {
        let len = self.trail.len();

        if len < 2 || self.trail[len - 2].distance_squared(self.position) > min_spacing {
            self.trail.push_back(self.position);
        } else if let Some(last) = self.trail.back_mut() {
            *last = self.position;
        }

        if self.trail.len() > max_length {
            let excess = self.trail.len() - max_length;
            self.trail.drain(..excess);
        }
    }

    /// Absorbs another body, conserving mass and momentum.
    ///
    /// The merged body sits at the center of mass of both, moves at their mass-weighted velocity
    /// and loses its trail.
    pub fn absorb(&mut self, other: &Body) {
        let mass = self.mass + other.mass;

        self.position = (self.position * self.mass + other.position * other.mass) / mass;
        self.velocity = (self.momentum() + other.momentum()) / mass;
        self.set_mass(mass);
        self.trail.clear();
    }
}
