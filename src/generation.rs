use glam::{Mat3, Vec3};
use rand::Rng;

use crate::{
    body::Body,
    error::{Error, Result},
    key::Key,
    math::random_basis,
    universe::Universe,
};

/// Bounds of the radius of random orbits, relative to the radius of the orbited body.
const ORBIT_RADIUS_RANGE: (f32, f32) = (1.5, 80.0);

/// Upper bound of the mass of random orbiting bodies, relative to the mass of the orbited body.
const ORBIT_MASS_RATIO: f32 = 0.2;

impl Universe {
    /// Adds `count` bodies with uniformly distributed positions, velocities and masses, and
    /// returns their keys.
    ///
    /// Positions are drawn in `[-position_range, position_range]³`, velocities in
    /// `[-max_velocity, max_velocity]³` and masses in `[min_mass, max_mass]`.
    ///
    /// ```
    /// # use planets::prelude::*;
    /// let mut universe = Universe::with_seed(0);
    /// let keys = universe.generate_random(10, 100.0, 1.0e-5, 1000.0);
    ///
    /// assert_eq!(universe.len(), 10);
    /// assert!(keys.iter().all(|key| universe[*key].mass() <= 1000.0));
    /// ```
    pub fn generate_random(
        &mut self,
        count: usize,
        position_range: f32,
        max_velocity: f32,
        max_mass: f32,
    ) -> Vec<Key> {
        let position_range = position_range.abs();
        let max_velocity = max_velocity.abs();
        let min_mass = self.config.min_mass;
        let max_mass = max_mass.max(min_mass);

        (0..count)
            .map(|_| {
                let rng = &mut self.rng;
                let mut vector = |range: f32| {
                    Vec3::new(
                        rng.gen_range(-range..=range),
                        rng.gen_range(-range..=range),
                        rng.gen_range(-range..=range),
                    )
                };

                let position = vector(position_range);
                let velocity = vector(max_velocity);
                let mass = rng.gen_range(min_mass..=max_mass);

                self.add(Body::new(position, velocity, mass))
            })
            .collect()
    }

    /// Adds a body of the given mass orbiting the body `around` at the given radius, and returns
    /// its key.
    ///
    /// The new body is placed along the first column of `basis` and moves along its second column
    /// at circular orbit speed, `sqrt(G·M² / ((M + m)·r))`, relative to the orbited body. The
    /// orbited body recoils to conserve momentum. Other bodies are not taken into account.
    ///
    /// ```
    /// # use planets::prelude::*;
    /// # use glam::{Mat3, Vec3};
    /// let mut universe = Universe::with_seed(0);
    ///
    /// let sun = universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0e9));
    /// let planet = universe.add_orbital(sun, 100.0, 10.0, Mat3::IDENTITY)?;
    ///
    /// assert_eq!(universe[planet].position, Vec3::new(100.0, 0.0, 0.0));
    /// assert!(universe[planet].velocity.y > 0.0);
    /// # Ok::<(), planets::Error>(())
    /// ```
    pub fn add_orbital(&mut self, around: Key, radius: f32, mass: f32, basis: Mat3) -> Result<Key> {
        if !(radius > 0.0) {
            return Err(Error::InvalidOrbit { radius });
        }

        let gravity_constant = self.config.gravity_constant;
        let target = self.get_mut(around).ok_or(Error::InvalidKey(around))?;
        let target_mass = target.mass();

        let speed = (gravity_constant * target_mass * target_mass
            / ((target_mass + mass) * radius))
            .sqrt();
        let velocity = basis.y_axis * speed;

        let body = Body::new(
            target.position + basis.x_axis * radius,
            target.velocity + velocity,
            mass,
        );

        if target_mass > 0.0 {
            target.velocity -= velocity * (mass / target_mass);
        }

        Ok(self.add(body))
    }

    /// Adds `count` bodies on random orbits around `target`, and returns their keys.
    ///
    /// If `target` is `None` or names a body that no longer exists, a random body is orbited
    /// instead. Each orbit gets its own random plane, a radius between 1.5 and 80 times the radius
    /// of the orbited body and a mass between the minimum mass and a fifth of the orbited mass.
    pub fn generate_random_orbital(&mut self, count: usize, target: Option<Key>) -> Result<Vec<Key>> {
        let target = match target.filter(|key| self.is_valid(*key)) {
            Some(key) => key,
            None => self.random_planet().ok_or(Error::EmptyUniverse)?,
        };

        let min_mass = self.config.min_mass;
        let (min_radius, max_radius) = ORBIT_RADIUS_RANGE;
        let (target_radius, target_mass) = (self[target].radius(), self[target].mass());

        let mut keys = Vec::with_capacity(count);
        for _ in 0..count {
            let basis = random_basis(&mut self.rng);
            let radius = self
                .rng
                .gen_range(min_radius * target_radius..=max_radius * target_radius);
            let mass = self
                .rng
                .gen_range(min_mass..=(ORBIT_MASS_RATIO * target_mass).max(min_mass));

            keys.push(self.add_orbital(target, radius, mass, basis)?);
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1E-5;

    #[test]
    fn generate_random_respects_bounds() {
        let mut universe = Universe::with_seed(2);
        let keys = universe.generate_random(100, 50.0, 2.0, 500.0);

        assert_eq!(keys.len(), 100);
        assert_eq!(universe.len(), 100);

        for (_, body) in universe.iter() {
            assert!(body.position.abs().max_element() <= 50.0);
            assert!(body.velocity.abs().max_element() <= 2.0);
            assert!((1.0..=500.0).contains(&body.mass()));
        }
    }

    #[test]
    fn generate_random_is_reproducible() {
        let mut universe1 = Universe::with_seed(17);
        let mut universe2 = Universe::with_seed(17);

        universe1.generate_random(25, 1000.0, 1.0, 1000.0);
        universe2.generate_random(25, 1000.0, 1.0, 1000.0);

        assert!(universe1.iter().eq(universe2.iter()));

        universe1.reseed(3);
        universe2.reseed(3);
        assert_eq!(universe1.random_planet(), universe2.random_planet());
    }

    #[test]
    fn add_orbital_is_circular_and_conserves_momentum() {
        let mut universe = Universe::with_seed(0);

        let sun_velocity = Vec3::new(0.0, 0.0, 1.0e-3);
        let sun = universe.add(Body::new(Vec3::ONE, sun_velocity, 1.0e6));
        let momentum = universe[sun].momentum();

        let basis = Mat3::from_cols(Vec3::Y, Vec3::NEG_X, Vec3::Z);
        let planet = universe.add_orbital(sun, 50.0, 1.0e3, basis).unwrap();

        let (sun_body, planet_body) = (&universe[sun], &universe[planet]);
        let g = universe.config().gravity_constant;
        let speed = (g * 1.0e12 / (1.001e6 * 50.0)).sqrt();

        assert!(planet_body
            .position
            .abs_diff_eq(Vec3::new(1.0, 51.0, 1.0), EPSILON));

        let relative = planet_body.velocity - sun_velocity;
        assert!(relative.abs_diff_eq(Vec3::new(-speed, 0.0, 0.0), EPSILON));

        let total = sun_body.momentum() + planet_body.momentum();
        let expected = momentum + planet_body.mass() * sun_velocity;
        assert!(total.abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn add_orbital_rejects_bad_input() {
        let mut universe = Universe::with_seed(0);
        let sun = universe.add(Body::default());

        assert!(matches!(
            universe.add_orbital(sun, 0.0, 1.0, Mat3::IDENTITY),
            Err(Error::InvalidOrbit { .. })
        ));

        universe.remove(sun);
        assert!(matches!(
            universe.add_orbital(sun, 10.0, 1.0, Mat3::IDENTITY),
            Err(Error::InvalidKey(key)) if key == sun
        ));
    }

    #[test]
    fn generate_random_orbital_around_target() {
        let mut universe = Universe::with_seed(8);
        let sun = universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0e6));
        let radius = universe[sun].radius();

        let keys = universe.generate_random_orbital(20, Some(sun)).unwrap();
        assert_eq!(keys.len(), 20);
        assert_eq!(universe.len(), 21);

        for key in keys {
            let body = &universe[key];
            let distance = body.position.distance(universe[sun].position);

            assert!(distance >= 1.4 * radius && distance <= 81.0 * radius);
            assert!(body.mass() >= 1.0 && body.mass() <= 0.2e6);
        }
    }

    #[test]
    fn generate_random_orbital_picks_random_target() {
        let mut universe = Universe::with_seed(4);

        assert!(matches!(
            universe.generate_random_orbital(3, None),
            Err(Error::EmptyUniverse)
        ));

        let sun = universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0e6));
        let stale = universe.add(Body::default());
        universe.remove(stale);

        let keys = universe.generate_random_orbital(3, Some(stale)).unwrap();
        assert_eq!(keys.len(), 3);
        assert!(universe.is_valid(sun));
        assert_eq!(universe.len(), 4);
    }
}
