use std::{
    collections::BTreeMap,
    ops::{Bound, Index},
};

use glam::Vec3;
use rand::{rngs::StdRng, seq::IteratorRandom, Rng, SeedableRng};

use crate::{body::Body, config::Config, key::Key, math::Ray};

/// What a camera following the universe looks at, see [`Universe::follow_position`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FollowMode {
    /// Nothing is followed.
    #[default]
    None,
    /// The body named by [`Universe::following`].
    Single,
    /// The mean position of all bodies.
    PlainAverage,
    /// The center of mass of all bodies.
    WeightedAverage,
}

/// The collection of [bodies](Body) simulated together.
///
/// Bodies are named by a [`Key`] assigned when they are added and iterated in key order. The
/// [selected](Universe::selected) and [followed](Universe::following) keys are weak references:
/// they may name a body that no longer exists and must be checked before use.
///
/// ```
/// # use planets::prelude::*;
/// # use glam::Vec3;
/// let mut universe = Universe::with_seed(0);
///
/// let sun = universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0e6));
/// universe.set_selected(Some(sun));
///
/// universe.remove(sun);
/// assert!(!universe.is_selected_valid());
/// ```
#[derive(Clone, Debug)]
pub struct Universe {
    pub(crate) bodies: BTreeMap<Key, Body>,
    pub(crate) selected: Option<Key>,
    pub(crate) following: Option<Key>,
    pub(crate) config: Config,
    pub(crate) rng: StdRng,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    /// Creates an empty universe with the default [`Config`] and a randomly seeded generator.
    pub fn new() -> Self {
        Self::with_rng(Config::default(), StdRng::from_entropy())
    }

    /// Creates an empty universe with the default [`Config`] whose random operations are
    /// reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(Config::default(), seed)
    }

    /// Creates an empty universe with the given [`Config`] and seed.
    pub fn with_config(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: StdRng) -> Self {
        Self {
            bodies: BTreeMap::new(),
            selected: None,
            following: None,
            config,
            rng,
        }
    }

    /// Restarts the random generator from the given seed.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Returns a reference to the parameters of the universe.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the parameters of the universe.
    #[inline]
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }
}

impl Universe {
    /// Adds a body and returns its newly assigned key.
    pub fn add(&mut self, body: Body) -> Key {
        let key = self.unused_key();
        self.bodies.insert(key, body);
        key
    }

    /// Adds a body under the given key if it is free, otherwise under a new one.
    ///
    /// Returns the key the body was added under. An existing body is never replaced.
    pub fn add_with_hint(&mut self, body: Body, hint: Key) -> Key {
        let key = if self.bodies.contains_key(&hint) {
            log::debug!("Key {hint} is taken, assigning a new one");
            self.unused_key()
        } else {
            hint
        };

        self.bodies.insert(key, body);
        key
    }

    fn unused_key(&mut self) -> Key {
        loop {
            let raw = self.rng.gen_range(Key::MIN_RAW..=Key::MAX_RAW);

            if let Some(key) = Key::from_raw(raw).filter(|key| !self.bodies.contains_key(key)) {
                return key;
            }
        }
    }

    /// Removes the body with the given key and returns it, if it exists.
    #[inline]
    pub fn remove(&mut self, key: Key) -> Option<Body> {
        self.bodies.remove(&key)
    }

    /// Removes the selected body, if valid, and clears the selection.
    pub fn delete_selected(&mut self) -> Option<Body> {
        self.selected.take().and_then(|key| self.bodies.remove(&key))
    }

    /// Removes every body and clears the selected and followed keys.
    ///
    /// The [`Config`] is left untouched.
    pub fn delete_all(&mut self) {
        self.bodies.clear();
        self.selected = None;
        self.following = None;
    }

    /// Removes the bodies that drifted too far from the center of mass and returns how many were
    /// removed.
    ///
    /// A body is an escapee if its squared distance from the center of mass exceeds
    /// [`Config::escape_distance_squared`].
    pub fn delete_escapees(&mut self) -> usize {
        let Some((center, _)) = self.center_of_mass() else {
            return 0;
        };

        let limit = self.config.escape_distance_squared;
        let len = self.bodies.len();

        self.bodies
            .retain(|_, body| body.position.distance_squared(center) <= limit);

        let removed = len - self.bodies.len();
        if removed > 0 {
            log::debug!("Deleted {removed} escapees");
        }

        removed
    }

    /// Shifts every body into the center-of-momentum frame and clears their trails.
    ///
    /// Does nothing if the universe is already centered.
    pub fn center_all(&mut self) {
        let Some((position, velocity)) = self.center_of_mass() else {
            return;
        };

        if position.abs_diff_eq(Vec3::ZERO, f32::EPSILON)
            && velocity.abs_diff_eq(Vec3::ZERO, f32::EPSILON)
        {
            return;
        }

        for body in self.bodies.values_mut() {
            body.position -= position;
            body.velocity -= velocity;
            body.clear_trail();
        }
    }
}

impl Universe {
    /// Returns true if the universe holds no body.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Returns the number of bodies in the universe.
    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the key names a body of the universe.
    #[inline]
    pub fn is_valid(&self, key: Key) -> bool {
        self.bodies.contains_key(&key)
    }

    /// Returns a reference to the body with the given key.
    #[inline]
    pub fn get(&self, key: Key) -> Option<&Body> {
        self.bodies.get(&key)
    }

    /// Returns a mutable reference to the body with the given key.
    #[inline]
    pub fn get_mut(&mut self, key: Key) -> Option<&mut Body> {
        self.bodies.get_mut(&key)
    }

    /// Iterates over the keys and bodies, in key order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Key, &Body)> + ExactSizeIterator {
        self.bodies.iter().map(|(key, body)| (*key, body))
    }

    /// Mutably iterates over the keys and bodies, in key order.
    #[inline]
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = (Key, &mut Body)> + ExactSizeIterator {
        self.bodies.iter_mut().map(|(key, body)| (*key, body))
    }

    /// Iterates over the keys, in order.
    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = Key> + ExactSizeIterator + '_ {
        self.bodies.keys().copied()
    }

    /// Returns the key of a uniformly chosen body, or `None` if the universe is empty.
    pub fn random_planet(&mut self) -> Option<Key> {
        self.bodies.keys().copied().choose(&mut self.rng)
    }

    /// Returns the mass-weighted average position and velocity, or `None` if the universe has no
    /// mass.
    pub fn center_of_mass(&self) -> Option<(Vec3, Vec3)> {
        let (position, momentum, mass) = self.bodies.values().fold(
            (Vec3::ZERO, Vec3::ZERO, 0.0),
            |(position, momentum, mass), body| {
                (
                    position + body.position * body.mass(),
                    momentum + body.momentum(),
                    mass + body.mass(),
                )
            },
        );

        (mass > 0.0).then(|| (position / mass, momentum / mass))
    }

    /// Returns the kinetic plus gravitational potential energy of the universe.
    pub fn total_energy(&self) -> f64 {
        let g = f64::from(self.config.gravity_constant);
        let bodies: Vec<_> = self.bodies.values().collect();

        let mut energy = 0.0;
        for (i, body1) in bodies.iter().enumerate() {
            let mass1 = f64::from(body1.mass());
            energy += 0.5 * mass1 * f64::from(body1.velocity.length_squared());

            for body2 in &bodies[i + 1..] {
                let distance = f64::from(body1.position.distance(body2.position));

                if distance > 0.0 {
                    energy -= g * mass1 * f64::from(body2.mass()) / distance;
                }
            }
        }

        energy
    }
}

impl Index<Key> for Universe {
    type Output = Body;

    /// Returns a reference to the body with the given key.
    ///
    /// # Panics
    ///
    /// Panics if the key does not name a body of the universe.
    #[inline]
    fn index(&self, key: Key) -> &Body {
        match self.bodies.get(&key) {
            Some(body) => body,
            None => panic!("no body with key {key}"),
        }
    }
}

impl Universe {
    /// The selected key, which may name a body that no longer exists.
    #[inline]
    pub const fn selected(&self) -> Option<Key> {
        self.selected
    }

    /// Sets the selected key.
    #[inline]
    pub fn set_selected(&mut self, key: Option<Key>) {
        self.selected = key;
    }

    /// Clears the selection.
    #[inline]
    pub fn reset_selected(&mut self) {
        self.selected = None;
    }

    /// Returns true if the selected key names a body of the universe.
    #[inline]
    pub fn is_selected_valid(&self) -> bool {
        self.selected.is_some_and(|key| self.is_valid(key))
    }

    /// Returns a reference to the selected body, if valid.
    #[inline]
    pub fn selected_body(&self) -> Option<&Body> {
        self.selected.and_then(|key| self.bodies.get(&key))
    }

    /// Returns a mutable reference to the selected body, if valid.
    #[inline]
    pub fn selected_body_mut(&mut self) -> Option<&mut Body> {
        self.selected.and_then(|key| self.bodies.get_mut(&key))
    }

    /// Selects the nearest body whose sphere, scaled by `scale`, is hit by the ray.
    ///
    /// The selection is cleared if no body is hit. Returns the new selection.
    pub fn select_under(&mut self, ray: &Ray, scale: f32) -> Option<Key> {
        self.selected = self
            .iter()
            .filter_map(|(key, body)| {
                ray.hits_sphere(body.position, body.radius() * scale)
                    .map(|distance| (key, distance))
            })
            .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
            .map(|(key, _)| key);

        self.selected
    }

    /// The followed key, which may name a body that no longer exists.
    #[inline]
    pub const fn following(&self) -> Option<Key> {
        self.following
    }

    /// Sets the followed key.
    #[inline]
    pub fn set_following(&mut self, key: Option<Key>) {
        self.following = key;
    }

    /// Returns true if the followed key names a body of the universe.
    #[inline]
    pub fn is_following_valid(&self) -> bool {
        self.following.is_some_and(|key| self.is_valid(key))
    }

    /// Stops following.
    #[inline]
    pub fn clear_follow(&mut self) {
        self.following = None;
    }

    /// Follows the selected body if the selection is valid. Returns the followed key.
    pub fn follow_selection(&mut self) -> Option<Key> {
        if self.is_selected_valid() {
            self.following = self.selected;
        }

        self.following
    }

    /// Follows the body after the followed one in key order, wrapping around.
    ///
    /// Follows the first body if nothing was followed. Returns the followed key.
    pub fn follow_next(&mut self) -> Option<Key> {
        let next = match self.following {
            Some(key) => self
                .bodies
                .range((Bound::Excluded(key), Bound::Unbounded))
                .next(),
            None => None,
        };

        self.following = next
            .or_else(|| self.bodies.iter().next())
            .map(|(key, _)| *key);

        self.following
    }

    /// Follows the body before the followed one in key order, wrapping around.
    ///
    /// Follows the last body if nothing was followed. Returns the followed key.
    pub fn follow_previous(&mut self) -> Option<Key> {
        let previous = match self.following {
            Some(key) => self.bodies.range(..key).next_back(),
            None => None,
        };

        self.following = previous
            .or_else(|| self.bodies.iter().next_back())
            .map(|(key, _)| *key);

        self.following
    }

    /// Returns the point a camera following the universe in the given mode should look at.
    ///
    /// Returns `None` if the universe is empty or the followed body no longer exists.
    pub fn follow_position(&self, mode: FollowMode) -> Option<Vec3> {
        match mode {
            FollowMode::None => None,
            FollowMode::Single => self
                .following
                .and_then(|key| self.bodies.get(&key))
                .map(|body| body.position),
            FollowMode::PlainAverage => (!self.is_empty()).then(|| {
                self.bodies
                    .values()
                    .map(|body| body.position)
                    .sum::<Vec3>()
                    / self.len() as f32
            }),
            FollowMode::WeightedAverage => self.center_of_mass().map(|(position, _)| position),
        }
    }
}
