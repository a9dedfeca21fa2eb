use std::mem;

use crate::{body::Body, key::Key, math::fast_inverse_sqrt, universe::Universe};

/// A body taken out of the universe for the duration of a frame.
struct Slot {
    key: Key,
    body: Body,
    absorbed: bool,
}

/// Parameters of a single sub-step.
#[derive(Clone, Copy)]
struct Step {
    time: f32,
    gravity_constant: f32,
    trail_max_length: usize,
    trail_min_spacing: f32,
}

impl Universe {
    /// Advances the simulation by one frame.
    ///
    /// The frame time is scaled by [`simulation_speed`](crate::config::Config::simulation_speed)
    /// and split into [`steps_per_frame`](crate::config::Config::steps_per_frame) equal sub-steps.
    /// Each sub-step drops bodies without mass, merges overlapping bodies, applies gravity between
    /// every pair and finally moves the bodies and records their trails.
    ///
    /// A paused frame runs a single sub-step without any elapsed time, so merges and trails are
    /// still kept up to date.
    ///
    /// ```
    /// # use planets::prelude::*;
    /// # use glam::Vec3;
    /// let mut universe = Universe::with_seed(0);
    ///
    /// universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 100.0));
    /// universe.add(Body::new(Vec3::X, Vec3::ZERO, 100.0));
    ///
    /// // Both bodies overlap and merge.
    /// universe.advance(1.0);
    /// assert_eq!(universe.len(), 1);
    /// ```
    pub fn advance(&mut self, frame_time: f32) {
        if self.bodies.is_empty() {
            return;
        }

        let (steps, time) = if self.config.is_paused() || frame_time <= 0.0 {
            (1, 0.0)
        } else {
            let steps = self.config.steps_per_frame.max(1);
            (steps, frame_time * self.config.simulation_speed / steps as f32)
        };

        let step = Step {
            time,
            gravity_constant: self.config.gravity_constant,
            trail_max_length: self.config.trail_max_length,
            trail_min_spacing: self.config.trail_min_spacing,
        };

        let mut slots: Vec<_> = mem::take(&mut self.bodies)
            .into_iter()
            .map(|(key, body)| Slot {
                key,
                body,
                absorbed: false,
            })
            .collect();

        for _ in 0..steps {
            slots.retain(|slot| !slot.absorbed && slot.body.mass() > 0.0);
            self.sub_step(&mut slots, step);
        }

        self.bodies = slots
            .into_iter()
            .filter(|slot| !slot.absorbed && slot.body.mass() > 0.0)
            .map(|slot| (slot.key, slot.body))
            .collect();
    }

    fn sub_step(&mut self, slots: &mut [Slot], step: Step) {
        for i in 0..slots.len() {
            let (head, tail) = slots.split_at_mut(i + 1);
            let slot1 = &mut head[i];

            if slot1.absorbed {
                continue;
            }

            for slot2 in tail.iter_mut().filter(|slot| !slot.absorbed) {
                let (body1, body2) = (&mut slot1.body, &slot2.body);

                let direction = body2.position - body1.position;
                let distance_squared = direction.length_squared();
                let contact = body1.radius() + body2.radius();

                if distance_squared < contact * contact {
                    log::debug!("{} absorbs {}", slot1.key, slot2.key);

                    body1.absorb(body2);
                    slot2.absorbed = true;

                    if self.selected == Some(slot2.key) {
                        self.selected = Some(slot1.key);
                    }
                } else {
                    let (mass1, mass2) = (body1.mass(), slot2.body.mass());
                    let impulse = direction
                        * (step.gravity_constant
                            * step.time
                            * (mass1 * mass2 / distance_squared)
                            * fast_inverse_sqrt(distance_squared));

                    body1.velocity += impulse / mass1;
                    slot2.body.velocity -= impulse / mass2;
                }
            }

            let body = &mut slot1.body;
            body.position += body.velocity * step.time;
            body.update_trail(step.trail_max_length, step.trail_min_spacing);
        }
    }
}
