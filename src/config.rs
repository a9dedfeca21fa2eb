/// Default gravitational constant.
pub const GRAVITY_CONSTANT: f32 = 6.67e-11;

/// Default factor between displayed velocities and simulated ones.
///
/// `displayed velocity * VELOCITY_FACTOR = simulated velocity`. Simulated velocities are tiny, so
/// user interfaces and universe files work with the displayed value instead.
pub const VELOCITY_FACTOR: f32 = 1.0e-5;

/// Default lower bound of the mass of constructed bodies.
pub const MIN_MASS: f32 = 1.0;

/// Default upper bound of the mass of constructed bodies.
pub const MAX_MASS: f32 = 1.0e9;

/// Default maximum number of points in a trail.
pub const TRAIL_MAX_LENGTH: usize = 200;

/// Default squared distance a body travels before its trail records a new point.
pub const TRAIL_MIN_SPACING: f32 = 0.25;

/// Default number of integration sub-steps per frame.
pub const STEPS_PER_FRAME: u32 = 20;

/// Default squared distance from the center of mass beyond which a body is an escapee.
pub const ESCAPE_DISTANCE_SQUARED: f32 = 1.0e12;

/// Parameters of a [`Universe`](crate::universe::Universe).
///
/// Every field can be tuned while the simulation runs. Clearing a universe never resets them.
///
/// ```
/// # use planets::prelude::*;
/// let config = Config {
///     steps_per_frame: 100,
///     ..Default::default()
/// };
///
/// let universe = Universe::with_config(config, 0);
/// assert_eq!(universe.config().steps_per_frame, 100);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Gravitational constant used by the integrator and orbital construction.
    pub gravity_constant: f32,
    /// Factor between displayed velocities and simulated ones, see [`VELOCITY_FACTOR`].
    pub velocity_factor: f32,
    /// Lower bound of the mass of constructed bodies.
    pub min_mass: f32,
    /// Upper bound of the mass of constructed bodies.
    pub max_mass: f32,
    /// Maximum number of points kept in each trail.
    pub trail_max_length: usize,
    /// Squared distance a body travels before its trail records a new point.
    pub trail_min_spacing: f32,
    /// Multiplier of the frame time. Zero or less pauses the simulation.
    pub simulation_speed: f32,
    /// Number of integration sub-steps per frame, clamped to at least one.
    pub steps_per_frame: u32,
    /// Scale at which bodies are displayed, to be passed to [`Universe::select_under`](crate::universe::Universe::select_under).
    pub display_scale: f32,
    /// Squared distance from the center of mass beyond which a body is an escapee.
    pub escape_distance_squared: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity_constant: GRAVITY_CONSTANT,
            velocity_factor: VELOCITY_FACTOR,
            min_mass: MIN_MASS,
            max_mass: MAX_MASS,
            trail_max_length: TRAIL_MAX_LENGTH,
            trail_min_spacing: TRAIL_MIN_SPACING,
            simulation_speed: 1.0,
            steps_per_frame: STEPS_PER_FRAME,
            display_scale: 1.0,
            escape_distance_squared: ESCAPE_DISTANCE_SQUARED,
        }
    }
}

impl Config {
    /// Returns true if frames advance no simulated time.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.simulation_speed <= 0.0
    }
}
