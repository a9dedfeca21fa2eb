//! # Planets
//!
//! Planets is a crate providing the core of an interactive N-body gravity simulation in Rust.
//!
//! ## Goals
//!
//! The main goal of this crate is to own the state of a small universe of bodies so that any front-end (a window, a game
//! engine, a web page) only has to drive it once per frame and draw what it contains.
//! Thus it does not include any rendering, input handling or camera and instead only focuses on the simulation itself.
//!
//! Bodies attract each other with Newtonian gravity computed between every pair, so a frame costs `O(n²)` per sub-step.
//! Bodies that touch merge into one, conserving mass and momentum.
//!
//! # Using Planets
//!
//! ## Creating a [`Universe`](universe::Universe)
//!
//! A universe owns its bodies and its random generator. Seed it to make random construction reproducible.
//!
//! ```
//! # use planets::prelude::*;
//! # use glam::Vec3;
//! let mut universe = Universe::with_seed(0);
//!
//! let sun = universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0e9));
//! universe.set_selected(Some(sun));
//! ```
//!
//! ## Populating it
//!
//! Bodies can be added one by one, scattered randomly or put on orbits around existing ones.
//!
//! ```
//! # use planets::prelude::*;
//! # use glam::{Mat3, Vec3};
//! # let mut universe = Universe::with_seed(0);
//! # let sun = universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0e9));
//! universe.add_orbital(sun, 200.0, 1.0e3, Mat3::IDENTITY)?;
//! universe.generate_random_orbital(10, Some(sun))?;
//!
//! assert_eq!(universe.len(), 12);
//! # Ok::<(), planets::Error>(())
//! ```
//!
//! ## Advancing the simulation
//!
//! Call [`advance`](universe::Universe::advance) once per frame with the elapsed time, then read the bodies back.
//!
//! ```
//! # use planets::prelude::*;
//! # use glam::{Mat3, Vec3};
//! # const DT: f32 = 1.0 / 60.0;
//! # let mut universe = Universe::with_seed(0);
//! # let sun = universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0e9));
//! # universe.generate_random_orbital(10, Some(sun))?;
//! universe.advance(DT);
//!
//! for (key, body) in universe.iter() {
//!     let color = key.color();
//!     let trail = body.trail();
//!     // ...
//! }
//! # Ok::<(), planets::Error>(())
//! ```
//!
//! ## Saving and loading
//!
//! Universes are stored as small XML documents, see [`persistence`].
//!
//! ```no_run
//! # use planets::prelude::*;
//! # let mut universe = Universe::with_seed(0);
//! universe.save("universe.xml")?;
//! universe.load("universe.xml", true)?;
//! # Ok::<(), planets::Error>(())
//! ```

#![warn(missing_docs)]

/// Point-masses simulated by a universe.
pub mod body;

/// Parameters of a universe and their default values.
pub mod config;

/// Error type of the crate.
pub mod error;

/// Random and orbital construction of bodies.
pub mod generation;

/// Integration of the bodies over time.
pub mod integrator;

/// Identifiers of bodies.
pub mod key;

/// Small geometric helpers.
pub mod math;

/// Universe file format.
///
/// ```text
/// <planets-3d-universe>
///   <planet mass="1234.5" color="#a1b2c3">
///     <position x="0" y="0" z="0"/>
///     <velocity x="0" y="1" z="0"/>
///   </planet>
/// </planets-3d-universe>
/// ```
///
/// Velocities are stored in displayed units and colors hold the keys of the bodies.
pub mod persistence;

/// Storage of the bodies and the selection.
pub mod universe;

pub use error::{Error, Result};

/// Everything needed to use the crate.
pub mod prelude {
    pub use crate::body::Body;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::key::Key;
    pub use crate::math::Ray;
    pub use crate::universe::{FollowMode, Universe};
}
