use std::{io, path::PathBuf};

use thiserror::Error;

use crate::key::Key;

/// Errors reported by a [`Universe`](crate::universe::Universe).
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a universe failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A universe file could not be opened, read or written.
    #[error("unable to access \"{}\": {source}", path.display())]
    File {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The document does not start with a `planets-3d-universe` element.
    #[error("not a valid universe file: expected root element \"planets-3d-universe\", found {}", found.as_deref().unwrap_or("nothing"))]
    InvalidRoot {
        /// Name of the root element found instead, if any.
        found: Option<String>,
    },

    /// The document is not well-formed XML.
    #[error("malformed universe file: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A body record is missing a required attribute or holds an invalid value.
    #[error("invalid universe data: {0}")]
    Format(#[from] quick_xml::DeError),

    /// The key does not name a live body.
    #[error("no body with key {0}")]
    InvalidKey(Key),

    /// The operation needs at least one body.
    #[error("the universe is empty")]
    EmptyUniverse,

    /// Orbits need a strictly positive radius.
    #[error("invalid orbital radius {radius}")]
    InvalidOrbit {
        /// Requested radius.
        radius: f32,
    },
}

/// Result type of fallible [`Universe`](crate::universe::Universe) operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
