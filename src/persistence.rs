use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use glam::Vec3;
use quick_xml::{events::Event, Reader};
use serde::{Deserialize, Serialize};

use crate::{
    body::Body,
    error::{Error, Result},
    key::Key,
    universe::Universe,
};

/// Name of the root element of a universe file.
pub const ROOT_ELEMENT: &str = "planets-3d-universe";

#[derive(Serialize, Deserialize)]
#[serde(rename = "planets-3d-universe")]
struct UniverseRecord {
    #[serde(rename = "planet", default)]
    planets: Vec<PlanetRecord>,
}

#[derive(Serialize, Deserialize)]
struct PlanetRecord {
    #[serde(rename = "@mass")]
    mass: f32,
    #[serde(rename = "@color", default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<VectorRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    velocity: Option<VectorRecord>,
}

#[derive(Serialize, Deserialize)]
struct VectorRecord {
    #[serde(rename = "@x", default)]
    x: f32,
    #[serde(rename = "@y", default)]
    y: f32,
    #[serde(rename = "@z", default)]
    z: f32,
}

impl From<Vec3> for VectorRecord {
    fn from(vector: Vec3) -> Self {
        Self {
            x: vector.x,
            y: vector.y,
            z: vector.z,
        }
    }
}

impl From<VectorRecord> for Vec3 {
    fn from(record: VectorRecord) -> Self {
        Vec3::new(record.x, record.y, record.z)
    }
}

impl PlanetRecord {
    fn new(key: Key, body: &Body, velocity_factor: f32) -> Self {
        Self {
            mass: body.mass(),
            color: Some(key.to_string()),
            position: Some(body.position.into()),
            velocity: Some((body.velocity / velocity_factor).into()),
        }
    }

    /// Returns the key hint and body stored in the record.
    fn into_body(self, velocity_factor: f32) -> (Option<Key>, Body) {
        let key = self.color.and_then(|color| match color.parse() {
            Ok(key) => Some(key),
            Err(err) => {
                log::warn!("Ignoring color of planet: {err}");
                None
            }
        });

        let position = self.position.map_or(Vec3::ZERO, Vec3::from);
        let velocity = self.velocity.map_or(Vec3::ZERO, Vec3::from) * velocity_factor;

        (key, Body::new(position, velocity, self.mass))
    }
}

/// Checks that the first element of the document is the universe root element.
fn check_root(document: &str) -> Result<()> {
    let mut reader = Reader::from_str(document);

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                let name = element.name();

                return if name.as_ref() == ROOT_ELEMENT.as_bytes() {
                    Ok(())
                } else {
                    Err(Error::InvalidRoot {
                        found: Some(String::from_utf8_lossy(name.as_ref()).into_owned()),
                    })
                };
            }
            Event::Eof => return Err(Error::InvalidRoot { found: None }),
            _ => {}
        }
    }
}

impl Universe {
    /// Writes every body to the universe file at the given path.
    ///
    /// Velocities are written in displayed units, see
    /// [`velocity_factor`](crate::config::Config::velocity_factor), and keys as `#rrggbb` colors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file_error = |source| Error::File {
            path: path.to_owned(),
            source,
        };

        let mut writer = BufWriter::new(File::create(path).map_err(file_error)?);
        self.save_to(&mut writer)?;
        writer.flush().map_err(file_error)?;

        log::info!("Saved {} planets to \"{}\"", self.len(), path.display());
        Ok(())
    }

    /// Writes every body as a universe document.
    ///
    /// ```
    /// # use planets::prelude::*;
    /// # use glam::Vec3;
    /// let mut universe = Universe::with_seed(0);
    /// universe.add(Body::new(Vec3::ZERO, Vec3::ZERO, 10.0));
    ///
    /// let mut document = Vec::new();
    /// universe.save_to(&mut document)?;
    ///
    /// let mut copy = Universe::with_seed(1);
    /// assert_eq!(copy.load_from(&document[..], true)?, 1);
    /// # Ok::<(), planets::Error>(())
    /// ```
    pub fn save_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let velocity_factor = self.config.velocity_factor;
        let record = UniverseRecord {
            planets: self
                .iter()
                .map(|(key, body)| PlanetRecord::new(key, body, velocity_factor))
                .collect(),
        };

        let mut document = String::from("<?xml version=\"1.0\"?>\n");
        let mut serializer = quick_xml::se::Serializer::new(&mut document);
        serializer.indent(' ', 2);
        record.serialize(serializer)?;
        document.push('\n');

        writer.write_all(document.as_bytes())?;
        Ok(())
    }

    /// Reads the universe file at the given path and returns the number of loaded bodies.
    ///
    /// If `clear` is true the current bodies are deleted first, otherwise the loaded bodies are
    /// added to them. Nothing is changed if the file cannot be read or is not a valid universe.
    pub fn load(&mut self, path: impl AsRef<Path>, clear: bool) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::File {
            path: path.to_owned(),
            source,
        })?;

        let count = self.load_from(BufReader::new(file), clear)?;

        log::info!("Loaded {count} planets from \"{}\"", path.display());
        Ok(count)
    }

    /// Reads a universe document and returns the number of loaded bodies.
    ///
    /// Saved colors are used as keys when they are free. An invalid color is ignored and the body
    /// gets a new key. See [`load`](Universe::load).
    pub fn load_from<R: BufRead>(&mut self, mut reader: R, clear: bool) -> Result<usize> {
        let mut document = String::new();
        reader.read_to_string(&mut document)?;

        check_root(&document)?;
        let record: UniverseRecord = quick_xml::de::from_str(&document)?;

        if clear {
            self.delete_all();
        }

        let velocity_factor = self.config.velocity_factor;
        let count = record.planets.len();

        for planet in record.planets {
            match planet.into_body(velocity_factor) {
                (Some(key), body) => self.add_with_hint(body, key),
                (None, body) => self.add(body),
            };
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const EPSILON: f32 = 1E-4;

    fn load_str(universe: &mut Universe, document: &str, clear: bool) -> Result<usize> {
        universe.load_from(document.as_bytes(), clear)
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("planets-{}-{name}.xml", std::process::id()))
    }

    #[test]
    fn round_trip() {
        let mut universe = Universe::with_seed(21);
        universe.generate_random(50, 1000.0, 1.0e-4, 1000.0);

        let mut document = Vec::new();
        universe.save_to(&mut document).unwrap();

        let mut loaded = Universe::with_seed(22);
        loaded.generate_random(5, 10.0, 0.0, 10.0);
        assert_eq!(loaded.load_from(&document[..], true).unwrap(), 50);
        assert_eq!(loaded.len(), 50);

        for (key, body) in universe.iter() {
            let copy = loaded.get(key).unwrap();

            assert_eq!(copy.mass(), body.mass());
            assert_eq!(copy.radius(), body.radius());
            assert!(copy.position.abs_diff_eq(body.position, EPSILON));
            assert!(copy.velocity.abs_diff_eq(body.velocity, 1e-9));
        }
    }

    #[test]
    fn file_round_trip() {
        let path = temp_path("file-round-trip");

        let mut universe = Universe::with_seed(5);
        universe.generate_random(10, 100.0, 1.0e-5, 100.0);
        universe.save(&path).unwrap();

        let mut loaded = Universe::with_seed(6);
        assert_eq!(loaded.load(&path, true).unwrap(), 10);
        assert!(universe.keys().eq(loaded.keys()));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn saved_format() {
        let mut universe = Universe::with_seed(0);
        let key = Key::from_rgb(0xa1b2c3).unwrap();
        universe.add_with_hint(
            Body::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0e-5, 0.0), 1234.5),
            key,
        );

        let mut document = Vec::new();
        universe.save_to(&mut document).unwrap();
        let document = String::from_utf8(document).unwrap();

        assert!(document.contains("<planets-3d-universe>"));
        assert!(document.contains(r##"<planet mass="1234.5" color="#a1b2c3">"##));
        assert!(document.contains(r#"<position x="1" y="2" z="3""#));
        assert!(document.contains(r#"<velocity x="0" y="1" z="0""#));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let document = r##"<?xml version="1.0"?>
            <planets-3d-universe>
                <planet mass="10"/>
                <planet mass="20" color="#00ff00">
                    <velocity x="1" y="0" z="0"/>
                </planet>
            </planets-3d-universe>"##;

        let mut universe = Universe::with_seed(0);
        assert_eq!(load_str(&mut universe, document, true).unwrap(), 2);

        let green = Key::from_rgb(0x00ff00).unwrap();
        assert_eq!(universe[green].mass(), 20.0);
        assert_eq!(universe[green].position, Vec3::ZERO);
        assert!(universe[green]
            .velocity
            .abs_diff_eq(Vec3::new(1.0e-5, 0.0, 0.0), 1e-12));

        let (_, other) = universe.iter().find(|(key, _)| *key != green).unwrap();
        assert_eq!(other.mass(), 10.0);
        assert_eq!(other.velocity, Vec3::ZERO);
    }

    #[test]
    fn bad_color_is_tolerated() {
        let document = r##"<planets-3d-universe>
                <planet mass="10" color="not a color"/>
                <planet mass="10" color="#000000"/>
            </planets-3d-universe>"##;

        let mut universe = Universe::with_seed(0);
        assert_eq!(load_str(&mut universe, document, true).unwrap(), 2);
        assert_eq!(universe.len(), 2);
    }

    #[test]
    fn taken_color_gets_new_key() {
        let document = r##"<planets-3d-universe>
                <planet mass="10" color="#123456"/>
            </planets-3d-universe>"##;

        let mut universe = Universe::with_seed(0);
        load_str(&mut universe, document, false).unwrap();
        load_str(&mut universe, document, false).unwrap();

        assert_eq!(universe.len(), 2);
        assert!(universe.is_valid(Key::from_rgb(0x123456).unwrap()));
    }

    #[test]
    fn append_keeps_existing_bodies() {
        let mut universe = Universe::with_seed(0);
        let key = universe.add(Body::default());
        universe.set_selected(Some(key));

        let document = r#"<planets-3d-universe><planet mass="5"/></planets-3d-universe>"#;
        assert_eq!(load_str(&mut universe, document, false).unwrap(), 1);

        assert_eq!(universe.len(), 2);
        assert_eq!(universe.selected(), Some(key));

        assert_eq!(load_str(&mut universe, document, true).unwrap(), 1);
        assert_eq!(universe.len(), 1);
        assert_eq!(universe.selected(), None);
    }

    #[test]
    fn invalid_files_leave_universe_untouched() {
        let mut universe = Universe::with_seed(0);
        universe.generate_random(3, 10.0, 0.0, 10.0);
        let keys: Vec<_> = universe.keys().collect();

        let missing = universe.load(temp_path("does-not-exist"), true);
        assert!(matches!(missing, Err(Error::File { .. })));

        let wrong_root = load_str(&mut universe, r#"<universe><planet mass="1"/></universe>"#, true);
        assert!(matches!(
            wrong_root,
            Err(Error::InvalidRoot { found: Some(name) }) if name == "universe"
        ));

        let empty = load_str(&mut universe, "", true);
        assert!(matches!(empty, Err(Error::InvalidRoot { found: None })));

        let no_mass = load_str(
            &mut universe,
            r##"<planets-3d-universe><planet color="#abcdef"/></planets-3d-universe>"##,
            true,
        );
        assert!(matches!(no_mass, Err(Error::Format(_))));

        let bad_mass = load_str(
            &mut universe,
            r#"<planets-3d-universe><planet mass="heavy"/></planets-3d-universe>"#,
            true,
        );
        assert!(matches!(bad_mass, Err(Error::Format(_))));

        assert!(universe.keys().eq(keys));
    }

    #[test]
    fn save_to_unwritable_path() {
        let universe = Universe::with_seed(0);
        let path = temp_path("missing-directory").join("universe.xml");

        assert!(matches!(universe.save(path), Err(Error::File { .. })));
    }
}
