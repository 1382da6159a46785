use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use log::info;

use crate::{Error, Place};

/// Reads a JSON array of places from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed, a coordinate is
/// out of range, or the file repeats a place id
pub fn load_places(path: &Path) -> Result<Vec<Place>, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open place file '{}': {}", path.display(), e),
        )
    })?;
    let places: Vec<Place> = serde_json::from_reader(BufReader::new(file))?;
    validate_places(&places)?;

    info!("Loaded {} places from {}", places.len(), path.display());
    Ok(places)
}

/// Loads and merges several place files, rejecting ids repeated across them.
///
/// # Errors
///
/// Same as [`load_places`], plus an error when no file is given
pub fn load_catalogues(paths: &[PathBuf]) -> Result<Vec<Place>, Error> {
    if paths.is_empty() {
        return Err(Error::InvalidData(
            "No place files provided".to_string(),
        ));
    }

    let mut places = Vec::new();
    for path in paths {
        places.extend(load_places(path)?);
    }
    validate_places(&places)?;
    Ok(places)
}

fn validate_places(places: &[Place]) -> Result<(), Error> {
    let mut ids = HashSet::with_capacity(places.len());
    for place in places {
        if place.id.is_empty() {
            return Err(Error::InvalidData(format!(
                "Place '{}' has an empty id",
                place.name
            )));
        }
        if !ids.insert(place.id.as_str()) {
            return Err(Error::InvalidData(format!(
                "Duplicate place id '{}'",
                place.id
            )));
        }
    }
    Ok(())
}
