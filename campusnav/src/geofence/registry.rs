//! Destination boundary registry.
//!
//! Maps destination names to their boundary polygons. The registry is loaded
//! once (from a JSON document or the bundled campus table) and shared
//! read-only for the lifetime of the process.
//!
//! # Document Format
//!
//! ```json
//! {
//!   "destinations": [
//!     { "name": "NIE Admin", "vertices": [[12.2835, 76.6415], [12.2839, 76.6417], [12.2842, 76.6414]] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::polygon::BoundaryPolygon;
use super::GeofenceError;

/// Campus boundary table shipped with the application.
const CAMPUS_BOUNDARIES_JSON: &str = include_str!("../../data/campus_boundaries.json");

/// On-disk representation of a registry.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryDocument {
    destinations: Vec<DestinationEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DestinationEntry {
    name: String,
    vertices: Vec<[f64; 2]>,
}

/// Immutable mapping from destination name to boundary polygon.
#[derive(Debug, Clone, Default)]
pub struct BoundaryRegistry {
    boundaries: BTreeMap<String, BoundaryPolygon>,
}

impl BoundaryRegistry {
    /// Build a registry from `(name, polygon)` pairs.
    ///
    /// Fails on the first duplicate name.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, GeofenceError>
    where
        I: IntoIterator<Item = (S, BoundaryPolygon)>,
        S: Into<String>,
    {
        let mut boundaries = BTreeMap::new();
        for (name, polygon) in entries {
            let name = name.into();
            if boundaries.contains_key(&name) {
                return Err(GeofenceError::DuplicateDestination(name));
            }
            boundaries.insert(name, polygon);
        }
        Ok(Self { boundaries })
    }

    /// Parse a registry from its JSON document form.
    pub fn from_json_str(json: &str) -> Result<Self, GeofenceError> {
        let document: RegistryDocument = serde_json::from_str(json)?;

        let mut entries = Vec::with_capacity(document.destinations.len());
        for entry in document.destinations {
            let polygon = BoundaryPolygon::try_from(entry.vertices).map_err(|source| {
                GeofenceError::InvalidPolygon {
                    name: entry.name.clone(),
                    source,
                }
            })?;
            entries.push((entry.name, polygon));
        }

        Self::from_entries(entries)
    }

    /// Load a registry from a JSON file.
    pub fn load(path: &Path) -> Result<Self, GeofenceError> {
        let json = std::fs::read_to_string(path).map_err(|source| GeofenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            destinations = registry.len(),
            "Loaded boundary registry"
        );
        Ok(registry)
    }

    /// The campus boundary table bundled with the application.
    pub fn campus_default() -> Result<Self, GeofenceError> {
        let registry = Self::from_json_str(CAMPUS_BOUNDARIES_JSON)?;
        debug!(destinations = registry.len(), "Using bundled campus boundaries");
        Ok(registry)
    }

    /// Load from `path` when given, otherwise fall back to the bundled table.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, GeofenceError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::campus_default(),
        }
    }

    /// Serialize the registry back to its JSON document form.
    pub fn to_json_string(&self) -> Result<String, GeofenceError> {
        let document = RegistryDocument {
            destinations: self
                .boundaries
                .iter()
                .map(|(name, polygon)| DestinationEntry {
                    name: name.clone(),
                    vertices: polygon.clone().into(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Boundary polygon for a destination, if registered.
    pub fn get(&self, name: &str) -> Option<&BoundaryPolygon> {
        self.boundaries.get(name)
    }

    /// Whether a destination is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.boundaries.contains_key(name)
    }

    /// Registered destination names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.boundaries.keys().map(String::as_str)
    }

    /// All `(name, polygon)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundaryPolygon)> {
        self.boundaries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered destinations.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether the registry has no destinations.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;
    use crate::geofence::PolygonError;

    #[test]
    fn test_campus_default_loads() {
        let registry = BoundaryRegistry::campus_default().unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["GJB", "NIE Admin", "TruLit Herbals"]
        );
        assert!(registry.get("NIE Admin").unwrap().len() == 4);
    }

    #[test]
    fn test_campus_admin_marker_inside_admin_boundary() {
        let registry = BoundaryRegistry::campus_default().unwrap();
        let admin = registry.get("NIE Admin").unwrap();
        assert!(admin.contains(&Coordinate::new(12.283828309006749, 76.64158989783473)));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{"destinations":[{"name":"Lot A","vertices":[[0,0],[0,1],[1,1],[1,0]]}]}"#;
        let registry = BoundaryRegistry::from_json_str(json).unwrap();
        assert!(registry.contains("Lot A"));
        assert!(!registry.contains("Lot B"));
    }

    #[test]
    fn test_duplicate_destination_rejected() {
        let json = r#"{"destinations":[
            {"name":"Lot A","vertices":[[0,0],[0,1],[1,1]]},
            {"name":"Lot A","vertices":[[2,2],[2,3],[3,3]]}
        ]}"#;
        let err = BoundaryRegistry::from_json_str(json).unwrap_err();
        assert!(matches!(err, GeofenceError::DuplicateDestination(name) if name == "Lot A"));
    }

    #[test]
    fn test_invalid_polygon_names_destination() {
        let json = r#"{"destinations":[{"name":"Kiosk","vertices":[[0,0],[0,1]]}]}"#;
        let err = BoundaryRegistry::from_json_str(json).unwrap_err();
        match err {
            GeofenceError::InvalidPolygon { name, source } => {
                assert_eq!(name, "Kiosk");
                assert_eq!(source, PolygonError::TooFewVertices(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = BoundaryRegistry::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, GeofenceError::Parse(_)));
    }

    #[test]
    fn test_load_from_file_and_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boundaries.json");

        let original = BoundaryRegistry::campus_default().unwrap();
        std::fs::write(&path, original.to_json_string().unwrap()).unwrap();

        let loaded = BoundaryRegistry::load(&path).unwrap();
        assert_eq!(loaded.len(), original.len());
        assert_eq!(loaded.get("GJB"), original.get("GJB"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BoundaryRegistry::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GeofenceError::Io { .. }));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let registry = BoundaryRegistry::load_or_default(None).unwrap();
        assert_eq!(registry.len(), 3);
    }
}
