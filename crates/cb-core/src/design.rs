//! Design records, the storage model and the design store
//!
//! Records serialize to the camelCase JSON shape of saved design files.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    DEFAULT_COLOR_EVEN, DEFAULT_COLOR_ODD, DEFAULT_COLOR_WHEELS, DEFAULT_WHEEL_OFFSET,
    DEFAULT_WHEEL_WIDTH, STORAGE_VERSION,
};
use crate::geometry::{BodyError, BoxSize, Point2, ProfileKind, check_profile, flat_profile};
use crate::section::SectionTable;
use crate::wheel::Wheel;

fn default_color_wheels() -> u32 {
    DEFAULT_COLOR_WHEELS
}

/// Reads an explicit `null` the same as a missing key
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_color_wheels<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(DEFAULT_COLOR_WHEELS))
}

/// Unset, zero, negative and NaN wheel dimensions all fall back to the default
fn positive_or(value: f32, fallback: f32) -> f32 {
    if value > 0.0 { value } else { fallback }
}

/// Everything needed to build one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub name: String,
    pub box_size: BoxSize,
    /// Height along the length, one sample per length index
    pub side_points: Vec<Point2>,
    /// Primary cross-section, one sample per width index
    pub front_points: Vec<Point2>,
    /// Width along the length, one sample per length index
    pub top_points: Vec<Point2>,
    pub color_odd: u32,
    pub color_even: u32,
    #[serde(
        default = "default_color_wheels",
        deserialize_with = "null_as_default_color_wheels"
    )]
    pub color_wheels: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wheels: Vec<Wheel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub front_segments: SectionTable,
}

impl Design {
    /// A plain box at the default resolution
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, BoxSize::default())
    }

    /// A plain box: every profile flat at the box's full extent
    pub fn with_size(name: impl Into<String>, box_size: BoxSize) -> Self {
        let BoxSize {
            length,
            width,
            height,
        } = box_size;

        Self {
            name: name.into(),
            box_size,
            side_points: flat_profile(length, height as f32),
            front_points: flat_profile(width, height as f32),
            top_points: flat_profile(length, width as f32),
            color_odd: DEFAULT_COLOR_ODD,
            color_even: DEFAULT_COLOR_EVEN,
            color_wheels: DEFAULT_COLOR_WHEELS,
            wheels: Vec::new(),
            front_segments: SectionTable::new(),
        }
    }

    /// Check that the profiles and sections match the box resolution
    pub fn validate(&self) -> Result<(), BodyError> {
        let BoxSize { length, width, .. } = self.box_size;
        self.box_size.validate()?;
        check_profile(ProfileKind::Side, &self.side_points, length)?;
        check_profile(ProfileKind::Top, &self.top_points, length)?;
        check_profile(ProfileKind::Front, &self.front_points, width)?;
        self.front_segments.validate(width)
    }

    /// Fill wheel fields that older records left out, zeroed or nulled
    pub fn migrate(&mut self) {
        for wheel in &mut self.wheels {
            wheel.offset = positive_or(wheel.offset, DEFAULT_WHEEL_OFFSET);
            wheel.width = positive_or(wheel.width, DEFAULT_WHEEL_WIDTH);
        }
    }
}

/// Versioned collection of designs, the unit of persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageModel {
    #[serde(default)]
    pub version: u32,
    pub designs: Vec<Design>,
}

impl Default for StorageModel {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            designs: vec![Design::new("Default")],
        }
    }
}

impl StorageModel {
    /// A model with no designs
    pub fn empty() -> Self {
        Self {
            version: STORAGE_VERSION,
            designs: Vec::new(),
        }
    }

    pub fn migrate(&mut self) {
        self.designs.iter_mut().for_each(Design::migrate);
    }

    pub fn find(&self, name: &str) -> Option<&Design> {
        self.designs.iter().find(|d| d.name == name)
    }
}

/// Owns the storage model and tracks the active design
///
/// Designs are keyed by name. When no design is explicitly active, or the
/// active one was removed, the first design is active.
#[derive(Debug, Clone, Default)]
pub struct DesignStore {
    model: StorageModel,
    active: Option<String>,
}

impl DesignStore {
    /// A store holding the single default design
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing model, migrating it first
    pub fn from_model(mut model: StorageModel) -> Self {
        model.migrate();
        Self {
            model,
            active: None,
        }
    }

    pub fn storage_model(&self) -> &StorageModel {
        &self.model
    }

    pub fn designs(&self) -> &[Design] {
        &self.model.designs
    }

    pub fn get(&self, name: &str) -> Option<&Design> {
        self.model.find(name)
    }

    /// The active design, falling back to the first one
    pub fn active(&self) -> Option<&Design> {
        self.active
            .as_deref()
            .and_then(|name| self.model.find(name))
            .or_else(|| self.model.designs.first())
    }

    pub fn set_active(&mut self, name: &str) -> Result<&Design, DesignError> {
        if self.model.find(name).is_none() {
            return Err(DesignError::UnknownDesign(name.to_string()));
        }
        self.active = Some(name.to_string());
        self.active().ok_or_else(|| DesignError::UnknownDesign(name.to_string()))
    }

    /// Add a default box design (replacing any with the same name) and make it active
    pub fn new_design(&mut self, name: impl Into<String>) -> &Design {
        self.update_design(Design::new(name))
    }

    /// Store a design, replacing the one with the same name, and make it active
    pub fn update_design(&mut self, design: Design) -> &Design {
        let name = design.name.clone();
        let index = match self.model.designs.iter().position(|d| d.name == name) {
            Some(index) => {
                self.model.designs[index] = design;
                index
            }
            None => {
                self.model.designs.push(design);
                self.model.designs.len() - 1
            }
        };
        tracing::debug!(design = %name, "Stored design");
        self.active = Some(name);
        &self.model.designs[index]
    }

    /// Edit a stored design in place
    pub fn modify_design(
        &mut self,
        name: &str,
        update: impl FnOnce(&mut Design),
    ) -> Result<&Design, DesignError> {
        let design = self
            .model
            .designs
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| DesignError::UnknownDesign(name.to_string()))?;
        update(design);
        Ok(&*design)
    }

    /// Remove a design by name; the first remaining design becomes active
    pub fn delete_design(&mut self, name: &str) -> Option<Design> {
        let index = self.model.designs.iter().position(|d| d.name == name)?;
        self.active = None;
        Some(self.model.designs.remove(index))
    }

    /// Swap in a whole new model
    pub fn replace_storage_model(&mut self, mut model: StorageModel) {
        model.migrate();
        tracing::debug!(designs = model.designs.len(), "Replaced storage model");
        self.model = model;
        self.active = None;
    }

    /// Add every design of another model after the existing ones
    pub fn append_storage_model(&mut self, other: StorageModel) {
        let mut model = self.model.clone();
        model.designs.extend(other.designs);
        self.replace_storage_model(model);
    }

    /// Back to the single default design
    pub fn reset_all(&mut self) {
        self.replace_storage_model(StorageModel::default());
    }

    /// Save the storage model to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DesignError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| DesignError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize the storage model to pretty JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DesignError> {
        serde_json::to_vec_pretty(&self.model).map_err(|e| DesignError::Serialize(e.to_string()))
    }

    /// Load a storage model from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DesignError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|e| DesignError::Io(e.to_string()))?;
        Self::load_from_bytes(&content)
    }

    /// Load a storage model from JSON bytes
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, DesignError> {
        let model: StorageModel =
            serde_json::from_slice(data).map_err(|e| DesignError::Deserialize(e.to_string()))?;
        if model.version == 0 {
            return Err(DesignError::NotDesignModel);
        }
        Ok(Self::from_model(model))
    }
}

/// Design storage errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DesignError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Provided data is not a designs model (missing version)")]
    NotDesignModel,
    #[error("Unknown design: {0}")]
    UnknownDesign(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_JSON: &str = r#"{
        "version": 1,
        "designs": [{
            "name": "Legacy",
            "boxSize": {"x": 3, "y": 2, "z": 2},
            "sidePoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}, {"x": 2, "y": 2}],
            "frontPoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}],
            "topPoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}, {"x": 2, "y": 2}],
            "colorOdd": 15433993,
            "colorEven": 0,
            "wheels": [{"center": {"x": 1, "y": 0}, "wheelRadius": 1, "arcRadius": 1.5}]
        }]
    }"#;

    #[test]
    fn test_new_design_defaults() {
        let design = Design::new("Box");
        assert_eq!(design.box_size, BoxSize::new(101, 41, 31));
        assert_eq!(design.side_points.len(), 101);
        assert_eq!(design.front_points.len(), 41);
        assert_eq!(design.top_points.len(), 101);
        assert_eq!(design.side_points[50], Point2::new(50.0, 31.0));
        assert_eq!(design.front_points[40], Point2::new(40.0, 31.0));
        assert_eq!(design.top_points[0], Point2::new(0.0, 41.0));
        assert_eq!(design.color_odd, 0xEB7D09);
        assert!(design.wheels.is_empty());
        assert!(design.front_segments.is_empty());
        assert!(design.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_profiles() {
        let mut design = Design::with_size("Bad", BoxSize::new(5, 3, 3));
        design.front_points.push(Point2::new(3.0, 3.0));
        assert_eq!(
            design.validate(),
            Err(BodyError::ProfileLength {
                profile: ProfileKind::Front,
                expected: 3,
                actual: 4
            })
        );

        let mut design = Design::with_size("Bad", BoxSize::new(5, 3, 3));
        design.front_segments.set(2, flat_profile(2, 1.0));
        assert!(matches!(
            design.validate(),
            Err(BodyError::SectionLength { index: 2, .. })
        ));
    }

    #[test]
    fn test_legacy_record_is_migrated() {
        let store = DesignStore::load_from_bytes(LEGACY_JSON.as_bytes()).unwrap();
        let design = store.active().unwrap();
        assert_eq!(design.name, "Legacy");
        assert_eq!(design.color_wheels, 0x202020);
        assert!(design.front_segments.is_empty());
        assert_eq!(design.wheels[0].offset, 10.0);
        assert_eq!(design.wheels[0].width, 10.0);
        assert_eq!(design.wheels[0].arc_radius, 1.5);
        assert!(design.validate().is_ok());
    }

    #[test]
    fn test_null_fields_load_as_missing() {
        let json = r#"{
            "version": 1,
            "designs": [{
                "name": "Nulls",
                "boxSize": {"x": 3, "y": 2, "z": 2},
                "sidePoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}, {"x": 2, "y": 2}],
                "frontPoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}],
                "topPoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}, {"x": 2, "y": 2}],
                "colorOdd": 15433993,
                "colorEven": 0,
                "colorWheels": null,
                "wheels": null,
                "frontSegments": null
            }, {
                "name": "NullWheel",
                "boxSize": {"x": 3, "y": 2, "z": 2},
                "sidePoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}, {"x": 2, "y": 2}],
                "frontPoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}],
                "topPoints": [{"x": 0, "y": 2}, {"x": 1, "y": 2}, {"x": 2, "y": 2}],
                "colorOdd": 15433993,
                "colorEven": 0,
                "wheels": [{
                    "center": {"x": 1, "y": 0},
                    "wheelRadius": 1,
                    "arcRadius": 1.5,
                    "offset": null,
                    "width": null
                }],
                "frontSegments": [null, null, null]
            }]
        }"#;
        let store = DesignStore::load_from_bytes(json.as_bytes()).unwrap();

        let nulls = store.get("Nulls").unwrap();
        assert_eq!(nulls.color_wheels, DEFAULT_COLOR_WHEELS);
        assert!(nulls.wheels.is_empty());
        assert!(nulls.front_segments.is_empty());
        assert!(nulls.validate().is_ok());

        let wheel = store.get("NullWheel").unwrap().wheels[0];
        assert_eq!(wheel.offset, DEFAULT_WHEEL_OFFSET);
        assert_eq!(wheel.width, DEFAULT_WHEEL_WIDTH);
    }

    #[test]
    fn test_migrate_replaces_non_positive_wheel_dimensions() {
        let mut design = Design::with_size("Wheels", BoxSize::new(5, 3, 3));
        let wheel = Wheel {
            center: Point2::new(2.0, 0.0),
            wheel_radius: 1.0,
            arc_radius: 1.5,
            offset: f32::NAN,
            width: -2.0,
        };
        design.wheels = vec![
            wheel,
            Wheel {
                offset: 3.0,
                width: f32::NAN,
                ..wheel
            },
        ];
        design.migrate();

        assert_eq!(design.wheels[0].offset, DEFAULT_WHEEL_OFFSET);
        assert_eq!(design.wheels[0].width, DEFAULT_WHEEL_WIDTH);
        assert_eq!(design.wheels[1].offset, 3.0);
        assert_eq!(design.wheels[1].width, DEFAULT_WHEEL_WIDTH);
    }

    #[test]
    fn test_rejects_model_without_version() {
        let json = r#"{"designs": []}"#;
        assert_eq!(
            DesignStore::load_from_bytes(json.as_bytes()).unwrap_err(),
            DesignError::NotDesignModel
        );
        assert!(matches!(
            DesignStore::load_from_bytes(b"not json"),
            Err(DesignError::Deserialize(_))
        ));
    }

    #[test]
    fn test_sparse_sections_serialize_with_holes() {
        let mut design = Design::with_size("Sections", BoxSize::new(4, 2, 2));
        design.front_segments.set(2, flat_profile(2, 1.0));
        let json = serde_json::to_value(&design).unwrap();
        let segments = json["frontSegments"].as_array().unwrap();
        assert_eq!(segments.len(), 3);
        assert!(segments[0].is_null());
        assert!(segments[1].is_null());
        assert_eq!(segments[2].as_array().unwrap().len(), 2);
        assert!(json.get("boxSize").is_some());
        assert_eq!(json["boxSize"]["x"], 4);
    }

    #[test]
    fn test_store_update_and_active() {
        let mut store = DesignStore::new();
        assert_eq!(store.active().unwrap().name, "Default");

        store.new_design("Coupe");
        assert_eq!(store.designs().len(), 2);
        assert_eq!(store.active().unwrap().name, "Coupe");

        let mut coupe = store.get("Coupe").unwrap().clone();
        coupe.color_odd = 0x123456;
        store.update_design(coupe);
        assert_eq!(store.designs().len(), 2);
        assert_eq!(store.get("Coupe").unwrap().color_odd, 0x123456);

        store.set_active("Default").unwrap();
        assert_eq!(store.active().unwrap().name, "Default");
        assert_eq!(
            store.set_active("Missing").unwrap_err(),
            DesignError::UnknownDesign("Missing".into())
        );
        assert_eq!(store.active().unwrap().name, "Default");
    }

    #[test]
    fn test_modify_design() {
        let mut store = DesignStore::new();
        let design = store
            .modify_design("Default", |d| d.color_even = 0xFFFFFF)
            .unwrap();
        assert_eq!(design.color_even, 0xFFFFFF);
        assert!(store.modify_design("Nope", |_| {}).is_err());
    }

    #[test]
    fn test_delete_falls_back_to_first() {
        let mut store = DesignStore::new();
        store.new_design("Coupe");
        assert!(store.delete_design("Coupe").is_some());
        assert!(store.delete_design("Coupe").is_none());
        assert_eq!(store.active().unwrap().name, "Default");

        store.delete_design("Default");
        assert!(store.active().is_none());
    }

    #[test]
    fn test_replace_append_and_reset() {
        let mut store = DesignStore::new();
        let legacy: StorageModel = serde_json::from_str(LEGACY_JSON).unwrap();

        store.append_storage_model(legacy.clone());
        let names: Vec<_> = store.designs().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Default", "Legacy"]);
        assert_eq!(store.get("Legacy").unwrap().wheels[0].width, 10.0);

        store.replace_storage_model(legacy);
        assert_eq!(store.designs().len(), 1);
        assert_eq!(store.active().unwrap().name, "Legacy");

        store.reset_all();
        assert_eq!(store.storage_model(), &StorageModel::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("designs.json");

        let mut store = DesignStore::new();
        let mut design = Design::with_size("Small", BoxSize::new(6, 4, 3));
        design.front_segments.set(3, flat_profile(4, 2.0));
        store.update_design(design.clone());
        store.save(&path).unwrap();

        let loaded = DesignStore::load(&path).unwrap();
        assert_eq!(loaded.storage_model(), store.storage_model());
        assert_eq!(loaded.get("Small"), Some(&design));

        assert!(matches!(
            DesignStore::load(dir.path().join("missing.json")),
            Err(DesignError::Io(_))
        ));
    }
}
