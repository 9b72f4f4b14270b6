//! Mutable snapshot of ad properties
//!
//! One `StateStore` per controller instance, rebuilt from host pushes on
//! each load - nothing is persisted. Single-threaded by contract: the store
//! is only ever touched from the controller's entry points.

use std::collections::HashMap;

use crate::geometry::{Rect, Size};
use crate::properties::{
    AdState, AppOrientation, ExpandProperties, ExposureProperties, Feature, LocationData,
    NetworkType, OrientationProperties, PlacementType, ResizeProperties, SensorProperties,
    TiltValues,
};

/// The mutable snapshot of ad properties
#[derive(Debug)]
pub struct StateStore {
    pub supported_features: HashMap<Feature, bool>,
    pub placement_type: PlacementType,
    pub state: AdState,
    pub is_viewable: bool,
    pub volume_percentage: f64,
    /// Cleared on entry to every setResizeProperties call, set again only
    /// after the call fully validates and commits.
    pub is_resize_ready: bool,
    pub orientation_properties: OrientationProperties,
    pub current_app_orientation: AppOrientation,
    pub current_position: Rect,
    pub default_position: Rect,
    pub expand_properties: ExpandProperties,
    pub max_size: Size,
    pub screen_size: Size,
    pub resize_properties: ResizeProperties,
    pub location_data: LocationData,
    pub exposure_properties: ExposureProperties,

    // extension state
    pub shake_properties: SensorProperties,
    pub tilt_properties: SensorProperties,
    pub heading_properties: SensorProperties,
    pub tilt_values: TiltValues,
    pub heading_value: f64,
    /// `None` until the host pushes a first value
    pub current_network: Option<NetworkType>,
    pub keyboard_open: bool,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the host has declared the feature usable; unset flags read
    /// as unsupported.
    pub fn supports(&self, feature: Feature) -> bool {
        self.supported_features.get(&feature).copied().unwrap_or(false)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self {
            supported_features: HashMap::new(),
            placement_type: PlacementType::Unknown,
            state: AdState::Loading,
            is_viewable: false,
            volume_percentage: 1.0,
            is_resize_ready: false,
            orientation_properties: OrientationProperties::default(),
            current_app_orientation: AppOrientation::default(),
            current_position: Rect::zero(),
            default_position: Rect::zero(),
            expand_properties: ExpandProperties::default(),
            max_size: Size::zero(),
            screen_size: Size::zero(),
            resize_properties: ResizeProperties::default(),
            location_data: LocationData::default(),
            exposure_properties: ExposureProperties::default(),
            shake_properties: SensorProperties::default(),
            tilt_properties: SensorProperties::default(),
            heading_properties: SensorProperties::default(),
            tilt_values: TiltValues::default(),
            heading_value: 0.0,
            current_network: None,
            keyboard_open: false,
        }
    }
}
