//! Data model for the ad runtime
//!
//! The protocol enums (state, placement, orientation, close position,
//! network, feature flags) and the property structs the host and creative
//! exchange. Serde names match the wire protocol exactly: camelCase fields
//! and the lowercase / kebab-case value names the host's decoder expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::geometry::Rect;
use crate::Error;

/// Visual lifecycle state of the ad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdState {
    #[default]
    Loading,
    Default,
    Expanded,
    Resized,
    Hidden,
}

impl AdState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdState::Loading => "loading",
            AdState::Default => "default",
            AdState::Expanded => "expanded",
            AdState::Resized => "resized",
            AdState::Hidden => "hidden",
        }
    }
}

impl fmt::Display for AdState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loading" => Ok(AdState::Loading),
            "default" => Ok(AdState::Default),
            "expanded" => Ok(AdState::Expanded),
            "resized" => Ok(AdState::Resized),
            "hidden" => Ok(AdState::Hidden),
            other => Err(Error::UnknownState(other.to_string())),
        }
    }
}

/// Whether the ad is shown inline within content or as a full interstitial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementType {
    Inline,
    Interstitial,
    #[default]
    Unknown,
}

impl PlacementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementType::Inline => "inline",
            PlacementType::Interstitial => "interstitial",
            PlacementType::Unknown => "unknown",
        }
    }
}

impl FromStr for PlacementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(PlacementType::Inline),
            "interstitial" => Ok(PlacementType::Interstitial),
            "unknown" => Ok(PlacementType::Unknown),
            other => Err(Error::UnknownPlacementType(other.to_string())),
        }
    }
}

/// Device orientation, also used as the forced-orientation request value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceOrientation {
    Portrait,
    Landscape,
    #[default]
    None,
}

impl DeviceOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceOrientation::Portrait => "portrait",
            DeviceOrientation::Landscape => "landscape",
            DeviceOrientation::None => "none",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl FromStr for DeviceOrientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portrait" => Ok(DeviceOrientation::Portrait),
            "landscape" => Ok(DeviceOrientation::Landscape),
            "none" => Ok(DeviceOrientation::None),
            other => Err(Error::UnknownOrientation(other.to_string())),
        }
    }
}

/// Anchor of the close-affordance region within a resized view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomClosePosition {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    Center,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl CustomClosePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomClosePosition::TopLeft => "top-left",
            CustomClosePosition::TopCenter => "top-center",
            CustomClosePosition::TopRight => "top-right",
            CustomClosePosition::Center => "center",
            CustomClosePosition::BottomLeft => "bottom-left",
            CustomClosePosition::BottomCenter => "bottom-center",
            CustomClosePosition::BottomRight => "bottom-right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl FromStr for CustomClosePosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(CustomClosePosition::TopLeft),
            "top-center" => Ok(CustomClosePosition::TopCenter),
            "top-right" => Ok(CustomClosePosition::TopRight),
            "center" => Ok(CustomClosePosition::Center),
            "bottom-left" => Ok(CustomClosePosition::BottomLeft),
            "bottom-center" => Ok(CustomClosePosition::BottomCenter),
            "bottom-right" => Ok(CustomClosePosition::BottomRight),
            other => Err(Error::UnknownClosePosition(other.to_string())),
        }
    }
}

/// Network reachability class reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Offline,
    Wifi,
    Cell,
    Unknown,
}

impl NetworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Offline => "offline",
            NetworkType::Wifi => "wifi",
            NetworkType::Cell => "cell",
            NetworkType::Unknown => "unknown",
        }
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offline" => Ok(NetworkType::Offline),
            "wifi" => Ok(NetworkType::Wifi),
            "cell" => Ok(NetworkType::Cell),
            "unknown" => Ok(NetworkType::Unknown),
            other => Err(Error::UnknownNetwork(other.to_string())),
        }
    }
}

/// Host-declared capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Sms,
    Tel,
    Calendar,
    StorePicture,
    InlineVideo,
    Vpaid,
    Location,
    Audio,
    Camera,
    Network,
    Shake,
    Tilt,
    Heading,
    Orientation,
    Map,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Sms => "sms",
            Feature::Tel => "tel",
            Feature::Calendar => "calendar",
            Feature::StorePicture => "storePicture",
            Feature::InlineVideo => "inlineVideo",
            Feature::Vpaid => "vpaid",
            Feature::Location => "location",
            Feature::Audio => "audio",
            Feature::Camera => "camera",
            Feature::Network => "network",
            Feature::Shake => "shake",
            Feature::Tilt => "tilt",
            Feature::Heading => "heading",
            Feature::Orientation => "orientation",
            Feature::Map => "map",
        }
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sms" => Ok(Feature::Sms),
            "tel" => Ok(Feature::Tel),
            "calendar" => Ok(Feature::Calendar),
            "storePicture" => Ok(Feature::StorePicture),
            "inlineVideo" => Ok(Feature::InlineVideo),
            "vpaid" => Ok(Feature::Vpaid),
            "location" => Ok(Feature::Location),
            "audio" => Ok(Feature::Audio),
            "camera" => Ok(Feature::Camera),
            "network" => Ok(Feature::Network),
            "shake" => Ok(Feature::Shake),
            "tilt" => Ok(Feature::Tilt),
            "heading" => Ok(Feature::Heading),
            "orientation" => Ok(Feature::Orientation),
            "map" => Ok(Feature::Map),
            other => Err(Error::UnknownFeature(other.to_string())),
        }
    }
}

/// Source of a location fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationProvider {
    Gps,
    Ip,
    User,
}

impl LocationProvider {
    /// Numeric provider code used on the wire (1 = GPS, 2 = IP, 3 = user)
    pub fn code(&self) -> u8 {
        match self {
            LocationProvider::Gps => 1,
            LocationProvider::Ip => 2,
            LocationProvider::User => 3,
        }
    }

    pub fn from_code(code: f64) -> Option<Self> {
        match code as i64 {
            1 => Some(LocationProvider::Gps),
            2 => Some(LocationProvider::Ip),
            3 => Some(LocationProvider::User),
            _ => None,
        }
    }
}

impl Serialize for LocationProvider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Expand request properties; `is_modal` is read-only for the creative
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandProperties {
    pub width: f64,
    pub height: f64,
    pub use_custom_close: bool,
    pub is_modal: bool,
}

impl Default for ExpandProperties {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            use_custom_close: false,
            is_modal: true,
        }
    }
}

/// Resize request properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeProperties {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub custom_close_position: CustomClosePosition,
    pub allow_offscreen: bool,
}

impl Default for ResizeProperties {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            custom_close_position: CustomClosePosition::TopRight,
            allow_offscreen: true,
        }
    }
}

/// Orientation request properties
///
/// Invariant: `allow_orientation_change == true` together with a forced
/// orientation other than `None` is an error condition; the setter rejects
/// the pair atomically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationProperties {
    pub allow_orientation_change: bool,
    pub force_orientation: DeviceOrientation,
}

impl Default for OrientationProperties {
    fn default() -> Self {
        Self {
            allow_orientation_change: true,
            force_orientation: DeviceOrientation::None,
        }
    }
}

/// Current app orientation as pushed by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOrientation {
    pub orientation: DeviceOrientation,
    pub locked: bool,
}

/// Last location fix pushed by the host
///
/// The provider type is stored as the raw numeric code the host sent so the
/// range check in the `locationData` validator stays observable; use
/// [`LocationData::provider`] for the typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationData {
    pub lat: f64,
    pub lon: f64,
    pub provider_type: f64,
    pub accuracy: f64,
    pub lastfix: f64,
    pub ipservice: String,
}

impl LocationData {
    pub fn provider(&self) -> Option<LocationProvider> {
        LocationProvider::from_code(self.provider_type)
    }
}

impl Default for LocationData {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            provider_type: LocationProvider::Gps.code() as f64,
            accuracy: 0.0,
            lastfix: 0.0,
            ipservice: String::new(),
        }
    }
}

/// Host-reported exposure of the ad view
///
/// The occlusion list is carried for forward compatibility but is always
/// `None` in this protocol version.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureProperties {
    pub exposed_percentage: f64,
    pub visible_rectangle: Rect,
    pub occlusion_rectangles: Option<Vec<Rect>>,
}

/// Sampling configuration shared by the shake, tilt and heading sensors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorProperties {
    pub interval: f64,
    pub intensity: f64,
}

/// Last accelerometer tilt reading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TiltValues {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        assert_eq!(AdState::Default.as_str(), "default");
        assert_eq!("resized".parse::<AdState>().unwrap(), AdState::Resized);
        assert_eq!(
            "top-right".parse::<CustomClosePosition>().unwrap(),
            CustomClosePosition::TopRight
        );
        assert!("sideways".parse::<DeviceOrientation>().is_err());
        assert!("telepathy".parse::<Feature>().is_err());
    }

    #[test]
    fn serialized_properties_use_protocol_field_names() {
        let json = serde_json::to_value(OrientationProperties::default()).unwrap();
        assert_eq!(json["allowOrientationChange"], true);
        assert_eq!(json["forceOrientation"], "none");

        let json = serde_json::to_value(ResizeProperties::default()).unwrap();
        assert_eq!(json["customClosePosition"], "top-right");
        assert_eq!(json["allowOffscreen"], true);
    }

    #[test]
    fn provider_codes_cover_protocol_range() {
        assert_eq!(LocationProvider::from_code(2.0), Some(LocationProvider::Ip));
        assert_eq!(LocationProvider::from_code(0.0), None);
        assert_eq!(LocationProvider::from_code(4.0), None);
    }

    #[test]
    fn defaults_match_protocol_initial_state() {
        let resize = ResizeProperties::default();
        assert_eq!(resize.custom_close_position, CustomClosePosition::TopRight);
        assert!(resize.allow_offscreen);

        let orientation = OrientationProperties::default();
        assert!(orientation.allow_orientation_change);
        assert_eq!(orientation.force_orientation, DeviceOrientation::None);

        let expand = ExpandProperties::default();
        assert!(expand.is_modal);
        assert!(!expand.use_custom_close);

        let location = LocationData::default();
        assert_eq!(location.provider(), Some(LocationProvider::Gps));
    }
}
