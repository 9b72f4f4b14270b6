//! Event names and typed payloads for the ad runtime events system

use std::fmt;
use std::str::FromStr;

use crate::geometry::Rect;
use crate::properties::{AdState, LocationData, NetworkType};
use crate::Error;

/// The closed set of event names a creative may subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    Error,
    Ready,
    SizeChange,
    StateChange,
    ViewableChange,
    ExposureChange,
    AudioVolumeChange,
    // extension events
    Shake,
    TiltChange,
    HeadingChange,
    LocationChange,
    NetworkChange,
    KeyboardStateChange,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Error => "error",
            EventName::Ready => "ready",
            EventName::SizeChange => "sizeChange",
            EventName::StateChange => "stateChange",
            EventName::ViewableChange => "viewableChange",
            EventName::ExposureChange => "exposureChange",
            EventName::AudioVolumeChange => "audioVolumeChange",
            EventName::Shake => "shake",
            EventName::TiltChange => "tiltChange",
            EventName::HeadingChange => "headingChange",
            EventName::LocationChange => "locationChange",
            EventName::NetworkChange => "networkChange",
            EventName::KeyboardStateChange => "keyboardStateChange",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(EventName::Error),
            "ready" => Ok(EventName::Ready),
            "sizeChange" => Ok(EventName::SizeChange),
            "stateChange" => Ok(EventName::StateChange),
            "viewableChange" => Ok(EventName::ViewableChange),
            "exposureChange" => Ok(EventName::ExposureChange),
            "audioVolumeChange" => Ok(EventName::AudioVolumeChange),
            "shake" => Ok(EventName::Shake),
            "tiltChange" => Ok(EventName::TiltChange),
            "headingChange" => Ok(EventName::HeadingChange),
            "locationChange" => Ok(EventName::LocationChange),
            "networkChange" => Ok(EventName::NetworkChange),
            "keyboardStateChange" => Ok(EventName::KeyboardStateChange),
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }
}

/// A broadcast event with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum AdEvent {
    Error { message: String, action: String },
    Ready,
    SizeChange { width: f64, height: f64 },
    StateChange(AdState),
    ViewableChange(bool),
    ExposureChange {
        exposed_percentage: f64,
        visible_rectangle: Rect,
        occlusion_rectangles: Option<Vec<Rect>>,
    },
    AudioVolumeChange(f64),
    Shake,
    TiltChange { x: f64, y: f64, z: f64 },
    HeadingChange(f64),
    LocationChange(LocationData),
    NetworkChange(NetworkType),
    KeyboardStateChange(bool),
}

impl AdEvent {
    /// The event name this payload is broadcast under
    pub fn name(&self) -> EventName {
        match self {
            AdEvent::Error { .. } => EventName::Error,
            AdEvent::Ready => EventName::Ready,
            AdEvent::SizeChange { .. } => EventName::SizeChange,
            AdEvent::StateChange(_) => EventName::StateChange,
            AdEvent::ViewableChange(_) => EventName::ViewableChange,
            AdEvent::ExposureChange { .. } => EventName::ExposureChange,
            AdEvent::AudioVolumeChange(_) => EventName::AudioVolumeChange,
            AdEvent::Shake => EventName::Shake,
            AdEvent::TiltChange { .. } => EventName::TiltChange,
            AdEvent::HeadingChange(_) => EventName::HeadingChange,
            AdEvent::LocationChange(_) => EventName::LocationChange,
            AdEvent::NetworkChange(_) => EventName::NetworkChange,
            AdEvent::KeyboardStateChange(_) => EventName::KeyboardStateChange,
        }
    }

    /// An `error` event carrying a message and the originating operation name
    pub fn error(message: impl Into<String>, action: impl Into<String>) -> Self {
        AdEvent::Error {
            message: message.into(),
            action: action.into(),
        }
    }
}
