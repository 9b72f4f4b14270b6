// Core module of the mraid-core ad runtime
pub mod channel;
pub mod controller;
pub mod events;
pub mod geometry;
pub mod properties;
pub mod state;
pub mod validators;

/// Version of the mraid-core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the MRAID protocol this runtime speaks
pub const MRAID_VERSION: &str = "3.0";

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::channel::{NullChannel, OutboundChannel, RecordingChannel};
    pub use crate::controller::AdController;
    pub use crate::events::{AdEvent, EventName, EventRegistry, Listener};
    pub use crate::geometry::{Adjustments, Rect, Size};
    pub use crate::properties::{
        AdState, AppOrientation, CustomClosePosition, DeviceOrientation, ExpandProperties,
        ExposureProperties, Feature, LocationData, LocationProvider, NetworkType,
        OrientationProperties, PlacementType, ResizeProperties, SensorProperties, TiltValues,
    };
    pub use crate::state::StateStore;
}

/// Errors that can occur in the ad runtime
///
/// These never cross the creative-facing API as `Err`; the controller and
/// registry convert every failure into a broadcast `error` event. They exist
/// for the parsing seams (`FromStr` on the protocol enums).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown MRAID event: {0}")]
    UnknownEvent(String),

    #[error("Unknown ad state: {0}")]
    UnknownState(String),

    #[error("Unknown placement type: {0}")]
    UnknownPlacementType(String),

    #[error("Unknown orientation: {0}")]
    UnknownOrientation(String),

    #[error("Unknown custom close position: {0}")]
    UnknownClosePosition(String),

    #[error("Unknown network type: {0}")]
    UnknownNetwork(String),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}
