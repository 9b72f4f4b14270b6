//! The ad controller - the public contract between creative and host
//!
//! Creative-invoked operations (expand, resize, close, open, ...) are
//! validated against the current state snapshot and forwarded to the host as
//! fire-and-forget commands; the host pushes resulting state back through
//! the setter / `fire_*_event` families. The controller never changes the ad
//! state on its own - `fire_state_change_event` is the only mutation path.
//!
//! No operation ever returns an error to the caller: every failure is
//! converted to a broadcast `error` event carrying a message and the
//! originating operation name.

mod extensions;


use serde::Serialize;
use serde_json::{Map, Number, Value};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::channel::OutboundChannel;
use crate::events::{AdEvent, EventRegistry, Listener};
use crate::geometry::{self, Adjustments, Rect, Size};
use crate::properties::{
    AdState, AppOrientation, CustomClosePosition, DeviceOrientation, ExpandProperties,
    ExposureProperties, Feature, LocationData, LocationProvider, OrientationProperties,
    PlacementType, ResizeProperties,
};
use crate::state::StateStore;
use crate::validators;
use crate::MRAID_VERSION;

/// Everything `encodeURIComponent` escapes: all non-alphanumerics except
/// the unreserved marks.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The ad runtime controller owning the state snapshot, the listener
/// registry and the outbound channel to the host.
pub struct AdController {
    store: StateStore,
    registry: EventRegistry,
    channel: Box<dyn OutboundChannel>,
}

impl std::fmt::Debug for AdController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdController")
            .field("store", &self.store)
            .field("registry", &self.registry)
            .field("channel", &"[OutboundChannel]")
            .finish()
    }
}

impl AdController {
    /// Create a controller with default state, delivering commands through
    /// the given channel.
    pub fn new(channel: Box<dyn OutboundChannel>) -> Self {
        Self {
            store: StateStore::new(),
            registry: EventRegistry::new(),
            channel,
        }
    }

    // ------------------------------------------------------------------
    // properties (creative-facing getters return defensive copies)
    // ------------------------------------------------------------------

    pub fn get_version(&self) -> &'static str {
        MRAID_VERSION
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.store.supports(feature)
    }

    pub fn get_placement_type(&self) -> PlacementType {
        self.store.placement_type
    }

    pub fn get_state(&self) -> AdState {
        self.store.state
    }

    pub fn is_viewable(&self) -> bool {
        self.store.is_viewable
    }

    pub fn get_orientation_properties(&self) -> OrientationProperties {
        self.store.orientation_properties
    }

    pub fn get_current_app_orientation(&self) -> AppOrientation {
        self.store.current_app_orientation
    }

    pub fn get_current_position(&self) -> Rect {
        self.store.current_position
    }

    pub fn get_default_position(&self) -> Rect {
        self.store.default_position
    }

    pub fn get_expand_properties(&self) -> ExpandProperties {
        self.store.expand_properties
    }

    pub fn get_max_size(&self) -> Size {
        self.store.max_size
    }

    pub fn get_screen_size(&self) -> Size {
        self.store.screen_size
    }

    pub fn get_resize_properties(&self) -> ResizeProperties {
        self.store.resize_properties
    }

    /// The last location fix, or `None` when the stored data is invalid -
    /// the typed rendering of the protocol's `-1` sentinel. An IP-sourced
    /// fix with no resolving service is rejected with an `error` event.
    pub fn get_location(&self) -> Option<LocationData> {
        let location = &self.store.location_data;

        let mut bag = Map::new();
        bag.insert("lat".to_string(), num(location.lat));
        bag.insert("lon".to_string(), num(location.lon));
        bag.insert("type".to_string(), num(location.provider_type));
        bag.insert("accuracy".to_string(), num(location.accuracy));
        bag.insert("lastfix".to_string(), num(location.lastfix));

        if !self.run_validators(&bag, "locationData") {
            log::error!("invalid location data!");
            return None;
        }

        if location.provider() == Some(LocationProvider::Ip) && location.ipservice.is_empty() {
            self.fire_error("invalid location data!", "getLocation");
            return None;
        }

        Some(location.clone())
    }

    // ------------------------------------------------------------------
    // creative-requested setters
    // ------------------------------------------------------------------

    /// Commit orientation request properties.
    ///
    /// Builds a candidate from the stored values overlaid with any present
    /// input fields and rejects atomically (no mutation) when the candidate
    /// both allows orientation change and forces an orientation.
    pub fn set_orientation_properties(&mut self, properties: &Value) {
        log::info!("setOrientationProperties");

        let bag = as_bag(properties);
        if !self.run_validators(bag, "setOrientationProperties") {
            return;
        }

        let mut candidate = self.store.orientation_properties;
        if let Some(allow) = bag.get("allowOrientationChange").and_then(Value::as_bool) {
            candidate.allow_orientation_change = allow;
        }
        if let Some(force) = bag
            .get("forceOrientation")
            .and_then(Value::as_str)
            .and_then(DeviceOrientation::from_name)
        {
            candidate.force_orientation = force;
        }

        if candidate.allow_orientation_change
            && candidate.force_orientation != DeviceOrientation::None
        {
            let message = format!(
                "allowOrientationChange is true but forceOrientation is {}",
                candidate.force_orientation.as_str()
            );
            self.fire_error(&message, "setOrientationProperties");
            return;
        }

        self.store.orientation_properties = candidate;
        self.notify_json("setOrientationProperties", &candidate);
    }

    /// Commit expand request properties; `isModal` is never settable. A
    /// change to `useCustomClose` is forwarded as its own command.
    pub fn set_expand_properties(&mut self, properties: &Value) {
        log::info!("setExpandProperties");

        let bag = as_bag(properties);
        if !self.run_validators(bag, "setExpandProperties") {
            return;
        }

        let old_use_custom_close = self.store.expand_properties.use_custom_close;

        if let Some(width) = bag.get("width").and_then(Value::as_f64) {
            self.store.expand_properties.width = width;
        }
        if let Some(height) = bag.get("height").and_then(Value::as_f64) {
            self.store.expand_properties.height = height;
        }
        if let Some(flag) = bag.get("useCustomClose").and_then(Value::as_bool) {
            self.store.expand_properties.use_custom_close = flag;
        }

        // Expanded ads cover the whole screen, so the only expand property
        // the native side needs to hear about is the close affordance.
        if self.store.expand_properties.use_custom_close != old_use_custom_close {
            self.use_custom_close(self.store.expand_properties.use_custom_close);
        }
    }

    /// Commit resize request properties.
    ///
    /// Clears the resize-readiness flag first; it comes back on only after
    /// the full validate / geometry-check / commit / forward sequence
    /// succeeds. Width, height and both offsets are required; the rest of
    /// the input is a partial update merged onto the stored values.
    pub fn set_resize_properties(&mut self, properties: &Value) {
        log::info!("setResizeProperties");

        self.store.is_resize_ready = false;

        let bag = as_bag(properties);
        for required in ["width", "height", "offsetX", "offsetY"] {
            if !bag.contains_key(required) {
                let message = format!("required property {required} is missing");
                self.fire_error(&message, "setResizeProperties");
                return;
            }
        }

        if !self.run_validators(bag, "setResizeProperties") {
            return;
        }

        let candidate = self.resize_candidate(bag);
        let mut adjustments = Adjustments::default();

        if !candidate.allow_offscreen {
            if candidate.width > self.store.max_size.width
                || candidate.height > self.store.max_size.height
            {
                self.fire_error(
                    "Resize width or height is greater than the maxSize width or height!",
                    "setResizeProperties",
                );
                return;
            }
            adjustments = geometry::fit_resize_view_on_screen(
                &self.store.default_position,
                &self.store.max_size,
                &candidate,
            );
        } else if !geometry::is_close_region_on_screen(
            &self.store.default_position,
            &self.store.max_size,
            &candidate,
        ) {
            self.fire_error(
                "Close event region will not appear entirely onscreen!",
                "setResizeProperties",
            );
            return;
        }

        self.store.resize_properties = candidate;

        let params = ResizeProperties {
            offset_x: candidate.offset_x + adjustments.x,
            offset_y: candidate.offset_y + adjustments.y,
            ..candidate
        };
        self.notify_json("setResizeProperties", &params);

        self.store.is_resize_ready = true;
    }

    // ------------------------------------------------------------------
    // creative-requested operations
    // ------------------------------------------------------------------

    pub fn add_event_listener(&mut self, event: &str, listener: Listener) {
        self.registry.subscribe(event, listener);
    }

    pub fn remove_event_listener(&mut self, event: &str, listener_id: Option<&str>) {
        self.registry.unsubscribe(event, listener_id);
    }

    /// Ask the host to open a URL. A URL carrying an ampersand is
    /// percent-encoded wholesale before forwarding: the host decodes twice,
    /// so this deliberate double-encode is what survives the round trip.
    pub fn open(&self, url: &str) {
        log::info!("open: {url}");

        if url.is_empty() {
            self.fire_error(&format!("Invalid URL: {url}"), "open");
            return;
        }

        if url.contains('&') {
            let encoded = utf8_percent_encode(url, URI_COMPONENT).to_string();
            self.notify("open", &encoded);
        } else {
            self.notify("open", url);
        }
    }

    pub fn close(&self) {
        log::info!("close");

        if self.store.state == AdState::Hidden {
            self.fire_error("Ad cannot be closed when it is already hidden.", "close");
            return;
        }

        self.notify("close", "");
    }

    pub fn unload(&self) {
        log::info!("unload");
        self.notify("unload", "");
    }

    /// Store the close-affordance choice and forward it to the host.
    pub fn use_custom_close(&mut self, should_use_custom_close: bool) {
        log::info!("useCustomClose: {should_use_custom_close}");

        self.store.expand_properties.use_custom_close = should_use_custom_close;
        self.notify("useCustomClose", if should_use_custom_close { "true" } else { "false" });
    }

    /// Request an expand. Legal only for an inline placement in the default
    /// or resized state.
    pub fn expand(&self, url: Option<&str>) {
        log::info!("expand: {}", url.unwrap_or("(1-part)"));

        if self.store.placement_type != PlacementType::Inline
            || (self.store.state != AdState::Default && self.store.state != AdState::Resized)
        {
            self.fire_error(
                "Ad can only be expanded from the default or resized state.",
                "expand",
            );
            return;
        }

        self.notify("expand", url.unwrap_or(""));
    }

    /// Request a resize using the committed resize properties.
    ///
    /// A silent no-op for interstitials and for the loading / hidden states;
    /// an error from the expanded state or before `setResizeProperties` has
    /// committed.
    pub fn resize(&self) {
        log::info!("resize");

        if self.store.placement_type == PlacementType::Interstitial
            || self.store.state == AdState::Loading
            || self.store.state == AdState::Hidden
        {
            return;
        }
        if self.store.state == AdState::Expanded {
            self.fire_error("Ad cannot be resized when in expanded state.", "resize");
            return;
        }
        if !self.store.is_resize_ready {
            self.fire_error("Ad is not ready for resizing.", "resize");
            return;
        }

        self.notify_json("resize", &self.store.resize_properties);
    }

    pub fn play_video(&self, uri: &str) {
        log::info!("playVideo: {uri}");

        if !self.is_viewable() {
            self.fire_error(
                "playVideo cannot be called until the ad is viewable",
                "playVideo",
            );
            return;
        }

        if uri.is_empty() {
            self.fire_error(&format!("Invalid URI: {uri}"), "playVideo");
            return;
        }

        self.notify("playVideo", uri);
    }

    pub fn store_picture(&self, uri: &str) {
        log::info!("storePicture: {uri}");

        if !self.supports(Feature::StorePicture) {
            self.fire_error("storePicture is not supported", "storePicture");
            return;
        }

        if !self.is_viewable() {
            self.fire_error(
                "storePicture cannot be called until the ad is viewable",
                "storePicture",
            );
            return;
        }

        if uri.is_empty() {
            self.fire_error(&format!("Invalid URI: {uri}"), "storePicture");
            return;
        }

        self.notify("storePicture", uri);
    }

    /// Forward calendar event parameters as-is; no validation beyond the
    /// capability flag in this protocol version.
    pub fn create_calendar_event(&self, parameters: &Value) {
        log::info!("createCalendarEvent");

        if !self.supports(Feature::Calendar) {
            self.fire_error("createCalendarEvent is not supported", "createCalendarEvent");
            return;
        }

        self.notify_json("createCalendarEvent", parameters);
    }

    // ------------------------------------------------------------------
    // host-pushed setters
    // ------------------------------------------------------------------

    pub fn set_supported_feature(&mut self, feature: Feature, is_supported: bool) {
        self.store.supported_features.insert(feature, is_supported);
    }

    pub fn set_placement_type(&mut self, placement_type: PlacementType) {
        self.store.placement_type = placement_type;
    }

    pub fn set_current_app_orientation(&mut self, orientation: DeviceOrientation, locked: bool) {
        self.store.current_app_orientation = AppOrientation { orientation, locked };
    }

    /// Update the current position; fires `sizeChange` iff the size part
    /// differs from the previously stored size.
    pub fn set_current_position(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let previous = Size::new(
            self.store.current_position.width,
            self.store.current_position.height,
        );

        self.store.current_position = Rect::new(x, y, width, height);

        if width != previous.width || height != previous.height {
            self.fire_size_change_event(width, height);
        }
    }

    pub fn set_default_position(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.store.default_position = Rect::new(x, y, width, height);
    }

    /// Update the usable bounds. Expand width/height track the max size
    /// until the creative sets them explicitly.
    pub fn set_max_size(&mut self, width: f64, height: f64) {
        self.store.max_size = Size::new(width, height);
        self.store.expand_properties.width = width;
        self.store.expand_properties.height = height;
    }

    pub fn set_screen_size(&mut self, width: f64, height: f64) {
        self.store.screen_size = Size::new(width, height);
    }

    pub fn set_location(
        &mut self,
        lat: f64,
        lon: f64,
        provider_type: f64,
        accuracy: f64,
        lastfix: f64,
        ipservice: &str,
    ) {
        self.store.location_data = LocationData {
            lat,
            lon,
            provider_type,
            accuracy,
            lastfix,
            ipservice: ipservice.to_string(),
        };
    }

    // ------------------------------------------------------------------
    // event dispatchers (host-driven)
    // ------------------------------------------------------------------

    pub fn fire_error_event(&self, message: &str, action: &str) {
        self.fire_error(message, action);
    }

    pub fn fire_ready_event(&self) {
        self.registry.broadcast(&AdEvent::Ready);
    }

    /// Unconditional: overwrites the stored screen size and broadcasts on
    /// every call, with no deduplication.
    pub fn fire_size_change_event(&mut self, width: f64, height: f64) {
        self.store.screen_size = Size::new(width, height);
        self.registry
            .broadcast(&AdEvent::SizeChange { width, height });
    }

    /// The only mutation path for the ad state. A repeated identical value
    /// is a no-op with no duplicate event.
    pub fn fire_state_change_event(&mut self, new_state: AdState) {
        if self.store.state != new_state {
            self.store.state = new_state;
            self.registry.broadcast(&AdEvent::StateChange(new_state));
        }
    }

    pub fn fire_viewable_change_event(&mut self, is_viewable: bool) {
        if self.store.is_viewable != is_viewable {
            self.store.is_viewable = is_viewable;
            self.registry.broadcast(&AdEvent::ViewableChange(is_viewable));
        }
    }

    /// Unconditional: overwrites and broadcasts on every call.
    pub fn fire_exposure_change_event(
        &mut self,
        exposed_percentage: f64,
        visible_rectangle: Rect,
        occlusion_rectangles: Option<Vec<Rect>>,
    ) {
        self.store.exposure_properties = ExposureProperties {
            exposed_percentage,
            visible_rectangle,
            occlusion_rectangles: occlusion_rectangles.clone(),
        };
        self.registry.broadcast(&AdEvent::ExposureChange {
            exposed_percentage,
            visible_rectangle,
            occlusion_rectangles,
        });
    }

    pub fn fire_audio_volume_change_event(&mut self, percentage: f64) {
        if self.store.volume_percentage != percentage {
            self.store.volume_percentage = percentage;
            self.registry.broadcast(&AdEvent::AudioVolumeChange(percentage));
        }
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    pub(crate) fn fire_error(&self, message: &str, action: &str) {
        log::error!("{message}");
        self.registry.broadcast(&AdEvent::error(message, action));
    }

    /// Run the validator table for an action, broadcasting one `error` event
    /// per failing property. Returns whether every present property passed.
    pub(crate) fn run_validators(&self, properties: &Map<String, Value>, action: &str) -> bool {
        let failures = validators::check(properties, action);
        for message in &failures {
            self.registry.broadcast(&AdEvent::error(message, action));
        }
        failures.is_empty()
    }

    pub(crate) fn notify(&self, operation: &str, params: &str) {
        self.channel.notify(operation, params);
    }

    pub(crate) fn notify_json<T: Serialize>(&self, operation: &str, params: &T) {
        match serde_json::to_string(params) {
            Ok(json) => self.notify(operation, &json),
            Err(e) => log::error!("failed to encode {operation} params: {e}"),
        }
    }

    /// The stored resize properties overlaid with every present input field.
    /// Input types are already validated.
    fn resize_candidate(&self, bag: &Map<String, Value>) -> ResizeProperties {
        let mut candidate = self.store.resize_properties;

        if let Some(width) = bag.get("width").and_then(Value::as_f64) {
            candidate.width = width;
        }
        if let Some(height) = bag.get("height").and_then(Value::as_f64) {
            candidate.height = height;
        }
        if let Some(offset_x) = bag.get("offsetX").and_then(Value::as_f64) {
            candidate.offset_x = offset_x;
        }
        if let Some(offset_y) = bag.get("offsetY").and_then(Value::as_f64) {
            candidate.offset_y = offset_y;
        }
        if let Some(position) = bag
            .get("customClosePosition")
            .and_then(Value::as_str)
            .and_then(CustomClosePosition::from_name)
        {
            candidate.custom_close_position = position;
        }
        if let Some(allow) = bag.get("allowOffscreen").and_then(Value::as_bool) {
            candidate.allow_offscreen = allow;
        }

        candidate
    }
}

/// View a setter argument as a property bag; anything but a JSON object is
/// treated as the empty bag.
fn as_bag(value: &Value) -> &Map<String, Value> {
    static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
    value
        .as_object()
        .unwrap_or_else(|| EMPTY.get_or_init(Map::new))
}

/// A float as a JSON value; non-finite values become null, which the
/// numeric predicates reject.
fn num(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
