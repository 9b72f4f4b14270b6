//! Extended creative surface: sensors, network, keyboard, audio and camera
//!
//! These operations sit outside the base MRAID surface but follow the same
//! rules - validated partial property bags, capability gating, error events
//! instead of returned errors, and dedup on the host-pushed change events.

use serde_json::Value;

use crate::events::AdEvent;
use crate::properties::{Feature, NetworkType, SensorProperties, TiltValues};

use super::{as_bag, AdController};

impl AdController {
    // ------------------------------------------------------------------
    // sensor properties
    // ------------------------------------------------------------------

    pub fn get_shake_properties(&self) -> SensorProperties {
        self.store.shake_properties
    }

    pub fn set_shake_properties(&mut self, properties: &Value) {
        log::info!("setShakeProperties");

        let bag = as_bag(properties);
        if !self.run_validators(bag, "setShakeProperties") {
            return;
        }

        overlay_sensor(&mut self.store.shake_properties, bag);
        self.notify_json("setShakeProperties", &self.store.shake_properties);
    }

    pub fn get_tilt_properties(&self) -> SensorProperties {
        self.store.tilt_properties
    }

    pub fn set_tilt_properties(&mut self, properties: &Value) {
        log::info!("setTiltProperties");

        let bag = as_bag(properties);
        if !self.run_validators(bag, "setTiltProperties") {
            return;
        }

        overlay_sensor(&mut self.store.tilt_properties, bag);
        self.notify_json("setTiltProperties", &self.store.tilt_properties);
    }

    pub fn get_heading_properties(&self) -> SensorProperties {
        self.store.heading_properties
    }

    pub fn set_heading_properties(&mut self, properties: &Value) {
        log::info!("setHeadingProperties");

        let bag = as_bag(properties);
        if !self.run_validators(bag, "setHeadingProperties") {
            return;
        }

        overlay_sensor(&mut self.store.heading_properties, bag);
        self.notify_json("setHeadingProperties", &self.store.heading_properties);
    }

    // ------------------------------------------------------------------
    // sensor readings and device context
    // ------------------------------------------------------------------

    pub fn get_tilt(&self) -> TiltValues {
        self.store.tilt_values
    }

    /// Validated store of a tilt reading; not forwarded to the host.
    pub fn set_tilt(&mut self, values: &Value) {
        log::info!("setTilt");

        let bag = as_bag(values);
        if !self.run_validators(bag, "setTilt") {
            return;
        }

        if let Some(x) = bag.get("x").and_then(Value::as_f64) {
            self.store.tilt_values.x = x;
        }
        if let Some(y) = bag.get("y").and_then(Value::as_f64) {
            self.store.tilt_values.y = y;
        }
        if let Some(z) = bag.get("z").and_then(Value::as_f64) {
            self.store.tilt_values.z = z;
        }
    }

    /// `None` until the host has pushed a first network value
    pub fn get_network(&self) -> Option<NetworkType> {
        self.store.current_network
    }

    pub fn set_network(&mut self, network: NetworkType) {
        self.store.current_network = Some(network);
    }

    pub fn get_heading(&self) -> f64 {
        self.store.heading_value
    }

    pub fn set_heading(&mut self, heading: f64) {
        self.store.heading_value = heading;
    }

    pub fn get_keyboard_state(&self) -> bool {
        self.store.keyboard_open
    }

    pub fn set_keyboard_state(&mut self, open: bool) {
        self.store.keyboard_open = open;
    }

    // ------------------------------------------------------------------
    // extended operations
    // ------------------------------------------------------------------

    pub fn play_audio(&self, url: &str) {
        log::info!("playAudio: {url}");

        if !self.supports(Feature::Audio) {
            self.fire_error("playAudio is not supported", "playAudio");
            return;
        }

        if !self.is_viewable() {
            self.fire_error(
                "playAudio cannot be called until the ad is viewable",
                "playAudio",
            );
            return;
        }

        self.notify("playAudio", url);
    }

    pub fn open_camera(&self) {
        log::info!("openCamera");

        if !self.supports(Feature::Camera) {
            self.fire_error("openCamera is not supported", "openCamera");
            return;
        }

        if !self.is_viewable() {
            self.fire_error(
                "openCamera cannot be called until the ad is viewable",
                "openCamera",
            );
            return;
        }

        self.notify("openCamera", "");
    }

    // ------------------------------------------------------------------
    // extension event dispatchers (host-driven)
    // ------------------------------------------------------------------

    /// Stateless; always broadcasts.
    pub fn fire_shake_event(&self) {
        self.registry.broadcast(&AdEvent::Shake);
    }

    /// Unconditional store and broadcast on every call.
    pub fn fire_tilt_change_event(&mut self, x: f64, y: f64, z: f64) {
        self.store.tilt_values = TiltValues { x, y, z };
        self.registry.broadcast(&AdEvent::TiltChange { x, y, z });
    }

    /// Stores the fix through the location setter, then broadcasts.
    #[allow(clippy::too_many_arguments)]
    pub fn fire_location_change_event(
        &mut self,
        lat: f64,
        lon: f64,
        provider_type: f64,
        accuracy: f64,
        lastfix: f64,
        ipservice: &str,
    ) {
        self.set_location(lat, lon, provider_type, accuracy, lastfix, ipservice);
        self.registry
            .broadcast(&AdEvent::LocationChange(self.store.location_data.clone()));
    }

    pub fn fire_heading_change_event(&mut self, heading: f64) {
        if self.store.heading_value != heading {
            self.store.heading_value = heading;
            self.registry.broadcast(&AdEvent::HeadingChange(heading));
        }
    }

    pub fn fire_network_change_event(&mut self, network: NetworkType) {
        if self.store.current_network != Some(network) {
            self.store.current_network = Some(network);
            self.registry.broadcast(&AdEvent::NetworkChange(network));
        }
    }

    pub fn fire_keyboard_state_change_event(&mut self, open: bool) {
        if self.store.keyboard_open != open {
            self.store.keyboard_open = open;
            self.registry.broadcast(&AdEvent::KeyboardStateChange(open));
        }
    }
}

fn overlay_sensor(stored: &mut SensorProperties, bag: &serde_json::Map<String, Value>) {
    if let Some(interval) = bag.get("interval").and_then(Value::as_f64) {
        stored.interval = interval;
    }
    if let Some(intensity) = bag.get("intensity").and_then(Value::as_f64) {
        stored.intensity = intensity;
    }
}
