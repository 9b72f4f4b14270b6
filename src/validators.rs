//! Per-operation property validation tables
//!
//! Each creative-facing setter has a fixed table of (field, predicate)
//! pairs, checked against the loosely-typed property bag the creative sent.
//! Every failing property is reported (no short-circuit); properties with no
//! rule in the table are ignored, not rejected. The module is pure - it
//! returns the failure messages and the controller broadcasts one `error`
//! event per entry.

use serde_json::{Map, Value};

use crate::properties::{CustomClosePosition, DeviceOrientation};

/// A single field predicate
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// Any JSON number
    Numeric,
    /// A JSON number no smaller than the bound
    NumericMin(f64),
    /// A JSON number within the inclusive range
    NumericRange(f64, f64),
    Boolean,
    /// One of the device orientation names
    OrientationName,
    /// One of the seven close-position names
    ClosePositionName,
}

impl Predicate {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Predicate::Numeric => value.is_number(),
            Predicate::NumericMin(min) => value.as_f64().is_some_and(|v| v >= *min),
            Predicate::NumericRange(lo, hi) => {
                value.as_f64().is_some_and(|v| v >= *lo && v <= *hi)
            }
            Predicate::Boolean => value.is_boolean(),
            Predicate::OrientationName => value
                .as_str()
                .and_then(DeviceOrientation::from_name)
                .is_some(),
            Predicate::ClosePositionName => value
                .as_str()
                .and_then(CustomClosePosition::from_name)
                .is_some(),
        }
    }
}

static EXPAND_RULES: &[(&str, Predicate)] = &[
    ("width", Predicate::Numeric),
    ("height", Predicate::Numeric),
    // useCustomClose is unconstrained in MRAID 3; no rule means any value
    // passes, which is the protocol's "always accepted".
];

static ORIENTATION_RULES: &[(&str, Predicate)] = &[
    ("allowOrientationChange", Predicate::Boolean),
    ("forceOrientation", Predicate::OrientationName),
];

static RESIZE_RULES: &[(&str, Predicate)] = &[
    ("width", Predicate::NumericMin(50.0)),
    ("height", Predicate::NumericMin(50.0)),
    ("offsetX", Predicate::Numeric),
    ("offsetY", Predicate::Numeric),
    ("customClosePosition", Predicate::ClosePositionName),
    ("allowOffscreen", Predicate::Boolean),
];

static LOCATION_RULES: &[(&str, Predicate)] = &[
    ("lat", Predicate::Numeric),
    ("lon", Predicate::Numeric),
    ("type", Predicate::NumericRange(1.0, 3.0)),
    ("accuracy", Predicate::Numeric),
    ("lastfix", Predicate::Numeric),
];

static SENSOR_RULES: &[(&str, Predicate)] = &[
    ("interval", Predicate::Numeric),
    ("intensity", Predicate::Numeric),
];

static TILT_RULES: &[(&str, Predicate)] = &[
    ("x", Predicate::Numeric),
    ("y", Predicate::Numeric),
    ("z", Predicate::Numeric),
];

/// The rule table for a setter operation; empty for operations that carry no
/// validated properties.
pub fn rules_for(action: &str) -> &'static [(&'static str, Predicate)] {
    match action {
        "setExpandProperties" => EXPAND_RULES,
        "setOrientationProperties" => ORIENTATION_RULES,
        "setResizeProperties" => RESIZE_RULES,
        "locationData" => LOCATION_RULES,
        "setShakeProperties" | "setTiltProperties" | "setHeadingProperties" => SENSOR_RULES,
        "setTilt" => TILT_RULES,
        _ => &[],
    }
}

/// Check every property in the bag against the action's rule table.
///
/// Returns one failure message per invalid property, in bag order. An empty
/// result means every present property passed.
pub fn check(properties: &Map<String, Value>, action: &str) -> Vec<String> {
    let rules = rules_for(action);
    let mut failures = Vec::new();

    for (prop, value) in properties {
        let rule = rules.iter().find(|(name, _)| name == prop);
        if let Some((_, predicate)) = rule {
            if !predicate.accepts(value) {
                let message = format!("Value of property {prop} ({value}) is invalid!");
                log::error!("{message}");
                failures.push(message);
            }
        }
    }

    failures
}
