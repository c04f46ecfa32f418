use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operational mode of the system. Controls whether sensor events can raise
/// an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmingStatus {
    #[default]
    Disarmed,
    ArmedHome,
    ArmedAway,
}

impl ArmingStatus {
    /// Every variant, in declaration order.
    pub const ALL: [ArmingStatus; 3] = [
        ArmingStatus::Disarmed,
        ArmingStatus::ArmedHome,
        ArmingStatus::ArmedAway,
    ];

    /// Human-readable label shown by front ends.
    pub fn description(&self) -> &'static str {
        match self {
            ArmingStatus::Disarmed => "Disarmed",
            ArmingStatus::ArmedHome => "Armed - At Home",
            ArmingStatus::ArmedAway => "Armed - Away",
        }
    }

    /// `true` for either armed mode.
    pub fn is_armed(&self) -> bool {
        !matches!(self, ArmingStatus::Disarmed)
    }
}

impl fmt::Display for ArmingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Alarm state machine value. `Alarm` is a sink for sensor events; only
/// arming changes and image results can move the system out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmStatus {
    #[default]
    NoAlarm,
    /// One sensor trip has been seen but the alarm is not yet confirmed.
    PendingAlarm,
    Alarm,
}

impl AlarmStatus {
    /// Every variant, in declaration order.
    pub const ALL: [AlarmStatus; 3] = [
        AlarmStatus::NoAlarm,
        AlarmStatus::PendingAlarm,
        AlarmStatus::Alarm,
    ];

    /// Human-readable label shown by front ends.
    pub fn description(&self) -> &'static str {
        match self {
            AlarmStatus::NoAlarm => "Cool and Good",
            AlarmStatus::PendingAlarm => "I'm in Danger...",
            AlarmStatus::Alarm => "Awooga!",
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Kind of physical sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorType::Door => write!(f, "DOOR"),
            SensorType::Window => write!(f, "WINDOW"),
            SensorType::Motion => write!(f, "MOTION"),
        }
    }
}

impl FromStr for SensorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "door" => Ok(SensorType::Door),
            "window" => Ok(SensorType::Window),
            "motion" => Ok(SensorType::Motion),
            other => Err(format!("unknown sensor type '{other}'")),
        }
    }
}

/// A door, window or motion sensor.
///
/// The `name` is the sensor's identity: equality, ordering and hashing look
/// at the name only, so the same sensor compares equal whatever its `active`
/// flag. Toggle `active` through the security service, never directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub name: String,
    pub sensor_type: SensorType,
    #[serde(default)]
    pub active: bool,
}

impl Sensor {
    /// Create an inactive sensor.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            name: name.into(),
            sensor_type,
            active: false,
        }
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Sensor {}

impl Hash for Sensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Sensor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sensor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// A raw camera frame submitted for cat detection. The pixel layout is
/// opaque to everything except the detector.
#[derive(Debug, Clone, Default)]
pub struct CameraImage {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    pub data: Vec<u8>,
}

impl CameraImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// `true` when the frame carries no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}

/// Error type shared by every collaborator of the security service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatpointError {
    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Image detector error: {0}")]
    Detector(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sensor_identity_is_name_only() {
        let a = Sensor::new("Front Door", SensorType::Door);
        let mut b = Sensor::new("Front Door", SensorType::Window);
        b.active = true;
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn sensors_order_by_name() {
        let mut sensors = vec![
            Sensor::new("Window", SensorType::Window),
            Sensor::new("Door", SensorType::Door),
            Sensor::new("Hall", SensorType::Motion),
        ];
        sensors.sort();
        let names: Vec<_> = sensors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Door", "Hall", "Window"]);
    }

    #[test]
    fn new_sensor_is_inactive() {
        assert!(!Sensor::new("Door", SensorType::Door).active);
    }

    #[test]
    fn sensor_type_parses_case_insensitively() {
        assert_eq!("door".parse::<SensorType>(), Ok(SensorType::Door));
        assert_eq!("WINDOW".parse::<SensorType>(), Ok(SensorType::Window));
        assert_eq!("Motion".parse::<SensorType>(), Ok(SensorType::Motion));
        assert!("garage".parse::<SensorType>().is_err());
    }

    #[test]
    fn status_enums_serialize_screaming_snake_case() {
        let json = serde_json::to_string(&ArmingStatus::ArmedHome).unwrap();
        assert_eq!(json, "\"ARMED_HOME\"");
        let back: AlarmStatus = serde_json::from_str("\"PENDING_ALARM\"").unwrap();
        assert_eq!(back, AlarmStatus::PendingAlarm);
    }

    #[test]
    fn sensor_active_defaults_when_missing() {
        let sensor: Sensor =
            serde_json::from_str(r#"{"name":"Door","sensor_type":"DOOR"}"#).unwrap();
        assert!(!sensor.active);
        assert_eq!(sensor.sensor_type, SensorType::Door);
    }

    #[test]
    fn defaults_are_disarmed_and_quiet() {
        assert_eq!(ArmingStatus::default(), ArmingStatus::Disarmed);
        assert_eq!(AlarmStatus::default(), AlarmStatus::NoAlarm);
        assert!(!ArmingStatus::Disarmed.is_armed());
        assert!(ArmingStatus::ArmedAway.is_armed());
    }

    #[test]
    fn empty_image_detection() {
        assert!(CameraImage::default().is_empty());
        assert!(CameraImage::new(4, 0, vec![1]).is_empty());
        assert!(!CameraImage::new(1, 1, vec![0]).is_empty());
    }

    #[test]
    fn catpoint_error_display() {
        let err = CatpointError::UnknownSensor("Garage".to_string());
        assert!(err.to_string().contains("Garage"));
        let err = CatpointError::Detector("timeout".to_string());
        assert!(err.to_string().contains("timeout"));
    }
}
