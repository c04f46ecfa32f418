//! Configuration Vault – reads/writes `~/.catpoint/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use catpoint_image::{FakeImageService, ImageService, ScriptedImageService};
use catpoint_types::{Sensor, SensorType};

/// Which simulated classifier answers `/scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// Coin flip per image.
    #[default]
    Random,
    /// Every image shows a cat.
    Always,
    /// No image shows a cat.
    Never,
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectorKind::Random => write!(f, "random"),
            DetectorKind::Always => write!(f, "always"),
            DetectorKind::Never => write!(f, "never"),
        }
    }
}

impl FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(DetectorKind::Random),
            "always" => Ok(DetectorKind::Always),
            "never" => Ok(DetectorKind::Never),
            other => Err(format!("unknown detector '{other}' (random / always / never)")),
        }
    }
}

impl DetectorKind {
    /// Instantiate the classifier this kind names.
    pub fn build(self) -> Box<dyn ImageService> {
        match self {
            DetectorKind::Random => Box::new(FakeImageService::new()),
            DetectorKind::Always => Box::new(ScriptedImageService::always(true)),
            DetectorKind::Never => Box::new(ScriptedImageService::always(false)),
        }
    }
}

/// A sensor installed at start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name: String,
    pub sensor_type: SensorType,
}

impl SensorConfig {
    pub fn to_sensor(&self) -> Sensor {
        Sensor::new(self.name.clone(), self.sensor_type)
    }
}

/// Persisted user configuration stored in `~/.catpoint/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Simulated classifier used for camera scans.
    #[serde(default)]
    pub detector: DetectorKind,

    /// Sensors seeded into the in-memory repository.
    #[serde(default = "default_sensors")]
    pub sensors: Vec<SensorConfig>,
}

fn default_sensors() -> Vec<SensorConfig> {
    vec![
        SensorConfig {
            name: "Front Door".to_string(),
            sensor_type: SensorType::Door,
        },
        SensorConfig {
            name: "Kitchen Window".to_string(),
            sensor_type: SensorType::Window,
        },
        SensorConfig {
            name: "Hallway".to_string(),
            sensor_type: SensorType::Motion,
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorKind::default(),
            sensors: default_sensors(),
        }
    }
}

/// Return the path to `~/.catpoint/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".catpoint").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `CATPOINT_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `CATPOINT_DETECTOR` | `detector` (`random` / `always` / `never`) |
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("CATPOINT_DETECTOR")
        && let Ok(kind) = v.parse::<DetectorKind>()
    {
        cfg.detector = kind;
    }
}

/// Save the config to disk, creating `~/.catpoint/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.sensors, default_sensors());
    }

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let file_mode = std::fs::metadata(&path).expect("file metadata").permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = std::fs::metadata(path.parent().unwrap())
            .expect("dir metadata")
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn config_path_points_to_catpoint_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".catpoint"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn parses_hand_written_config() {
        let raw = r#"
            detector = "always"

            [[sensors]]
            name = "Garage"
            sensor_type = "DOOR"
        "#;
        let cfg: Config = toml::from_str(raw).expect("parse");
        assert_eq!(cfg.detector, DetectorKind::Always);
        assert_eq!(cfg.sensors.len(), 1);
        assert_eq!(cfg.sensors[0].to_sensor().name, "Garage");
        assert!(!cfg.sensors[0].to_sensor().active);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("").expect("parse");
        assert_eq!(cfg.detector, DetectorKind::Random);
        assert_eq!(cfg.sensors.len(), 3);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "detector = [").expect("write");
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn detector_kind_parses_case_insensitively() {
        assert_eq!("ALWAYS".parse::<DetectorKind>(), Ok(DetectorKind::Always));
        assert_eq!(" never ".parse::<DetectorKind>(), Ok(DetectorKind::Never));
        assert!("sometimes".parse::<DetectorKind>().is_err());
    }

    // Both env cases share one test so they cannot race on the variable.
    #[test]
    fn apply_env_overrides_detector() {
        // SAFETY: the only test touching CATPOINT_DETECTOR.
        unsafe { std::env::set_var("CATPOINT_DETECTOR", "never") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.detector, DetectorKind::Never);

        unsafe { std::env::set_var("CATPOINT_DETECTOR", "sometimes") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.detector, DetectorKind::Random);
        unsafe { std::env::remove_var("CATPOINT_DETECTOR") };
    }
}
