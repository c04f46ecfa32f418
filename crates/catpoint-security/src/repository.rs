//! [`SecurityRepository`] – storage seam for arming state, alarm state and
//! the sensor collection.
//!
//! The security service never keeps durable state of its own; it reads and
//! writes everything through this trait. [`InMemorySecurityRepository`] is
//! the process-local implementation used by the shell and by tests.

use std::collections::BTreeSet;

use catpoint_types::{AlarmStatus, ArmingStatus, CatpointError, Sensor};

/// Persistent state of a security system.
///
/// All methods are synchronous; failures propagate unchanged to the caller
/// of the security service operation that triggered them.
pub trait SecurityRepository: Send {
    fn arming_status(&self) -> Result<ArmingStatus, CatpointError>;

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), CatpointError>;

    fn alarm_status(&self) -> Result<AlarmStatus, CatpointError>;

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), CatpointError>;

    /// Snapshot of every known sensor.
    fn sensors(&self) -> Result<Vec<Sensor>, CatpointError>;

    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), CatpointError>;

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), CatpointError>;

    /// Persist the current field values of `sensor`, keyed by its name.
    ///
    /// # Errors
    ///
    /// Returns [`CatpointError::UnknownSensor`] when no sensor with that name
    /// has been added.
    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), CatpointError>;
}

/// Process-local repository. Starts disarmed with no alarm and no sensors.
///
/// # Example
///
/// ```
/// use catpoint_security::repository::{InMemorySecurityRepository, SecurityRepository};
/// use catpoint_types::{ArmingStatus, Sensor, SensorType};
///
/// let repo = InMemorySecurityRepository::new()
///     .with_sensor(Sensor::new("Front Door", SensorType::Door));
///
/// assert_eq!(repo.arming_status().unwrap(), ArmingStatus::Disarmed);
/// assert_eq!(repo.sensors().unwrap().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemorySecurityRepository {
    arming_status: ArmingStatus,
    alarm_status: AlarmStatus,
    sensors: BTreeSet<Sensor>,
}

impl InMemorySecurityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper that seeds a sensor.
    pub fn with_sensor(mut self, sensor: Sensor) -> Self {
        self.sensors.replace(sensor);
        self
    }

    /// Look a sensor up by name.
    pub fn sensor(&self, name: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.name == name)
    }
}

impl SecurityRepository for InMemorySecurityRepository {
    fn arming_status(&self) -> Result<ArmingStatus, CatpointError> {
        Ok(self.arming_status)
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), CatpointError> {
        self.arming_status = status;
        Ok(())
    }

    fn alarm_status(&self) -> Result<AlarmStatus, CatpointError> {
        Ok(self.alarm_status)
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), CatpointError> {
        self.alarm_status = status;
        Ok(())
    }

    fn sensors(&self) -> Result<Vec<Sensor>, CatpointError> {
        Ok(self.sensors.iter().cloned().collect())
    }

    /// Adding a sensor whose name is already known replaces the stored one.
    fn add_sensor(&mut self, sensor: Sensor) -> Result<(), CatpointError> {
        self.sensors.replace(sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), CatpointError> {
        self.sensors.remove(sensor);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: &Sensor) -> Result<(), CatpointError> {
        if !self.sensors.contains(sensor) {
            return Err(CatpointError::UnknownSensor(sensor.name.clone()));
        }
        self.sensors.replace(sensor.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catpoint_types::SensorType;

    #[test]
    fn fresh_repository_is_disarmed_and_quiet() {
        let repo = InMemorySecurityRepository::new();
        assert_eq!(repo.arming_status().unwrap(), ArmingStatus::Disarmed);
        assert_eq!(repo.alarm_status().unwrap(), AlarmStatus::NoAlarm);
        assert!(repo.sensors().unwrap().is_empty());
    }

    #[test]
    fn status_setters_round_trip() {
        let mut repo = InMemorySecurityRepository::new();
        repo.set_arming_status(ArmingStatus::ArmedAway).unwrap();
        repo.set_alarm_status(AlarmStatus::PendingAlarm).unwrap();
        assert_eq!(repo.arming_status().unwrap(), ArmingStatus::ArmedAway);
        assert_eq!(repo.alarm_status().unwrap(), AlarmStatus::PendingAlarm);
    }

    #[test]
    fn sensors_are_listed_by_name() {
        let repo = InMemorySecurityRepository::new()
            .with_sensor(Sensor::new("Window", SensorType::Window))
            .with_sensor(Sensor::new("Door", SensorType::Door));
        let names: Vec<_> = repo.sensors().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Door", "Window"]);
    }

    #[test]
    fn update_sensor_persists_active_flag() {
        let mut repo =
            InMemorySecurityRepository::new().with_sensor(Sensor::new("Door", SensorType::Door));
        let mut door = Sensor::new("Door", SensorType::Door);
        door.active = true;
        repo.update_sensor(&door).unwrap();
        assert!(repo.sensor("Door").unwrap().active);
    }

    #[test]
    fn update_unknown_sensor_is_rejected() {
        let mut repo = InMemorySecurityRepository::new();
        let result = repo.update_sensor(&Sensor::new("Garage", SensorType::Door));
        assert_eq!(result, Err(CatpointError::UnknownSensor("Garage".to_string())));
    }

    #[test]
    fn add_replaces_sensor_with_same_name() {
        let mut repo = InMemorySecurityRepository::new();
        repo.add_sensor(Sensor::new("Hall", SensorType::Door)).unwrap();
        repo.add_sensor(Sensor::new("Hall", SensorType::Motion)).unwrap();
        let sensors = repo.sensors().unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].sensor_type, SensorType::Motion);
    }

    #[test]
    fn remove_unknown_sensor_is_noop() {
        let mut repo =
            InMemorySecurityRepository::new().with_sensor(Sensor::new("Door", SensorType::Door));
        repo.remove_sensor(&Sensor::new("Ghost", SensorType::Window)).unwrap();
        assert_eq!(repo.sensors().unwrap().len(), 1);
        repo.remove_sensor(&Sensor::new("Door", SensorType::Door)).unwrap();
        assert!(repo.sensors().unwrap().is_empty());
    }
}
