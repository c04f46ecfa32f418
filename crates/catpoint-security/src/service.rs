//! [`SecurityService`] – the alarm decision engine.
//!
//! Receives arming commands, sensor activation changes and camera images,
//! decides the resulting [`AlarmStatus`] and notifies every registered
//! [`StatusListener`].
//!
//! # Alarm state machine
//!
//! | Input | Precondition | Effect |
//! |---|---|---|
//! | sensor activated | armed, alarm ≠ `Alarm` | `NoAlarm` → `PendingAlarm`, `PendingAlarm` → `Alarm` |
//! | active sensor deactivated | alarm ≠ `Alarm` | `PendingAlarm` → `NoAlarm` |
//! | disarm | – | → `NoAlarm` |
//! | arm from disarmed | – | every sensor deactivated |
//! | arm home | cat flag set | → `Alarm` |
//! | image with cat | armed home | → `Alarm` |
//! | image without cat | all sensors inactive | → `NoAlarm` |
//!
//! `Alarm` is a sink for sensor events. Every forced transition writes and
//! notifies even when the value is unchanged.
//!
//! # Example
//!
//! ```
//! use catpoint_image::ScriptedImageService;
//! use catpoint_security::{InMemorySecurityRepository, SecurityService};
//! use catpoint_types::{AlarmStatus, ArmingStatus, Sensor, SensorType};
//!
//! let repo = InMemorySecurityRepository::new()
//!     .with_sensor(Sensor::new("Front Door", SensorType::Door));
//! let mut service = SecurityService::new(repo, ScriptedImageService::always(false));
//!
//! service.set_arming_status(ArmingStatus::ArmedAway).unwrap();
//!
//! let mut door = service.sensors().unwrap().remove(0);
//! service.change_sensor_activation_status(&mut door, true).unwrap();
//! assert_eq!(service.alarm_status().unwrap(), AlarmStatus::PendingAlarm);
//! ```

use std::sync::Arc;

use catpoint_image::ImageService;
use catpoint_types::{AlarmStatus, ArmingStatus, CameraImage, CatpointError, Sensor};
use tracing::{debug, info};

use crate::listener::{ListenerSet, StatusListener};
use crate::repository::SecurityRepository;

/// Confidence, in percent, the classifier must reach before an image counts
/// as showing a cat.
pub const CAT_CONFIDENCE_THRESHOLD: f32 = 50.0;

/// The alarm decision engine.
///
/// Owns its repository and detector. The cat flag lives here rather than in
/// the repository and starts out `false`.
pub struct SecurityService<R, I> {
    repository: R,
    image_service: I,
    listeners: ListenerSet,
    cat_detected: bool,
}

impl<R: SecurityRepository, I: ImageService> SecurityService<R, I> {
    pub fn new(repository: R, image_service: I) -> Self {
        Self {
            repository,
            image_service,
            listeners: ListenerSet::new(),
            cat_detected: false,
        }
    }

    /// Change the arming status.
    ///
    /// Disarming always forces [`AlarmStatus::NoAlarm`] without reading the
    /// current state. Arming from disarmed first deactivates every sensor.
    /// Arming home while the last image showed a cat forces
    /// [`AlarmStatus::Alarm`].
    ///
    /// # Errors
    ///
    /// Propagates repository failures. Steps applied before the failure are
    /// not rolled back.
    pub fn set_arming_status(&mut self, status: ArmingStatus) -> Result<(), CatpointError> {
        if status == ArmingStatus::Disarmed {
            self.repository.set_arming_status(status)?;
            return self.set_alarm_status(AlarmStatus::NoAlarm);
        }

        let was_disarmed = self.repository.arming_status()? == ArmingStatus::Disarmed;
        self.repository.set_arming_status(status)?;
        info!(arming = ?status, was_disarmed, "arming status set");

        if was_disarmed {
            self.deactivate_all_sensors()?;
        }
        if status == ArmingStatus::ArmedHome && self.cat_detected {
            self.set_alarm_status(AlarmStatus::Alarm)?;
        }
        Ok(())
    }

    /// Deactivate every known sensor, then send a single
    /// `sensor_status_changed` notification for the whole batch.
    fn deactivate_all_sensors(&mut self) -> Result<(), CatpointError> {
        for mut sensor in self.repository.sensors()? {
            self.change_sensor_activation_status(&mut sensor, false)?;
        }
        for listener in self.listeners.iter() {
            listener.sensor_status_changed();
        }
        Ok(())
    }

    /// Set `sensor`'s active flag and persist it, updating the alarm status
    /// first unless the alarm is already sounding.
    ///
    /// Activating a sensor while armed counts as a trip even when it was
    /// already active. Deactivating only matters for a sensor that was
    /// active. The sensor is written exactly once per call.
    ///
    /// # Errors
    ///
    /// Returns [`CatpointError::UnknownSensor`] from the repository when the
    /// sensor was never added. Alarm changes made before that are kept.
    pub fn change_sensor_activation_status(
        &mut self,
        sensor: &mut Sensor,
        active: bool,
    ) -> Result<(), CatpointError> {
        if self.repository.alarm_status()? != AlarmStatus::Alarm {
            if active && self.repository.arming_status()? != ArmingStatus::Disarmed {
                self.handle_sensor_activated()?;
            } else if sensor.active && !active {
                self.handle_sensor_deactivated()?;
            }
        }

        debug!(sensor = %sensor.name, from = sensor.active, to = active, "sensor toggled");
        sensor.active = active;
        self.repository.update_sensor(sensor)
    }

    fn handle_sensor_activated(&mut self) -> Result<(), CatpointError> {
        match self.repository.alarm_status()? {
            AlarmStatus::NoAlarm => self.set_alarm_status(AlarmStatus::PendingAlarm),
            AlarmStatus::PendingAlarm => self.set_alarm_status(AlarmStatus::Alarm),
            AlarmStatus::Alarm => Ok(()),
        }
    }

    fn handle_sensor_deactivated(&mut self) -> Result<(), CatpointError> {
        if self.repository.alarm_status()? == AlarmStatus::PendingAlarm {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }
        Ok(())
    }

    /// Classify `image` and react to the verdict.
    ///
    /// The verdict becomes the new cat flag. A cat while armed home forces
    /// [`AlarmStatus::Alarm`]; no cat with every sensor inactive forces
    /// [`AlarmStatus::NoAlarm`]. Listeners hear the verdict either way.
    ///
    /// # Errors
    ///
    /// Propagates detector and repository failures. A detector failure
    /// leaves the cat flag untouched.
    pub fn process_image(&mut self, image: &CameraImage) -> Result<(), CatpointError> {
        let cat = self
            .image_service
            .image_contains_cat(image, CAT_CONFIDENCE_THRESHOLD)?;
        self.cat_detected = cat;
        debug!(cat, "image classified");

        if cat && self.repository.arming_status()? == ArmingStatus::ArmedHome {
            self.set_alarm_status(AlarmStatus::Alarm)?;
        } else if !cat && self.all_sensors_inactive()? {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }

        for listener in self.listeners.iter() {
            listener.cat_detected(cat);
        }
        Ok(())
    }

    fn all_sensors_inactive(&self) -> Result<bool, CatpointError> {
        Ok(self.repository.sensors()?.iter().all(|s| !s.active))
    }

    /// Write `status` and notify every listener. This is the only path that
    /// changes the alarm status; repeated values are written again.
    pub fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<(), CatpointError> {
        self.repository.set_alarm_status(status)?;
        info!(alarm = ?status, "alarm status set");
        for listener in self.listeners.iter() {
            listener.notify(status);
        }
        Ok(())
    }

    pub fn alarm_status(&self) -> Result<AlarmStatus, CatpointError> {
        self.repository.alarm_status()
    }

    pub fn arming_status(&self) -> Result<ArmingStatus, CatpointError> {
        self.repository.arming_status()
    }

    pub fn sensors(&self) -> Result<Vec<Sensor>, CatpointError> {
        self.repository.sensors()
    }

    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<(), CatpointError> {
        self.repository.add_sensor(sensor)
    }

    pub fn remove_sensor(&mut self, sensor: &Sensor) -> Result<(), CatpointError> {
        self.repository.remove_sensor(sensor)
    }

    /// Register `listener`. Registering the same `Arc` twice is a no-op.
    pub fn add_status_listener(&mut self, listener: Arc<dyn StatusListener>) {
        self.listeners.add(listener);
    }

    /// Unregister `listener`. Unknown listeners are ignored.
    pub fn remove_status_listener(&mut self, listener: &Arc<dyn StatusListener>) {
        self.listeners.remove(listener);
    }

    /// Whether the most recently classified image showed a cat.
    pub fn is_cat_detected(&self) -> bool {
        self.cat_detected
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn image_service(&self) -> &I {
        &self.image_service
    }

    pub fn image_service_mut(&mut self) -> &mut I {
        &mut self.image_service
    }
}
