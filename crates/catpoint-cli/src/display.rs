//! Console listener – prints service notifications as they happen.

use chrono::Local;
use colored::{ColoredString, Colorize};

use catpoint_security::StatusListener;
use catpoint_types::AlarmStatus;

/// [`StatusListener`] that writes a timestamped line per notification.
pub struct ConsoleListener;

impl StatusListener for ConsoleListener {
    fn notify(&self, status: AlarmStatus) {
        println!("  {} Alarm: {}", stamp(), paint_alarm(status));
    }

    fn cat_detected(&self, cat: bool) {
        let verdict = if cat {
            "DANGER - CAT DETECTED".red().bold()
        } else {
            "no cats spotted".green()
        };
        println!("  {} Camera: {}", stamp(), verdict);
    }

    fn sensor_status_changed(&self) {
        println!("  {} Sensors reset to inactive", stamp());
    }
}

/// Colour an alarm status the way the status bar shows it.
pub fn paint_alarm(status: AlarmStatus) -> ColoredString {
    match status {
        AlarmStatus::NoAlarm => status.description().green(),
        AlarmStatus::PendingAlarm => status.description().yellow(),
        AlarmStatus::Alarm => status.description().red().bold(),
    }
}

fn stamp() -> ColoredString {
    format!("[{}]", Local::now().format("%H:%M:%S")).dimmed()
}
