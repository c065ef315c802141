//! Deferred OS update policy.
//!
//! Updates may start straight away during a quiet local-time window and are
//! pushed back by a fixed number of minutes at any other time of day.

use core::fmt;

use crate::config::HvacConfig;

/// What the OS wants to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateKind {
    App,
    #[default]
    System,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => write!(f, "App"),
            Self::System => write!(f, "System"),
        }
    }
}

impl core::str::FromStr for UpdateKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "app" => Ok(Self::App),
            "system" => Ok(Self::System),
            _ => Err(()),
        }
    }
}

/// Stage of the update the OS is notifying about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStatus {
    #[default]
    Pending,
    Final,
    Deferred,
    Complete,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Final => write!(f, "Final"),
            Self::Deferred => write!(f, "Deferred"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}

impl core::str::FromStr for UpdateStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "final" => Ok(Self::Final),
            "deferred" => Ok(Self::Deferred),
            "complete" => Ok(Self::Complete),
            _ => Err(()),
        }
    }
}

/// An update notification from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingUpdate {
    pub kind: UpdateKind,
    pub status: UpdateStatus,
    pub max_deferral_minutes: u32,
}

impl PendingUpdate {
    /// A pending system update, the usual notification.
    pub fn system(max_deferral_minutes: u32) -> Self {
        Self {
            kind: UpdateKind::System,
            status: UpdateStatus::Pending,
            max_deferral_minutes,
        }
    }
}

/// Local hour-of-day for a UTC hour and offset.
pub fn local_hour(utc_hour: u8, utc_offset_hours: i8) -> u8 {
    (i32::from(utc_hour) + i32::from(utc_offset_hours)).rem_euclid(24) as u8
}

/// Minutes to defer a pending update; zero means start now.
pub fn deferral_minutes(utc_hour: u8, config: &HvacConfig) -> u32 {
    let hour = local_hour(utc_hour, config.utc_offset_hours);
    if config.update_window.contains(i32::from(hour)) {
        0
    } else {
        config.update_defer_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_past_midnight() {
        assert_eq!(local_hour(20, 10), 6);
        assert_eq!(local_hour(2, -5), 21);
        assert_eq!(local_hour(23, 0), 23);
    }

    #[test]
    fn window_is_inclusive() {
        let config = HvacConfig::default();
        // 15:00 UTC is 01:00 at UTC+10.
        assert_eq!(deferral_minutes(15, &config), 0);
        // 19:00 UTC is 05:00.
        assert_eq!(deferral_minutes(19, &config), 0);
        // 20:00 UTC is 06:00.
        assert_eq!(deferral_minutes(20, &config), 15);
        // 14:00 UTC is midnight.
        assert_eq!(deferral_minutes(14, &config), 15);
    }

    #[test]
    fn kind_and_status_parse_case_insensitively() {
        assert_eq!("App".parse(), Ok(UpdateKind::App));
        assert_eq!("FINAL".parse(), Ok(UpdateStatus::Final));
        assert!("firmware".parse::<UpdateKind>().is_err());
        assert_eq!(UpdateStatus::Deferred.to_string(), "Deferred");
    }
}
