//! Scheduling configuration (operating window, slot grid, default
//! duration).
//!
//! The 60-minute default duration is a business assumption, not a derived
//! constant, so it stays configurable.

use serde::Deserialize;

use crate::domain::scheduling::ScheduleGrid;

use super::error::ValidationError;

/// Operating window and slot grid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Opening hour (24h clock).
    pub open_hour: u32,

    /// Closing hour (24h clock).
    pub close_hour: u32,

    /// Slot grid step in minutes.
    pub slot_minutes: u32,

    /// Duration assumed for bookings without services.
    pub default_duration_minutes: u32,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 18,
            slot_minutes: 30,
            default_duration_minutes: 60,
        }
    }
}

impl SchedulingConfig {
    pub fn grid(&self) -> ScheduleGrid {
        ScheduleGrid {
            open_minutes: self.open_hour * 60,
            close_minutes: self.close_hour * 60,
            step_minutes: self.slot_minutes,
            default_duration_minutes: self.default_duration_minutes,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.close_hour <= self.open_hour || self.close_hour > 24 {
            return Err(ValidationError::invalid(
                "scheduling.close_hour",
                "must be after open_hour and at most 24",
            ));
        }
        if self.slot_minutes == 0 {
            return Err(ValidationError::invalid(
                "scheduling.slot_minutes",
                "must be at least 1",
            ));
        }
        if self.default_duration_minutes == 0 {
            return Err(ValidationError::invalid(
                "scheduling.default_duration_minutes",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_nine_to_six_on_half_hours() {
        let grid = SchedulingConfig::default().grid();
        assert_eq!(grid.open_minutes, 540);
        assert_eq!(grid.close_minutes, 1080);
        assert_eq!(grid.step_minutes, 30);
        assert_eq!(grid.default_duration_minutes, 60);
    }

    #[test]
    fn inverted_window_fails_validation() {
        let config = SchedulingConfig {
            open_hour: 18,
            close_hour: 9,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
