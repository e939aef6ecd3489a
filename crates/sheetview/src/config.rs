//! Engine configuration.
//!
//! The only setting that changes evaluation is the UTC offset used to decide
//! which calendar day an instant falls on. Date equality is "same calendar
//! day", so two instants an hour apart can be equal in one offset and not
//! in another.
//!
//! ```
//! use sheetview::EngineConfig;
//!
//! let config = EngineConfig::from_yaml_str("utcOffsetMinutes: 120").unwrap();
//! assert_eq!(config.utc_offset_minutes, 120);
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};

const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Settings shared by every resolution in a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    /// Offset from UTC, in minutes, of the workspace calendar.
    pub utc_offset_minutes: i32,
}

impl EngineConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ViewError::InvalidConfig(format!(
                "utcOffsetMinutes must be within ±{MAX_OFFSET_MINUTES}, got {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Builds the calendar described by this config.
    pub fn calendar(&self) -> Result<Calendar> {
        self.validate()?;
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .map(Calendar)
            .ok_or_else(|| {
                ViewError::InvalidConfig(format!(
                    "offset of {} minutes is not representable",
                    self.utc_offset_minutes
                ))
            })
    }
}

/// Maps instants to calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar(FixedOffset);

impl Calendar {
    /// The UTC calendar.
    pub fn utc() -> Self {
        Calendar(Utc.fix())
    }

    /// Returns the offset in use.
    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Returns the calendar day an instant falls on.
    pub fn day_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Returns `true` if both instants fall on the same calendar day.
    pub fn same_day(&self, a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
        self.day_of(a) == self.day_of(b)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Calendar::utc()
    }
}
