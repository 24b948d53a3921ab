//! Delay preset persistence
//!
//! The engine's only persistent state is the four scalar parameters; ring
//! contents are never saved (they reset to silence on `prepare`). A preset
//! is a small fixed-layout JSON record with a schema version so older
//! presets can be migrated forward and newer ones rejected cleanly.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dsp::DelayParams;
use crate::error::{EcholineError, Result};

/// Current schema version for preset files.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0";

fn default_schema_version() -> String {
    // Records written before versioning shipped are treated as 1.0.0.
    CURRENT_SCHEMA_VERSION.to_string()
}

/// Fixed-layout record of the four delay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayPreset {
    /// Schema version for migration support.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Timestamp when the preset was written.
    pub saved_at: DateTime<Utc>,

    /// Delay time in seconds, (0, 2.0]
    pub delay_time_secs: f32,
    /// Dry signal level, [0, 1]
    pub dry_mix: f32,
    /// Wet signal level, [0, 1]
    pub wet_mix: f32,
    /// Feedback amount, [0, 1)
    pub feedback: f32,
}

impl DelayPreset {
    /// Capture the current values of a parameter cell
    pub fn from_params(params: &DelayParams) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            delay_time_secs: params.delay_time(),
            dry_mix: params.dry_mix(),
            wet_mix: params.wet_mix(),
            feedback: params.feedback(),
        }
    }

    /// Push the preset's values into a parameter cell.
    ///
    /// Values pass through the cell's clamping setters, so a hand-edited
    /// preset with out-of-range numbers lands on the nearest valid value.
    pub fn apply(&self, params: &DelayParams) {
        params.set_delay_time(self.delay_time_secs);
        params.set_dry_mix(self.dry_mix);
        params.set_wet_mix(self.wet_mix);
        params.set_feedback(self.feedback);
    }

    /// Write the preset as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a preset, migrating older schema versions forward
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EcholineError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        let migrated = migrate_preset(value)?;

        let preset: DelayPreset = serde_json::from_value(migrated)?;
        preset.validate()?;
        Ok(preset)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("delay_time_secs", self.delay_time_secs),
            ("dry_mix", self.dry_mix),
            ("wet_mix", self.wet_mix),
            ("feedback", self.feedback),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(EcholineError::InvalidPreset {
                    reason: format!("{} is not a finite number", name),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Schema migration
// ============================================================================

type MigrationFn = fn(Value) -> Result<Value>;

/// Migration steps keyed by source version, applied sequentially until the
/// record reaches `CURRENT_SCHEMA_VERSION`.
///
/// When a new schema version ships, add a step here that rewrites the JSON
/// from the previous layout and bumps `schema_version`.
fn migration_for(version: &str) -> Option<MigrationFn> {
    match version {
        // "0.9.0" => Some(migrate_0_9_0_to_1_0_0),
        _ => None,
    }
}

fn migrate_preset(mut value: Value) -> Result<Value> {
    loop {
        let version = value
            .get("schema_version")
            .and_then(Value::as_str)
            .unwrap_or(CURRENT_SCHEMA_VERSION)
            .to_string();

        if version == CURRENT_SCHEMA_VERSION {
            return Ok(value);
        }

        match migration_for(&version) {
            Some(step) => value = step(value)?,
            None => {
                return Err(EcholineError::UnsupportedPresetVersion {
                    version,
                    current: CURRENT_SCHEMA_VERSION.to_string(),
                })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_capture_and_apply() {
        let params = DelayParams::new(0.25, 0.9, 0.4, 0.6);
        let preset = DelayPreset::from_params(&params);

        let restored = DelayParams::default();
        preset.apply(&restored);

        assert_eq!(restored.delay_time(), 0.25);
        assert_eq!(restored.dry_mix(), 0.9);
        assert_eq!(restored.wet_mix(), 0.4);
        assert_eq!(restored.feedback(), 0.6);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slapback.json");

        let params = DelayParams::new(0.12, 1.0, 0.35, 0.2);
        let preset = DelayPreset::from_params(&params);
        preset.save(&path).unwrap();

        let loaded = DelayPreset::load(&path).unwrap();
        assert_eq!(loaded, preset);
    }

    #[test]
    fn test_load_missing_version_defaults_to_current() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{
                "saved_at": "2026-01-15T10:00:00Z",
                "delay_time_secs": 0.5,
                "dry_mix": 0.5,
                "wet_mix": 0.5,
                "feedback": 0.75
            }"#,
        )
        .unwrap();

        let preset = DelayPreset::load(&path).unwrap();
        assert_eq!(preset.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(preset.feedback, 0.75);
    }

    #[test]
    fn test_load_rejects_future_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        fs::write(
            &path,
            r#"{
                "schema_version": "9.0.0",
                "saved_at": "2026-01-15T10:00:00Z",
                "delay_time_secs": 0.5,
                "dry_mix": 0.5,
                "wet_mix": 0.5,
                "feedback": 0.75
            }"#,
        )
        .unwrap();

        assert!(matches!(
            DelayPreset::load(&path),
            Err(EcholineError::UnsupportedPresetVersion { .. })
        ));
    }

    #[test]
    fn test_load_rejects_non_finite_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nan.json");
        fs::write(
            &path,
            r#"{
                "schema_version": "1.0.0",
                "saved_at": "2026-01-15T10:00:00Z",
                "delay_time_secs": null,
                "dry_mix": 0.5,
                "wet_mix": 0.5,
                "feedback": 0.75
            }"#,
        )
        .unwrap();

        // null deserializes as an error before validate() even runs
        assert!(DelayPreset::load(&path).is_err());
    }

    #[test]
    fn test_apply_clamps_out_of_range_values() {
        let preset = DelayPreset {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
            delay_time_secs: 10.0,
            dry_mix: -1.0,
            wet_mix: 2.0,
            feedback: 1.5,
        };

        let params = DelayParams::default();
        preset.apply(&params);

        assert_eq!(params.delay_time(), 2.0);
        assert_eq!(params.dry_mix(), 0.0);
        assert_eq!(params.wet_mix(), 1.0);
        assert_eq!(params.feedback(), 0.99);
    }
}
