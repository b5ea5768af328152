//! Planner configuration: mix-profile day groups, range expansion bounds,
//! snapshot id namespace.
//!
//! Load from `{data_dir}/planner_config.json` with `PlannerConfig::load`.
//! In tests, use `PlannerConfig::default_test()`.

use crate::{representative::MixProfileType, types::WeekdayIndex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixProfileConfig {
    /// Days on which a WEEKDAY mix profile counts on both shifts.
    pub weekday_days: Vec<WeekdayIndex>,
    /// Days on which a WEEKEND mix profile counts on both shifts.
    pub weekend_days: Vec<WeekdayIndex>,
}

impl MixProfileConfig {
    pub fn applies(&self, profile: MixProfileType, weekday: WeekdayIndex) -> bool {
        match profile {
            MixProfileType::Weekday => self.weekday_days.contains(&weekday),
            MixProfileType::Weekend => self.weekend_days.contains(&weekday),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    pub mix_profiles: MixProfileConfig,
    /// Upper bound on calendar days scanned when expanding a counted-day range.
    pub max_range_scan_days: u32,
    /// Seed string for deterministic snapshot ids.
    pub snapshot_namespace: String,
}

impl PlannerConfig {
    /// Load from the data/ directory.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/planner_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: PlannerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.max_range_scan_days == 0 {
            anyhow::bail!("{path}: max_range_scan_days must be > 0");
        }
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mix_profiles: MixProfileConfig {
                weekday_days: vec![1, 2, 3, 4], // Mon-Thu
                weekend_days: vec![5, 6, 0],    // Fri-Sun
            },
            max_range_scan_days: 366,
            snapshot_namespace: "shiftdesk.weekly-snapshot".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_profile_covers_monday_to_thursday() {
        let cfg = PlannerConfig::default_test().mix_profiles;
        assert!(cfg.applies(MixProfileType::Weekday, 1));
        assert!(cfg.applies(MixProfileType::Weekday, 4));
        assert!(!cfg.applies(MixProfileType::Weekday, 5));
        assert!(!cfg.applies(MixProfileType::Weekday, 0));
        assert!(cfg.applies(MixProfileType::Weekend, 0));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
        assert_eq!(PlannerConfig::load(dir).unwrap(), PlannerConfig::default());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PlannerConfig::load("/nonexistent-planner-dir").unwrap_err();
        assert!(err.to_string().contains("planner_config.json"));
    }
}
