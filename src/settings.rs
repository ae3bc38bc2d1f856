use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Billing and dashboard knobs. The flat hourly cost rate feeds project
/// yield figures; it lives here so profitability math never hardcodes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSettings {
    pub flat_hourly_cost_rate: f64,
    /// Monthly tracked-hours target used by payroll progress displays.
    pub mtd_target_hours: f64,
    /// Default window for the upcoming-deadlines panel.
    pub upcoming_window_days: i64,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            flat_hourly_cost_rate: 500.0,
            mtd_target_hours: 180.0,
            upcoming_window_days: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UserSettings {
    #[serde(default)]
    billing: BillingSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn billing(&self) -> BillingSettings {
        self.data.read().unwrap().billing.clone()
    }

    pub fn update_billing(&self, settings: BillingSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.billing = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

impl SettingsStore {
    #[allow(dead_code)]
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_a_file() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        let billing = store.billing();
        assert_eq!(billing.flat_hourly_cost_rate, 500.0);
        assert_eq!(billing.upcoming_window_days, 7);
    }

    #[test]
    fn updates_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update_billing(BillingSettings {
                flat_hourly_cost_rate: 650.0,
                ..BillingSettings::default()
            })
            .unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.billing().flat_hourly_cost_rate, 650.0);
    }
}
