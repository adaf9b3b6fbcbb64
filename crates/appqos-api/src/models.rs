//! AppQoS resource models.
//!
//! Every field is optional. An absent field is left out of request payloads
//! entirely, so a partial update never clears a value on the service, and an
//! empty list stays distinct from a missing one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A model addressable under its own AppQoS collection.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection path segment, e.g. `pools`.
    const COLLECTION: &'static str;

    /// Human-readable name used in log lines and error messages.
    const KIND: &'static str;
}

/// An allocation group: cache and memory bandwidth limits plus the cores and
/// apps assigned to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pool {
    /// Pool name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Server-assigned identifier; absent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Apps bound to the pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apps: Option<Vec<App>>,
    /// Cache bitmask (L3 CAT ways).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbm: Option<u64>,
    /// Memory bandwidth allocation, percentage mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mba: Option<u32>,
    /// Memory bandwidth allocation, MBps mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mba_bw: Option<u32>,
    /// Cores assigned to the pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<Vec<u32>>,
    /// Power profile applied to the pool's cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_profile: Option<PowerProfile>,
}

impl Pool {
    /// Set the pool name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the pool id.
    #[must_use]
    pub const fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the member apps.
    #[must_use]
    pub fn with_apps(mut self, apps: Vec<App>) -> Self {
        self.apps = Some(apps);
        self
    }

    /// Set the cache bitmask.
    #[must_use]
    pub const fn with_cbm(mut self, cbm: u64) -> Self {
        self.cbm = Some(cbm);
        self
    }

    /// Set the memory bandwidth percentage.
    #[must_use]
    pub const fn with_mba(mut self, mba: u32) -> Self {
        self.mba = Some(mba);
        self
    }

    /// Set the memory bandwidth in MBps.
    #[must_use]
    pub const fn with_mba_bw(mut self, mba_bw: u32) -> Self {
        self.mba_bw = Some(mba_bw);
        self
    }

    /// Set the assigned cores.
    #[must_use]
    pub fn with_cores(mut self, cores: Vec<u32>) -> Self {
        self.cores = Some(cores);
        self
    }

    /// Set the power profile.
    #[must_use]
    pub fn with_power_profile(mut self, profile: PowerProfile) -> Self {
        self.power_profile = Some(profile);
        self
    }
}

impl Resource for Pool {
    const COLLECTION: &'static str = "pools";
    const KIND: &'static str = "pool";
}

/// A CPU frequency and energy-performance policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PowerProfile {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Profile name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Minimum core frequency (MHz).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_freq: Option<u32>,
    /// Maximum core frequency (MHz).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_freq: Option<u32>,
    /// Energy-performance preference, e.g. `performance` or `power`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epp: Option<String>,
}

impl PowerProfile {
    /// Set the profile id.
    #[must_use]
    pub const fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the profile name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the frequency bounds.
    #[must_use]
    pub const fn with_frequencies(mut self, min_freq: u32, max_freq: u32) -> Self {
        self.min_freq = Some(min_freq);
        self.max_freq = Some(max_freq);
        self
    }

    /// Set the energy-performance preference.
    #[must_use]
    pub fn with_epp(mut self, epp: impl Into<String>) -> Self {
        self.epp = Some(epp.into());
        self
    }
}

impl Resource for PowerProfile {
    const COLLECTION: &'static str = "power_profiles";
    const KIND: &'static str = "power profile";
}

/// A workload bound to a pool by process ids and/or cores.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    /// Server-assigned identifier; absent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Owning pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<u32>,
    /// App name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cores the app is pinned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<Vec<u32>>,
    /// Process ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pids: Option<Vec<u32>>,
}

impl App {
    /// Set the app id.
    #[must_use]
    pub const fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the owning pool.
    #[must_use]
    pub const fn with_pool_id(mut self, pool_id: u32) -> Self {
        self.pool_id = Some(pool_id);
        self
    }

    /// Set the app name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the pinned cores.
    #[must_use]
    pub fn with_cores(mut self, cores: Vec<u32>) -> Self {
        self.cores = Some(cores);
        self
    }

    /// Set the process ids.
    #[must_use]
    pub fn with_pids(mut self, pids: Vec<u32>) -> Self {
        self.pids = Some(pids);
        self
    }
}

impl Resource for App {
    const COLLECTION: &'static str = "apps";
    const KIND: &'static str = "app";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted() {
        let pool = Pool::default().with_cores(vec![0, 1, 2, 3]).with_cbm(2047);
        let value = serde_json::to_value(&pool).unwrap();
        assert_eq!(value, json!({"cores": [0, 1, 2, 3], "cbm": 2047}));
    }

    #[test]
    fn empty_list_is_not_absent() {
        let pool = Pool::default().with_apps(Vec::new());
        let value = serde_json::to_value(&pool).unwrap();
        assert_eq!(value, json!({"apps": []}));

        let decoded: Pool = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.apps, Some(Vec::new()));
        assert!(decoded.cores.is_none());
    }

    #[test]
    fn null_decodes_as_absent() {
        let pool: Pool = serde_json::from_value(json!({
            "id": 1,
            "mba": null,
            "power_profile": null
        }))
        .unwrap();
        assert_eq!(pool.id, Some(1));
        assert!(pool.mba.is_none());
        assert!(pool.power_profile.is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let profile: PowerProfile = serde_json::from_value(json!({
            "id": 2,
            "name": "performance",
            "sstbf": true
        }))
        .unwrap();
        assert_eq!(profile, PowerProfile::default().with_id(2).with_name("performance"));
    }

    #[test]
    fn nested_power_profile_serialises_inline() {
        let pool = Pool::default().with_name("HP").with_power_profile(
            PowerProfile::default()
                .with_id(0)
                .with_frequencies(2600, 2800)
                .with_epp("performance"),
        );

        let value = serde_json::to_value(&pool).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "HP",
                "power_profile": {
                    "id": 0,
                    "min_freq": 2600,
                    "max_freq": 2800,
                    "epp": "performance"
                }
            })
        );
    }

    #[test]
    fn zero_values_are_kept() {
        let app = App::default().with_pool_id(0).with_pids(vec![]);
        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(value, json!({"pool_id": 0, "pids": []}));
    }

    #[test]
    fn collections() {
        assert_eq!(Pool::COLLECTION, "pools");
        assert_eq!(PowerProfile::COLLECTION, "power_profiles");
        assert_eq!(App::COLLECTION, "apps");
    }
}
