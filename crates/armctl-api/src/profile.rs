// API version profiles.
//
// Every ARM request carries an `api-version` query parameter. Azure Stack Hub
// only serves the versions pinned by its hybrid profiles, so the version set
// travels with the client rather than being hard-coded per endpoint.

use std::str::FromStr;

/// Per-service `api-version` values used by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiProfile {
    /// Human-readable profile name (`hybrid-2018-03-01`, `latest`, or `custom`).
    pub name: String,
    /// `Microsoft.Network` api-version.
    pub network: String,
    /// `Microsoft.Resources` api-version (resource groups, providers).
    pub resources: String,
}

impl ApiProfile {
    /// The 2018-03-01 hybrid profile (Azure Stack Hub 1808+).
    pub fn hybrid_2018_03_01() -> Self {
        Self {
            name: "hybrid-2018-03-01".into(),
            network: "2017-10-01".into(),
            resources: "2018-02-01".into(),
        }
    }

    /// Recent public-cloud versions.
    pub fn latest() -> Self {
        Self {
            name: "latest".into(),
            network: "2024-01-01".into(),
            resources: "2024-03-01".into(),
        }
    }

    /// Explicit version pair, for hubs that lag behind both named profiles.
    pub fn custom(network: impl Into<String>, resources: impl Into<String>) -> Self {
        Self {
            name: "custom".into(),
            network: network.into(),
            resources: resources.into(),
        }
    }
}

impl Default for ApiProfile {
    fn default() -> Self {
        Self::hybrid_2018_03_01()
    }
}

impl FromStr for ApiProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hybrid-2018-03-01" | "2018-03-01-hybrid" | "hybrid" => Ok(Self::hybrid_2018_03_01()),
            "latest" => Ok(Self::latest()),
            other => Err(format!(
                "unknown API profile '{other}' (expected 'hybrid-2018-03-01' or 'latest')"
            )),
        }
    }
}
