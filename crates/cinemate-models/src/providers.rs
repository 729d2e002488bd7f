use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::movie::MovieId;

pub const DEFAULT_REGION: &str = "US";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub provider_id: u32,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: Option<u32>,
}

impl Provider {
    pub fn logo_url(&self, logo_base: &str) -> Option<String> {
        self.logo_path
            .as_deref()
            .map(|path| format!("{}{}", logo_base.trim_end_matches('/'), path))
    }
}

/// Availability for one country: subscription streaming, rental and purchase
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<Provider>,
    #[serde(default)]
    pub rent: Vec<Provider>,
    #[serde(default)]
    pub buy: Vec<Provider>,
}

impl RegionProviders {
    pub fn is_empty(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty() && self.buy.is_empty()
    }
}

/// Response of `movie/{id}/watch/providers`, keyed by ISO 3166-1 country code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProviders {
    pub id: MovieId,
    #[serde(default)]
    pub results: BTreeMap<String, RegionProviders>,
}

impl WatchProviders {
    pub fn regions(&self) -> Vec<&str> {
        self.results.keys().map(String::as_str).collect()
    }

    pub fn region(&self, code: &str) -> Option<&RegionProviders> {
        self.results.get(&code.to_uppercase())
    }

    /// Pick the region to display: the requested one if the movie is available
    /// there, then the default region, then the first available one.
    pub fn select_region(&self, preferred: &str) -> Option<&str> {
        let preferred = preferred.to_uppercase();
        if let Some((code, _)) = self.results.get_key_value(&preferred) {
            return Some(code.as_str());
        }
        if let Some((code, _)) = self.results.get_key_value(DEFAULT_REGION) {
            return Some(code.as_str());
        }
        self.results.keys().next().map(String::as_str)
    }
}
