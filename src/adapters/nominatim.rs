use crate::domain::model::{Coordinate, ProviderPlace};
use crate::domain::ports::{PlaceQuery, PlaceSearchProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("safepath/", env!("CARGO_PKG_VERSION"));

/// Nominatim `/search` 回傳的單筆結果（jsonv2）
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    extratags: Option<HashMap<String, String>>,
}

impl NominatimPlace {
    fn into_provider_place(self) -> Option<ProviderPlace> {
        let latitude = self.lat.parse::<f64>().ok()?;
        let longitude = self.lon.parse::<f64>().ok()?;

        // 有些 POI 沒有 name，只有 display_name 的第一段
        let name = self.name.filter(|n| !n.trim().is_empty()).or_else(|| {
            self.display_name
                .as_deref()
                .and_then(|d| d.split(',').next())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        });

        let tags = self.extratags.unwrap_or_default();
        let phone = tags
            .get("phone")
            .or_else(|| tags.get("contact:phone"))
            .cloned();
        let url = tags
            .get("website")
            .or_else(|| tags.get("contact:website"))
            .or_else(|| tags.get("url"))
            .cloned();

        Some(ProviderPlace {
            name,
            coordinate: Coordinate::new(latitude, longitude),
            phone,
            url,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_connect() {
        ProviderError::NoNetwork(error.to_string())
    } else if error.is_decode() {
        ProviderError::Decode(error.to_string())
    } else {
        ProviderError::Other(error.to_string())
    }
}

pub struct NominatimProvider {
    endpoint: String,
    client: Client,
}

impl NominatimProvider {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl PlaceSearchProvider for NominatimProvider {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<ProviderPlace>, ProviderError> {
        let (min_lon, min_lat, max_lon, max_lat) = query.region.bounding_box();
        let viewbox = format!("{},{},{},{}", min_lon, min_lat, max_lon, max_lat);
        let limit = query.limit.to_string();
        let url = format!("{}/search", self.endpoint);

        tracing::debug!("Making search request to: {} (q={})", url, query.query);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.query.as_str()),
                ("format", "jsonv2"),
                ("layer", "poi"),
                ("viewbox", viewbox.as_str()),
                ("bounded", "1"),
                ("extratags", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        tracing::debug!("Search response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let items: Vec<NominatimPlace> = response.json().await.map_err(map_transport_error)?;
        let total = items.len();
        let places: Vec<ProviderPlace> = items
            .into_iter()
            .filter_map(NominatimPlace::into_provider_place)
            .collect();
        if places.len() < total {
            tracing::warn!("Skipped {} results with invalid coordinates", total - places.len());
        }

        Ok(places)
    }
}
