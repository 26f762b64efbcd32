//! Client for the service-type catalog, an external HTTP collaborator.
//!
//! Offering creation uses it to aggregate component costs into a default
//! base price when the caller does not supply one.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Deserializer};
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::ServiceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentCost {
    #[serde(default, deserialize_with = "lenient_cost")]
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
struct ComponentsResponse {
    data: ComponentsData,
}

#[derive(Debug, Deserialize)]
struct ComponentsData {
    #[serde(rename = "ServiceTypeComponents", default)]
    components: Vec<ComponentCost>,
}

/// The catalog serializes decimal costs as strings and omits or nulls
/// missing ones; accept every form, treating the unparseable as zero.
fn lenient_cost<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }
    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) => Ok(s.parse().unwrap_or(0.0)),
        None => Ok(0.0),
    }
}

#[derive(Clone)]
pub struct ComponentCatalog {
    base_url: String,
    http: reqwest::Client,
}

impl ComponentCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, http: reqwest::Client::new() }
    }

    /// Fetch the components attached to a service type, forwarding the
    /// caller's authorization header when present.
    pub async fn fetch_components(
        &self,
        service_type_id: Uuid,
        auth: Option<&str>,
    ) -> Result<Vec<ComponentCost>, ServiceError> {
        let url = format!("{}/api/v1/types/{}/components", self.base_url, service_type_id);
        let mut request = self.http.get(&url).timeout(REQUEST_TIMEOUT);
        if let Some(token) = auth {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await.map_err(|err| {
            error!(%service_type_id, error = %err, "unable to reach the service type catalog");
            if err.is_timeout() || err.is_connect() {
                ServiceError::Dependency(
                    "unable to fetch component data to calculate price, please try again later"
                        .to_string(),
                )
            } else {
                ServiceError::Dependency(format!("component catalog request failed: {err}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::Dependency(format!(
                "component catalog returned {}",
                response.status()
            )));
        }

        let body: ComponentsResponse = response
            .json()
            .await
            .map_err(|err| ServiceError::Dependency(format!("invalid catalog response: {err}")))?;
        debug!(%service_type_id, count = body.data.components.len(), "fetched components");
        Ok(body.data.components)
    }
}

/// Sum of component costs, the default base price for an offering.
pub fn total_cost(components: &[ComponentCost]) -> f64 {
    components.iter().map(|c| c.cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_component_costs() {
        let body: ComponentsResponse = serde_json::from_str(
            r#"{"data": {"ServiceTypeComponents": [
                {"cost": 12.5},
                {"cost": "7.5"},
                {"cost": null}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(total_cost(&body.data.components), 20.0);
    }

    #[test]
    fn missing_component_list_means_zero_price() {
        let body: ComponentsResponse = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert_eq!(total_cost(&body.data.components), 0.0);
    }
}
