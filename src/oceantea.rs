use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::stats::RawSamplePair;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesRecord {
    pub region: String,
    pub region_print_name: String,
    pub device: String,
    pub station: String,
    pub data_type: String,
    #[serde(rename = "tsType")]
    pub series_kind: String,
    pub depth: f64,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "t_reference")]
    pub reference_timestamp: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AllSeriesResponse {
    #[serde(default)]
    pub timeseries: Vec<RawSeriesRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeResponse {
    pub print_name: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AllDataTypesResponse {
    pub entries: BTreeMap<String, DataTypeResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatasetResponse {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

impl DatasetResponse {
    /// Upstream sends offsets and values either as strings or as numbers.
    /// Both are normalized to text; short rows and rows that are not arrays
    /// become empty tokens.
    pub fn pairs(&self) -> Vec<RawSamplePair> {
        self.data
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|row| match row.as_array() {
                Some(row) => RawSamplePair {
                    offset: row.first().map(token_text).unwrap_or_default(),
                    value: row.get(1).map(token_text).unwrap_or_default(),
                },
                None => RawSamplePair::default(),
            })
            .collect()
    }
}

fn token_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

pub trait OceanTeaClient: Send + Sync {
    fn fetch_data_types(&self) -> Result<AllDataTypesResponse, HarvestError>;
    fn fetch_series(&self) -> Result<AllSeriesResponse, HarvestError>;
    fn fetch_dataset(&self, url: &str) -> Result<DatasetResponse, HarvestError>;
}

#[derive(Clone)]
pub struct OceanTeaHttpClient {
    client: Client,
    timeseries_url: String,
    datatypes_url: String,
}

impl OceanTeaHttpClient {
    pub fn new(config: &HarvestConfig) -> Result<Self, HarvestError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!(
                "oceantea-harvester/{}",
                env!("CARGO_PKG_VERSION")
            ))
            .map_err(|err| HarvestError::OceanTeaHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| HarvestError::OceanTeaHttp(err.to_string()))?;
        Ok(Self {
            client,
            timeseries_url: config.timeseries_url(),
            datatypes_url: config.datatypes_url(),
        })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, HarvestError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "OceanTEA request failed".to_string());
        Err(HarvestError::OceanTeaStatus { status, message })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HarvestError> {
        tracing::debug!(%url, "requesting");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| HarvestError::OceanTeaHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let body = response
            .text()
            .map_err(|err| HarvestError::OceanTeaHttp(err.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|err| HarvestError::ResponseParse(format!("{url}: {err}")))
    }
}

impl OceanTeaClient for OceanTeaHttpClient {
    fn fetch_data_types(&self) -> Result<AllDataTypesResponse, HarvestError> {
        self.get_json(&self.datatypes_url)
    }

    fn fetch_series(&self) -> Result<AllSeriesResponse, HarvestError> {
        self.get_json(&self.timeseries_url)
    }

    fn fetch_dataset(&self, url: &str) -> Result<DatasetResponse, HarvestError> {
        self.get_json(url)
    }
}
