use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeInfo {
    pub name: String,
    pub print_name: String,
    pub unit: String,
}

impl DataTypeInfo {
    pub fn new(
        name: impl Into<String>,
        print_name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            print_name: print_name.into(),
            unit: unit.into(),
        }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, UNKNOWN, UNKNOWN)
    }

    pub fn is_unknown(&self) -> bool {
        self.print_name == UNKNOWN && self.unit == UNKNOWN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub elevation: f64,
}

/// Depth is kept positive-down; [`TimeSeries::geo_point`] flips the sign.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub identifier: String,
    pub region: String,
    pub region_print_name: String,
    pub device: String,
    pub station: String,
    pub data_type: String,
    pub data_type_print_name: String,
    pub data_type_unit: String,
    pub series_kind: String,
    pub depth_meters: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub reference_instant: DateTime<Utc>,
}

impl TimeSeries {
    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint {
            longitude: self.longitude,
            latitude: self.latitude,
            elevation: -self.depth_meters,
        }
    }
}
