use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::DataTypeInfo;
use crate::oceantea::AllDataTypesResponse;

pub const KNOWN_DATA_TYPES: [&str; 14] = [
    "conductivity",
    "temperature",
    "pressure",
    "pH",
    "fluorescence",
    "turbidity",
    "oxygen",
    "saturation",
    "practicalSalinity",
    "absoluteSalinity",
    "potentialTemperature",
    "conservativeTemperature",
    "soundSpeed",
    "potentialDensityAnomaly",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataTypeCatalog {
    entries: BTreeMap<String, DataTypeInfo>,
}

impl DataTypeCatalog {
    pub fn known() -> &'static [&'static str] {
        &KNOWN_DATA_TYPES
    }

    pub fn from_entries(entries: impl IntoIterator<Item = DataTypeInfo>) -> Self {
        let entries = entries
            .into_iter()
            .filter(|info| is_known(&info.name))
            .map(|info| (info.name.clone(), info))
            .collect();
        Self { entries }
    }

    pub fn from_response(
        response: AllDataTypesResponse,
        unit_overrides: &BTreeMap<String, String>,
    ) -> Self {
        let mut infos = Vec::with_capacity(KNOWN_DATA_TYPES.len());
        for (name, entry) in response.entries {
            if !is_known(&name) {
                tracing::warn!(data_type = %name, "ignoring data type not in the known catalog");
                continue;
            }
            let unit = unit_overrides.get(&name).cloned().unwrap_or(entry.unit);
            infos.push(DataTypeInfo::new(name, entry.print_name, unit));
        }
        for name in KNOWN_DATA_TYPES {
            if !infos.iter().any(|info| info.name == name) {
                tracing::debug!(data_type = name, "known data type missing from response");
            }
        }
        Self::from_entries(infos)
    }

    /// Never fails: a miss yields the `unknown` placeholder.
    pub fn lookup(&self, name: &str) -> DataTypeInfo {
        self.entries
            .get(name)
            .cloned()
            .unwrap_or_else(|| DataTypeInfo::unknown(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataTypeInfo> {
        self.entries.values()
    }
}

fn is_known(name: &str) -> bool {
    KNOWN_DATA_TYPES.contains(&name)
}
