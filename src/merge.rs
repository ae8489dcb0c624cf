use chrono::{DateTime, Utc};

use crate::catalog::DataTypeCatalog;
use crate::domain::TimeSeries;
use crate::error::HarvestError;
use crate::oceantea::RawSeriesRecord;

#[derive(Debug, Clone)]
pub struct TimeSeriesMerger {
    non_scalar_kind: String,
}

impl TimeSeriesMerger {
    pub fn new(non_scalar_kind: impl Into<String>) -> Self {
        Self {
            non_scalar_kind: non_scalar_kind.into(),
        }
    }

    pub fn is_excluded(&self, record: &RawSeriesRecord) -> bool {
        record.series_kind.eq_ignore_ascii_case(&self.non_scalar_kind)
    }

    pub fn merge_all(
        &self,
        records: &[RawSeriesRecord],
        catalog: &DataTypeCatalog,
    ) -> Result<Vec<TimeSeries>, HarvestError> {
        self.merge_each(records, catalog)
            .map(|(_, merged)| merged)
            .collect()
    }

    /// Yields `(input index, result)` for each record that is not excluded,
    /// in input order.
    pub fn merge_each<'a>(
        &'a self,
        records: &'a [RawSeriesRecord],
        catalog: &'a DataTypeCatalog,
    ) -> impl Iterator<Item = (usize, Result<TimeSeries, HarvestError>)> + 'a {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| !self.is_excluded(record))
            .map(|(index, record)| (index, merge_record(index, record, catalog)))
    }

    pub fn excluded_count(&self, records: &[RawSeriesRecord]) -> usize {
        records
            .iter()
            .filter(|record| self.is_excluded(record))
            .count()
    }
}

pub fn merge_record(
    index: usize,
    record: &RawSeriesRecord,
    catalog: &DataTypeCatalog,
) -> Result<TimeSeries, HarvestError> {
    let reference_instant = parse_reference_instant(record)?;
    let info = catalog.lookup(&record.data_type);

    Ok(TimeSeries {
        identifier: series_identifier(&record.data_type, index),
        region: record.region.clone(),
        region_print_name: record.region_print_name.clone(),
        device: record.device.clone(),
        station: record.station.clone(),
        data_type: record.data_type.clone(),
        data_type_print_name: info.print_name,
        data_type_unit: info.unit,
        series_kind: record.series_kind.clone(),
        depth_meters: record.depth,
        latitude: record.lat,
        longitude: record.lon,
        reference_instant,
    })
}

pub fn series_identifier(data_type: &str, index: usize) -> String {
    format!("{data_type}-{index}")
}

fn parse_reference_instant(record: &RawSeriesRecord) -> Result<DateTime<Utc>, HarvestError> {
    let value = record.reference_timestamp.as_str();
    let malformed = |reason: String| HarvestError::MalformedTimestamp {
        station: record.station.clone(),
        data_type: record.data_type.clone(),
        value: value.to_string(),
        reason,
    };
    // chrono also takes a space between date and time
    if !matches!(value.as_bytes().get(10), Some(b'T' | b't')) {
        return Err(malformed("expected 'T' between date and time".to_string()));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| malformed(err.to_string()))
}
