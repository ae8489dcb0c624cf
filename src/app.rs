use std::time::{Duration, Instant};

use serde::Serialize;

use crate::catalog::DataTypeCatalog;
use crate::config::HarvestConfig;
use crate::domain::TimeSeries;
use crate::error::HarvestError;
use crate::merge::TimeSeriesMerger;
use crate::metadata::{MetadataAssembler, MetadataRecord};
use crate::oceantea::{OceanTeaClient, RawSeriesRecord};
use crate::stats::DatasetStats;

#[derive(Debug, Clone, Serialize)]
pub struct HarvestResult {
    pub version: String,
    pub total_series: usize,
    pub excluded_non_scalar: usize,
    pub records: Vec<MetadataRecord>,
    pub rejected: Vec<RejectedSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesListing {
    pub total_series: usize,
    pub excluded_non_scalar: usize,
    pub series: Vec<TimeSeries>,
    pub rejected: Vec<RejectedSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadUrlEntry {
    pub identifier: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedSeries {
    pub index: usize,
    pub station: String,
    pub data_type: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy)]
pub enum ProgressSinkKind {
    Harvest,
    Series,
    DataTypes,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Incremental harvests compare this against the previous run. Upstream
/// series never change once published, so the count is enough.
pub fn harvest_version(total_series: usize) -> String {
    total_series.to_string()
}

#[derive(Clone)]
pub struct App<C: OceanTeaClient> {
    client: C,
    config: HarvestConfig,
    merger: TimeSeriesMerger,
    assembler: MetadataAssembler,
}

impl<C: OceanTeaClient> App<C> {
    pub fn new(config: HarvestConfig, client: C) -> Self {
        Self {
            merger: TimeSeriesMerger::new(config.non_scalar_kind.clone()),
            assembler: MetadataAssembler::new(&config),
            client,
            config,
        }
    }

    pub fn data_types(&self, sink: &dyn ProgressSink) -> Result<DataTypeCatalog, HarvestError> {
        let started = Instant::now();
        sink.event(ProgressEvent {
            message: "phase=Resolve; fetching data types".to_string(),
            elapsed: None,
        });
        let response = self.client.fetch_data_types()?;
        let catalog = DataTypeCatalog::from_response(response, &self.config.unit_overrides);
        if catalog.is_empty() {
            tracing::warn!("no known data types published; every series will be labelled unknown");
        }
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; {} data types", catalog.len()),
            elapsed: Some(started.elapsed()),
        });
        Ok(catalog)
    }

    pub fn series(&self, sink: &dyn ProgressSink) -> Result<SeriesListing, HarvestError> {
        let catalog = self.data_types(sink)?;
        let records = self.fetch_series(sink)?;
        Ok(self.merge(&records, &catalog))
    }

    pub fn download_urls(
        &self,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<DownloadUrlEntry>, HarvestError> {
        let listing = self.series(sink)?;
        Ok(listing
            .series
            .iter()
            .map(|series| DownloadUrlEntry {
                identifier: series.identifier.clone(),
                url: self.assembler.download_url(series),
            })
            .collect())
    }

    pub fn harvest(&self, sink: &dyn ProgressSink) -> Result<HarvestResult, HarvestError> {
        let listing = self.series(sink)?;
        let count = listing.series.len();
        let mut records = Vec::with_capacity(count);

        for (position, series) in listing.series.iter().enumerate() {
            let started = Instant::now();
            let record = self.harvest_series(series)?;
            sink.event(ProgressEvent {
                message: format!(
                    "phase=Harvest; {}/{} {}",
                    position + 1,
                    count,
                    series.identifier
                ),
                elapsed: Some(started.elapsed()),
            });
            records.push(record);
        }

        tracing::info!(
            records = records.len(),
            rejected = listing.rejected.len(),
            excluded = listing.excluded_non_scalar,
            "harvest complete"
        );

        Ok(HarvestResult {
            version: harvest_version(listing.total_series),
            total_series: listing.total_series,
            excluded_non_scalar: listing.excluded_non_scalar,
            records,
            rejected: listing.rejected,
        })
    }

    pub fn harvest_series(&self, series: &TimeSeries) -> Result<MetadataRecord, HarvestError> {
        let url = self.assembler.download_url(series);
        let dataset = self.client.fetch_dataset(&url)?;
        let stats = DatasetStats::compute(&dataset.pairs(), series.reference_instant);
        tracing::debug!(
            identifier = %series.identifier,
            samples = stats.sample_count,
            missing = stats.missing_count,
            "dataset summarized"
        );
        Ok(self.assembler.assemble(series, &stats))
    }

    fn fetch_series(&self, sink: &dyn ProgressSink) -> Result<Vec<RawSeriesRecord>, HarvestError> {
        let started = Instant::now();
        sink.event(ProgressEvent {
            message: "phase=Resolve; fetching time series".to_string(),
            elapsed: None,
        });
        let response = self.client.fetch_series()?;
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; {} time series", response.timeseries.len()),
            elapsed: Some(started.elapsed()),
        });
        Ok(response.timeseries)
    }

    fn merge(&self, records: &[RawSeriesRecord], catalog: &DataTypeCatalog) -> SeriesListing {
        let mut series = Vec::new();
        let mut rejected = Vec::new();

        for (index, merged) in self.merger.merge_each(records, catalog) {
            match merged {
                Ok(item) => series.push(item),
                Err(err) => {
                    let record = &records[index];
                    tracing::warn!(index, station = %record.station, "skipping series: {err}");
                    rejected.push(RejectedSeries {
                        index,
                        station: record.station.clone(),
                        data_type: record.data_type.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        SeriesListing {
            total_series: records.len(),
            excluded_non_scalar: self.merger.excluded_count(records),
            series,
            rejected,
        }
    }
}
