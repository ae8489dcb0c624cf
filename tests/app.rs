use std::fs;
use std::sync::Mutex;

use assert_matches::assert_matches;

use oceantea_harvester::app::{App, ProgressEvent, ProgressSink};
use oceantea_harvester::config::HarvestConfig;
use oceantea_harvester::error::HarvestError;
use oceantea_harvester::oceantea::{
    AllDataTypesResponse, AllSeriesResponse, DatasetResponse, OceanTeaClient,
};

struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        self.messages.lock().unwrap().push(event.message);
    }
}

fn fixture<T: serde::de::DeserializeOwned>(name: &str) -> T {
    let raw = fs::read_to_string(format!("tests/fixtures/{name}")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[derive(Default)]
struct FixtureClient;

impl OceanTeaClient for FixtureClient {
    fn fetch_data_types(&self) -> Result<AllDataTypesResponse, HarvestError> {
        Ok(fixture("datatypes.json"))
    }

    fn fetch_series(&self) -> Result<AllSeriesResponse, HarvestError> {
        Ok(fixture("timeseries.json"))
    }

    fn fetch_dataset(&self, url: &str) -> Result<DatasetResponse, HarvestError> {
        if url.contains("conductivity") {
            Ok(fixture("dataset.json"))
        } else {
            Ok(DatasetResponse::default())
        }
    }
}

struct RaggedClient;

impl OceanTeaClient for RaggedClient {
    fn fetch_data_types(&self) -> Result<AllDataTypesResponse, HarvestError> {
        Ok(AllDataTypesResponse::default())
    }

    fn fetch_series(&self) -> Result<AllSeriesResponse, HarvestError> {
        Ok(fixture("timeseries.json"))
    }

    fn fetch_dataset(&self, url: &str) -> Result<DatasetResponse, HarvestError> {
        let raw = if url.contains("conductivity") {
            r#"{"data": [[0, "1.5"], "garbage", [60, "NA"], null, [120, 2.5]]}"#
        } else {
            r#"{"data": null}"#
        };
        serde_json::from_str(raw).map_err(|err| HarvestError::ResponseParse(err.to_string()))
    }
}

struct FailingClient;

impl OceanTeaClient for FailingClient {
    fn fetch_data_types(&self) -> Result<AllDataTypesResponse, HarvestError> {
        Ok(fixture("datatypes.json"))
    }

    fn fetch_series(&self) -> Result<AllSeriesResponse, HarvestError> {
        Ok(fixture("timeseries.json"))
    }

    fn fetch_dataset(&self, _url: &str) -> Result<DatasetResponse, HarvestError> {
        Err(HarvestError::OceanTeaStatus {
            status: 503,
            message: "unavailable".to_string(),
        })
    }
}

#[test]
fn harvest_builds_one_record_per_scalar_series() {
    let app = App::new(HarvestConfig::default(), FixtureClient);
    let result = app.harvest(&NoopSink).unwrap();

    assert_eq!(result.total_series, 4);
    assert_eq!(result.version, "4");
    assert_eq!(result.excluded_non_scalar, 1);
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.rejected[0].index, 3);
    assert_eq!(result.rejected[0].station, "POS455-24");

    let identifiers: Vec<_> = result.records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["conductivity-0", "potentialDensityAnomaly-2"]);
}

#[test]
fn download_urls_follow_series_order() {
    let app = App::new(HarvestConfig::default(), FixtureClient);
    let urls = app.download_urls(&NoopSink).unwrap();
    assert_eq!(
        urls[0].url,
        "http://maui.se.informatik.uni-kiel.de:9090/timeseries/scalar/POS434-156/conductivity/215"
    );
    assert_eq!(
        urls[1].url,
        "http://maui.se.informatik.uni-kiel.de:9090/timeseries/scalar/POS455-23/potentialDensityAnomaly/214.5"
    );
}

#[test]
fn conductivity_record_reflects_dataset() {
    let app = App::new(HarvestConfig::default(), FixtureClient);
    let result = app.harvest(&NoopSink).unwrap();
    let record = &result.records[0];

    assert_eq!(
        record.title,
        "Conductivity measurements, underwater (depth 215 m) in the region 'Northern Norway'"
    );
    assert!(record.description.starts_with(
        "Conductivity time series data (from 2012-06-02T11:48:18Z to 2012-06-02T12:13:18Z) with 5 measurement values."
    ));
    assert!(record.description.contains(" 1 measurement points were missing ('NA')."));
    assert!(record.description.ends_with(" The measurement unit is 'mS/cm'."));
    assert_eq!(record.publication_year, 2012);
    assert_eq!(record.geolocation.elevation, -215.0);
    assert_eq!(record.date_range.from, 1_338_637_698_000);
    assert_eq!(record.date_range.to, 1_338_639_198_000);
    assert!(record.subjects.contains(&"MoLab MLM".to_string()));
}

#[test]
fn empty_dataset_spans_reference_instant() {
    let app = App::new(HarvestConfig::default(), FixtureClient);
    let result = app.harvest(&NoopSink).unwrap();
    let record = &result.records[1];

    // 2013-05-30T23:38:23Z
    assert_eq!(record.date_range.from, 1_369_957_103_000);
    assert_eq!(record.date_range.to, record.date_range.from);
    assert!(record.description.contains("with 0 measurement values."));
    assert!(!record.description.contains("missing"));
    assert!(record.description.ends_with(" The measurement unit is 'kg/m^3'."));
}

#[test]
fn series_listing_reports_rejections() {
    let app = App::new(HarvestConfig::default(), FixtureClient);
    let listing = app.series(&NoopSink).unwrap();
    assert_eq!(listing.series.len(), 2);
    assert_eq!(listing.rejected.len(), 1);
    assert!(listing.rejected[0].reason.contains("30/05/2013"));
}

#[test]
fn malformed_dataset_rows_count_as_missing() {
    let app = App::new(HarvestConfig::default(), RaggedClient);
    let result = app.harvest(&NoopSink).unwrap();

    assert_eq!(result.records.len(), 2);
    let conductivity = &result.records[0];
    assert!(conductivity.description.contains("with 2 measurement values."));
    assert!(conductivity.description.contains(" 3 measurement points were missing ('NA')."));
    assert_eq!(
        conductivity.date_range.to - conductivity.date_range.from,
        120_000
    );
    assert!(conductivity.title.starts_with("unknown measurements"));
    assert!(result.records[1].description.contains("with 0 measurement values."));
}

#[test]
fn dataset_transport_failure_aborts_harvest() {
    let app = App::new(HarvestConfig::default(), FailingClient);
    let err = app.harvest(&NoopSink).unwrap_err();
    assert_matches!(err, HarvestError::OceanTeaStatus { status: 503, .. });
}

#[test]
fn progress_events_cover_each_series() {
    let sink = RecordingSink::default();
    let app = App::new(HarvestConfig::default(), FixtureClient);
    app.harvest(&sink).unwrap();
    let messages = sink.messages.lock().unwrap();
    assert!(messages.iter().any(|m| m == "phase=Harvest; 1/2 conductivity-0"));
    assert!(messages.iter().any(|m| m == "phase=Harvest; 2/2 potentialDensityAnomaly-2"));
}
