use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};

use oceantea_harvester::config::HarvestConfig;
use oceantea_harvester::domain::TimeSeries;
use oceantea_harvester::metadata::MetadataAssembler;
use oceantea_harvester::output::RecordWriter;
use oceantea_harvester::stats::{DatasetStats, RawSamplePair};

fn series(identifier: &str) -> TimeSeries {
    TimeSeries {
        identifier: identifier.to_string(),
        region: "lofoten".to_string(),
        region_print_name: "Lofoten".to_string(),
        device: "CTD".to_string(),
        station: "POS455-23".to_string(),
        data_type: "temperature".to_string(),
        data_type_print_name: "Temperature".to_string(),
        data_type_unit: "°C".to_string(),
        series_kind: "scalar".to_string(),
        depth_meters: 100.0,
        latitude: 68.9169,
        longitude: 14.3502,
        reference_instant: Utc.with_ymd_and_hms(2013, 5, 30, 23, 38, 23).unwrap(),
    }
}

#[test]
fn writes_one_file_per_record() {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().join("records")).unwrap();
    let writer = RecordWriter::new(root.clone());
    let assembler = MetadataAssembler::new(&HarvestConfig::default());

    let records: Vec<_> = ["temperature-0", "temperature-1"]
        .iter()
        .map(|id| {
            let series = series(id);
            let stats = DatasetStats::compute(
                &[RawSamplePair::new("0", "4.2"), RawSamplePair::new("600", "4.3")],
                series.reference_instant,
            );
            assembler.assemble(&series, &stats)
        })
        .collect();

    let paths = writer.write_all(&records).unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("temperature-0.json"));

    let raw = std::fs::read_to_string(paths[1].as_std_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["identifier"], "temperature-1");
    assert_eq!(json["geolocation"]["depth"], 100.0);
    assert_eq!(
        json["researchData"]["url"],
        "http://maui.se.informatik.uni-kiel.de:9090/timeseries/scalar/POS455-23/temperature/100"
    );

    let leftovers = std::fs::read_dir(root.as_std_path()).unwrap().count();
    assert_eq!(leftovers, 2);
}
