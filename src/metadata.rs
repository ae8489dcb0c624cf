use chrono::Datelike;
use serde::Serialize;

use crate::config::HarvestConfig;
use crate::domain::TimeSeries;
use crate::format::{format_depth, format_geo, format_instant};
use crate::stats::DatasetStats;

pub const RESEARCH_DATA_MIME_TYPE: &str = "application/json";
pub const RECORD_FORMAT: &str = "text/json";
pub const MOLAB_PUBLICATION_LINK: &str = "https://oceanrep.geomar.de/22245/";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub subjects: Vec<String>,
    pub geolocation: Geolocation,
    pub date_range: DateRange,
    pub research_data: ResearchData,
    pub publication_year: i32,
    pub language: String,
    pub formats: Vec<String>,
    pub web_links: Vec<WebLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geolocation {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub depth: f64,
    pub elevation: f64,
    pub place: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchData {
    pub url: String,
    pub label: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WebLinkKind {
    #[serde(rename = "ViewURL")]
    ViewUrl,
    Related,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebLink {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: WebLinkKind,
}

#[derive(Debug, Clone)]
pub struct MetadataAssembler {
    base_url: String,
    base_subjects: Vec<String>,
    language: String,
}

impl MetadataAssembler {
    pub fn new(config: &HarvestConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            base_subjects: config.base_subjects.clone(),
            language: config.language.clone(),
        }
    }

    pub fn assemble(&self, series: &TimeSeries, stats: &DatasetStats) -> MetadataRecord {
        let title = self.title(series);
        MetadataRecord {
            identifier: series.identifier.clone(),
            description: self.description(series, stats),
            subjects: self.subjects(series),
            geolocation: self.geolocation(series),
            date_range: self.date_range(stats),
            research_data: self.research_data(series),
            publication_year: self.publication_year(series),
            language: self.language.clone(),
            formats: vec![RECORD_FORMAT.to_string()],
            web_links: self.web_links(&title),
            title,
        }
    }

    pub fn download_url(&self, series: &TimeSeries) -> String {
        dataset_url(&self.base_url, series)
    }

    pub fn title(&self, series: &TimeSeries) -> String {
        format!(
            "{} measurements, underwater (depth {} m) in the region '{}'",
            series.data_type_print_name,
            format_depth(series.depth_meters),
            series.region_print_name
        )
    }

    pub fn subjects(&self, series: &TimeSeries) -> Vec<String> {
        let mut subjects = self.base_subjects.clone();
        subjects.extend([
            format!("MoLab {}", series.device),
            series.data_type_print_name.clone(),
            series.station.clone(),
            series.region_print_name.clone(),
        ]);
        subjects
    }

    pub fn description(&self, series: &TimeSeries, stats: &DatasetStats) -> String {
        let print_name = &series.data_type_print_name;
        let mut text = format!(
            "{print_name} time series data (from {} to {}) with {} measurement values. \
             The {print_name} measurements are given in the JSON format and relative (in seconds) \
             to timestamp '{}'. Data was collected in the open water region '{}': \
             geo location {} at a depth of {} m.",
            format_instant(&stats.start_instant),
            format_instant(&stats.stop_instant),
            stats.sample_count,
            format_instant(&series.reference_instant),
            series.region_print_name,
            format_geo(series.longitude, series.latitude),
            format_depth(series.depth_meters),
        );

        if stats.missing_count > 0 {
            text.push_str(&format!(
                " {} measurement points were missing ('NA').",
                stats.missing_count
            ));
        }
        if !series.data_type_unit.is_empty() {
            text.push_str(&format!(
                " The measurement unit is '{}'.",
                series.data_type_unit
            ));
        }
        text
    }

    pub fn research_data(&self, series: &TimeSeries) -> ResearchData {
        ResearchData {
            url: self.download_url(series),
            label: format!(
                "{} measurements, collected underwater (depth {} m) in the open water region '{}' by MoLab device {}",
                series.data_type_print_name,
                format_depth(series.depth_meters),
                series.region_print_name,
                series.device
            ),
            mime_type: RESEARCH_DATA_MIME_TYPE.to_string(),
        }
    }

    pub fn geolocation(&self, series: &TimeSeries) -> Geolocation {
        let point = series.geo_point();
        Geolocation {
            latitude: point.latitude,
            longitude: point.longitude,
            depth: series.depth_meters,
            elevation: point.elevation,
            place: format!("measurement region of {}", series.region_print_name),
        }
    }

    pub fn date_range(&self, stats: &DatasetStats) -> DateRange {
        DateRange {
            from: stats.start_instant.timestamp() * 1000,
            to: stats.stop_instant.timestamp() * 1000,
        }
    }

    /// OceanTEA has no publication date; the measurement year stands in.
    pub fn publication_year(&self, series: &TimeSeries) -> i32 {
        series.reference_instant.year()
    }

    pub fn web_links(&self, title: &str) -> Vec<WebLink> {
        vec![
            WebLink {
                url: format!("{}/", self.base_url),
                name: Some(title.to_string()),
                kind: WebLinkKind::ViewUrl,
            },
            WebLink {
                url: MOLAB_PUBLICATION_LINK.to_string(),
                name: None,
                kind: WebLinkKind::Related,
            },
        ]
    }
}

pub fn dataset_url(base_url: &str, series: &TimeSeries) -> String {
    format!(
        "{}/timeseries/{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        series.series_kind,
        series.station,
        series.data_type,
        format_depth(series.depth_meters)
    )
}
