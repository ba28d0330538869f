use serde::Serialize;

use tcdb_core::types::Station;

#[derive(Serialize)]
pub(crate) struct ValidateJson<'a> {
    pub(crate) ok: bool,
    pub(crate) path: &'a str,
    pub(crate) error: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct InfoJson<'a> {
    pub(crate) path: &'a str,
    pub(crate) version: Option<&'a str>,
    pub(crate) last_modified: Option<&'a str>,
    pub(crate) major_rev: u32,
    pub(crate) minor_rev: u32,
    pub(crate) station_count: u32,
    pub(crate) constituent_count: u32,
    pub(crate) start_year: i32,
    pub(crate) number_of_years: u32,
    pub(crate) end_of_file: Option<u64>,
    pub(crate) checksum: u32,
    pub(crate) constituent_data_offset: u64,
    pub(crate) station_records_offset: u64,
}

#[derive(Serialize)]
pub(crate) struct ConstituentRowJson<'a> {
    pub(crate) index: u32,
    pub(crate) name: &'a str,
    pub(crate) speed: f64,
}

#[derive(Serialize)]
pub(crate) struct ConstituentDetailJson<'a> {
    pub(crate) index: u32,
    pub(crate) name: &'a str,
    pub(crate) speed: f64,
    pub(crate) start_year: i32,
    pub(crate) equilibrium: &'a [f64],
    pub(crate) node_factors: &'a [f64],
}

#[derive(Serialize)]
pub(crate) struct StationRowJson<'a> {
    pub(crate) index: usize,
    pub(crate) name: &'a str,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) kind: &'static str,
    pub(crate) class: &'static str,
}

#[derive(Serialize)]
pub(crate) struct ShowJson<'a> {
    pub(crate) path: &'a str,
    pub(crate) index: usize,
    pub(crate) station: &'a Station,
}

#[derive(Serialize)]
pub(crate) struct SearchJson<'a> {
    pub(crate) needle: &'a str,
    pub(crate) results: Vec<StationRowJson<'a>>,
}

#[derive(Serialize)]
pub(crate) struct NearestRowJson<'a> {
    pub(crate) name: &'a str,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) distance_km: f64,
    pub(crate) kind: &'static str,
}

#[derive(Serialize)]
pub(crate) struct NearestJson<'a> {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) radius_km: Option<f64>,
    pub(crate) results: Vec<NearestRowJson<'a>>,
}

#[derive(Serialize)]
pub(crate) struct InferredJson<'a> {
    pub(crate) name: &'a str,
    pub(crate) amplitude: f64,
    pub(crate) epoch: f64,
}

#[derive(Serialize)]
pub(crate) struct InferJson<'a> {
    pub(crate) station: &'a str,
    pub(crate) performed: bool,
    pub(crate) inferred: Vec<InferredJson<'a>>,
}

#[derive(Serialize)]
pub(crate) struct TablesJson<'a> {
    pub(crate) table: &'a str,
    pub(crate) entries: &'a [String],
}

#[derive(Serialize)]
pub(crate) struct ExportBundleJson<'a> {
    pub(crate) format: &'static str,
    pub(crate) path: &'a str,
    pub(crate) version: Option<&'a str>,
    pub(crate) station_count: u32,
    pub(crate) constituent_count: u32,
    pub(crate) stations: &'a [Station],
}

#[derive(Serialize)]
pub(crate) struct ExportNdjsonRecordJson<'a> {
    pub(crate) index: usize,
    #[serde(flatten)]
    pub(crate) station: &'a Station,
}
