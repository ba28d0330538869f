#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One harmonic constituent: a fixed angular speed plus per-year
/// equilibrium arguments and node factors starting at the database's
/// start year.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constituent {
    pub index: u32,
    pub name: String,
    /// Angular speed in degrees per hour.
    pub speed: f64,
    /// Equilibrium argument per year, in degrees.
    pub equilibrium: Vec<f64>,
    /// Node factor per year, centered on 1.0.
    pub node_factors: Vec<f64>,
}

/// A decoded station record. Lookup-table references are resolved to owned
/// string values at decode time, so a `Station` is self-contained.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// On-disk byte length of this record.
    pub record_size: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
    /// Index of the reference station this record offsets from.
    /// `None` means the record is its own reference.
    pub reference_station: Option<u32>,
    pub country: String,
    pub source: String,
    pub restriction: String,
    pub comments: String,
    pub notes: String,
    pub legalese: String,
    pub station_id_context: String,
    pub station_id: String,
    /// Import date as YYYYMMDD, or 0 when unrecorded.
    pub date_imported: u32,
    pub xfields: String,
    pub direction_units: String,
    /// Degrees 0..=360; `None` when the record carries no direction.
    pub min_direction: Option<u32>,
    pub max_direction: Option<u32>,
    pub level_units: String,
    pub body: StationBody,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum StationBody {
    Reference(ReferenceData),
    Subordinate(SubordinateData),
}

/// Payload of a reference station: full per-constituent harmonic data.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    /// Datum offset (Z0) in the station's level units.
    pub datum_offset: f64,
    pub datum: String,
    /// Zone offset encoded as a signed ±HHMM integer, as stored.
    pub zone_offset: i32,
    pub expiration_date: u32,
    pub months_on_station: u32,
    pub last_date_on_station: u32,
    /// 0..=15.
    pub confidence: u32,
    /// Amplitude per constituent; 0.0 where the record lists none.
    pub amplitudes: Vec<f64>,
    /// Epoch (phase lag) per constituent, in degrees.
    pub epochs: Vec<f64>,
}

/// Payload of a subordinate station: offsets applied to a reference
/// station's predictions. Time offsets are decoded to minutes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SubordinateData {
    pub min_time_add: i32,
    pub min_level_add: f64,
    pub min_level_multiply: f64,
    pub max_time_add: i32,
    pub max_level_add: f64,
    pub max_level_multiply: f64,
    /// Minutes offset at which flood current begins; `None` for tide
    /// stations.
    pub flood_begins: Option<i32>,
    pub ebb_begins: Option<i32>,
}

impl Station {
    pub fn is_reference(&self) -> bool {
        matches!(self.body, StationBody::Reference(_))
    }

    pub fn is_subordinate(&self) -> bool {
        matches!(self.body, StationBody::Subordinate(_))
    }

    /// A subordinate whose min and max offsets coincide and which carries
    /// no directions and no slack offsets. Simple subordinates behave as
    /// tide stations.
    pub fn is_simple(&self) -> bool {
        let StationBody::Subordinate(sub) = &self.body else {
            return false;
        };
        sub.min_time_add == sub.max_time_add
            && sub.min_level_add == sub.max_level_add
            && sub.min_level_multiply == sub.max_level_multiply
            && self.min_direction.is_none()
            && self.max_direction.is_none()
            && sub.flood_begins.is_none()
            && sub.ebb_begins.is_none()
    }

    pub fn is_tide(&self) -> bool {
        self.is_reference() || self.is_simple()
    }

    pub fn is_current(&self) -> bool {
        self.is_subordinate() && !self.is_simple()
    }

    /// Count of constituents with a non-zero amplitude. Zero for
    /// subordinate stations, which carry no harmonic data.
    pub fn active_constituents(&self) -> usize {
        match &self.body {
            StationBody::Reference(r) => r.amplitudes.iter().filter(|&&a| a > 0.0).count(),
            StationBody::Subordinate(_) => 0,
        }
    }

    pub fn reference_data(&self) -> Option<&ReferenceData> {
        match &self.body {
            StationBody::Reference(r) => Some(r),
            StationBody::Subordinate(_) => None,
        }
    }

    pub fn reference_data_mut(&mut self) -> Option<&mut ReferenceData> {
        match &mut self.body {
            StationBody::Reference(r) => Some(r),
            StationBody::Subordinate(_) => None,
        }
    }

    pub fn subordinate_data(&self) -> Option<&SubordinateData> {
        match &self.body {
            StationBody::Reference(_) => None,
            StationBody::Subordinate(s) => Some(s),
        }
    }
}
