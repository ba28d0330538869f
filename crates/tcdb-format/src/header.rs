use std::collections::BTreeMap;

use tcdb_core::error::FormatError;

const END_MARKER: &str = "[END OF ASCII HEADER DATA]";

/// A parsed `[KEY] = VALUE` header entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A field decoded as raw bits divided by a scale.
#[derive(Debug, Clone, Copy)]
pub struct ScaledField {
    pub bits: u32,
    pub scale: f64,
}

/// A field decoded as (raw + offset) / scale.
#[derive(Debug, Clone, Copy)]
pub struct OffsetField {
    pub bits: u32,
    pub offset: i64,
    pub scale: f64,
}

/// A lookup-table shape: index width and per-slot byte size.
#[derive(Debug, Clone, Copy)]
pub struct TableField {
    pub bits: u32,
    pub slot_size: u32,
}

/// The encoding parameters from the leading ASCII header. The format is
/// self-describing: every downstream field width, scale, and offset comes
/// from here, never from constants.
#[derive(Debug, Clone)]
pub struct HeaderParams {
    pub header_size: u64,
    pub number_of_records: u32,
    pub constituents: u32,
    pub start_year: i32,
    pub number_of_years: u32,

    pub major_rev: u32,
    pub minor_rev: u32,
    pub end_of_file: Option<u64>,
    pub version: Option<String>,
    pub last_modified: Option<String>,

    pub speed: OffsetField,
    pub equilibrium: OffsetField,
    pub node: OffsetField,

    pub amplitude: ScaledField,
    pub epoch: ScaledField,
    pub latitude: ScaledField,
    pub longitude: ScaledField,
    pub datum_offset: ScaledField,
    pub level_add: ScaledField,
    pub level_multiply: ScaledField,

    pub record_size_bits: u32,
    pub record_type_bits: u32,
    pub station_bits: u32,
    pub date_bits: u32,
    pub months_on_station_bits: u32,
    pub confidence_value_bits: u32,
    pub time_bits: u32,
    pub direction_bits: u32,
    pub constituent_bits: u32,
    /// Byte size of one constituent-name slot.
    pub constituent_size: u32,

    pub level_unit: TableField,
    pub level_unit_types: u32,
    pub direction_unit: TableField,
    pub direction_unit_types: u32,
    pub restriction: TableField,
    pub pedigree: Option<TableField>,
    pub tzfile: TableField,
    pub country: TableField,
    pub datum: TableField,
    pub legalese: Option<TableField>,

    /// Header keys the decoder does not recognize. Kept for inspection,
    /// never read by the decoding stages.
    pub extra: BTreeMap<String, Value>,
}

impl HeaderParams {
    /// Parse the ASCII region at the start of `bytes`, up to and including
    /// the end-of-header marker, and build the typed parameter set.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let map = parse_ascii_block(bytes)?;
        Self::from_map(map)
    }

    fn from_map(mut map: BTreeMap<String, Value>) -> Result<Self, FormatError> {
        // Required keys first; nothing downstream may run without them.
        let header_size = take_u64(&mut map, "header_size")?;
        let number_of_records = take_u32(&mut map, "number_of_records")?;
        let constituents = take_u32(&mut map, "constituents")?;
        let start_year = take_i32(&mut map, "start_year")?;
        let number_of_years = take_u32(&mut map, "number_of_years")?;

        let major_rev = opt_u32(&mut map, "major_rev")?.unwrap_or(0);
        let minor_rev = opt_u32(&mut map, "minor_rev")?.unwrap_or(0);
        let end_of_file = opt_u64(&mut map, "end_of_file")?;
        let version = take_text(&mut map, "version");
        let last_modified = take_text(&mut map, "last_modified");

        let speed = take_offset_field(&mut map, "speed_bits", "speed_offset", "speed_scale")?;
        let equilibrium = take_offset_field(
            &mut map,
            "equilibrium_bits",
            "equilibrium_offset",
            "equilibrium_scale",
        )?;
        let node = take_offset_field(&mut map, "node_bits", "node_offset", "node_scale")?;

        let amplitude = take_scaled_field(&mut map, "amplitude_bits", "amplitude_scale")?;
        let epoch = take_scaled_field(&mut map, "epoch_bits", "epoch_scale")?;
        let latitude = take_scaled_field(&mut map, "latitude_bits", "latitude_scale")?;
        let longitude = take_scaled_field(&mut map, "longitude_bits", "longitude_scale")?;
        let datum_offset =
            take_scaled_field(&mut map, "datum_offset_bits", "datum_offset_scale")?;
        let level_add = take_scaled_field(&mut map, "level_add_bits", "level_add_scale")?;
        let level_multiply =
            take_scaled_field(&mut map, "level_multiply_bits", "level_multiply_scale")?;

        let record_size_bits = take_bits(&mut map, "record_size_bits")?;
        let record_type_bits = take_bits(&mut map, "record_type_bits")?;
        let station_bits = take_bits(&mut map, "station_bits")?;
        let date_bits = take_bits(&mut map, "date_bits")?;
        let months_on_station_bits = take_bits(&mut map, "months_on_station_bits")?;
        let confidence_value_bits = take_bits(&mut map, "confidence_value_bits")?;
        let time_bits = take_bits(&mut map, "time_bits")?;
        let direction_bits = take_bits(&mut map, "direction_bits")?;
        let constituent_bits = take_bits(&mut map, "constituent_bits")?;
        let constituent_size = take_u32(&mut map, "constituent_size")?;

        let level_unit = take_table_field(&mut map, "level_unit_bits", "level_unit_size")?;
        let level_unit_types = take_u32(&mut map, "level_unit_types")?;
        let direction_unit =
            take_table_field(&mut map, "direction_unit_bits", "direction_unit_size")?;
        let direction_unit_types = take_u32(&mut map, "direction_unit_types")?;
        let restriction = take_table_field(&mut map, "restriction_bits", "restriction_size")?;
        let pedigree = opt_table_field(&mut map, "pedigree_bits", "pedigree_size")?;
        let tzfile = take_table_field(&mut map, "tzfile_bits", "tzfile_size")?;
        let country = take_table_field(&mut map, "country_bits", "country_size")?;
        let datum = take_table_field(&mut map, "datum_bits", "datum_size")?;
        let legalese = opt_table_field(&mut map, "legalese_bits", "legalese_size")?;

        Ok(Self {
            header_size,
            number_of_records,
            constituents,
            start_year,
            number_of_years,
            major_rev,
            minor_rev,
            end_of_file,
            version,
            last_modified,
            speed,
            equilibrium,
            node,
            amplitude,
            epoch,
            latitude,
            longitude,
            datum_offset,
            level_add,
            level_multiply,
            record_size_bits,
            record_type_bits,
            station_bits,
            date_bits,
            months_on_station_bits,
            confidence_value_bits,
            time_bits,
            direction_bits,
            constituent_bits,
            constituent_size,
            level_unit,
            level_unit_types,
            direction_unit,
            direction_unit_types,
            restriction,
            pedigree,
            tzfile,
            country,
            datum,
            legalese,
            extra: map,
        })
    }
}

/// Read ASCII lines until the end-of-header marker. Content lines look
/// like `[KEY] = VALUE`; anything else is ignored.
fn parse_ascii_block(bytes: &[u8]) -> Result<BTreeMap<String, Value>, FormatError> {
    let mut map = BTreeMap::new();
    for raw_line in bytes.split(|&b| b == b'\n') {
        let line = crate::bits::latin1_to_string(raw_line);
        let line = line.trim();
        if line == END_MARKER {
            return Ok(map);
        }
        if line.is_empty() || !line.starts_with('[') {
            continue;
        }
        let Some(close) = line.find(']') else {
            continue;
        };
        let key = normalize_key(&line[1..close]);
        let rest = line[close + 1..].trim_start();
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        map.insert(key, parse_value(value.trim()));
    }
    Err(FormatError::UnterminatedHeader)
}

/// Lowercase, with runs of whitespace folded to a single underscore.
fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut pending_sep = false;
    for ch in key.trim().chars() {
        if ch.is_whitespace() {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn parse_value(value: &str) -> Value {
    if is_integer_literal(value) {
        if let Ok(v) = value.parse::<i64>() {
            return Value::Int(v);
        }
    }
    if value.contains('.') {
        if let Ok(v) = value.parse::<f64>() {
            return Value::Float(v);
        }
    }
    Value::Text(value.to_string())
}

fn is_integer_literal(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn take_i64(map: &mut BTreeMap<String, Value>, key: &'static str) -> Result<i64, FormatError> {
    match map.remove(key) {
        Some(Value::Int(v)) => Ok(v),
        Some(_) => Err(FormatError::InvalidValue {
            field: key,
            reason: "expected an integer",
        }),
        None => Err(FormatError::MissingKey(key)),
    }
}

fn take_u64(map: &mut BTreeMap<String, Value>, key: &'static str) -> Result<u64, FormatError> {
    u64::try_from(take_i64(map, key)?).map_err(|_| FormatError::InvalidValue {
        field: key,
        reason: "must be non-negative",
    })
}

fn take_u32(map: &mut BTreeMap<String, Value>, key: &'static str) -> Result<u32, FormatError> {
    u32::try_from(take_i64(map, key)?).map_err(|_| FormatError::InvalidValue {
        field: key,
        reason: "out of range",
    })
}

fn take_i32(map: &mut BTreeMap<String, Value>, key: &'static str) -> Result<i32, FormatError> {
    i32::try_from(take_i64(map, key)?).map_err(|_| FormatError::InvalidValue {
        field: key,
        reason: "out of range",
    })
}

fn opt_i64(
    map: &mut BTreeMap<String, Value>,
    key: &'static str,
) -> Result<Option<i64>, FormatError> {
    match map.remove(key) {
        Some(Value::Int(v)) => Ok(Some(v)),
        Some(_) => Err(FormatError::InvalidValue {
            field: key,
            reason: "expected an integer",
        }),
        None => Ok(None),
    }
}

fn opt_u32(
    map: &mut BTreeMap<String, Value>,
    key: &'static str,
) -> Result<Option<u32>, FormatError> {
    opt_i64(map, key)?
        .map(|v| {
            u32::try_from(v).map_err(|_| FormatError::InvalidValue {
                field: key,
                reason: "out of range",
            })
        })
        .transpose()
}

fn opt_u64(
    map: &mut BTreeMap<String, Value>,
    key: &'static str,
) -> Result<Option<u64>, FormatError> {
    opt_i64(map, key)?
        .map(|v| {
            u64::try_from(v).map_err(|_| FormatError::InvalidValue {
                field: key,
                reason: "must be non-negative",
            })
        })
        .transpose()
}

fn opt_f64(
    map: &mut BTreeMap<String, Value>,
    key: &'static str,
) -> Result<Option<f64>, FormatError> {
    match map.remove(key) {
        Some(Value::Int(v)) => Ok(Some(v as f64)),
        Some(Value::Float(v)) => Ok(Some(v)),
        Some(Value::Text(_)) => Err(FormatError::InvalidValue {
            field: key,
            reason: "expected a number",
        }),
        None => Ok(None),
    }
}

fn take_text(map: &mut BTreeMap<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::Text(v)) => Some(v),
        Some(Value::Int(v)) => Some(v.to_string()),
        Some(Value::Float(v)) => Some(v.to_string()),
        None => None,
    }
}

fn take_bits(map: &mut BTreeMap<String, Value>, key: &'static str) -> Result<u32, FormatError> {
    let bits = take_u32(map, key)?;
    if bits == 0 || bits > 32 {
        return Err(FormatError::InvalidBitWidth(bits));
    }
    Ok(bits)
}

fn take_scaled_field(
    map: &mut BTreeMap<String, Value>,
    bits_key: &'static str,
    scale_key: &'static str,
) -> Result<ScaledField, FormatError> {
    Ok(ScaledField {
        bits: take_bits(map, bits_key)?,
        scale: opt_f64(map, scale_key)?.unwrap_or(1.0),
    })
}

fn take_offset_field(
    map: &mut BTreeMap<String, Value>,
    bits_key: &'static str,
    offset_key: &'static str,
    scale_key: &'static str,
) -> Result<OffsetField, FormatError> {
    Ok(OffsetField {
        bits: take_bits(map, bits_key)?,
        offset: opt_i64(map, offset_key)?.unwrap_or(0),
        scale: opt_f64(map, scale_key)?.unwrap_or(1.0),
    })
}

fn take_table_field(
    map: &mut BTreeMap<String, Value>,
    bits_key: &'static str,
    size_key: &'static str,
) -> Result<TableField, FormatError> {
    Ok(TableField {
        bits: take_bits(map, bits_key)?,
        slot_size: take_u32(map, size_key)?,
    })
}

fn opt_table_field(
    map: &mut BTreeMap<String, Value>,
    bits_key: &'static str,
    size_key: &'static str,
) -> Result<Option<TableField>, FormatError> {
    if !map.contains_key(bits_key) {
        map.remove(size_key);
        return Ok(None);
    }
    Ok(Some(take_table_field(map, bits_key, size_key)?))
}
