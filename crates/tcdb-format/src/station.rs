use tcdb_core::error::FormatError;
use tcdb_core::types::{ReferenceData, Station, StationBody, SubordinateData};

use crate::bits::BitReader;
use crate::header::HeaderParams;
use crate::tables::LookupTables;

const RECORD_TYPE_REFERENCE: u32 = 1;
const RECORD_TYPE_SUBORDINATE: u32 = 2;

/// On-wire marker for an absent direction (degrees run 0..=360).
const NULL_DIRECTION: u32 = 361;
/// On-wire marker for an absent flood/ebb slack offset.
const NULL_SLACK_OFFSET: i32 = 0xA00;

/// Decode one station record starting at the reader's current byte
/// position. The record-size field is the authoritative record length:
/// after the body, the reader is seeked to `start + record_size` to absorb
/// trailing padding and restore byte alignment for the next record.
pub(crate) fn read_station(
    bits: &mut BitReader<'_>,
    params: &HeaderParams,
    tables: &LookupTables,
) -> Result<Station, FormatError> {
    let start = bits.pos();

    let record_size = bits.read_uint(params.record_size_bits)?;
    let record_type = bits.read_uint(params.record_type_bits)?;
    let latitude = bits.read_scaled_signed(params.latitude.bits, params.latitude.scale)?;
    let longitude = bits.read_scaled_signed(params.longitude.bits, params.longitude.scale)?;
    let time_zone = lookup(&tables.tzfiles, bits.read_uint(params.tzfile.bits)?);
    let name = bits.read_cstring()?;
    let reference_station = match bits.read_int(params.station_bits)? {
        -1 => None,
        idx => Some(idx as u32),
    };

    let country = lookup(&tables.countries, bits.read_uint(params.country.bits)?);
    let source = bits.read_cstring()?;
    let restriction = lookup(&tables.restrictions, bits.read_uint(params.restriction.bits)?);
    let comments = bits.read_cstring()?;
    let notes = bits.read_cstring()?;
    let legalese = match params.legalese {
        Some(table) => lookup(&tables.legaleses, bits.read_uint(table.bits)?),
        None => lookup(&tables.legaleses, 0),
    };
    let station_id_context = bits.read_cstring()?;
    let station_id = bits.read_cstring()?;
    let date_imported = bits.read_uint(params.date_bits)?;
    let xfields = bits.read_cstring()?;
    let direction_units = lookup(
        &tables.direction_units,
        bits.read_uint(params.direction_unit.bits)?,
    );
    let min_direction = read_direction(bits, params)?;
    let max_direction = read_direction(bits, params)?;
    let level_units = lookup(&tables.level_units, bits.read_uint(params.level_unit.bits)?);

    let body = match record_type {
        RECORD_TYPE_REFERENCE => StationBody::Reference(read_reference_body(bits, params, tables)?),
        RECORD_TYPE_SUBORDINATE => StationBody::Subordinate(read_subordinate_body(bits, params)?),
        other => return Err(FormatError::UnknownRecordType(other)),
    };

    bits.seek(start + u64::from(record_size));

    Ok(Station {
        record_size,
        name,
        latitude,
        longitude,
        time_zone,
        reference_station,
        country,
        source,
        restriction,
        comments,
        notes,
        legalese,
        station_id_context,
        station_id,
        date_imported,
        xfields,
        direction_units,
        min_direction,
        max_direction,
        level_units,
        body,
    })
}

fn read_reference_body(
    bits: &mut BitReader<'_>,
    params: &HeaderParams,
    tables: &LookupTables,
) -> Result<ReferenceData, FormatError> {
    let datum_offset =
        bits.read_scaled_signed(params.datum_offset.bits, params.datum_offset.scale)?;
    let datum = lookup(&tables.datums, bits.read_uint(params.datum.bits)?);
    let zone_offset = bits.read_int(params.time_bits)?;
    let expiration_date = bits.read_uint(params.date_bits)?;
    let months_on_station = bits.read_uint(params.months_on_station_bits)?;
    let last_date_on_station = bits.read_uint(params.date_bits)?;
    let confidence = bits.read_uint(params.confidence_value_bits)?;

    let count = params.constituents as usize;
    let mut amplitudes = vec![0.0; count];
    let mut epochs = vec![0.0; count];
    let listed = bits.read_uint(params.constituent_bits)?;
    for _ in 0..listed {
        let index = bits.read_uint(params.constituent_bits)? as usize;
        let amplitude = bits.read_scaled(params.amplitude.bits, params.amplitude.scale)?;
        let epoch = bits.read_scaled(params.epoch.bits, params.epoch.scale)?;
        // Indices beyond the constituent count are silently dropped.
        if index < count {
            amplitudes[index] = amplitude;
            epochs[index] = epoch;
        }
    }

    Ok(ReferenceData {
        datum_offset,
        datum,
        zone_offset,
        expiration_date,
        months_on_station,
        last_date_on_station,
        confidence,
        amplitudes,
        epochs,
    })
}

fn read_subordinate_body(
    bits: &mut BitReader<'_>,
    params: &HeaderParams,
) -> Result<SubordinateData, FormatError> {
    let min_time_add = hhmm_to_minutes(bits.read_int(params.time_bits)?);
    let min_level_add = bits.read_scaled_signed(params.level_add.bits, params.level_add.scale)?;
    let min_level_multiply = read_level_multiply(bits, params)?;
    let max_time_add = hhmm_to_minutes(bits.read_int(params.time_bits)?);
    let max_level_add = bits.read_scaled_signed(params.level_add.bits, params.level_add.scale)?;
    let max_level_multiply = read_level_multiply(bits, params)?;
    let flood_begins = read_slack_offset(bits, params)?;
    let ebb_begins = read_slack_offset(bits, params)?;

    Ok(SubordinateData {
        min_time_add,
        min_level_add,
        min_level_multiply,
        max_time_add,
        max_level_add,
        max_level_multiply,
        flood_begins,
        ebb_begins,
    })
}

fn read_direction(
    bits: &mut BitReader<'_>,
    params: &HeaderParams,
) -> Result<Option<u32>, FormatError> {
    match bits.read_uint(params.direction_bits)? {
        NULL_DIRECTION => Ok(None),
        degrees => Ok(Some(degrees)),
    }
}

/// An unsigned multiplier where raw 0 stands for the identity.
fn read_level_multiply(
    bits: &mut BitReader<'_>,
    params: &HeaderParams,
) -> Result<f64, FormatError> {
    let raw = bits.read_uint(params.level_multiply.bits)?;
    if raw == 0 {
        return Ok(1.0);
    }
    Ok(f64::from(raw) / params.level_multiply.scale)
}

fn read_slack_offset(
    bits: &mut BitReader<'_>,
    params: &HeaderParams,
) -> Result<Option<i32>, FormatError> {
    match bits.read_int(params.time_bits)? {
        NULL_SLACK_OFFSET => Ok(None),
        raw => Ok(Some(hhmm_to_minutes(raw))),
    }
}

/// Decode a signed ±HHMM integer to minutes: the low two decimal digits
/// hold minutes, the rest hours.
fn hhmm_to_minutes(raw: i32) -> i32 {
    if raw == 0 {
        return 0;
    }
    let sign = raw.signum();
    let abs = raw.abs();
    sign * (abs / 100 * 60 + abs % 100)
}

fn lookup(table: &[String], index: u32) -> String {
    table.get(index as usize).cloned().unwrap_or_default()
}
