use tcdb_core::error::FormatError;

use crate::bits::{latin1_to_string, BitReader};
use crate::header::{HeaderParams, TableField};

/// Slot contents marking the end of a sentinel-shaped table. Slots past it
/// are unused but still consume file space.
const END_SLOT: &str = "__END__";

/// The fixed-slot string tables between the ASCII header and the
/// bit-packed constituent data, plus the byte offsets of everything that
/// follows them.
#[derive(Debug, Clone)]
pub struct LookupTables {
    /// The four bytes following the ASCII header. Documented as a
    /// checksum; surfaced but never verified.
    pub checksum: u32,
    pub level_units: Vec<String>,
    pub direction_units: Vec<String>,
    pub restrictions: Vec<String>,
    /// Timezone names with the leading `:` stripped.
    pub tzfiles: Vec<String>,
    pub countries: Vec<String>,
    pub datums: Vec<String>,
    pub legaleses: Vec<String>,
    pub constituent_names: Vec<String>,
    /// First byte of the bit-packed speed/equilibrium/node sections.
    pub constituent_data_offset: u64,
    /// First byte of the station records.
    pub station_records_offset: u64,
}

impl LookupTables {
    /// Walk the tables in on-disk order, starting just past the declared
    /// header size.
    pub fn read(bytes: &[u8], params: &HeaderParams) -> Result<Self, FormatError> {
        let mut bits = BitReader::new(bytes);
        bits.seek(params.header_size);
        let checksum = bits.read_uint(32)?;

        let level_units =
            read_exact_table(&mut bits, params.level_unit_types, params.level_unit.slot_size)?;
        let direction_units = read_exact_table(
            &mut bits,
            params.direction_unit_types,
            params.direction_unit.slot_size,
        )?;
        let restrictions = read_sentinel_table(&mut bits, params.restriction)?;

        if params.major_rev < 2 {
            let pedigree = params
                .pedigree
                .ok_or(FormatError::MissingKey("pedigree_bits"))?;
            skip_table(&mut bits, pedigree);
        }

        let tzfiles: Vec<String> = read_sentinel_table(&mut bits, params.tzfile)?
            .into_iter()
            .map(|tz| tz.strip_prefix(':').map(str::to_string).unwrap_or(tz))
            .collect();
        let countries = read_sentinel_table(&mut bits, params.country)?;
        let datums = read_sentinel_table(&mut bits, params.datum)?;

        let legaleses = if params.major_rev >= 2 {
            match params.legalese {
                Some(table) => read_sentinel_table(&mut bits, table)?,
                None => vec!["NULL".to_string()],
            }
        } else {
            vec!["NULL".to_string()]
        };

        let constituent_names =
            read_exact_table(&mut bits, params.constituents, params.constituent_size)?;

        let constituent_data_offset = bits.pos();
        let n = u64::from(params.constituents);
        let years = u64::from(params.number_of_years);
        let station_records_offset = constituent_data_offset
            + section_bytes(params.major_rev, n * u64::from(params.speed.bits))
            + section_bytes(params.major_rev, n * years * u64::from(params.equilibrium.bits))
            + section_bytes(params.major_rev, n * years * u64::from(params.node.bits));

        Ok(Self {
            checksum,
            level_units,
            direction_units,
            restrictions,
            tzfiles,
            countries,
            datums,
            legaleses,
            constituent_names,
            constituent_data_offset,
            station_records_offset,
        })
    }
}

/// Byte extent of one bit-packed matrix section. v1 files always pad with
/// a wasted byte; v2 rounds up only when needed.
pub(crate) fn section_bytes(major_rev: u32, bits_total: u64) -> u64 {
    if major_rev < 2 {
        bits_total / 8 + 1
    } else {
        bits_total.div_ceil(8)
    }
}

fn read_slot(bits: &mut BitReader<'_>, slot_size: u32) -> Result<String, FormatError> {
    let raw = bits.read_bytes(slot_size as usize)?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    Ok(latin1_to_string(&raw[..end]))
}

fn read_exact_table(
    bits: &mut BitReader<'_>,
    count: u32,
    slot_size: u32,
) -> Result<Vec<String>, FormatError> {
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_slot(bits, slot_size)?);
    }
    Ok(out)
}

/// Read up to 2^bits slots, stopping at the `__END__` sentinel. The
/// cursor always advances past the full allocated extent.
fn read_sentinel_table(
    bits: &mut BitReader<'_>,
    table: TableField,
) -> Result<Vec<String>, FormatError> {
    let start = bits.pos();
    let max_slots = 1u64 << table.bits;
    let mut out = Vec::new();
    for _ in 0..max_slots {
        let slot = read_slot(bits, table.slot_size)?;
        if slot == END_SLOT {
            break;
        }
        out.push(slot);
    }
    bits.seek(start + max_slots * u64::from(table.slot_size));
    Ok(out)
}

fn skip_table(bits: &mut BitReader<'_>, table: TableField) {
    let extent = (1u64 << table.bits) * u64::from(table.slot_size);
    bits.seek(bits.pos() + extent);
}
