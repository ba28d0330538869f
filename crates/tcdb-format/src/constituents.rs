use tcdb_core::error::FormatError;
use tcdb_core::types::Constituent;

use crate::bits::BitReader;
use crate::header::HeaderParams;
use crate::tables::{section_bytes, LookupTables};

/// Decode the constituent speeds and the constituents-by-years matrices of
/// equilibrium arguments and node factors. Each of the three sections is
/// byte-rounded on its own, so every section starts byte-aligned.
pub(crate) fn read_constituents(
    bytes: &[u8],
    params: &HeaderParams,
    tables: &LookupTables,
) -> Result<Vec<Constituent>, FormatError> {
    let n = params.constituents as usize;
    let years = params.number_of_years as usize;
    let mut bits = BitReader::new(bytes);

    bits.seek(tables.constituent_data_offset);
    let mut speeds = Vec::with_capacity(n);
    for _ in 0..n {
        speeds.push(bits.read_offset_scaled(
            params.speed.bits,
            params.speed.offset,
            params.speed.scale,
        )?);
    }

    let eq_offset = tables.constituent_data_offset
        + section_bytes(
            params.major_rev,
            n as u64 * u64::from(params.speed.bits),
        );
    bits.seek(eq_offset);
    let equilibrium = read_matrix(&mut bits, n, years, |b| {
        b.read_offset_scaled(
            params.equilibrium.bits,
            params.equilibrium.offset,
            params.equilibrium.scale,
        )
    })?;

    let node_offset = eq_offset
        + section_bytes(
            params.major_rev,
            (n * years) as u64 * u64::from(params.equilibrium.bits),
        );
    bits.seek(node_offset);
    let node_factors = read_matrix(&mut bits, n, years, |b| {
        b.read_offset_scaled(params.node.bits, params.node.offset, params.node.scale)
    })?;

    let mut out = Vec::with_capacity(n);
    for (i, speed) in speeds.into_iter().enumerate() {
        let name = match tables.constituent_names.get(i) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("C{i}"),
        };
        out.push(Constituent {
            index: i as u32,
            name,
            speed,
            equilibrium: equilibrium[i].clone(),
            node_factors: node_factors[i].clone(),
        });
    }
    Ok(out)
}

/// Constituent-major: each constituent's per-year values are contiguous.
fn read_matrix(
    bits: &mut BitReader<'_>,
    constituents: usize,
    years: usize,
    mut read_cell: impl FnMut(&mut BitReader<'_>) -> Result<f64, FormatError>,
) -> Result<Vec<Vec<f64>>, FormatError> {
    let mut out = Vec::with_capacity(constituents);
    for _ in 0..constituents {
        let mut row = Vec::with_capacity(years);
        for _ in 0..years {
            row.push(read_cell(bits)?);
        }
        out.push(row);
    }
    Ok(out)
}
