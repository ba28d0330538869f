use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

use tcdb_core::error::{Error, FormatError};
use tcdb_core::types::{Constituent, Station};

use crate::bits::BitReader;
use crate::constituents::read_constituents;
use crate::header::HeaderParams;
use crate::station::read_station;
use crate::tables::LookupTables;

/// An open TCD database. The ASCII header, lookup tables, and constituent
/// matrices are decoded eagerly at open; station records are decoded on
/// first full enumeration and cached, or streamed one at a time without
/// caching via [`TcdFile::station_iter`].
#[derive(Debug)]
pub struct TcdFile {
    path: PathBuf,
    mmap: Mmap,
    params: HeaderParams,
    tables: LookupTables,
    constituents: Vec<Constituent>,
    stations: Option<Vec<Station>>,
}

impl TcdFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let bytes: &[u8] = mmap.as_ref();
        let params = HeaderParams::parse(bytes)?;
        let tables = LookupTables::read(bytes, &params)?;
        let constituents = read_constituents(bytes, &params, &tables)?;

        Ok(Self {
            path,
            mmap,
            params,
            tables,
            constituents,
            stations: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_bytes(&self) -> &[u8] {
        self.mmap.as_ref()
    }

    pub fn params(&self) -> &HeaderParams {
        &self.params
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Version text from the ASCII header, if present.
    pub fn version(&self) -> Option<&str> {
        self.params.version.as_deref()
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.params.last_modified.as_deref()
    }

    pub fn station_count(&self) -> u32 {
        self.params.number_of_records
    }

    pub fn constituent_count(&self) -> u32 {
        self.params.constituents
    }

    pub fn start_year(&self) -> i32 {
        self.params.start_year
    }

    pub fn number_of_years(&self) -> u32 {
        self.params.number_of_years
    }

    /// Inclusive-exclusive year span covered by the per-year vectors.
    pub fn year_range(&self) -> (i32, i32) {
        (
            self.params.start_year,
            self.params.start_year + self.params.number_of_years as i32,
        )
    }

    pub fn end_of_file(&self) -> Option<u64> {
        self.params.end_of_file
    }

    /// The 4-byte value following the ASCII header. Surfaced read-only;
    /// never verified.
    pub fn checksum(&self) -> u32 {
        self.tables.checksum
    }

    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    /// Exact-name lookup. The table is small, so a linear scan suffices.
    pub fn constituent(&self, name: &str) -> Option<&Constituent> {
        self.constituents.iter().find(|c| c.name == name)
    }

    /// All stations, decoded on first call and cached.
    pub fn stations(&mut self) -> Result<&[Station], Error> {
        if self.stations.is_none() {
            let loaded = self.station_iter().collect::<Result<Vec<_>, _>>()?;
            self.stations = Some(loaded);
        }
        Ok(self.stations.as_deref().unwrap_or_default())
    }

    /// Stream stations one at a time without populating the cache.
    pub fn station_iter(&self) -> StationIter<'_> {
        let mut bits = BitReader::new(self.file_bytes());
        bits.seek(self.tables.station_records_offset);
        StationIter {
            bits,
            params: &self.params,
            tables: &self.tables,
            remaining: self.params.number_of_records,
            revision_checked: false,
        }
    }

    pub fn station_by_name(&mut self, name: &str) -> Result<Option<&Station>, Error> {
        Ok(self.stations()?.iter().find(|s| s.name == name))
    }

    pub fn reference_stations(&mut self) -> Result<Vec<&Station>, Error> {
        Ok(self
            .stations()?
            .iter()
            .filter(|s| s.is_reference())
            .collect())
    }

    pub fn subordinate_stations(&mut self) -> Result<Vec<&Station>, Error> {
        Ok(self
            .stations()?
            .iter()
            .filter(|s| s.is_subordinate())
            .collect())
    }

    /// Run constituent inference against this database's constituent
    /// table. Returns whether anything was eligible to be inferred.
    pub fn infer_constituents(&self, station: &mut Station) -> bool {
        crate::infer::infer_constituents(&self.constituents, station)
    }
}

/// Streaming station decoder. Stops permanently after the first error:
/// a failed record leaves the stream position meaningless.
pub struct StationIter<'a> {
    bits: BitReader<'a>,
    params: &'a HeaderParams,
    tables: &'a LookupTables,
    remaining: u32,
    revision_checked: bool,
}

impl Iterator for StationIter<'_> {
    type Item = Result<Station, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        if !self.revision_checked {
            self.revision_checked = true;
            // v1 station records use a different field layout; parsing
            // them with the v2 order would silently misalign.
            if self.params.major_rev < 2 {
                self.remaining = 0;
                return Some(Err(FormatError::UnsupportedRevision {
                    major: self.params.major_rev,
                    minor: self.params.minor_rev,
                }
                .into()));
            }
        }
        self.remaining -= 1;
        match read_station(&mut self.bits, self.params, self.tables) {
            Ok(station) => Some(Ok(station)),
            Err(err) => {
                self.remaining = 0;
                Some(Err(err.into()))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}
