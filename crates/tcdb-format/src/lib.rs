mod bits;
mod constituents;
mod header;
mod infer;
mod reader;
mod station;
mod tables;

pub use bits::BitReader;
pub use header::{HeaderParams, OffsetField, ScaledField, TableField, Value};
pub use infer::infer_constituents;
pub use reader::{StationIter, TcdFile};
pub use tables::LookupTables;
