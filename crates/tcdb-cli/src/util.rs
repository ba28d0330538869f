use anyhow::Context;

use tcdb_core::types::Station;
use tcdb_format::TcdFile;

pub(crate) fn open_db(path: &str) -> anyhow::Result<TcdFile> {
    TcdFile::open(path).with_context(|| format!("open {path}"))
}

pub(crate) fn kind_str(station: &Station) -> &'static str {
    if station.is_reference() {
        "reference"
    } else {
        "subordinate"
    }
}

pub(crate) fn class_str(station: &Station) -> &'static str {
    if station.is_tide() {
        "tide"
    } else {
        "current"
    }
}

pub(crate) fn fmt_u64_commas(mut v: u64) -> String {
    if v == 0 {
        return "0".to_string();
    }
    let mut parts = Vec::new();
    while v > 0 {
        parts.push((v % 1000) as u16);
        v /= 1000;
    }
    let mut out = String::new();
    for (i, part) in parts.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&part.to_string());
        } else {
            out.push_str(&format!(",{:03}", part));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_group_thousands() {
        assert_eq!(fmt_u64_commas(0), "0");
        assert_eq!(fmt_u64_commas(999), "999");
        assert_eq!(fmt_u64_commas(1_000), "1,000");
        assert_eq!(fmt_u64_commas(12_345_678), "12,345,678");
    }
}
