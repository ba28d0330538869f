use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        static CTR: AtomicUsize = AtomicUsize::new(0);
        let n = CTR.fetch_add(1, Ordering::SeqCst);
        let mut path = std::env::temp_dir();
        path.push(format!("{}_{}_{}", prefix, std::process::id(), n));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn tcd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tcd"))
}

fn run_ok(cwd: &Path, args: &[&str]) -> Output {
    let out = tcd().current_dir(cwd).args(args).output().expect("run tcd");
    assert!(
        out.status.success(),
        "expected success\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_err(cwd: &Path, args: &[&str]) -> Output {
    let out = tcd().current_dir(cwd).args(args).output().expect("run tcd");
    assert!(
        !out.status.success(),
        "expected failure\nargs={args:?}\nstatus={}\nstdout={}\nstderr={}",
        out.status,
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr),
    );
    out
}

fn run_ok_json(cwd: &Path, args: &[&str]) -> Value {
    let out = run_ok(cwd, args);
    serde_json::from_slice(&out.stdout).expect("stdout is valid JSON")
}

// A minimal valid database: five constituents over one year, one
// reference station and one simple subordinate.

struct BitWriter {
    out: Vec<u8>,
    acc: u64,
    nbits: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            acc: 0,
            nbits: 0,
        }
    }

    fn put(&mut self, value: u64, n: u32) {
        assert!(value < (1u64 << n));
        self.acc = (self.acc << n) | value;
        self.nbits += n;
        while self.nbits >= 8 {
            self.nbits -= 8;
            self.out.push((self.acc >> self.nbits) as u8);
        }
        self.acc &= (1u64 << self.nbits) - 1;
    }

    fn put_signed(&mut self, value: i64, n: u32) {
        self.put((value as u64) & ((1u64 << n) - 1), n);
    }

    fn put_cstring(&mut self, s: &str) {
        for b in s.bytes() {
            self.put(u64::from(b), 8);
        }
        self.put(0, 8);
    }

    fn byte_len(&self) -> usize {
        (self.out.len() * 8 + self.nbits as usize + 7) / 8
    }

    fn into_bytes(mut self) -> Vec<u8> {
        if self.nbits > 0 {
            let pad = 8 - self.nbits;
            self.put(0, pad);
        }
        self.out
    }
}

const HEADER_SIZE: usize = 2048;
const CONSTITUENTS: [(&str, f64); 5] = [
    ("M2", 28.984_104_2),
    ("S2", 30.0),
    ("N2", 28.439_729_5),
    ("K1", 15.041_068_6),
    ("O1", 13.943_035_6),
];

fn slot(text: &str, size: usize) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    out.resize(size, 0);
    out
}

fn exact_table(entries: &[&str], size: usize) -> Vec<u8> {
    entries.iter().flat_map(|e| slot(e, size)).collect()
}

fn sentinel_table(entries: &[&str], bits: u32, size: usize) -> Vec<u8> {
    let mut out: Vec<u8> = entries.iter().flat_map(|e| slot(e, size)).collect();
    out.extend(slot("__END__", size));
    out.resize((1usize << bits) * size, 0);
    out
}

fn header_text() -> String {
    concat!(
        "[VERSION] = harmonics-e2e 1.0\n",
        "[MAJOR REV] = 2\n[MINOR REV] = 2\n",
        "[HEADER SIZE] = 2048\n",
        "[NUMBER OF RECORDS] = 2\n",
        "[CONSTITUENTS] = 5\n",
        "[START YEAR] = 2024\n[NUMBER OF YEARS] = 1\n",
        "[SPEED BITS] = 31\n[SPEED SCALE] = 10000000\n[SPEED OFFSET] = -410667\n",
        "[EQUILIBRIUM BITS] = 16\n[EQUILIBRIUM SCALE] = 100\n",
        "[NODE BITS] = 15\n[NODE SCALE] = 10000\n",
        "[AMPLITUDE BITS] = 19\n[AMPLITUDE SCALE] = 10000\n",
        "[EPOCH BITS] = 16\n[EPOCH SCALE] = 100\n",
        "[LATITUDE BITS] = 25\n[LATITUDE SCALE] = 100000\n",
        "[LONGITUDE BITS] = 26\n[LONGITUDE SCALE] = 100000\n",
        "[DATUM OFFSET BITS] = 28\n[DATUM OFFSET SCALE] = 10000\n",
        "[LEVEL ADD BITS] = 17\n[LEVEL ADD SCALE] = 1000\n",
        "[LEVEL MULTIPLY BITS] = 16\n[LEVEL MULTIPLY SCALE] = 1000\n",
        "[RECORD SIZE BITS] = 16\n[RECORD TYPE BITS] = 4\n",
        "[STATION BITS] = 18\n[DATE BITS] = 27\n",
        "[MONTHS ON STATION BITS] = 10\n[CONFIDENCE VALUE BITS] = 4\n",
        "[TIME BITS] = 13\n[DIRECTION BITS] = 9\n",
        "[CONSTITUENT BITS] = 8\n[CONSTITUENT SIZE] = 10\n",
        "[LEVEL UNIT BITS] = 3\n[LEVEL UNIT TYPES] = 5\n[LEVEL UNIT SIZE] = 15\n",
        "[DIRECTION UNIT BITS] = 2\n[DIRECTION UNIT TYPES] = 3\n[DIRECTION UNIT SIZE] = 15\n",
        "[RESTRICTION BITS] = 4\n[RESTRICTION SIZE] = 30\n",
        "[TZFILE BITS] = 5\n[TZFILE SIZE] = 30\n",
        "[COUNTRY BITS] = 9\n[COUNTRY SIZE] = 50\n",
        "[DATUM BITS] = 7\n[DATUM SIZE] = 70\n",
        "[LEGALESE BITS] = 4\n[LEGALESE SIZE] = 70\n",
        "[END OF ASCII HEADER DATA]\n",
    )
    .to_string()
}

fn write_common_header(
    w: &mut BitWriter,
    record_size: u32,
    record_type: u64,
    lat_raw: i64,
    lon_raw: i64,
    name: &str,
    reference_index: i64,
) {
    w.put(u64::from(record_size), 16);
    w.put(record_type, 4);
    w.put_signed(lat_raw, 25);
    w.put_signed(lon_raw, 26);
    w.put(1, 5); // America/Los_Angeles
    w.put_cstring(name);
    w.put_signed(reference_index, 18);
    w.put(1, 9); // United States
    w.put_cstring("NOS");
    w.put(0, 4);
    w.put_cstring("");
    w.put_cstring("");
    w.put(0, 4);
    w.put_cstring("");
    w.put_cstring("");
    w.put(0, 27);
    w.put_cstring("");
    w.put(0, 2);
    w.put(361, 9);
    w.put(361, 9);
    w.put(1, 3); // feet
}

fn build_reference(w: &mut BitWriter, record_size: u32) {
    write_common_header(
        w,
        record_size,
        1,
        3_780_670,
        -12_246_500,
        "San Francisco (Golden Gate)",
        -1,
    );
    w.put_signed(32_000, 28);
    w.put(1, 7);
    w.put_signed(-800, 13);
    w.put(0, 27);
    w.put(120, 10);
    w.put(0, 27);
    w.put(9, 4);
    // M2, S2, K1, O1 set; N2 left for inference.
    w.put(4, 8);
    for (index, amp_raw, epoch_raw) in
        [(0u64, 18_000u64, 33_050u64), (1, 4_500, 35_000), (3, 12_000, 10_525), (4, 7_500, 9_000)]
    {
        w.put(index, 8);
        w.put(amp_raw, 19);
        w.put(epoch_raw, 16);
    }
}

fn build_subordinate(w: &mut BitWriter, record_size: u32) {
    write_common_header(
        w,
        record_size,
        2,
        3_777_000,
        -12_230_000,
        "Alameda (east end)",
        0,
    );
    w.put_signed(130, 13);
    w.put_signed(150, 17);
    w.put(0, 16);
    w.put_signed(130, 13);
    w.put_signed(150, 17);
    w.put(0, 16);
    w.put_signed(0xA00, 13);
    w.put_signed(0xA00, 13);
}

fn record(build: impl Fn(&mut BitWriter, u32)) -> Vec<u8> {
    let mut probe = BitWriter::new();
    build(&mut probe, 0);
    let size = probe.byte_len() as u32;
    let mut w = BitWriter::new();
    build(&mut w, size);
    w.into_bytes()
}

fn fixture_bytes() -> Vec<u8> {
    let mut buf = header_text().into_bytes();
    assert!(buf.len() <= HEADER_SIZE);
    buf.resize(HEADER_SIZE, 0);
    buf.extend_from_slice(&0x1234_5678u32.to_be_bytes());

    buf.extend(exact_table(
        &["Unknown", "feet", "meters", "knots", "knots^2"],
        15,
    ));
    buf.extend(exact_table(&["Unknown", "degrees true", "degrees"], 15));
    buf.extend(sentinel_table(&["Public Domain"], 4, 30));
    buf.extend(sentinel_table(&[":Unknown", ":America/Los_Angeles"], 5, 30));
    buf.extend(sentinel_table(&["Unknown", "United States"], 9, 50));
    buf.extend(sentinel_table(&["Unknown", "Mean Lower Low Water"], 7, 70));
    buf.extend(sentinel_table(&["NULL"], 4, 70));
    let names: Vec<&str> = CONSTITUENTS.iter().map(|c| c.0).collect();
    buf.extend(exact_table(&names, 10));

    let mut w = BitWriter::new();
    for (_, speed) in CONSTITUENTS {
        let raw = (speed * 10_000_000.0).round() as i64 + 410_667;
        w.put(raw as u64, 31);
    }
    buf.extend(section(w, CONSTITUENTS.len() * 31));

    let mut w = BitWriter::new();
    for _ in CONSTITUENTS {
        w.put(12_000, 16); // equilibrium 120.00
    }
    buf.extend(section(w, CONSTITUENTS.len() * 16));

    let mut w = BitWriter::new();
    for _ in CONSTITUENTS {
        w.put(10_000, 15); // node factor 1.0
    }
    buf.extend(section(w, CONSTITUENTS.len() * 15));

    buf.extend(record(build_reference));
    buf.extend(record(build_subordinate));
    buf
}

fn section(w: BitWriter, bits_total: usize) -> Vec<u8> {
    let mut bytes = w.into_bytes();
    bytes.resize((bits_total + 7) / 8, 0);
    bytes
}

fn write_fixture(dir: &Path) -> String {
    let path = dir.join("harmonics.tcd");
    std::fs::write(&path, fixture_bytes()).expect("write fixture");
    path.to_string_lossy().into_owned()
}

#[test]
fn help_smoke() {
    let dir = TempDir::new("tcd_e2e_help");
    let out = run_ok(dir.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Tools for inspecting and querying TCD tide databases."));
    assert!(stdout.contains("stations"));
    assert!(stdout.contains("nearest"));
}

#[test]
fn validate_accepts_the_fixture_and_rejects_garbage() {
    let dir = TempDir::new("tcd_e2e_validate");
    let db = write_fixture(dir.path());
    let out = run_ok(dir.path(), &["validate", &db]);
    assert!(String::from_utf8_lossy(&out.stdout).contains("OK:"));

    std::fs::write(dir.path().join("garbage.tcd"), b"not a database").expect("write");
    let out = run_err(dir.path(), &["validate", "garbage.tcd"]);
    assert!(String::from_utf8_lossy(&out.stderr).contains("INVALID"));
}

#[test]
fn info_reports_counts() {
    let dir = TempDir::new("tcd_e2e_info");
    let db = write_fixture(dir.path());

    let out = run_ok(dir.path(), &["info", &db]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Stations: 2"));
    assert!(stdout.contains("Constituents: 5"));
    assert!(stdout.contains("Years: 2024..2025"));

    let v = run_ok_json(dir.path(), &["--json", "info", &db]);
    assert_eq!(v["station_count"], 2);
    assert_eq!(v["constituent_count"], 5);
    assert_eq!(v["major_rev"], 2);
}

#[test]
fn constituents_lists_and_details() {
    let dir = TempDir::new("tcd_e2e_constituents");
    let db = write_fixture(dir.path());

    let out = run_ok(dir.path(), &["constituents", &db]);
    assert!(String::from_utf8_lossy(&out.stdout).contains("M2"));

    let v = run_ok_json(dir.path(), &["--json", "constituents", &db, "--name", "M2"]);
    let speed = v["speed"].as_f64().expect("speed");
    assert!((speed - 28.984_104_2).abs() < 1e-4);
    assert_eq!(v["equilibrium"].as_array().expect("eq").len(), 1);

    run_err(dir.path(), &["constituents", &db, "--name", "NOPE"]);
}

#[test]
fn show_and_search_find_stations() {
    let dir = TempDir::new("tcd_e2e_show");
    let db = write_fixture(dir.path());

    let out = run_ok(
        dir.path(),
        &["show", &db, "--name", "San Francisco (Golden Gate)"],
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("reference"));
    assert!(stdout.contains("Active constituents: 4"));

    let v = run_ok_json(dir.path(), &["--json", "search", &db, "alameda"]);
    let results = v["results"].as_array().expect("results");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Alameda (east end)");

    run_err(dir.path(), &["show", &db, "--name", "No Such Place"]);
}

#[test]
fn nearest_orders_by_distance() {
    let dir = TempDir::new("tcd_e2e_nearest");
    let db = write_fixture(dir.path());
    let v = run_ok_json(
        dir.path(),
        &[
            "--json", "nearest", &db, "--lat", "37.8", "--lon", "-122.4", "-k", "2",
        ],
    );
    let results = v["results"].as_array().expect("results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "San Francisco (Golden Gate)");
    let d0 = results[0]["distance_km"].as_f64().expect("d0");
    let d1 = results[1]["distance_km"].as_f64().expect("d1");
    assert!(d0 <= d1);
}

#[test]
fn infer_fills_n2() {
    let dir = TempDir::new("tcd_e2e_infer");
    let db = write_fixture(dir.path());
    let v = run_ok_json(
        dir.path(),
        &[
            "--json",
            "infer",
            &db,
            "--name",
            "San Francisco (Golden Gate)",
        ],
    );
    assert_eq!(v["performed"], true);
    let inferred = v["inferred"].as_array().expect("inferred");
    assert!(inferred.iter().any(|e| e["name"] == "N2"));
}

#[test]
fn export_ndjson_emits_one_station_per_line() {
    let dir = TempDir::new("tcd_e2e_export");
    let db = write_fixture(dir.path());
    let out = run_ok(dir.path(), &["export", &db, "--format", "ndjson"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let v: Value = serde_json::from_str(line).expect("valid JSON line");
        assert!(v["name"].is_string());
    }
}

#[test]
fn tables_dumps_timezones_stripped() {
    let dir = TempDir::new("tcd_e2e_tables");
    let db = write_fixture(dir.path());
    let v = run_ok_json(dir.path(), &["--json", "tables", &db, "--table", "tzfiles"]);
    let entries = v["entries"].as_array().expect("entries");
    assert_eq!(entries[1], "America/Los_Angeles");
}
