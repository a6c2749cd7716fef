use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;

use super::geometry::Geometry;
use super::model::{Dataset, InstitutionRecord, YearMetrics};

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// Source column name → semantic column name.
///
/// Headers that already carry the semantic name are left alone, so files
/// written by [`crate::data::export`] load back unchanged.
pub const COLUMN_RENAMES: [(&str, &str); 11] = [
    ("Rasio", "Rasio 2017"),
    ("Rasio.1", "Rasio 2018"),
    ("Dosen", "Dosen 2017"),
    ("Dosen.1", "Dosen 2018"),
    ("Mhs", "Mahasiswa 2017"),
    ("Mhs.1", "Mahasiswa 2018"),
    ("Nama Prodi", "Nama Perguruan Tinggi"),
    ("ID_x", "Id Perguruan Tinggi"),
    ("ID_y", "Id Geometry"),
    ("kode", "Kode"),
    ("SUMBER", "Sumber"),
];

/// Columns every input must provide (after renaming).
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "Id Perguruan Tinggi",
    "Id Geometry",
    "Nama Perguruan Tinggi",
    "Provinsi",
    "Penyelenggara",
    "Status",
    "Kode",
    "Sumber",
    "Dosen 2017",
    "Dosen 2018",
    "Mahasiswa 2017",
    "Mahasiswa 2018",
    "Rasio 2017",
    "Rasio 2018",
];

pub const GEOMETRY_COLUMN: &str = "geometry";

/// Header names of a leftover DataFrame index column.
const INDEX_COLUMNS: [&str; 2] = ["", "Unnamed: 0"];

/// Apply [`COLUMN_RENAMES`] to a single header.
pub fn semantic_name(header: &str) -> &str {
    COLUMN_RENAMES
        .iter()
        .find(|(source, _)| *source == header)
        .map(|(_, semantic)| *semantic)
        .unwrap_or(header)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("reading CSV header")]
    Header(#[source] csv::Error),
    #[error("missing expected columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("CSV data row {row}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the institution table from a CSV file.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file)
}

/// Load the institution table from any CSV byte stream.
///
/// Rows whose geometry cannot be parsed are kept with `geometry = None`
/// and reported through `log::warn!`.
pub fn load_reader<R: Read>(input: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(input);

    let source_headers = reader.headers().map_err(LoadError::Header)?.clone();
    let headers: StringRecord = source_headers.iter().map(semantic_name).collect();

    for ignored in headers.iter().filter(|h| INDEX_COLUMNS.contains(h)) {
        log::debug!("Ignoring index column {ignored:?}");
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }
    if !headers.iter().any(|h| h == GEOMETRY_COLUMN) {
        log::warn!("No '{GEOMETRY_COLUMN}' column; the map will be empty");
    }

    let mut geometries = GeometryInterner::default();
    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let raw: RawRow = result
            .and_then(|record| record.deserialize(Some(&headers)))
            .map_err(|source| LoadError::Row { row, source })?;

        let geometry = raw
            .geometry
            .as_deref()
            .and_then(|wkt| geometries.resolve(row, &raw.province, wkt));
        records.push(raw.into_record(geometry));
    }

    let dataset = Dataset::from_records(records);
    log::info!(
        "Loaded {} records across {} provinces ({} without usable geometry)",
        dataset.len(),
        dataset.provinces().len(),
        dataset.geometry_missing(),
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Id Perguruan Tinggi")]
    institution_id: String,
    #[serde(rename = "Id Geometry")]
    geometry_id: String,
    #[serde(rename = "Nama Perguruan Tinggi")]
    name: String,
    #[serde(rename = "Provinsi")]
    province: String,
    #[serde(rename = "Penyelenggara")]
    organizer: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Kode")]
    code: String,
    #[serde(rename = "Sumber")]
    source: String,
    #[serde(rename = "Dosen 2017")]
    staff_2017: Option<f64>,
    #[serde(rename = "Dosen 2018")]
    staff_2018: Option<f64>,
    #[serde(rename = "Mahasiswa 2017")]
    students_2017: Option<f64>,
    #[serde(rename = "Mahasiswa 2018")]
    students_2018: Option<f64>,
    #[serde(rename = "Rasio 2017")]
    ratio_2017: Option<f64>,
    #[serde(rename = "Rasio 2018")]
    ratio_2018: Option<f64>,
    #[serde(default)]
    geometry: Option<String>,
}

impl RawRow {
    fn into_record(self, geometry: Option<Arc<Geometry>>) -> InstitutionRecord {
        InstitutionRecord {
            institution_id: self.institution_id,
            geometry_id: self.geometry_id,
            name: self.name,
            province: self.province,
            organizer: self.organizer,
            status: self.status,
            code: self.code,
            source: self.source,
            y2017: YearMetrics {
                staff: self.staff_2017,
                students: self.students_2017,
                ratio: self.ratio_2017,
            },
            y2018: YearMetrics {
                staff: self.staff_2018,
                students: self.students_2018,
                ratio: self.ratio_2018,
            },
            geometry,
        }
    }
}

/// Parses each distinct WKT string once and hands out shared values.
#[derive(Default)]
struct GeometryInterner {
    by_text: HashMap<String, Option<Arc<Geometry>>>,
    by_province: HashMap<String, Arc<Geometry>>,
}

impl GeometryInterner {
    fn resolve(&mut self, row: usize, province: &str, wkt: &str) -> Option<Arc<Geometry>> {
        let parsed = match self.by_text.get(wkt) {
            Some(None) => {
                log::debug!("Row {row} ({province}): same unparseable geometry as an earlier row");
                None
            }
            Some(cached) => cached.clone(),
            None => {
                let parsed = match Geometry::from_wkt(wkt) {
                    Ok(g) => Some(Arc::new(g)),
                    Err(e) => {
                        log::warn!("Row {row} ({province}): unparseable geometry: {e}");
                        None
                    }
                };
                self.by_text.insert(wkt.to_string(), parsed.clone());
                parsed
            }
        };
        let geometry = parsed?;

        match self.by_province.get(province) {
            Some(first) if Arc::ptr_eq(first, &geometry) || **first == *geometry => {
                Some(first.clone())
            }
            Some(_) => {
                log::warn!("Row {row} ({province}): geometry differs from earlier rows of the province");
                Some(geometry)
            }
            None => {
                self.by_province
                    .insert(province.to_string(), geometry.clone());
                Some(geometry)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Year;

    const SOURCE_HEADER: &str = ",ID_x,ID_y,Nama Prodi,Provinsi,Penyelenggara,Status,kode,SUMBER,Dosen,Dosen.1,Mhs,Mhs.1,Rasio,Rasio.1,geometry";

    fn source_csv(rows: &[&str]) -> String {
        let mut text = String::from(SOURCE_HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn renames_source_columns_and_parses_metrics() {
        let csv = source_csv(&[
            r#"0,101,11,Universitas Syiah Kuala,Aceh,PTN,Aktif,AC,PDDikti,1500,1550,30000,31000,20.0,20.5,"POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))""#,
        ]);
        let ds = load_reader(csv.as_bytes()).unwrap();

        let r = &ds.records()[0];
        assert_eq!(r.institution_id, "101");
        assert_eq!(r.geometry_id, "11");
        assert_eq!(r.name, "Universitas Syiah Kuala");
        assert_eq!(r.code, "AC");
        assert_eq!(r.source, "PDDikti");
        assert_eq!(r.metrics(Year::Y2017).staff, Some(1500.0));
        assert_eq!(r.metrics(Year::Y2018).students, Some(31000.0));
        assert_eq!(r.metrics(Year::Y2018).ratio, Some(20.5));
        assert!(r.geometry.is_some());
    }

    #[test]
    fn empty_metric_cells_are_missing() {
        let csv = source_csv(&[r#"0,1,1,U,Aceh,PTS,Aktif,AC,S,,,,,,,"POLYGON EMPTY""#]);
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.records()[0].y2017.staff, None);
        assert_eq!(ds.records()[0].y2018.ratio, None);
    }

    #[test]
    fn bad_geometry_keeps_row_without_geometry() {
        let csv = source_csv(&[
            r#"0,1,1,U1,Aceh,PTN,Aktif,AC,S,1,1,1,1,1,1,"POLYGON ((0 0, 1 0))""#,
            r#"1,2,2,U2,Bali,PTN,Aktif,BA,S,1,1,1,1,1,1,"POLYGON ((0 0, 1 0, 1 1, 0 0))""#,
        ]);
        let ds = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.records()[0].geometry.is_none());
        assert!(ds.records()[1].geometry.is_some());
        assert_eq!(ds.geometry_missing(), 1);
    }

    #[test]
    fn rows_of_one_province_share_geometry() {
        let csv = source_csv(&[
            r#"0,1,1,U1,Aceh,PTN,Aktif,AC,S,1,1,1,1,1,1,"POLYGON ((0 0, 1 0, 1 1, 0 0))""#,
            r#"1,2,1,U2,Aceh,PTS,Aktif,AC,S,1,1,1,1,1,1,"POLYGON ((0 0, 1 0, 1 1, 0 0))""#,
        ]);
        let ds = load_reader(csv.as_bytes()).unwrap();
        let a = ds.records()[0].geometry.as_ref().unwrap();
        let b = ds.records()[1].geometry.as_ref().unwrap();
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn missing_columns_fail_the_load() {
        let err = load_reader("Provinsi,Status\nAceh,Aktif".as_bytes()).unwrap_err();
        let LoadError::MissingColumns(cols) = err else {
            panic!("unexpected error {err:?}");
        };
        assert!(cols.contains(&"Penyelenggara".to_string()));
        assert!(cols.contains(&"Nama Perguruan Tinggi".to_string()));
        assert!(!cols.contains(&"Provinsi".to_string()));
    }

    #[test]
    fn malformed_number_fails_the_load() {
        let csv = source_csv(&[r#"0,1,1,U,Aceh,PTS,Aktif,AC,S,many,1,1,1,1,1,"POLYGON EMPTY""#]);
        let err = load_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Row { row: 1, .. }), "{err:?}");
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            source_csv(&[r#"0,1,1,U,Aceh,PTS,Aktif,AC,S,1,2,3,4,5,6,"POLYGON EMPTY""#])
        )
        .unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.provinces(), ["Aceh"]);
    }
}
