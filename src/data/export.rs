use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use super::model::InstitutionRecord;

pub const FILE_NAME: &str = "filtered_data.csv";
pub const MIME_TYPE: &str = "text/csv";

/// Header of the exported table: every semantic column except `geometry`.
pub const EXPORT_COLUMNS: [&str; 14] = [
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

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing CSV")]
    Csv(#[from] csv::Error),
    #[error("writing export file")]
    Io(#[from] io::Error),
}

/// Field order must match [`EXPORT_COLUMNS`].
#[derive(Serialize)]
struct ExportRow<'a> {
    institution_id: &'a str,
    geometry_id: &'a str,
    name: &'a str,
    province: &'a str,
    organizer: &'a str,
    status: &'a str,
    code: &'a str,
    source: &'a str,
    staff_2017: Option<f64>,
    staff_2018: Option<f64>,
    students_2017: Option<f64>,
    students_2018: Option<f64>,
    ratio_2017: Option<f64>,
    ratio_2018: Option<f64>,
}

impl<'a> From<&'a InstitutionRecord> for ExportRow<'a> {
    fn from(r: &'a InstitutionRecord) -> Self {
        ExportRow {
            institution_id: &r.institution_id,
            geometry_id: &r.geometry_id,
            name: &r.name,
            province: &r.province,
            organizer: &r.organizer,
            status: &r.status,
            code: &r.code,
            source: &r.source,
            staff_2017: r.y2017.staff,
            staff_2018: r.y2018.staff,
            students_2017: r.y2017.students,
            students_2018: r.y2018.students,
            ratio_2017: r.y2017.ratio,
            ratio_2018: r.y2018.ratio,
        }
    }
}

/// Write `records` as CSV without the geometry column.
/// The header is always written, so an empty selection is still a valid table.
pub fn write_csv<'a, W: Write>(
    records: impl IntoIterator<Item = &'a InstitutionRecord>,
    out: W,
) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(EXPORT_COLUMNS)?;
    for r in records {
        writer.serialize(ExportRow::from(r))?;
    }
    writer.flush()?;
    Ok(())
}

/// A ready-to-save download of the filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDownload {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: Vec<u8>,
}

impl CsvDownload {
    pub fn build<'a>(
        records: impl IntoIterator<Item = &'a InstitutionRecord>,
    ) -> Result<Self, ExportError> {
        let mut contents = Vec::new();
        write_csv(records, &mut contents)?;
        Ok(CsvDownload {
            file_name: FILE_NAME,
            mime_type: MIME_TYPE,
            contents,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.contents)?;
        log::info!(
            "Wrote {} ({} bytes, {}) to {}",
            self.file_name,
            self.contents.len(),
            self.mime_type,
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_records, FilterState};
    use crate::data::fixtures::{record, two_provinces};
    use crate::data::loader::load_reader;
    use crate::data::model::YearMetrics;

    fn without_geometry(records: &[&InstitutionRecord]) -> Vec<InstitutionRecord> {
        records
            .iter()
            .map(|r| InstitutionRecord {
                geometry: None,
                ..(*r).clone()
            })
            .collect()
    }

    #[test]
    fn reloaded_export_matches_filtered_records() {
        let mut odd = record("Nusa Tenggara Timur", "PTS, Swasta", "Aktif");
        odd.name = "Universitas \"Kupang\"".to_string();
        odd.y2017 = YearMetrics {
            staff: Some(12.0),
            students: Some(340.5),
            ratio: Some(0.1 + 0.2),
        };
        odd.y2018 = YearMetrics {
            staff: None,
            students: Some(1e6),
            ratio: None,
        };
        let records = vec![odd, record("Aceh", "PTN", "Aktif"), record("Bali", "PTS, Swasta", "Aktif")];
        let filters = FilterState {
            organizers: ["PTS, Swasta".to_string()].into(),
            ..Default::default()
        };
        let filtered = filter_records(&records, &filters);

        let download = CsvDownload::build(filtered.iter().copied()).unwrap();
        let reloaded = load_reader(download.contents.as_slice()).unwrap();

        assert_eq!(reloaded.records(), without_geometry(&filtered).as_slice());
    }

    #[test]
    fn empty_selection_exports_header_only() {
        let download = CsvDownload::build(std::iter::empty()).unwrap();
        let text = String::from_utf8(download.contents).unwrap();
        assert_eq!(text.trim_end(), EXPORT_COLUMNS.join(","));
        assert_eq!(download.file_name, "filtered_data.csv");
        assert_eq!(download.mime_type, "text/csv");
    }

    #[test]
    fn geometry_column_is_dropped() {
        let ds = two_provinces();
        let mut out = Vec::new();
        write_csv(ds.records(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("geometry"));
        assert!(!text.contains("POLYGON"));
        assert_eq!(text.lines().count(), ds.len() + 1);
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        let ds = two_provinces();
        CsvDownload::build(ds.records()).unwrap().save(&path).unwrap();
        let reloaded = crate::data::loader::load_file(&path).unwrap();
        assert_eq!(reloaded.len(), ds.len());
    }
}
