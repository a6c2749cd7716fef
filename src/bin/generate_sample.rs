//! Writes a small synthetic institution table in the source column layout
//! (leading index column, short metric names, WKT province outlines).
//!
//! ```text
//! cargo run --bin generate_sample -- sample.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Province name, province code, lower-left corner of its box outline.
const PROVINCES: [(&str, &str, f64, f64); 6] = [
    ("Aceh", "11", 95.0, 3.0),
    ("Sumatera Utara", "12", 97.5, 1.0),
    ("DKI Jakarta", "31", 106.6, -6.4),
    ("Jawa Barat", "32", 106.0, -7.8),
    ("Bali", "51", 114.4, -8.9),
    ("Papua", "94", 136.0, -5.0),
];

const ORGANIZERS: [&str; 3] = ["Kemenristekdikti", "Kemenag", "Kementerian Lain"];
const STATUSES: [&str; 2] = ["Aktif", "Tidak Aktif"];

/// Box outline as a closed WKT polygon; Bali is split into two parts to
/// exercise MULTIPOLYGON parsing.
fn outline(name: &str, x: f64, y: f64) -> String {
    let square = |x: f64, y: f64, size: f64| {
        format!(
            "(({x} {y}, {x2} {y}, {x2} {y2}, {x} {y2}, {x} {y}))",
            x2 = x + size,
            y2 = y + size
        )
    };
    if name == "Bali" {
        format!("MULTIPOLYGON ({}, {})", square(x, y, 0.8), square(x + 1.0, y, 0.2))
    } else {
        format!("POLYGON {}", square(x, y, 1.5))
    }
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("perguruanTinggiIndonesia.csv"));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record([
        "", "ID_x", "ID_y", "Nama Prodi", "Provinsi", "Penyelenggara", "Status", "kode",
        "SUMBER", "Dosen", "Dosen.1", "Mhs", "Mhs.1", "Rasio", "Rasio.1", "geometry",
    ])?;

    let mut index = 0usize;
    for (p, (province, code, x, y)) in PROVINCES.iter().enumerate() {
        let geometry = outline(province, *x, *y);
        // Larger provinces in the list get more institutions.
        let institutions = 3 + (p * 7) % 11;
        for i in 0..institutions {
            let staff_2017 = 20 + (index * 37) % 400;
            let staff_2018 = staff_2017 + (index % 9);
            let students_2017 = staff_2017 * (15 + index % 20);
            let students_2018 = students_2017 + (index * 13) % 500;
            let ratio = |students: usize, staff: usize| format!("{:.2}", students as f64 / staff as f64);

            writer.write_record([
                index.to_string(),
                format!("{}{:03}", code, i + 1),
                code.to_string(),
                format!("Universitas {province} {}", i + 1),
                province.to_string(),
                ORGANIZERS[(index + p) % ORGANIZERS.len()].to_string(),
                STATUSES[usize::from(index % 7 == 0)].to_string(),
                code.to_string(),
                "PDDikti".to_string(),
                staff_2017.to_string(),
                staff_2018.to_string(),
                students_2017.to_string(),
                students_2018.to_string(),
                ratio(students_2017, staff_2017),
                ratio(students_2018, staff_2018),
                geometry.clone(),
            ])?;
            index += 1;
        }
    }

    writer.flush()?;
    println!("Wrote {index} rows to {}", path.display());
    Ok(())
}
