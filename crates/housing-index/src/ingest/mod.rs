//! Tabular ingestion of housing development records.
//!
//! Files are read as CSV, headers are normalized and matched against a
//! bilingual alias table, and each row is coerced into a
//! [`DevelopmentRecord`]. Rows without an identity, coordinates, or a total
//! apartment count are skipped and reported in the [`ImportSummary`].

mod mapping;
mod normalizer;
mod parser;

use crate::developments::domain::DevelopmentRecord;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::info;

const SAMPLE_DATASET: &str = include_str!("../../data/moscow_sample.csv");
const SAMPLE_LABEL: &str = "bundled:moscow_sample.csv";

#[derive(Debug)]
pub enum ImportError {
    Io { path: PathBuf, error: std::io::Error },
    Csv { file: String, error: csv::Error },
    EmptyDirectory(PathBuf),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io { path, error } => {
                write!(f, "failed to read {}: {}", path.display(), error)
            }
            ImportError::Csv { file, error } => {
                write!(f, "invalid development data in {}: {}", file, error)
            }
            ImportError::EmptyDirectory(path) => {
                write!(f, "no CSV files found in {}", path.display())
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io { error, .. } => Some(error),
            ImportError::Csv { error, .. } => Some(error),
            ImportError::EmptyDirectory(_) => None,
        }
    }
}

/// Mandatory field a skipped row was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Identity,
    Location,
    TotalUnits,
}

impl MissingField {
    pub fn label(self) -> &'static str {
        match self {
            MissingField::Identity => "identity",
            MissingField::Location => "location",
            MissingField::TotalUnits => "total_units",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub source: String,
    pub line: u64,
    pub missing: MissingField,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub files: Vec<String>,
    pub rows: usize,
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportedDevelopments {
    pub records: Vec<DevelopmentRecord>,
    pub summary: ImportSummary,
}

impl ImportedDevelopments {
    fn absorb(&mut self, source: String, parsed: parser::ParsedRows) {
        self.summary.files.push(source);
        self.summary.rows += parsed.rows;
        self.summary.imported += parsed.records.len();
        self.summary.skipped.extend(parsed.skipped);
        self.records.extend(parsed.records);
    }
}

/// Where development records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Sample,
    Path(PathBuf),
}

impl DataSource {
    pub fn from_optional_path(path: Option<PathBuf>) -> Self {
        path.map(DataSource::Path).unwrap_or(DataSource::Sample)
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Sample => SAMPLE_LABEL.to_string(),
            DataSource::Path(path) => path.display().to_string(),
        }
    }
}

pub struct DevelopmentImporter;

impl DevelopmentImporter {
    pub fn load(source: &DataSource) -> Result<ImportedDevelopments, ImportError> {
        match source {
            DataSource::Sample => Self::sample(),
            DataSource::Path(path) => Self::from_path(path),
        }
    }

    /// Reads one CSV file, or every `*.csv` file of a directory in file name order.
    pub fn from_path(path: impl AsRef<Path>) -> Result<ImportedDevelopments, ImportError> {
        let path = path.as_ref();
        let files = if path.is_dir() {
            csv_files_in(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let mut imported = ImportedDevelopments::default();
        for file in files {
            let handle = File::open(&file).map_err(|error| ImportError::Io {
                path: file.clone(),
                error,
            })?;
            let label = file.display().to_string();
            let parsed = parse(BufReader::new(handle), &label)?;
            imported.absorb(label, parsed);
        }

        log_summary(&imported.summary);
        Ok(imported)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        label: &str,
    ) -> Result<ImportedDevelopments, ImportError> {
        let mut imported = ImportedDevelopments::default();
        let parsed = parse(reader, label)?;
        imported.absorb(label.to_string(), parsed);
        log_summary(&imported.summary);
        Ok(imported)
    }

    pub fn sample() -> Result<ImportedDevelopments, ImportError> {
        Self::from_reader(SAMPLE_DATASET.as_bytes(), SAMPLE_LABEL)
    }
}

fn parse<R: Read>(reader: R, label: &str) -> Result<parser::ParsedRows, ImportError> {
    parser::parse_rows(reader, label).map_err(|error| ImportError::Csv {
        file: label.to_string(),
        error,
    })
}

fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let entries = fs::read_dir(dir).map_err(|error| ImportError::Io {
        path: dir.to_path_buf(),
        error,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| ImportError::Io {
            path: dir.to_path_buf(),
            error,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(ImportError::EmptyDirectory(dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

fn log_summary(summary: &ImportSummary) {
    info!(
        files = summary.files.len(),
        rows = summary.rows,
        imported = summary.imported,
        skipped = summary.skipped.len(),
        "development data imported"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Название,Широта,Долгота,Всего квартир,Студии,Средняя площадь,Пандус,Парковочные места\n";

    #[test]
    fn bundled_sample_imports_every_row() {
        let imported = DevelopmentImporter::sample().expect("sample parses");

        assert_eq!(imported.records.len(), 3);
        assert_eq!(imported.summary.rows, 3);
        assert!(imported.summary.skipped.is_empty());
        assert_eq!(imported.summary.files, vec![SAMPLE_LABEL.to_string()]);
    }

    #[test]
    fn russian_headers_and_locale_numbers_are_understood() {
        let data = format!("{HEADER}ЖК Тест,\"55,75\",\"37,61\",1 200,300,\"42,5\",да,600\n");

        let imported = DevelopmentImporter::from_reader(data.as_bytes(), "inline").expect("parses");

        let record = &imported.records[0];
        assert_eq!(record.id.as_str(), "ЖК Тест");
        assert_eq!(record.name, "ЖК Тест");
        assert_eq!(record.location.lat, 55.75);
        assert_eq!(record.unit_mix.total, 1200);
        assert_eq!(record.unit_mix.studio, Some(300));
        assert_eq!(record.building_shape.avg_unit_area, Some(42.5));
        assert_eq!(record.amenities.ramp, Some(true));
        assert_eq!(record.amenities.parking_coverage, Some(0.5));
    }

    #[test]
    fn rows_missing_mandatory_fields_are_reported() {
        let data = format!(
            "{HEADER}Без координат,,,100,,,,\nБез квартир,55.7,37.6,,,,,\n,55.7,37.6,100,,,,\nЖК Есть,55.7,37.6,100,,,,\n"
        );

        let imported = DevelopmentImporter::from_reader(data.as_bytes(), "inline").expect("parses");

        assert_eq!(imported.records.len(), 1);
        assert_eq!(imported.summary.rows, 4);
        let missing: Vec<_> = imported
            .summary
            .skipped
            .iter()
            .map(|row| row.missing)
            .collect();
        assert_eq!(
            missing,
            vec![
                MissingField::Location,
                MissingField::TotalUnits,
                MissingField::Identity
            ]
        );
        assert_eq!(imported.summary.skipped[0].line, 2);
    }

    #[test]
    fn out_of_range_coordinates_skip_the_row() {
        let data = format!("{HEADER}ЖК Север,95,37.6,100,,,,\n");

        let imported = DevelopmentImporter::from_reader(data.as_bytes(), "inline").expect("parses");

        assert!(imported.records.is_empty());
        assert_eq!(imported.summary.skipped[0].missing, MissingField::Location);
    }

    #[test]
    fn categories_above_total_are_kept_as_reported() {
        let data = "id,name,lat,lon,total,studios,one_room\n\
                    a,Alpha,55.7,37.6,100,80,60\n";

        let imported = DevelopmentImporter::from_reader(data.as_bytes(), "inline").expect("parses");

        let mix = &imported.records[0].unit_mix;
        assert_eq!(mix.total, 100);
        assert_eq!(mix.categorized(), 140);
        assert!(mix.exceeds_total());
    }

    #[test]
    fn derived_elevator_ratio_comes_from_counts() {
        let data = "id,name,lat,lon,total_apartments,elevators,entrances\n\
                    a,Alpha,55.7,37.6,100,6,4\n";

        let imported = DevelopmentImporter::from_reader(data.as_bytes(), "inline").expect("parses");

        let shape = &imported.records[0].building_shape;
        assert_eq!(shape.elevators_per_entrance, Some(1.5));
        assert_eq!(imported.records[0].amenities.elevators, Some(6));
    }

    #[test]
    fn directories_load_csv_files_in_name_order() {
        let dir = std::env::temp_dir().join(format!(
            "housing-index-ingest-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        fs::create_dir_all(&dir).expect("temp dir");
        fs::write(
            dir.join("b.csv"),
            "id,name,lat,lon,total\nb,Beta,55.7,37.6,50\n",
        )
        .expect("write b");
        fs::write(
            dir.join("a.csv"),
            "id,name,lat,lon,total\na,Alpha,55.7,37.6,40\n",
        )
        .expect("write a");
        fs::write(dir.join("notes.txt"), "ignored").expect("write notes");

        let imported = DevelopmentImporter::from_path(&dir).expect("directory parses");
        fs::remove_dir_all(&dir).ok();

        let ids: Vec<_> = imported
            .records
            .iter()
            .map(|record| record.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(imported.summary.files.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DevelopmentImporter::from_path("/definitely/not/here.csv")
            .expect_err("missing file");
        assert!(matches!(err, ImportError::Io { .. }));
    }

    #[test]
    fn coercion_accepts_locale_variants() {
        assert_eq!(parser::parse_decimal_for_tests("2,7"), Some(2.7));
        assert_eq!(parser::parse_decimal_for_tests("85%"), Some(0.85));
        assert_eq!(parser::parse_decimal_for_tests("1\u{a0}200"), Some(1200.0));
        assert_eq!(parser::parse_decimal_for_tests("n/a"), None);
        assert_eq!(parser::parse_flag_for_tests("Нет"), Some(false));
        assert_eq!(parser::parse_flag_for_tests("есть"), Some(true));
        assert_eq!(parser::parse_flag_for_tests("2"), Some(true));
        assert_eq!(parser::parse_flag_for_tests("maybe"), None);
    }
}
