//! Initial patient data load from CSV.
//!
//! The file is optional: a missing file yields an empty store. Columns are
//! matched by header name, so extra or reordered columns are fine.
//!
//! ```text
//! ID,Age,Gender,Height (cm),Weight (kg),BMI,BP,Symptoms,Medication History
//! 1,45,Male,175.0,80.0,26.12,130/85,Fatigue,None
//! ```

use crate::constants::{COL_AGE, COL_BMI, COL_HEIGHT, COL_WEIGHT, CSV_HEADERS};
use crate::patient::{
    parse_f64, parse_positive_f64, parse_u32, BloodPressure, PatientFields, PatientId,
    PatientRecord,
};
use crate::store::PatientStore;
use crate::{PatientError, PatientResult};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One CSV row before coercion. Absent columns read as blank.
///
/// The renames must match `CSV_HEADERS`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Height (cm)")]
    height_cm: String,
    #[serde(rename = "Weight (kg)")]
    weight_kg: String,
    #[serde(rename = "BMI")]
    bmi: String,
    #[serde(rename = "BP")]
    bp: String,
    #[serde(rename = "Symptoms")]
    symptoms: String,
    #[serde(rename = "Medication History")]
    medication_history: String,
}

impl CsvRow {
    fn into_fields(self) -> PatientResult<PatientFields> {
        let bp: BloodPressure = self.bp.parse()?;
        let fields = PatientFields {
            age: parse_u32(COL_AGE, &self.age)?,
            gender: self.gender.trim().to_string(),
            height_cm: parse_positive_f64(COL_HEIGHT, &self.height_cm)?,
            weight_kg: parse_positive_f64(COL_WEIGHT, &self.weight_kg)?,
            bmi: parse_f64(COL_BMI, &self.bmi)?,
            systolic: bp.systolic,
            diastolic: bp.diastolic,
            symptoms: self.symptoms.trim().to_string(),
            medication_history: self.medication_history.trim().to_string(),
        };
        fields.validate()?;
        Ok(fields)
    }
}

/// Loads the initial store from a CSV file.
///
/// # Returns
///
/// An empty store if `path` does not exist. Otherwise a store seeded with
/// every row that coerces cleanly; bad rows are skipped with a warning.
/// Rows with a blank or non-numeric `ID` get fresh identifiers after all
/// numbered rows are placed.
///
/// # Errors
///
/// Returns `PatientError::FileRead` if the file exists but cannot be opened,
/// and `PatientError::Csv` if the CSV structure itself is broken.
pub fn load_patients_csv(path: &Path) -> PatientResult<PatientStore> {
    if !path.is_file() {
        tracing::warn!(
            "patient file {} not found, starting with an empty store",
            path.display()
        );
        return Ok(PatientStore::new());
    }

    let file = std::fs::File::open(path).map_err(PatientError::FileRead)?;
    let store = read_patients(file)?;

    tracing::info!("loaded {} patients from {}", store.len(), path.display());
    Ok(store)
}

/// Reads patient rows from any CSV source.
pub fn read_patients<R: Read>(source: R) -> PatientResult<PatientStore> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    for column in CSV_HEADERS {
        if !headers.iter().any(|h| h == column) {
            tracing::warn!("patient CSV has no {:?} column", column);
        }
    }

    let mut numbered: Vec<PatientRecord> = Vec::new();
    let mut unnumbered: Vec<PatientFields> = Vec::new();

    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = row?;
        let id = parse_id(&row.id);
        if id.is_none() && !row.id.trim().is_empty() {
            tracing::warn!(
                "patient CSV line {} has unusable id {:?}, assigning a fresh one",
                line,
                row.id
            );
        }

        match row.into_fields() {
            Ok(fields) => match id {
                Some(id) => numbered.push(PatientRecord { id, fields }),
                None => unnumbered.push(fields),
            },
            Err(e) => tracing::warn!("skipping patient CSV line {}: {}", line, e),
        }
    }

    let mut store = PatientStore::from_records(numbered);
    for fields in unnumbered {
        if let Err(e) = store.add(fields) {
            tracing::warn!("skipping unnumbered patient CSV row: {}", e);
        }
    }

    Ok(store)
}

/// Largest float id that converts to an integer exactly (2^53).
const MAX_FLOAT_ID: f64 = 9_007_199_254_740_992.0;

/// Usable CSV id, or `None` for blank, malformed or out-of-range values.
///
/// `PatientId::MAX` is rejected so that a seeded store always has room for
/// the counter.
fn parse_id(raw: &str) -> Option<PatientId> {
    let raw = raw.trim();
    match raw.parse::<PatientId>() {
        Ok(id) => (id < PatientId::MAX).then_some(id),
        // pandas writes nullable integer columns as "3.0"
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= MAX_FLOAT_ID)
            .map(|v| v as PatientId),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "ID,Age,Gender,Height (cm),Weight (kg),BMI,BP,Symptoms,Medication History\n";

    #[test]
    fn test_missing_file_gives_empty_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = load_patients_csv(&temp_dir.path().join("absent.csv"))
            .expect("missing file is not an error");
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_load_splits_blood_pressure() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "{HEADER}1,45,Male,175.0,80.0,26.12,130/85,Fatigue,None\n\
             4,62,Female,160.5,70.2,27.25,145/92,\"Chest Pain, Dizziness\",Lisinopril\n"
        )
        .unwrap();

        let mut store = load_patients_csv(&path).expect("load should succeed");
        assert_eq!(store.len(), 2);

        let second = store.get(4).unwrap().fields.clone();
        assert_eq!(second.systolic, 145);
        assert_eq!(second.diastolic, 92);
        assert_eq!(second.symptoms, "Chest Pain, Dizziness");

        let next = store.add(second).unwrap();
        assert_eq!(next, 5);
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let csv = format!(
            "{HEADER}1,45,Male,175,80,26.1,130/85,Fatigue,None\n\
             2,abc,Male,175,80,26.1,130/85,Fatigue,None\n\
             3,50,Male,175,80,26.1,13085,Fatigue,None\n"
        );
        let store = read_patients(csv.as_bytes()).unwrap();
        let ids: Vec<_> = store.list().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_unnumbered_rows_get_fresh_ids() {
        let csv = format!(
            "{HEADER},30,Other,170,70,24.2,120/80,Cough,None\n\
             2.0,40,Male,180,90,27.8,125/82,Headache,Aspirin\n"
        );
        let store = read_patients(csv.as_bytes()).unwrap();
        let ids: Vec<_> = store.list().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(store.get(3).unwrap().fields.gender, "Other");
    }

    #[test]
    fn test_parse_id_bounds() {
        assert_eq!(parse_id("7"), Some(7));
        assert_eq!(parse_id("7.0"), Some(7));
        assert_eq!(parse_id("18446744073709551614"), Some(PatientId::MAX - 1));
        assert_eq!(parse_id("18446744073709551615"), None);
        assert_eq!(parse_id("1e30"), None);
        assert_eq!(parse_id("9007199254740994.0"), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_out_of_range_ids_get_fresh_ids() {
        let csv = format!(
            "{HEADER}18446744073709551615,45,Male,175,80,26.1,130/85,Fatigue,None\n\
             1e30,50,Female,160,60,23.4,120/80,Cough,None\n\
             ,55,Male,170,70,24.2,125/82,Headache,None\n"
        );
        let store = read_patients(csv.as_bytes()).expect("load should not fail");
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_top_of_range_id_does_not_break_load() {
        let csv = format!(
            "{HEADER}18446744073709551614,45,Male,175,80,26.1,130/85,Fatigue,None\n\
             ,55,Male,170,70,24.2,125/82,Headache,None\n"
        );
        let mut store = read_patients(csv.as_bytes()).expect("load should not fail");
        assert_eq!(ids(&store), vec![PatientId::MAX - 1]);

        let fields = store.get(PatientId::MAX - 1).unwrap().fields.clone();
        assert!(matches!(store.add(fields), Err(PatientError::IdsExhausted)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_then_add_never_repeat() {
        let csv = format!(
            "{HEADER}5,45,Male,175,80,26.1,130/85,Fatigue,None\n\
             5,46,Male,175,80,26.1,130/85,Cough,None\n\
             ,47,Male,175,80,26.1,130/85,Rash,None\n\
             2,48,Male,175,80,26.1,130/85,Fever,None\n"
        );
        let mut store = read_patients(csv.as_bytes()).unwrap();
        let fields = store.get(5).unwrap().fields.clone();
        store.add(fields).unwrap();

        assert_eq!(ids(&store), vec![5, 2, 6, 7]);
        assert_eq!(store.get(5).unwrap().fields.age, 45);
    }

    #[test]
    fn test_row_renames_match_header_constants() {
        let csv = format!(
            "{}\n9,45,Male,175,80,26.1,130/85,Fatigue,Aspirin\n",
            CSV_HEADERS.join(",")
        );
        let store = read_patients(csv.as_bytes()).unwrap();
        let f = &store.get(9).expect("row should load").fields;
        assert_eq!(f.gender, "Male");
        assert_eq!(f.symptoms, "Fatigue");
        assert_eq!(f.medication_history, "Aspirin");
        assert_eq!(f.height_cm, 175.0);
    }

    fn ids(store: &PatientStore) -> Vec<PatientId> {
        store.list().map(|r| r.id).collect()
    }
}
