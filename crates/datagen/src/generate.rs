//! Hypothetical patient records with age-dependent conditions.
//!
//! Patients under 45 get one or two acute symptoms and up to two acute
//! medications. Older patients lean towards chronic conditions (60%) and
//! otherwise get an acute profile. Blood pressure rises with age and BMI.

use dxassist_core::{compute_bmi, PatientFields, PatientRecord, CSV_HEADERS};
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::Write;

const ACUTE_SYMPTOMS: &[&str] = &[
    "Fever",
    "Cough",
    "Sore Throat",
    "Headache",
    "Nausea",
    "Fatigue",
    "Runny Nose",
    "Body Aches",
    "Vomiting",
    "Diarrhea",
];

const CHRONIC_SYMPTOMS: &[&str] = &[
    "Shortness of Breath",
    "Chest Pain",
    "Dizziness",
    "Joint Pain",
    "Swelling in Legs",
    "Persistent Cough",
    "High Blood Sugar",
    "Blurred Vision",
];

const ACUTE_MEDICATIONS: &[&str] = &[
    "Ibuprofen",
    "Acetaminophen",
    "Amoxicillin",
    "Cough Syrup",
    "Decongestant",
    "Antihistamine",
    "Oseltamivir",
];

const CHRONIC_MEDICATIONS: &[&str] = &[
    "Lisinopril",
    "Metformin",
    "Simvastatin",
    "Amlodipine",
    "Metoprolol",
    "Warfarin",
    "Insulin",
    "Aspirin",
    "Furosemide",
];

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 85;
/// Patients at or above this age may get a chronic profile.
const CHRONIC_AGE: u32 = 45;
const CHRONIC_CHANCE: f64 = 0.6;

pub const GENDERS: [&str; 2] = ["Male", "Female"];

/// `count` patients numbered from 1.
pub fn generate_patients<R: Rng>(rng: &mut R, count: usize) -> Vec<PatientRecord> {
    (1..=count as u64)
        .map(|id| PatientRecord {
            id,
            fields: generate_fields(rng),
        })
        .collect()
}

fn generate_fields<R: Rng>(rng: &mut R) -> PatientFields {
    let age = rng.gen_range(MIN_AGE..=MAX_AGE);
    let male = rng.gen_bool(0.5);
    let gender = if male { GENDERS[0] } else { GENDERS[1] };

    let height_cm = if male {
        round2(rng.gen_range(165.0..=195.0))
    } else {
        round2(rng.gen_range(150.0..=180.0))
    };

    let height_m = height_cm / 100.0;
    let base_bmi: f64 = rng.gen_range(19.0..30.0);
    let weight_kg = round2(base_bmi * height_m * height_m + rng.gen_range(-5.0..=5.0));
    let bmi = compute_bmi(height_cm, weight_kg);

    let systolic_base = 110.0 + f64::from(age) * 0.2 + bmi * 0.3;
    let diastolic_base = 70.0 + f64::from(age) * 0.1 + bmi * 0.2;
    let systolic = (systolic_base + f64::from(rng.gen_range(-10i32..=10))) as u32;
    let diastolic = (diastolic_base + f64::from(rng.gen_range(-5i32..=8))) as u32;

    let chronic = age >= CHRONIC_AGE && rng.gen_bool(CHRONIC_CHANCE);
    let (symptoms, medications) = if chronic {
        (
            pick(rng, CHRONIC_SYMPTOMS, 1, 3),
            pick(rng, CHRONIC_MEDICATIONS, 1, 3),
        )
    } else {
        (
            pick(rng, ACUTE_SYMPTOMS, 1, 2),
            pick(rng, ACUTE_MEDICATIONS, 0, 2),
        )
    };

    PatientFields {
        age,
        gender: gender.to_string(),
        height_cm,
        weight_kg,
        bmi,
        systolic,
        diastolic,
        symptoms,
        medication_history: if medications.is_empty() {
            "None".to_string()
        } else {
            medications
        },
    }
}

/// Between `min` and `max` distinct entries, comma separated.
fn pick<R: Rng>(rng: &mut R, items: &[&str], min: usize, max: usize) -> String {
    let k = rng.gen_range(min..=max);
    items
        .choose_multiple(rng, k)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Writes `records` as a patient CSV the dashboard can load.
pub fn write_patients_csv<W: Write>(records: &[PatientRecord], out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADERS)?;

    for record in records {
        let f = &record.fields;
        wtr.write_record([
            record.id.to_string(),
            f.age.to_string(),
            f.gender.clone(),
            f.height_cm.to_string(),
            f.weight_kg.to_string(),
            f.bmi.to_string(),
            f.blood_pressure().to_string(),
            f.symptoms.clone(),
            f.medication_history.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxassist_core::loader::read_patients;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(count: usize) -> Vec<PatientRecord> {
        let mut rng = StdRng::seed_from_u64(42);
        generate_patients(&mut rng, count)
    }

    #[test]
    fn test_generated_fields_are_in_range() {
        let records = sample(200);
        assert_eq!(records.len(), 200);

        for (i, r) in records.iter().enumerate() {
            let f = &r.fields;
            assert_eq!(r.id, i as u64 + 1);
            assert!((MIN_AGE..=MAX_AGE).contains(&f.age));
            assert!(GENDERS.contains(&f.gender.as_str()));
            assert!(f.validate().is_ok(), "record {} invalid: {:?}", r.id, f);
            assert_eq!(f.bmi, compute_bmi(f.height_cm, f.weight_kg));
            assert!(!f.symptoms.is_empty());
            assert!(!f.medication_history.is_empty());
        }
    }

    #[test]
    fn test_young_patients_only_get_acute_profiles() {
        for r in sample(200).iter().filter(|r| r.fields.age < CHRONIC_AGE) {
            for symptom in r.fields.symptoms.split(", ") {
                assert!(ACUTE_SYMPTOMS.contains(&symptom), "{symptom}");
            }
            if r.fields.medication_history != "None" {
                for med in r.fields.medication_history.split(", ") {
                    assert!(ACUTE_MEDICATIONS.contains(&med), "{med}");
                }
            }
        }
    }

    #[test]
    fn test_same_seed_gives_same_data() {
        assert_eq!(sample(20), sample(20));
    }

    #[test]
    fn test_written_csv_loads_back() {
        let records = sample(20);
        let mut buf = Vec::new();
        write_patients_csv(&records, &mut buf).expect("write should succeed");

        let store = read_patients(buf.as_slice()).expect("generated CSV should load");
        assert_eq!(store.len(), 20);
        assert_eq!(store.next_id(), 21);
        for r in &records {
            let loaded = store.get(r.id).expect("every row should load");
            assert_eq!(loaded.fields, r.fields);
        }
    }
}
