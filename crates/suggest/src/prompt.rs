//! Prompt sent to the AI provider for one patient.

use dxassist_core::PatientRecord;

/// Instruction placed ahead of the patient data.
pub const INSTRUCTION: &str = "Analyze the following patient data and provide a concise 'Suggested Diagnosis' and 'Suggested Medication'.\n\
Format the response with 'Suggested Diagnosis:' on one line and 'Suggested Medication:' on the next.\n\
This is for a hypothetical tool and not real medical advice.";

/// Builds the prompt for a single record.
///
/// The output depends only on the record's fields, so the same record always
/// yields the same prompt. The identifier is left out.
pub fn build_prompt(record: &PatientRecord) -> String {
    let p = &record.fields;
    format!(
        "{INSTRUCTION}\n\
         \n\
         PATIENT DATA:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Blood Pressure: {bp}\n\
         - Current Symptoms: {symptoms}\n\
         - Medication History: {meds}\n\
         - Height (cm): {height}\n\
         - Weight (kg): {weight}\n\
         - BMI: {bmi}\n\
         \n\
         RESPONSE:\n",
        age = p.age,
        gender = or_na(&p.gender),
        bp = p.blood_pressure(),
        symptoms = or_na(&p.symptoms),
        meds = or_na(&p.medication_history),
        height = p.height_cm,
        weight = p.weight_kg,
        bmi = p.bmi,
    )
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}
