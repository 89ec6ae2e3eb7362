//! Point-sum clinical scores.
//!
//! Every calculator here is a set of choice fields whose values are summed;
//! the total is shown as a plain number and banded into an interpretation.

use crate::calculator::{
    CalculatorDefinition, Choice, FieldDefinition, FormulaInputs, FormulaResult,
};
use crate::format::number;
use crate::specialty::Specialty;

const YES_NO: &[Choice] = &[Choice::new("No", 0.0), Choice::new("Yes", 1.0)];
const NONE_ONE_BOTH: &[Choice] = &[
    Choice::new("None", 0.0),
    Choice::new("One", 1.0),
    Choice::new("Both", 2.0),
];

/// Yes/No where "Yes" carries more than one point.
macro_rules! weighted_yes {
    ($points:expr) => {
        &[Choice::new("No", 0.0), Choice::new("Yes", $points)]
    };
}

fn score_result(score: f64, unit: &str, interpretation: &str) -> FormulaResult {
    FormulaResult::new(number(score), unit).interpreted(interpretation)
}

pub const HAS_BLED: CalculatorDefinition = CalculatorDefinition {
    id: "has-bled",
    name: "HAS-BLED Bleeding Risk",
    short_name: "HAS-BLED",
    specialty: Specialty::Cardiology,
    description: "Risk of major bleeding for AFib patients on anticoagulants.",
    fields: &[
        FieldDefinition::choice("h", "Hypertension (SBP >160)", YES_NO),
        FieldDefinition::choice("a", "Abnormal Renal/Liver Function", NONE_ONE_BOTH),
        FieldDefinition::choice("s", "Stroke History", YES_NO),
        FieldDefinition::choice("b", "Bleeding History or Predisposition", YES_NO),
        FieldDefinition::choice("l", "Labile INR", YES_NO),
        FieldDefinition::choice("e", "Elderly (Age >65)", YES_NO),
        FieldDefinition::choice("d", "Drugs/Alcohol Use", NONE_ONE_BOTH),
    ],
    compute: has_bled,
};

fn has_bled(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["h", "a", "s", "b", "l", "e", "d"]);
    let interpretation = if score >= 3.0 { "High Risk" } else { "Low/Moderate Risk" };
    score_result(score, "Points", interpretation)
}

pub const BISAP: CalculatorDefinition = CalculatorDefinition {
    id: "bisap",
    name: "BISAP Score (Pancreatitis)",
    short_name: "BISAP",
    specialty: Specialty::Gastroenterology,
    description: "Predicts mortality in acute pancreatitis.",
    fields: &[
        FieldDefinition::choice("bun", "BUN >25 mg/dL", YES_NO),
        FieldDefinition::choice("ment", "Impaired Mental Status", YES_NO),
        FieldDefinition::choice("sirs", "SIRS Present", YES_NO),
        FieldDefinition::choice("age", "Age >60", YES_NO),
        FieldDefinition::choice("eff", "Pleural Effusion", YES_NO),
    ],
    compute: bisap,
};

fn bisap(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["bun", "ment", "sirs", "age", "eff"]);
    let interpretation = if score >= 3.0 { "High Mortality Risk" } else { "Lower Risk" };
    score_result(score, "Points", interpretation)
}

pub const HEART: CalculatorDefinition = CalculatorDefinition {
    id: "heart-score",
    name: "HEART Score for Chest Pain",
    short_name: "HEART",
    specialty: Specialty::Emergency,
    description: "Predicts major adverse cardiac events.",
    fields: &[
        FieldDefinition::choice(
            "h",
            "History (Suspicion)",
            &[Choice::new("Low", 0.0), Choice::new("Moderate", 1.0), Choice::new("High", 2.0)],
        ),
        FieldDefinition::choice(
            "e",
            "ECG",
            &[
                Choice::new("Normal", 0.0),
                Choice::new("Non-specific", 1.0),
                Choice::new("ST-Depression", 2.0),
            ],
        ),
        FieldDefinition::choice(
            "a",
            "Age",
            &[Choice::new("<45", 0.0), Choice::new("45-64", 1.0), Choice::new("≥65", 2.0)],
        ),
        FieldDefinition::choice(
            "r",
            "Risk Factors",
            &[Choice::new("None", 0.0), Choice::new("1-2", 1.0), Choice::new("≥3", 2.0)],
        ),
        FieldDefinition::choice(
            "t",
            "Troponin",
            &[
                Choice::new("Normal", 0.0),
                Choice::new("1-3x Limit", 1.0),
                Choice::new(">3x Limit", 2.0),
            ],
        ),
    ],
    compute: heart,
};

fn heart(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["h", "e", "a", "r", "t"]);
    let interpretation = if score >= 7.0 {
        "High Risk (Consider early invasive)"
    } else if score >= 4.0 {
        "Moderate Risk (Observe/Test)"
    } else {
        "Low Risk (Discharge possible)"
    };
    score_result(score, "Points", interpretation)
}

pub const CENTOR: CalculatorDefinition = CalculatorDefinition {
    id: "centor",
    name: "Centor Criteria (Strep Throat)",
    short_name: "Centor",
    specialty: Specialty::Emergency,
    description: "Probability of bacterial vs. viral pharyngitis.",
    fields: &[
        FieldDefinition::choice("f", "History of Fever", YES_NO),
        FieldDefinition::choice("e", "Tonsillar Exudates", YES_NO),
        FieldDefinition::choice("n", "Tender Ant. Cervical Nodes", YES_NO),
        FieldDefinition::choice("c", "Absence of Cough", YES_NO),
        // McIsaac age modifier
        FieldDefinition::choice(
            "a",
            "Age",
            &[Choice::new("15-44", 0.0), Choice::new("45+", -1.0), Choice::new("3-14", 1.0)],
        ),
    ],
    compute: centor,
};

fn centor(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["f", "e", "n", "c", "a"]);
    let interpretation = if score >= 4.0 { "Suggests Antibiotics" } else { "Likely Viral" };
    score_result(score, "Points", interpretation)
}

pub const SIRS: CalculatorDefinition = CalculatorDefinition {
    id: "sirs",
    name: "SIRS Criteria",
    short_name: "SIRS",
    specialty: Specialty::CriticalCare,
    description: "Systemic Inflammatory Response Syndrome criteria.",
    fields: &[
        FieldDefinition::choice("temp", "Temp <36 or >38°C", YES_NO),
        FieldDefinition::choice("hr", "Heart Rate >90", YES_NO),
        FieldDefinition::choice("rr", "RR >20 or PaCO2 <32", YES_NO),
        FieldDefinition::choice("wbc", "WBC <4k, >12k or >10% bands", YES_NO),
    ],
    compute: sirs,
};

fn sirs(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["temp", "hr", "rr", "wbc"]);
    let interpretation = if score >= 2.0 { "SIRS Positive" } else { "SIRS Negative" };
    score_result(score, "/4", interpretation)
}

pub const QSOFA: CalculatorDefinition = CalculatorDefinition {
    id: "qsofa",
    name: "qSOFA Score",
    short_name: "qSOFA",
    specialty: Specialty::CriticalCare,
    description: "Quick Sequential Organ Failure Assessment for sepsis risk.",
    fields: &[
        FieldDefinition::choice("rr", "Resp Rate ≥22/min", YES_NO),
        FieldDefinition::choice("ment", "Altered Mentation (GCS <15)", YES_NO),
        FieldDefinition::choice("sbp", "Systolic BP ≤100 mmHg", YES_NO),
    ],
    compute: qsofa,
};

fn qsofa(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["rr", "ment", "sbp"]);
    let interpretation = if score >= 2.0 {
        "High risk for poor outcome"
    } else {
        "Low risk"
    };
    score_result(score, "/3", interpretation)
}

pub const CHA2DS2_VASC: CalculatorDefinition = CalculatorDefinition {
    id: "chads",
    name: "CHA2DS2-VASc Score",
    short_name: "CHA2DS2",
    specialty: Specialty::Cardiology,
    description: "Stroke risk for patients with Atrial Fibrillation.",
    fields: &[
        FieldDefinition::choice(
            "age",
            "Age",
            &[Choice::new("<65", 0.0), Choice::new("65-74", 1.0), Choice::new("≥75", 2.0)],
        ),
        FieldDefinition::choice(
            "sex",
            "Sex",
            &[Choice::new("Male", 0.0), Choice::new("Female", 1.0)],
        ),
        FieldDefinition::choice("chf", "CHF History", YES_NO),
        FieldDefinition::choice("htn", "Hypertension History", YES_NO),
        FieldDefinition::choice("stroke", "Stroke/TIA History", weighted_yes!(2.0)),
        FieldDefinition::choice("vasc", "Vascular Disease History", YES_NO),
        FieldDefinition::choice("dm", "Diabetes History", YES_NO),
    ],
    compute: cha2ds2_vasc,
};

fn cha2ds2_vasc(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["age", "sex", "chf", "htn", "stroke", "vasc", "dm"]);
    let interpretation = if score >= 2.0 {
        "Anticoagulation recommended"
    } else {
        "Low/Moderate risk"
    };
    score_result(score, "Points", interpretation)
}

pub const APGAR: CalculatorDefinition = CalculatorDefinition {
    id: "apgar",
    name: "APGAR Score",
    short_name: "APGAR",
    specialty: Specialty::Pediatrics,
    description: "Quick assessment of newborn health at 1 and 5 minutes.",
    fields: &[
        FieldDefinition::choice(
            "hr",
            "Heart Rate",
            &[
                Choice::new("Absent", 0.0),
                Choice::new("<100 bpm", 1.0),
                Choice::new(">100 bpm", 2.0),
            ],
        ),
        FieldDefinition::choice(
            "resp",
            "Respiratory Effort",
            &[
                Choice::new("Absent", 0.0),
                Choice::new("Weak/Irregular", 1.0),
                Choice::new("Strong/Crying", 2.0),
            ],
        ),
        FieldDefinition::choice(
            "tone",
            "Muscle Tone",
            &[
                Choice::new("Limp", 0.0),
                Choice::new("Some Flexion", 1.0),
                Choice::new("Active Motion", 2.0),
            ],
        ),
        FieldDefinition::choice(
            "grim",
            "Reflex Irritability",
            &[
                Choice::new("No Response", 0.0),
                Choice::new("Grimace", 1.0),
                Choice::new("Cough/Sneeze/Cry", 2.0),
            ],
        ),
        FieldDefinition::choice(
            "color",
            "Color",
            &[
                Choice::new("Blue/Pale", 0.0),
                Choice::new("Body Pink/Extremities Blue", 1.0),
                Choice::new("Completely Pink", 2.0),
            ],
        ),
    ],
    compute: apgar,
};

fn apgar(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["hr", "resp", "tone", "grim", "color"]);
    let interpretation = if score <= 3.0 {
        "Critically low"
    } else if score <= 6.0 {
        "Fairly low"
    } else {
        "Excellent condition"
    };
    score_result(score, "/10", interpretation)
}

pub const GCS: CalculatorDefinition = CalculatorDefinition {
    id: "gcs",
    name: "Glasgow Coma Scale",
    short_name: "GCS",
    specialty: Specialty::CriticalCare,
    description: "Neurological scale for assessing level of consciousness.",
    // Best response first so a fresh calculator reads 15
    fields: &[
        FieldDefinition::choice(
            "eye",
            "Eye Opening",
            &[
                Choice::new("Spontaneous", 4.0),
                Choice::new("To Speech", 3.0),
                Choice::new("To Pain", 2.0),
                Choice::new("None", 1.0),
            ],
        ),
        FieldDefinition::choice(
            "verbal",
            "Verbal Response",
            &[
                Choice::new("Oriented", 5.0),
                Choice::new("Confused", 4.0),
                Choice::new("Inappropriate", 3.0),
                Choice::new("Incomprehensible", 2.0),
                Choice::new("None", 1.0),
            ],
        ),
        FieldDefinition::choice(
            "motor",
            "Motor Response",
            &[
                Choice::new("Obeys", 6.0),
                Choice::new("Localizes Pain", 5.0),
                Choice::new("Withdraws Pain", 4.0),
                Choice::new("Flexion (Decorticate)", 3.0),
                Choice::new("Extension (Decerebrate)", 2.0),
                Choice::new("None", 1.0),
            ],
        ),
    ],
    compute: gcs,
};

fn gcs(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["eye", "verbal", "motor"]);
    let interpretation = if score >= 13.0 {
        "Mild Injury"
    } else if score >= 9.0 {
        "Moderate Injury"
    } else {
        "Severe Injury (GCS 3-8)"
    };
    score_result(score, "/15", interpretation)
}

pub const WELLS_PE: CalculatorDefinition = CalculatorDefinition {
    id: "wells-pe",
    name: "Wells' Criteria for Pulmonary Embolism",
    short_name: "Wells' PE",
    specialty: Specialty::CriticalCare,
    description: "Predicts probability of Pulmonary Embolism.",
    fields: &[
        FieldDefinition::choice("clin", "Clinical signs of DVT", weighted_yes!(3.0)),
        FieldDefinition::choice("alt", "Alternative diagnosis less likely", weighted_yes!(3.0)),
        FieldDefinition::choice("hr", "Heart rate >100", weighted_yes!(1.5)),
        FieldDefinition::choice("immob", "Immobilization/Surgery (last 4 wks)", weighted_yes!(1.5)),
        FieldDefinition::choice("prev", "Previous DVT/PE", weighted_yes!(1.5)),
        FieldDefinition::choice("hemop", "Hemoptysis", YES_NO),
        FieldDefinition::choice("malig", "Malignancy", YES_NO),
    ],
    compute: wells_pe,
};

fn wells_pe(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["clin", "alt", "hr", "immob", "prev", "hemop", "malig"]);
    let interpretation = if score > 4.0 { "PE Likely" } else { "PE Unlikely" };
    score_result(score, "Points", interpretation)
}

pub const CURB65: CalculatorDefinition = CalculatorDefinition {
    id: "curb65",
    name: "CURB-65 Severity Score",
    short_name: "CURB-65",
    specialty: Specialty::General,
    description: "Predicts mortality in community-acquired pneumonia.",
    fields: &[
        FieldDefinition::choice("conf", "Confusion", YES_NO),
        FieldDefinition::choice("bun", "BUN >19 mg/dL", YES_NO),
        FieldDefinition::choice("rr", "Resp Rate ≥30/min", YES_NO),
        FieldDefinition::choice("bp", "Systolic <90 or Diastolic ≤60", YES_NO),
        FieldDefinition::choice("age", "Age ≥65", YES_NO),
    ],
    compute: curb65,
};

fn curb65(v: &FormulaInputs) -> FormulaResult {
    let score = v.sum(&["conf", "bun", "rr", "bp", "age"]);
    let interpretation = if score >= 3.0 {
        "High risk (Urgent hospitalize)"
    } else if score >= 2.0 {
        "Moderate risk (Hospitalize)"
    } else {
        "Low risk (Outpatient)"
    };
    score_result(score, "Points", interpretation)
}
