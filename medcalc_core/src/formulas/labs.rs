//! Laboratory corrections, renal function and electrolyte formulas.

use crate::calculator::{
    CalculatorDefinition, Choice, FieldDefinition, FormulaInputs, FormulaResult,
};
use crate::format::{fixed, whole};
use crate::specialty::Specialty;

/// Total body water fraction, used directly as the choice value
const BODY_WATER_FRACTION: &[Choice] = &[
    Choice::new("Male (0.6)", 0.6),
    Choice::new("Female (0.5)", 0.5),
];

/// Cockcroft-Gault sex multiplier
const CRCL_SEX_FACTOR: &[Choice] = &[Choice::new("Male", 1.0), Choice::new("Female", 0.85)];

pub const CORRECTED_SODIUM: CalculatorDefinition = CalculatorDefinition {
    id: "corr-na",
    name: "Corrected Sodium (Hyperglycemia)",
    short_name: "Corr Na",
    specialty: Specialty::Emergency,
    description: "Adjusts serum sodium for the effects of hyperglycemia.",
    fields: &[
        FieldDefinition::number("na", "Measured Sodium", "mEq/L"),
        FieldDefinition::number("glu", "Serum Glucose", "mg/dL"),
    ],
    compute: corrected_sodium,
};

/// Katz correction: +1.6 mEq/L per 100 mg/dL glucose above 100.
fn corrected_sodium(v: &FormulaInputs) -> FormulaResult {
    let corrected = v.get("na") + 0.016 * (v.get("glu") - 100.0);
    FormulaResult::new(fixed(corrected, 1), "mEq/L")
}

pub const FE_UREA: CalculatorDefinition = CalculatorDefinition {
    id: "fe-urea",
    name: "Fractional Excretion of Urea (FeUrea)",
    short_name: "FeUrea",
    specialty: Specialty::Nephrology,
    description: "Useful for AKI assessment when diuretics are present.",
    fields: &[
        FieldDefinition::number("una", "Urinary Sodium", "mEq/L"),
        FieldDefinition::number("uurea", "Urinary Urea", "mg/dL"),
        FieldDefinition::number("surea", "Serum Urea", "mg/dL"),
        FieldDefinition::number("ucr", "Urinary Creatinine", "mg/dL"),
        FieldDefinition::number("scr", "Serum Creatinine", "mg/dL"),
    ],
    compute: fe_urea,
};

// Urinary sodium is collected but not part of the formula.
fn fe_urea(v: &FormulaInputs) -> FormulaResult {
    let fe = ((v.get("uurea") * v.get("scr")) / (v.get("surea") * v.get("ucr"))) * 100.0;
    let interpretation = if fe < 35.0 { "Prerenal" } else { "Intrinsic" };
    FormulaResult::new(fixed(fe, 1), "%").interpreted(interpretation)
}

pub const CORRECTED_PHENYTOIN: CalculatorDefinition = CalculatorDefinition {
    id: "pheny-corr",
    name: "Corrected Phenytoin (Winter-Tozer)",
    short_name: "Corr Pheny",
    specialty: Specialty::Pharmacology,
    description: "Adjusts phenytoin levels for hypoalbuminemia.",
    fields: &[
        FieldDefinition::number("p", "Measured Phenytoin", "mcg/mL"),
        FieldDefinition::number("a", "Serum Albumin", "g/dL"),
    ],
    compute: corrected_phenytoin,
};

fn corrected_phenytoin(v: &FormulaInputs) -> FormulaResult {
    let corrected = v.get("p") / (0.2 * v.get("a") + 0.1);
    FormulaResult::new(fixed(corrected, 1), "mcg/mL")
}

pub const MELD: CalculatorDefinition = CalculatorDefinition {
    id: "meld",
    name: "MELD Score (Liver)",
    short_name: "MELD",
    specialty: Specialty::Gastroenterology,
    description: "Prognosis for patients with liver disease.",
    fields: &[
        FieldDefinition::number("b", "Bilirubin", "mg/dL"),
        FieldDefinition::number("i", "INR", ""),
        FieldDefinition::number("c", "Creatinine", "mg/dL"),
    ],
    compute: meld,
};

/// Non-positive lab values are replaced by 1 so every log term stays finite.
fn at_least_positive(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        1.0
    }
}

fn meld(v: &FormulaInputs) -> FormulaResult {
    let bilirubin = at_least_positive(v.get("b"));
    let inr = at_least_positive(v.get("i"));
    let creatinine = at_least_positive(v.get("c"));
    let meld = 3.78 * bilirubin.ln() + 11.2 * inr.ln() + 9.57 * creatinine.ln() + 6.43;
    FormulaResult::new(whole(meld), "Score")
}

pub const FENA: CalculatorDefinition = CalculatorDefinition {
    id: "fena",
    name: "Fractional Excretion of Sodium (FeNa)",
    short_name: "FeNa",
    specialty: Specialty::Nephrology,
    description: "Differentiates between prerenal and intrinsic AKI.",
    fields: &[
        FieldDefinition::number("una", "Urinary Sodium", "mEq/L"),
        FieldDefinition::number("pna", "Plasma Sodium", "mEq/L"),
        FieldDefinition::number("pcr", "Plasma Creatinine", "mg/dL"),
        FieldDefinition::number("ucr", "Urinary Creatinine", "mg/dL"),
    ],
    compute: fena,
};

fn fena(v: &FormulaInputs) -> FormulaResult {
    let fena = (v.get("una") * v.get("pcr")) / (v.get("pna") * v.get("ucr")) * 100.0;
    let interpretation = if fena < 1.0 {
        "Prerenal (Dehydration)"
    } else if fena > 2.0 {
        "Intrinsic (ATN)"
    } else {
        "Intrinsic Renal Failure"
    };
    FormulaResult::new(fixed(fena, 2), "%").interpreted(interpretation)
}

pub const WATER_DEFICIT: CalculatorDefinition = CalculatorDefinition {
    id: "water-def",
    name: "Free Water Deficit",
    short_name: "Water Deficit",
    specialty: Specialty::Nephrology,
    description: "Calculates water needed to correct hypernatremia.",
    fields: &[
        FieldDefinition::number("weight", "Weight", "kg"),
        FieldDefinition::number("nas", "Serum Sodium", "mEq/L"),
        FieldDefinition::choice("sex", "Sex (Water %)", BODY_WATER_FRACTION),
    ],
    compute: water_deficit,
};

fn water_deficit(v: &FormulaInputs) -> FormulaResult {
    let deficit = v.get("sex") * v.get("weight") * (v.get("nas") / 140.0 - 1.0);
    FormulaResult::new(fixed(deficit, 1), "Liters")
        .interpreted("Free water required to reach Na 140 mEq/L.")
}

pub const CORRECTED_CALCIUM: CalculatorDefinition = CalculatorDefinition {
    id: "corr-calc",
    name: "Corrected Calcium",
    short_name: "Corr Ca",
    specialty: Specialty::General,
    description: "Adjusts calcium levels for patients with low albumin.",
    fields: &[
        FieldDefinition::number("ca", "Serum Calcium", "mg/dL"),
        FieldDefinition::number("alb", "Serum Albumin", "g/dL"),
    ],
    compute: corrected_calcium,
};

fn corrected_calcium(v: &FormulaInputs) -> FormulaResult {
    let corrected = v.get("ca") + 0.8 * (4.0 - v.get("alb"));
    let interpretation = if corrected > 10.5 {
        "Hypercalcemia"
    } else if corrected < 8.5 {
        "Hypocalcemia"
    } else {
        "Normal"
    };
    FormulaResult::new(fixed(corrected, 1), "mg/dL").interpreted(interpretation)
}

pub const LDL: CalculatorDefinition = CalculatorDefinition {
    id: "ldl",
    name: "LDL Cholesterol (Friedewald)",
    short_name: "LDL",
    specialty: Specialty::Cardiology,
    description: "Calculates LDL based on Total, HDL, and Triglycerides.",
    fields: &[
        FieldDefinition::number("tc", "Total Cholesterol", "mg/dL"),
        FieldDefinition::number("hdl", "HDL Cholesterol", "mg/dL"),
        FieldDefinition::number("tg", "Triglycerides", "mg/dL"),
    ],
    compute: ldl,
};

fn ldl(v: &FormulaInputs) -> FormulaResult {
    let ldl = v.get("tc") - v.get("hdl") - (v.get("tg") / 5.0);
    let interpretation = if ldl > 160.0 {
        "High"
    } else if ldl < 100.0 {
        "Optimal"
    } else {
        "Near Optimal"
    };
    FormulaResult::new(fixed(ldl, 0), "mg/dL").interpreted(interpretation)
}

pub const BICARBONATE_DEFICIT: CalculatorDefinition = CalculatorDefinition {
    id: "bic-def",
    name: "Bicarbonate Deficit",
    short_name: "Bic Def",
    specialty: Specialty::CriticalCare,
    description: "Calculates amount of bicarbonate to correct acidosis.",
    fields: &[
        FieldDefinition::number("weight", "Weight", "kg"),
        FieldDefinition::number("target", "Target HCO3", "mEq/L").with_default(24.0),
        FieldDefinition::number("actual", "Current HCO3", "mEq/L"),
    ],
    compute: bicarbonate_deficit,
};

fn bicarbonate_deficit(v: &FormulaInputs) -> FormulaResult {
    let deficit = 0.4 * v.get("weight") * (v.get("target") - v.get("actual"));
    FormulaResult::new(fixed(deficit, 0), "mEq").interpreted("Total bicarbonate deficit.")
}

pub const CRCL: CalculatorDefinition = CalculatorDefinition {
    id: "crcl",
    name: "Creatinine Clearance (Cockcroft-Gault)",
    short_name: "CrCl",
    specialty: Specialty::Nephrology,
    description: "Estimation of GFR using Cockcroft-Gault equation.",
    fields: &[
        FieldDefinition::number("age", "Age", "yrs"),
        FieldDefinition::number("weight", "Weight", "kg"),
        FieldDefinition::number("creatinine", "Serum Creatinine", "mg/dL"),
        FieldDefinition::choice("sex", "Sex", CRCL_SEX_FACTOR),
    ],
    compute: crcl,
};

fn crcl(v: &FormulaInputs) -> FormulaResult {
    let crcl =
        ((140.0 - v.get("age")) * v.get("weight")) / (72.0 * v.get("creatinine")) * v.get("sex");
    FormulaResult::new(fixed(crcl, 1), "mL/min")
}

pub const ANION_GAP: CalculatorDefinition = CalculatorDefinition {
    id: "anion-gap",
    name: "Anion Gap",
    short_name: "AG",
    specialty: Specialty::CriticalCare,
    description: "Calculates the gap between primary measured cations and anions.",
    fields: &[
        FieldDefinition::number("na", "Sodium (Na)", "mEq/L"),
        FieldDefinition::number("cl", "Chloride (Cl)", "mEq/L"),
        FieldDefinition::number("hco3", "Bicarbonate (HCO3)", "mEq/L"),
    ],
    compute: anion_gap,
};

fn anion_gap(v: &FormulaInputs) -> FormulaResult {
    let gap = v.get("na") - (v.get("cl") + v.get("hco3"));
    let interpretation = if gap > 12.0 { "High Anion Gap" } else { "Normal (8-12)" };
    FormulaResult::new(fixed(gap, 1), "mEq/L").interpreted(interpretation)
}

pub const ANC: CalculatorDefinition = CalculatorDefinition {
    id: "anc",
    name: "Absolute Neutrophil Count",
    short_name: "ANC",
    specialty: Specialty::General,
    description: "Assesses infection risk in neutropenic patients.",
    fields: &[
        FieldDefinition::number("wbc", "WBC Count", "cells/µL"),
        FieldDefinition::number("polys", "Neutrophils/Polys (%)", "%"),
        FieldDefinition::number("bands", "Bands (%)", "%"),
    ],
    compute: anc,
};

fn anc(v: &FormulaInputs) -> FormulaResult {
    let anc = v.get("wbc") * ((v.get("polys") + v.get("bands")) / 100.0);
    let interpretation = if anc < 500.0 {
        "Severe Neutropenia"
    } else if anc < 1000.0 {
        "Moderate Neutropenia"
    } else if anc < 1500.0 {
        "Mild Neutropenia"
    } else {
        "Normal"
    };
    FormulaResult::new(whole(anc), "cells/µL").interpreted(interpretation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::testing::run;

    #[test]
    fn test_corrected_sodium() {
        let r = run(&CORRECTED_SODIUM, &[("na", 130.0), ("glu", 600.0)]);
        assert_eq!(r.value, "138.0");
        assert_eq!(r.unit, "mEq/L");
        assert_eq!(r.interpretation, None);
    }

    #[test]
    fn test_fe_urea_ignores_urinary_sodium() {
        let inputs = [("uurea", 300.0), ("scr", 2.0), ("surea", 60.0), ("ucr", 100.0)];
        let r = run(&FE_UREA, &inputs);
        assert_eq!(r.value, "10.0");
        assert_eq!(r.interpretation.as_deref(), Some("Prerenal"));

        let mut with_una = inputs.to_vec();
        with_una.push(("una", 45.0));
        assert_eq!(run(&FE_UREA, &with_una), r);
    }

    #[test]
    fn test_corrected_phenytoin() {
        let r = run(&CORRECTED_PHENYTOIN, &[("p", 10.0), ("a", 2.0)]);
        assert_eq!(r.value, "20.0");
    }

    #[test]
    fn test_meld_substitutes_non_positive() {
        assert_eq!(run(&MELD, &[]).value, "6");
        assert_eq!(run(&MELD, &[("b", 1.0), ("i", 1.0), ("c", 1.0)]).value, "6");
        assert_eq!(run(&MELD, &[("b", -2.0), ("i", 0.0), ("c", 1.0)]).value, "6");
    }

    #[test]
    fn test_meld_typical() {
        // 3.78·ln2 + 11.2·ln1.5 + 9.57·ln1.2 + 6.43 ≈ 15.34
        let r = run(&MELD, &[("b", 2.0), ("i", 1.5), ("c", 1.2)]);
        assert_eq!(r.value, "15");
        assert_eq!(r.unit, "Score");
    }

    #[test]
    fn test_fena_bands() {
        let fena = |una: f64| {
            run(&FENA, &[("una", una), ("pna", 140.0), ("pcr", 1.0), ("ucr", 100.0)])
        };
        let r = fena(20.0);
        assert_eq!(r.value, "0.14");
        assert_eq!(r.interpretation.as_deref(), Some("Prerenal (Dehydration)"));
        assert_eq!(fena(210.0).interpretation.as_deref(), Some("Intrinsic Renal Failure"));
        assert_eq!(fena(420.0).interpretation.as_deref(), Some("Intrinsic (ATN)"));
    }

    #[test]
    fn test_water_deficit() {
        let r = run(&WATER_DEFICIT, &[("weight", 70.0), ("nas", 160.0), ("sex", 0.6)]);
        assert_eq!(r.value, "6.0");
        assert_eq!(r.unit, "Liters");
    }

    #[test]
    fn test_corrected_calcium() {
        let r = run(&CORRECTED_CALCIUM, &[("ca", 8.0), ("alb", 2.0)]);
        assert_eq!(r.value, "9.6");
        assert_eq!(r.interpretation.as_deref(), Some("Normal"));
        let r = run(&CORRECTED_CALCIUM, &[("ca", 7.0), ("alb", 4.0)]);
        assert_eq!(r.interpretation.as_deref(), Some("Hypocalcemia"));
        let r = run(&CORRECTED_CALCIUM, &[("ca", 11.0), ("alb", 4.0)]);
        assert_eq!(r.interpretation.as_deref(), Some("Hypercalcemia"));
    }

    #[test]
    fn test_ldl() {
        let r = run(&LDL, &[("tc", 200.0), ("hdl", 50.0), ("tg", 150.0)]);
        assert_eq!(r.value, "120");
        assert_eq!(r.interpretation.as_deref(), Some("Near Optimal"));
    }

    #[test]
    fn test_bicarbonate_deficit_uses_default_target() {
        let r = run(&BICARBONATE_DEFICIT, &[("weight", 70.0), ("actual", 14.0)]);
        assert_eq!(r.value, "280");
        assert_eq!(r.unit, "mEq");
    }

    #[test]
    fn test_crcl() {
        let base = [("age", 40.0), ("weight", 72.0), ("creatinine", 1.0)];
        assert_eq!(run(&CRCL, &base).value, "100.0");

        let mut female = base.to_vec();
        female.push(("sex", 0.85));
        assert_eq!(run(&CRCL, &female).value, "85.0");
    }

    #[test]
    fn test_anion_gap() {
        let r = run(&ANION_GAP, &[("na", 140.0), ("cl", 104.0), ("hco3", 24.0)]);
        assert_eq!(r.value, "12.0");
        assert_eq!(r.interpretation.as_deref(), Some("Normal (8-12)"));
    }

    #[test]
    fn test_anc_bands() {
        let anc = |wbc: f64| run(&ANC, &[("wbc", wbc), ("polys", 50.0), ("bands", 5.0)]);
        let r = anc(5000.0);
        assert_eq!(r.value, "2750");
        assert_eq!(r.interpretation.as_deref(), Some("Normal"));
        assert_eq!(anc(800.0).interpretation.as_deref(), Some("Severe Neutropenia"));
        assert_eq!(anc(1500.0).interpretation.as_deref(), Some("Moderate Neutropenia"));
        assert_eq!(anc(2500.0).interpretation.as_deref(), Some("Mild Neutropenia"));
    }
}
