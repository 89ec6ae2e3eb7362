//! Drug dispensing and infusion calculations.

use crate::calculator::{
    CalculatorDefinition, Choice, FieldDefinition, FormulaInputs, FormulaResult,
};
use crate::format::{fixed, number};
use crate::specialty::Specialty;

/// MME conversion factors. Morphine and hydrocodone share 1.0; hydromorphone
/// and methadone share 4.0.
const OPIOIDS: &[Choice] = &[
    Choice::new("Morphine (1.0)", 1.0),
    Choice::new("Oxycodone (1.5)", 1.5),
    Choice::new("Hydrocodone (1.0)", 1.0),
    Choice::new("Hydromorphone (4.0)", 4.0),
    Choice::new("Codeine (0.15)", 0.15),
    Choice::new("Methadone (4.0)", 4.0),
];

/// Daily MME at or above which opioid risk is flagged
const MME_HIGH_RISK: f64 = 50.0;

pub const STANDARD_DOSE: CalculatorDefinition = CalculatorDefinition {
    id: "standard-dose",
    name: "Standard Dose (Ordered/On-Hand)",
    short_name: "Dose Calc",
    specialty: Specialty::Pharmacology,
    description: "Calculates volume (mL) to administer based on ordered dose and concentration.",
    fields: &[
        FieldDefinition::number("desired", "Ordered Dose", "mg"),
        FieldDefinition::number("have", "On-Hand Dose", "mg"),
        FieldDefinition::number("volume", "On-Hand Volume", "mL"),
    ],
    compute: standard_dose,
};

/// Volume = (ordered / on-hand) × on-hand volume
fn standard_dose(v: &FormulaInputs) -> FormulaResult {
    let amount = (v.get("desired") / v.get("have")) * v.get("volume");
    FormulaResult::new(fixed(amount, 2), "mL").interpreted("Volume to dispense/administer.")
}

pub const WEIGHT_DOSE: CalculatorDefinition = CalculatorDefinition {
    id: "weight-dose",
    name: "Weight-Based Dosing (mg/kg)",
    short_name: "mg/kg Dose",
    specialty: Specialty::Pharmacology,
    description: "Calculates total dose based on patient weight and mg/kg order.",
    fields: &[
        FieldDefinition::number("weight", "Patient Weight", "kg"),
        FieldDefinition::number("dose_per_kg", "Ordered Dose", "mg/kg"),
    ],
    compute: weight_dose,
};

fn weight_dose(v: &FormulaInputs) -> FormulaResult {
    let total = v.get("weight") * v.get("dose_per_kg");
    FormulaResult::new(fixed(total, 1), "mg").interpreted("Total calculated dose.")
}

pub const BSA_DOSE: CalculatorDefinition = CalculatorDefinition {
    id: "bsa-dose",
    name: "BSA-Based Dosing (mg/m²)",
    short_name: "mg/m² Dose",
    specialty: Specialty::Pharmacology,
    description: "Calculates total dose based on Body Surface Area (BSA).",
    fields: &[
        FieldDefinition::number("bsa", "Patient BSA", "m²"),
        FieldDefinition::number("dose_per_m2", "Ordered Dose", "mg/m²"),
    ],
    compute: bsa_dose,
};

fn bsa_dose(v: &FormulaInputs) -> FormulaResult {
    let total = v.get("bsa") * v.get("dose_per_m2");
    FormulaResult::new(fixed(total, 1), "mg").interpreted("Total calculated dose.")
}

pub const INFUSION_RATE: CalculatorDefinition = CalculatorDefinition {
    id: "infusion-rate",
    name: "Infusion Flow Rate",
    short_name: "mL/hr Rate",
    specialty: Specialty::Pharmacology,
    description: "Calculates the mL/hr rate for an IV pump.",
    fields: &[
        FieldDefinition::number("volume", "Total Volume", "mL"),
        FieldDefinition::number("time", "Time (hours)", "hr"),
    ],
    compute: infusion_rate,
};

/// A zero time gives `Infinity` (or `NaN` for 0/0); it is not intercepted.
fn infusion_rate(v: &FormulaInputs) -> FormulaResult {
    let rate = v.get("volume") / v.get("time");
    FormulaResult::new(fixed(rate, 1), "mL/hr")
}

pub const MCG_KG_MIN: CalculatorDefinition = CalculatorDefinition {
    id: "mcg-kg-min",
    name: "mcg/kg/min Infusion",
    short_name: "mcg/kg/min",
    specialty: Specialty::CriticalCare,
    description: "Calculates infusion rate for continuous vasoactive drips.",
    fields: &[
        FieldDefinition::number("dose", "Desired Dose", "mcg/kg/min"),
        FieldDefinition::number("weight", "Weight", "kg"),
        FieldDefinition::number("conc", "Concentration", "mg/mL"),
    ],
    compute: mcg_kg_min,
};

fn mcg_kg_min(v: &FormulaInputs) -> FormulaResult {
    // (mcg/kg/min × kg × 60 min/hr) / (mg/mL × 1000 mcg/mg)
    let rate = (v.get("dose") * v.get("weight") * 60.0) / (v.get("conc") * 1000.0);
    FormulaResult::new(fixed(rate, 1), "mL/hr")
}

pub const DILUTION: CalculatorDefinition = CalculatorDefinition {
    id: "dilution-v1",
    name: "Dilution Formula (C1V1 = C2V2)",
    short_name: "Dilution",
    specialty: Specialty::Pharmacology,
    description: "Calculate volume of stock solution needed for a specific dilution.",
    fields: &[
        FieldDefinition::number("c2", "Desired Concentration", "%"),
        FieldDefinition::number("v2", "Desired Volume", "mL"),
        FieldDefinition::number("c1", "Stock Concentration", "%"),
    ],
    compute: dilution,
};

fn dilution(v: &FormulaInputs) -> FormulaResult {
    let v2 = v.get("v2");
    let v1 = (v.get("c2") * v2) / v.get("c1");
    FormulaResult::new(fixed(v1, 2), "mL").interpreted(format!(
        "Use {}mL of stock and add {}mL diluent.",
        fixed(v1, 2),
        fixed(v2 - v1, 2)
    ))
}

pub const ALLIGATION: CalculatorDefinition = CalculatorDefinition {
    id: "alligation",
    name: "Alligation Alternate",
    short_name: "Alligation",
    specialty: Specialty::Pharmacology,
    description: "Mix two strengths to get an intermediate strength.",
    fields: &[
        FieldDefinition::number("high", "Higher Concentration", "%"),
        FieldDefinition::number("low", "Lower Concentration", "%"),
        FieldDefinition::number("target", "Desired Concentration", "%"),
        FieldDefinition::number("total", "Desired Total Volume", "mL"),
    ],
    compute: alligation,
};

/// Parts of each stock are the distances of the target from the other
/// stock; volumes are the parts scaled to the requested total.
fn alligation(v: &FormulaInputs) -> FormulaResult {
    let (high, low, target, total) = (v.get("high"), v.get("low"), v.get("target"), v.get("total"));
    let high_parts = target - low;
    let low_parts = high - target;
    let total_parts = high_parts + low_parts;
    let v_high = (high_parts / total_parts) * total;
    let v_low = (low_parts / total_parts) * total;
    FormulaResult::new(fixed(v_high, 1), "mL High").interpreted(format!(
        "Mix {}mL of {}% with {}mL of {}%",
        fixed(v_high, 1),
        number(high),
        fixed(v_low, 1),
        number(low)
    ))
}

pub const POWDER_DISPLACEMENT: CalculatorDefinition = CalculatorDefinition {
    id: "powder-displace",
    name: "Reconstitution Displacement",
    short_name: "Recon",
    specialty: Specialty::Pharmacology,
    description: "Calculates the volume of powder displacement during reconstitution.",
    fields: &[
        FieldDefinition::number("total_v", "Total Final Volume", "mL"),
        FieldDefinition::number("diluent_v", "Diluent Added", "mL"),
    ],
    compute: powder_displacement,
};

fn powder_displacement(v: &FormulaInputs) -> FormulaResult {
    let displacement = v.get("total_v") - v.get("diluent_v");
    FormulaResult::new(fixed(displacement, 2), "mL")
        .interpreted("Volume of the medication powder itself.")
}

pub const MME: CalculatorDefinition = CalculatorDefinition {
    id: "mme-calc",
    name: "Narcotic Equivalence (MME)",
    short_name: "MME",
    specialty: Specialty::Pharmacology,
    description: "Morphine Milligram Equivalents for opioid risk assessment.",
    fields: &[
        FieldDefinition::choice("drug", "Opioid Type", OPIOIDS),
        FieldDefinition::number("dose", "Daily Dose", "mg"),
    ],
    compute: mme,
};

fn mme(v: &FormulaInputs) -> FormulaResult {
    let mme = v.get("drug") * v.get("dose");
    let interpretation = if mme >= MME_HIGH_RISK {
        "High Risk (>50 MME)"
    } else {
        "Lower Risk"
    };
    FormulaResult::new(fixed(mme, 1), "MME/day").interpreted(interpretation)
}

pub const REMAINING_TIME: CalculatorDefinition = CalculatorDefinition {
    id: "remaining-time",
    name: "Remaining Infusion Time",
    short_name: "Time Left",
    specialty: Specialty::Pharmacology,
    description: "Estimates how long until an IV bag is empty.",
    fields: &[
        FieldDefinition::number("volume", "Remaining Volume", "mL"),
        FieldDefinition::number("rate", "Current Rate", "mL/hr"),
    ],
    compute: remaining_time,
};

/// Composite "Xh Ym" value. Minutes are rounded independently of hours, so
/// 1.999 h renders as "1h 60m".
fn remaining_time(v: &FormulaInputs) -> FormulaResult {
    let exact_hours = v.get("volume") / v.get("rate");
    let hours = exact_hours.floor();
    let minutes = crate::format::round_half_up((exact_hours - hours) * 60.0);
    FormulaResult::new(format!("{}h {}m", number(hours), number(minutes)), "remaining")
        .interpreted("Estimated time until bag empty.")
}

pub const DRIP_RATE: CalculatorDefinition = CalculatorDefinition {
    id: "drip-rate",
    name: "IV Drip Rate",
    short_name: "Drip Rate",
    specialty: Specialty::Pharmacology,
    description: "Calculate drops per minute for IV infusions.",
    fields: &[
        FieldDefinition::number("volume", "Total Volume", "mL"),
        FieldDefinition::number("time", "Time", "min"),
        FieldDefinition::number("factor", "Drop Factor", "gtt/mL").with_default(20.0),
    ],
    compute: drip_rate,
};

fn drip_rate(v: &FormulaInputs) -> FormulaResult {
    let rate = (v.get("volume") * v.get("factor")) / v.get("time");
    FormulaResult::new(fixed(rate, 0), "gtt/min")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::testing::run;

    #[test]
    fn test_standard_dose() {
        // 500 mg ordered, 250 mg / 5 mL on hand
        let r = run(&STANDARD_DOSE, &[("desired", 500.0), ("have", 250.0), ("volume", 5.0)]);
        assert_eq!(r.value, "10.00");
        assert_eq!(r.unit, "mL");
    }

    #[test]
    fn test_weight_and_bsa_dose() {
        let r = run(&WEIGHT_DOSE, &[("weight", 72.5), ("dose_per_kg", 2.0)]);
        assert_eq!(r.value, "145.0");
        let r = run(&BSA_DOSE, &[("bsa", 1.8), ("dose_per_m2", 75.0)]);
        assert_eq!(r.value, "135.0");
    }

    #[test]
    fn test_infusion_rate() {
        let r = run(&INFUSION_RATE, &[("volume", 1000.0), ("time", 8.0)]);
        assert_eq!(r.value, "125.0");
        assert_eq!(r.interpretation, None);
    }

    #[test]
    fn test_infusion_rate_zero_time_passes_through() {
        let r = run(&INFUSION_RATE, &[("volume", 100.0), ("time", 0.0)]);
        assert_eq!(r.value, "Infinity");
        let r = run(&INFUSION_RATE, &[("volume", 0.0), ("time", 0.0)]);
        assert_eq!(r.value, "NaN");
    }

    #[test]
    fn test_mcg_kg_min() {
        // 5 mcg/kg/min, 80 kg, 1.6 mg/mL → 24000 / 1600 = 15 mL/hr
        let r = run(&MCG_KG_MIN, &[("dose", 5.0), ("weight", 80.0), ("conc", 1.6)]);
        assert_eq!(r.value, "15.0");
    }

    #[test]
    fn test_dilution() {
        let r = run(&DILUTION, &[("c2", 2.0), ("v2", 100.0), ("c1", 10.0)]);
        assert_eq!(r.value, "20.00");
        assert_eq!(
            r.interpretation.as_deref(),
            Some("Use 20.00mL of stock and add 80.00mL diluent.")
        );
    }

    #[test]
    fn test_alligation() {
        // 70% and 10% to make 30%: 20 parts high, 40 parts low
        let r = run(
            &ALLIGATION,
            &[("high", 70.0), ("low", 10.0), ("target", 30.0), ("total", 300.0)],
        );
        assert_eq!(r.value, "100.0");
        assert_eq!(r.unit, "mL High");
        assert_eq!(r.interpretation.as_deref(), Some("Mix 100.0mL of 70% with 200.0mL of 10%"));
    }

    #[test]
    fn test_powder_displacement() {
        let r = run(&POWDER_DISPLACEMENT, &[("total_v", 10.4), ("diluent_v", 9.6)]);
        assert_eq!(r.value, "0.80");
    }

    #[test]
    fn test_mme_bands() {
        let r = run(&MME, &[("drug", 1.5), ("dose", 40.0)]);
        assert_eq!(r.value, "60.0");
        assert_eq!(r.interpretation.as_deref(), Some("High Risk (>50 MME)"));

        let r = run(&MME, &[("drug", 0.15), ("dose", 120.0)]);
        assert_eq!(r.value, "18.0");
        assert_eq!(r.interpretation.as_deref(), Some("Lower Risk"));
    }

    #[test]
    fn test_remaining_time() {
        let r = run(&REMAINING_TIME, &[("volume", 325.0), ("rate", 100.0)]);
        assert_eq!(r.value, "3h 15m");
        assert_eq!(r.unit, "remaining");
    }

    #[test]
    fn test_remaining_time_zero_rate() {
        let r = run(&REMAINING_TIME, &[("volume", 500.0), ("rate", 0.0)]);
        assert_eq!(r.value, "Infinityh NaNm");
        let r = run(&REMAINING_TIME, &[]);
        assert_eq!(r.value, "NaNh NaNm");
    }

    #[test]
    fn test_drip_rate_uses_default_factor() {
        let r = run(&DRIP_RATE, &[("volume", 1000.0), ("time", 480.0)]);
        // 1000 × 20 / 480 = 41.67
        assert_eq!(r.value, "42");
        assert_eq!(r.unit, "gtt/min");
    }
}
