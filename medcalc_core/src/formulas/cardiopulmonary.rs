//! Hemodynamic, gas exchange and ECG formulas.

use crate::calculator::{CalculatorDefinition, FieldDefinition, FormulaInputs, FormulaResult};
use crate::format::{fixed, whole};
use crate::specialty::Specialty;

/// Barometric minus water vapour pressure at sea level (760 - 47 mmHg)
const DRY_INSPIRED_PRESSURE: f64 = 713.0;
const RESPIRATORY_QUOTIENT: f64 = 0.8;

pub const AA_GRADIENT: CalculatorDefinition = CalculatorDefinition {
    id: "aa-grad",
    name: "Alveolar-arterial (A-a) Gradient",
    short_name: "A-a Gradient",
    specialty: Specialty::CriticalCare,
    description: "Helps identify the cause of hypoxia.",
    fields: &[
        FieldDefinition::number("fio2", "FiO2", "%").with_default(21.0),
        FieldDefinition::number("paco2", "PaCO2", "mmHg"),
        FieldDefinition::number("pao2", "PaO2", "mmHg"),
    ],
    compute: aa_gradient,
};

fn aa_gradient(v: &FormulaInputs) -> FormulaResult {
    let pio2 = (v.get("fio2") / 100.0) * DRY_INSPIRED_PRESSURE;
    let alveolar = pio2 - (v.get("paco2") / RESPIRATORY_QUOTIENT);
    let gradient = alveolar - v.get("pao2");
    let interpretation = if gradient > 15.0 { "High Gradient" } else { "Normal Gradient" };
    FormulaResult::new(fixed(gradient, 1), "mmHg").interpreted(interpretation)
}

pub const MAP: CalculatorDefinition = CalculatorDefinition {
    id: "map",
    name: "Mean Arterial Pressure",
    short_name: "MAP",
    specialty: Specialty::CriticalCare,
    description: "Average arterial pressure during a single cardiac cycle.",
    fields: &[
        FieldDefinition::number("sbp", "Systolic BP", "mmHg"),
        FieldDefinition::number("dbp", "Diastolic BP", "mmHg"),
    ],
    compute: mean_arterial_pressure,
};

fn mean_arterial_pressure(v: &FormulaInputs) -> FormulaResult {
    let map = (v.get("sbp") + 2.0 * v.get("dbp")) / 3.0;
    let interpretation = if map < 65.0 { "Low (Danger)" } else { "Normal" };
    FormulaResult::new(fixed(map, 0), "mmHg").interpreted(interpretation)
}

pub const PF_RATIO: CalculatorDefinition = CalculatorDefinition {
    id: "pf-ratio",
    name: "PaO2/FiO2 Ratio",
    short_name: "P/F Ratio",
    specialty: Specialty::CriticalCare,
    description: "Assesses severity of respiratory failure (ALI/ARDS).",
    fields: &[
        FieldDefinition::number("pao2", "PaO2", "mmHg"),
        FieldDefinition::number("fio2", "FiO2 (%)", "%"),
    ],
    compute: pf_ratio,
};

/// Berlin ARDS bands on the PaO2/FiO2 ratio.
fn pf_ratio(v: &FormulaInputs) -> FormulaResult {
    let ratio = v.get("pao2") / (v.get("fio2") / 100.0);
    let interpretation = if ratio <= 100.0 {
        "Severe ARDS"
    } else if ratio <= 200.0 {
        "Moderate ARDS"
    } else if ratio <= 300.0 {
        "Mild ARDS"
    } else {
        "Normal"
    };
    FormulaResult::new(whole(ratio), "mmHg").interpreted(interpretation)
}

pub const QTC: CalculatorDefinition = CalculatorDefinition {
    id: "qtc",
    name: "Corrected QT Interval (Bazett)",
    short_name: "QTc",
    specialty: Specialty::Cardiology,
    description: "Adjusts QT interval for heart rate to assess arrhythmia risk.",
    fields: &[
        FieldDefinition::number("qt", "QT Interval", "ms"),
        FieldDefinition::number("hr", "Heart Rate", "bpm"),
    ],
    compute: qtc,
};

fn qtc(v: &FormulaInputs) -> FormulaResult {
    let rr = 60.0 / v.get("hr");
    let qtc = v.get("qt") / rr.sqrt();
    let interpretation = if qtc > 440.0 {
        "Prolonged (Male >440, Female >460)"
    } else {
        "Normal"
    };
    FormulaResult::new(fixed(qtc, 0), "ms").interpreted(interpretation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::testing::run;

    #[test]
    fn test_aa_gradient_room_air() {
        let r = run(&AA_GRADIENT, &[("paco2", 40.0), ("pao2", 90.0)]);
        assert_eq!(r.value, "9.7");
        assert_eq!(r.interpretation.as_deref(), Some("Normal Gradient"));

        let r = run(&AA_GRADIENT, &[("paco2", 40.0), ("pao2", 60.0)]);
        assert_eq!(r.interpretation.as_deref(), Some("High Gradient"));
    }

    #[test]
    fn test_map() {
        let r = run(&MAP, &[("sbp", 120.0), ("dbp", 80.0)]);
        assert_eq!(r.value, "93");
        assert_eq!(r.interpretation.as_deref(), Some("Normal"));

        let r = run(&MAP, &[("sbp", 80.0), ("dbp", 50.0)]);
        assert_eq!(r.value, "60");
        assert_eq!(r.interpretation.as_deref(), Some("Low (Danger)"));
    }

    #[test]
    fn test_pf_ratio_bands() {
        let band = |pao2: f64| run(&PF_RATIO, &[("pao2", pao2), ("fio2", 50.0)]);
        let r = band(80.0);
        assert_eq!(r.value, "160");
        assert_eq!(r.unit, "mmHg");
        assert_eq!(r.interpretation.as_deref(), Some("Moderate ARDS"));
        assert_eq!(band(50.0).interpretation.as_deref(), Some("Severe ARDS"));
        assert_eq!(band(150.0).interpretation.as_deref(), Some("Mild ARDS"));
        assert_eq!(band(200.0).interpretation.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_pf_ratio_zero_fio2_is_infinite() {
        let r = run(&PF_RATIO, &[("pao2", 80.0), ("fio2", 0.0)]);
        assert_eq!(r.value, "Infinity");
    }

    #[test]
    fn test_qtc() {
        let r = run(&QTC, &[("qt", 400.0), ("hr", 60.0)]);
        assert_eq!(r.value, "400");
        assert_eq!(r.interpretation.as_deref(), Some("Normal"));

        let r = run(&QTC, &[("qt", 400.0), ("hr", 90.0)]);
        assert_eq!(r.value, "490");
        assert_eq!(r.interpretation.as_deref(), Some("Prolonged (Male >440, Female >460)"));
    }
}
