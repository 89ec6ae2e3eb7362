//! Body size, energy and fluid requirement formulas.

use crate::calculator::{
    CalculatorDefinition, Choice, FieldDefinition, FormulaInputs, FormulaResult,
};
use crate::format::{fixed, number, whole};
use crate::specialty::Specialty;

/// Devine base height in inches (5 feet)
const DEVINE_BASE_HEIGHT_IN: f64 = 60.0;
const CM_PER_INCH: f64 = 2.54;

/// Coded selector: 1 = male, 2 = female
const SEX_CODED: &[Choice] = &[Choice::new("Male", 1.0), Choice::new("Female", 2.0)];

/// Mifflin-St Jeor sex constant used directly as the choice value
const SEX_MIFFLIN: &[Choice] = &[Choice::new("Male", 5.0), Choice::new("Female", -161.0)];

/// Coded selector: 1 = from Celsius, 2 = from Fahrenheit
const TEMP_SCALE: &[Choice] = &[
    Choice::new("Celsius (°C)", 1.0),
    Choice::new("Fahrenheit (°F)", 2.0),
];

pub const BMI: CalculatorDefinition = CalculatorDefinition {
    id: "bmi",
    name: "Body Mass Index (BMI)",
    short_name: "BMI",
    specialty: Specialty::General,
    description: "Measures body fat based on height and weight.",
    fields: &[
        FieldDefinition::number("weight", "Weight", "kg"),
        FieldDefinition::number("height", "Height", "cm"),
    ],
    compute: bmi,
};

fn bmi(v: &FormulaInputs) -> FormulaResult {
    let height_m = v.get("height") / 100.0;
    let bmi = v.get("weight") / (height_m * height_m);
    let interpretation = if bmi < 18.5 {
        "Underweight"
    } else if (25.0..30.0).contains(&bmi) {
        "Overweight"
    } else if bmi >= 30.0 {
        "Obese"
    } else {
        "Normal"
    };
    FormulaResult::new(fixed(bmi, 1), "kg/m²").interpreted(interpretation)
}

pub const BSA: CalculatorDefinition = CalculatorDefinition {
    id: "bsa",
    name: "Body Surface Area (Mosteller)",
    short_name: "BSA",
    specialty: Specialty::General,
    description: "Calculates BSA, commonly used for drug dosing in oncology.",
    fields: &[
        FieldDefinition::number("height", "Height", "cm"),
        FieldDefinition::number("weight", "Weight", "kg"),
    ],
    compute: bsa,
};

/// Mosteller: √(height × weight / 3600)
fn bsa(v: &FormulaInputs) -> FormulaResult {
    let bsa = ((v.get("height") * v.get("weight")) / 3600.0).sqrt();
    FormulaResult::new(fixed(bsa, 2), "m²")
}

pub const TEMPERATURE: CalculatorDefinition = CalculatorDefinition {
    id: "temp-conv",
    name: "Temperature Converter",
    short_name: "Temp",
    specialty: Specialty::General,
    description: "Convert between Celsius and Fahrenheit.",
    fields: &[
        FieldDefinition::number("temp", "Temperature", "Value"),
        FieldDefinition::choice("scale", "From Scale", TEMP_SCALE),
    ],
    compute: temperature,
};

fn temperature(v: &FormulaInputs) -> FormulaResult {
    let temp = v.get("temp");
    if v.get("scale") == 1.0 {
        let result = (temp * 9.0 / 5.0) + 32.0;
        FormulaResult::new(fixed(result, 1), "°F")
            .interpreted(format!("{}°C is {}°F", number(temp), fixed(result, 1)))
    } else {
        let result = (temp - 32.0) * 5.0 / 9.0;
        FormulaResult::new(fixed(result, 1), "°C")
            .interpreted(format!("{}°F is {}°C", number(temp), fixed(result, 1)))
    }
}

pub const IBW: CalculatorDefinition = CalculatorDefinition {
    id: "ibw",
    name: "Ideal Body Weight (Devine)",
    short_name: "IBW",
    specialty: Specialty::General,
    description: "Estimates healthy weight based on height and gender.",
    fields: &[
        FieldDefinition::number("height", "Height", "cm"),
        FieldDefinition::choice("sex", "Sex", SEX_CODED),
    ],
    compute: ibw,
};

fn ibw(v: &FormulaInputs) -> FormulaResult {
    let height_in = v.get("height") / CM_PER_INCH;
    let base_kg = if v.get("sex") == 1.0 { 50.0 } else { 45.5 };
    let ibw = base_kg + 2.3 * (height_in - DEVINE_BASE_HEIGHT_IN);
    FormulaResult::new(fixed(ibw, 1), "kg")
}

pub const BMR: CalculatorDefinition = CalculatorDefinition {
    id: "bmr",
    name: "Basal Metabolic Rate (Mifflin-St Jeor)",
    short_name: "BMR",
    specialty: Specialty::General,
    description: "Daily calories needed at rest.",
    fields: &[
        FieldDefinition::number("weight", "Weight", "kg"),
        FieldDefinition::number("height", "Height", "cm"),
        FieldDefinition::number("age", "Age", "yrs"),
        FieldDefinition::choice("sex", "Sex", SEX_MIFFLIN),
    ],
    compute: bmr,
};

fn bmr(v: &FormulaInputs) -> FormulaResult {
    let bmr =
        (10.0 * v.get("weight")) + (6.25 * v.get("height")) - (5.0 * v.get("age")) + v.get("sex");
    FormulaResult::new(whole(bmr), "kcal/day").interpreted("Total energy expenditure at rest.")
}

pub const MAINTENANCE_FLUIDS: CalculatorDefinition = CalculatorDefinition {
    id: "maintenance-fluids",
    name: "Pediatric Maintenance Fluids (4-2-1 Rule)",
    short_name: "Maintenance Fluids",
    specialty: Specialty::Pediatrics,
    description: "Calculate hourly fluid maintenance requirements.",
    fields: &[FieldDefinition::number("weight", "Weight", "kg")],
    compute: maintenance_fluids,
};

/// 4 mL/kg/hr for the first 10 kg, 2 for the next 10, 1 beyond 20 kg.
fn maintenance_fluids(v: &FormulaInputs) -> FormulaResult {
    let w = v.get("weight");
    let rate = if w <= 10.0 {
        w * 4.0
    } else if w <= 20.0 {
        40.0 + (w - 10.0) * 2.0
    } else {
        60.0 + (w - 20.0) * 1.0
    };
    FormulaResult::new(fixed(rate, 0), "mL/hr")
}

pub const PARKLAND: CalculatorDefinition = CalculatorDefinition {
    id: "parkland",
    name: "Parkland Formula (Burns)",
    short_name: "Parkland",
    specialty: Specialty::CriticalCare,
    description: "Fluid resuscitation for burn victims (first 24h).",
    fields: &[
        FieldDefinition::number("weight", "Weight", "kg"),
        FieldDefinition::number("tbsa", "TBSA Burned", "%"),
    ],
    compute: parkland,
};

fn parkland(v: &FormulaInputs) -> FormulaResult {
    let total = 4.0 * v.get("weight") * v.get("tbsa");
    FormulaResult::new(fixed(total, 0), "mL (Total 24h)")
        .interpreted(format!("Give {} mL in first 8h.", whole(total / 2.0)))
}
