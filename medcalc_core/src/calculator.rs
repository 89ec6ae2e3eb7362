//! # Calculator Definitions
//!
//! Declarative metadata for one clinical tool: identity, specialty, the
//! ordered input fields and the pure function that turns field values into a
//! [`FormulaResult`].
//!
//! Definitions are `'static` data built at compile time; the compute function
//! is a plain `fn` pointer so a whole catalog can live in a `static` table.
//!
//! ## Example
//!
//! ```rust
//! use medcalc_core::calculator::{
//!     CalculatorDefinition, FieldDefinition, FormulaInputs, FormulaResult,
//! };
//! use medcalc_core::specialty::Specialty;
//! use medcalc_core::format;
//!
//! fn pulse_pressure(v: &FormulaInputs) -> FormulaResult {
//!     FormulaResult::new(format::whole(v.get("sbp") - v.get("dbp")), "mmHg")
//! }
//!
//! const PULSE_PRESSURE: CalculatorDefinition = CalculatorDefinition {
//!     id: "pulse-pressure",
//!     name: "Pulse Pressure",
//!     short_name: "PP",
//!     specialty: Specialty::Cardiology,
//!     description: "Difference between systolic and diastolic pressure.",
//!     fields: &[
//!         FieldDefinition::number("sbp", "Systolic BP", "mmHg"),
//!         FieldDefinition::number("dbp", "Diastolic BP", "mmHg"),
//!     ],
//!     compute: pulse_pressure,
//! };
//!
//! assert_eq!(PULSE_PRESSURE.field("sbp").unwrap().label, "Systolic BP");
//! ```

use serde::{Deserialize, Serialize};

use crate::inputs::InputValueSet;
use crate::specialty::Specialty;

/// One labeled value of a choice field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Choice {
    /// Text shown to the user (e.g., "Oxycodone (1.5)")
    pub label: &'static str,
    /// Number fed to the formula; may repeat across choices
    pub value: f64,
}

impl Choice {
    pub const fn new(label: &'static str, value: f64) -> Self {
        Self { label, value }
    }
}

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "choices", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free numeric entry
    Number,
    /// Closed set of labeled numeric values, in display order
    Choice(&'static [Choice]),
}

/// One input slot of a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDefinition {
    /// Key used to address the value; unique within the calculator
    pub id: &'static str,
    /// Prompt shown to the user
    pub label: &'static str,
    /// Display unit, may be empty
    pub unit: &'static str,
    /// Numeric entry or closed choice
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Value pre-filled when the calculator opens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
}

impl FieldDefinition {
    /// A numeric-entry field with no default.
    pub const fn number(id: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self {
            id,
            label,
            unit,
            kind: FieldKind::Number,
            default_value: None,
        }
    }

    /// A choice field with no unit.
    pub const fn choice(id: &'static str, label: &'static str, choices: &'static [Choice]) -> Self {
        Self {
            id,
            label,
            unit: "",
            kind: FieldKind::Choice(choices),
            default_value: None,
        }
    }

    /// Pre-fill this field with `value` when the calculator opens.
    pub const fn with_default(self, value: f64) -> Self {
        Self {
            default_value: Some(value),
            ..self
        }
    }

    /// Choices of a choice field; empty for numeric fields.
    pub fn choices(&self) -> &'static [Choice] {
        match self.kind {
            FieldKind::Choice(choices) => choices,
            FieldKind::Number => &[],
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }

    /// Value the field starts with, if any: the declared default, else the
    /// first choice for choice fields.
    pub fn initial_value(&self) -> Option<f64> {
        self.default_value
            .or_else(|| self.choices().first().map(|c| c.value))
    }
}

/// Pure computation from field values to a display result.
pub type ComputeFn = fn(&FormulaInputs) -> FormulaResult;

/// One clinical tool.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CalculatorDefinition {
    /// Globally unique id (e.g., "bmi")
    pub id: &'static str,
    /// Full name (e.g., "Body Mass Index (BMI)")
    pub name: &'static str,
    /// Abbreviation (e.g., "BMI")
    pub short_name: &'static str,
    /// Classification used for filtering
    pub specialty: Specialty,
    /// One-sentence summary
    pub description: &'static str,
    /// Input fields in display/entry order
    pub fields: &'static [FieldDefinition],
    /// The formula itself
    #[serde(skip)]
    pub compute: ComputeFn,
}

impl CalculatorDefinition {
    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&'static FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }
}

impl PartialEq for CalculatorDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Read-only view of a calculator's values handed to its compute function.
///
/// Absent fields read as `0`. In debug builds, reading a field the
/// calculator does not declare panics.
pub struct FormulaInputs<'a> {
    calculator: &'a CalculatorDefinition,
    values: &'a InputValueSet,
}

impl<'a> FormulaInputs<'a> {
    pub fn new(calculator: &'a CalculatorDefinition, values: &'a InputValueSet) -> Self {
        Self { calculator, values }
    }

    /// Current value of field `id`, or `0` if unset.
    pub fn get(&self, id: &str) -> f64 {
        debug_assert!(
            self.calculator.has_field(id),
            "calculator '{}' reads undeclared field '{}'",
            self.calculator.id,
            id
        );
        self.values.get(id).unwrap_or(0.0)
    }

    /// Sum of several fields (point scores).
    pub fn sum(&self, ids: &[&str]) -> f64 {
        ids.iter().map(|id| self.get(id)).sum()
    }
}

/// Output of one evaluation.
///
/// ## JSON Example
///
/// ```json
/// { "value": "22.9", "unit": "kg/m²", "interpretation": "Normal" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaResult {
    /// Pre-formatted display value (may be "Infinity" or "NaN")
    pub value: String,
    /// Display unit of the output
    pub unit: String,
    /// Clinical label derived from the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

impl FormulaResult {
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
            interpretation: None,
        }
    }

    /// Attach an interpretation label.
    pub fn interpreted(mut self, interpretation: impl Into<String>) -> Self {
        self.interpretation = Some(interpretation.into());
        self
    }
}
