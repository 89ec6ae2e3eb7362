//! # Evaluation Engine
//!
//! Turns raw user entry into an [`InputValueSet`] and runs a calculator's
//! compute function over it.
//!
//! The three free functions are the whole contract:
//!
//! - [`initialize`] - defaults and first choices, nothing else
//! - [`set_field`] - permissive parse, never fails
//! - [`evaluate`] - run the formula on whatever is set
//!
//! [`CalculatorSession`] bundles them for a front end that keeps one
//! calculator open at a time.
//!
//! ## Example
//!
//! ```rust
//! use medcalc_core::engine::{evaluate, initialize, set_field};
//! use medcalc_core::registry::REGISTRY;
//!
//! let bmi = REGISTRY.get("bmi").unwrap();
//! let mut values = initialize(bmi);
//! set_field(&mut values, "weight", "70");
//! set_field(&mut values, "height", "175");
//!
//! let result = evaluate(bmi, &values);
//! assert_eq!(result.value, "22.9");
//! assert_eq!(result.interpretation.as_deref(), Some("Normal"));
//! ```

use tracing::debug;
use uuid::Uuid;

use crate::calculator::{CalculatorDefinition, FormulaInputs, FormulaResult};
use crate::errors::{CalcError, CalcResult};
use crate::inputs::InputValueSet;

/// Fresh value set for `calculator`: declared defaults, first choice of
/// every choice field, numeric fields without default left unset.
pub fn initialize(calculator: &CalculatorDefinition) -> InputValueSet {
    calculator
        .fields
        .iter()
        .filter_map(|f| f.initial_value().map(|v| (f.id, v)))
        .collect()
}

/// Parse `raw` into `values[field_id]`; unparseable text stores `0`.
///
/// Returns the stored value.
pub fn set_field(values: &mut InputValueSet, field_id: &str, raw: &str) -> f64 {
    values.set_raw(field_id, raw)
}

/// Run the calculator's formula on the current values.
///
/// Never fails: undefined arithmetic surfaces as `"Infinity"` / `"NaN"` in
/// the result value.
pub fn evaluate(calculator: &CalculatorDefinition, values: &InputValueSet) -> FormulaResult {
    let result = (calculator.compute)(&FormulaInputs::new(calculator, values));
    debug!(
        calculator = calculator.id,
        value = %result.value,
        unit = %result.unit,
        "evaluated formula"
    );
    result
}

/// One open calculator and the values entered into it.
///
/// Opening a different calculator discards the previous values.
#[derive(Debug, Clone)]
pub struct CalculatorSession {
    id: Uuid,
    calculator: &'static CalculatorDefinition,
    values: InputValueSet,
    last_result: Option<FormulaResult>,
}

impl CalculatorSession {
    /// Open `calculator` with initialized values.
    pub fn open(calculator: &'static CalculatorDefinition) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            calculator,
            values: initialize(calculator),
            last_result: None,
        };
        debug!(session = %session.id, calculator = calculator.id, "opened calculator");
        session
    }

    /// Switch to another calculator, resetting values and the last result.
    pub fn reopen(&mut self, calculator: &'static CalculatorDefinition) {
        debug!(
            session = %self.id,
            from = self.calculator.id,
            to = calculator.id,
            "switched calculator"
        );
        self.calculator = calculator;
        self.values = initialize(calculator);
        self.last_result = None;
    }

    /// Enter raw text into a field of the open calculator.
    ///
    /// Bad text is coerced to `0`; only an id the calculator does not
    /// declare is an error.
    pub fn set_field(&mut self, field_id: &str, raw: &str) -> CalcResult<f64> {
        if !self.calculator.has_field(field_id) {
            return Err(CalcError::unknown_field(self.calculator.id, field_id));
        }
        Ok(set_field(&mut self.values, field_id, raw))
    }

    /// Select a choice by its position in the field's choice list.
    pub fn select_choice(&mut self, field_id: &str, index: usize) -> CalcResult<f64> {
        let field = self
            .calculator
            .field(field_id)
            .ok_or_else(|| CalcError::unknown_field(self.calculator.id, field_id))?;
        let choice = field
            .choices()
            .get(index)
            .ok_or_else(|| CalcError::unknown_choice(field_id, index))?;
        self.values.set(field_id, choice.value);
        Ok(choice.value)
    }

    /// Evaluate with the current values and remember the result.
    pub fn calculate(&mut self) -> &FormulaResult {
        let result = evaluate(self.calculator, &self.values);
        self.last_result.insert(result)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn calculator(&self) -> &'static CalculatorDefinition {
        self.calculator
    }

    pub fn values(&self) -> &InputValueSet {
        &self.values
    }

    /// Result of the most recent [`calculate`](Self::calculate), if any.
    pub fn last_result(&self) -> Option<&FormulaResult> {
        self.last_result.as_ref()
    }
}
