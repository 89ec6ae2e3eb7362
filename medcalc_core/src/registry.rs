//! # Formula Registry
//!
//! Read-only, ordered view over the formula catalog with lookup and
//! filtering by specialty and free-text search.
//!
//! ## Usage
//!
//! ```rust
//! use medcalc_core::registry::REGISTRY;
//! use medcalc_core::specialty::{Specialty, SpecialtyFilter};
//!
//! let renal = REGISTRY.by_specialty(Specialty::Nephrology);
//! assert!(renal.iter().all(|c| c.specialty == Specialty::Nephrology));
//!
//! let hits = REGISTRY.by_specialty_and_search(SpecialtyFilter::All, "bmi");
//! assert_eq!(hits[0].id, "bmi");
//! ```

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::calculator::{CalculatorDefinition, FieldKind};
use crate::errors::{CalcError, CalcResult};
use crate::formulas::CALCULATORS;
use crate::specialty::{Specialty, SpecialtyFilter};

/// Process-wide registry over the built-in catalog.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry::new(CALCULATORS));

/// Ordered calculator collection with an id index.
#[derive(Debug)]
pub struct Registry {
    calculators: &'static [CalculatorDefinition],
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Build a registry over `calculators`, keeping their order.
    ///
    /// Debug builds panic on duplicate calculator ids, duplicate field ids
    /// within a calculator, or a choice field without choices.
    pub fn new(calculators: &'static [CalculatorDefinition]) -> Self {
        if cfg!(debug_assertions) {
            validate(calculators);
        }
        let index = calculators
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        debug!(count = calculators.len(), "built formula registry");
        Self { calculators, index }
    }

    /// Every calculator in catalog order.
    pub fn all(&self) -> &'static [CalculatorDefinition] {
        self.calculators
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// Calculators of one specialty, in catalog order.
    pub fn by_specialty(&self, specialty: Specialty) -> Vec<&'static CalculatorDefinition> {
        self.filtered(SpecialtyFilter::Only(specialty), "")
    }

    /// Case-insensitive substring match on name or short name.
    ///
    /// An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&'static CalculatorDefinition> {
        self.filtered(SpecialtyFilter::All, term)
    }

    /// Specialty filter and search term combined.
    pub fn by_specialty_and_search(
        &self,
        filter: impl Into<SpecialtyFilter>,
        term: &str,
    ) -> Vec<&'static CalculatorDefinition> {
        self.filtered(filter.into(), term)
    }

    /// Look up a calculator by id.
    pub fn get(&self, id: &str) -> CalcResult<&'static CalculatorDefinition> {
        let calculators = self.calculators;
        self.index
            .get(id)
            .map(|&i| &calculators[i])
            .ok_or_else(|| CalcError::unknown_calculator(id))
    }

    /// Number of calculators per specialty, in [`Specialty::ALL`] order.
    pub fn specialty_counts(&self) -> Vec<(Specialty, usize)> {
        Specialty::ALL
            .iter()
            .map(|&s| (s, self.calculators.iter().filter(|c| c.specialty == s).count()))
            .collect()
    }

    fn filtered(&self, filter: SpecialtyFilter, term: &str) -> Vec<&'static CalculatorDefinition> {
        let needle = term.to_lowercase();
        let calculators: &'static [CalculatorDefinition] = self.calculators;
        calculators
            .iter()
            .filter(|c| filter.matches(c.specialty))
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.short_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Markdown reference of the whole catalog, grouped by specialty.
    ///
    /// ```rust
    /// use medcalc_core::registry::REGISTRY;
    ///
    /// let markdown = REGISTRY.catalog_markdown();
    /// assert!(markdown.contains("# MedCalc Formula Catalog"));
    /// assert!(markdown.contains("### Body Mass Index (BMI)"));
    /// ```
    pub fn catalog_markdown(&self) -> String {
        let mut output = String::with_capacity(32_000);

        output.push_str(
            r#"# MedCalc Formula Catalog

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-catalog`

Every calculator shipped with MedCalc, grouped by specialty, with its inputs.
Choice fields list the number each option contributes to the formula.

---

"#,
        );

        let mut sections = 0;
        for &(specialty, count) in &self.specialty_counts() {
            if count == 0 {
                continue;
            }
            sections += 1;
            output.push_str(&format!("## {}\n\n", specialty.display_name()));

            for calc in self.by_specialty(specialty) {
                output.push_str(&format!("### {}\n\n", calc.name));
                output.push_str(&format!("`{}` · {}\n\n", calc.id, calc.short_name));
                output.push_str(&format!("{}\n\n", calc.description));

                output.push_str("| Field | Label | Unit | Input |\n");
                output.push_str("|-------|-------|------|-------|\n");
                for field in calc.fields {
                    let input = match field.kind {
                        FieldKind::Number => match field.default_value {
                            Some(d) => format!("number (default {})", crate::format::number(d)),
                            None => "number".to_string(),
                        },
                        FieldKind::Choice(choices) => choices
                            .iter()
                            .map(|c| format!("{} = {}", c.label, crate::format::number(c.value)))
                            .collect::<Vec<_>>()
                            .join("; "),
                    };
                    output.push_str(&format!(
                        "| `{}` | {} | {} | {} |\n",
                        field.id, field.label, field.unit, input
                    ));
                }
                output.push_str("\n---\n\n");
            }
        }

        output.push_str(&format!(
            "## Statistics\n\n- **Total Calculators:** {}\n- **Specialties:** {}\n",
            self.len(),
            sections
        ));

        output
    }
}

fn validate(calculators: &[CalculatorDefinition]) {
    let mut ids = HashMap::new();
    for calc in calculators {
        if let Some(previous) = ids.insert(calc.id, calc.name) {
            panic!("duplicate calculator id '{}' ({} / {})", calc.id, previous, calc.name);
        }
        let mut fields = HashSet::new();
        for field in calc.fields {
            if !fields.insert(field.id) {
                panic!("calculator '{}' declares field '{}' twice", calc.id, field.id);
            }
            if field.is_choice() && field.choices().is_empty() {
                panic!("choice field '{}.{}' has no choices", calc.id, field.id);
            }
        }
    }
}
