//! # medcalc_core - Clinical Formula Catalog and Evaluation Engine
//!
//! `medcalc_core` holds every clinical calculator as declarative data (fields,
//! units, choices, defaults) next to a pure compute function, and a small
//! engine that turns raw user entry into a formatted, interpreted result.
//! All definitions and results are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Data-first**: a calculator is a `const` table entry, not a type
//! - **Never fails on input**: bad text reads as 0, undefined math shows as
//!   `Infinity`/`NaN`
//! - **Rich Errors**: structured error types for everything around the engine
//!
//! ## Quick Start
//!
//! ```rust
//! use medcalc_core::engine::CalculatorSession;
//! use medcalc_core::registry::REGISTRY;
//!
//! let mut session = CalculatorSession::open(REGISTRY.get("map")?);
//! session.set_field("sbp", "120")?;
//! session.set_field("dbp", "80")?;
//!
//! let result = session.calculate();
//! assert_eq!(result.value, "93");
//! assert_eq!(result.unit, "mmHg");
//! # Ok::<(), medcalc_core::errors::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`registry`] - the catalog with lookup, search and specialty filters
//! - [`engine`] - initialize / set field / evaluate, plus sessions
//! - [`formulas`] - every calculator definition
//! - [`calculator`] - definition, field and result types
//! - [`format`] - numeric display rules shared by all formulas
//! - [`advisory`] - prompt contract for the clinical assistant
//! - [`settings`] - persisted user preferences
//! - [`file_io`] - preferences file operations with atomic saves
//! - [`errors`] - structured error types

pub mod advisory;
pub mod calculator;
pub mod engine;
pub mod errors;
pub mod file_io;
pub mod format;
pub mod formulas;
pub mod inputs;
pub mod registry;
pub mod settings;
pub mod specialty;

// Re-export commonly used types at crate root for convenience
pub use calculator::{CalculatorDefinition, FieldDefinition, FieldKind, FormulaResult};
pub use engine::{evaluate, initialize, set_field, CalculatorSession};
pub use errors::{CalcError, CalcResult};
pub use inputs::InputValueSet;
pub use registry::{Registry, REGISTRY};
pub use settings::{Preferences, Theme};
pub use specialty::{Specialty, SpecialtyFilter};
