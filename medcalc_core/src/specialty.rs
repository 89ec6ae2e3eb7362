//! # Clinical Specialties
//!
//! Classification tags attached to every calculator. Specialties drive
//! filtering only; no formula looks at its own specialty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Clinical domain a calculator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    General,
    #[serde(rename = "Critical Care")]
    CriticalCare,
    Nephrology,
    Cardiology,
    Pediatrics,
    Pharmacology,
    Gastroenterology,
    Neurology,
    Emergency,
}

impl Specialty {
    /// All specialties in filter-chip order
    pub const ALL: [Specialty; 9] = [
        Specialty::General,
        Specialty::CriticalCare,
        Specialty::Nephrology,
        Specialty::Cardiology,
        Specialty::Pediatrics,
        Specialty::Pharmacology,
        Specialty::Gastroenterology,
        Specialty::Neurology,
        Specialty::Emergency,
    ];

    /// Display name (e.g., "Critical Care")
    pub fn display_name(&self) -> &'static str {
        match self {
            Specialty::General => "General",
            Specialty::CriticalCare => "Critical Care",
            Specialty::Nephrology => "Nephrology",
            Specialty::Cardiology => "Cardiology",
            Specialty::Pediatrics => "Pediatrics",
            Specialty::Pharmacology => "Pharmacology",
            Specialty::Gastroenterology => "Gastroenterology",
            Specialty::Neurology => "Neurology",
            Specialty::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Specialty {
    type Err = CalcError;

    /// Accepts "Critical Care", "critical-care" and "critical_care" alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Specialty::ALL
            .iter()
            .copied()
            .find(|sp| normalize(sp.display_name()) == wanted)
            .ok_or_else(|| CalcError::unknown_specialty(s))
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Specialty filter with an "all specialties" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialtyFilter {
    #[default]
    All,
    Only(Specialty),
}

impl SpecialtyFilter {
    /// Whether a calculator tagged `specialty` passes this filter
    pub fn matches(&self, specialty: Specialty) -> bool {
        match self {
            SpecialtyFilter::All => true,
            SpecialtyFilter::Only(s) => *s == specialty,
        }
    }
}

impl From<Specialty> for SpecialtyFilter {
    fn from(s: Specialty) -> Self {
        SpecialtyFilter::Only(s)
    }
}

impl From<Option<Specialty>> for SpecialtyFilter {
    fn from(s: Option<Specialty>) -> Self {
        s.map_or(SpecialtyFilter::All, SpecialtyFilter::Only)
    }
}
