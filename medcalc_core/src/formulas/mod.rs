//! # Formula Catalog
//!
//! Every calculator the application ships, grouped by clinical area.
//!
//! ## Modules
//!
//! - [`dosing`] - dose, infusion and compounding arithmetic
//! - [`body`] - body size, energy and fluid requirements
//! - [`labs`] - laboratory corrections and renal function
//! - [`cardiopulmonary`] - hemodynamics, gas exchange and ECG
//! - [`scores`] - point-sum clinical scores
//!
//! [`CALCULATORS`] fixes the catalog order; listings and the registry
//! preserve it.

pub mod body;
pub mod cardiopulmonary;
pub mod dosing;
pub mod labs;
pub mod scores;

use crate::calculator::CalculatorDefinition;

/// The complete catalog in display order.
pub static CALCULATORS: &[CalculatorDefinition] = &[
    dosing::STANDARD_DOSE,
    dosing::WEIGHT_DOSE,
    dosing::BSA_DOSE,
    dosing::INFUSION_RATE,
    dosing::MCG_KG_MIN,
    dosing::DILUTION,
    dosing::ALLIGATION,
    dosing::POWDER_DISPLACEMENT,
    dosing::MME,
    dosing::REMAINING_TIME,
    body::BMI,
    body::BSA,
    labs::CORRECTED_SODIUM,
    cardiopulmonary::AA_GRADIENT,
    labs::FE_UREA,
    scores::HAS_BLED,
    scores::BISAP,
    labs::CORRECTED_PHENYTOIN,
    scores::HEART,
    scores::CENTOR,
    labs::MELD,
    body::TEMPERATURE,
    body::IBW,
    body::BMR,
    cardiopulmonary::MAP,
    labs::FENA,
    labs::WATER_DEFICIT,
    labs::CORRECTED_CALCIUM,
    labs::LDL,
    scores::SIRS,
    cardiopulmonary::PF_RATIO,
    labs::BICARBONATE_DEFICIT,
    labs::CRCL,
    scores::QSOFA,
    cardiopulmonary::QTC,
    scores::CHA2DS2_VASC,
    labs::ANION_GAP,
    labs::ANC,
    dosing::DRIP_RATE,
    body::MAINTENANCE_FLUIDS,
    scores::APGAR,
    body::PARKLAND,
    scores::GCS,
    scores::WELLS_PE,
    scores::CURB65,
];


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_order() {
        assert_eq!(CALCULATORS.len(), 45);
        assert_eq!(CALCULATORS[0].id, "standard-dose");
        assert_eq!(CALCULATORS[10].id, "bmi");
        assert_eq!(CALCULATORS[44].id, "curb65");
    }

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<_> = CALCULATORS.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CALCULATORS.len());
    }

    #[test]
    fn test_every_calculator_is_well_formed() {
        for calc in CALCULATORS {
            assert!(!calc.fields.is_empty(), "{} has no fields", calc.id);
            let field_ids: HashSet<_> = calc.fields.iter().map(|f| f.id).collect();
            assert_eq!(field_ids.len(), calc.fields.len(), "{} repeats a field id", calc.id);
            for field in calc.fields {
                if field.is_choice() {
                    assert!(!field.choices().is_empty(), "{}.{} has no choices", calc.id, field.id);
                }
            }
        }
    }
}
