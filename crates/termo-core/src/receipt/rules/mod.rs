//! Rule-based field extractors for equipment receipts.

pub mod dates;
pub mod equipment;
pub mod patterns;
pub mod scalars;

pub use dates::{DateExtractor, DateMatch, month_number};
pub use equipment::{EquipmentExtractor, extract_equipment, parse_equipment_line};
pub use scalars::{AnchorRule, SCALAR_RULES, ScalarField, extract_cpf, extract_scalar};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
