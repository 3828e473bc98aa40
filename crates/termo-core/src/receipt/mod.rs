//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, ReceiptParser};

use crate::models::record::ExtractedRecord;

/// Extract every field from already-normalized text with default settings.
pub fn extract_fields(normalized_text: &str) -> ExtractedRecord {
    ReceiptParser::new().parse(normalized_text).record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fields_sample() {
        let record = extract_fields(
            "ferramentas:\nequipamento: Notebook imei: 12345\nequipamento: Mouse patrimonio: P99\ndeclaro\nsao paulo, 5 de marco de 2023",
        );

        assert_eq!(record.equipamentos.len(), 2);
        assert_eq!(record.equipamentos[0].nome_equipamento, "Notebook");
        assert_eq!(record.equipamentos[1].patrimonio.as_deref(), Some("P99"));
        assert_eq!(record.data.as_deref(), Some("05/03/2023"));
    }
}
