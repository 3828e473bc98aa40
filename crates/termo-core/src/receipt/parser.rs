//! Receipt parser running every field rule over normalized text.

use tracing::{debug, info, warn};

use crate::models::record::ExtractedRecord;
use crate::text::NormalizedText;

use super::rules::{
    DateExtractor, DateMatch, ScalarField, extract_cpf, extract_equipment,
    extract_scalar,
};

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields.
    pub record: ExtractedRecord,
    /// Extraction warnings.
    pub warnings: Vec<String>,
}

/// Rule-based receipt parser. Holds no state between documents.
pub struct ReceiptParser {
    dates: DateExtractor,
}

impl ReceiptParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            dates: DateExtractor::new(),
        }
    }

    /// Set day zero-padding for the document date.
    pub fn with_zero_pad_day(mut self, pad: bool) -> Self {
        self.dates = self.dates.with_zero_pad_day(pad);
        self
    }

    /// Extract a record from normalized text.
    pub fn extract(&self, text: &NormalizedText) -> ExtractedRecord {
        self.parse(text.as_str()).record
    }

    /// Run all rules over `text`, which must already be normalized.
    ///
    /// Each rule runs independently; a miss leaves its field absent.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let mut warnings = Vec::new();

        info!("Parsing receipt from {} characters of text", text.len());

        let data = match self.dates.find(text) {
            DateMatch::Found(date) => Some(date),
            DateMatch::UnknownMonth(name) => {
                warn!("Could not parse month name: {}", name);
                warnings.push(format!("Unrecognized month name: {}", name));
                None
            }
            DateMatch::NotFound => None,
        };

        let record = ExtractedRecord {
            nome: extract_scalar(ScalarField::Nome, text),
            matricula: extract_scalar(ScalarField::Matricula, text),
            funcao: extract_scalar(ScalarField::Funcao, text),
            empregador: extract_scalar(ScalarField::Empregador, text),
            rg: extract_scalar(ScalarField::Rg, text),
            cpf: extract_cpf(text),
            equipamentos: extract_equipment(text),
            data,
        };

        for field in record.missing_fields() {
            warnings.push(format!("Could not extract {}", field));
        }

        debug!(
            "Extracted {} equipment items, {} fields missing",
            record.equipamentos.len(),
            record.missing_fields().len()
        );

        ExtractionResult { record, warnings }
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::EquipmentItem;
    use crate::text::RawText;
    use pretty_assertions::assert_eq;

    const FORM: &str = "\
TERMO DE RECEBIMENTO DE EQUIPAMENTOS
EMPREGADO: JOÃO DA CONCEIÇÃO MATRÍCULA: 004512
FUNÇÃO: TÉCNICO DE CAMPO R.G. Nº: 12.345.678-9
EMPREGADOR: ACME SERVIÇOS LTDA CPF: 123.456.789-00
Recebi as seguintes ferramentas:
EQUIPAMENTO: Celular Motorola IMEI: 356789012345678
EQUIPAMENTO: Notebook Dell PATRIMÔNIO: PAT-0091

Declaro estar ciente das normas de uso.
São Paulo, 7 de Março de 2024
";

    #[test]
    fn test_parse_full_form() {
        let parser = ReceiptParser::new();
        let record = parser.extract(&RawText::new(FORM).normalize());

        assert_eq!(
            record,
            ExtractedRecord {
                nome: Some("joao da conceicao".to_string()),
                matricula: Some("004512".to_string()),
                funcao: Some("tecnico de campo".to_string()),
                empregador: Some("acme servicos ltda".to_string()),
                rg: Some("12.345.678-9".to_string()),
                cpf: Some("123.456.789-00".to_string()),
                equipamentos: vec![
                    EquipmentItem::new("celular motorola").with_imei("356789012345678"),
                    EquipmentItem::new("notebook dell").with_patrimonio("pat-0091"),
                ],
                data: Some("07/03/2024".to_string()),
            }
        );
    }

    #[test]
    fn test_scalar_sample() {
        let parser = ReceiptParser::new();
        let record = parser
            .parse("empregado: Maria Silva matricula: 123 funcao: Analista r.g. n: 1.2 empregador: Acme cpf: 12345678901")
            .record;

        assert_eq!(record.nome.as_deref(), Some("Maria Silva"));
        assert_eq!(record.matricula.as_deref(), Some("123"));
        assert_eq!(record.funcao.as_deref(), Some("Analista"));
        assert_eq!(record.rg.as_deref(), Some("1.2"));
        assert_eq!(record.empregador.as_deref(), Some("Acme"));
        assert_eq!(record.cpf.as_deref(), Some("12345678901"));
    }

    #[test]
    fn test_empty_input() {
        let result = ReceiptParser::new().parse("");

        assert_eq!(result.record, ExtractedRecord::default());
        assert_eq!(result.warnings.len(), 8);
    }

    #[test]
    fn test_garbage_input() {
        let garbage = "\u{0}\u{1}%PDF-1.4 \u{fffd}\u{fffd} xx@@!!\n\t";
        let record = ReceiptParser::new().parse(garbage).record;

        assert!(record.is_empty());
    }

    #[test]
    fn test_unknown_month_is_a_warning() {
        let result = ReceiptParser::new().parse("empregado: ana matricula: 1 sao paulo, 3 de xyz de 2022");

        assert_eq!(result.record.data, None);
        assert_eq!(result.record.nome.as_deref(), Some("ana"));
        assert!(result.warnings.iter().any(|w| w.contains("xyz")));
    }

    #[test]
    fn test_verbatim_day() {
        let parser = ReceiptParser::new().with_zero_pad_day(false);
        let record = parser.parse("sao paulo, 5 de marco de 2023").record;

        assert_eq!(record.data.as_deref(), Some("5/03/2023"));
    }
}
