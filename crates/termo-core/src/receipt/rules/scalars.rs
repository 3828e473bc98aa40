//! Anchor-delimited scalar fields.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use super::FieldExtractor;
use super::patterns::{CPF_VALUE, RG_ANCHOR};

/// Scalar fields of a receipt record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Nome,
    Matricula,
    Funcao,
    Rg,
    Empregador,
}

impl ScalarField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nome => "nome",
            Self::Matricula => "matricula",
            Self::Funcao => "funcao",
            Self::Rg => "rg",
            Self::Empregador => "empregador",
        }
    }
}

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// (field, start anchor, end anchor). Anchors are regex fragments.
const SCALAR_TABLE: [(ScalarField, &str, &str); 5] = [
    (ScalarField::Nome, r"empregado:", r"matricula:"),
    (ScalarField::Matricula, r"matricula:", r"funcao:"),
    (ScalarField::Funcao, r"funcao:", RG_ANCHOR),
    (ScalarField::Rg, r"r\.g\. n(?:º|°)?:(?:\s*nº:)?", r"empregador:"),
    (ScalarField::Empregador, r"empregador:", r"cpf:"),
];

/// Captures the text between a start and an end anchor, non-greedy, across lines.
pub struct AnchorRule {
    pub field: ScalarField,
    pattern: Regex,
}

impl AnchorRule {
    fn new(field: ScalarField, start: &str, end: &str) -> Self {
        let pattern = Regex::new(&format!(r"(?s){}\s*(.*?)\s*{}", start, end))
            .expect("scalar anchor table holds valid patterns");
        Self { field, pattern }
    }
}

impl FieldExtractor for AnchorRule {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let value = caps.get(1)?.as_str().trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn extract_all(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }
}

lazy_static! {
    /// The compiled scalar rules, in table order.
    pub static ref SCALAR_RULES: Vec<AnchorRule> = SCALAR_TABLE
        .iter()
        .map(|(field, start, end)| AnchorRule::new(*field, start, end))
        .collect();
}

/// Extract one scalar field.
pub fn extract_scalar(field: ScalarField, text: &str) -> Option<String> {
    SCALAR_RULES
        .iter()
        .find(|rule| rule.field == field)
        .and_then(|rule| rule.extract(text))
}

/// Extract the CPF. `Some("")` when the label is present but no digit run follows.
pub fn extract_cpf(text: &str) -> Option<String> {
    let caps = CPF_VALUE.captures(text)?;
    Some(
        caps.get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "empregado: Maria Silva matricula: 123 funcao: Analista r.g. n: 1.2 empregador: Acme cpf: 12345678901";

    #[test]
    fn test_single_line_sample() {
        assert_eq!(extract_scalar(ScalarField::Nome, SAMPLE).as_deref(), Some("Maria Silva"));
        assert_eq!(extract_scalar(ScalarField::Matricula, SAMPLE).as_deref(), Some("123"));
        assert_eq!(extract_scalar(ScalarField::Funcao, SAMPLE).as_deref(), Some("Analista"));
        assert_eq!(extract_scalar(ScalarField::Rg, SAMPLE).as_deref(), Some("1.2"));
        assert_eq!(extract_scalar(ScalarField::Empregador, SAMPLE).as_deref(), Some("Acme"));
        assert_eq!(extract_cpf(SAMPLE).as_deref(), Some("12345678901"));
    }

    #[test]
    fn test_values_span_lines() {
        let text = "empregado:\n  joao da\nsilva\nmatricula: 42\nfuncao: x";
        assert_eq!(
            extract_scalar(ScalarField::Nome, text).as_deref(),
            Some("joao da\nsilva")
        );
    }

    #[test]
    fn test_rg_anchor_variants() {
        for anchor in ["r.g. nº:", "r.g. n°:", "r.g. n:", "r.g. nº: nº:"] {
            let text = format!("funcao: tecnico {} 12.345.678-9 empregador: acme", anchor);
            assert_eq!(
                extract_scalar(ScalarField::Rg, &text).as_deref(),
                Some("12.345.678-9"),
                "anchor {:?}",
                anchor
            );
            assert_eq!(
                extract_scalar(ScalarField::Funcao, &text).as_deref(),
                Some("tecnico")
            );
        }
    }

    #[test]
    fn test_anchors_out_of_order() {
        let text = "matricula: 1 empregado: maria";
        assert_eq!(extract_scalar(ScalarField::Nome, text), None);
    }

    #[test]
    fn test_blank_value_is_absent() {
        assert_eq!(extract_scalar(ScalarField::Nome, "empregado:   matricula: 1"), None);
    }

    #[test]
    fn test_cpf_variants() {
        assert_eq!(extract_cpf("cpf: 123.456.789-00").as_deref(), Some("123.456.789-00"));
        assert_eq!(extract_cpf("cpf: abc lixo 12").as_deref(), Some(""));
        assert_eq!(extract_cpf("cpf:"), Some(String::new()));
        assert_eq!(extract_cpf("sem documento"), None);
        // Longer runs are cut at 14 characters
        assert_eq!(
            extract_cpf("cpf: 123456789012345678").as_deref(),
            Some("12345678901234")
        );
    }

    #[test]
    fn test_extract_all() {
        let rule = &SCALAR_RULES[0];
        let text = "empregado: a matricula: 1\nempregado: b matricula: 2";
        assert_eq!(rule.extract_all(text), vec!["a", "b"]);
    }
}
