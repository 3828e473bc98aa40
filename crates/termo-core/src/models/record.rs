//! Receipt record models and their persisted form.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields extracted from one equipment receipt/return form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Employee name.
    pub nome: Option<String>,

    /// Registration number.
    pub matricula: Option<String>,

    /// Job role.
    pub funcao: Option<String>,

    /// Employer name.
    pub empregador: Option<String>,

    /// National ID number (RG).
    pub rg: Option<String>,

    /// Tax ID (CPF). `Some("")` when the label is present without digits.
    pub cpf: Option<String>,

    /// Equipment listed on the form, in document order.
    #[serde(default)]
    pub equipamentos: Vec<EquipmentItem>,

    /// Document date as `DD/MM/YYYY`.
    pub data: Option<String>,
}

/// One piece of hardware listed on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub nome_equipamento: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patrimonio: Option<String>,
}

impl EquipmentItem {
    pub fn new(nome_equipamento: impl Into<String>) -> Self {
        Self {
            nome_equipamento: nome_equipamento.into(),
            imei: None,
            patrimonio: None,
        }
    }

    pub fn with_imei(mut self, imei: impl Into<String>) -> Self {
        self.imei = Some(imei.into());
        self
    }

    pub fn with_patrimonio(mut self, patrimonio: impl Into<String>) -> Self {
        self.patrimonio = Some(patrimonio.into());
        self
    }
}

impl ExtractedRecord {
    /// Names of the fields that could not be extracted.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let scalars = [
            ("nome", &self.nome),
            ("matricula", &self.matricula),
            ("funcao", &self.funcao),
            ("empregador", &self.empregador),
            ("rg", &self.rg),
            ("cpf", &self.cpf),
            ("data", &self.data),
        ];
        for (name, value) in scalars {
            if value.is_none() {
                missing.push(name);
            }
        }
        if self.equipamentos.is_empty() {
            missing.push("equipamentos");
        }
        missing
    }

    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.missing_fields().len() == 8
    }
}

/// Identifier assigned by a document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mail message and attachment position a document was ingested from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailOrigin {
    pub message_id: String,
    pub attachment: usize,
}

/// A processed document ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    pub subject: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_filepath: Option<PathBuf>,
    /// Raw text as acquired, before normalization.
    pub extracted_text: String,
    pub processed_at: DateTime<Utc>,
    pub record: ExtractedRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<MailOrigin>,
}

/// A document as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    #[serde(flatten)]
    pub document: NewDocument,
}
