//! Regex patterns for receipt field extraction.
//!
//! All patterns are written against normalized text (lowercase, no accents).

use lazy_static::lazy_static;
use regex::Regex;

/// `r.g. n:`, `r.g. nº:` or `r.g. n°:`.
pub const RG_ANCHOR: &str = r"r\.g\. n(?:º|°)?:";

lazy_static! {
    // Tax ID: a run of digits, dots and dashes, or nothing at all
    pub static ref CPF_VALUE: Regex = Regex::new(
        r"(?s)cpf:\s*([\d.\-]{11,14})?"
    ).unwrap();

    // Equipment block between the tools header and the declaration
    pub static ref EQUIPMENT_BLOCK: Regex = Regex::new(
        r"(?s)ferramentas:\s*(.*?)\s*declaro"
    ).unwrap();

    pub static ref IMEI_TAG: Regex = Regex::new(
        r"(?i)imei:\s*(\S+)"
    ).unwrap();

    pub static ref PATRIMONIO_TAG: Regex = Regex::new(
        r"(?i)patrimonio:\s*(\S+)"
    ).unwrap();

    pub static ref EQUIPMENT_LABEL: Regex = Regex::new(
        r"(?i)^equipamento:\s*"
    ).unwrap();

    // "sao paulo, 5 de marco de 2023"
    pub static ref DATE_PHRASE: Regex = Regex::new(
        r"sao paulo,\s*(\d{1,2})\s*de\s*(\p{L}+)\s*de\s*(\d{4})"
    ).unwrap();
}
