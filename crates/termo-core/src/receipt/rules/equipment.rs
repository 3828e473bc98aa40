//! Equipment list extraction.
//!
//! The list sits between `ferramentas:` and `declaro`, one item per line.
//! A line may carry `imei:` and `patrimonio:` tags and an `equipamento:` label.

use super::FieldExtractor;
use super::patterns::{EQUIPMENT_BLOCK, EQUIPMENT_LABEL, IMEI_TAG, PATRIMONIO_TAG};
use crate::models::record::EquipmentItem;

/// Equipment list extractor.
pub struct EquipmentExtractor;

impl EquipmentExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EquipmentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EquipmentExtractor {
    type Output = EquipmentItem;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        extract_equipment(text)
    }
}

/// Extract all equipment items in line order. Empty when the block is missing.
pub fn extract_equipment(text: &str) -> Vec<EquipmentItem> {
    let Some(block) = EQUIPMENT_BLOCK.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    block
        .as_str()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_equipment_line)
        .collect()
}

/// Parse one line of the block. `None` if nothing is left after removing the tags.
pub fn parse_equipment_line(line: &str) -> Option<EquipmentItem> {
    let mut name = line.trim().to_string();

    let imei = IMEI_TAG
        .captures(&name)
        .map(|caps| caps[1].trim().to_string());
    if imei.is_some() {
        name = IMEI_TAG.replace_all(&name, "").trim().to_string();
    }

    let patrimonio = PATRIMONIO_TAG
        .captures(&name)
        .map(|caps| caps[1].trim().to_string());
    if patrimonio.is_some() {
        name = PATRIMONIO_TAG.replace_all(&name, "").trim().to_string();
    }

    let name = EQUIPMENT_LABEL.replace(&name, "").trim().to_string();
    if name.is_empty() {
        return None;
    }

    Some(EquipmentItem {
        nome_equipamento: name,
        imei,
        patrimonio,
    })
}
