//! Document date extraction from the Portuguese place-and-date line.

use tracing::warn;

use super::FieldExtractor;
use super::patterns::DATE_PHRASE;

/// Outcome of looking for the date phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateMatch {
    /// Formatted `DD/MM/YYYY`.
    Found(String),
    /// Phrase present, month name not in the table.
    UnknownMonth(String),
    NotFound,
}

/// Date field extractor.
pub struct DateExtractor {
    zero_pad_day: bool,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self { zero_pad_day: true }
    }

    /// Left-pad single-digit days (`5` -> `05`). On by default.
    pub fn with_zero_pad_day(mut self, pad: bool) -> Self {
        self.zero_pad_day = pad;
        self
    }

    /// Look for the first date phrase. No calendar validation is done.
    pub fn find(&self, text: &str) -> DateMatch {
        match DATE_PHRASE.captures(text) {
            Some(caps) => self.format(&caps[1], &caps[2], &caps[3]),
            None => DateMatch::NotFound,
        }
    }

    fn format(&self, day: &str, month_name: &str, year: &str) -> DateMatch {
        let Some(month) = month_number(month_name) else {
            return DateMatch::UnknownMonth(month_name.to_string());
        };
        let day = if self.zero_pad_day && day.len() == 1 {
            format!("0{}", day)
        } else {
            day.to_string()
        };
        DateMatch::Found(format!("{}/{}/{}", day, month, year))
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        match self.find(text) {
            DateMatch::Found(date) => Some(date),
            DateMatch::UnknownMonth(name) => {
                warn!("Could not parse month name: {}", name);
                None
            }
            DateMatch::NotFound => None,
        }
    }

    fn extract_all(&self, text: &str) -> Vec<String> {
        DATE_PHRASE
            .captures_iter(text)
            .filter_map(|caps| match self.format(&caps[1], &caps[2], &caps[3]) {
                DateMatch::Found(date) => Some(date),
                _ => None,
            })
            .collect()
    }
}

/// Two-digit month for a normalized Portuguese month name.
pub fn month_number(name: &str) -> Option<&'static str> {
    let month = match name {
        "janeiro" => "01",
        "fevereiro" => "02",
        "marco" => "03",
        "abril" => "04",
        "maio" => "05",
        "junho" => "06",
        "julho" => "07",
        "agosto" => "08",
        "setembro" => "09",
        "outubro" => "10",
        "novembro" => "11",
        "dezembro" => "12",
        _ => return None,
    };
    Some(month)
}
