//! Core data types shared by the row source and the exporter.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A scalar value decoded from a source column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Returns `true` for NULL and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            SqlValue::Null => true,
            SqlValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value; text is parsed leniently (MySQL DECIMAL arrives as text).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Int(v) => Some(*v as f64),
            SqlValue::UInt(v) => Some(*v as f64),
            SqlValue::Float(v) => Some(*v),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::UInt(v) => i64::try_from(*v).ok(),
            SqlValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Renders the value as a flat cell. NULL renders as the empty string.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// JSON representation used by the JSON sinks.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Int(v) => serde_json::Value::from(*v),
            SqlValue::UInt(v) => serde_json::Value::from(*v),
            SqlValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => Ok(()),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::UInt(v) => write!(f, "{v}"),
            SqlValue::Float(v) => write!(f, "{v}"),
            SqlValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            SqlValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

/// One decoded result row: column names with their values, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, SqlValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Appends a column. A later column with the same name shadows nothing; lookups
    /// return the first match, mirroring how drivers resolve duplicate names.
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.push((name.into(), value));
    }

    /// Builder-style variant of [`Record::push`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Value at a column position.
    pub fn value_at(&self, index: usize) -> Option<&SqlValue> {
        self.columns.get(index).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Technical-specification fields that the comprehensive layout exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum SpecField {
    Capacity,
    ExpirationDate,
    DurabilityDate,
    Ingredients,
}

impl SpecField {
    /// Classifies a localized characteristic label ("Capacité", "DLC", "Ingrédients", ...).
    pub fn classify(label: &str) -> Option<SpecField> {
        let label = label.to_lowercase();
        let has = |needle: &str| label.contains(needle);
        if has("ngrédient") || has("ngredient") {
            Some(SpecField::Ingredients)
        } else if has("dlc") {
            Some(SpecField::ExpirationDate)
        } else if has("ddm") || has("durabilit") {
            Some(SpecField::DurabilityDate)
        } else if has("capacit") || has("capacity") || has("volume") || has("contenance") {
            Some(SpecField::Capacity)
        } else {
            None
        }
    }
}

/// A technical-specification value joined for a product group in one language.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalSpec {
    pub field: SpecField,
    pub language: String,
    pub value: String,
}

/// A product row plus the auxiliary values joined for it.
///
/// Created per fetched row and discarded once flattened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductRecord {
    pub fields: Record,
    /// Gallery image URLs in source order (untruncated).
    pub media: Vec<String>,
    /// Technical specifications in source order, all languages.
    pub specs: Vec<TechnicalSpec>,
}

impl ProductRecord {
    pub fn new(fields: Record) -> Self {
        Self {
            fields,
            media: Vec::new(),
            specs: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_sql_value_render() {
        assert_eq!(SqlValue::Null.render(), "");
        assert_eq!(SqlValue::Int(42).render(), "42");
        assert_eq!(SqlValue::Float(1.5).render(), "1.5");
        assert_eq!(SqlValue::from("0012345").render(), "0012345");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(SqlValue::Date(date).render(), "2024-03-09");
        let dt = date.and_hms_opt(8, 5, 0).expect("valid time");
        assert_eq!(SqlValue::DateTime(dt).render(), "2024-03-09 08:05:00");
    }

    #[test]
    fn test_sql_value_numeric_views() {
        assert_eq!(SqlValue::from("12.50").as_f64(), Some(12.5));
        assert_eq!(SqlValue::from(" 7 ").as_i64(), Some(7));
        assert_eq!(SqlValue::UInt(9).as_i64(), Some(9));
        assert_eq!(SqlValue::Null.as_f64(), None);
        assert!(SqlValue::from("   ").is_blank());
        assert!(!SqlValue::Int(0).is_blank());
    }

    #[test]
    fn test_record_lookup_by_name() {
        let record = Record::new().with("ean", "3664436019363").with("idproduit", 7i64);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("idproduit"), Some(&SqlValue::Int(7)));
        assert_eq!(record.value_at(0), Some(&SqlValue::from("3664436019363")));
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn test_spec_field_classification() {
        assert_eq!(SpecField::classify("Capacité"), Some(SpecField::Capacity));
        assert_eq!(SpecField::classify("Contenance"), Some(SpecField::Capacity));
        assert_eq!(
            SpecField::classify("DLC (Date limite de consommation)"),
            Some(SpecField::ExpirationDate)
        );
        assert_eq!(
            SpecField::classify("Date de durabilité minimale"),
            Some(SpecField::DurabilityDate)
        );
        assert_eq!(SpecField::classify("Ingrédients"), Some(SpecField::Ingredients));
        assert_eq!(SpecField::classify("Ingredients"), Some(SpecField::Ingredients));
        assert_eq!(SpecField::classify("Couleur"), None);
        assert_eq!(SpecField::iter().count(), 4);
    }

    #[test]
    fn test_sql_value_json() {
        assert_eq!(SqlValue::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(SqlValue::from("a").to_json(), serde_json::json!("a"));
        assert_eq!(SqlValue::Float(f64::NAN).to_json(), serde_json::Value::Null);
    }
}
