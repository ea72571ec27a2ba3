//! Shared row flattening logic.
//!
//! Both sinks receive rows already flattened against an [`OutputSchema`]: one
//! value per column, in schema order, never NULL.

use crate::models::{ProductRecord, SpecField, SqlValue};

use super::schema::{ColumnDef, ColumnSource, Derivation, OutputSchema};
use super::text::{clean_html, extract_capacity, normalize_ingredients};

const UNKNOWN_BRAND: &str = "Marque inconnue";

/// Maps product records onto the columns of one schema.
#[derive(Debug, Clone)]
pub struct RowMapper<'a> {
    schema: &'a OutputSchema,
    languages: &'a [String],
}

impl<'a> RowMapper<'a> {
    /// `languages` is the technical-specification priority, most preferred first.
    pub fn new(schema: &'a OutputSchema, languages: &'a [String]) -> Self {
        Self { schema, languages }
    }

    pub fn schema(&self) -> &OutputSchema {
        self.schema
    }

    /// One value per schema column, in schema order.
    pub fn flatten(&self, record: &ProductRecord) -> Vec<SqlValue> {
        self.schema
            .columns()
            .iter()
            .map(|column| self.value(column, record))
            .collect()
    }

    fn value(&self, column: &ColumnDef, record: &ProductRecord) -> SqlValue {
        let value = match column.source {
            ColumnSource::Field(name) => record.get(name).cloned(),
            ColumnSource::HtmlField(name) => record
                .get(name)
                .map(|v| SqlValue::Text(clean_html(&v.render()))),
            ColumnSource::Media(slot) => record.media.get(slot).cloned().map(SqlValue::Text),
            ColumnSource::Spec(field) => self.resolve_spec(record, field).map(SqlValue::Text),
            ColumnSource::Derived(derivation) => derive(derivation, record, self),
            ColumnSource::Constant(text) => Some(SqlValue::from(text)),
        };
        match value {
            Some(v) if !v.is_blank() => v,
            _ => SqlValue::from(column.default),
        }
    }

    /// Value of a technical specification for the preferred language.
    ///
    /// Languages are tried in priority order, then any other language in source
    /// order. Ingredient texts that are too short are skipped.
    pub fn resolve_spec(&self, record: &ProductRecord, field: SpecField) -> Option<String> {
        let candidates: Vec<(&str, String)> = record
            .specs
            .iter()
            .filter(|spec| spec.field == field)
            .filter_map(|spec| {
                let value = match field {
                    SpecField::Ingredients => normalize_ingredients(&spec.value)?,
                    _ => spec.value.trim().to_string(),
                };
                (!value.is_empty()).then_some((spec.language.as_str(), value))
            })
            .collect();

        for language in self.languages {
            if let Some((_, value)) = candidates
                .iter()
                .find(|(lang, _)| lang.eq_ignore_ascii_case(language))
            {
                return Some(value.clone());
            }
        }
        candidates.into_iter().next().map(|(_, value)| value)
    }
}

fn text_of(record: &ProductRecord, name: &str) -> Option<String> {
    record
        .get(name)
        .filter(|v| !v.is_blank())
        .map(|v| v.render().trim().to_string())
}

fn derive(derivation: Derivation, record: &ProductRecord, mapper: &RowMapper<'_>) -> Option<SqlValue> {
    let value: SqlValue = match derivation {
        Derivation::Title => text_of(record, "group_name")
            .or_else(|| text_of(record, "keywords"))
            .or_else(|| text_of(record, "desc_fastmag"))
            .unwrap_or_else(|| {
                let id = record.get("idproduit").map(|v| v.render()).unwrap_or_default();
                format!("Produit {id}")
            })
            .into(),
        Derivation::Brand => text_of(record, "brand_name")
            .unwrap_or_else(|| UNKNOWN_BRAND.to_string())
            .into(),
        Derivation::Description => clean_html(&description_source(record)).into(),
        Derivation::IsParent => {
            let grouped = record
                .get("idproduit_group")
                .and_then(|v| v.as_i64())
                .is_some_and(|id| id > 0);
            SqlValue::from(if grouped { "Oui" } else { "Non" })
        }
        Derivation::ProductKind => {
            let virtual_product = text_of(record, "virtuel")
                .is_some_and(|v| v.eq_ignore_ascii_case("oui"));
            SqlValue::from(if virtual_product { "Service" } else { "Produit" })
        }
        Derivation::NetWeight => {
            let weight = record.get("poids")?;
            if weight.as_f64().is_some_and(|w| w > 0.0) {
                weight.clone()
            } else {
                return None;
            }
        }
        Derivation::PackageWeight => match record.get("poids") {
            Some(weight) if !weight.is_blank() => weight.clone(),
            _ => SqlValue::Int(0),
        },
        Derivation::Capacity => mapper
            .resolve_spec(record, SpecField::Capacity)
            .or_else(|| text_of(record, "group_name").and_then(|name| extract_capacity(&name)))
            .or_else(|| extract_capacity(&clean_html(&description_source(record))))?
            .into(),
    };
    Some(value)
}

/// Group description when present, product description otherwise.
fn description_source(record: &ProductRecord) -> String {
    text_of(record, "group_description")
        .or_else(|| text_of(record, "description_fr"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Record, TechnicalSpec};

    fn languages() -> Vec<String> {
        vec!["fr".to_string(), "en".to_string()]
    }

    fn spec(field: SpecField, language: &str, value: &str) -> TechnicalSpec {
        TechnicalSpec {
            field,
            language: language.to_string(),
            value: value.to_string(),
        }
    }

    fn product() -> ProductRecord {
        ProductRecord::new(
            Record::new()
                .with("idproduit", 42i64)
                .with("idproduit_group", 7i64)
                .with("ref", "SKU-42")
                .with("ean", "3664436019363")
                .with("keywords", "")
                .with("desc_fastmag", "Fastmag label")
                .with("description_fr", "<p>Product text</p>")
                .with("poids", 0.35)
                .with("virtuel", "non")
                .with("variant_group_code", SqlValue::Null)
                .with("group_name", "Sérum éclat 30ml")
                .with("group_description", "<p>Un sérum <b>léger</b>.</p>")
                .with("brand_name", SqlValue::Null),
        )
    }

    fn value_of(schema: &OutputSchema, row: &[SqlValue], key: &str) -> String {
        let index = schema.keys().position(|k| k == key).unwrap();
        row[index].render()
    }

    #[test]
    fn test_every_row_matches_schema_width() {
        let langs = languages();
        for schema in [OutputSchema::standard(), OutputSchema::comprehensive()] {
            let mapper = RowMapper::new(&schema, &langs);
            let row = mapper.flatten(&ProductRecord::default());
            assert_eq!(row.len(), schema.len());
            assert!(row.iter().all(|v| !v.is_null()));
        }
    }

    #[test]
    fn test_comprehensive_derivations() {
        let schema = OutputSchema::comprehensive();
        let langs = languages();
        let mapper = RowMapper::new(&schema, &langs);
        let row = mapper.flatten(&product());

        assert_eq!(value_of(&schema, &row, "shop_sku"), "SKU-42");
        assert_eq!(value_of(&schema, &row, "name"), "Sérum éclat 30ml");
        assert_eq!(value_of(&schema, &row, "brand_id"), "Marque inconnue");
        assert_eq!(value_of(&schema, &row, "description"), "Un sérum léger.");
        assert_eq!(value_of(&schema, &row, "is_parent"), "Oui");
        assert_eq!(value_of(&schema, &row, "variant_group_code"), "");
        assert_eq!(value_of(&schema, &row, "technical_spec_1_capacity"), "30 ml");
        assert_eq!(value_of(&schema, &row, "technical_spec_1_net_weight"), "0.35");
        assert_eq!(value_of(&schema, &row, "is_virtual"), "Produit");
        assert_eq!(value_of(&schema, &row, "weight"), "0.35");
        assert_eq!(value_of(&schema, &row, "size_id"), "Taille Unique");
        assert_eq!(value_of(&schema, &row, "is_cloth"), "Non");
    }

    #[test]
    fn test_title_falls_back_to_product_id() {
        let schema = OutputSchema::comprehensive();
        let langs = languages();
        let mapper = RowMapper::new(&schema, &langs);
        let record = ProductRecord::new(Record::new().with("idproduit", 9i64));
        let row = mapper.flatten(&record);
        assert_eq!(value_of(&schema, &row, "name"), "Produit 9");
        assert_eq!(value_of(&schema, &row, "is_parent"), "Non");
        assert_eq!(value_of(&schema, &row, "weight"), "0");
        assert_eq!(value_of(&schema, &row, "technical_spec_1_net_weight"), "");
    }

    #[test]
    fn test_media_truncated_to_ten_slots() {
        let schema = OutputSchema::comprehensive();
        let langs = languages();
        let mapper = RowMapper::new(&schema, &langs);
        let mut record = product();
        record.media = (1..=14).map(|i| format!("https://cdn/{i}.jpg")).collect();

        let row = mapper.flatten(&record);
        for i in 1..=10 {
            assert_eq!(
                value_of(&schema, &row, &format!("media_{i}")),
                format!("https://cdn/{i}.jpg")
            );
        }
        assert!(!row.iter().any(|v| v.render() == "https://cdn/11.jpg"));
    }

    #[test]
    fn test_fewer_images_leave_empty_slots() {
        let schema = OutputSchema::comprehensive();
        let langs = languages();
        let mapper = RowMapper::new(&schema, &langs);
        let mut record = product();
        record.media = vec!["a.jpg".into(), "b.jpg".into()];
        let row = mapper.flatten(&record);
        assert_eq!(value_of(&schema, &row, "media_2"), "b.jpg");
        assert_eq!(value_of(&schema, &row, "media_3"), "");
        assert_eq!(value_of(&schema, &row, "media_10"), "");
    }

    #[test]
    fn test_spec_language_priority() {
        let schema = OutputSchema::comprehensive();
        let langs = languages();
        let mapper = RowMapper::new(&schema, &langs);
        let mut record = product();
        record.specs = vec![
            spec(SpecField::ExpirationDate, "de", "3 Monate"),
            spec(SpecField::ExpirationDate, "en", "3 months"),
            spec(SpecField::ExpirationDate, "fr", "3 mois"),
            spec(SpecField::DurabilityDate, "en", "12 months"),
            spec(SpecField::Capacity, "it", "75 cl"),
        ];

        assert_eq!(
            mapper.resolve_spec(&record, SpecField::ExpirationDate).as_deref(),
            Some("3 mois")
        );
        assert_eq!(
            mapper.resolve_spec(&record, SpecField::DurabilityDate).as_deref(),
            Some("12 months")
        );
        // Only another language has it
        assert_eq!(
            mapper.resolve_spec(&record, SpecField::Capacity).as_deref(),
            Some("75 cl")
        );

        let english_first = vec!["en".to_string()];
        let mapper = RowMapper::new(&schema, &english_first);
        assert_eq!(
            mapper.resolve_spec(&record, SpecField::ExpirationDate).as_deref(),
            Some("3 months")
        );
    }

    #[test]
    fn test_missing_spec_in_every_language_is_empty() {
        let schema = OutputSchema::comprehensive();
        let langs = languages();
        let mapper = RowMapper::new(&schema, &langs);
        let mut record = product();
        record.specs = vec![spec(SpecField::Ingredients, "fr", "Aqua")];
        let row = mapper.flatten(&record);
        assert_eq!(value_of(&schema, &row, "technical_spec_1_expiration_date"), "");
        assert_eq!(value_of(&schema, &row, "technical_spec_1_durability_date"), "");
        // Too short to be an ingredient list
        assert_eq!(value_of(&schema, &row, "technical_spec_1_ingredients"), "");
    }

    #[test]
    fn test_standard_layout_keeps_types_and_cleans_descriptions() {
        let schema = OutputSchema::standard();
        let langs = languages();
        let mapper = RowMapper::new(&schema, &langs);
        let row = mapper.flatten(&product());
        assert_eq!(row[0], SqlValue::Int(42));
        assert_eq!(value_of(&schema, &row, "description_fr"), "Product text");
        assert_eq!(value_of(&schema, &row, "ean"), "3664436019363");
        assert_eq!(value_of(&schema, &row, "date_fin"), "");
    }
}
