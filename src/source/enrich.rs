//! Attaches gallery URLs and technical specifications to a fetched page.

use std::collections::HashMap;

use log::debug;

use crate::error_handling::SourceError;
use crate::models::{ProductRecord, SpecField, TechnicalSpec};
use crate::query::{gallery_queries, specs_queries};
use crate::storage::QueryExecutor;

/// Product-group id of a row, when it has one.
pub(crate) fn group_id(record: &ProductRecord) -> Option<i64> {
    record
        .get("idproduit_group")
        .and_then(|v| v.as_i64())
        .filter(|id| *id > 0)
}

/// Runs the gallery and specification lookups for the whole page.
pub(crate) async fn enrich_page(
    executor: &mut dyn QueryExecutor,
    page: &mut [ProductRecord],
    media_base_url: &str,
) -> Result<(), SourceError> {
    let mut group_ids: Vec<i64> = page.iter().filter_map(group_id).collect();
    group_ids.sort_unstable();
    group_ids.dedup();
    if group_ids.is_empty() {
        return Ok(());
    }

    let mut gallery = Vec::new();
    for query in gallery_queries(&group_ids) {
        gallery.extend(executor.fetch_all(&query).await?);
    }
    let mut media: HashMap<i64, Vec<String>> = HashMap::new();
    for row in gallery {
        let Some(group) = row.get("group_id").and_then(|v| v.as_i64()) else {
            continue;
        };
        let image = row.get("idimage").map(|v| v.render()).unwrap_or_default();
        if image.trim().is_empty() {
            continue;
        }
        let ext = row.get("ext").map(|v| v.render()).unwrap_or_default();
        media
            .entry(group)
            .or_default()
            .push(media_url(media_base_url, image.trim(), ext.trim()));
    }

    let mut characteristics = Vec::new();
    for query in specs_queries(&group_ids) {
        characteristics.extend(executor.fetch_all(&query).await?);
    }
    let mut specs: HashMap<i64, Vec<TechnicalSpec>> = HashMap::new();
    for row in characteristics {
        let Some(group) = row.get("group_id").and_then(|v| v.as_i64()) else {
            continue;
        };
        let label = row.get("label").map(|v| v.render()).unwrap_or_default();
        let Some(field) = SpecField::classify(&label) else {
            continue;
        };
        let value = row.get("value").map(|v| v.render()).unwrap_or_default();
        if value.trim().is_empty() {
            continue;
        }
        specs.entry(group).or_default().push(TechnicalSpec {
            field,
            language: row
                .get("language")
                .map(|v| v.render().trim().to_lowercase())
                .unwrap_or_default(),
            value: value.trim().to_string(),
        });
    }

    debug!(
        "Enriched {} groups: {} with images, {} with specifications",
        group_ids.len(),
        media.len(),
        specs.len()
    );

    for record in page.iter_mut() {
        if let Some(group) = group_id(record) {
            if let Some(urls) = media.get(&group) {
                record.media = urls.clone();
            }
            if let Some(values) = specs.get(&group) {
                record.specs = values.clone();
            }
        }
    }
    Ok(())
}

/// `<base><idimage>.<ext>`; the extension is omitted when the row has none.
pub(crate) fn media_url(base: &str, image: &str, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    if ext.is_empty() {
        format!("{base}{image}")
    } else {
        format!("{base}{image}.{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url() {
        assert_eq!(
            media_url("https://cdn.example/i/", "123", "jpg"),
            "https://cdn.example/i/123.jpg"
        );
        assert_eq!(media_url("b/", "9", ".png"), "b/9.png");
        assert_eq!(media_url("b/", "9", ""), "b/9");
    }
}
