//! Forward-only paginated cursor over the filtered product set.

use std::collections::HashSet;

use async_trait::async_trait;
use log::{debug, info};

use crate::config::BIND_LIST_CHUNK;
use crate::error_handling::SourceError;
use crate::models::{ProductRecord, Record};
use crate::query::QuerySpec;
use crate::storage::QueryExecutor;

use super::enrich::enrich_page;

/// A lazily fetched, finite sequence of pages.
#[async_trait]
pub trait PageSource: Send {
    /// Number of rows the source expects to yield, when known.
    fn expected_rows(&self) -> Option<u64>;

    /// The next page in order; an empty page means the sequence is exhausted.
    async fn next_page(&mut self) -> Result<Vec<ProductRecord>, SourceError>;
}

/// Offset-paginated cursor bound to one executor.
///
/// `open` runs the count query; every `next_page` is one page query (plus the
/// batched auxiliary lookups for the comprehensive layout). Not restartable.
///
/// When the spec [resolves ids](QuerySpec::resolves_ids), `open` collects the
/// sorted ids of the matching products instead and pages walk that list.
pub struct RowCursor<'a> {
    executor: &'a mut dyn QueryExecutor,
    spec: QuerySpec,
    ids: Option<Vec<i64>>,
    target: u64,
    fetched: u64,
    page_calls: u64,
    exhausted: bool,
}

impl<'a> RowCursor<'a> {
    pub async fn open(
        executor: &'a mut dyn QueryExecutor,
        spec: QuerySpec,
    ) -> Result<RowCursor<'a>, SourceError> {
        let (total, ids) = if spec.resolves_ids() {
            let ids = resolve_ids(&mut *executor, &spec).await?;
            (ids.len() as u64, Some(ids))
        } else {
            (executor.fetch_count(&spec.count_query()).await?, None)
        };
        let target = match spec.max_rows {
            Some(cap) => total.min(cap),
            None => total,
        };
        info!(
            "{total} matching products, exporting {target} in pages of {}",
            spec.page_size
        );
        Ok(RowCursor {
            executor,
            spec,
            ids,
            target,
            fetched: 0,
            page_calls: 0,
            exhausted: target == 0,
        })
    }

    /// Rows returned so far.
    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    /// Page queries issued so far.
    pub fn page_calls(&self) -> u64 {
        self.page_calls
    }
}

#[async_trait]
impl PageSource for RowCursor<'_> {
    fn expected_rows(&self) -> Option<u64> {
        Some(self.target)
    }

    async fn next_page(&mut self) -> Result<Vec<ProductRecord>, SourceError> {
        if self.exhausted || self.fetched >= self.target {
            self.exhausted = true;
            return Ok(Vec::new());
        }

        let page_size = self.spec.page_size.max(1);
        let request = page_size.min(self.target - self.fetched);
        let rows = match &self.ids {
            Some(ids) => {
                let start = self.fetched as usize;
                let end = start + request as usize;
                let mut rows = Vec::with_capacity(end - start);
                for chunk in ids[start..end].chunks(BIND_LIST_CHUNK) {
                    let query = self.spec.ids_page_query(chunk);
                    rows.extend(self.executor.fetch_all(&query).await?);
                }
                rows
            }
            None => {
                let query = self.spec.page_query(self.fetched, request);
                self.executor.fetch_all(&query).await?
            }
        };
        self.page_calls += 1;

        let returned = rows.len() as u64;
        // A short page means the source ran out before the counted total.
        if returned < request {
            self.exhausted = true;
        }
        self.fetched += returned;
        debug!(
            "Page {} returned {returned} rows (offset {}, requested {request})",
            self.page_calls,
            self.fetched - returned
        );

        let mut page: Vec<ProductRecord> = rows.into_iter().map(ProductRecord::new).collect();
        if self.spec.joins_auxiliary() && !page.is_empty() {
            enrich_page(&mut *self.executor, &mut page, &self.spec.media_base_url).await?;
        }
        Ok(page)
    }
}

fn product_id(row: &Record) -> Option<i64> {
    row.get("idproduit").and_then(|v| v.as_i64())
}

/// Sorted, distinct ids of the products matching the EAN list.
///
/// Exact matches are looked up chunk by chunk. With partial matching, every
/// code that matched nothing exactly is then looked up as a substring.
async fn resolve_ids(
    executor: &mut dyn QueryExecutor,
    spec: &QuerySpec,
) -> Result<Vec<i64>, SourceError> {
    let mut ids = Vec::new();
    let mut matched: HashSet<String> = HashSet::new();
    for query in spec.exact_match_queries() {
        for row in executor.fetch_all(&query).await? {
            if let Some(ean) = row.get("ean") {
                matched.insert(ean.render().trim().to_string());
            }
            ids.extend(product_id(&row));
        }
    }

    if spec.partial_match {
        for code in spec.ean_values().unwrap_or_default() {
            if matched.contains(code.as_str()) {
                continue;
            }
            let rows = executor.fetch_all(&spec.partial_match_query(code)).await?;
            debug!("EAN {code}: {} partial match(es)", rows.len());
            ids.extend(rows.iter().filter_map(product_id));
        }
    }

    ids.sort_unstable();
    ids.dedup();
    debug!(
        "Resolved {} product ids ({} codes matched exactly)",
        ids.len(),
        matched.len()
    );
    Ok(ids)
}
