//! Query specifications for the product export.
//!
//! A [`QuerySpec`] is pure data: the layout decides the select list and joins,
//! the [`ProductFilter`] decides the predicate. Every export preset is one value
//! of this type.

use crate::config::{
    ACTIVE_STATUS, BIND_LIST_CHUNK, BRANDS_TABLE, CHARACTERISTICS_TABLE, DEFAULT_MEDIA_BASE_URL, DEFAULT_PAGE_SIZE,
    DICTIONARY_TABLE, GALLERY_TABLE, GROUP_CHARACTERISTICS_TABLE, LIKE_ESCAPE, PRODUCTS_TABLE,
    PRODUCT_GROUPS_TABLE,
};
use crate::export::{Layout, STANDARD_COLUMNS};

use super::builder::{BuiltQuery, SqlBuilder};

/// Which products to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Every product.
    All,
    /// Products with a non-empty EAN.
    WithEan,
    /// Products whose EAN is one of the given values.
    EanIn(Vec<String>),
}

/// Columns the comprehensive layout reads, as aliased in its select list.
const COMPREHENSIVE_SELECT: &str = "SELECT p.idproduit, p.idproduit_group, p.ref, p.ean, \
p.keywords, p.desc_fastmag, p.description_fr, p.poids, p.virtuel, p.variant_group_code, \
pg.nom_fr AS group_name, pg.description_fr AS group_description, pm.marque_fr AS brand_name";

/// A table and the columns a query shape references in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequirement {
    pub table: &'static str,
    pub columns: Vec<&'static str>,
}

impl TableRequirement {
    fn new(table: &'static str, columns: &[&'static str]) -> Self {
        Self {
            table,
            columns: columns.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub layout: Layout,
    pub filter: ProductFilter,
    /// Restrict to rows whose `status` is active.
    pub active_only: bool,
    /// For an EAN filter, codes without an exact match also match any EAN
    /// containing them.
    pub partial_match: bool,
    pub page_size: u64,
    /// Stop after this many rows (sample exports).
    pub max_rows: Option<u64>,
    /// Prefix for gallery image URLs (comprehensive layout).
    pub media_base_url: String,
}

impl QuerySpec {
    pub fn new(layout: Layout, filter: ProductFilter) -> Self {
        Self {
            layout,
            filter,
            active_only: true,
            partial_match: false,
            page_size: DEFAULT_PAGE_SIZE,
            max_rows: None,
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_rows(mut self, max_rows: Option<u64>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    pub fn with_partial_match(mut self, partial_match: bool) -> Self {
        self.partial_match = partial_match;
        self
    }

    pub fn with_media_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.media_base_url = base_url.into();
        self
    }

    /// Whether pages need the gallery and technical-specification lookups.
    pub fn joins_auxiliary(&self) -> bool {
        self.layout == Layout::Comprehensive
    }

    /// EAN values of an [`ProductFilter::EanIn`] filter.
    pub fn ean_values(&self) -> Option<&[String]> {
        match &self.filter {
            ProductFilter::EanIn(values) => Some(values),
            _ => None,
        }
    }

    /// Whether the matching product ids are resolved when the cursor opens,
    /// instead of repeating the EAN list in every page query.
    ///
    /// True for partial matching and for lists longer than [`BIND_LIST_CHUNK`].
    pub fn resolves_ids(&self) -> bool {
        match &self.filter {
            ProductFilter::EanIn(values) => self.partial_match || values.len() > BIND_LIST_CHUNK,
            _ => false,
        }
    }

    /// Ids and EANs of the products whose EAN equals one of the codes, one
    /// statement per chunk of the list.
    pub fn exact_match_queries(&self) -> Vec<BuiltQuery> {
        self.ean_values()
            .unwrap_or_default()
            .chunks(BIND_LIST_CHUNK)
            .map(|chunk| {
                let mut builder = SqlBuilder::new(format!(
                    "SELECT p.idproduit, p.ean FROM {PRODUCTS_TABLE} p"
                ));
                let keyword = self.push_status(&mut builder);
                builder.push(keyword);
                builder.push("p.ean IN ");
                builder.push_bind_list(chunk.iter().map(|v| v.as_str()));
                builder.build()
            })
            .collect()
    }

    /// Ids and EANs of the products whose trimmed EAN contains `code`.
    pub fn partial_match_query(&self, code: &str) -> BuiltQuery {
        let mut builder =
            SqlBuilder::new(format!("SELECT p.idproduit, p.ean FROM {PRODUCTS_TABLE} p"));
        let keyword = self.push_status(&mut builder);
        builder.push(keyword);
        builder.push("TRIM(p.ean) LIKE ");
        builder.push_bind(contains_pattern(code).as_str());
        builder.push(&format!(" ESCAPE '{LIKE_ESCAPE}'"));
        builder.build()
    }

    /// The rows of the given product ids, in id order.
    ///
    /// The ids were filtered when they were resolved, so no other predicate applies.
    pub fn ids_page_query(&self, ids: &[i64]) -> BuiltQuery {
        let mut builder = SqlBuilder::new(self.select_clause());
        builder.push(" WHERE p.idproduit IN ");
        builder.push_bind_list(ids.iter().copied());
        builder.push(" ORDER BY p.idproduit");
        builder.build()
    }

    /// `SELECT COUNT(*)` over the filtered product set.
    pub fn count_query(&self) -> BuiltQuery {
        let mut builder =
            SqlBuilder::new(format!("SELECT COUNT(*) AS total FROM {PRODUCTS_TABLE} p"));
        self.push_where(&mut builder);
        builder.build()
    }

    /// One page of the filtered product set, in a stable order.
    pub fn page_query(&self, offset: u64, limit: u64) -> BuiltQuery {
        let mut builder = SqlBuilder::new(self.select_clause());
        self.push_where(&mut builder);
        builder.push(" ORDER BY p.idproduit LIMIT ");
        builder.push_bind(to_param(limit));
        builder.push(" OFFSET ");
        builder.push_bind(to_param(offset));
        builder.build()
    }

    fn select_clause(&self) -> String {
        match self.layout {
            Layout::Standard => {
                let columns: Vec<String> =
                    STANDARD_COLUMNS.iter().map(|c| format!("p.{c}")).collect();
                format!("SELECT {} FROM {PRODUCTS_TABLE} p", columns.join(", "))
            }
            Layout::Comprehensive => format!(
                "{COMPREHENSIVE_SELECT} FROM {PRODUCTS_TABLE} p \
                 LEFT JOIN {PRODUCT_GROUPS_TABLE} pg ON p.idproduit_group = pg.idproduit_group \
                 LEFT JOIN {BRANDS_TABLE} pm ON pg.idmarque = pm.idmarque"
            ),
        }
    }

    /// Pushes the status predicate when active rows only are wanted and
    /// returns the keyword the next predicate starts with.
    fn push_status(&self, builder: &mut SqlBuilder) -> &'static str {
        if self.active_only {
            builder.push(&format!(" WHERE p.status = '{ACTIVE_STATUS}'"));
            " AND "
        } else {
            " WHERE "
        }
    }

    fn push_where(&self, builder: &mut SqlBuilder) {
        let keyword = self.push_status(builder);
        match &self.filter {
            ProductFilter::All => {}
            ProductFilter::WithEan => {
                builder.push(keyword);
                builder.push("p.ean IS NOT NULL AND TRIM(p.ean) <> ''");
            }
            ProductFilter::EanIn(values) => {
                builder.push(keyword);
                builder.push("p.ean IN ");
                builder.push_bind_list(values.iter().map(|v| v.as_str()));
            }
        }
    }

    /// Tables and columns this query shape references, for the startup schema check.
    pub fn requirements(&self) -> Vec<TableRequirement> {
        match self.layout {
            Layout::Standard => vec![TableRequirement::new(PRODUCTS_TABLE, &STANDARD_COLUMNS)],
            Layout::Comprehensive => vec![
                TableRequirement::new(
                    PRODUCTS_TABLE,
                    &[
                        "idproduit",
                        "idproduit_group",
                        "ref",
                        "ean",
                        "keywords",
                        "desc_fastmag",
                        "description_fr",
                        "poids",
                        "virtuel",
                        "variant_group_code",
                        "status",
                    ],
                ),
                TableRequirement::new(
                    PRODUCT_GROUPS_TABLE,
                    &["idproduit_group", "nom_fr", "description_fr", "idmarque"],
                ),
                TableRequirement::new(BRANDS_TABLE, &["idmarque", "marque_fr"]),
                TableRequirement::new(
                    GALLERY_TABLE,
                    &["idproduit_group", "idimage", "ext", "position", "status"],
                ),
                TableRequirement::new(
                    GROUP_CHARACTERISTICS_TABLE,
                    &["idproduit_group", "idcaracteristique", "position", "status"],
                ),
                TableRequirement::new(
                    CHARACTERISTICS_TABLE,
                    &[
                        "idcaracteristique",
                        "iddictionnaire_cle",
                        "iddictionnaire_valeur",
                        "status",
                    ],
                ),
                TableRequirement::new(DICTIONARY_TABLE, &["iddictionnaire", "idlangue", "valeur"]),
            ],
        }
    }
}

/// `%code%` with the `LIKE` wildcards of `code` escaped.
fn contains_pattern(code: &str) -> String {
    let mut pattern = String::with_capacity(code.len() + 2);
    pattern.push('%');
    for c in code.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn to_param(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
