//! Configuration constants.
//!
//! This module contains the defaults used by the export presets and the
//! source-schema names the queries are built from.

/// Default number of rows fetched per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10_000;

/// Page size of the full-catalogue presets.
pub const FULL_EXPORT_PAGE_SIZE: u64 = 50_000;

/// Page size and row cap of the sample presets.
pub const SAMPLE_PAGE_SIZE: u64 = 5_000;
pub const SAMPLE_ROW_LIMIT: u64 = 10_000;

/// Most values bound into one `IN (...)` list.
///
/// Longer EAN lists and group-id sets are split into statements of at most this
/// many placeholders, well under SQLite's 32,766 and MySQL's 65,535.
pub const BIND_LIST_CHUNK: usize = 1_000;

/// Escape character of the `LIKE` patterns built from user input.
pub const LIKE_ESCAPE: char = '!';

/// Default MySQL port when `DB_PORT` is unset.
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Number of sample products shown by `analyze`.
pub const ANALYZE_SAMPLE_ROWS: u64 = 3;

/// Number of numbered image-URL columns in the comprehensive layout.
pub const MEDIA_SLOTS: usize = 10;

/// Base URL gallery image identifiers are appended to.
pub const DEFAULT_MEDIA_BASE_URL: &str = "https://cdn.bazarchic.com/i/tmp/";

/// Default technical-specification language priority.
pub const DEFAULT_LANGUAGES: &str = "fr,en";

/// Ingredient texts of this many characters or fewer are ignored.
pub const INGREDIENTS_MIN_CHARS: usize = 20;

/// Ingredient texts are cut at this many characters and suffixed with `...`.
pub const INGREDIENTS_MAX_CHARS: usize = 800;

// Source tables
pub const PRODUCTS_TABLE: &str = "produits";
pub const PRODUCT_GROUPS_TABLE: &str = "produits_group";
pub const BRANDS_TABLE: &str = "produits_marque";
pub const GALLERY_TABLE: &str = "produits_gallery";
pub const GROUP_CHARACTERISTICS_TABLE: &str = "produits_group_caracteristiques";
pub const CHARACTERISTICS_TABLE: &str = "caracteristiques";
pub const DICTIONARY_TABLE: &str = "dictionnaires_langues";

/// Value of the `status` columns for active rows.
pub const ACTIVE_STATUS: &str = "on";

// Default output file prefixes
pub const PREFIX_ALL: &str = "all_products";
pub const PREFIX_SAMPLE: &str = "sample_products";
pub const PREFIX_EAN_SEARCH: &str = "ean_search_results";
pub const PREFIX_COMPREHENSIVE: &str = "comprehensive_products";
pub const PREFIX_COMPREHENSIVE_SAMPLE: &str = "comprehensive_sample_products";
pub const PREFIX_COMPREHENSIVE_EAN: &str = "comprehensive_ean_products";
