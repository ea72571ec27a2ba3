//! Export presets.
//!
//! Each export command resolves to an [`ExportJob`]: the query shape to run and
//! the options the rows are written with. Everything here is validated before a
//! connection is attempted.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::config::{
    parse_languages, ExportArgs, DEFAULT_PAGE_SIZE, FULL_EXPORT_PAGE_SIZE, PREFIX_ALL,
    PREFIX_COMPREHENSIVE, PREFIX_COMPREHENSIVE_EAN, PREFIX_COMPREHENSIVE_SAMPLE,
    PREFIX_EAN_SEARCH, PREFIX_SAMPLE, SAMPLE_PAGE_SIZE, SAMPLE_ROW_LIMIT,
};
use crate::error_handling::ConfigError;
use crate::export::{ExportFormat, ExportOptions, Layout, RequestedEans};
use crate::query::{ProductFilter, QuerySpec};

/// Paging defaults and output-name prefixes of one command.
#[derive(Debug, Clone, Copy)]
struct Preset {
    page_size: u64,
    max_rows: Option<u64>,
    standard_prefix: &'static str,
    comprehensive_prefix: &'static str,
}

impl Preset {
    fn prefix(&self, layout: Layout) -> &'static str {
        match layout {
            Layout::Standard => self.standard_prefix,
            Layout::Comprehensive => self.comprehensive_prefix,
        }
    }
}

/// A fully resolved export: what to fetch and where to write it.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub spec: QuerySpec,
    pub options: ExportOptions,
}

impl ExportJob {
    /// `export`: every active product, or only those with a non-empty EAN.
    pub fn full(with_ean: bool, args: &ExportArgs, now: DateTime<Local>) -> Result<Self, ConfigError> {
        let filter = if with_ean {
            ProductFilter::WithEan
        } else {
            ProductFilter::All
        };
        // Comprehensive pages also drive two lookups keyed by the page's groups.
        let page_size = match args.layout {
            Layout::Standard => FULL_EXPORT_PAGE_SIZE,
            Layout::Comprehensive => DEFAULT_PAGE_SIZE,
        };
        let preset = Preset {
            page_size,
            max_rows: None,
            standard_prefix: PREFIX_ALL,
            comprehensive_prefix: PREFIX_COMPREHENSIVE,
        };
        Self::resolve(filter, preset, args, now)
    }

    /// `sample`: the first 10,000 active products unless `--limit` says otherwise.
    pub fn sample(args: &ExportArgs, now: DateTime<Local>) -> Result<Self, ConfigError> {
        let preset = Preset {
            page_size: SAMPLE_PAGE_SIZE,
            max_rows: Some(SAMPLE_ROW_LIMIT),
            standard_prefix: PREFIX_SAMPLE,
            comprehensive_prefix: PREFIX_COMPREHENSIVE_SAMPLE,
        };
        Self::resolve(ProductFilter::All, preset, args, now)
    }

    /// `search`: the products whose EAN is one of `eans`.
    ///
    /// The standard layout matches inactive products too; the comprehensive
    /// layout keeps to active ones.
    pub fn search(
        eans: Vec<String>,
        partial_match: bool,
        args: &ExportArgs,
        now: DateTime<Local>,
    ) -> Result<Self, ConfigError> {
        if eans.is_empty() {
            return Err(ConfigError::NoEanCodes);
        }
        let preset = Preset {
            page_size: DEFAULT_PAGE_SIZE,
            max_rows: None,
            standard_prefix: PREFIX_EAN_SEARCH,
            comprehensive_prefix: PREFIX_COMPREHENSIVE_EAN,
        };
        let mut job = Self::resolve(ProductFilter::EanIn(eans), preset, args, now)?;
        job.spec = job
            .spec
            .with_active_only(args.layout == Layout::Comprehensive)
            .with_partial_match(partial_match);
        Ok(job)
    }

    fn resolve(
        filter: ProductFilter,
        preset: Preset,
        args: &ExportArgs,
        now: DateTime<Local>,
    ) -> Result<Self, ConfigError> {
        let page_size = args.page_size.unwrap_or(preset.page_size);
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        let languages = parse_languages(&args.languages);
        if languages.is_empty() {
            return Err(ConfigError::InvalidVar {
                name: "EXPORT_LANGUAGES",
                value: args.languages.clone(),
                reason: "expected at least one language code".to_string(),
            });
        }

        let output = args.output.clone().unwrap_or_else(|| {
            default_output_name(preset.prefix(args.layout), args.format, now)
        });

        let spec = QuerySpec::new(args.layout, filter)
            .with_page_size(page_size)
            .with_max_rows(args.limit.or(preset.max_rows))
            .with_media_base_url(args.media_base_url.as_str());

        let mut options = ExportOptions::new(output, args.format);
        options.languages = languages;
        options.field_codes = args.field_codes;

        Ok(ExportJob { spec, options })
    }

    /// Codes the rows are filtered on, for the unmatched-EAN report.
    pub fn requested_eans(&self) -> Option<RequestedEans<'_>> {
        self.spec.ean_values().map(|codes| RequestedEans {
            codes,
            partial: self.spec.partial_match,
        })
    }
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.<ext>` in the current directory.
pub fn default_output_name(prefix: &str, format: ExportFormat, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "{prefix}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}
