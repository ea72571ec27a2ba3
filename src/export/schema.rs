//! Statically declared output column schemas.
//!
//! Each column names its output key, its display header, where its value comes
//! from and the marker written when that value is missing. Rows are always
//! flattened against the full list, so column count and order never vary.

use crate::models::SpecField;

use super::types::Layout;

/// Columns of the standard layout, read from the product table as-is.
pub const STANDARD_COLUMNS: [&str; 26] = [
    "idproduit",
    "idproduit_group",
    "idrows",
    "ref",
    "ean",
    "keywords",
    "desc_fastmag",
    "description_fr",
    "prix",
    "prix_barre",
    "prix_achat",
    "tva",
    "stock",
    "poids",
    "taille",
    "couleur",
    "virtuel",
    "variant_group_code",
    "idfournisseur",
    "ref_fournisseur",
    "position",
    "status",
    "date_debut",
    "date_fin",
    "date_creation",
    "date_modification",
];

/// Values the row mapper computes from several source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Group name, then keywords, then `desc_fastmag`, else `Produit <id>`.
    Title,
    /// Brand name, else `Marque inconnue`.
    Brand,
    /// Group description, else product description; HTML removed.
    Description,
    /// `Oui` when the product belongs to a group.
    IsParent,
    /// `Service` for virtual products, `Produit` otherwise.
    ProductKind,
    /// Weight, only when positive.
    NetWeight,
    /// Weight, `0` when missing.
    PackageWeight,
    /// Capacity specification, else a capacity found in the name or description.
    Capacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// A source column, unchanged.
    Field(&'static str),
    /// A source column with HTML markup removed.
    HtmlField(&'static str),
    /// The n-th gallery image URL (0-based).
    Media(usize),
    /// A technical specification resolved through the language priority.
    Spec(SpecField),
    Derived(Derivation),
    /// The same value on every row.
    Constant(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Technical key: JSON object key and field-code header.
    pub key: &'static str,
    /// Display header of the CSV header row.
    pub header: &'static str,
    pub source: ColumnSource,
    /// Written when the source value is missing or blank.
    pub default: &'static str,
}

const fn col(key: &'static str, header: &'static str, source: ColumnSource) -> ColumnDef {
    ColumnDef {
        key,
        header,
        source,
        default: "",
    }
}

const COMPREHENSIVE_COLUMNS: [ColumnDef; 37] = [
    col("family_id", "Category", ColumnSource::Constant("")),
    col("shop_sku", "Shop sku", ColumnSource::Field("ref")),
    col("name", "Titre du produit", ColumnSource::Derived(Derivation::Title)),
    col("brand_id", "Marque", ColumnSource::Derived(Derivation::Brand)),
    col("description", "Description Longue", ColumnSource::Derived(Derivation::Description)),
    col("ean", "EAN", ColumnSource::Field("ean")),
    col("technical_spec_1_color", "Couleur commercial", ColumnSource::Constant("")),
    col("media_1", "Image principale", ColumnSource::Media(0)),
    col("media_2", "image secondaire", ColumnSource::Media(1)),
    col("media_3", "Image 3", ColumnSource::Media(2)),
    col("media_4", "Image 4", ColumnSource::Media(3)),
    col("media_5", "Image 5", ColumnSource::Media(4)),
    col("media_6", "Image 6", ColumnSource::Media(5)),
    col("media_7", "Image 7", ColumnSource::Media(6)),
    col("media_8", "Image 8", ColumnSource::Media(7)),
    col("media_9", "Image 9", ColumnSource::Media(8)),
    col("media_10", "Image_10", ColumnSource::Media(9)),
    col("is_parent", "Produit Parent (identification)", ColumnSource::Derived(Derivation::IsParent)),
    col("variant_group_code", "Id de rattachement", ColumnSource::Field("variant_group_code")),
    col("technical_spec_1_composition", "Composition 1", ColumnSource::Constant("")),
    col("technical_spec_2_composition", "Composition 2", ColumnSource::Constant("")),
    col("technical_spec_3_composition", "Composition 3", ColumnSource::Constant("")),
    col("technical_spec_1_care_advice", "Conseil d'entretien", ColumnSource::Constant("")),
    col("technical_spec_1_capacity", "Capacité", ColumnSource::Derived(Derivation::Capacity)),
    col("technical_spec_1_dimensions", "Dimensions", ColumnSource::Constant("")),
    col(
        "technical_spec_1_expiration_date",
        "DLC (Date limite de consommation)",
        ColumnSource::Spec(SpecField::ExpirationDate),
    ),
    col(
        "technical_spec_1_durability_date",
        "DDM (Date de durabilité minimale)",
        ColumnSource::Spec(SpecField::DurabilityDate),
    ),
    col("technical_spec_1_ingredients", "Ingrédients", ColumnSource::Spec(SpecField::Ingredients)),
    col("technical_spec_1_net_weight", "Poids net du produit", ColumnSource::Derived(Derivation::NetWeight)),
    col("technical_spec_1_pattern", "Motif", ColumnSource::Constant("")),
    col("technical_spec_1_commercial_warranty", "Garantie commerciale", ColumnSource::Constant("")),
    col("technical_spec_1_eco_responsibility", "Eco-responsable", ColumnSource::Constant("Non")),
    col("is_cloth", "Métrage ? (oui /non)", ColumnSource::Constant("Non")),
    col("is_virtual", "Produit ou Service", ColumnSource::Derived(Derivation::ProductKind)),
    col("is_bzc", "BZC ( à ne pas remplir )", ColumnSource::Constant("")),
    col("weight", "Poids du colis (kg)", ColumnSource::Derived(Derivation::PackageWeight)),
    col("size_id", "Taille unique", ColumnSource::Constant("Taille Unique")),
];

/// An ordered, fixed list of output columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    layout: Layout,
    columns: Vec<ColumnDef>,
}

impl OutputSchema {
    pub fn for_layout(layout: Layout) -> Self {
        match layout {
            Layout::Standard => Self::standard(),
            Layout::Comprehensive => Self::comprehensive(),
        }
    }

    pub fn standard() -> Self {
        let columns = STANDARD_COLUMNS
            .iter()
            .map(|&name| {
                let source = if name.contains("description") {
                    ColumnSource::HtmlField(name)
                } else {
                    ColumnSource::Field(name)
                };
                col(name, name, source)
            })
            .collect();
        Self {
            layout: Layout::Standard,
            columns,
        }
    }

    pub fn comprehensive() -> Self {
        Self {
            layout: Layout::Comprehensive,
            columns: COMPREHENSIVE_COLUMNS.to_vec(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.header)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.key)
    }
}
