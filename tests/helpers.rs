// Shared test helpers: a small catalogue database in a temporary directory.
//
// The fixture has the seven source tables with a handful of products covering
// the interesting cases (active/inactive, with and without EAN, grouped with a
// brand, images and specifications, grouped without brand, ungrouped).

use std::path::{Path, PathBuf};

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

use product_export::storage::SqliteExecutor;

/// EAN of the fully enriched product (group 10, brand, 12 images, specs).
#[allow(dead_code)]
pub const EAN_ENRICHED: &str = "3664436019363";
/// EAN of the grouped product without brand, images or name.
#[allow(dead_code)]
pub const EAN_BARE: &str = "3014151002667";
/// EAN of an inactive product.
#[allow(dead_code)]
pub const EAN_INACTIVE: &str = "5000000000001";
/// Number of active products in the fixture.
#[allow(dead_code)]
pub const ACTIVE_PRODUCTS: u64 = 4;

const SCHEMA: &[&str] = &[
    "CREATE TABLE produits (
        idproduit INTEGER PRIMARY KEY,
        idproduit_group INTEGER,
        idrows INTEGER,
        ref TEXT,
        ean TEXT,
        keywords TEXT,
        desc_fastmag TEXT,
        description_fr TEXT,
        prix REAL,
        prix_barre REAL,
        prix_achat REAL,
        tva REAL,
        stock INTEGER,
        poids REAL,
        taille TEXT,
        couleur TEXT,
        virtuel TEXT,
        variant_group_code TEXT,
        idfournisseur INTEGER,
        ref_fournisseur TEXT,
        position INTEGER,
        status TEXT,
        date_debut TEXT,
        date_fin TEXT,
        date_creation TEXT,
        date_modification TEXT
    )",
    "CREATE TABLE produits_group (
        idproduit_group INTEGER PRIMARY KEY,
        nom_fr TEXT,
        description_fr TEXT,
        idmarque INTEGER
    )",
    "CREATE TABLE produits_marque (
        idmarque INTEGER PRIMARY KEY,
        marque_fr TEXT
    )",
    "CREATE TABLE produits_gallery (
        idimage INTEGER PRIMARY KEY,
        idproduit_group INTEGER,
        ext TEXT,
        position INTEGER,
        status TEXT
    )",
    "CREATE TABLE produits_group_caracteristiques (
        idproduit_group INTEGER,
        idcaracteristique INTEGER,
        position INTEGER,
        status TEXT
    )",
    "CREATE TABLE caracteristiques (
        idcaracteristique INTEGER PRIMARY KEY,
        iddictionnaire_cle INTEGER,
        iddictionnaire_valeur INTEGER,
        status TEXT
    )",
    "CREATE TABLE dictionnaires_langues (
        iddictionnaire INTEGER,
        idlangue TEXT,
        valeur TEXT
    )",
];

const DATA: &[&str] = &[
    // Grouped product with brand, gallery and specifications
    "INSERT INTO produits (idproduit, idproduit_group, ref, ean, keywords, desc_fastmag,
        description_fr, prix, poids, virtuel, variant_group_code, status, date_creation)
     VALUES (1, 10, 'REF-1', '3664436019363', 'creme hydratante', 'CREME',
        '<p>Soin <b>visage</b> &amp; corps</p>', 19.9, 0.25, 'non', 'VG-10', 'on',
        '2024-01-15 10:00:00')",
    // Grouped product without group name, brand, images or weight; virtual
    "INSERT INTO produits (idproduit, idproduit_group, ref, ean, keywords, desc_fastmag,
        description_fr, prix, poids, virtuel, status)
     VALUES (2, 11, 'REF-2', '3014151002667', '', 'Bon cadeau', NULL, 50, 0, 'oui', 'on')",
    // Ungrouped product without EAN
    "INSERT INTO produits (idproduit, idproduit_group, ref, ean, keywords, prix, status)
     VALUES (3, 0, 'REF-3', '', 'Bougie parfumee', 12.5, 'on')",
    // Inactive product
    "INSERT INTO produits (idproduit, idproduit_group, ref, ean, keywords, prix, status)
     VALUES (4, 10, 'REF-4', '5000000000001', 'Ancien modele', 9.0, 'off')",
    // Active product with a NULL EAN
    "INSERT INTO produits (idproduit, idproduit_group, ref, ean, keywords, prix, status)
     VALUES (5, 12, 'REF-5', NULL, 'Savon', 3.2, 'on')",
    "INSERT INTO produits_group (idproduit_group, nom_fr, description_fr, idmarque) VALUES
        (10, 'Creme Nivea 50 ml', '<div>Creme <i>riche</i></div>', 1),
        (11, '', NULL, 99),
        (12, 'Savon de Marseille', NULL, 2)",
    "INSERT INTO produits_marque (idmarque, marque_fr) VALUES (1, 'Nivea'), (2, 'Marius Fabre')",
    // Group 10: 12 active images (positions 0-11) and one inactive image
    "INSERT INTO produits_gallery (idimage, idproduit_group, ext, position, status) VALUES
        (1001, 10, 'jpg', 0, 'on'), (1002, 10, 'jpg', 1, 'on'), (1003, 10, 'png', 2, 'on'),
        (1004, 10, 'jpg', 3, 'on'), (1005, 10, 'jpg', 4, 'on'), (1006, 10, 'jpg', 5, 'on'),
        (1007, 10, 'jpg', 6, 'on'), (1008, 10, 'jpg', 7, 'on'), (1009, 10, 'jpg', 8, 'on'),
        (1010, 10, 'jpg', 9, 'on'), (1011, 10, 'jpg', 10, 'on'), (1012, 10, 'jpg', 11, 'on'),
        (999, 10, 'jpg', 0, 'off')",
    "INSERT INTO caracteristiques (idcaracteristique, iddictionnaire_cle, iddictionnaire_valeur, status)
     VALUES (1, 100, 200, 'on'), (2, 101, 201, 'on'), (3, 102, 202, 'off')",
    "INSERT INTO produits_group_caracteristiques (idproduit_group, idcaracteristique, position, status)
     VALUES (10, 1, 1, 'on'), (10, 2, 2, 'on'), (10, 3, 3, 'on')",
    "INSERT INTO dictionnaires_langues (iddictionnaire, idlangue, valeur) VALUES
        (100, 'en', 'Capacity'), (100, 'fr', 'Capacité'),
        (200, 'en', '1.7 oz'), (200, 'fr', '50 ml'),
        (101, 'fr', 'Ingrédients'),
        (201, 'fr', 'Aqua, Glycerin, Paraffinum Liquidum, Cera Microcristallina'),
        (102, 'fr', 'DLC'), (202, 'fr', '2025-12-31')",
];

/// Creates the fixture database and returns its directory (keep it alive) and path.
#[allow(dead_code)]
pub async fn create_catalogue() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("catalogue.db");
    create_catalogue_at(&path).await;
    (dir, path)
}

/// Creates the fixture database at `path`.
pub async fn create_catalogue_at(path: &Path) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .expect("Failed to create fixture database");

    for &statement in SCHEMA.iter().chain(DATA.iter()) {
        sqlx::query(statement)
            .execute(&mut conn)
            .await
            .unwrap_or_else(|e| panic!("Fixture statement failed: {e}\n{statement}"));
    }

    conn.close().await.expect("Failed to close fixture database");
}

/// Opens the fixture through the read-only SQLite executor.
#[allow(dead_code)]
pub async fn open_catalogue(path: &Path) -> SqliteExecutor {
    SqliteExecutor::open(path)
        .await
        .expect("Failed to open fixture database")
}
