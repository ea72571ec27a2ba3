//! Batched auxiliary lookups for the comprehensive layout.
//!
//! One query per page and per table family, keyed by the product-group ids of
//! the page, instead of one query per product. Pages with more than
//! [`BIND_LIST_CHUNK`] groups take one query per chunk of ids.

use crate::config::{
    ACTIVE_STATUS, BIND_LIST_CHUNK, CHARACTERISTICS_TABLE, DICTIONARY_TABLE, GALLERY_TABLE,
    GROUP_CHARACTERISTICS_TABLE,
};

use super::builder::{BuiltQuery, SqlBuilder};

/// Active gallery images of the given groups, ordered by group then position.
///
/// Columns: `group_id`, `idimage`, `ext`. Every group falls in exactly one
/// statement, so a group's images keep their order.
pub fn gallery_queries(group_ids: &[i64]) -> Vec<BuiltQuery> {
    group_ids.chunks(BIND_LIST_CHUNK).map(gallery_query).collect()
}

/// Localized technical-specification pairs of the given groups, chunked like
/// [`gallery_queries`].
pub fn specs_queries(group_ids: &[i64]) -> Vec<BuiltQuery> {
    group_ids.chunks(BIND_LIST_CHUNK).map(specs_query).collect()
}

fn gallery_query(group_ids: &[i64]) -> BuiltQuery {
    let mut builder = SqlBuilder::new(format!(
        "SELECT g.idproduit_group AS group_id, g.idimage, g.ext FROM {GALLERY_TABLE} g \
         WHERE g.status = '{ACTIVE_STATUS}' AND g.idproduit_group IN "
    ));
    builder.push_bind_list(group_ids.iter().copied());
    builder.push(" ORDER BY g.idproduit_group, g.position, g.idimage");
    builder.build()
}

/// Label and value are read from the dictionary in the same language.
/// Columns: `group_id`, `language`, `label`, `value`; ordered by group then
/// characteristic position.
fn specs_query(group_ids: &[i64]) -> BuiltQuery {
    let mut builder = SqlBuilder::new(format!(
        "SELECT pgc.idproduit_group AS group_id, dk.idlangue AS language, \
         dk.valeur AS label, dv.valeur AS value \
         FROM {GROUP_CHARACTERISTICS_TABLE} pgc \
         JOIN {CHARACTERISTICS_TABLE} c ON pgc.idcaracteristique = c.idcaracteristique \
         JOIN {DICTIONARY_TABLE} dk ON c.iddictionnaire_cle = dk.iddictionnaire \
         JOIN {DICTIONARY_TABLE} dv ON c.iddictionnaire_valeur = dv.iddictionnaire \
         AND dv.idlangue = dk.idlangue \
         WHERE pgc.status = '{ACTIVE_STATUS}' AND c.status = '{ACTIVE_STATUS}' \
         AND pgc.idproduit_group IN "
    ));
    builder.push_bind_list(group_ids.iter().copied());
    builder.push(" ORDER BY pgc.idproduit_group, pgc.position, c.idcaracteristique");
    builder.build()
}
