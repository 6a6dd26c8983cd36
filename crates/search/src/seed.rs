//! Initial Designer (C5): a fast greedy heuristic producing a valid seed
//! design before the LNS/BB search engine starts (§4.5).

use advisor_core::{Catalog, Collection, Design};

/// Build the seed design for `catalog`.
///
/// Per collection: the shard key is the single field with the highest
/// `query_use_count` (alphabetical tie-break), or unsharded if no field has
/// ever been queried. The index set starts empty and the embedding parent
/// starts as `none` — §4.5 notes both are valid seed choices ("k=0 is
/// valid"), leaving index and embedding discovery entirely to the search
/// engine. The result always satisfies §3's invariants, since every field
/// chosen is read directly off the collection's own schema.
pub fn initial_design(catalog: &Catalog) -> Design {
    let mut design = Design::empty(catalog);
    for name in catalog.collections() {
        let schema = catalog
            .collection(name)
            .expect("name came from catalog.collections(), so the lookup cannot fail");
        if let Some(field) = highest_use_field(schema) {
            design
                .set_shard_key(catalog, name, vec![field])
                .expect("a field drawn from the collection's own schema is always design-valid");
        }
    }
    design
}

fn highest_use_field(schema: &Collection) -> Option<String> {
    schema
        .fields
        .iter()
        .filter(|(_, stats)| stats.query_use_count > 0)
        .max_by(|(name_a, stats_a), (name_b, stats_b)| {
            stats_a
                .query_use_count
                .cmp(&stats_b.query_use_count)
                // Ties favor the alphabetically earlier name; since we're
                // inside `max_by`, that means treating it as the greater
                // element, hence the reversed comparison.
                .then_with(|| name_b.cmp(name_a))
        })
        .map(|(name, _)| name.clone())
}
