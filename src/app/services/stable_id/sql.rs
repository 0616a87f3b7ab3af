//! SQL templates for stable-identifier location
//!
//! Each template takes one substitution, the owning database name, which
//! may appear several times so every table reference stays qualified on a
//! shared server connection. The feature queries join out to the meta
//! table so collection databases answer with the member species that owns
//! the row.

/// Object types probed, in order, when the caller does not name one
pub const DEFAULT_OBJECT_TYPES: &[&str] = &[
    "gene",
    "transcript",
    "translation",
    "exon",
    "operon",
    "operontranscript",
];

/// Object type probed for compara databases when none is named
pub const COMPARA_DEFAULT_TYPE: &str = "genetree";

/// Fast-path statement against a dedicated lookup database; filters for
/// species, group, and object type are appended as needed
pub const LOOKUP_SQL: &str = "SELECT name, object_type, db_type \
     FROM %s.stable_id_lookup JOIN %s.species USING (species_id) \
     WHERE stable_id = ?";

const GENE_SQL: &str = "SELECT m.meta_value \
     FROM %s.gene o \
     JOIN %s.seq_region sr USING (seq_region_id) \
     JOIN %s.coord_system cs USING (coord_system_id) \
     JOIN %s.meta m ON m.species_id = cs.species_id \
     WHERE o.stable_id = ? AND m.meta_key = 'species.production_name'";

const TRANSCRIPT_SQL: &str = "SELECT m.meta_value \
     FROM %s.transcript o \
     JOIN %s.seq_region sr USING (seq_region_id) \
     JOIN %s.coord_system cs USING (coord_system_id) \
     JOIN %s.meta m ON m.species_id = cs.species_id \
     WHERE o.stable_id = ? AND m.meta_key = 'species.production_name'";

// Translations sit off the sequence, so the join reaches the region
// through the owning transcript.
const TRANSLATION_SQL: &str = "SELECT m.meta_value \
     FROM %s.translation o \
     JOIN %s.transcript t USING (transcript_id) \
     JOIN %s.seq_region sr USING (seq_region_id) \
     JOIN %s.coord_system cs USING (coord_system_id) \
     JOIN %s.meta m ON m.species_id = cs.species_id \
     WHERE o.stable_id = ? AND m.meta_key = 'species.production_name'";

const EXON_SQL: &str = "SELECT m.meta_value \
     FROM %s.exon o \
     JOIN %s.seq_region sr USING (seq_region_id) \
     JOIN %s.coord_system cs USING (coord_system_id) \
     JOIN %s.meta m ON m.species_id = cs.species_id \
     WHERE o.stable_id = ? AND m.meta_key = 'species.production_name'";

const OPERON_SQL: &str = "SELECT m.meta_value \
     FROM %s.operon o \
     JOIN %s.seq_region sr USING (seq_region_id) \
     JOIN %s.coord_system cs USING (coord_system_id) \
     JOIN %s.meta m ON m.species_id = cs.species_id \
     WHERE o.stable_id = ? AND m.meta_key = 'species.production_name'";

const OPERON_TRANSCRIPT_SQL: &str = "SELECT m.meta_value \
     FROM %s.operon_transcript o \
     JOIN %s.seq_region sr USING (seq_region_id) \
     JOIN %s.coord_system cs USING (coord_system_id) \
     JOIN %s.meta m ON m.species_id = cs.species_id \
     WHERE o.stable_id = ? AND m.meta_key = 'species.production_name'";

// Gene trees have no per-species rows; a bare hit is enough and the
// caller substitutes the adaptor's own species.
const GENETREE_SQL: &str = "SELECT 1 FROM %s.gene_tree_root WHERE stable_id = ?";

/// Template for one object type, `None` when the type has no query
pub fn template_for(object_type: &str) -> Option<&'static str> {
    match object_type {
        "gene" => Some(GENE_SQL),
        "transcript" => Some(TRANSCRIPT_SQL),
        "translation" => Some(TRANSLATION_SQL),
        "exon" => Some(EXON_SQL),
        "operon" => Some(OPERON_SQL),
        "operontranscript" => Some(OPERON_TRANSCRIPT_SQL),
        "genetree" => Some(GENETREE_SQL),
        _ => None,
    }
}
