//! Static `(task, component_type)` → prompt mapping. Prompts are template
//! strings selected by a static mapping; `extraction_prompt`'s match is
//! exhaustive over the closed `ComponentType` set, so selection can't miss a
//! mapping at runtime — a new variant without its prompt fails the build.
//!
//! Prompt text follows `hydro_find/ai/prompts/classification_prompt.py` and
//! the per-component prompt modules alongside it.

use hydrofind_shared::ComponentType;

pub const CLASSIFICATION_PROMPT: &str = "\
You are a classifier for hydraulic fitting search queries. Given a user \
query (often in Russian), answer with exactly one of: fittings, adapters, \
plugs, adapter-tee, banjo, banjo-bolt, brs, coupling. Answer with the \
single word only, no punctuation.";

pub const SPLIT_BATCH_PROMPT: &str = "\
Split the following text into one hydraulic component request per line. \
Return only the resulting lines, one per line, with no numbering or \
commentary.";

pub const QUANTITY_PROMPT: &str = "\
Extract the requested quantity of parts from the query. Answer with the \
number only. If no quantity is stated, answer with exactly: \u{43d}\u{435} \
\u{443}\u{43a}\u{430}\u{437}\u{430}\u{43d}\u{43e}.";

/// One extraction prompt per component type, matched exhaustively — adding a
/// new `ComponentType` variant without its prompt fails the build.
pub fn extraction_prompt(component_type: ComponentType) -> &'static str {
    match component_type {
        ComponentType::Fittings => {
            "Extract fitting parameters as JSON: standard, Dy, thread, armature \
             (nut|union|conical_union), seria, angle, removable_nut, \
             unstandard_thread, D_out, usit, s_key, compact, pin, o_ring, long. \
             Use null for unknown fields. Respond with JSON only."
        }
        ComponentType::Adapters => {
            "Extract adapter parameters as JSON: standard_1, standard_2, \
             thread_1, thread_2, armature_1, armature_2, angle, s_key. Use null \
             for unknown fields. Respond with JSON only."
        }
        ComponentType::Plugs => {
            "Extract plug parameters as JSON: standard, thread_type, thread, \
             armature, s_key. Use null for unknown fields. Respond with JSON \
             only."
        }
        ComponentType::AdapterTee => {
            "Extract adapter-tee parameters as JSON: standard_1, standard_2, \
             standard_3, thread_1, thread_2, thread_3, armature_1, armature_2, \
             armature_3. Use null for unknown fields. Respond with JSON only."
        }
        ComponentType::Banjo => {
            "Extract banjo parameters as JSON: standard, thread, Dy, angle, \
             s_key. Use null for unknown fields. Respond with JSON only."
        }
        ComponentType::BanjoBolt => {
            "Extract banjo-bolt parameters as JSON: standard, thread, length, \
             s_key. Use null for unknown fields. Respond with JSON only."
        }
        ComponentType::Brs => {
            "Extract BRS parameters as JSON: standard, thread, Dy, s_key. Use \
             null for unknown fields. Respond with JSON only."
        }
        ComponentType::Coupling => {
            "Extract coupling parameters as JSON: standard_1, standard_2, \
             thread_1, thread_2, s_key. Use null for unknown fields. Respond \
             with JSON only."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_component_type_has_an_extraction_prompt() {
        for ct in ComponentType::ALL {
            assert!(!extraction_prompt(ct).is_empty());
        }
    }
}
