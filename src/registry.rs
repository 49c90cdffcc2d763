//! Saved-model bookkeeping: composite keys, display ordering, and resolving
//! which entry is current against the server's default.

use crate::api::SavedModel;
use crate::catalog::display_order;
use crate::engine::Engine;

/// Composite identity of a saved model, `"<engine>::<model_id>"`. Unique
/// within the registry.
pub fn composite_key(engine: Engine, model_id: &str) -> String {
    format!("{}::{}", engine.id(), model_id)
}

/// Inverse of [`composite_key`]; `None` for malformed keys or engines
/// outside the closed set.
pub fn parse_key(key: &str) -> Option<(Engine, &str)> {
    let (engine, model_id) = key.split_once("::")?;
    Some((engine.parse().ok()?, model_id))
}

/// Ascending by display name, the order the list renders in.
pub fn sort_entries(entries: &mut [SavedModel]) {
    entries.sort_by(|a, b| display_order(&a.display_name, &b.display_name));
}

/// Outcome of reconciling sorted entries with the server default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The default matches an entry: select it, nothing to notify.
    Select { index: usize },
    /// No entry matches (stale or absent default): select the first sorted
    /// entry and run the same transition as a manual selection, making it
    /// the de facto default.
    Promote { index: usize },
    /// Nothing saved yet.
    Empty,
}

pub fn resolve(entries: &[SavedModel], default_engine: Engine, default_model: &str) -> Resolution {
    if entries.is_empty() {
        return Resolution::Empty;
    }
    let wanted = composite_key(default_engine, default_model);
    match entries
        .iter()
        .position(|e| composite_key(e.engine, &e.model_id) == wanted)
    {
        Some(index) => Resolution::Select { index },
        None => Resolution::Promote { index: 0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(engine: Engine, model_id: &str, display_name: &str) -> SavedModel {
        SavedModel {
            engine,
            model_id: model_id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    #[test]
    fn keys_round_trip() {
        let key = composite_key(Engine::OpenRouter, "openrouter/auto");
        assert_eq!(key, "openrouter::openrouter/auto");
        assert_eq!(parse_key(&key), Some((Engine::OpenRouter, "openrouter/auto")));
    }

    #[test]
    fn malformed_keys_parse_to_none() {
        assert_eq!(parse_key("no-separator"), None);
        assert_eq!(parse_key("claude::model"), None);
    }

    #[test]
    fn entries_sort_by_display_name() {
        let mut entries = vec![
            entry(Engine::OpenAi, "m2", "Beta"),
            entry(Engine::OpenAi, "m1", "Alpha"),
        ];
        sort_entries(&mut entries);
        let labels: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Beta"]);
        let keys: Vec<String> = entries
            .iter()
            .map(|e| composite_key(e.engine, &e.model_id))
            .collect();
        assert_eq!(keys, vec!["openai::m1", "openai::m2"]);
    }

    #[test]
    fn matching_default_selects_without_promotion() {
        let entries = vec![
            entry(Engine::OpenAi, "m1", "Alpha"),
            entry(Engine::OpenAi, "m2", "Beta"),
        ];
        assert_eq!(
            resolve(&entries, Engine::OpenAi, "m1"),
            Resolution::Select { index: 0 }
        );
    }

    #[test]
    fn stale_default_promotes_first_sorted_entry() {
        let entries = vec![
            entry(Engine::OpenAi, "m1", "Alpha"),
            entry(Engine::Gemini, "g1", "Gamma"),
        ];
        assert_eq!(
            resolve(&entries, Engine::Ollama, "llama3"),
            Resolution::Promote { index: 0 }
        );
    }

    #[test]
    fn empty_default_never_matches() {
        let entries = vec![entry(Engine::OpenAi, "m1", "Alpha")];
        assert_eq!(
            resolve(&entries, Engine::OpenAi, ""),
            Resolution::Promote { index: 0 }
        );
    }

    #[test]
    fn no_entries_resolve_to_empty() {
        assert_eq!(resolve(&[], Engine::OpenAi, "m1"), Resolution::Empty);
    }
}
