//! Model-catalog normalization.
//!
//! Each engine reports its model list in its own shape; this module flattens
//! them into a uniform (value, text) pair sorted for display. The lists are
//! ephemeral: recreated on every fetch, discarded when the settings overlay
//! closes or the engine changes.

use std::cmp::Ordering;

use crate::api::ModelsPayload;
use crate::engine::Engine;

/// A normalized (id, display-label) pair. `value` goes back to the server,
/// `text` is what sorts and renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub value: String,
    pub text: String,
}

impl ModelDescriptor {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// Display ordering for model and saved-model labels: case-insensitive,
/// falling back to byte order so equal-ignoring-case labels still sort
/// deterministically.
pub fn display_order(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    match folded {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

/// Flatten a provider-shaped payload into sorted descriptors.
///
/// Gemini names arrive prefixed with `models/`; the prefix is stripped and
/// the stripped string serves as both value and label. Every other engine
/// reports bare ids which pass through unchanged.
pub fn normalize(engine: Engine, payload: &ModelsPayload) -> Vec<ModelDescriptor> {
    // The server adapts every provider except gemini (ollama included) to
    // the flat shape; a mismatched shape normalizes to an empty list.
    let mut models: Vec<ModelDescriptor> = match (engine, payload) {
        (Engine::Gemini, ModelsPayload::Named { models }) => models
            .iter()
            .map(|entry| {
                let name = entry.name.strip_prefix("models/").unwrap_or(&entry.name);
                ModelDescriptor::new(name, name)
            })
            .collect(),
        (Engine::Gemini, _) => Vec::new(),
        (_, ModelsPayload::Flat { data }) => data
            .iter()
            .map(|entry| ModelDescriptor::new(entry.id.clone(), entry.id.clone()))
            .collect(),
        (_, _) => Vec::new(),
    };

    models.sort_by(|a, b| display_order(&a.text, &b.text));
    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn flat(ids: &[&str]) -> ModelsPayload {
        serde_json::from_value(serde_json::json!({
            "data": ids.iter().map(|id| serde_json::json!({"id": id})).collect::<Vec<_>>()
        }))
        .unwrap()
    }

    fn named(names: &[&str]) -> ModelsPayload {
        serde_json::from_value(serde_json::json!({
            "models": names.iter().map(|n| serde_json::json!({"name": n})).collect::<Vec<_>>()
        }))
        .unwrap()
    }

    #[rstest]
    #[case(Engine::OpenAi)]
    #[case(Engine::OpenRouter)]
    #[case(Engine::Ollama)]
    #[case(Engine::LmStudio)]
    fn ids_pass_through_unchanged(#[case] engine: Engine) {
        let models = normalize(engine, &flat(&["models/x", "gpt-4o"]));
        // Only gemini strips the prefix; a flat id keeps it verbatim.
        assert_eq!(
            models,
            vec![
                ModelDescriptor::new("gpt-4o", "gpt-4o"),
                ModelDescriptor::new("models/x", "models/x"),
            ]
        );
    }

    #[test]
    fn gemini_strips_models_prefix() {
        let models = normalize(
            Engine::Gemini,
            &named(&["models/gemini-1.5-pro", "gemini-exp"]),
        );
        assert_eq!(
            models,
            vec![
                ModelDescriptor::new("gemini-1.5-pro", "gemini-1.5-pro"),
                ModelDescriptor::new("gemini-exp", "gemini-exp"),
            ]
        );
    }

    #[test]
    fn sorted_ascending_by_display_text() {
        let models = normalize(Engine::OpenAi, &flat(&["zeta", "Alpha", "beta"]));
        let texts: Vec<&str> = models.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn empty_payload_normalizes_to_empty() {
        assert!(normalize(Engine::LmStudio, &flat(&[])).is_empty());
    }

    #[test]
    fn display_order_is_case_insensitive_with_stable_tiebreak() {
        assert_eq!(display_order("alpha", "Beta"), Ordering::Less);
        assert_eq!(display_order("ALPHA", "alpha"), Ordering::Less);
        assert_eq!(display_order("same", "same"), Ordering::Equal);
    }
}
