//! Wire types for the translation server's JSON API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;

/// Server-held configuration: the default (engine, model) pair and the
/// per-engine API keys. The client never constructs this, only reads it and
/// requests patches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub default_engine: Engine,
    #[serde(default)]
    pub default_model: String,
    #[serde(default)]
    pub engines: HashMap<String, EngineEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineEntry {
    #[serde(default)]
    pub api_key: String,
}

impl RemoteConfig {
    /// Stored key for an engine; a missing entry reads as "no key stored".
    pub fn api_key_for(&self, engine: Engine) -> &str {
        self.engines
            .get(engine.id())
            .map(|e| e.api_key.as_str())
            .unwrap_or("")
    }
}

/// A persisted (engine, model) pair, selectable for quick switching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedModel {
    pub engine: Engine,
    pub model_id: String,
    pub display_name: String,
}

/// `{success, message?}` shape shared by the mutation endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw model-list response. The shape depends on the engine: every engine
/// except gemini reports `{data: [{id}]}`, gemini reports
/// `{models: [{name: "models/…"}]}`, and any engine can report
/// `{error, text?}` instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelsPayload {
    Failure {
        error: String,
        #[serde(default)]
        text: Option<String>,
    },
    Flat {
        data: Vec<IdEntry>,
    },
    Named {
        models: Vec<NamedEntry>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdEntry {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

/// `/translate` response: exactly one of `output` (rendered result) or
/// `message` (error text) is expected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Translation-mode settings. Presets arrive as an explicit ordered sequence
/// so the panel's mode order is part of the contract, not an artifact of
/// JSON object iteration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeSettings {
    #[serde(default)]
    pub presets: Vec<ModePreset>,
    #[serde(default)]
    pub custom_overrides: HashMap<String, String>,
    #[serde(default)]
    pub default_mode: String,
    #[serde(default)]
    pub thinking_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModePreset {
    pub mode: String,
    pub prompt: String,
}

impl ModeSettings {
    /// Override if one is set, else the preset text, else empty.
    pub fn effective_prompt(&self, mode: &str) -> &str {
        if let Some(overridden) = self.custom_overrides.get(mode) {
            return overridden;
        }
        self.presets
            .iter()
            .find(|p| p.mode == mode)
            .map(|p| p.prompt.as_str())
            .unwrap_or("")
    }

    /// Preset position for a mode, used to restore the panel selection.
    pub fn mode_index(&self, mode: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.mode == mode)
    }
}

/// Partial update for `/translation-modes`; absent fields are left untouched
/// server-side. An override with an empty prompt deletes the override.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_override: Option<PromptOverride>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptOverride {
    pub mode: String,
    pub prompt: String,
}
