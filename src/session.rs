//! Settings session state machine.
//!
//! Owns everything the settings overlay shows: the engine under edit, the
//! API-key field, the fetched model catalog, and inline error text. The
//! session is not authoritative: the server config overwrites its fields on
//! every open and engine switch. The effective (engine, model, key) triple
//! lives in [`ActiveModel`], mutated only through the transitions here and
//! by the saved-model registry.

use crate::api::{ApiError, RemoteConfig, SaveOutcome};
use crate::catalog::ModelDescriptor;
use crate::engine::Engine;

pub const SELECT_MODEL_FIRST: &str = "Please fetch and select a model before saving.";
pub const NO_MODELS_FOUND: &str =
    "No models found. For local models, ensure the server is running.";
pub const FETCH_FAILED: &str =
    "Error fetching models. Check your API key or local server connection.";
pub const SAVE_FAILED: &str = "Failed to save settings.";
pub const SAVE_ERROR: &str = "Error saving settings.";
pub const KEY_PLACEHOLDER: &str = "Enter your API key";
pub const KEY_NOT_REQUIRED: &str = "Not required for local models";

/// The effective engine/model/key triple used for translation. A transient,
/// possibly-stale copy of server state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveModel {
    pub engine: Engine,
    pub model_id: String,
    pub api_key: String,
}

impl ActiveModel {
    /// "OpenAI · gpt-4o" style label for the status bar.
    pub fn describe(&self) -> String {
        if self.model_id.is_empty() {
            format!("{} · (no model)", self.engine.display_name())
        } else {
            format!("{} · {}", self.engine.display_name(), self.model_id)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsPanel {
    #[default]
    ApiConfig,
    TranslationModes,
}

/// Model-catalog state within the overlay. An error leaves the list `Idle`
/// with the message in [`SettingsSession::error`]; `Ready` with an empty
/// list means the fetch succeeded but found nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModelList {
    #[default]
    Idle,
    Fetching,
    Ready(Vec<ModelDescriptor>),
}

/// A validated save, ready to POST. `api_key` is `None` for local engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub engine: Engine,
    pub model_id: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Default)]
pub struct SettingsSession {
    pub open: bool,
    pub panel: SettingsPanel,
    pub engine: Engine,
    pub api_key: String,
    pub models: ModelList,
    pub selected: Option<usize>,
    pub error: Option<String>,
    pub saving: bool,
}

impl SettingsSession {
    /// Show the overlay. Field values stay as they were until the config
    /// re-load lands.
    pub fn begin_open(&mut self) {
        self.open = true;
        self.panel = SettingsPanel::ApiConfig;
        self.error = None;
    }

    /// Config landed after an open: sync the session and the active triple
    /// from server state.
    pub fn apply_open_config(&mut self, config: &RemoteConfig, active: &mut ActiveModel) {
        active.engine = config.default_engine;
        active.model_id = config.default_model.clone();
        self.engine = config.default_engine;
        self.api_key = if self.engine.is_local() {
            String::new()
        } else {
            config.api_key_for(self.engine).to_string()
        };
        self.models = ModelList::Idle;
        self.selected = None;
        self.error = None;
        self.saving = false;
    }

    /// Engine selection changed. Fires on every selection change, including
    /// re-selecting the current value: the model list is stale either way.
    /// The caller follows up with a config re-fetch to restore the stored
    /// key.
    pub fn change_engine(&mut self, engine: Engine) {
        self.engine = engine;
        if engine.is_local() {
            self.api_key.clear();
        }
        self.models = ModelList::Idle;
        self.selected = None;
        self.error = None;
    }

    /// Config landed after an engine switch. A later response simply
    /// overwrites an earlier one; there is no ordering guarantee.
    pub fn apply_engine_config(&mut self, result: Result<&RemoteConfig, &ApiError>) {
        match result {
            Ok(config) => {
                if !self.engine.is_local() {
                    self.api_key = config.api_key_for(self.engine).to_string();
                }
            }
            Err(_) => self.api_key.clear(),
        }
    }

    /// Start a model fetch with the engine and key currently entered.
    /// Returns the engine and the transient key to send (entered but
    /// unsaved, letting the user test it).
    pub fn begin_fetch(&mut self) -> (Engine, Option<String>) {
        self.error = None;
        self.models = ModelList::Fetching;
        self.selected = None;
        let temp_key = (!self.api_key.is_empty()).then(|| self.api_key.clone());
        (self.engine, temp_key)
    }

    /// A model fetch finished. Pre-selects the previously-known current
    /// model when present; otherwise the first entry becomes the known
    /// current model; an empty result leaves the selection empty.
    pub fn apply_models(
        &mut self,
        result: Result<Vec<ModelDescriptor>, ApiError>,
        active: &mut ActiveModel,
    ) {
        match result {
            Err(ApiError::Backend(message)) => {
                self.models = ModelList::Idle;
                self.error = Some(message);
            }
            Err(ApiError::Network(_)) => {
                self.models = ModelList::Idle;
                self.error = Some(FETCH_FAILED.to_string());
            }
            Ok(models) if models.is_empty() => {
                self.models = ModelList::Ready(Vec::new());
                self.selected = None;
                self.error = Some(NO_MODELS_FOUND.to_string());
            }
            Ok(models) => {
                let known = (!active.model_id.is_empty())
                    .then(|| models.iter().position(|m| m.value == active.model_id))
                    .flatten();
                self.selected = match known {
                    Some(index) => Some(index),
                    None => {
                        active.model_id = models[0].value.clone();
                        Some(0)
                    }
                };
                self.models = ModelList::Ready(models);
            }
        }
    }

    pub fn model_entries(&self) -> &[ModelDescriptor] {
        match &self.models {
            ModelList::Ready(models) => models,
            _ => &[],
        }
    }

    pub fn models_enabled(&self) -> bool {
        !self.model_entries().is_empty()
    }

    pub fn selected_model(&self) -> Option<&ModelDescriptor> {
        self.selected.and_then(|i| self.model_entries().get(i))
    }

    pub fn select_next_model(&mut self) {
        let len = self.model_entries().len();
        if len > 0 {
            self.selected = Some(self.selected.map_or(0, |i| (i + 1) % len));
        }
    }

    pub fn select_prev_model(&mut self) {
        let len = self.model_entries().len();
        if len > 0 {
            self.selected = Some(self.selected.map_or(0, |i| (i + len - 1) % len));
        }
    }

    /// Validate a save. Returns the request to POST, or sets the inline
    /// error and returns `None`; no network round-trip happens in that
    /// case.
    pub fn save_request(&mut self) -> Option<SaveRequest> {
        self.error = None;
        let Some(model) = self.selected_model() else {
            self.error = Some(SELECT_MODEL_FIRST.to_string());
            return None;
        };
        let request = SaveRequest {
            engine: self.engine,
            model_id: model.value.clone(),
            api_key: (!self.engine.is_local()).then(|| self.api_key.clone()),
        };
        self.saving = true;
        Some(request)
    }

    /// A save finished. On success the active triple is updated and the
    /// overlay closes (returns `true`); the caller refreshes the registry.
    /// On rejection or network failure the overlay stays open with the
    /// error inline.
    pub fn apply_save(
        &mut self,
        request: &SaveRequest,
        result: Result<SaveOutcome, ApiError>,
        active: &mut ActiveModel,
    ) -> bool {
        self.saving = false;
        match result {
            Ok(outcome) if outcome.success => {
                active.engine = request.engine;
                active.model_id = request.model_id.clone();
                active.api_key = request.api_key.clone().unwrap_or_default();
                self.error = None;
                self.open = false;
                true
            }
            Ok(outcome) => {
                self.error = Some(outcome.message.unwrap_or_else(|| SAVE_FAILED.to_string()));
                false
            }
            Err(_) => {
                self.error = Some(SAVE_ERROR.to_string());
                false
            }
        }
    }

    /// Hide the overlay. Purely visual; nothing uncommitted is discarded.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_panel(&mut self, panel: SettingsPanel) {
        self.panel = panel;
    }

    pub fn key_locked(&self) -> bool {
        self.engine.is_local()
    }

    pub fn key_placeholder(&self) -> &'static str {
        if self.engine.is_local() {
            KEY_NOT_REQUIRED
        } else {
            KEY_PLACEHOLDER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(default_engine: Engine, default_model: &str) -> RemoteConfig {
        serde_json::from_value(serde_json::json!({
            "default_engine": default_engine.id(),
            "default_model": default_model,
            "engines": {
                "openai": {"api_key": "sk-stored"},
                "gemini": {"api_key": "g-stored"}
            }
        }))
        .unwrap()
    }

    fn descriptors(ids: &[&str]) -> Vec<ModelDescriptor> {
        ids.iter().map(|id| ModelDescriptor::new(*id, *id)).collect()
    }

    #[test]
    fn open_syncs_session_and_active_from_config() {
        let mut session = SettingsSession::default();
        let mut active = ActiveModel::default();
        session.begin_open();
        assert!(session.open);
        session.apply_open_config(&config(Engine::Gemini, "gemini-1.5-pro"), &mut active);
        assert_eq!(session.engine, Engine::Gemini);
        assert_eq!(session.api_key, "g-stored");
        assert_eq!(active.engine, Engine::Gemini);
        assert_eq!(active.model_id, "gemini-1.5-pro");
        assert_eq!(session.models, ModelList::Idle);
        assert!(!session.key_locked());
        assert_eq!(session.key_placeholder(), KEY_PLACEHOLDER);
    }

    #[test]
    fn open_blanks_key_for_local_default() {
        let mut session = SettingsSession::default();
        let mut active = ActiveModel::default();
        session.begin_open();
        let mut cfg = config(Engine::Ollama, "llama3");
        cfg.engines
            .insert("ollama".into(), serde_json::from_str(r#"{"api_key": "leftover"}"#).unwrap());
        session.apply_open_config(&cfg, &mut active);
        assert!(session.key_locked());
        assert_eq!(session.api_key, "");
        assert_eq!(session.key_placeholder(), KEY_NOT_REQUIRED);
    }

    #[test]
    fn engine_change_clears_stale_state() {
        let mut session = SettingsSession {
            models: ModelList::Ready(descriptors(&["m1"])),
            selected: Some(0),
            error: Some("old".into()),
            api_key: "sk-typed".into(),
            ..Default::default()
        };
        session.change_engine(Engine::Gemini);
        assert_eq!(session.models, ModelList::Idle);
        assert_eq!(session.selected, None);
        assert_eq!(session.error, None);
        // Non-local switch keeps the field until the config re-fetch lands.
        assert_eq!(session.api_key, "sk-typed");
        session.apply_engine_config(Ok(&config(Engine::Gemini, "")));
        assert_eq!(session.api_key, "g-stored");
    }

    #[test]
    fn engine_change_to_local_blanks_and_locks_key() {
        let mut session = SettingsSession {
            api_key: "sk-typed".into(),
            ..Default::default()
        };
        session.change_engine(Engine::LmStudio);
        assert!(session.key_locked());
        assert_eq!(session.api_key, "");
        // The re-fetched config must not restore a key for a local engine.
        session.apply_engine_config(Ok(&config(Engine::LmStudio, "")));
        assert_eq!(session.api_key, "");
    }

    #[test]
    fn reselecting_same_engine_still_clears_models() {
        let mut session = SettingsSession {
            engine: Engine::OpenAi,
            models: ModelList::Ready(descriptors(&["m1"])),
            selected: Some(0),
            ..Default::default()
        };
        session.change_engine(Engine::OpenAi);
        assert_eq!(session.models, ModelList::Idle);
        assert_eq!(session.selected, None);
    }

    #[test]
    fn engine_config_failure_blanks_key() {
        let mut session = SettingsSession {
            api_key: "sk-typed".into(),
            ..Default::default()
        };
        session.apply_engine_config(Err(&ApiError::Network("down".into())));
        assert_eq!(session.api_key, "");
    }

    #[test]
    fn fetch_sends_key_only_when_entered() {
        let mut session = SettingsSession::default();
        assert_eq!(session.begin_fetch(), (Engine::OpenAi, None));
        session.api_key = "sk-test".into();
        assert_eq!(
            session.begin_fetch(),
            (Engine::OpenAi, Some("sk-test".to_string()))
        );
        assert_eq!(session.models, ModelList::Fetching);
    }

    #[test]
    fn empty_fetch_result_disables_selector_with_message() {
        let mut session = SettingsSession::default();
        let mut active = ActiveModel::default();
        session.begin_fetch();
        session.apply_models(Ok(Vec::new()), &mut active);
        assert_eq!(session.error.as_deref(), Some(NO_MODELS_FOUND));
        assert_eq!(session.selected, None);
        assert!(!session.models_enabled());
    }

    #[test]
    fn fetch_preselects_known_current_model() {
        let mut session = SettingsSession::default();
        let mut active = ActiveModel {
            model_id: "m2".into(),
            ..Default::default()
        };
        session.apply_models(Ok(descriptors(&["m1", "m2", "m3"])), &mut active);
        assert_eq!(session.selected, Some(1));
        assert_eq!(active.model_id, "m2");
    }

    #[test]
    fn fetch_falls_back_to_first_and_adopts_it() {
        let mut session = SettingsSession::default();
        let mut active = ActiveModel {
            model_id: "gone".into(),
            ..Default::default()
        };
        session.apply_models(Ok(descriptors(&["m1", "m2"])), &mut active);
        assert_eq!(session.selected, Some(0));
        assert_eq!(active.model_id, "m1");
    }

    #[test]
    fn backend_fetch_error_is_shown_verbatim() {
        let mut session = SettingsSession::default();
        let mut active = ActiveModel::default();
        session.apply_models(Err(ApiError::Backend("Status 401".into())), &mut active);
        assert_eq!(session.error.as_deref(), Some("Status 401"));
        assert_eq!(session.models, ModelList::Idle);
    }

    #[test]
    fn network_fetch_error_uses_static_text() {
        let mut session = SettingsSession::default();
        let mut active = ActiveModel::default();
        session.apply_models(Err(ApiError::Network("refused".into())), &mut active);
        assert_eq!(session.error.as_deref(), Some(FETCH_FAILED));
    }

    #[test]
    fn save_without_selection_is_rejected_locally() {
        let mut session = SettingsSession::default();
        assert_eq!(session.save_request(), None);
        assert_eq!(session.error.as_deref(), Some(SELECT_MODEL_FIRST));
        assert!(!session.saving);
    }

    #[test]
    fn save_request_omits_key_for_local_engine() {
        let mut session = SettingsSession {
            engine: Engine::Ollama,
            models: ModelList::Ready(descriptors(&["llama3"])),
            selected: Some(0),
            ..Default::default()
        };
        let request = session.save_request().unwrap();
        assert_eq!(request.api_key, None);
        assert_eq!(request.model_id, "llama3");
        assert!(session.saving);
    }

    #[test]
    fn successful_save_commits_and_closes() {
        let mut session = SettingsSession {
            open: true,
            engine: Engine::OpenAi,
            api_key: "sk-new".into(),
            models: ModelList::Ready(descriptors(&["gpt-4o"])),
            selected: Some(0),
            ..Default::default()
        };
        let mut active = ActiveModel::default();
        let request = session.save_request().unwrap();
        let outcome: SaveOutcome = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(session.apply_save(&request, Ok(outcome), &mut active));
        assert!(!session.open);
        assert_eq!(
            active,
            ActiveModel {
                engine: Engine::OpenAi,
                model_id: "gpt-4o".into(),
                api_key: "sk-new".into(),
            }
        );
    }

    #[test]
    fn rejected_save_stays_open_with_message() {
        let mut session = SettingsSession {
            open: true,
            models: ModelList::Ready(descriptors(&["m1"])),
            selected: Some(0),
            ..Default::default()
        };
        let mut active = ActiveModel::default();
        let request = session.save_request().unwrap();
        let outcome: SaveOutcome =
            serde_json::from_str(r#"{"success": false, "message": "API key is required for openai."}"#)
                .unwrap();
        assert!(!session.apply_save(&request, Ok(outcome), &mut active));
        assert!(session.open);
        assert_eq!(session.error.as_deref(), Some("API key is required for openai."));
        assert_eq!(active, ActiveModel::default());

        let request = session.save_request().unwrap();
        let outcome: SaveOutcome = serde_json::from_str(r#"{"success": false}"#).unwrap();
        session.apply_save(&request, Ok(outcome), &mut active);
        assert_eq!(session.error.as_deref(), Some(SAVE_FAILED));
    }

    #[test]
    fn network_save_failure_uses_static_text() {
        let mut session = SettingsSession {
            open: true,
            models: ModelList::Ready(descriptors(&["m1"])),
            selected: Some(0),
            ..Default::default()
        };
        let mut active = ActiveModel::default();
        let request = session.save_request().unwrap();
        assert!(!session.apply_save(&request, Err(ApiError::Network("down".into())), &mut active));
        assert_eq!(session.error.as_deref(), Some(SAVE_ERROR));
    }

    #[test]
    fn model_selection_cycles() {
        let mut session = SettingsSession {
            models: ModelList::Ready(descriptors(&["a", "b"])),
            selected: Some(0),
            ..Default::default()
        };
        session.select_next_model();
        assert_eq!(session.selected_model().unwrap().value, "b");
        session.select_next_model();
        assert_eq!(session.selected_model().unwrap().value, "a");
        session.select_prev_model();
        assert_eq!(session.selected_model().unwrap().value, "b");
    }
}
