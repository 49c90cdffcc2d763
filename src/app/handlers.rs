// Action dispatch, backend-event application, and task spawning.
//
// Every backend call is spawned with a cloned client and the event sender;
// results land in handle_backend() on the UI thread. Overlapping calls are
// not de-duplicated: responses apply in arrival order, last one wins.

use std::time::Duration;

use super::{App, STATUS_TTL_MS};
use crate::action::Action;
use crate::engine::Engine;
use crate::event::BackendEvent;
use crate::output::parse_segments;
use crate::registry::{self, Resolution};
use crate::session::SaveRequest;

pub(super) const TRANSLATE_EMPTY: &str = "Please enter text to translate.";
pub(super) const NETWORK_UNREACHABLE: &str = "Network error or server unreachable.";

impl App {
    pub(super) fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Tick => {
                let expired = self
                    .status
                    .as_ref()
                    .is_some_and(|(_, since)| since.elapsed() >= Duration::from_millis(STATUS_TTL_MS));
                if expired {
                    self.status = None;
                    self.mark_dirty();
                }
            }

            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),

            Action::Translate => self.translate(),
            Action::SwapTexts => self.swap_texts(),
            Action::CopyOutput => self.copy_output(),
            Action::SetTargetLang(code) => self.set_target_lang(code),
            Action::SavedModelChosen(key) => self.choose_saved_model(&key),

            Action::OpenSettings => {
                self.settings.session.begin_open();
                self.settings.reset_focus();
                self.spawn_settings_config();
                self.spawn_modes_load();
            }
            Action::CloseSettings => self.settings.session.close(),
            Action::ShowPanel(panel) => self.settings.session.set_panel(panel),
            Action::EngineChanged(engine) => {
                self.settings.session.change_engine(engine);
                self.spawn_engine_config();
            }
            Action::FetchModels => {
                let (engine, temp_key) = self.settings.session.begin_fetch();
                self.spawn_fetch_models(engine, temp_key);
            }
            Action::SaveSettings => {
                if let Some(request) = self.settings.session.save_request() {
                    self.spawn_save_model(request);
                }
            }
            Action::SaveModes => {
                if !self.settings.modes.is_empty() {
                    let update = self.settings.modes.save_update();
                    self.spawn_modes_update(update, None);
                }
            }
            Action::ResetModePrompt => {
                if !self.settings.modes.is_empty() {
                    let update = self.settings.modes.reset_update();
                    let mode = self.settings.modes.mode().to_string();
                    self.spawn_modes_update(update, Some(mode));
                }
            }
        }
    }

    fn translate(&mut self) {
        if self.input_box.is_blank() {
            self.output_view.set_message(TRANSLATE_EMPTY);
            return;
        }
        self.output_view.set_translating();

        let text = self.input_box.text();
        let target_lang = self.lang_bar.code().to_string();
        let engine = self.active.engine;
        let model = self.active.model_id.clone();
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.translate(&text, &target_lang, engine, &model).await;
            let _ = tx.send(BackendEvent::TranslationDone(result));
        });
    }

    fn swap_texts(&mut self) {
        let output_text = self.output_view.plain_text();
        let input_text = self.input_box.text();
        self.input_box.set_text(&output_text);
        self.output_view.set_output(parse_segments(&input_text));
    }

    fn copy_output(&mut self) {
        let text = self.output_view.plain_text();
        if text.is_empty() {
            return;
        }
        match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(text) {
                Ok(()) => self.set_status("Output copied to clipboard"),
                Err(e) => {
                    tracing::error!("Failed to copy output: {e}");
                    self.set_status("Copy failed");
                }
            },
            None => self.set_status("Clipboard unavailable"),
        }
    }

    fn set_target_lang(&mut self, code: String) {
        self.lang_bar.set_lang(&code);
        self.prefs.target_lang = code;
        if let Some(path) = self.prefs_path.clone() {
            if let Err(e) = self.prefs.save(&path) {
                tracing::warn!("Failed to persist target language: {e}");
            }
        }
    }

    fn choose_saved_model(&mut self, key: &str) {
        match registry::parse_key(key) {
            Some((engine, model_id)) => self.spawn_set_default(engine, model_id.to_string()),
            None => tracing::warn!("Ignoring malformed saved-model key {key:?}"),
        }
    }

    // ---- backend results ----

    pub(super) fn handle_backend(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::RegistryLoaded(Ok((config, mut entries))) => {
                self.active.engine = config.default_engine;
                self.active.model_id = config.default_model.clone();
                registry::sort_entries(&mut entries);
                match registry::resolve(&entries, config.default_engine, &config.default_model) {
                    Resolution::Select { index } => {
                        self.saved_models.set_entries(entries, Some(index));
                    }
                    Resolution::Promote { index } => {
                        // Stored default is stale or absent: the first sorted
                        // entry takes over, through the same transition as a
                        // manual selection.
                        let entry = entries[index].clone();
                        self.saved_models.set_entries(entries, Some(index));
                        self.spawn_set_default(entry.engine, entry.model_id);
                    }
                    Resolution::Empty => self.saved_models.set_entries(Vec::new(), None),
                }
            }
            BackendEvent::RegistryLoaded(Err(e)) => {
                tracing::error!("Error loading saved models: {e}");
                self.saved_models.set_failed();
            }

            BackendEvent::SettingsConfigLoaded(Ok(config)) => {
                self.settings
                    .session
                    .apply_open_config(&config, &mut self.active);
            }
            BackendEvent::SettingsConfigLoaded(Err(e)) => {
                tracing::error!("Error fetching config on settings open: {e}");
            }

            BackendEvent::EngineConfigLoaded(result) => {
                if let Err(e) = &result {
                    tracing::error!("Error fetching config for selected engine: {e}");
                }
                self.settings.session.apply_engine_config(result.as_ref());
            }

            BackendEvent::ModelsFetched { engine, result } => {
                if let Err(e) = &result {
                    tracing::error!("Error fetching models for {engine}: {e}");
                }
                self.settings.session.apply_models(result, &mut self.active);
            }

            BackendEvent::ModelSaved { request, result } => {
                let saved =
                    self.settings
                        .session
                        .apply_save(&request, result, &mut self.active);
                if saved {
                    self.set_status("Settings saved successfully!");
                    self.spawn_registry_refresh();
                }
            }

            BackendEvent::DefaultModelSet {
                engine,
                model_id,
                result,
            } => match result {
                Ok(outcome) if outcome.success => {
                    self.active.engine = engine;
                    self.active.model_id = model_id.clone();
                    self.saved_models
                        .mark_current(&registry::composite_key(engine, &model_id));
                    tracing::info!(
                        "Default model set to {} · {}",
                        engine.display_name(),
                        model_id
                    );
                }
                Ok(outcome) => tracing::error!(
                    "Failed to set default model: {}",
                    outcome.message.as_deref().unwrap_or("unknown")
                ),
                Err(e) => tracing::error!("Error setting default model: {e}"),
            },

            BackendEvent::TranslationDone(result) => match result {
                Ok(output) => self.output_view.set_output(parse_segments(&output)),
                Err(e) => match e.backend_message() {
                    Some(message) => self.output_view.set_message(message.to_string()),
                    None => self.output_view.set_message(NETWORK_UNREACHABLE),
                },
            },

            BackendEvent::ModesLoaded(Ok(settings)) => {
                self.settings.set_modes(crate::modes::ModesForm::new(settings));
            }
            BackendEvent::ModesLoaded(Err(e)) => {
                tracing::error!("Error fetching translation modes: {e}");
            }

            BackendEvent::ModesSaved { reset_of, result } => {
                self.apply_modes_saved(reset_of, result);
            }
        }
    }

    fn apply_modes_saved(
        &mut self,
        reset_of: Option<String>,
        result: Result<crate::api::SaveOutcome, crate::api::ApiError>,
    ) {
        match result {
            Ok(outcome) if outcome.success => {
                match &reset_of {
                    Some(mode) => self.set_status(format!(
                        "Prompt for \"{}\" reset to default.",
                        mode.replace('_', " ")
                    )),
                    None => self.set_status("Translation mode settings saved successfully!"),
                }
                self.spawn_modes_load();
            }
            Ok(outcome) => {
                let message = outcome.message.unwrap_or_else(|| "Unknown error".to_string());
                match reset_of {
                    Some(_) => self.set_status(format!("Failed to reset prompt: {message}")),
                    None => self.set_status(format!("Failed to save settings: {message}")),
                }
            }
            Err(e) => {
                tracing::error!("Error updating translation modes: {e}");
                match reset_of {
                    Some(_) => self.set_status("Error resetting prompt."),
                    None => self.set_status("Error saving translation mode settings."),
                }
            }
        }
    }

    // ---- task spawning ----

    pub(super) fn spawn_registry_refresh(&mut self) {
        self.saved_models.set_loading();
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.config_and_saved_models().await;
            let _ = tx.send(BackendEvent::RegistryLoaded(result));
        });
    }

    fn spawn_settings_config(&self) {
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.get_config().await;
            let _ = tx.send(BackendEvent::SettingsConfigLoaded(result));
        });
    }

    fn spawn_engine_config(&self) {
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.get_config().await;
            let _ = tx.send(BackendEvent::EngineConfigLoaded(result));
        });
    }

    fn spawn_fetch_models(&self, engine: Engine, temp_key: Option<String>) {
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_models(engine, temp_key.as_deref()).await;
            let _ = tx.send(BackendEvent::ModelsFetched { engine, result });
        });
    }

    fn spawn_save_model(&self, request: SaveRequest) {
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api
                .save_model(request.engine, &request.model_id, request.api_key.as_deref())
                .await;
            let _ = tx.send(BackendEvent::ModelSaved { request, result });
        });
    }

    fn spawn_set_default(&self, engine: Engine, model_id: String) {
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.set_default_model(engine, &model_id).await;
            let _ = tx.send(BackendEvent::DefaultModelSet {
                engine,
                model_id,
                result,
            });
        });
    }

    fn spawn_modes_load(&self) {
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.translation_modes().await;
            let _ = tx.send(BackendEvent::ModesLoaded(result));
        });
    }

    fn spawn_modes_update(&self, update: crate::api::ModesUpdate, reset_of: Option<String>) {
        let api = self.api.clone();
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.update_translation_modes(&update).await;
            let _ = tx.send(BackendEvent::ModesSaved { reset_of, result });
        });
    }
}
