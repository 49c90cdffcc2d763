use crate::api::{ApiError, ModeSettings, RemoteConfig, SaveOutcome, SavedModel};
use crate::catalog::ModelDescriptor;
use crate::engine::Engine;
use crate::session::SaveRequest;

/// Results of background backend calls, sent over an unbounded channel and
/// drained by the main loop. Responses are applied in arrival order; nothing
/// de-duplicates overlapping triggers of the same call, so a later response
/// overwrites an earlier one.
#[derive(Debug)]
pub enum BackendEvent {
    /// Joint config + saved-model load (startup and after every save).
    RegistryLoaded(Result<(RemoteConfig, Vec<SavedModel>), ApiError>),
    /// Config re-load triggered by opening the settings overlay.
    SettingsConfigLoaded(Result<RemoteConfig, ApiError>),
    /// Config re-load triggered by an engine switch.
    EngineConfigLoaded(Result<RemoteConfig, ApiError>),
    ModelsFetched {
        engine: Engine,
        result: Result<Vec<ModelDescriptor>, ApiError>,
    },
    ModelSaved {
        request: SaveRequest,
        result: Result<SaveOutcome, ApiError>,
    },
    DefaultModelSet {
        engine: Engine,
        model_id: String,
        result: Result<SaveOutcome, ApiError>,
    },
    TranslationDone(Result<String, ApiError>),
    ModesLoaded(Result<ModeSettings, ApiError>),
    ModesSaved {
        /// `Some(mode)` when this was a prompt reset rather than a save.
        reset_of: Option<String>,
        result: Result<SaveOutcome, ApiError>,
    },
}
