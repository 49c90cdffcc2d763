use crate::engine::Engine;
use crate::session::SettingsPanel;

/// App-level effects emitted by components; anything a component can handle
/// on its own never leaves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,

    FocusNext,
    FocusPrev,

    Translate,
    SwapTexts,
    CopyOutput,
    SetTargetLang(String),

    /// A saved model was picked from the registry list (composite key).
    SavedModelChosen(String),

    OpenSettings,
    CloseSettings,
    ShowPanel(SettingsPanel),
    EngineChanged(Engine),
    FetchModels,
    SaveSettings,
    SaveModes,
    ResetModePrompt,
}
