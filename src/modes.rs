//! Translation-mode panel state: mode selection, prompt editing, and the
//! partial updates the panel submits.

use crate::api::{ModeSettings, ModesUpdate, PromptOverride};

/// "only_translate" → "Only Translate".
pub fn mode_label(mode: &str) -> String {
    let mut label = String::with_capacity(mode.len());
    let mut word_start = true;
    for c in mode.chars() {
        if c == '_' {
            label.push(' ');
            word_start = true;
        } else if word_start {
            label.extend(c.to_uppercase());
            word_start = false;
        } else {
            label.push(c);
        }
    }
    label
}

/// Editable state of the translation-mode panel, rebuilt from the server on
/// every load so stale edits never survive a refresh.
#[derive(Debug, Clone, Default)]
pub struct ModesForm {
    settings: ModeSettings,
    pub selected: usize,
    pub prompt: String,
    pub thinking_enabled: bool,
}

impl ModesForm {
    pub fn new(settings: ModeSettings) -> Self {
        let selected = settings.mode_index(&settings.default_mode).unwrap_or(0);
        let prompt = settings
            .presets
            .get(selected)
            .map(|p| settings.effective_prompt(&p.mode).to_string())
            .unwrap_or_default();
        let thinking_enabled = settings.thinking_enabled;
        Self {
            settings,
            selected,
            prompt,
            thinking_enabled,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.presets.is_empty()
    }

    /// Wire name of the selected mode.
    pub fn mode(&self) -> &str {
        self.settings
            .presets
            .get(self.selected)
            .map(|p| p.mode.as_str())
            .unwrap_or("")
    }

    /// Humanized labels in contract order.
    pub fn labels(&self) -> Vec<String> {
        self.settings
            .presets
            .iter()
            .map(|p| mode_label(&p.mode))
            .collect()
    }

    pub fn select_next(&mut self) {
        self.cycle(1);
    }

    pub fn select_prev(&mut self) {
        self.cycle(self.settings.presets.len().saturating_sub(1));
    }

    fn cycle(&mut self, step: usize) {
        let len = self.settings.presets.len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + step) % len;
        // Selecting a mode swaps in its effective prompt, discarding any
        // unsaved edit to the previous one.
        self.prompt = self.settings.effective_prompt(self.mode()).to_string();
    }

    pub fn toggle_thinking(&mut self) {
        self.thinking_enabled = !self.thinking_enabled;
    }

    /// Full update: default mode, thinking flag, and the edited prompt as an
    /// override for the selected mode.
    pub fn save_update(&self) -> ModesUpdate {
        ModesUpdate {
            default_mode: Some(self.mode().to_string()),
            thinking_enabled: Some(self.thinking_enabled),
            prompt_override: Some(PromptOverride {
                mode: self.mode().to_string(),
                prompt: self.prompt.clone(),
            }),
        }
    }

    /// An empty override, which deletes the stored override server-side.
    pub fn reset_update(&self) -> ModesUpdate {
        ModesUpdate {
            prompt_override: Some(PromptOverride {
                mode: self.mode().to_string(),
                prompt: String::new(),
            }),
            ..Default::default()
        }
    }
}
