//! The closed set of translation engines the backend can drive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language-model backend known to the translation server.
///
/// The set is closed: the server rejects anything else, and the model-list
/// response shape is keyed off this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    OpenAi,
    Gemini,
    OpenRouter,
    Ollama,
    LmStudio,
}

impl Engine {
    pub const ALL: [Engine; 5] = [
        Engine::OpenAi,
        Engine::Gemini,
        Engine::OpenRouter,
        Engine::Ollama,
        Engine::LmStudio,
    ];

    /// Wire identifier used in request bodies and query parameters.
    pub fn id(&self) -> &'static str {
        match self {
            Engine::OpenAi => "openai",
            Engine::Gemini => "gemini",
            Engine::OpenRouter => "openrouter",
            Engine::Ollama => "ollama",
            Engine::LmStudio => "lmstudio",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Engine::OpenAi => "OpenAI",
            Engine::Gemini => "Gemini",
            Engine::OpenRouter => "OpenRouter",
            Engine::Ollama => "Ollama",
            Engine::LmStudio => "LM Studio",
        }
    }

    /// Local-only engines run on the user's machine and take no API key.
    pub fn is_local(&self) -> bool {
        matches!(self, Engine::Ollama | Engine::LmStudio)
    }

    pub fn requires_api_key(&self) -> bool {
        !self.is_local()
    }

    /// Position within [`Engine::ALL`], for cycling through a selector.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|e| e == self).unwrap_or(0)
    }

    pub fn next(&self) -> Engine {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Engine {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Engine::ALL
            .iter()
            .copied()
            .find(|e| e.id() == s)
            .ok_or_else(|| UnknownEngine(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown engine: {0}")]
pub struct UnknownEngine(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_round_trip() {
        for engine in Engine::ALL {
            assert_eq!(engine.id().parse::<Engine>().unwrap(), engine);
        }
    }

    #[test]
    fn serde_uses_wire_ids() {
        assert_eq!(serde_json::to_string(&Engine::LmStudio).unwrap(), "\"lmstudio\"");
        assert_eq!(
            serde_json::from_str::<Engine>("\"openrouter\"").unwrap(),
            Engine::OpenRouter
        );
    }

    #[test]
    fn only_local_engines_skip_keys() {
        assert!(Engine::Ollama.is_local());
        assert!(Engine::LmStudio.is_local());
        assert!(Engine::OpenAi.requires_api_key());
        assert!(Engine::Gemini.requires_api_key());
        assert!(Engine::OpenRouter.requires_api_key());
    }

    #[test]
    fn display_names() {
        assert_eq!(Engine::OpenAi.display_name(), "OpenAI");
        assert_eq!(Engine::LmStudio.display_name(), "LM Studio");
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(Engine::LmStudio.next(), Engine::OpenAi);
        assert_eq!(Engine::OpenAi.prev(), Engine::LmStudio);
        assert_eq!(Engine::Gemini.next(), Engine::OpenRouter);
    }

    #[test]
    fn unknown_engine_is_an_error() {
        assert!("claude".parse::<Engine>().is_err());
    }
}
