//! Request client for the translation server.
//!
//! Every method is a single request/response exchange. Responses are parsed
//! as JSON regardless of HTTP status, since the server reports failures as
//! JSON bodies on non-2xx statuses too. No timeout, retry, or cancellation:
//! callers own whatever placeholder is on screen while a request is in
//! flight.

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::json;

use crate::catalog::{self, ModelDescriptor};
use crate::engine::Engine;
use crate::error::AppError;

use super::types::{
    ModeSettings, ModelsPayload, ModesUpdate, RemoteConfig, SaveOutcome, SavedModel,
    TranslateResponse,
};
use super::ApiError;

/// Fallback when a failure response carries no usable message.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base: Url,
}

#[derive(Serialize)]
struct SaveModelBody<'a> {
    engine: Engine,
    model_id: &'a str,
    /// Omitted entirely for local engines; a key is never sent for those.
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

impl BackendClient {
    pub fn new(server: &str) -> Result<Self, AppError> {
        let mut base =
            Url::parse(server).map_err(|e| AppError::ServerUrl(format!("{server}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    fn url(&self, path: &str) -> Url {
        // `path` is always a known relative endpoint, and `base` is a valid
        // http(s) URL with a trailing slash, so the join cannot fail.
        self.base
            .join(path)
            .unwrap_or_else(|_| self.base.clone())
    }

    pub async fn get_config(&self) -> Result<RemoteConfig, ApiError> {
        let config = self
            .http
            .get(self.url("get-config"))
            .send()
            .await?
            .json::<RemoteConfig>()
            .await?;
        Ok(config)
    }

    pub async fn saved_models(&self) -> Result<Vec<SavedModel>, ApiError> {
        let models = self
            .http
            .get(self.url("saved-models"))
            .send()
            .await?
            .json::<Vec<SavedModel>>()
            .await?;
        Ok(models)
    }

    /// The config and saved-model fetches the registry needs, issued
    /// concurrently and awaited jointly.
    pub async fn config_and_saved_models(
        &self,
    ) -> Result<(RemoteConfig, Vec<SavedModel>), ApiError> {
        let (config, saved) = tokio::join!(self.get_config(), self.saved_models());
        Ok((config?, saved?))
    }

    pub async fn set_default_model(
        &self,
        engine: Engine,
        model_id: &str,
    ) -> Result<SaveOutcome, ApiError> {
        let outcome = self
            .http
            .post(self.url("set-default-model"))
            .json(&json!({ "engine": engine, "model_id": model_id }))
            .send()
            .await?
            .json::<SaveOutcome>()
            .await?;
        Ok(outcome)
    }

    /// Persist a saved model and make it the new default. `api_key` must be
    /// `None` for local engines.
    pub async fn save_model(
        &self,
        engine: Engine,
        model_id: &str,
        api_key: Option<&str>,
    ) -> Result<SaveOutcome, ApiError> {
        let outcome = self
            .http
            .post(self.url("save-model"))
            .json(&SaveModelBody {
                engine,
                model_id,
                api_key,
            })
            .send()
            .await?
            .json::<SaveOutcome>()
            .await?;
        Ok(outcome)
    }

    /// Fetch and normalize the model list for an engine. A non-empty
    /// `temp_key` is passed along unsaved, letting the user test a key
    /// before committing it.
    pub async fn fetch_models(
        &self,
        engine: Engine,
        temp_key: Option<&str>,
    ) -> Result<Vec<ModelDescriptor>, ApiError> {
        let mut query: Vec<(&str, &str)> = vec![("engine", engine.id())];
        if let Some(key) = temp_key.filter(|k| !k.is_empty()) {
            query.push(("tempKey", key));
        }

        let payload = self
            .http
            .get(self.url("get-models"))
            .query(&query)
            .send()
            .await?
            .json::<ModelsPayload>()
            .await?;

        match payload {
            ModelsPayload::Failure { error, text } => {
                tracing::warn!(engine = %engine, error, "model list fetch rejected");
                Err(ApiError::Backend(
                    text.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                ))
            }
            payload => Ok(catalog::normalize(engine, &payload)),
        }
    }

    pub async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        engine: Engine,
        model: &str,
    ) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url("translate"))
            .json(&json!({
                "text": text,
                "target_lang": target_lang,
                "engine": engine,
                "model": model,
            }))
            .send()
            .await?
            .json::<TranslateResponse>()
            .await?;

        match response {
            TranslateResponse {
                output: Some(output),
                ..
            } => Ok(output),
            TranslateResponse {
                message: Some(message),
                ..
            } => Err(ApiError::Backend(message)),
            _ => Err(ApiError::Backend(UNKNOWN_ERROR.to_string())),
        }
    }

    pub async fn translation_modes(&self) -> Result<ModeSettings, ApiError> {
        let settings = self
            .http
            .get(self.url("translation-modes"))
            .send()
            .await?
            .json::<ModeSettings>()
            .await?;
        Ok(settings)
    }

    pub async fn update_translation_modes(
        &self,
        update: &ModesUpdate,
    ) -> Result<SaveOutcome, ApiError> {
        let outcome = self
            .http
            .post(self.url("translation-modes"))
            .json(update)
            .send()
            .await?
            .json::<SaveOutcome>()
            .await?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoints_join_onto_bare_host() {
        let client = BackendClient::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(client.url("get-config").as_str(), "http://127.0.0.1:3000/get-config");
    }

    #[test]
    fn endpoints_join_onto_prefixed_path() {
        let client = BackendClient::new("http://host.example/translator").unwrap();
        assert_eq!(
            client.url("saved-models").as_str(),
            "http://host.example/translator/saved-models"
        );
    }

    #[test]
    fn rejects_garbage_urls() {
        assert!(BackendClient::new("not a url").is_err());
    }

    #[test]
    fn save_body_omits_key_for_local_engines() {
        let body = serde_json::to_string(&SaveModelBody {
            engine: Engine::Ollama,
            model_id: "llama3",
            api_key: None,
        })
        .unwrap();
        assert_eq!(body, r#"{"engine":"ollama","model_id":"llama3"}"#);

        let body = serde_json::to_string(&SaveModelBody {
            engine: Engine::OpenAi,
            model_id: "gpt-4o",
            api_key: Some("sk-1"),
        })
        .unwrap();
        assert_eq!(body, r#"{"engine":"openai","model_id":"gpt-4o","api_key":"sk-1"}"#);
    }
}
