/// LLM Client — the single point of entry for all generative-AI calls in folio.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Flows talk to the `Generator` trait; `LlmClient` is the production backend.
///
/// One call = one HTTP request. Retry belongs to `resilience::Invoker`, which
/// uses `Classify` on `LlmError` to tell busy signals from fatal errors.
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::resilience::{Classify, RetryReason};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_TTS_VOICE: &str = "Algenib";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Audio decode error: {0}")]
    Audio(String),
}

impl Classify for LlmError {
    fn retry_reason(&self) -> Option<RetryReason> {
        match self {
            LlmError::Api { status, .. } if is_busy_status(*status) => {
                Some(RetryReason::ServiceBusy(self.to_string()))
            }
            LlmError::Http(e) if e.is_timeout() || e.is_connect() => {
                Some(RetryReason::ServiceBusy(self.to_string()))
            }
            LlmError::EmptyContent => Some(RetryReason::EmptyOutput),
            _ => None,
        }
    }
}

/// 429 (rate limited) and 5xx (overloaded / unavailable) are transient.
fn is_busy_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Raw speech returned by the TTS model: 16-bit little-endian mono PCM.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub pcm: Bytes,
    pub mime_type: String,
}

/// Remote generation backend. Carried in `AppState` as `Arc<dyn Generator>`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Single text generation call. `system` may be empty.
    async fn generate_text(&self, prompt: &str, system: &str) -> Result<String, LlmError>;

    /// Single text-to-speech call.
    async fn generate_speech(&self, text: &str) -> Result<SpeechAudio, LlmError>;
}

/// Model and credential settings, passed in explicitly from `Config`.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub text_model: String,
    pub tts_model: String,
    pub tts_voice: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Gemini generateContent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: Vec<&'a str>,
    speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated text of the first candidate's text parts, if any.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.parts().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    /// First inline media part.
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.parts().find_map(|p| p.inline_data.as_ref())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production `Generator`, backed by the Gemini REST API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn text_model(&self) -> &str {
        &self.settings.text_model
    }

    async fn post(&self, model: &str, body: &GenerateRequest<'_>) -> Result<GenerateResponse, LlmError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.settings.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            if is_busy_status(status.as_u16()) {
                warn!("Gemini API returned {}: {}", status, message);
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_slice(&response.bytes().await?)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
                model, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl Generator for LlmClient {
    async fn generate_text(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            system_instruction: (!system.is_empty()).then(|| Content {
                role: None,
                parts: vec![TextPart { text: system }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: None,
        };

        let response = self.post(&self.settings.text_model, &body).await?;
        response.text().ok_or(LlmError::EmptyContent)
    }

    async fn generate_speech(&self, text: &str) -> Result<SpeechAudio, LlmError> {
        let body = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: &self.settings.tts_voice,
                        },
                    },
                },
            }),
        };

        let response = self.post(&self.settings.tts_model, &body).await?;
        let media = response.inline_data().ok_or(LlmError::EmptyContent)?;
        decode_inline_audio(media)
    }
}

/// Decodes base64 inline media into raw PCM.
fn decode_inline_audio(media: &InlineData) -> Result<SpeechAudio, LlmError> {
    let pcm = BASE64
        .decode(media.data.trim())
        .map_err(|e| LlmError::Audio(e.to_string()))?;
    if pcm.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(SpeechAudio {
        pcm: Bytes::from(pcm),
        mime_type: media.mime_type.clone(),
    })
}
