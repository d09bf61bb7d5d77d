//! Narrate: text-to-speech, returned as a WAV data URI.
//!
//! Always propagates failures: there is no sensible placeholder audio.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::flows::wav::{encode_wav, WavFormat};
use crate::flows::FlowDeps;
use crate::llm_client::SpeechAudio;
use crate::resilience::normalize::normalize_bytes;
use crate::resilience::GenerationFailure;

#[derive(Debug, Clone, Deserialize)]
pub struct NarrateRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationAudio {
    /// `data:audio/wav;base64,...`
    pub audio_data_uri: String,
}

pub async fn narrate(deps: &FlowDeps<'_>, text: &str) -> Result<NarrationAudio, GenerationFailure> {
    deps.invoker
        .invoke(
            "narrate",
            || deps.generator.generate_speech(text),
            |audio: SpeechAudio| {
                let format = WavFormat::from_mime(&audio.mime_type);
                normalize_bytes(audio.pcm).map(|pcm| encode_wav(&pcm, format))
            },
        )
        .await
        .map(|wav| NarrationAudio {
            audio_data_uri: format!("data:audio/wav;base64,{}", BASE64.encode(&wav)),
        })
}
