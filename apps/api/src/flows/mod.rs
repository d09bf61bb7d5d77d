// Generation flows: explain, refine, narrate, resume.
// Every remote call goes through resilience::Invoker; no flow retries on its own.
// All model access goes through llm_client::Generator.

pub mod explain;
pub mod handlers;
pub mod narrate;
pub mod prompts;
pub mod refine;
pub mod resume;
pub mod wav;

use crate::llm_client::Generator;
use crate::resilience::{FailureMode, Invoker};

/// What a flow needs to run: a backend, a retry policy, and an optional
/// failure-mode override from config.
pub struct FlowDeps<'a> {
    pub generator: &'a dyn Generator,
    pub invoker: Invoker,
    pub failure_mode: Option<FailureMode>,
}

impl FlowDeps<'_> {
    /// The configured override, or the flow's own default.
    pub fn mode_or(&self, default: FailureMode) -> FailureMode {
        self.failure_mode.unwrap_or(default)
    }
}

#[cfg(test)]
pub mod testing {
    //! Scripted stand-ins for the remote collaborators.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::FlowDeps;
    use crate::llm_client::{Generator, LlmError, SpeechAudio};
    use crate::resilience::{FailureMode, Invoker, RetryPolicy};
    use crate::web_content::{ContentSource, ScrapeError};

    /// Replays queued results for each call and records the prompts it saw.
    #[derive(Default)]
    pub struct ScriptedGenerator {
        text: Mutex<VecDeque<Result<String, LlmError>>>,
        speech: Mutex<VecDeque<Result<SpeechAudio, LlmError>>>,
        calls: AtomicU32,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn with_text(results: Vec<Result<String, LlmError>>) -> Self {
            Self {
                text: Mutex::new(results.into()),
                ..Default::default()
            }
        }

        pub fn with_speech(results: Vec<Result<SpeechAudio, LlmError>>) -> Self {
            Self {
                speech: Mutex::new(results.into()),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate_text(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.text
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted text result left")
        }

        async fn generate_speech(&self, text: &str) -> Result<SpeechAudio, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(text.to_string());
            self.speech
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted speech result left")
        }
    }

    pub fn busy() -> LlmError {
        LlmError::Api {
            status: 503,
            message: "The model is overloaded. Please try again later.".to_string(),
        }
    }

    pub fn pcm(bytes: &'static [u8]) -> SpeechAudio {
        SpeechAudio {
            pcm: Bytes::from_static(bytes),
            mime_type: "audio/L16;codec=pcm;rate=24000".to_string(),
        }
    }

    /// Content source returning a fixed page, or failing.
    pub struct StaticSource {
        pub page: Option<String>,
        pub fetches: AtomicU32,
    }

    impl StaticSource {
        pub fn page(text: &str) -> Self {
            Self {
                page: Some(text.to_string()),
                fetches: AtomicU32::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                page: None,
                fetches: AtomicU32::new(0),
            }
        }

        pub fn fetches(&self) -> u32 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentSource for StaticSource {
        async fn fetch(&self, _url: &str) -> Result<String, ScrapeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.page.clone().ok_or(ScrapeError::Status(404))
        }
    }

    pub fn deps(generator: &ScriptedGenerator, failure_mode: Option<FailureMode>) -> FlowDeps<'_> {
        FlowDeps {
            generator,
            invoker: Invoker::new(RetryPolicy::new(3, Duration::from_millis(1000))),
            failure_mode,
        }
    }
}
