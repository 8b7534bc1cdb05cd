//! Provider selection
//!
//! Decides which hosted backend handles transcription, synthesis and language
//! modelling for a session, based only on which credentials are present.

use secrecy::SecretString;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Deepgram acoustic model used when Deepgram handles transcription.
pub const DEEPGRAM_STT_MODEL: &str = "nova-2";
/// Groq synthesis model used when Cartesia is unavailable.
pub const GROQ_TTS_MODEL: &str = "playai-tts";
/// Groq chat model used for every session.
pub const GROQ_LLM_MODEL: &str = "llama-3.3-70b-versatile";
/// Groq's OpenAI-compatible API base.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// API keys for the hosted speech and language providers.
///
/// The Groq key is mandatory and must be validated before this value is built.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub groq_api_key: SecretString,
    pub deepgram_api_key: Option<SecretString>,
    pub cartesia_api_key: Option<SecretString>,
}

impl Credentials {
    pub fn has_deepgram(&self) -> bool {
        self.deepgram_api_key.is_some()
    }

    pub fn has_cartesia(&self) -> bool {
        self.cartesia_api_key.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum SttBackend {
    Deepgram { model: String },
    Groq,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum TtsBackend {
    /// Cartesia with its default voice.
    Cartesia,
    Groq { model: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum LlmBackend {
    Groq { model: String },
}

impl fmt::Display for SttBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SttBackend::Deepgram { model } => write!(f, "Deepgram ({model})"),
            SttBackend::Groq => write!(f, "Groq"),
        }
    }
}

impl fmt::Display for TtsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtsBackend::Cartesia => write!(f, "Cartesia (default voice)"),
            TtsBackend::Groq { model } => write!(f, "Groq ({model})"),
        }
    }
}

impl fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmBackend::Groq { model } => write!(f, "Groq ({model})"),
        }
    }
}

impl LlmBackend {
    pub fn model(&self) -> &str {
        match self {
            LlmBackend::Groq { model } => model,
        }
    }

    pub fn api_base(&self) -> &'static str {
        match self {
            LlmBackend::Groq { .. } => GROQ_API_BASE,
        }
    }
}

/// One backend per capability, chosen once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderPlan {
    pub stt: SttBackend,
    pub tts: TtsBackend,
    pub llm: LlmBackend,
}

/// Picks the backends for a session.
///
/// Deepgram is preferred for transcription and Cartesia for synthesis; each
/// falls back to Groq when its key is missing. The language model is always Groq.
pub fn select_providers(credentials: &Credentials) -> ProviderPlan {
    let stt = if credentials.has_deepgram() {
        info!("Using Deepgram for STT");
        SttBackend::Deepgram {
            model: DEEPGRAM_STT_MODEL.to_string(),
        }
    } else {
        info!("Using Groq for STT");
        SttBackend::Groq
    };

    let tts = if credentials.has_cartesia() {
        info!("Using Cartesia for TTS");
        TtsBackend::Cartesia
    } else {
        info!("Using Groq for TTS");
        TtsBackend::Groq {
            model: GROQ_TTS_MODEL.to_string(),
        }
    };

    info!("Using Groq for LLM");
    let llm = LlmBackend::Groq {
        model: GROQ_LLM_MODEL.to_string(),
    };

    ProviderPlan { stt, tts, llm }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(deepgram: bool, cartesia: bool) -> Credentials {
        Credentials {
            groq_api_key: SecretString::from("groq-key".to_string()),
            deepgram_api_key: deepgram.then(|| SecretString::from("deepgram-key".to_string())),
            cartesia_api_key: cartesia.then(|| SecretString::from("cartesia-key".to_string())),
        }
    }

    fn deepgram() -> SttBackend {
        SttBackend::Deepgram {
            model: "nova-2".to_string(),
        }
    }

    fn groq_tts() -> TtsBackend {
        TtsBackend::Groq {
            model: "playai-tts".to_string(),
        }
    }

    #[test]
    fn test_all_credential_combinations() {
        let cases = [
            (true, true, deepgram(), TtsBackend::Cartesia),
            (true, false, deepgram(), groq_tts()),
            (false, true, SttBackend::Groq, TtsBackend::Cartesia),
            (false, false, SttBackend::Groq, groq_tts()),
        ];

        for (has_deepgram, has_cartesia, stt, tts) in cases {
            let plan = select_providers(&credentials(has_deepgram, has_cartesia));
            assert_eq!(plan.stt, stt, "deepgram={has_deepgram} cartesia={has_cartesia}");
            assert_eq!(plan.tts, tts, "deepgram={has_deepgram} cartesia={has_cartesia}");
        }
    }

    #[test]
    fn test_llm_never_branches() {
        for (d, c) in [(true, true), (false, false), (true, false), (false, true)] {
            let plan = select_providers(&credentials(d, c));
            assert_eq!(plan.llm.model(), "llama-3.3-70b-versatile");
            assert_eq!(plan.llm.api_base(), GROQ_API_BASE);
        }
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let rendered = format!("{:?}", credentials(true, true));
        assert!(!rendered.contains("groq-key"));
        assert!(!rendered.contains("deepgram-key"));
    }

    #[test]
    fn test_plan_display_and_serialization() {
        let plan = select_providers(&credentials(true, false));
        assert_eq!(plan.stt.to_string(), "Deepgram (nova-2)");
        assert_eq!(plan.tts.to_string(), "Groq (playai-tts)");

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["stt"]["provider"], "deepgram");
        assert_eq!(json["stt"]["model"], "nova-2");
        assert_eq!(json["llm"]["model"], "llama-3.3-70b-versatile");
    }
}
