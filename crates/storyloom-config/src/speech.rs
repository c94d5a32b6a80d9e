use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Speech synthesis provider configuration
///
/// The provider exposes two synthesis modes: an asynchronous long-form
/// task API (create, then poll, then download) and a synchronous
/// short-form endpoint limited to `chunk_chars` characters per call.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// Provider API key exchanged for a bearer token
    pub api_key: SecretString,
    /// Provider secret key exchanged for a bearer token
    pub secret_key: SecretString,
    /// Credential-exchange endpoint
    #[serde(default = "default_token_url")]
    pub token_url: Url,
    /// Long-form task creation endpoint
    #[serde(default = "default_create_url")]
    pub create_url: Url,
    /// Long-form task query endpoint
    #[serde(default = "default_query_url")]
    pub query_url: Url,
    /// Short-form synthesis endpoint
    #[serde(default = "default_short_form_url")]
    pub short_form_url: Url,
    /// Seconds a cached bearer token stays valid locally
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Maximum characters submitted to long-form synthesis; longer
    /// input is truncated, not split
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
    /// Characters per short-form chunk
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,
    /// Seconds between long-form task status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Maximum long-form status polls before falling back
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    /// Voice parameters shared by both synthesis modes
    #[serde(default)]
    pub voice: VoiceConfig,
}

/// Voice parameters for the speech provider
///
/// All scales are the provider's 0-15 range with 5 as the neutral
/// midpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceConfig {
    /// Long-form voice selector
    #[serde(default)]
    pub long_form_voice: u8,
    /// Short-form voice selector
    #[serde(default = "default_short_form_voice")]
    pub short_form_voice: u8,
    #[serde(default = "default_scale")]
    pub speed: u8,
    #[serde(default = "default_scale")]
    pub pitch: u8,
    #[serde(default = "default_scale")]
    pub volume: u8,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            long_form_voice: 0,
            short_form_voice: default_short_form_voice(),
            speed: default_scale(),
            pitch: default_scale(),
            volume: default_scale(),
        }
    }
}

fn default_token_url() -> Url {
    Url::parse("https://aip.baidubce.com/oauth/2.0/token").expect("must be a valid URL")
}

fn default_create_url() -> Url {
    Url::parse("https://aip.baidubce.com/rpc/2.0/tts/v1/create").expect("must be a valid URL")
}

fn default_query_url() -> Url {
    Url::parse("https://aip.baidubce.com/rpc/2.0/tts/v1/query").expect("must be a valid URL")
}

fn default_short_form_url() -> Url {
    Url::parse("https://tsn.baidu.com/text2audio").expect("must be a valid URL")
}

#[allow(clippy::missing_const_for_fn)]
fn default_token_ttl() -> u64 {
    600
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_text_chars() -> usize {
    10_000
}

#[allow(clippy::missing_const_for_fn)]
fn default_chunk_chars() -> usize {
    500
}

#[allow(clippy::missing_const_for_fn)]
fn default_poll_interval() -> u64 {
    3
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_polls() -> u32 {
    30
}

#[allow(clippy::missing_const_for_fn)]
fn default_short_form_voice() -> u8 {
    4
}

#[allow(clippy::missing_const_for_fn)]
fn default_scale() -> u8 {
    5
}
