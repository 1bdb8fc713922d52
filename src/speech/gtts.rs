use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::SpeechBackend;
use crate::errors::SynthesisError;

/// Endpoint of the Google Translate text-to-speech service
const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Client identifier the endpoint expects
const TTS_CLIENT: &str = "tw-ob";

/// Network-backed speech synthesizer using the Google Translate TTS service.
///
/// The service caps the utterance length per request, so longer narration is
/// split into chunks at whitespace boundaries and the returned MP3 payloads
/// are concatenated. MP3 frames are self-contained, so plain byte
/// concatenation yields a valid stream.
#[derive(Debug)]
pub struct GoogleSpeech {
    /// HTTP client for making requests
    client: Client,
    /// Per-request timeout
    timeout: Duration,
    /// Maximum characters per request
    max_chars_per_request: usize,
}

impl GoogleSpeech {
    /// Create a new backend with the given timeout and chunk size
    pub fn new(timeout_secs: u64, max_chars_per_request: usize) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(timeout_secs),
            max_chars_per_request,
        }
    }

    /// Split text into request-sized chunks at whitespace boundaries.
    ///
    /// A single word longer than the limit is emitted as its own oversized
    /// chunk rather than being split mid-word.
    pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Build the request URL for one chunk
    fn request_url(
        &self,
        chunk: &str,
        language: &str,
        idx: usize,
        total: usize,
    ) -> Result<Url, SynthesisError> {
        Url::parse_with_params(
            TTS_ENDPOINT,
            &[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language),
                ("client", TTS_CLIENT),
                ("idx", &idx.to_string()),
                ("total", &total.to_string()),
                ("textlen", &chunk.chars().count().to_string()),
            ],
        )
        .map_err(|e| SynthesisError::RequestFailed(e.to_string()))
    }

    /// Fetch the audio bytes for one chunk
    async fn fetch_chunk(&self, url: Url) -> Result<Vec<u8>, SynthesisError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    SynthesisError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::BackendStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SynthesisError::Timeout {
                    seconds: self.timeout.as_secs(),
                }
            } else {
                SynthesisError::RequestFailed(e.to_string())
            }
        })?;

        if bytes.is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechBackend for GoogleSpeech {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError> {
        let chunks = Self::chunk_text(text, self.max_chars_per_request);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyResponse);
        }

        debug!(
            "Synthesizing {} chars in {} request(s), language '{}'",
            text.chars().count(),
            chunks.len(),
            language
        );

        let total = chunks.len();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.request_url(chunk, language, idx, total)?;
            let bytes = self.fetch_chunk(url).await?;
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "google-translate-tts"
    }
}
