/*!
 * Speech synthesis backends.
 *
 * This module contains the backend abstraction used by the narration
 * synthesizer plus the network-backed implementation. Backends produce raw
 * encoded audio bytes; asset bookkeeping lives in the narration module.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::SynthesisError;

/// Common trait for speech synthesis backends
///
/// This trait defines the interface all backend implementations must follow,
/// allowing the narration synthesizer to use them interchangeably (and tests
/// to substitute a mock).
#[async_trait]
pub trait SpeechBackend: Send + Sync + Debug {
    /// Synthesize the given text into encoded audio bytes
    ///
    /// # Arguments
    /// * `text` - The utterance to synthesize, never empty
    /// * `language` - ISO 639-1 language code
    ///
    /// # Returns
    /// * `Result<Vec<u8>, SynthesisError>` - Encoded audio or an error
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, SynthesisError>;

    /// Human-readable backend name for diagnostics
    fn name(&self) -> &'static str;
}

pub mod gtts;
