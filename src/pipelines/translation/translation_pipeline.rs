// Copyright 2019-2020 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::common::error::TranslatorError;
use crate::nllb::DEFAULT_MODEL;
use crate::pipelines::common::{GenerationModel, TranslationTokenizer};
use crate::pipelines::translation::language::{
    Language, LanguageCode, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE,
};
use crate::Config;
use serde::{Deserialize, Serialize};

/// # Device to place the model on
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceOption {
    Cpu,
    /// CUDA device with the given index
    Cuda(usize),
    /// First CUDA device if one is available, CPU otherwise
    #[default]
    CudaIfAvailable,
}

/// # Configuration for text translation
/// Contains information regarding the model to load, the languages used when a request does not
/// specify them, generation options and device placement (CPU/GPU).
///
/// All fields have defaults, so a configuration file only needs to list the values it changes:
///
/// ```json
/// { "model": "facebook/nllb-200-1.3B", "default_target_language": "deu_Latn", "device": "cpu" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Published model name (e.g. `facebook/nllb-200-distilled-600M`) or path to a local directory
    pub model: String,
    /// Source language used when a request omits it (default: `eng_Latn`)
    pub default_source_language: LanguageCode,
    /// Target language used when a request omits it (default: `fra_Latn`)
    pub default_target_language: LanguageCode,
    /// Number of beams for beam search. 1 performs greedy (deterministic) decoding (default: 1)
    pub num_beams: i64,
    /// Maximum generated sequence length (default: 200)
    pub max_length: i64,
    /// Device to place the model on (default: CUDA/GPU when available)
    pub device: DeviceOption,
}

impl Config for TranslationConfig {}

impl Default for TranslationConfig {
    fn default() -> TranslationConfig {
        TranslationConfig {
            model: DEFAULT_MODEL.to_string(),
            default_source_language: LanguageCode::from(DEFAULT_SOURCE_LANGUAGE),
            default_target_language: LanguageCode::from(DEFAULT_TARGET_LANGUAGE),
            num_beams: 1,
            max_length: 200,
            device: DeviceOption::default(),
        }
    }
}

impl TranslationConfig {
    pub fn validate(&self) -> Result<(), TranslatorError> {
        if self.model.trim().is_empty() {
            return Err(TranslatorError::InvalidConfigurationError(
                "model identifier cannot be empty".to_string(),
            ));
        }
        if self.num_beams < 1 {
            return Err(TranslatorError::InvalidConfigurationError(format!(
                "num_beams must be at least 1, got {}",
                self.num_beams
            )));
        }
        if self.max_length < 1 {
            return Err(TranslatorError::InvalidConfigurationError(format!(
                "max_length must be at least 1, got {}",
                self.max_length
            )));
        }
        Ok(())
    }
}

/// # Single translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Language of `text`, the configured default if `None`
    #[serde(default)]
    pub source_language: Option<LanguageCode>,
    /// Language to translate to, the configured default if `None`
    #[serde(default)]
    pub target_language: Option<LanguageCode>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        TranslationRequest {
            text: text.into(),
            source_language: None,
            target_language: None,
        }
    }

    pub fn from_language(mut self, language: impl Into<LanguageCode>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    pub fn to_language(mut self, language: impl Into<LanguageCode>) -> Self {
        self.target_language = Some(language.into());
        self
    }
}

/// # TranslationModel to perform translation
///
/// Holds a loaded tokenizer and generation model. Both are only borrowed immutably when
/// translating: languages travel with each call, so a `TranslationModel` can be shared
/// (e.g. behind an `Arc`) by concurrent callers whenever its backends are `Sync`.
pub struct TranslationModel<T, G> {
    tokenizer: T,
    model: G,
    default_source_language: LanguageCode,
    default_target_language: LanguageCode,
}

impl<T, G> TranslationModel<T, G>
where
    T: TranslationTokenizer,
    G: GenerationModel,
{
    /// Build a new `TranslationModel` from already loaded components
    ///
    /// # Arguments
    ///
    /// * `tokenizer` - tokenizer of the model
    /// * `model` - generation model
    /// * `config` - `TranslationConfig` providing the default source and target languages
    pub fn new(tokenizer: T, model: G, config: &TranslationConfig) -> TranslationModel<T, G> {
        TranslationModel {
            tokenizer,
            model,
            default_source_language: config.default_source_language.clone(),
            default_target_language: config.default_target_language.clone(),
        }
    }

    pub fn default_source_language(&self) -> &LanguageCode {
        &self.default_source_language
    }

    pub fn default_target_language(&self) -> &LanguageCode {
        &self.default_target_language
    }

    pub fn get_tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Translates a text from a source to a target language
    ///
    /// Empty or whitespace-only texts translate to an empty string without running generation,
    /// once both languages have been checked.
    ///
    /// # Arguments
    /// * `text` - text to translate
    /// * `source_language` - language code of `text` (e.g. `eng_Latn`)
    /// * `target_language` - language code to translate to (e.g. `fra_Latn`)
    ///
    /// # Returns
    /// * `String` first translation produced by the model
    ///
    /// # Example
    ///
    /// ```no_run
    /// # #[cfg(feature = "torch")]
    /// # fn main() -> anyhow::Result<()> {
    /// use nllb_translator::nllb::NLLBTranslationModel;
    /// use nllb_translator::pipelines::translation::TranslationConfig;
    ///
    /// let model = NLLBTranslationModel::from_config(&TranslationConfig::default())?;
    /// let output = model.translate("Hello, how are you?", "eng_Latn", "fra_Latn")?;
    /// # Ok(())
    /// # }
    /// # #[cfg(not(feature = "torch"))]
    /// # fn main() {}
    /// ```
    pub fn translate(
        &self,
        text: &str,
        source_language: impl Into<LanguageCode>,
        target_language: impl Into<LanguageCode>,
    ) -> Result<String, TranslatorError> {
        let source_language = source_language.into();
        let target_language = target_language.into();
        log::debug!(
            "translating {} characters from {source_language} to {target_language}",
            text.chars().count()
        );

        let forced_bos_token_id = self.tokenizer.language_token_id(&target_language)?;
        if text.trim().is_empty() {
            self.tokenizer.language_token_id(&source_language)?;
            log::debug!("empty input, skipping generation");
            return Ok(String::new());
        }

        let encoded = self.tokenizer.encode(text, &source_language)?;
        log::trace!(
            "generating from {} input tokens, forced first token {forced_bos_token_id}",
            encoded.len()
        );
        let generated = self.model.generate(&encoded, forced_bos_token_id)?;
        let first = generated.first().ok_or_else(|| {
            TranslatorError::GenerationError("model returned no output sequence".to_string())
        })?;

        let output = self.tokenizer.decode(first, true)?;
        Ok(output.trim().to_string())
    }

    /// Translates a `TranslationRequest`, filling in the default languages for missing values
    pub fn translate_request(
        &self,
        request: &TranslationRequest,
    ) -> Result<String, TranslatorError> {
        let source_language = request
            .source_language
            .as_ref()
            .unwrap_or(&self.default_source_language);
        let target_language = request
            .target_language
            .as_ref()
            .unwrap_or(&self.default_target_language);
        self.translate(&request.text, source_language, target_language)
    }

    /// Translates between two languages of the `Language` enum
    pub fn translate_language(
        &self,
        text: &str,
        source_language: Language,
        target_language: Language,
    ) -> Result<String, TranslatorError> {
        self.translate(text, source_language, target_language)
    }
}
