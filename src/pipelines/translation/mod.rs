//! # Translation pipeline
//!
//! Pipeline and utilities to translate a text from a source to a target language with a
//! pretrained NLLB-200 model. Languages are NLLB language codes (`LanguageCode`, e.g. `eng_Latn`
//! or `zho_Hans`); a `Language` enum covers the most common ones.
//! Configuration options include:
//! - Model identifier (published model name or local directory)
//! - Default source and target languages used by requests that do not specify them
//! - Generation options (number of beams, maximum length)
//! - Device placement (CPU or CUDA)
//!
//! A `TranslationModel` combines a `TranslationTokenizer` and a `GenerationModel`. The source
//! language is passed with every call rather than stored on the tokenizer, so one model can
//! serve several callers without their languages interfering.
//!
//! ```no_run
//! # #[cfg(feature = "torch")]
//! # fn main() -> anyhow::Result<()> {
//! use nllb_translator::nllb::NLLBTranslationModel;
//! use nllb_translator::pipelines::translation::{Language, TranslationConfig};
//!
//! let model = NLLBTranslationModel::from_config(&TranslationConfig::default())?;
//! let source_sentence = "This sentence will be translated in multiple languages.";
//!
//! let mut outputs = Vec::new();
//! outputs.push(model.translate(source_sentence, "eng_Latn", "fra_Latn")?);
//! outputs.push(model.translate(source_sentence, "eng_Latn", "spa_Latn")?);
//! outputs.push(model.translate_language(source_sentence, Language::English, Language::German)?);
//!
//! for sentence in outputs {
//!     println!("{}", sentence);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "torch"))]
//! # fn main() {}
//! ```
//!
//! Models backed by libtorch are best kept on a single thread. `TranslationService` runs the model
//! on a dedicated worker thread and exposes an async `translate`:
//!
//! ```no_run
//! # #[cfg(feature = "torch")]
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! use nllb_translator::nllb::NLLBTranslationModel;
//! use nllb_translator::pipelines::translation::{
//!     TranslationConfig, TranslationRequest, TranslationService,
//! };
//!
//! let (_handle, service) = TranslationService::spawn(|| {
//!     NLLBTranslationModel::from_config(&TranslationConfig::default())
//! })?;
//! let output = service
//!     .translate(TranslationRequest::new("The dog did not wake up.").from_language("eng_Latn"))
//!     .await?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "torch"))]
//! # fn main() {}
//! ```

mod language;
mod translation_pipeline;
mod translation_service;

pub use language::{Language, LanguageCode, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};
pub use translation_pipeline::{
    DeviceOption, TranslationConfig, TranslationModel, TranslationRequest,
};
pub use translation_service::TranslationService;
