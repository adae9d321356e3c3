//! Translation of text between languages with pretrained NLLB-200 sequence-to-sequence models.
//!
//! The crate loads a model and its tokenizer once, then translates texts given a source and a
//! target language code (`eng_Latn`, `fra_Latn`, `zho_Hans`, ...). Tokenization, generation and
//! decoding are delegated to the model libraries:
//! - [tokenizers](https://github.com/huggingface/tokenizers) reads the `tokenizer.json` of the model
//! - [rust-bert](https://github.com/guillaume-be/rust-bert) runs the NLLB generator on
//!   [tch-rs](https://github.com/LaurentMazare/tch-rs) (feature `torch`)
//!
//! Model files are downloaded on first use and cached, by default under `~/.cache/.nllb-translator`.
//! The cache location can be changed by setting the `NLLB_TRANSLATOR_CACHE` environment variable.
//!
//! ```no_run
//! # #[cfg(feature = "torch")]
//! # fn main() -> anyhow::Result<()> {
//! use nllb_translator::nllb::NLLBTranslationModel;
//! use nllb_translator::pipelines::translation::TranslationConfig;
//!
//! let model = NLLBTranslationModel::from_config(&TranslationConfig::default())?;
//! let output = model.translate("Hello, how are you?", "eng_Latn", "fra_Latn")?;
//! println!("{output}");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "torch"))]
//! # fn main() {}
//! ```
//!
//! Translations can also go through any other backend implementing
//! `pipelines::common::TranslationTokenizer` and `pipelines::common::GenerationModel`.
//!
//! # Loading pretrained and custom model weights
//!
//! The model is named by `TranslationConfig::model`. Published names resolve to weights converted
//! for libtorch, other `organization/name` identifiers are fetched from the Hugging Face hub, and
//! a local directory is read directly. Such a directory must contain `rust_model.ot`,
//! `config.json`, `tokenizer.json`, `sentencepiece.bpe.model` and `special_tokens_map.json`.

pub mod common;
pub mod nllb;
pub mod pipelines;

pub use common::error::TranslatorError;
pub use common::resources;
pub use common::Config;
