//! # Translation pipeline and its model backends
//!
//! - `common`: traits implemented by the tokenizer and generation model backends
//! - `hf_tokenizers`: NLLB tokenizer read from a `tokenizer.json` file
//! - `translation`: the translation model, its configuration and an async service wrapper

pub mod common;
pub mod hf_tokenizers;
pub mod translation;
