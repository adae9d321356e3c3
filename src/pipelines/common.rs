// Copyright 2022 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Seams between the translation pipeline and the model library
//!
//! A translation needs two collaborators: a tokenizer converting text to and from token ids, and
//! a sequence-to-sequence model generating output token ids. Both are loaded once and then only
//! read, so the traits take `&self` everywhere. The source language is an explicit argument of
//! `TranslationTokenizer::encode` rather than a setting stored on the tokenizer, which lets a
//! single loaded tokenizer serve concurrent requests in different languages.
use crate::common::error::TranslatorError;
use crate::pipelines::translation::LanguageCode;

/// # Model input produced by a `TranslationTokenizer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    /// Token ids, including the source language token and end of sequence marker
    pub token_ids: Vec<i64>,
}

impl EncodedInput {
    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }
}

/// # Tokenizer side of a translation model
pub trait TranslationTokenizer {
    /// Encodes `text` written in `source_language` into model input ids.
    ///
    /// Fails with `TranslatorError::UnknownLanguage` if the source language is not part of the
    /// tokenizer vocabulary.
    fn encode(
        &self,
        text: &str,
        source_language: &LanguageCode,
    ) -> Result<EncodedInput, TranslatorError>;

    /// Returns the token id of a language code, used as the forced first generated token.
    fn language_token_id(&self, language: &LanguageCode) -> Result<i64, TranslatorError>;

    /// Decodes generated token ids back into text.
    fn decode(&self, token_ids: &[i64], skip_special_tokens: bool)
        -> Result<String, TranslatorError>;
}

/// # Generation side of a translation model
pub trait GenerationModel {
    /// Generates output sequences for `input`, the first generated token being forced to
    /// `forced_bos_token_id`. Returns at least one sequence on success.
    fn generate(
        &self,
        input: &EncodedInput,
        forced_bos_token_id: i64,
    ) -> Result<Vec<Vec<i64>>, TranslatorError>;
}

impl<T: TranslationTokenizer + ?Sized> TranslationTokenizer for Box<T> {
    fn encode(
        &self,
        text: &str,
        source_language: &LanguageCode,
    ) -> Result<EncodedInput, TranslatorError> {
        (**self).encode(text, source_language)
    }

    fn language_token_id(&self, language: &LanguageCode) -> Result<i64, TranslatorError> {
        (**self).language_token_id(language)
    }

    fn decode(
        &self,
        token_ids: &[i64],
        skip_special_tokens: bool,
    ) -> Result<String, TranslatorError> {
        (**self).decode(token_ids, skip_special_tokens)
    }
}

impl<G: GenerationModel + ?Sized> GenerationModel for Box<G> {
    fn generate(
        &self,
        input: &EncodedInput,
        forced_bos_token_id: i64,
    ) -> Result<Vec<Vec<i64>>, TranslatorError> {
        (**self).generate(input, forced_bos_token_id)
    }
}
