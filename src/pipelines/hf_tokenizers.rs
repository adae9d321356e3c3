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

/// # Support for [tokenizers](https://github.com/huggingface/tokenizers)
///
/// NLLB checkpoints ship their tokenizer as a `tokenizer.json` file readable by the
/// [Tokenizers](https://github.com/huggingface/tokenizers) crate. Some of the special token logic is
/// implemented outside of that file, so two files are required:
/// - `tokenizer.json` containing the tokenizer model, pre- and post-processing options and vocabulary
/// - `special_tokens_map.json` containing the special tokens used by the model (end of sequence token
///   and the list of language codes)
///
/// The post-processor stored in `tokenizer.json` hardcodes a single source language. It is bypassed:
/// the language token and end of sequence marker are added by `NLLBTokenizer::encode` for the
/// language of each call.
use crate::common::error::TranslatorError;
use crate::pipelines::common::{EncodedInput, TranslationTokenizer};
use crate::pipelines::translation::LanguageCode;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tokenizers::tokenizer::Tokenizer as HFBaseTokenizer;

impl From<tokenizers::tokenizer::Error> for TranslatorError {
    fn from(error: tokenizers::tokenizer::Error) -> Self {
        TranslatorError::TokenizerError(error.to_string())
    }
}

/// Container for a special token map to be deserialized from a `special_tokens_map.json`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SpecialTokenMap {
    /// Optional unknown token
    #[serde(default, deserialize_with = "string_or_added_token_struct")]
    pub unk_token: Option<String>,
    /// Optional padding token
    #[serde(default, deserialize_with = "string_or_added_token_struct")]
    pub pad_token: Option<String>,
    /// Optional bos token
    #[serde(default, deserialize_with = "string_or_added_token_struct")]
    pub bos_token: Option<String>,
    /// Optional eos token
    #[serde(default, deserialize_with = "string_or_added_token_struct")]
    pub eos_token: Option<String>,
    /// Additional special tokens. For NLLB these are the language codes.
    #[serde(default, deserialize_with = "added_token_list")]
    pub additional_special_tokens: Vec<String>,
}

impl SpecialTokenMap {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TranslatorError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TranslatorError::IOError(format!(
                "{} special token map file not found :{e}",
                path.display()
            ))
        })?;
        let br = BufReader::new(f);
        Ok(serde_json::from_reader(br)?)
    }
}

/// Special tokens are written either as plain strings or as serialized `AddedToken` structures
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenRepr {
    Content(String),
    AddedToken { content: String },
}

impl From<TokenRepr> for String {
    fn from(token: TokenRepr) -> Self {
        match token {
            TokenRepr::Content(content) | TokenRepr::AddedToken { content } => content,
        }
    }
}

fn string_or_added_token_struct<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TokenRepr>::deserialize(deserializer)?.map(String::from))
}

fn added_token_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TokenRepr>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect())
}

/// # NLLB tokenizer backed by a `tokenizer.json` file
pub struct NLLBTokenizer {
    tokenizer: HFBaseTokenizer,
    language_codes: BTreeSet<String>,
    eos_token_id: i64,
}

impl NLLBTokenizer {
    /// Create a new tokenizer from a file.
    ///
    /// # Arguments
    /// - `tokenizer_file` path to location containing the tokenizer model, pre- and post-processing options and vocabulary
    /// - `special_token_map` path to location containing a mapping of the special tokens used by the model
    ///
    /// # Example
    ///
    /// ```no_run
    ///  # fn main() -> anyhow::Result<()> {
    /// use nllb_translator::pipelines::hf_tokenizers::NLLBTokenizer;
    /// use std::path::PathBuf;
    /// let tokenizer_file_path = PathBuf::from("path/to/tokenizer.json");
    /// let special_token_map_path = PathBuf::from("path/to/special_tokens_map.json");
    /// let tokenizer = NLLBTokenizer::from_file(tokenizer_file_path, special_token_map_path)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>, S: AsRef<Path>>(
        tokenizer_file: P,
        special_token_map: S,
    ) -> Result<Self, TranslatorError> {
        let tokenizer_file = tokenizer_file.as_ref();
        let tokenizer = HFBaseTokenizer::from_file(tokenizer_file).map_err(|e| {
            TranslatorError::LoadError(format!(
                "could not read tokenizer file {}: {e}",
                tokenizer_file.display()
            ))
        })?;
        let special_token_map = SpecialTokenMap::from_file(special_token_map)?;
        Self::new(tokenizer, special_token_map)
    }

    pub fn new(
        tokenizer: HFBaseTokenizer,
        special_token_map: SpecialTokenMap,
    ) -> Result<Self, TranslatorError> {
        let eos_token = special_token_map.eos_token.as_deref().unwrap_or("</s>");
        let eos_token_id = tokenizer.token_to_id(eos_token).ok_or_else(|| {
            TranslatorError::InvalidConfigurationError(format!(
                "end of sequence token {eos_token} missing from the tokenizer vocabulary"
            ))
        })? as i64;
        let language_codes = special_token_map
            .additional_special_tokens
            .into_iter()
            .filter(|token| tokenizer.token_to_id(token).is_some())
            .collect::<BTreeSet<String>>();
        log::debug!(
            "loaded tokenizer with {} language codes",
            language_codes.len()
        );
        Ok(NLLBTokenizer {
            tokenizer,
            language_codes,
            eos_token_id,
        })
    }

    /// Language codes listed by the special token map, in lexicographic order
    pub fn supported_languages(&self) -> Vec<LanguageCode> {
        self.language_codes
            .iter()
            .map(|code| LanguageCode::new(code.as_str()))
            .collect()
    }

    pub fn eos_token_id(&self) -> i64 {
        self.eos_token_id
    }

    fn is_language_code(&self, language: &LanguageCode) -> bool {
        if self.language_codes.is_empty() {
            language.is_well_formed()
        } else {
            self.language_codes.contains(language.as_str())
        }
    }
}

impl TranslationTokenizer for NLLBTokenizer {
    fn encode(
        &self,
        text: &str,
        source_language: &LanguageCode,
    ) -> Result<EncodedInput, TranslatorError> {
        let source_language_id = self.language_token_id(source_language)?;
        let encoding = self.tokenizer.encode(text, false)?;

        let mut token_ids = Vec::with_capacity(encoding.len() + 2);
        token_ids.push(source_language_id);
        token_ids.extend(encoding.get_ids().iter().map(|token_id| *token_id as i64));
        token_ids.push(self.eos_token_id);
        log::trace!("encoded {} tokens for {source_language}", token_ids.len());
        Ok(EncodedInput { token_ids })
    }

    fn language_token_id(&self, language: &LanguageCode) -> Result<i64, TranslatorError> {
        if !self.is_language_code(language) {
            return Err(TranslatorError::UnknownLanguage(language.to_string()));
        }
        self.tokenizer
            .token_to_id(language.as_str())
            .map(|token_id| token_id as i64)
            .ok_or_else(|| TranslatorError::UnknownLanguage(language.to_string()))
    }

    fn decode(
        &self,
        token_ids: &[i64],
        skip_special_tokens: bool,
    ) -> Result<String, TranslatorError> {
        let token_ids = token_ids
            .iter()
            .map(|token_id| {
                u32::try_from(*token_id).map_err(|_| {
                    TranslatorError::TokenizerError(format!("invalid token id {token_id}"))
                })
            })
            .collect::<Result<Vec<u32>, TranslatorError>>()?;
        Ok(self.tokenizer.decode(&token_ids, skip_special_tokens)?)
    }
}
