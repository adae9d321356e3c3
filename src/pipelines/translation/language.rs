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

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Source language used when a request does not name one
pub const DEFAULT_SOURCE_LANGUAGE: &str = "eng_Latn";
/// Target language used when a request does not name one
pub const DEFAULT_TARGET_LANGUAGE: &str = "fra_Latn";

/// # Language and script identifier understood by the translation model (e.g. `eng_Latn`)
///
/// The code is opaque: it is not checked against any list when created. Whether a code is known
/// is decided by the tokenizer of the loaded model when a translation is requested, and unknown
/// codes fail with `TranslatorError::UnknownLanguage`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        LanguageCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks the FLORES-200 shape of the code: ISO 639-3 language, underscore, ISO 15924 script
    /// (`eng_Latn`, `zho_Hans`).
    pub fn is_well_formed(&self) -> bool {
        match self.0.split_once('_') {
            Some((language, script)) => {
                language.len() == 3
                    && language.chars().all(|c| c.is_ascii_lowercase())
                    && script.len() == 4
                    && script.starts_with(|c: char| c.is_ascii_uppercase())
                    && script.chars().skip(1).all(|c| c.is_ascii_lowercase())
            }
            None => false,
        }
    }
}

impl Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        LanguageCode::new(code)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        LanguageCode(code)
    }
}

impl From<&LanguageCode> for LanguageCode {
    fn from(code: &LanguageCode) -> Self {
        code.clone()
    }
}

impl From<Language> for LanguageCode {
    fn from(language: Language) -> Self {
        LanguageCode::new(language.get_nllb_code())
    }
}

impl FromStr for LanguageCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LanguageCode::new(s))
    }
}

/// Language
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    French,
    German,
    Spanish,
    Chinese,
    Japanese,
    Korean,
    Portuguese,
    Italian,
    Dutch,
    Russian,
    Swedish,
    Norwegian,
    Danish,
}

impl Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl Language {
    #[rustfmt::skip]
    pub const ALL: [Language; 14] = [
        Language::English, Language::French, Language::German, Language::Spanish,
        Language::Chinese, Language::Japanese, Language::Korean, Language::Portuguese,
        Language::Italian, Language::Dutch, Language::Russian, Language::Swedish,
        Language::Norwegian, Language::Danish,
    ];

    pub fn get_nllb_code(&self) -> &'static str {
        match self {
            Language::English => "eng_Latn",
            Language::French => "fra_Latn",
            Language::German => "deu_Latn",
            Language::Spanish => "spa_Latn",
            Language::Chinese => "zho_Hans",
            Language::Japanese => "jpn_Jpan",
            Language::Korean => "kor_Hang",
            Language::Portuguese => "por_Latn",
            Language::Italian => "ita_Latn",
            Language::Dutch => "nld_Latn",
            Language::Russian => "rus_Cyrl",
            Language::Swedish => "swe_Latn",
            Language::Norwegian => "nob_Latn",
            Language::Danish => "dan_Latn",
        }
    }

    pub fn get_iso_639_1_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Portuguese => "pt",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Russian => "ru",
            Language::Swedish => "sv",
            Language::Norwegian => "no",
            Language::Danish => "da",
        }
    }

    /// Looks up the language for an NLLB code, `None` for codes outside of this enum.
    pub fn from_nllb_code(code: &str) -> Option<Language> {
        Language::ALL
            .iter()
            .find(|language| language.get_nllb_code() == code)
            .copied()
    }
}
