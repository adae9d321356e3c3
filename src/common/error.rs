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

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TranslatorError {
    #[error("Endpoint not available error: {0}")]
    FileDownloadError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Invalid configuration error: {0}")]
    InvalidConfigurationError(String),

    #[error("Tokenizer error: {0}")]
    TokenizerError(String),

    #[error("Model loading error: {0}")]
    LoadError(String),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Translation service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl TranslatorError {
    /// Returns `true` for failures raised while resolving or loading the model and tokenizer.
    ///
    /// These are fatal to the whole process: no request can be served without a loaded model.
    /// Every other variant is scoped to the request that raised it.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            TranslatorError::FileDownloadError(_)
                | TranslatorError::IOError(_)
                | TranslatorError::InvalidConfigurationError(_)
                | TranslatorError::LoadError(_)
        )
    }
}

impl From<std::io::Error> for TranslatorError {
    fn from(error: std::io::Error) -> Self {
        TranslatorError::IOError(error.to_string())
    }
}

impl From<cached_path::Error> for TranslatorError {
    fn from(error: cached_path::Error) -> Self {
        TranslatorError::FileDownloadError(error.to_string())
    }
}

impl From<serde_json::Error> for TranslatorError {
    fn from(error: serde_json::Error) -> Self {
        TranslatorError::InvalidConfigurationError(error.to_string())
    }
}

#[cfg(feature = "torch")]
impl From<rust_bert::RustBertError> for TranslatorError {
    fn from(error: rust_bert::RustBertError) -> Self {
        match error {
            rust_bert::RustBertError::FileDownloadError(message) => {
                TranslatorError::FileDownloadError(message)
            }
            rust_bert::RustBertError::IOError(message) => TranslatorError::IOError(message),
            rust_bert::RustBertError::InvalidConfigurationError(message) => {
                TranslatorError::InvalidConfigurationError(message)
            }
            rust_bert::RustBertError::TokenizerError(message) => {
                TranslatorError::TokenizerError(message)
            }
            other => TranslatorError::GenerationError(other.to_string()),
        }
    }
}

#[cfg(feature = "torch")]
impl From<tch::TchError> for TranslatorError {
    fn from(error: tch::TchError) -> Self {
        TranslatorError::GenerationError(error.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn load_errors_are_distinguished_from_request_errors() {
        assert!(TranslatorError::FileDownloadError("404".into()).is_load_error());
        assert!(TranslatorError::IOError("missing".into()).is_load_error());
        assert!(TranslatorError::LoadError("corrupt weights".into()).is_load_error());
        assert!(!TranslatorError::TokenizerError("bad id".into()).is_load_error());
        assert!(!TranslatorError::UnknownLanguage("xxx_Yyyy".into()).is_load_error());
        assert!(!TranslatorError::GenerationError("oom".into()).is_load_error());
    }

    #[test]
    fn unknown_language_message_names_the_code() {
        let error = TranslatorError::UnknownLanguage("klingon".to_string());
        assert_eq!(error.to_string(), "Unknown language: klingon");
    }
}
