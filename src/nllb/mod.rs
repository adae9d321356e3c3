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

//! # NLLB-200 (No Language Left Behind)
//!
//! Resources and loading logic for the NLLB-200 translation models
//! (Costa-jussà et al., [No Language Left Behind: Scaling Human-Centered Machine Translation](https://arxiv.org/abs/2207.04672)).
//!
//! A model is named by an identifier, resolved by `NLLBModelResources::from_identifier`:
//! - a path to a local directory containing `rust_model.ot`, `config.json`, `tokenizer.json`,
//!   `sentencepiece.bpe.model` and `special_tokens_map.json`
//! - a published model name with known converted weights (`facebook/nllb-200-distilled-600M`,
//!   `facebook/nllb-200-1.3B`)
//! - any other `organization/name` repository of the Hugging Face hub holding the same files
//!
//! Remote files are downloaded once into the cache directory (see `nllb_translator::resources`).
//! The generation model runs on libtorch and requires the `torch` feature.
use crate::common::error::TranslatorError;
use crate::common::resources::{LocalResource, RemoteResource, ResourceProvider};
use crate::pipelines::hf_tokenizers::NLLBTokenizer;
use std::path::{Path, PathBuf};

#[cfg(feature = "torch")]
mod nllb_generator;

#[cfg(feature = "torch")]
pub use nllb_generator::{NLLBGenerationModel, NLLBTranslationModel};

/// Model loaded when no identifier is configured
pub const DEFAULT_MODEL: &str = PretrainedModel::NLLB_600M_DISTILLED.name;

/// # NLLB-200 checkpoint published with weights converted for libtorch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PretrainedModel {
    /// Identifier the model is published under
    pub name: &'static str,
    /// Repository holding the converted files
    pub repository_url: &'static str,
    /// Cache sub-directory of the model files
    pub cache_prefix: &'static str,
}

impl PretrainedModel {
    pub const NLLB_600M_DISTILLED: PretrainedModel = PretrainedModel {
        name: "facebook/nllb-200-distilled-600M",
        repository_url: "https://huggingface.co/datasets/vpermilp/nllb-200-distilled-600M-rust",
        cache_prefix: "nllb200-distilled-600m",
    };

    pub const NLLB_1_3B: PretrainedModel = PretrainedModel {
        name: "facebook/nllb-200-1.3B",
        repository_url: "https://huggingface.co/datasets/vpermilp/nllb-200-1.3B-rust",
        cache_prefix: "nllb200-1_3b",
    };

    pub const ALL: [PretrainedModel; 2] = [Self::NLLB_600M_DISTILLED, Self::NLLB_1_3B];

    pub fn from_name(name: &str) -> Option<PretrainedModel> {
        Self::ALL.into_iter().find(|model| model.name == name)
    }

    /// Remote model, configuration, vocabulary, merges and special token map files, in that order
    pub fn remote_resources(&self) -> [RemoteResource; 5] {
        remote_resources(self.repository_url, self.cache_prefix)
    }
}

const MODEL_FILE: &str = "rust_model.ot";
const CONFIG_FILE: &str = "config.json";
const VOCAB_FILE: &str = "tokenizer.json";
const MERGES_FILE: &str = "sentencepiece.bpe.model";
const SPECIAL_MAP_FILE: &str = "special_tokens_map.json";

/// Local paths of the files making up an NLLB model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NLLBModelFiles {
    pub model: PathBuf,
    pub config: PathBuf,
    pub vocab: PathBuf,
    pub merges: PathBuf,
    pub special_token_map: PathBuf,
}

/// # Resources (weights, configuration, tokenizer files) of an NLLB model
pub struct NLLBModelResources {
    pub model_resource: Box<dyn ResourceProvider + Send>,
    pub config_resource: Box<dyn ResourceProvider + Send>,
    pub vocab_resource: Box<dyn ResourceProvider + Send>,
    pub merges_resource: Box<dyn ResourceProvider + Send>,
    pub special_token_map_resource: Box<dyn ResourceProvider + Send>,
}

impl NLLBModelResources {
    /// Resolves a model identifier to the resources of the model. Nothing is downloaded yet.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use nllb_translator::nllb::NLLBModelResources;
    /// let resources = NLLBModelResources::from_identifier("facebook/nllb-200-distilled-600M")?;
    /// let files = resources.resolve()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_identifier(identifier: &str) -> Result<Self, TranslatorError> {
        let identifier = identifier.trim();
        let local_directory = Path::new(identifier);
        if local_directory.is_dir() {
            log::debug!("loading model files from {}", local_directory.display());
            return Ok(Self::from_directory(local_directory));
        }

        if let Some(pretrained) = PretrainedModel::from_name(identifier) {
            return Ok(Self::from_remote(pretrained.remote_resources()));
        }
        if is_hub_repository(identifier) {
            return Ok(Self::from_remote(hub_resources(identifier)));
        }
        Err(TranslatorError::InvalidConfigurationError(format!(
            "{identifier} is neither a local model directory nor a model repository name"
        )))
    }

    fn from_directory(directory: &Path) -> Self {
        let local = |file: &str| -> Box<dyn ResourceProvider + Send> {
            Box::new(LocalResource::from(directory.join(file)))
        };
        NLLBModelResources {
            model_resource: local(MODEL_FILE),
            config_resource: local(CONFIG_FILE),
            vocab_resource: local(VOCAB_FILE),
            merges_resource: local(MERGES_FILE),
            special_token_map_resource: local(SPECIAL_MAP_FILE),
        }
    }

    fn from_remote(resources: [RemoteResource; 5]) -> Self {
        let [model, config, vocab, merges, special_token_map] = resources;
        NLLBModelResources {
            model_resource: Box::new(model),
            config_resource: Box::new(config),
            vocab_resource: Box::new(vocab),
            merges_resource: Box::new(merges),
            special_token_map_resource: Box::new(special_token_map),
        }
    }

    /// Downloads (if needed) every resource and returns their local paths
    pub fn resolve(&self) -> Result<NLLBModelFiles, TranslatorError> {
        Ok(NLLBModelFiles {
            model: self.model_resource.get_local_path()?,
            config: self.config_resource.get_local_path()?,
            vocab: self.vocab_resource.get_local_path()?,
            merges: self.merges_resource.get_local_path()?,
            special_token_map: self.special_token_map_resource.get_local_path()?,
        })
    }

    /// Loads only the tokenizer of the model
    pub fn load_tokenizer(&self) -> Result<NLLBTokenizer, TranslatorError> {
        NLLBTokenizer::from_file(
            self.vocab_resource.get_local_path()?,
            self.special_token_map_resource.get_local_path()?,
        )
    }
}

fn remote_resources(repository_url: &str, cache_prefix: &str) -> [RemoteResource; 5] {
    [
        (MODEL_FILE, "model"),
        (CONFIG_FILE, "config"),
        (VOCAB_FILE, "vocab"),
        (MERGES_FILE, "merge"),
        (SPECIAL_MAP_FILE, "special"),
    ]
    .map(|(file, kind)| {
        RemoteResource::new(
            &format!("{repository_url}/resolve/main/{file}"),
            &format!("{cache_prefix}/{kind}"),
        )
    })
}

/// Files of a Hugging Face hub repository, cached under `organization--name`
fn hub_resources(repository: &str) -> [RemoteResource; 5] {
    remote_resources(
        &format!("https://huggingface.co/{repository}"),
        &repository.replace('/', "--").to_lowercase(),
    )
}

fn is_hub_repository(identifier: &str) -> bool {
    match identifier.split_once('/') {
        Some((organization, name)) => {
            let valid = |part: &str| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            };
            valid(organization) && valid(name)
        }
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn hub_repository_names() {
        assert!(is_hub_repository("facebook/nllb-200-3.3B"));
        assert!(is_hub_repository("my-org/nllb_finetuned"));
        assert!(!is_hub_repository("nllb"));
        assert!(!is_hub_repository("a/b/c"));
        assert!(!is_hub_repository("/b"));
        assert!(!is_hub_repository("org/with space"));
    }

    #[test]
    fn hub_repository_files() {
        let resources = hub_resources("my-org/nllb_ft");
        let expected = [
            ("rust_model.ot", "model"),
            ("config.json", "config"),
            ("tokenizer.json", "vocab"),
            ("sentencepiece.bpe.model", "merge"),
            ("special_tokens_map.json", "special"),
        ];
        for (resource, (file, kind)) in resources.iter().zip(expected) {
            assert_eq!(
                resource.url,
                format!("https://huggingface.co/my-org/nllb_ft/resolve/main/{file}")
            );
            assert_eq!(resource.cache_subdir, format!("my-org--nllb_ft/{kind}"));
        }
        assert!(NLLBModelResources::from_identifier("my-org/nllb_ft").is_ok());
    }

    #[test]
    fn pretrained_model_files() {
        assert_eq!(
            PretrainedModel::from_name(DEFAULT_MODEL),
            Some(PretrainedModel::NLLB_600M_DISTILLED)
        );
        assert_eq!(
            PretrainedModel::from_name("facebook/nllb-200-1.3B"),
            Some(PretrainedModel::NLLB_1_3B)
        );
        assert_eq!(PretrainedModel::from_name("facebook/nllb-200-3.3B"), None);

        let [model, _, vocab, _, special_token_map] =
            PretrainedModel::NLLB_1_3B.remote_resources();
        assert_eq!(
            model.url,
            "https://huggingface.co/datasets/vpermilp/nllb-200-1.3B-rust/resolve/main/rust_model.ot"
        );
        assert_eq!(vocab.cache_subdir, "nllb200-1_3b/vocab");
        assert_eq!(
            special_token_map.url,
            "https://huggingface.co/datasets/vpermilp/nllb-200-1.3B-rust/resolve/main/special_tokens_map.json"
        );
    }

    #[test]
    fn unresolvable_identifier_is_a_load_error() {
        let error = NLLBModelResources::from_identifier("not a model").err().unwrap();
        assert!(error.is_load_error());
        assert!(NLLBModelResources::from_identifier("").is_err());
    }

    #[test]
    fn local_directory_resolves_to_its_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for file in [MODEL_FILE, CONFIG_FILE, VOCAB_FILE, MERGES_FILE, SPECIAL_MAP_FILE] {
            fs::write(dir.path().join(file), "")?;
        }
        let identifier = dir.path().to_string_lossy().to_string();
        let files = NLLBModelResources::from_identifier(&identifier)?.resolve()?;
        assert_eq!(files.model, dir.path().join(MODEL_FILE));
        assert_eq!(files.vocab, dir.path().join(VOCAB_FILE));
        assert_eq!(files.special_token_map, dir.path().join(SPECIAL_MAP_FILE));
        Ok(())
    }

    #[test]
    fn local_directory_with_missing_weights_fails_to_resolve() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(VOCAB_FILE), "")?;
        let identifier = dir.path().to_string_lossy().to_string();
        let error = NLLBModelResources::from_identifier(&identifier)?
            .resolve()
            .unwrap_err();
        assert!(error.is_load_error());
        Ok(())
    }
}
