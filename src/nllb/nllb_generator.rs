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

use crate::common::error::TranslatorError;
use crate::nllb::{NLLBModelFiles, NLLBModelResources};
use crate::pipelines::common::{EncodedInput, GenerationModel};
use crate::pipelines::hf_tokenizers::NLLBTokenizer;
use crate::pipelines::translation::{DeviceOption, TranslationConfig, TranslationModel};
use rust_bert::nllb::{NLLBGenerator, NLLBLanguages};
use rust_bert::pipelines::common::{ModelResource, ModelType, TokenizerOption};
use rust_bert::pipelines::generation_utils::{GenerateOptions, LanguageGenerator};
use rust_bert::pipelines::translation::TranslationConfig as GeneratorConfig;
use rust_bert::resources::LocalResource;
use rust_bert::RustBertError;
use std::path::Path;
use tch::{Device, Tensor};

/// # NLLB translation model on libtorch
pub type NLLBTranslationModel = TranslationModel<NLLBTokenizer, NLLBGenerationModel>;

impl From<DeviceOption> for Device {
    fn from(device: DeviceOption) -> Self {
        match device {
            DeviceOption::Cpu => Device::Cpu,
            DeviceOption::Cuda(index) => Device::Cuda(index),
            DeviceOption::CudaIfAvailable => Device::cuda_if_available(),
        }
    }
}

/// # Sequence-to-sequence generation with an NLLB model
pub struct NLLBGenerationModel {
    generator: NLLBGenerator,
    device: Device,
}

impl NLLBGenerationModel {
    /// Loads the weights listed in `files` with the generation settings of `config`.
    /// Decoding never samples, so outputs are deterministic for a given model.
    pub fn new(
        files: &NLLBModelFiles,
        config: &TranslationConfig,
    ) -> Result<NLLBGenerationModel, TranslatorError> {
        let device = Device::from(config.device);
        let mut generator_config = GeneratorConfig::new(
            ModelType::NLLB,
            ModelResource::Torch(Box::new(local(&files.model))),
            local(&files.config),
            local(&files.vocab),
            Some(local(&files.merges)),
            NLLBLanguages::NLLB,
            NLLBLanguages::NLLB,
            device,
        );
        generator_config.num_beams = config.num_beams;
        generator_config.max_length = Some(config.max_length);
        generator_config.do_sample = false;

        let tokenizer = TokenizerOption::from_file(
            ModelType::NLLB,
            path_str(&files.vocab)?,
            Some(path_str(&files.merges)?),
            false,
            None,
            None,
        )
        .map_err(load_error)?;
        let generator = NLLBGenerator::new_with_tokenizer(generator_config.into(), tokenizer)
            .map_err(load_error)?;
        log::info!("loaded NLLB weights on {device:?}");
        Ok(NLLBGenerationModel { generator, device })
    }
}

impl GenerationModel for NLLBGenerationModel {
    fn generate(
        &self,
        input: &EncodedInput,
        forced_bos_token_id: i64,
    ) -> Result<Vec<Vec<i64>>, TranslatorError> {
        let input_ids = Tensor::from_slice(&input.token_ids)
            .unsqueeze(0)
            .to(self.device);
        let generate_options = GenerateOptions {
            forced_bos_token_id: Some(forced_bos_token_id),
            ..Default::default()
        };
        let output = self
            .generator
            .generate_from_ids_and_past(input_ids, None, Some(generate_options))?;
        Ok(output.into_iter().map(|sequence| sequence.indices).collect())
    }
}

impl TranslationModel<NLLBTokenizer, NLLBGenerationModel> {
    /// Resolves, downloads if needed, and loads the model named by `config.model`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use nllb_translator::nllb::NLLBTranslationModel;
    /// use nllb_translator::pipelines::translation::TranslationConfig;
    ///
    /// let config = TranslationConfig {
    ///     model: "facebook/nllb-200-1.3B".to_string(),
    ///     ..Default::default()
    /// };
    /// let model = NLLBTranslationModel::from_config(&config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &TranslationConfig) -> Result<NLLBTranslationModel, TranslatorError> {
        config.validate()?;
        log::info!("loading translation model {}", config.model);
        let files = NLLBModelResources::from_identifier(&config.model)?.resolve()?;
        let tokenizer = NLLBTokenizer::from_file(&files.vocab, &files.special_token_map)?;
        let model = NLLBGenerationModel::new(&files, config)?;
        Ok(TranslationModel::new(tokenizer, model, config))
    }
}

/// Any failure while building the generator is a load failure
fn load_error(error: RustBertError) -> TranslatorError {
    TranslatorError::LoadError(error.to_string())
}

fn local(path: &Path) -> LocalResource {
    LocalResource {
        local_path: path.to_path_buf(),
    }
}

fn path_str(path: &Path) -> Result<&str, TranslatorError> {
    path.to_str().ok_or_else(|| {
        TranslatorError::InvalidConfigurationError(format!(
            "model file path {} is not valid UTF-8",
            path.display()
        ))
    })
}
