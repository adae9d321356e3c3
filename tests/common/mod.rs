#![allow(dead_code)]

use nllb_translator::pipelines::common::{EncodedInput, GenerationModel, TranslationTokenizer};
use nllb_translator::pipelines::hf_tokenizers::NLLBTokenizer;
use nllb_translator::pipelines::translation::{LanguageCode, TranslationConfig, TranslationModel};
use nllb_translator::TranslatorError;
use std::collections::HashMap;
use std::path::PathBuf;

const LANGUAGES: [&str; 3] = ["eng_Latn", "fra_Latn", "deu_Latn"];

#[rustfmt::skip]
const LEXICON: [[&str; 3]; 10] = [
    ["hello", "bonjour", "hallo"],
    ["world", "monde", "welt"],
    ["how", "comment", "wie"],
    ["are", "allez", "geht"],
    ["you", "vous", "es"],
    ["good", "bon", "gut"],
    ["morning", "matin", "morgen"],
    ["?", "?", "?"],
    [",", ",", ","],
    ["<unk>", "<unk>", "<unk>"],
];

pub fn resource(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join(file)
}

pub fn tokenizer() -> NLLBTokenizer {
    NLLBTokenizer::from_file(
        resource("tokenizer.json"),
        resource("special_tokens_map.json"),
    )
    .expect("test tokenizer files")
}

/// Word-for-word "translation" through a fixed lexicon.
///
/// Output sequences follow the NLLB layout: decoder start (`</s>`), forced language token,
/// translated words, `</s>`. The source language is read from the first input token only.
pub struct LexiconModel {
    entries: HashMap<(i64, i64), usize>,
    words: Vec<HashMap<i64, i64>>,
    eos_token_id: i64,
}

impl LexiconModel {
    pub fn new(tokenizer: &NLLBTokenizer) -> LexiconModel {
        let mut entries = HashMap::new();
        let mut words = Vec::new();
        for (index, row) in LEXICON.iter().enumerate() {
            let mut translations = HashMap::new();
            for (language, word) in LANGUAGES.iter().zip(row.iter()) {
                let language = LanguageCode::from(*language);
                let language_id = tokenizer.language_token_id(&language).unwrap();
                let encoded = tokenizer.encode(word, &language).unwrap();
                let word_id = encoded.token_ids[1];
                entries.insert((language_id, word_id), index);
                translations.insert(language_id, word_id);
            }
            words.push(translations);
        }
        LexiconModel {
            entries,
            words,
            eos_token_id: tokenizer.eos_token_id(),
        }
    }
}

impl GenerationModel for LexiconModel {
    fn generate(
        &self,
        input: &EncodedInput,
        forced_bos_token_id: i64,
    ) -> Result<Vec<Vec<i64>>, TranslatorError> {
        let (source_language_id, rest) = input
            .token_ids
            .split_first()
            .ok_or_else(|| TranslatorError::GenerationError("empty input".to_string()))?;
        let mut output = vec![self.eos_token_id, forced_bos_token_id];
        for token_id in rest.iter().take_while(|id| **id != self.eos_token_id) {
            std::thread::yield_now();
            let translated = self
                .entries
                .get(&(*source_language_id, *token_id))
                .and_then(|index| self.words[*index].get(&forced_bos_token_id))
                .copied()
                .ok_or_else(|| {
                    TranslatorError::GenerationError(format!(
                        "no translation for token {token_id}"
                    ))
                })?;
            output.push(translated);
        }
        output.push(self.eos_token_id);
        Ok(vec![output])
    }
}

pub fn lexicon_model(config: &TranslationConfig) -> TranslationModel<NLLBTokenizer, LexiconModel> {
    let tokenizer = tokenizer();
    let model = LexiconModel::new(&tokenizer);
    TranslationModel::new(tokenizer, model, config)
}
