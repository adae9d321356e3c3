use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use nllb_translator::nllb::{NLLBModelResources, NLLBTranslationModel};
use nllb_translator::pipelines::translation::{
    DeviceOption, LanguageCode, TranslationConfig, TranslationRequest,
};
use nllb_translator::Config;

/// Translate a text with a pretrained NLLB-200 model.
///
/// Without arguments, translates "Hello, how are you?" from English to French.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Text to translate
    #[arg(short, long, default_value = "Hello, how are you?")]
    text: String,

    /// Source language code, e.g. eng_Latn (default: from configuration)
    #[arg(short, long)]
    source: Option<LanguageCode>,

    /// Target language code, e.g. fra_Latn (default: from configuration)
    #[arg(short = 'g', long)]
    target: Option<LanguageCode>,

    /// Model name or local model directory
    #[arg(short, long)]
    model: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run on the CPU even if a GPU is available
    #[arg(long)]
    cpu: bool,

    /// Print the language codes known by the model tokenizer and exit
    #[arg(long)]
    list_languages: bool,
}

impl Args {
    /// Configuration file (or defaults) with the command line overrides applied
    fn translation_config(&self) -> Result<TranslationConfig> {
        let mut config = match &self.config {
            Some(path) => TranslationConfig::from_file(path)?,
            None => TranslationConfig::default(),
        };
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if self.cpu {
            config.device = DeviceOption::Cpu;
        }
        Ok(config)
    }

    /// Languages left unset fall back to the configured defaults
    fn translation_request(&self) -> TranslationRequest {
        TranslationRequest {
            text: self.text.clone(),
            source_language: self.source.clone(),
            target_language: self.target.clone(),
        }
    }
}

fn format_output(translated_text: &str) -> String {
    format!("Translated Text: {translated_text}")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = args.translation_config()?;

    if args.list_languages {
        let tokenizer = NLLBModelResources::from_identifier(&config.model)?.load_tokenizer()?;
        for language in tokenizer.supported_languages() {
            println!("{language}");
        }
        return Ok(());
    }

    let model = NLLBTranslationModel::from_config(&config)?;
    let translated_text = model.translate_request(&args.translation_request())?;
    println!("{}", format_output(&translated_text));
    Ok(())
}
