mod common;

use common::lexicon_model;
use nllb_translator::pipelines::translation::{
    Language, LanguageCode, TranslationConfig, TranslationRequest,
};
use nllb_translator::TranslatorError;
use std::sync::Arc;
use std::thread;

#[test]
fn translates_default_example() -> anyhow::Result<()> {
    let model = lexicon_model(&TranslationConfig::default());

    let output = model.translate("Hello, how are you?", "eng_Latn", "fra_Latn")?;

    assert_eq!(output, "bonjour , comment allez vous ?");
    Ok(())
}

#[test]
fn request_without_languages_uses_configured_defaults() -> anyhow::Result<()> {
    let config = TranslationConfig {
        default_source_language: LanguageCode::from("deu_Latn"),
        default_target_language: LanguageCode::from("eng_Latn"),
        ..Default::default()
    };
    let model = lexicon_model(&config);

    let output = model.translate_request(&TranslationRequest::new("Gut Morgen"))?;
    assert_eq!(output, "good morning");

    let request = TranslationRequest::new("Gut Morgen").to_language("fra_Latn");
    assert_eq!(model.translate_request(&request)?, "bon matin");
    Ok(())
}

#[test]
fn translates_between_enum_languages() -> anyhow::Result<()> {
    let model = lexicon_model(&TranslationConfig::default());
    let output = model.translate_language("hello world", Language::English, Language::German)?;
    assert_eq!(output, "hallo welt");
    Ok(())
}

#[test]
fn repeated_calls_are_deterministic() -> anyhow::Result<()> {
    let model = lexicon_model(&TranslationConfig::default());
    let first = model.translate("good morning, world", "eng_Latn", "deu_Latn")?;
    for _ in 0..10 {
        assert_eq!(
            model.translate("good morning, world", "eng_Latn", "deu_Latn")?,
            first
        );
    }
    Ok(())
}

#[test]
fn round_trip_is_non_empty_and_in_source_language() -> anyhow::Result<()> {
    let model = lexicon_model(&TranslationConfig::default());
    let french = model.translate("how are you?", "eng_Latn", "fra_Latn")?;
    let english = model.translate(&french, "fra_Latn", "eng_Latn")?;
    assert!(!english.is_empty());
    assert!(english.contains("you"));
    Ok(())
}

#[test]
fn empty_text_translates_to_empty_string() -> anyhow::Result<()> {
    let model = lexicon_model(&TranslationConfig::default());
    assert_eq!(model.translate("", "eng_Latn", "fra_Latn")?, "");
    assert_eq!(model.translate(" \t", "eng_Latn", "fra_Latn")?, "");
    Ok(())
}

#[test]
fn unknown_languages_are_reported() {
    let model = lexicon_model(&TranslationConfig::default());

    for (source, target) in [
        ("xho_Latn", "fra_Latn"),
        ("eng_Latn", "xho_Latn"),
        ("english", "fra_Latn"),
        ("eng_Latn", "hello"),
    ] {
        match model.translate("hello", source, target) {
            Err(TranslatorError::UnknownLanguage(code)) => {
                assert!(code == source || code == target)
            }
            other => panic!("expected unknown language for {source} -> {target}, got {other:?}"),
        }
    }
}

#[test]
fn concurrent_callers_keep_their_own_source_language() -> anyhow::Result<()> {
    let model = Arc::new(lexicon_model(&TranslationConfig::default()));

    let workers = [
        ("hello world", "eng_Latn"),
        ("hallo welt", "deu_Latn"),
        ("good morning", "eng_Latn"),
        ("gut morgen", "deu_Latn"),
    ]
    .into_iter()
    .map(|(text, source)| {
        let model = Arc::clone(&model);
        thread::spawn(move || -> Result<Vec<String>, TranslatorError> {
            (0..50)
                .map(|_| model.translate(text, source, "fra_Latn"))
                .collect()
        })
    })
    .collect::<Vec<_>>();

    let expected = ["bonjour monde", "bonjour monde", "bon matin", "bon matin"];
    for (worker, expected) in workers.into_iter().zip(expected) {
        let outputs = worker.join().expect("worker thread panicked")?;
        assert!(outputs.iter().all(|output| output == expected), "{outputs:?}");
    }
    Ok(())
}
