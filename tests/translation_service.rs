mod common;

use common::{lexicon_model, LexiconModel};
use nllb_translator::pipelines::hf_tokenizers::NLLBTokenizer;
use nllb_translator::pipelines::translation::{
    TranslationConfig, TranslationModel, TranslationRequest, TranslationService,
};
use nllb_translator::TranslatorError;

fn spawn_service() -> anyhow::Result<(std::thread::JoinHandle<()>, TranslationService)> {
    let (handle, service) =
        TranslationService::spawn(|| Ok(lexicon_model(&TranslationConfig::default())))?;
    Ok((handle, service))
}

#[tokio::test]
async fn serves_concurrent_async_requests() -> anyhow::Result<()> {
    let (_handle, service) = spawn_service()?;

    let requests = [
        ("hello world", "eng_Latn", "deu_Latn", "hallo welt"),
        ("hallo welt", "deu_Latn", "fra_Latn", "bonjour monde"),
        ("bon matin", "fra_Latn", "eng_Latn", "good morning"),
    ];
    let tasks = requests
        .iter()
        .map(|(text, source, target, _)| {
            let service = service.clone();
            let request = TranslationRequest::new(*text)
                .from_language(*source)
                .to_language(*target);
            tokio::spawn(async move { service.translate(request).await })
        })
        .collect::<Vec<_>>();

    for (task, (_, _, _, expected)) in tasks.into_iter().zip(requests) {
        assert_eq!(task.await??, expected);
    }
    Ok(())
}

#[tokio::test]
async fn request_errors_do_not_stop_the_service() -> anyhow::Result<()> {
    let (_handle, service) = spawn_service()?;

    let error = service
        .translate(TranslationRequest::new("hello").to_language("zzz_Zzzz"))
        .await
        .unwrap_err();
    assert!(matches!(error, TranslatorError::UnknownLanguage(_)));

    let output = service.translate(TranslationRequest::new("hello")).await?;
    assert_eq!(output, "bonjour");
    Ok(())
}

#[test]
fn blocking_translation_outside_of_a_runtime() -> anyhow::Result<()> {
    let (handle, service) = spawn_service()?;

    let output = service.translate_blocking(TranslationRequest::new("good morning"))?;
    assert_eq!(output, "bon matin");

    drop(service);
    handle.join().expect("translation runner panicked");
    Ok(())
}

#[test]
fn load_failures_are_returned_by_spawn() {
    let result = TranslationService::spawn(
        || -> Result<TranslationModel<NLLBTokenizer, LexiconModel>, TranslatorError> {
            Err(TranslatorError::FileDownloadError(
                "model not found".to_string(),
            ))
        },
    );

    let error = result.err().expect("loading should fail");
    assert!(error.is_load_error());
    assert!(matches!(error, TranslatorError::FileDownloadError(_)));
}
