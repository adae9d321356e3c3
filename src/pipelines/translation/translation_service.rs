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

//! # Asynchronous access to a translation model running on a dedicated thread
//!
//! libtorch-backed models cannot be moved across threads freely and generation blocks for its whole
//! duration. `TranslationService` loads the model on a worker thread and feeds it requests one at
//! a time, in arrival order, through a bounded channel. Callers await the result without blocking
//! their async runtime.
use crate::common::error::TranslatorError;
use crate::pipelines::common::{GenerationModel, TranslationTokenizer};
use crate::pipelines::translation::translation_pipeline::{TranslationModel, TranslationRequest};
use std::sync::mpsc as std_mpsc;
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};

/// Message type for internal channel, passing around requests and return value senders
type Message = (
    TranslationRequest,
    oneshot::Sender<Result<String, TranslatorError>>,
);

const QUEUE_CAPACITY: usize = 100;

/// Runner for translation requests
#[derive(Debug, Clone)]
pub struct TranslationService {
    sender: mpsc::Sender<Message>,
}

impl TranslationService {
    /// Spawn a translation runner on a separate thread and return a handle to interact with it
    ///
    /// `loader` runs on the worker thread, exactly once. This call blocks until it returns: a
    /// loading failure is returned here and no service is created.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # #[cfg(feature = "torch")]
    /// # async fn run() -> anyhow::Result<()> {
    /// use nllb_translator::nllb::NLLBTranslationModel;
    /// use nllb_translator::pipelines::translation::{
    ///     TranslationConfig, TranslationRequest, TranslationService,
    /// };
    ///
    /// let (_handle, service) = TranslationService::spawn(|| {
    ///     NLLBTranslationModel::from_config(&TranslationConfig::default())
    /// })?;
    /// let output = service
    ///     .translate(TranslationRequest::new("Hello, how are you?").to_language("deu_Latn"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn<F, T, G>(loader: F) -> Result<(JoinHandle<()>, TranslationService), TranslatorError>
    where
        F: FnOnce() -> Result<TranslationModel<T, G>, TranslatorError> + Send + 'static,
        T: TranslationTokenizer + 'static,
        G: GenerationModel + 'static,
    {
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        // `spawn` may run inside an async runtime, where tokio's blocking receivers panic
        let (ready_sender, ready_receiver) = std_mpsc::channel();
        let handle = thread::Builder::new()
            .name("translation-runner".to_string())
            .spawn(move || Self::runner(loader, receiver, ready_sender))?;

        match ready_receiver.recv() {
            Ok(Ok(())) => Ok((handle, TranslationService { sender })),
            Ok(Err(error)) => {
                let _ = handle.join();
                Err(error)
            }
            Err(_) => Err(TranslatorError::ServiceUnavailable(
                "translation runner stopped while loading the model".to_string(),
            )),
        }
    }

    /// The translation runner itself
    fn runner<F, T, G>(
        loader: F,
        mut receiver: mpsc::Receiver<Message>,
        ready: std_mpsc::Sender<Result<(), TranslatorError>>,
    ) where
        F: FnOnce() -> Result<TranslationModel<T, G>, TranslatorError>,
        T: TranslationTokenizer,
        G: GenerationModel,
    {
        let model = match loader() {
            Ok(model) => model,
            Err(error) => {
                log::error!("failed to load translation model: {error}");
                let _ = ready.send(Err(error));
                return;
            }
        };
        log::info!("translation runner ready");
        let _ = ready.send(Ok(()));

        while let Some((request, sender)) = receiver.blocking_recv() {
            let result = model.translate_request(&request);
            if sender.send(result).is_err() {
                log::debug!("caller went away before its translation completed");
            }
        }
        log::info!("translation runner stopped");
    }

    /// Queue a request and wait for its translation
    pub async fn translate(&self, request: TranslationRequest) -> Result<String, TranslatorError> {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .send((request, sender))
            .await
            .map_err(|_| runner_gone())?;
        receiver.await.map_err(|_| runner_gone())?
    }

    /// Blocking variant of `translate`. Must not be called from within an async runtime.
    pub fn translate_blocking(
        &self,
        request: TranslationRequest,
    ) -> Result<String, TranslatorError> {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .blocking_send((request, sender))
            .map_err(|_| runner_gone())?;
        receiver.blocking_recv().map_err(|_| runner_gone())?
    }
}

fn runner_gone() -> TranslatorError {
    TranslatorError::ServiceUnavailable("translation runner is not running".to_string())
}
