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

//! # Resource definitions for model weights, vocabularies and configuration files
//!
//! Model files are either found on the local filesystem (`LocalResource`) or downloaded once
//! into a process-wide cache and reused afterwards (`RemoteResource`).
//! The cache directory defaults to `~/.cache/.nllb-translator` and can be overridden with the
//! `NLLB_TRANSLATOR_CACHE` environment variable.

use crate::common::error::TranslatorError;
use cached_path::{Cache, Options};
use lazy_static::lazy_static;
use std::env;
use std::path::PathBuf;

/// # Resource Trait that can provide the location of the model, configuration or vocabulary resources
pub trait ResourceProvider {
    /// Provides the local path for a resource, downloading it first if required.
    fn get_local_path(&self) -> Result<PathBuf, TranslatorError>;
}

/// # Local resource
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct LocalResource {
    /// Local path for the resource
    pub local_path: PathBuf,
}

impl ResourceProvider for LocalResource {
    fn get_local_path(&self) -> Result<PathBuf, TranslatorError> {
        if self.local_path.is_file() {
            Ok(self.local_path.clone())
        } else {
            Err(TranslatorError::IOError(format!(
                "{} is not a readable file",
                self.local_path.display()
            )))
        }
    }
}

impl From<PathBuf> for LocalResource {
    fn from(local_path: PathBuf) -> Self {
        Self { local_path }
    }
}

/// # Remote resource that will be downloaded and cached locally on demand
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RemoteResource {
    /// Remote path/url for the resource
    pub url: String,
    /// Model-specific sub-directory of the cache root
    pub cache_subdir: String,
}

impl RemoteResource {
    /// Creates a new RemoteResource from an URL and a custom local path. Note that this does not
    /// download the resource (only declares the remote and local locations)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nllb_translator::resources::RemoteResource;
    /// let config_resource = RemoteResource::new(
    ///     "https://huggingface.co/facebook/nllb-200-distilled-600M/resolve/main/config.json",
    ///     "nllb200-distilled-600m/config",
    /// );
    /// ```
    pub fn new(url: &str, cache_subdir: &str) -> RemoteResource {
        RemoteResource {
            url: url.to_string(),
            cache_subdir: cache_subdir.to_string(),
        }
    }
}

impl ResourceProvider for RemoteResource {
    fn get_local_path(&self) -> Result<PathBuf, TranslatorError> {
        log::debug!("resolving {} through the model cache", self.url);
        let cache = (*CACHE).as_ref().map_err(Clone::clone)?;
        Ok(cache.cached_path_with_options(
            &self.url,
            &Options::default().subdir(&self.cache_subdir),
        )?)
    }
}

lazy_static! {
    /// # Global cache directory
    /// If the environment variable `NLLB_TRANSLATOR_CACHE` is set, will save the cache model files at that
    /// location. Otherwise defaults to `$HOME/.cache/.nllb-translator`.
    /// Holds the error if the directory cannot be created, returned by every download attempt.
    pub static ref CACHE: Result<Cache, TranslatorError> = build_cache(_get_cache_directory());
}

/// Creates a download cache rooted at `directory`
pub fn build_cache(directory: PathBuf) -> Result<Cache, TranslatorError> {
    Cache::builder().dir(directory).build().map_err(|e| {
        TranslatorError::FileDownloadError(format!("could not create the model cache: {e}"))
    })
}

fn _get_cache_directory() -> PathBuf {
    match env::var("NLLB_TRANSLATOR_CACHE") {
        Ok(value) => PathBuf::from(value),
        Err(_) => {
            let mut home = dirs::home_dir().unwrap_or_else(env::temp_dir);
            home.push(".cache");
            home.push(".nllb-translator");
            home
        }
    }
}
