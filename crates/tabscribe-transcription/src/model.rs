//! Whisper checkpoint management — cache paths and Hugging Face download.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::types::{ResultExt, TranscriptionError};

/// Hugging Face repository hosting the GGML whisper.cpp checkpoints.
pub const WHISPER_REPO: &str = "ggerganov/whisper.cpp";

/// Model size used when none is configured.
pub const DEFAULT_MODEL: &str = "base";

/// Checkpoint sizes known to exist in [`WHISPER_REPO`].
///
/// Other names are still attempted verbatim, so new upstream sizes work
/// without a code change; this list exists for diagnostics.
pub const KNOWN_MODELS: &[&str] = &[
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large-v2",
    "large-v3",
    "large-v3-turbo",
];

/// File name of the GGML checkpoint for a model size, e.g. `ggml-base.bin`.
pub fn ggml_filename(model: &str) -> String {
    format!("ggml-{model}.bin")
}

/// Default checkpoint cache directory (`~/.tabscribe/models`).
pub fn default_model_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".tabscribe").join("models")
}

/// Full path of a model checkpoint inside `dir`.
pub fn model_path(dir: impl AsRef<Path>, model: &str) -> PathBuf {
    dir.as_ref().join(ggml_filename(model))
}

/// Whether the checkpoint for `model` is already on disk.
pub fn is_model_cached(dir: impl AsRef<Path>, model: &str) -> bool {
    model_path(dir, model).exists()
}

/// Download the checkpoint for `model` into `dir` unless already cached.
///
/// Returns the checkpoint path. The download itself runs on a blocking
/// thread (`hf-hub`'s sync API does blocking HTTP).
pub async fn ensure_model(
    dir: impl AsRef<Path>,
    model: &str,
) -> Result<PathBuf, TranscriptionError> {
    let dir = dir.as_ref().to_path_buf();
    let target = model_path(&dir, model);

    if target.exists() {
        debug!(path = %target.display(), "model checkpoint already cached");
        return Ok(target);
    }

    if !KNOWN_MODELS.contains(&model) {
        debug!(model, "model size not in the known list, attempting anyway");
    }

    info!(model, "downloading whisper checkpoint from Hugging Face...");
    std::fs::create_dir_all(&dir)?;

    let model = model.to_string();
    tokio::task::spawn_blocking(move || download_checkpoint(&dir, &model))
        .await
        .model("download task join")?
}

fn download_checkpoint(dir: &Path, model: &str) -> Result<PathBuf, TranscriptionError> {
    let filename = ggml_filename(model);
    let target = dir.join(&filename);

    let api = hf_hub::api::sync::Api::new().model("HF API init")?;
    let cached = api
        .model(WHISPER_REPO.to_string())
        .get(&filename)
        .model(&format!("download {filename}"))?;

    // hf-hub caches under its own directory; keep our copy in the model dir
    // so the cache layout stays stable across hf-hub versions.
    if cached != target {
        let _ = std::fs::copy(&cached, &target)?;
    }

    info!(path = %target.display(), "whisper checkpoint ready");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ggml_filename_formats_size() {
        assert_eq!(ggml_filename("base"), "ggml-base.bin");
        assert_eq!(ggml_filename("large-v3"), "ggml-large-v3.bin");
        assert_eq!(ggml_filename("tiny.en"), "ggml-tiny.en.bin");
    }

    #[test]
    fn model_path_joins_dir_and_filename() {
        assert_eq!(
            model_path("/models", "base"),
            PathBuf::from("/models/ggml-base.bin")
        );
    }

    #[test]
    fn default_dir_is_under_tabscribe() {
        let dir = default_model_dir();
        assert!(dir.to_string_lossy().contains(".tabscribe/models"));
    }

    #[test]
    fn default_model_is_known() {
        assert!(KNOWN_MODELS.contains(&DEFAULT_MODEL));
    }

    #[test]
    fn cache_check_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!is_model_cached(tmp.path(), "base"));
    }

    #[test]
    fn cache_check_present_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("ggml-base.bin"), b"").unwrap();
        assert!(is_model_cached(tmp.path(), "base"));
        assert!(!is_model_cached(tmp.path(), "small"));
    }

    #[tokio::test]
    async fn ensure_model_short_circuits_on_cache() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("ggml-base.bin"), b"stub").unwrap();
        let path = ensure_model(tmp.path(), "base").await.unwrap();
        assert_eq!(path, tmp.path().join("ggml-base.bin"));
    }
}
