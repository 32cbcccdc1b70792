use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing::error;

use crate::error::{ClientError, ClientResult, HttpError};

use super::RequestClient;
use super::request::{HttpMethod, Payload, RequestOptions};
use super::response::ApiResponse;

const OCTET_STREAM: &str = "application/octet-stream";
const MAX_NAME_ATTEMPTS: u32 = 1000;

impl RequestClient {
    /// POSTs the raw bytes of `file_path` as `application/octet-stream`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, the request fails, or
    /// the request was cancelled.
    pub async fn upload_file(
        &self,
        path: &str,
        file_path: impl AsRef<Path>,
        description: &str,
    ) -> ClientResult<ApiResponse> {
        let result = self.upload(path, file_path.as_ref(), description).await;
        if let Err(err) = &result
            && !err.is_cancelled()
        {
            error!("Error uploading file: {}", err);
        }
        result
    }

    async fn upload(
        &self,
        path: &str,
        file_path: &Path,
        description: &str,
    ) -> ClientResult<ApiResponse> {
        let started = Instant::now();
        let content = tokio::fs::read(file_path).await.map_err(|err| {
            ClientError::http(HttpError::ReadUploadFile {
                path: file_path.to_path_buf(),
                source: err,
            })
        })?;
        let options = RequestOptions::new().header("Content-Type", OCTET_STREAM);
        self.make_request(
            HttpMethod::Post,
            path,
            Some(Payload::Bytes(Bytes::from(content))),
            description,
            started,
            &options,
        )
        .await?
        .into_response()
    }

    /// GETs `path` and writes the decoded body, re-encoded as JSON, to
    /// `downloaded_<unix millis>.txt` in the download directory. A name
    /// already taken gets a `_<n>` suffix instead of being overwritten.
    ///
    /// Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or is cancelled, or when the
    /// file cannot be written.
    pub async fn download_file(&self, path: &str, description: &str) -> ClientResult<PathBuf> {
        let result = self.download(path, description).await;
        if let Err(err) = &result
            && !err.is_cancelled()
        {
            error!("Error downloading file: {}", err);
        }
        result
    }

    async fn download(&self, path: &str, description: &str) -> ClientResult<PathBuf> {
        let started = Instant::now();
        let response = self
            .make_request(
                HttpMethod::Get,
                path,
                None,
                description,
                started,
                &RequestOptions::default(),
            )
            .await?
            .into_response()?;

        let content = serde_json::to_string(&response.body)
            .map_err(|err| ClientError::http(HttpError::SerializeDownload { source: err }))?;
        let dir = self.state().download_dir.clone();
        let stamp = Utc::now().timestamp_millis();
        write_new_file(&dir, stamp, content.as_bytes()).await
    }
}

/// Writes `content` to `downloaded_<stamp>.txt` in `dir` without ever
/// replacing an existing file. Taken names get a `_<n>` suffix.
pub(super) async fn write_new_file(
    dir: &Path,
    stamp: i64,
    content: &[u8],
) -> ClientResult<PathBuf> {
    let mut target = dir.join(format!("downloaded_{}.txt", stamp));
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
        {
            Ok(mut file) => {
                file.write_all(content)
                    .await
                    .map_err(|err| write_error(&target, err))?;
                file.flush().await.map_err(|err| write_error(&target, err))?;
                return Ok(target);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                target = dir.join(format!("downloaded_{}_{}.txt", stamp, attempt));
            }
            Err(err) => return Err(write_error(&target, err)),
        }
    }
    Err(write_error(&target, std::io::Error::from(ErrorKind::AlreadyExists)))
}

fn write_error(path: &Path, source: std::io::Error) -> ClientError {
    ClientError::http(HttpError::WriteDownload {
        path: path.to_path_buf(),
        source,
    })
}
