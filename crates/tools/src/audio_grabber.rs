//! Audio grabber: downloads an episode and transcribes it.
//!
//! The file is held in memory (capped at `max_bytes`) and uploaded as
//! multipart form data to an OpenAI-compatible `/audio/transcriptions`
//! endpoint.

use async_trait::async_trait;
use castwise_core::error::ToolError;
use castwise_core::tool::{Tool, ToolParams};
use serde::Deserialize;
use tracing::{debug, info, warn};

const FALLBACK_FILE_NAME: &str = "episode.mp3";

pub struct AudioGrabberTool {
    client: reqwest::Client,
    transcription_url: String,
    api_key: String,
    model: String,
    max_bytes: u64,
}

impl AudioGrabberTool {
    pub fn new(
        client: reqwest::Client,
        api_base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_bytes: u64,
    ) -> Self {
        Self {
            client,
            transcription_url: format!(
                "{}/audio/transcriptions",
                api_base_url.trim_end_matches('/')
            ),
            api_key: api_key.into(),
            model: model.into(),
            max_bytes,
        }
    }

    async fn download(&self, audio_url: &str) -> Result<Vec<u8>, ToolError> {
        let mut response = self
            .client
            .get(audio_url)
            .send()
            .await
            .map_err(|e| ToolError::Network(format!("Failed to download {audio_url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Upstream {
                status_code: status.as_u16(),
                message: format!("Failed to download {audio_url}"),
            });
        }

        if let Some(len) = response.content_length()
            && len > self.max_bytes
        {
            return Err(self.too_large(len));
        }

        // Content-Length may be absent (chunked) or wrong, so the cap is
        // enforced on the bytes actually read.
        let mut audio = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ToolError::Network(format!("Failed to download {audio_url}: {e}")))?
        {
            let received = (audio.len() + chunk.len()) as u64;
            if received > self.max_bytes {
                return Err(self.too_large(received));
            }
            audio.extend_from_slice(&chunk);
        }

        debug!(url = %audio_url, bytes = audio.len(), "Downloaded audio");
        Ok(audio)
    }

    async fn transcribe(&self, audio: Vec<u8>, file_name: String) -> Result<String, ToolError> {
        let part = reqwest::multipart::Part::bytes(audio).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        let response = self
            .client
            .post(&self.transcription_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ToolError::Network(format!("Transcription request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Transcription endpoint returned error");
            return Err(ToolError::Upstream {
                status_code: status.as_u16(),
                message: "Transcription failed".into(),
            });
        }

        let transcription: Transcription =
            response
                .json()
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "audioGrabber".into(),
                    reason: format!("Unreadable transcription response: {e}"),
                })?;

        Ok(transcription.text)
    }

    fn too_large(&self, len: u64) -> ToolError {
        ToolError::ExecutionFailed {
            tool_name: "audioGrabber".into(),
            reason: format!(
                "Audio file exceeds the {} byte limit ({len} bytes)",
                self.max_bytes
            ),
        }
    }
}

#[async_trait]
impl Tool for AudioGrabberTool {
    fn name(&self) -> &str {
        "AudioGrabber"
    }

    fn description(&self) -> &str {
        "Downloads the chosen MP3/MP4 and turns the audio -> text using OpenAI Whisper API."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "audioURL": {
                    "type": "string",
                    "description": "The URL of the audio file (MP3/MP4) to download and transcribe."
                }
            },
            "required": ["audioURL"]
        })
    }

    async fn execute(&self, params: ToolParams) -> Result<serde_json::Value, ToolError> {
        let audio_url = params
            .get("audioURL")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'audioURL' argument".into()))?;

        if !audio_url.starts_with("http://") && !audio_url.starts_with("https://") {
            return Err(ToolError::InvalidArguments(
                "audioURL must start with http:// or https://".into(),
            ));
        }

        if self.api_key.is_empty() {
            return Err(ToolError::ExecutionFailed {
                tool_name: "audioGrabber".into(),
                reason: "No API key configured for transcription".into(),
            });
        }

        let audio = self.download(audio_url).await?;
        let text = self.transcribe(audio, file_name_from_url(audio_url)).await?;

        info!(url = %audio_url, chars = text.len(), "Transcription complete");
        Ok(serde_json::Value::String(text))
    }
}

#[derive(Debug, Deserialize)]
struct Transcription {
    text: String,
}

/// Last path segment of `url`, without query or fragment.
fn file_name_from_url(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);

    match path.split_once('/') {
        Some((_, tail)) => tail
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string()),
        None => FALLBACK_FILE_NAME.to_string(),
    }
}
