use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::io::Read;

use crate::config::TranscriptionConfig;
use crate::dto::{ProviderResponse, ProviderSegment, TranscriptionResult, TranscriptionSegment};
use crate::multipart;

pub const PARSE_FAILURE: &str = "Failed to parse transcription response";

/// Every failure, including a missing API key, comes back as a failed
/// [`TranscriptionResult`] rather than an error.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(
        &self,
        audio: Box<dyn Read + Send>,
        file_name: &str,
    ) -> TranscriptionResult;

    fn provider_id(&self) -> &str;
}

pub struct RemoteTranscriber {
    client: reqwest::Client,
    config: TranscriptionConfig,
}

impl RemoteTranscriber {
    pub fn new(config: TranscriptionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    async fn send<R: Read>(
        &self,
        api_key: &str,
        audio: R,
        file_name: &str,
    ) -> Result<TranscriptionResult> {
        let body = multipart::build_transcription_body(
            audio,
            file_name,
            &self.config.model,
            &self.config.language,
        )
        .map_err(|e| anyhow!("Failed to read audio source: {}", e))?;

        info!(
            "Sending '{}' ({} bytes, language '{}') to {}",
            file_name,
            body.len(),
            self.config.language,
            self.config.endpoint
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, multipart::content_type())
            .body(body)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send request: {}", e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response: {}", e))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Server returned error {}: {}",
                status,
                response_text
            ));
        }

        debug!("Received {} bytes of transcription JSON", response_text.len());

        Ok(parse_response(&response_text))
    }
}

#[async_trait]
impl TranscriptionProvider for RemoteTranscriber {
    async fn transcribe(
        &self,
        audio: Box<dyn Read + Send>,
        file_name: &str,
    ) -> TranscriptionResult {
        let Some(api_key) = self.config.api_key.as_deref() else {
            warn!("Transcription skipped: API key is not configured");
            return TranscriptionResult::failure("Transcription API key is not configured");
        };

        match self.send(api_key, audio, file_name).await {
            Ok(result) => result,
            Err(e) => {
                error!("Transcription of '{file_name}' failed: {e:#}");
                TranscriptionResult::failure(format!("Transcription failed: {e:#}"))
            }
        }
    }

    fn provider_id(&self) -> &str {
        "together"
    }
}

pub fn parse_response(body: &str) -> TranscriptionResult {
    match serde_json::from_str::<Option<ProviderResponse>>(body) {
        Ok(Some(response)) => convert_response(response),
        Ok(None) => {
            warn!("Transcription response body was null");
            TranscriptionResult::failure(PARSE_FAILURE)
        }
        Err(e) => {
            warn!("Transcription response did not match the expected shape: {e}");
            TranscriptionResult::failure(PARSE_FAILURE)
        }
    }
}

pub fn convert_response(response: ProviderResponse) -> TranscriptionResult {
    let silence = silence_duration(response.segments.as_deref().unwrap_or_default());

    let segments: Vec<TranscriptionSegment> = match response.speaker_segments {
        Some(speaker_segments) => speaker_segments
            .into_iter()
            .map(|s| TranscriptionSegment {
                text: s.text.unwrap_or_default(),
                speaker: s.speaker_id.unwrap_or_default(),
                start: s.start,
                end: s.end,
            })
            .collect(),
        None => {
            if response.segments.as_ref().is_some_and(|s| !s.is_empty()) {
                warn!("Response has plain segments but no speaker segments; returning no segments");
            }
            Vec::new()
        }
    };

    info!(
        "Transcription completed: {} segments, {:.1}s audio, {}s silence, {} characters",
        segments.len(),
        response.duration,
        silence,
        response.text.as_deref().map_or(0, str::len)
    );

    TranscriptionResult::success(segments, response.duration, silence)
}

// Gaps are truncated to whole seconds; the total saturates at i64::MAX.
pub fn silence_duration(segments: &[ProviderSegment]) -> i64 {
    segments
        .windows(2)
        .map(|pair| (pair[1].start - pair[0].end) as i64)
        .filter(|gap| *gap > 0)
        .fold(0, i64::saturating_add)
}
