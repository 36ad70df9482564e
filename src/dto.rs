use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub segments: Option<Vec<ProviderSegment>>,
    #[serde(default)]
    pub speaker_segments: Option<Vec<ProviderSpeakerSegment>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderSpeakerSegment {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub speaker_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionSegment {
    pub text: String,
    pub speaker: String,
    pub start: f64,
    pub end: f64,
}

// A failed result never carries segments; a successful one never carries an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    segments: Vec<TranscriptionSegment>,
    duration: f64,
    silence_duration: i64,
}

impl TranscriptionResult {
    pub fn success(
        segments: Vec<TranscriptionSegment>,
        duration: f64,
        silence_duration: i64,
    ) -> Self {
        Self {
            success: true,
            error: None,
            segments,
            duration,
            silence_duration,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            segments: Vec::new(),
            duration: 0.0,
            silence_duration: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn segments(&self) -> &[TranscriptionSegment] {
        &self.segments
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn silence_duration(&self) -> i64 {
        self.silence_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_fields_are_all_optional() {
        let response: ProviderResponse = serde_json::from_str("{}").unwrap();

        assert_eq!(response.duration, 0.0);
        assert!(response.text.is_none());
        assert!(response.segments.is_none());
        assert!(response.speaker_segments.is_none());
    }

    #[test]
    fn provider_response_parses_verbose_json() {
        let json = r#"{
            "text": "hello there",
            "duration": 12.5,
            "segments": [{"start": 0.0, "end": 1.5, "text": "hello"}],
            "speaker_segments": [{"start": 0.0, "end": 1.5, "text": "hello", "speaker_id": "SPEAKER_00", "words": []}],
            "language": "en"
        }"#;
        let response: ProviderResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.duration, 12.5);
        assert_eq!(response.segments.as_ref().map(Vec::len), Some(1));
        let speaker = &response.speaker_segments.unwrap()[0];
        assert_eq!(speaker.speaker_id.as_deref(), Some("SPEAKER_00"));
        assert_eq!(speaker.end, 1.5);
    }

    #[test]
    fn null_lists_are_treated_as_absent() {
        let response: ProviderResponse =
            serde_json::from_str(r#"{"duration": 3, "segments": null, "speaker_segments": null}"#)
                .unwrap();

        assert_eq!(response.duration, 3.0);
        assert!(response.segments.is_none());
        assert!(response.speaker_segments.is_none());
    }

    #[test]
    fn failure_carries_message_and_no_segments() {
        let result = TranscriptionResult::failure("boom");

        assert!(!result.is_success());
        assert_eq!(result.error(), Some("boom"));
        assert!(result.segments().is_empty());
    }

    #[test]
    fn success_serializes_without_error_field() {
        let result = TranscriptionResult::success(
            vec![TranscriptionSegment {
                text: "hi".to_string(),
                speaker: "A".to_string(),
                start: 0.0,
                end: 1.0,
            }],
            1.0,
            0,
        );
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["success"], true);
        assert!(value.get("error").is_none());
        assert_eq!(value["segments"][0]["speaker"], "A");
    }
}
