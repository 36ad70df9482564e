use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::config::ClassifierConfig;
use crate::dto::TranscriptionSegment;

#[derive(Serialize)]
struct Turn<'a> {
    speaker: &'a str,
    text: &'a str,
}

pub struct RoleClassifier {
    interpreter: String,
    script: PathBuf,
}

impl RoleClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            interpreter: config.interpreter,
            script: config.script,
        }
    }

    pub async fn classify(&self, segments: &[TranscriptionSegment]) -> Result<String, String> {
        self.run(segments).await.map_err(|e| {
            warn!("Role classification failed: {e:#}");
            format!("Role classification failed: {e:#}")
        })
    }

    async fn run(&self, segments: &[TranscriptionSegment]) -> Result<String> {
        let turns: Vec<Turn> = segments
            .iter()
            .map(|s| Turn {
                speaker: &s.speaker,
                text: &s.text,
            })
            .collect();

        // Removed when dropped, on every return path.
        let mut payload = tempfile::Builder::new()
            .prefix("transcript-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| anyhow!("Failed to create payload file: {}", e))?;
        serde_json::to_writer(&mut payload, &turns)
            .map_err(|e| anyhow!("Failed to write payload: {}", e))?;
        payload
            .flush()
            .map_err(|e| anyhow!("Failed to write payload: {}", e))?;

        debug!(
            "Running {} {} with {} turns from {}",
            self.interpreter,
            self.script.display(),
            turns.len(),
            payload.path().display()
        );

        let mut child = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(payload.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| anyhow!("Failed to start {}: {}", self.interpreter, e))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("Classifier stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("Classifier stderr was not captured"))?;

        let mut out = Vec::new();
        let mut err = Vec::new();
        let (status, _, _) = tokio::try_join!(
            child.wait(),
            stdout.read_to_end(&mut out),
            stderr.read_to_end(&mut err),
        )
        .map_err(|e| anyhow!("Failed to run classifier: {}", e))?;

        let stdout = String::from_utf8_lossy(&out).trim().to_string();
        let stderr = String::from_utf8_lossy(&err).trim().to_string();

        if !status.success() {
            return Err(anyhow!("classifier exited with {}: {}", status, stderr));
        }
        if !stderr.is_empty() {
            debug!("Classifier stderr: {stderr}");
        }

        info!("Classifier finished: {} bytes of output", stdout.len());
        Ok(stdout)
    }
}
