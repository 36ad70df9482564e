use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "call-transcribe",
    about = "Call Transcribe - diarized transcription of call recordings",
    long_about = "Uploads a call recording to a remote speech-to-text API, prints the speaker-attributed segments with total silence, and can hand the transcript to a speaker-role classifier script.",
    after_help = "EXAMPLES:\n    # Transcribe the default recording using settings from .env\n    call-transcribe transcribe\n\n    # Transcribe a specific file in German\n    call-transcribe transcribe calls/0042.wav --language de\n\n    # Transcribe, then ask the classifier who is the agent\n    call-transcribe roles calls/0042.wav --script python/main.py"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct TranscribeArgs {
    #[arg(default_value = "recording.wav")]
    pub audio_file: PathBuf,

    /// Settings file with KEY=VALUE lines; the environment fills the gaps
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Overrides TRANSCRIPTION_LANGUAGE
    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "transcribe")]
    Transcribe(TranscribeArgs),
    #[command(name = "roles")]
    Roles {
        #[command(flatten)]
        transcribe: TranscribeArgs,

        /// Overrides ROLE_CLASSIFIER_SCRIPT
        #[arg(long)]
        script: Option<PathBuf>,

        /// Overrides ROLE_CLASSIFIER_INTERPRETER
        #[arg(long)]
        interpreter: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcribe_uses_default_paths() {
        let cli = Cli::try_parse_from(["call-transcribe", "transcribe"]).unwrap();

        let Commands::Transcribe(args) = cli.command else {
            panic!("expected transcribe");
        };
        assert_eq!(args.audio_file, PathBuf::from("recording.wav"));
        assert_eq!(args.env_file, PathBuf::from(".env"));
        assert!(args.language.is_none());
    }

    #[test]
    fn roles_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "call-transcribe",
            "roles",
            "call.wav",
            "--language",
            "en",
            "--script",
            "scripts/roles.py",
            "--interpreter",
            "python3.12",
        ])
        .unwrap();

        let Commands::Roles {
            transcribe,
            script,
            interpreter,
        } = cli.command
        else {
            panic!("expected roles");
        };
        assert_eq!(transcribe.audio_file, PathBuf::from("call.wav"));
        assert_eq!(transcribe.language.as_deref(), Some("en"));
        assert_eq!(script, Some(PathBuf::from("scripts/roles.py")));
        assert_eq!(interpreter.as_deref(), Some("python3.12"));
    }
}
