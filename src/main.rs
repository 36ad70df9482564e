mod cli;

use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::fs::File;

use call_transcribe::config::{ClassifierConfig, EnvFileSettings, TranscriptionConfig};
use call_transcribe::dto::TranscriptionResult;
use call_transcribe::roles::RoleClassifier;
use call_transcribe::transcriber::{RemoteTranscriber, TranscriptionProvider};
use cli::{Cli, Commands, TranscribeArgs};

fn build_provider(
    args: &TranscribeArgs,
    settings: &EnvFileSettings,
) -> Result<Box<dyn TranscriptionProvider>> {
    let mut config = TranscriptionConfig::from_settings(settings)?;
    if let Some(language) = &args.language {
        config.language = language.clone();
    }
    debug!(
        "Using configuration: endpoint={}, model={}, language='{}', timeout={:?}",
        config.endpoint, config.model, config.language, config.timeout
    );

    Ok(Box::new(RemoteTranscriber::new(config)?))
}

async fn run_transcription(
    args: &TranscribeArgs,
    provider: &dyn TranscriptionProvider,
) -> TranscriptionResult {
    let file_name = args
        .audio_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio.wav".to_string());

    println!(
        "📁 Audio source: {} (via {})",
        args.audio_file.display(),
        provider.provider_id()
    );

    match File::open(&args.audio_file) {
        Ok(file) => provider.transcribe(Box::new(file), &file_name).await,
        Err(e) => TranscriptionResult::failure(format!(
            "Failed to open audio file {}: {}",
            args.audio_file.display(),
            e
        )),
    }
}

fn print_result(result: &TranscriptionResult) -> Result<()> {
    if result.is_success() {
        println!("\n✅ Transcription completed!");
        println!("📝 Result:");
        println!("{}", serde_json::to_string_pretty(result)?);
        Ok(())
    } else {
        let message = result.error().unwrap_or("unknown error");
        eprintln!("❌ {message}");
        Err(anyhow!("{}", message))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transcribe(args) => {
            let settings = EnvFileSettings::load(&args.env_file)?;
            let provider = build_provider(&args, &settings)?;
            let result = run_transcription(&args, provider.as_ref()).await;
            print_result(&result)
        }
        Commands::Roles {
            transcribe,
            script,
            interpreter,
        } => {
            let settings = EnvFileSettings::load(&transcribe.env_file)?;
            let provider = build_provider(&transcribe, &settings)?;
            let result = run_transcription(&transcribe, provider.as_ref()).await;
            print_result(&result)?;

            let mut classifier_config = ClassifierConfig::from_settings(&settings);
            if let Some(script) = script {
                classifier_config.script = script;
            }
            if let Some(interpreter) = interpreter {
                classifier_config.interpreter = interpreter;
            }
            info!(
                "Classifying speaker roles with {} {}",
                classifier_config.interpreter,
                classifier_config.script.display()
            );

            match RoleClassifier::new(classifier_config)
                .classify(result.segments())
                .await
            {
                Ok(roles) => {
                    println!("\n🎭 Speaker roles:");
                    println!("{roles}");
                    Ok(())
                }
                Err(message) => {
                    eprintln!("❌ {message}");
                    Err(anyhow!(message))
                }
            }
        }
    }
}
