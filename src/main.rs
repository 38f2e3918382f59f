//! TalkCoach - Pronunciation coaching backend
//!
//! CLI front end for the coaching services: run an analysis over a
//! request file, generate practice content, or hold one turn of
//! conversation practice.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use talkcoach::config::Config;
use talkcoach::llm::ClovaClient;
use talkcoach::schemas::{
    ChatRequest, LearningKind, SegmentFeedbackRequest, WaveformFeedbackRequest,
};
use talkcoach::service;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a feedback request JSON file and print the judgment
    Analyze {
        /// Request file; segment requests carry a "segments" field,
        /// waveform requests carry "ref_graph"/"usr_graph"
        file: PathBuf,

        /// Also generate the coaching sentence via Clova Studio
        #[arg(long)]
        feedback: bool,
    },

    /// Generate a practice word or sentence
    Learning {
        #[arg(long, value_enum, default_value = "word")]
        kind: ContentKind,
    },

    /// One turn of conversation practice
    Chat {
        /// Conversation topic (e.g. food, travel, weather)
        #[arg(long)]
        topic: String,

        /// What the learner said; omit to start the conversation
        input: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ContentKind {
    Word,
    Sentence,
}

impl From<ContentKind> for LearningKind {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Word => LearningKind::Word,
            ContentKind::Sentence => LearningKind::Sentence,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load()?;

    match args.command {
        Command::Analyze { file, feedback } => analyze(&config, &file, feedback).await?,
        Command::Learning { kind } => {
            let client = ClovaClient::new(config.clova.clone());
            let resp = service::learning_content(&client, kind.into()).await?;
            println!("{}", resp.result);
        }
        Command::Chat { topic, input } => {
            let client = ClovaClient::new(config.clova.clone());
            let req = ChatRequest {
                topic,
                user_input: input,
                history: Vec::new(),
            };
            let resp = service::chat_turn(&client, &req).await?;
            println!("{}", resp.ai_response);
        }
    }

    Ok(())
}

async fn analyze(config: &Config, file: &PathBuf, feedback: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read request file {}", file.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)?;

    // The two request shapes are distinguished by their timing payload
    if raw.get("segments").is_some() {
        let req: SegmentFeedbackRequest = serde_json::from_value(raw)?;
        if feedback {
            let client = ClovaClient::new(config.clova.clone());
            let resp = service::segment_feedback(&client, &config.tuning, &req).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        } else {
            req.validate()?;
            let analysis = talkcoach::analysis::analyze_segments(
                &config.tuning,
                &req.target_text,
                &req.result_text,
                &req.segments,
            );
            info!("📊 issue: {}", analysis.issue);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
    } else {
        let req: WaveformFeedbackRequest = serde_json::from_value(raw)?;
        if feedback {
            let client = ClovaClient::new(config.clova.clone());
            let resp = service::waveform_feedback(&client, &config.tuning, &req).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        } else {
            let (ref_graph, usr_graph) = req.validated_graphs()?;
            let sample_rate = f64::from(config.tuning.silence.sample_rate_hz.max(1));
            let user_duration = req
                .duration
                .unwrap_or(usr_graph.len() as f64 / sample_rate);
            let target_duration = ref_graph.len() as f64 / sample_rate;
            let analysis = talkcoach::analysis::analyze_waveform(
                &config.tuning,
                &req.target_text,
                &req.result_text,
                target_duration,
                user_duration,
                &ref_graph,
                &usr_graph,
            );
            info!("📊 issue: {}", analysis.issue);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
    }

    Ok(())
}
