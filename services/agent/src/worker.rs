//! Worker entrypoint: wires configuration, provider selection and the session.

use crate::{cli::Mode, config::Config, console::ConsoleRoom};
use anyhow::{Context, Result};
use ellie_core::{
    Agent, AgentSession, ProviderPlan, Room, SupportService, VadSettings,
    llm_client::{LLMClient, OpenAICompatibleClient},
    prompts::Prompts,
    select_providers,
};
use rmcp::ServiceExt;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Directives used in `dev`: our crates at DEBUG, dependencies at INFO.
const DEV_LOG_DIRECTIVES: &str = "info,ellie_core=debug,ellie_agent=debug";

/// Builds the log filter for `mode`.
pub fn log_filter(mode: Mode, config: &Config) -> EnvFilter {
    match mode {
        Mode::Dev => EnvFilter::new(DEV_LOG_DIRECTIVES),
        Mode::Start | Mode::Tools => {
            EnvFilter::default().add_directive(LevelFilter::from_level(config.log_level).into())
        }
    }
}

/// Initializes the global tracing subscriber.
///
/// Logs always go to stderr: stdout carries the console conversation or the
/// MCP transport.
pub fn init_logging(mode: Mode, config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(mode, config))
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

/// Fallback notices for every missing optional credential.
pub fn credential_notices(config: &Config) -> Vec<&'static str> {
    let mut notices = Vec::new();
    if !config.credentials.has_deepgram() {
        notices.push("DEEPGRAM_API_KEY not set - will use Groq for STT");
    }
    if !config.credentials.has_cartesia() {
        notices.push("CARTESIA_API_KEY not set - will use Groq for TTS");
    }
    if !config.room.is_complete() {
        notices.push("LiveKit room credentials incomplete - running with the console room");
    }
    notices
}

/// Logs the status of every optional credential.
pub fn report_credentials(config: &Config) {
    for notice in credential_notices(config) {
        info!("{notice}");
    }
    if let (true, Some(url)) = (config.room.is_complete(), &config.room.url) {
        info!(%url, "Room credentials loaded");
    }
}

/// Runs the worker in the requested mode until the conversation ends.
pub async fn run(mode: Mode, config: Config) -> Result<()> {
    info!("Mental Health Support Agent starting");
    info!("Providing empathetic support for stress, anxiety, and emotional wellness");
    report_credentials(&config);

    match mode {
        Mode::Tools => serve_tools().await,
        Mode::Dev | Mode::Start => {
            let mut room = ConsoleRoom::stdio();
            let groq_api_key = config.credentials.groq_api_key.clone();
            run_conversation(&config, &mut room, |plan| {
                Arc::new(OpenAICompatibleClient::for_backend(&plan.llm, &groq_api_key))
                    as Arc<dyn LLMClient>
            })
            .await
        }
    }
}

/// Builds a session from `config` and talks to the user through `room`.
///
/// `make_llm` receives the selected providers and returns the client used for
/// every model turn.
pub async fn run_conversation<R, F>(config: &Config, room: &mut R, make_llm: F) -> Result<()>
where
    R: Room + ?Sized,
    F: FnOnce(&ProviderPlan) -> Arc<dyn LLMClient>,
{
    let prompts = Prompts::load(config.prompts_path.as_deref())?;

    info!("Configuring providers...");
    let plan = select_providers(&config.credentials);
    let llm_client = make_llm(&plan);

    let agent = Agent::new(prompts.system_prompt);
    let mut session = AgentSession::start(agent, plan, VadSettings::default(), llm_client)
        .await
        .context("Failed to start agent session")?;
    info!("Agent ready! Waiting for the user...");
    info!("This agent provides general wellness support. For professional help, please consult a licensed mental health provider.");

    let result = session.run(room, &prompts.greeting).await;
    session.close().await;
    result
}

/// Serves the support tool to an external MCP client over stdio.
async fn serve_tools() -> Result<()> {
    info!("Serving support tool over MCP stdio");
    let service = SupportService::new()
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP stdio server")?;
    service.waiting().await?;
    info!("MCP client disconnected.");
    Ok(())
}
