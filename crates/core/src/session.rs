//! Agent Session
//!
//! Ties the selected providers, the agent's instructions and the support tool
//! together and drives the conversation turn by turn. Each turn follows a
//! ReAct (Reason and Act) cycle:
//!
//! 1. The LLM decides whether to answer directly or call tools.
//! 2. Requested tools run through an in-process MCP client.
//! 3. The tool results go back to the LLM, whose streamed answer is the reply.

use crate::{
    agent::{Agent, SupportService},
    llm_client::{LLMAction, LLMClient, LLMStreamEvent},
    providers::ProviderPlan,
    room::Room,
};
use anyhow::{Context, Result};
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolArgs,
    FunctionObjectArgs,
};
use futures::StreamExt;
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParam, RawContent},
    service::{RoleClient, RunningService},
};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Voice activity detection thresholds handed to the speech front end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VadSettings {
    /// Shortest sound that counts as speech.
    pub min_speech_duration: Duration,
    /// Silence needed before the user's turn is considered over.
    pub min_silence_duration: Duration,
}

impl Default for VadSettings {
    fn default() -> Self {
        Self {
            min_speech_duration: Duration::from_millis(100),
            min_silence_duration: Duration::from_millis(500),
        }
    }
}

/// A running conversation between the agent and one user.
pub struct AgentSession {
    agent: Agent,
    plan: ProviderPlan,
    vad: VadSettings,
    llm_client: Arc<dyn LLMClient>,
    history: Vec<ChatCompletionRequestMessage>,
    tools: Vec<ChatCompletionTool>,
    mcp_client: RunningService<RoleClient, ()>,
    tool_handle: JoinHandle<()>,
}

impl AgentSession {
    /// Starts the support tool service and connects the session to it.
    pub async fn start(
        agent: Agent,
        plan: ProviderPlan,
        vad: VadSettings,
        llm_client: Arc<dyn LLMClient>,
    ) -> Result<Self> {
        let (server_transport, client_transport) = tokio::io::duplex(4096);

        let tool_handle = tokio::spawn(async move {
            match SupportService::new().serve(server_transport).await {
                Ok(service) => {
                    let _ = service.waiting().await;
                }
                Err(e) => error!(error = ?e, "Support tool service failed to start"),
            }
        });
        let mcp_client = ().serve(client_transport).await?;
        let tools = list_tools(&mcp_client).await?;

        info!(
            stt = %plan.stt,
            tts = %plan.tts,
            llm = %plan.llm,
            min_speech_ms = vad.min_speech_duration.as_millis() as u64,
            min_silence_ms = vad.min_silence_duration.as_millis() as u64,
            tools = tools.len(),
            "Agent session started"
        );

        Ok(Self {
            agent,
            plan,
            vad,
            llm_client,
            history: Vec::new(),
            tools,
            mcp_client,
            tool_handle,
        })
    }

    pub fn plan(&self) -> &ProviderPlan {
        &self.plan
    }

    pub fn vad(&self) -> &VadSettings {
        &self.vad
    }

    /// The conversation so far, without the agent's instructions.
    pub fn history(&self) -> &[ChatCompletionRequestMessage] {
        &self.history
    }

    /// Generates an agent turn steered by one-off `instructions`.
    ///
    /// The instructions are not kept in the history; the reply is.
    pub async fn generate_reply(&mut self, instructions: &str) -> Result<String> {
        let mut messages = self.history.clone();
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instructions)
                .build()?
                .into(),
        );
        let reply = self.run_turn(messages).await?;
        self.remember_reply(&reply)?;
        Ok(reply)
    }

    /// Answers a user utterance.
    ///
    /// The utterance joins the history only once the turn succeeds, so a failed
    /// turn leaves the history as it was.
    pub async fn reply_to(&mut self, user_text: &str) -> Result<String> {
        let user_message: ChatCompletionRequestMessage =
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_text)
                .build()?
                .into();
        let mut messages = self.history.clone();
        messages.push(user_message.clone());

        let reply = self.run_turn(messages).await?;
        self.history.push(user_message);
        self.remember_reply(&reply)?;
        Ok(reply)
    }

    /// Greets the user, then answers every transcript until the room closes.
    ///
    /// A failed turn is logged and skipped; the conversation continues.
    pub async fn run<R: Room + ?Sized>(&mut self, room: &mut R, greeting: &str) -> Result<()> {
        let opening = self
            .generate_reply(greeting)
            .await
            .context("Failed to generate greeting")?;
        room.speak(&opening).await?;

        while let Some(transcript) = room.next_transcript().await? {
            let transcript = transcript.trim();
            if transcript.is_empty() {
                continue;
            }
            match self.reply_to(transcript).await {
                Ok(reply) if !reply.is_empty() => room.speak(&reply).await?,
                Ok(_) => warn!("LLM produced an empty reply."),
                Err(e) => error!(error = ?e, "Failed to answer user turn"),
            }
        }

        info!("Room closed. Ending session.");
        Ok(())
    }

    /// Stops the tool service.
    pub async fn close(self) {
        if let Err(e) = self.mcp_client.cancel().await {
            warn!(error = ?e, "MCP client did not shut down cleanly");
        }
        self.tool_handle.abort();
    }

    async fn run_turn(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
        let action = self
            .llm_client
            .decide_action(
                self.agent.instructions.clone(),
                messages.clone(),
                self.tools.clone(),
            )
            .await?;

        let tool_calls = match action {
            LLMAction::TextResponse(text) => return Ok(text),
            LLMAction::ToolCall(tool_calls) => tool_calls,
        };

        let mut history_with_tools = messages;
        history_with_tools.push(
            ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()?
                .into(),
        );
        for call in &tool_calls {
            debug!(tool = %call.function.name, "LLM requested tool");
            let result = self
                .call_tool(&call.function.name, &call.function.arguments)
                .await?;
            history_with_tools.push(
                ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(call.id.clone())
                    .content(result)
                    .build()?
                    .into(),
            );
        }

        let mut stream = self
            .llm_client
            .stream_after_tools(self.agent.instructions.clone(), history_with_tools)
            .await?;
        let mut full_response = String::new();
        while let Some(event) = stream.next().await {
            let LLMStreamEvent::TextChunk(chunk) = event?;
            full_response.push_str(&chunk);
        }
        Ok(full_response)
    }

    async fn call_tool(&self, name: &str, arguments: &str) -> Result<String> {
        let result = self
            .mcp_client
            .peer()
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(serde_json::from_str(arguments)?),
            })
            .await?;

        let annotated_content = result
            .content
            .context("Tool call returned no content")?
            .pop()
            .context("Content list was empty")?;
        Ok(match annotated_content.raw {
            RawContent::Text(text_content) => text_content.text,
            _ => "{\"error\": \"Unexpected content type from tool\"}".to_string(),
        })
    }

    fn remember_reply(&mut self, reply: &str) -> Result<()> {
        if !reply.is_empty() {
            self.history.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(reply)
                    .build()?
                    .into(),
            );
        }
        Ok(())
    }
}

/// Converts the tools advertised by the MCP server into LLM tool definitions.
async fn list_tools(mcp_client: &RunningService<RoleClient, ()>) -> Result<Vec<ChatCompletionTool>> {
    mcp_client
        .list_all_tools()
        .await?
        .into_iter()
        .map(|t| -> Result<ChatCompletionTool> {
            Ok(ChatCompletionToolArgs::default()
                .function(
                    FunctionObjectArgs::default()
                        .name(t.name)
                        .description(t.description.unwrap_or_default())
                        .parameters(serde_json::to_value(&*t.input_schema)?)
                        .build()?,
                )
                .build()?)
        })
        .collect()
}
