//! Support Agent Tool Service
//!
//! Exposes the coping-strategy lookup as an MCP (Model Context Protocol) tool
//! so the language model can call it during a conversation. The service holds
//! no state; every call is answered from the static strategy catalog.

use crate::support::{self, DEFAULT_EMOTIONAL_STATE};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

/// Name under which the support lookup is advertised to the model.
pub const SUPPORT_TOOL_NAME: &str = "provide_mental_health_support";

/// The conversational agent: its standing instructions for the model.
///
/// The support tool is always attached; the session wires it up.
#[derive(Debug, Clone)]
pub struct Agent {
    pub instructions: String,
}

impl Agent {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }
}

// --- Data Structures for Tools ---

/// Arguments for the `provide_mental_health_support` tool.
#[derive(Deserialize, JsonSchema, Debug)]
pub struct SupportArgs {
    /// What the user said is troubling them.
    #[schemars(description = "The user's concern in their own words")]
    pub user_concern: String,
    /// How the user appears to feel. Recorded only.
    #[schemars(description = "The user's emotional state, e.g. 'anxious' or 'sad'. Defaults to 'neutral'")]
    #[serde(default)]
    pub emotional_state: Option<String>,
}

// --- Service and Handler Implementation ---

/// MCP service answering support tool calls.
#[derive(Clone)]
pub struct SupportService {
    tool_router: ToolRouter<Self>,
}

impl Default for SupportService {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for SupportService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Coping strategies for stress, anxiety, depression and overwhelm.".to_string(),
            ),
            ..Default::default()
        }
    }
}

#[tool_router]
impl SupportService {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// Looks up coping strategies for the user's stated concern.
    ///
    /// Returns the support record as JSON text.
    #[tool(
        description = "Provides mental health support and coping strategies for stress, anxiety, and emotional concerns."
    )]
    pub async fn provide_mental_health_support(
        &self,
        args: Parameters<SupportArgs>,
    ) -> Result<String, String> {
        let emotional_state = args
            .0
            .emotional_state
            .as_deref()
            .unwrap_or(DEFAULT_EMOTIONAL_STATE);
        info!(
            emotional_state,
            "Executing tool 'provide_mental_health_support'"
        );
        let response = support::provide_support(&args.0.user_concern, Some(emotional_state));
        serde_json::to_string(&response)
            .map_err(|e| format!("Failed to serialize support response: {}", e))
    }
}
