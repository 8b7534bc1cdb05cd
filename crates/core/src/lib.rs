//! Core logic of the Ellie support agent: provider selection, the coping
//! strategy lookup and its tool service, the LLM client and the session that
//! drives a conversation.

pub mod agent;
pub mod llm_client;
pub mod prompts;
pub mod providers;
pub mod room;
pub mod session;
pub mod support;

pub use agent::{Agent, SupportService};
pub use providers::{Credentials, ProviderPlan, select_providers};
pub use room::Room;
pub use session::{AgentSession, VadSettings};
pub use support::{SupportResponse, provide_support};
