use anyhow::Result;
use async_trait::async_trait;

/// The conversation endpoint a session talks through.
///
/// A room delivers final user transcripts and accepts the agent's replies for
/// playback. Audio capture, transcription and synthesis happen behind it.
#[async_trait]
pub trait Room: Send {
    /// Waits for the next final user utterance. `None` means the user left.
    async fn next_transcript(&mut self) -> Result<Option<String>>;

    /// Delivers an agent reply to the user.
    async fn speak(&mut self, text: &str) -> Result<()>;
}
