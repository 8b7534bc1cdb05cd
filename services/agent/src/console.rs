//! A room backed by the terminal: typed lines stand in for final transcripts
//! and replies are printed instead of synthesized.

use anyhow::Result;
use async_trait::async_trait;
use ellie_core::Room;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Speaker label printed before each agent reply.
const AGENT_LABEL: &str = "Ellie";

pub struct ConsoleRoom<R, W> {
    lines: Lines<R>,
    output: W,
}

impl ConsoleRoom<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsoleRoom<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            lines: input.lines(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[async_trait]
impl<R, W> Room for ConsoleRoom<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn next_transcript(&mut self) -> Result<Option<String>> {
        self.output.write_all(b"> ").await?;
        self.output.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    async fn speak(&mut self, text: &str) -> Result<()> {
        self.output
            .write_all(format!("{AGENT_LABEL}: {text}\n").as_bytes())
            .await?;
        self.output.flush().await?;
        Ok(())
    }
}
