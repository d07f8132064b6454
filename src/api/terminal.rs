//! # Terminal Front End
//!
//! Line-oriented presentation of the client: the rendered view is printed as
//! numbered buttons, prompts read one line each, notices are printed.
//!
//! A prompt answered with end-of-input counts as dismissed.

use crate::application::interaction::{ListingInput, Notice, UserInteraction};
use crate::application::state::Event;
use crate::application::view::View;
use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;

/// What the user picked at the menu prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Dispatch the event carried by a button.
    Press(Event),
    /// Re-read listings.
    Refresh,
    /// Leave the program.
    Quit,
}

/// Interprets a menu answer against `view`.
///
/// Accepts a button number (1-based), `r` to refresh or `q` to quit.
#[must_use]
pub fn parse_choice(view: &View, answer: &str) -> Option<Choice> {
    match answer.trim() {
        "q" | "quit" => Some(Choice::Quit),
        "r" | "refresh" => Some(Choice::Refresh),
        other => {
            let number: usize = other.parse().ok()?;
            let button = view.buttons().nth(number.checked_sub(1)?)?;
            Some(Choice::Press(button.event.clone()))
        }
    }
}

/// [`UserInteraction`] over a line reader and a writer.
#[derive(Debug)]
pub struct TerminalInteraction<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl TerminalInteraction<BufReader<Stdin>, Stdout> {
    /// Creates an interaction on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> TerminalInteraction<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates an interaction over `input` and `output`.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Writes `prompt` and reads one line.
    ///
    /// Returns `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub async fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut output = self.output.lock().await;
            output.write_all(format!("{prompt}: ").as_bytes()).await?;
            output.flush().await?;
        }

        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Writes `text` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub async fn say(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await
    }

    async fn answer(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, prompt, "prompt failed");
            None
        })
    }

    /// Consumes the interaction, returning the writer.
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

#[async_trait]
impl<R, W> UserInteraction for TerminalInteraction<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn request_listing(&self) -> ListingInput {
        ListingInput {
            nft_contract: self.answer("NFT Contract Address").await,
            token_id: self.answer("Token ID").await,
            price: self.answer("Price in ETH").await,
        }
    }

    async fn notify(&self, notice: Notice) {
        if let Err(e) = self.say(notice.message()).await {
            tracing::warn!(error = %e, ?notice, "notice not shown");
        }
    }
}
