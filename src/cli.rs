//! Command-line surface: argument parsing and the interactive prompt loop.

use clap::{Parser, Subcommand};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::config::{AgentConfig, DEFAULT_MODEL, DEFAULT_NUM_SEARCHES};
use crate::types::AppResult;

pub const RESEARCH_PROMPT: &str = "Enter your research query (or 'exit'): ";
pub const EVAL_PROMPT: &str = "\nQuery: ";
pub const EVAL_BANNER: &str =
    "Enter queries to evaluate (press Enter on an empty line or type 'exit' to quit).";

#[derive(Debug, Parser)]
#[command(name = "deep-research", version, about = "Deep Research Agent")]
pub struct Cli {
    /// Chat model used by the planner and writer
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Maximum number of sub-questions searched per run
    #[arg(long, global = true, default_value_t = DEFAULT_NUM_SEARCHES)]
    pub num_searches: usize,

    /// Replace the writer's report instructions
    #[arg(long, global = true)]
    pub system_prompt: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Generate research reports interactively (default)
    Research,
    /// Generate reports and score them with heuristics and an LLM judge
    Eval {
        /// Print each evaluation as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn agent_config(&self) -> AppResult<AgentConfig> {
        AgentConfig::new(self.model.clone(), self.num_searches, self.system_prompt.clone())
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Research)
    }
}

/// Blank input, `exit` or `quit` ends the loop.
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    input.is_empty() || input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

/// Prompt, read a line, hand it to `handle`, print the result; repeat until
/// an exit command or end of input. Returns how many queries were handled.
pub async fn run_interactive<R, W, F, Fut>(
    input: R,
    mut output: W,
    prompt: &str,
    working: Option<&str>,
    mut handle: F,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = anyhow::Result<String>>,
{
    let mut lines = input.lines();
    let mut handled = 0;

    loop {
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("Input closed");
            break;
        };
        if is_exit_command(&line) {
            break;
        }

        if let Some(message) = working {
            output.write_all(message.as_bytes()).await?;
            output.flush().await?;
        }

        let rendered = handle(line.trim().to_string()).await?;
        output.write_all(rendered.as_bytes()).await?;
        output.write_all(b"\n\n").await?;
        handled += 1;
    }

    output.flush().await?;
    Ok(handled)
}
