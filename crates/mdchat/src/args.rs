//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Chat with an LLM, keeping the conversation in a markdown file.
#[derive(Debug, Parser)]
#[command(name = "mdchat", version, about)]
pub struct Args {
    /// The provider/model to use.
    #[arg(long, default_value = "openai/o3-mini")]
    pub model: String,

    /// The API key to use, as provider=api_key.
    #[arg(long, default_value = "")]
    pub api_key: String,

    /// Chat history markdown file.
    #[arg(long)]
    pub history_file: PathBuf,

    /// Clear history before doing anything else.
    #[arg(short = 'c', long = "clear")]
    pub clear: bool,

    /// Open the history file with $EDITOR instead of chatting.
    #[arg(long)]
    pub editor: bool,

    /// The LLM system prompt. Overridden by the history file.
    #[arg(long, default_value = "")]
    pub system_prompt: String,

    /// Words forming the user message.
    #[arg(trailing_var_arg = true)]
    pub message: Vec<String>,
}
