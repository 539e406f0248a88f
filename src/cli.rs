use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the task tracker TUI (the default when no command is given)
    Tui,
    /// Generate shell completions
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}
