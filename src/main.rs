mod cli;
mod models;
mod picker;
mod tasklist;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use ui::run_tui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            use clap_complete::{generate, Shell};
            let shell = shell.to_lowercase();
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                _ => {
                    println!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskpad", &mut std::io::stdout());
        }
        Some(Commands::Tui) | None => {
            run_tui()?;
        }
    }

    Ok(())
}
