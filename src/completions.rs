use std::io::{self, Write};

use clap_complete::{generate, Shell};

use crate::app::AppError;

const BIN_NAME: &str = "casebook";

pub fn generate_completions(shell: Shell, buf: &mut dyn Write) {
    let mut cmd = crate::cli::styled_command();
    generate(shell, &mut cmd, BIN_NAME, buf);
}

pub fn detect_current_shell() -> Option<Shell> {
    shell_from_path(&std::env::var("SHELL").ok()?)
}

fn shell_from_path(shell_var: &str) -> Option<Shell> {
    let basename = shell_var.rsplit('/').next()?;
    match basename {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "elvish" => Some(Shell::Elvish),
        "powershell" | "pwsh" => Some(Shell::PowerShell),
        _ => None,
    }
}

pub fn run_completions_command(shell: Option<Shell>) -> Result<(), AppError> {
    let shell = match shell.or_else(detect_current_shell) {
        Some(shell) => shell,
        None => {
            return Err(AppError::InvalidArgument(
                "unable to detect shell from $SHELL; pass a shell name".to_string(),
            ))
        }
    };
    let mut stdout = io::stdout().lock();
    generate_completions(shell, &mut stdout);
    Ok(())
}
