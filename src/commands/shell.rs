//! Interactive front-end over the [`Presenter`].
//!
//! The package list refreshes in the background and is printed whenever a
//! new listing arrives, while commands keep being read from the input.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::application::{DeleteMode, DeleteOutcome, Presenter};
use crate::runtime::Runtime;

use super::config::Config;

const PROMPT: &str = "pkgex> ";

const HELP: &str = "\
Commands:
  list, ls             Show the package list (* marks the selection)
  refresh, r           Reload the package list
  select <name|#>      Select a package by name or number
  install [name]       Install a package
  delete [name]        Delete the folder of, or uninstall, the selected package
  open [name]          Open the package folder in the file browser
  help                 Show this help
  quit, exit           Leave";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive session on stdin and stdout.
#[tracing::instrument(skip(runtime, config))]
pub async fn shell<R: Runtime + 'static>(runtime: Arc<R>, config: &Config) -> Result<()> {
    let site_packages = config.site_packages(runtime.as_ref()).await;
    let mut presenter = Presenter::new(runtime, config.pip(), site_packages);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_shell(&mut presenter, stdin, &mut stdout).await
}

/// Drive `presenter` from the lines of `input` until `quit` or end of input.
pub async fn run_shell<R, I, W>(presenter: &mut Presenter<R>, input: I, out: &mut W) -> Result<()>
where
    R: Runtime + 'static,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    presenter.refresh();
    writeln!(out, "Loading package list... (type `help` for commands)")?;
    write!(out, "{}", PROMPT)?;
    out.flush()?;

    loop {
        tokio::select! {
            _ = presenter.next_listing() => {
                writeln!(out)?;
                write_packages(presenter, out)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if execute(presenter, &line, &mut lines, out).await? == Flow::Quit {
                    break;
                }
            }
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

async fn execute<R, I, W>(
    presenter: &mut Presenter<R>,
    line: &str,
    lines: &mut Lines<I>,
    out: &mut W,
) -> Result<Flow>
where
    R: Runtime + 'static,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (line, None),
    };

    match command {
        "" => {}
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "help" | "?" => writeln!(out, "{}", HELP)?,
        "list" | "ls" => write_packages(presenter, out)?,
        "refresh" | "r" => {
            presenter.refresh();
            writeln!(out, "Refreshing...")?;
        }
        "select" => select(presenter, arg, out)?,
        "install" => {
            let name = match arg {
                Some(name) => Some(name.to_string()),
                None => ask(lines, out, "Enter the package name to install: ").await?,
            };
            if let Some(name) = name {
                if presenter.install(&name) {
                    writeln!(out, "Installing {} in the background.", name.trim())?;
                }
            }
        }
        "delete" | "rm" => delete(presenter, arg, lines, out).await?,
        "open" => {
            let name = arg
                .map(str::to_string)
                .or_else(|| presenter.selected().map(|p| p.name.clone()));
            match name {
                Some(name) => match presenter.open_folder(&name) {
                    Some(dir) => writeln!(out, "Opened {}", dir.display())?,
                    None => writeln!(out, "No folder for {}.", name)?,
                },
                None => writeln!(out, "Select a package first.")?,
            }
        }
        other => writeln!(out, "Unknown command: {} (type `help`)", other)?,
    }
    Ok(Flow::Continue)
}

fn select<R: Runtime + 'static, W: Write>(
    presenter: &mut Presenter<R>,
    arg: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let Some(arg) = arg else {
        writeln!(out, "Usage: select <name|#>")?;
        return Ok(());
    };

    // Numbers are 1-based, as printed by `list`.
    let selected = match arg.parse::<usize>() {
        Ok(n) if n > 0 => presenter.select_index(n - 1) || presenter.select_name(arg),
        _ => presenter.select_name(arg),
    };
    match presenter.selected() {
        Some(package) if selected => writeln!(out, "Selected {}", package)?,
        _ => writeln!(out, "No package named {}.", arg)?,
    }
    Ok(())
}

async fn delete<R, I, W>(
    presenter: &mut Presenter<R>,
    arg: Option<&str>,
    lines: &mut Lines<I>,
    out: &mut W,
) -> Result<()>
where
    R: Runtime + 'static,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let name = arg
        .map(str::to_string)
        .or_else(|| presenter.selected().map(|p| p.name.clone()));

    let mode = match name {
        Some(_) => {
            let answer = ask(lines, out, "Select delete option ([1] Delete, [2] Uninstall): ").await?;
            parse_delete_mode(answer.as_deref().unwrap_or_default())
        }
        None => Some(DeleteMode::Folder),
    };
    let Some(mode) = mode else {
        writeln!(out, "Cancelled.")?;
        presenter.refresh();
        return Ok(());
    };

    match presenter.delete(name.as_deref(), mode) {
        DeleteOutcome::NothingSelected => {
            writeln!(out, "No Package Selected: Please select a package to delete.")?
        }
        DeleteOutcome::FolderRemoved(dir) => writeln!(out, "Deleted {}", dir.display())?,
        DeleteOutcome::UninstallStarted => writeln!(
            out,
            "Uninstalling {} in the background.",
            name.as_deref().unwrap_or_default()
        )?,
        DeleteOutcome::FolderMissing | DeleteOutcome::FolderKept | DeleteOutcome::UninstallFailed => {}
    }
    Ok(())
}

fn parse_delete_mode(answer: &str) -> Option<DeleteMode> {
    match answer.trim().to_lowercase().as_str() {
        "1" | "d" | "delete" => Some(DeleteMode::Folder),
        "2" | "u" | "uninstall" => Some(DeleteMode::Uninstall),
        _ => None,
    }
}

/// Prompt for one line. `None` on end of input or an empty answer.
async fn ask<I, W>(lines: &mut Lines<I>, out: &mut W, prompt: &str) -> Result<Option<String>>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", prompt)?;
    out.flush()?;
    let answer = lines.next_line().await?;
    Ok(answer
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty()))
}

fn write_packages<R: Runtime + 'static, W: Write>(presenter: &Presenter<R>, out: &mut W) -> Result<()> {
    let packages = presenter.packages();
    if packages.is_empty() {
        writeln!(out, "Package List: (empty)")?;
        return Ok(());
    }

    writeln!(out, "Package List:")?;
    let width = packages.len().to_string().len();
    for (i, package) in packages.iter().enumerate() {
        let marker = if presenter.selected_index() == Some(i) { '*' } else { ' ' };
        writeln!(out, "{} {:>width$}  {}", marker, i + 1, package, width = width)?;
    }
    Ok(())
}
