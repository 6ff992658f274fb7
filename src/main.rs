use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use textpatch::{file_tracking_status, ls_directory, stage_path, FileEditor, ProjectPolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "textpatch")]
#[command(about = "Anchor-based text mutation engine for editing agents", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit the outcome as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the first occurrence of an anchor string in a file
    Edit {
        /// Absolute path to the file
        file: PathBuf,

        /// Exact text to replace; omit to create a new file
        #[arg(long)]
        old: Option<String>,

        /// Read the anchor text from a file instead
        #[arg(long, conflicts_with = "old")]
        old_file: Option<PathBuf>,

        /// Replacement text
        #[arg(long)]
        new: Option<String>,

        /// Read the replacement text from a file instead
        #[arg(long, conflicts_with = "new")]
        new_file: Option<PathBuf>,

        /// Show a unified diff of the change
        #[arg(short, long)]
        diff: bool,
    },

    /// Replace the entire contents of a file
    Write {
        /// Absolute path to the file
        file: PathBuf,

        /// Content to write; reads stdin when omitted
        #[arg(long)]
        content: Option<String>,
    },

    /// List a directory tree
    Ls {
        /// Absolute path to the directory
        directory: PathBuf,
    },

    /// Check whether a file is tracked by git
    Status {
        /// Path to the file
        file: PathBuf,
    },

    /// Stage a file or directory (git add, no commit)
    Stage {
        /// Path to the file or directory
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let editor = FileEditor::new(ProjectPolicy);

    let outcome = match cli.command {
        Commands::Edit {
            file,
            old,
            old_file,
            new,
            new_file,
            diff,
        } => cmd_edit(&editor, &file, old, old_file, new, new_file, diff),

        Commands::Write { file, content } => cmd_write(&editor, &file, content),

        Commands::Ls { directory } => {
            ls_directory(&directory, &ProjectPolicy).map_err(|e| e.to_string())
        }

        Commands::Status { file } => file_tracking_status(&file).map_err(|e| e.to_string()),

        Commands::Stage { path } => stage_path(&path).map_err(|e| e.to_string()),
    };

    report(cli.json, outcome)
}

fn report(json: bool, outcome: std::result::Result<String, String>) -> Result<()> {
    match outcome {
        Ok(message) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "success": true, "message": message })
                );
            } else {
                println!("{} {}", "✓".green(), message);
            }
            Ok(())
        }
        Err(message) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "success": false, "message": message })
                );
            } else {
                eprintln!("{} {}", "✗".red(), message);
            }
            std::process::exit(1);
        }
    }
}

fn cmd_edit(
    editor: &FileEditor,
    file: &Path,
    old: Option<String>,
    old_file: Option<PathBuf>,
    new: Option<String>,
    new_file: Option<PathBuf>,
    diff: bool,
) -> std::result::Result<String, String> {
    // Empty anchor is the file-creation path, so --old is optional.
    let old = resolve_text(old, old_file).map_err(|e| e.to_string())?;
    if new.is_none() && new_file.is_none() {
        return Err("one of --new or --new-file is required".to_string());
    }
    let new = resolve_text(new, new_file).map_err(|e| e.to_string())?;

    let original = fs::read_to_string(file).ok();
    let message = editor
        .edit_file_content(file, &old, &new, None)
        .map_err(|e| e.to_string())?;

    if diff {
        let before = original.unwrap_or_default();
        let after = fs::read_to_string(file).unwrap_or_default();
        display_diff(file, &before, &after);
    }

    Ok(message)
}

fn cmd_write(
    editor: &FileEditor,
    file: &Path,
    content: Option<String>,
) -> std::result::Result<String, String> {
    let content = match content {
        Some(content) => content,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buffer
        }
    };
    editor
        .write_file_content(file, &content)
        .map_err(|e| e.to_string())
}

/// Resolve a text argument supplied inline or via a file; absent means empty.
fn resolve_text(inline: Option<String>, from_file: Option<PathBuf>) -> Result<String> {
    match (inline, from_file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => {
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))
        }
        (None, None) => Ok(String::new()),
    }
}

/// Show a unified diff between the original and edited content.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (edited)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", line);
    }
}
