//! Interactive session command.

use crate::cli::preflight;
use crate::cli::{resolve_length, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use crate::state::{Stage, SummaryLength};
use console::style;
use std::io::{self, BufRead, Write};

/// A line typed at the session prompt.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Exit,
    Help,
    History,
    Clear,
    Length(&'a str),
    Save { index: usize, path: &'a str },
    Submit(&'a str),
    Invalid(String),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "exit" | "quit" if rest.is_empty() => Input::Exit,
        "help" if rest.is_empty() => Input::Help,
        "history" if rest.is_empty() => Input::History,
        "clear" if rest.is_empty() => Input::Clear,
        "length" if !rest.is_empty() => Input::Length(rest),
        "save" => {
            let Some((index, path)) = rest.split_once(char::is_whitespace) else {
                return Input::Invalid("Usage: save <number> <file>".to_string());
            };
            match index.parse::<usize>() {
                Ok(index) if index > 0 => Input::Save {
                    index,
                    path: path.trim(),
                },
                _ => Input::Invalid(format!("Not a history number: {}", index)),
            }
        }
        _ => Input::Submit(line),
    }
}

/// Run the interactive session.
pub async fn run_session(length: Option<&str>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'recap doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut length = resolve_length(length, settings.general.default_length);
    let session = Session::new(Orchestrator::new(settings)?);

    println!("\n{}", style("Recap Session").bold().cyan());
    println!(
        "{}\n",
        style("Paste a YouTube URL or ask a question. Type 'help' for commands, 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style(format!("You ({}):", length)).green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_input(&line) {
            Input::Exit => {
                Output::info("Goodbye!");
                break;
            }
            Input::Help => print_help(),
            Input::History => {
                let history = session.history();
                if history.is_empty() {
                    Output::info("No results yet.");
                }
                for (i, entry) in history.iter().enumerate() {
                    Output::history_entry(i + 1, entry);
                }
            }
            Input::Clear => {
                session.clear();
                Output::info("History cleared.");
            }
            Input::Length(value) => match value.parse::<SummaryLength>() {
                Ok(new_length) => {
                    length = new_length;
                    Output::info(&format!("Summary length set to {}", length));
                }
                Err(e) => Output::warning(&e),
            },
            Input::Save { index, path } => {
                let history = session.history();
                match history.get(index - 1) {
                    Some(entry) => {
                        let path = Settings::expand_path(path);
                        match std::fs::write(&path, &entry.output) {
                            Ok(()) => Output::success(&format!("Saved to {}", path.display())),
                            Err(e) => Output::error(&format!("Failed to save: {}", e)),
                        }
                    }
                    None => Output::warning(&format!("No history entry {}", index)),
                }
            }
            Input::Invalid(message) => Output::warning(&message),
            Input::Submit(text) => {
                let pb = Output::spinner(Stage::Routing.label());
                let result = session
                    .submit_with_progress(text, length, &|stage: Stage| Output::stage(&pb, stage))
                    .await;
                pb.finish_and_clear();

                match result {
                    Ok((_, entry)) if entry.failed => Output::error(&entry.output),
                    Ok((_, entry)) => Output::answer(&entry.output),
                    Err(e) => Output::error(&e.to_string()),
                }
            }
        }
    }

    Ok(())
}

fn print_help() {
    Output::kv("<url or question>", "summarize a video or answer a question");
    Output::kv("length <short|medium|long>", "change the summary length");
    Output::kv("history", "list previous results");
    Output::kv("save <n> <file>", "save result n as a text file");
    Output::kv("clear", "clear the history");
    Output::kv("exit", "leave the session");
}
