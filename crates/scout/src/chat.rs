// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `scout chat` command implementation.
//!
//! A terminal stand-in for the website widget. Talks to a running gateway,
//! persists the session between runs, and attaches photos with `/upload`.

use std::path::Path;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scout_config::model::ScoutConfig;
use scout_core::ScoutError;
use scout_core::types::Sender;
use scout_widget::{WidgetMessage, WidgetSession};

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Reset,
    Upload(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed {
        "/quit" | "/exit" => Input::Quit,
        "/reset" => Input::Reset,
        _ => match trimmed.strip_prefix("/upload") {
            Some(path) if path.is_empty() || path.starts_with(char::is_whitespace) => {
                Input::Upload(path.trim())
            }
            _ => Input::Message(trimmed),
        },
    }
}

fn print_message(message: &WidgetMessage) {
    let label = match message.sender {
        Sender::User => "you".blue().bold(),
        Sender::Bot | Sender::Unknown => "scout".green().bold(),
    };
    println!("{label}: {}", message.content);
    if let Some(image) = &message.image_reference {
        println!("     {}", format!("[image: {image}]").dimmed());
    }
}

/// Runs the `scout chat` REPL.
pub async fn run_chat(config: ScoutConfig, reset: bool) -> Result<(), ScoutError> {
    let mut session = WidgetSession::from_config(&config)?;

    if reset {
        session.reset().await?;
    } else if session.restore().await? {
        if let Some(id) = session.session_id() {
            println!("{}", format!("resumed {id}").dimmed());
        }
    }

    let mut rl = DefaultEditor::new()
        .map_err(|e| ScoutError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "scout chat".bold().green());
    println!(
        "Type {} to attach a photo, {} to start over, {} to exit.\n",
        "/upload <path>".yellow(),
        "/reset".yellow(),
        "/quit".yellow()
    );
    for message in session.messages() {
        print_message(message);
    }

    let prompt = format!("{}> ", "you".blue());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = parse_input(&line);
                if !matches!(input, Input::Message("")) {
                    let _ = rl.add_history_entry(&line);
                }
                match input {
                    Input::Quit => break,
                    Input::Reset => {
                        session.reset().await?;
                        println!("{}", "started a new conversation".dimmed());
                        for message in session.messages() {
                            print_message(message);
                        }
                    }
                    Input::Upload("") => {
                        eprintln!("{}: usage: /upload <path>", "error".red());
                    }
                    Input::Upload(path) => match session.upload(Path::new(path)).await {
                        Ok(uploaded) => println!(
                            "{}",
                            format!(
                                "attached {}; it will be sent with your next message (press enter to send it alone)",
                                uploaded.filename
                            )
                            .dimmed()
                        ),
                        Err(e) => {
                            if let Some(notice) = session.messages().last() {
                                print_message(notice);
                            }
                            eprintln!("{}", e.to_string().dimmed());
                        }
                    },
                    Input::Message("") if session.pending_image().is_none() => {}
                    Input::Message(text) => {
                        let waiting = "...".dimmed();
                        println!("{waiting}");
                        match session.send(text).await {
                            Ok(_) => {
                                if let Some(reply) = session.messages().last() {
                                    print_message(reply);
                                }
                            }
                            Err(e) => eprintln!("{}: {e}", "error".red()),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_commands() {
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("  /exit "), Input::Quit);
        assert_eq!(parse_input("/reset"), Input::Reset);
        assert_eq!(parse_input("/upload ./wasp.jpg"), Input::Upload("./wasp.jpg"));
        assert_eq!(parse_input("/upload"), Input::Upload(""));
    }

    #[test]
    fn other_lines_are_messages() {
        assert_eq!(parse_input(" I have ants "), Input::Message("I have ants"));
        assert_eq!(parse_input("/uploaded it"), Input::Message("/uploaded it"));
        assert_eq!(parse_input(""), Input::Message(""));
    }
}
