//! Interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use m360_core::chat::{ChatMessage, MessageType, QUICK_START_PROMPTS, QuickAction, quick_actions};
use m360_core::config::AppConfig;
use m360_interaction::{ChatService, Responder};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

const COMMANDS: [&str; 4] = ["/actions", "/clear", "/help", "/quit"];

/// Completion, highlighting and hints for slash commands.
#[derive(Clone)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

pub async fn run(config: &AppConfig) -> Result<()> {
    let responder = Responder::from_config(config);
    if !responder.has_backend() {
        println!("{}", "Gemini is not configured; answering from the built-in guide.".bright_black());
    }
    let service = ChatService::new(responder);
    service.open().await;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== Monastery360 Guide ===".bright_magenta().bold());
    for message in service.messages().await {
        print_message(&message);
    }
    print_help();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/quit" | "quit" | "exit" => {
                        println!("{}", "🙏 Tashi delek!".bright_green());
                        break;
                    }
                    "/help" => print_help(),
                    "/clear" => {
                        service.clear().await;
                        for message in service.messages().await {
                            print_message(&message);
                        }
                    }
                    "/actions" => {
                        let last_bot = service.messages().await.into_iter().rev().find(ChatMessage::is_bot);
                        let actions = last_bot.as_ref().map(quick_actions).unwrap_or_default();
                        if actions.is_empty() {
                            println!("{}", "No quick actions for the last reply.".bright_black());
                        }
                        print_actions(&actions);
                    }
                    input if input.starts_with('/') => {
                        println!("{}", format!("Unknown command: {input}").yellow());
                    }
                    input => {
                        println!("{}", "typing…".bright_black());
                        if let Some(reply) = service.send(input).await {
                            print_message(&reply);
                            print_actions(&quick_actions(&reply));
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    service.close().await;
    Ok(())
}

fn print_help() {
    println!("{}", "Commands: /actions /clear /help /quit".bright_black());
    println!("{}", "Try asking:".bright_black());
    for prompt in QUICK_START_PROMPTS {
        println!("  {}", prompt.cyan());
    }
    println!();
}

fn print_message(message: &ChatMessage) {
    if message.is_user() {
        println!("{}", format!("> {}", message.text).green());
        return;
    }
    if message.kind != MessageType::Text {
        println!("{}", format!("[{}]", message.kind).bright_magenta());
    }
    for line in message.text.lines() {
        println!("{}", line.bright_blue());
    }
    println!();
}

fn print_actions(actions: &[QuickAction]) {
    for action in actions {
        let target = match action {
            QuickAction::Navigate { route, .. } => route.path().to_string(),
            QuickAction::OpenUrl { url, .. } => url.clone(),
            QuickAction::Call { uri, .. } => uri.clone(),
        };
        println!("  {} {}", format!("[{}]", action.label()).yellow(), target.bright_black());
    }
}
