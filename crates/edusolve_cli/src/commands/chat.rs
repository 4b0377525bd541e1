//! Follow-up chat loop run after a correction.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use console::style;
use edusolve_constant::theme::term;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::solve;
use crate::output;
use edusolve_runtime::StudySession;

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Ask(String),
    Toggle(usize),
    ExpandAll,
    CollapseAll,
    Show,
    Export(PathBuf),
    Copy,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Ask(line.to_string());
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name {
        "toggle" | "t" => match arg.parse::<usize>() {
            Ok(index) => Input::Toggle(index),
            Err(_) => Input::Invalid(format!("numéro de question attendu après :{name}")),
        },
        "expand" => Input::ExpandAll,
        "collapse" => Input::CollapseAll,
        "show" => Input::Show,
        "export" if arg.is_empty() => Input::Export(PathBuf::from(".")),
        "export" => Input::Export(PathBuf::from(arg)),
        "copy" => Input::Copy,
        "help" | "h" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => Input::Invalid(format!("commande inconnue : :{other}")),
    }
}

fn help() {
    output::header("Commandes");
    output::kv(":toggle N", "affiche ou masque l'explication de la question N");
    output::kv(":expand / :collapse", "ouvre ou ferme toutes les explications");
    output::kv(":show", "réaffiche la correction");
    output::kv(":export [DIR]", "enregistre un document imprimable");
    output::kv(":copy", "copie la correction brute");
    output::kv(":quit", "quitte");
}

fn prompt() -> std::io::Result<()> {
    if !output::is_json() {
        print!("{} ", style("?").color256(term::EXPLANATION_ACCENT).bold());
        std::io::stdout().flush()?;
    }
    Ok(())
}

/// Read questions from stdin until `:quit` or end of input.
pub async fn run(session: &mut StudySession) -> Result<()> {
    if !session.chat_available() {
        output::warning("Le tuteur n'est disponible qu'après une correction.");
        return Ok(());
    }
    output::dim("Posez vos questions sur la correction (:help pour les commandes).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => help(),
            Input::Invalid(message) => output::warning(&message),
            Input::Show => solve::show(session, false),
            Input::Toggle(index) => {
                let open = session.toggle_explanation(index);
                output::dim(&format!(
                    "Explication {index} {}",
                    if open { "affichée" } else { "masquée" }
                ));
                solve::show(session, false);
            }
            Input::ExpandAll => {
                session.set_all_explanations(true);
                solve::show(session, false);
            }
            Input::CollapseAll => {
                session.set_all_explanations(false);
                solve::show(session, false);
            }
            Input::Export(dir) => {
                if let Err(e) = solve::export(session, dir).await {
                    output::error(&e.to_string());
                }
            }
            Input::Copy => {
                if let Err(e) = solve::copy(session) {
                    output::error(&e.to_string());
                }
            }
            Input::Ask(question) => {
                let spinner = output::spinner("Le tuteur réfléchit...");
                let reply = session.send_chat(question).await;
                spinner.finish_and_clear();
                match reply {
                    Ok(message) if output::is_json() => output::data("chat", message),
                    Ok(message) => println!("{}\n", message.text),
                    Err(e) => output::error(&e.to_string()),
                }
            }
        }
        prompt()?;
    }
    Ok(())
}
