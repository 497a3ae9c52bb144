use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  /upload <path>   upload a PDF and refresh the document list
  /select <id>     pick the document to ask about (no id clears it)
  /docs            list the known documents
  /retry           resend the current question
  /help            show this help
  /quit            exit
Anything else is sent as a question about the selected document.
Start a question with // to send it with a single leading /.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload(Option<PathBuf>),
    Select(Option<i64>),
    Docs,
    Retry,
    Help,
    Quit,
    Ask(String),
    Unknown(String),
}

/// Parses one raw input line. Bytes that are not UTF-8 are replaced
/// rather than rejected; the trailing line ending is dropped.
pub fn parse_bytes(raw: &[u8]) -> Option<Command> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    parse(&String::from_utf8_lossy(raw))
}

/// Parses one input line. Blank lines yield nothing.
pub fn parse(line: &str) -> Option<Command> {
    if line.trim().is_empty() {
        return None;
    }

    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Some(Command::Ask(line.to_string()));
    };

    if rest.starts_with('/') {
        let slash = line.len() - line.trim_start().len();
        let mut question = line.to_string();
        question.remove(slash);
        return Some(Command::Ask(question));
    }

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim_end(), ""),
    };

    let command = match name {
        "upload" => Command::Upload((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "select" => Command::Select(arg.parse().ok()),
        "docs" => Command::Docs,
        "retry" => Command::Retry,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}
