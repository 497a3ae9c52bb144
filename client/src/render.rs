use crate::chat_view::ChatState;
use crate::models::*;
use crossterm::style::Stylize;

pub const TITLE: &str = "PDF Chat";
pub const THINKING: &str = "Thinking...";
const PLACEHOLDER: &str = "Ask about the PDF...";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub width: usize,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            color: true,
        }
    }
}

/// Lays out the whole view: header, document picker, error banner,
/// transcript, thinking indicator and input line.
pub fn render(state: &ChatState, opts: &RenderOptions) -> Vec<String> {
    let width = opts.width.max(20);
    let mut lines = Vec::new();

    lines.push(paint(TITLE.to_string(), opts, |s| s.bold().to_string()));
    lines.push(String::new());
    lines.extend(render_documents(state, opts));
    lines.push("Upload New PDF: /upload <path>".to_string());
    lines.push("-".repeat(width));

    if let Some(error) = state.error {
        lines.push(paint(format!("! {}", error), opts, |s| s.red().to_string()));
    }

    for message in &state.transcript {
        lines.extend(render_message(message, width, opts));
    }

    if state.loading {
        lines.push(paint(THINKING.to_string(), opts, |s| s.dim().to_string()));
    }

    lines.push("-".repeat(width));
    lines.push(render_input(state, opts));
    lines
}

fn render_documents(state: &ChatState, opts: &RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();
    let current = state
        .selected
        .as_ref()
        .map(|d| d.filename.as_str())
        .unwrap_or("Choose a PDF");
    lines.push(format!("Select Document: {}", current));

    for doc in &state.documents {
        let chosen = state.selected.as_ref().is_some_and(|s| s.id == doc.id);
        let line = format!("  {} [{}] {}", if chosen { "*" } else { " " }, doc.id, doc.filename);
        lines.push(if chosen {
            paint(line, opts, |s| s.bold().to_string())
        } else {
            line
        });
    }
    lines
}

fn render_message(message: &ChatMessage, width: usize, opts: &RenderOptions) -> Vec<String> {
    let bubble = (width * 4 / 5).max(10);
    let wrapped = wrap(&message.content, bubble);
    let inner = wrapped.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    wrapped
        .into_iter()
        .map(|line| {
            let padded = format!("{:<inner$}", line, inner = inner);
            match message.kind {
                MessageType::Human => {
                    let indent = " ".repeat(width.saturating_sub(inner));
                    format!("{}{}", indent, paint(padded, opts, |s| s.white().on_blue().to_string()))
                }
                MessageType::System => paint(padded, opts, |s| s.grey().on_dark_grey().to_string()),
                MessageType::Assistant => paint(padded, opts, |s| s.white().on_black().to_string()),
            }
        })
        .collect()
}

fn render_input(state: &ChatState, opts: &RenderOptions) -> String {
    if !state.input_enabled() {
        let reason = if state.loading { "waiting" } else { "select a document" };
        return paint(format!("> {} ({})", PLACEHOLDER, reason), opts, |s| s.dark_grey().to_string());
    }
    if state.question.is_empty() {
        format!("> {}", PLACEHOLDER)
    } else {
        format!("> {}", state.question)
    }
}

fn paint(text: String, opts: &RenderOptions, style: impl Fn(String) -> String) -> String {
    if opts.color {
        style(text)
    } else {
        text
    }
}

/// Greedy word wrap. Words longer than the limit are split.
fn wrap(text: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > limit {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..limit).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }

            let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
            if needed > limit && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    lines
}
