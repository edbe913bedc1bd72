// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal rendering of a demo frame.

use super::frame::{DemoFrame, Span, Tone};
use colored::*;

fn styled(span: &Span) -> ColoredString {
    let text = span.text.as_str();
    match span.tone {
        Tone::Plain => text.normal(),
        Tone::Highlight => text.on_blue().white(),
        Tone::Verified => text.black().on_cyan(),
        Tone::Struck => text.red().strikethrough(),
        Tone::Key => text.cyan(),
        Tone::Str | Tone::True => text.green(),
        Tone::Number => text.yellow(),
        Tone::False | Tone::Invalid => text.red().bold(),
        Tone::Placeholder => text.dimmed(),
        Tone::Punct => text.normal(),
    }
}

fn line_text(spans: &[Span]) -> String {
    spans.iter().map(|span| styled(span).to_string()).collect()
}

fn panel_title(title: &str) -> String {
    format!("┌─ {} ", title).bold().to_string()
}

/// Styled lines for one frame, top to bottom.
pub fn frame_lines(frame: &DemoFrame) -> Vec<String> {
    let mut lines = Vec::new();

    for item in &frame.timeline {
        if item.active {
            lines.push(format!("{} {}", "▌".cyan(), item.title.bold().cyan()));
        } else {
            lines.push(format!("{} {}", "│".dimmed(), item.title.dimmed()));
        }
    }
    if frame.loading {
        lines.push("━━━━━━━━━━━━━━━━━━━━".cyan().to_string());
    } else {
        lines.push(String::new());
    }

    lines.push(panel_title(&frame.document_title));
    for spans in &frame.document {
        lines.push(format!("│ {}", line_text(spans)));
    }
    lines.push(String::new());

    lines.push(panel_title(&frame.log_title));
    let count = frame.logs.len();
    for (idx, log) in frame.logs.iter().enumerate() {
        let caret = if idx + 1 == count { "▏" } else { "" };
        lines.push(format!("│ {} {}{}", ">".cyan(), log, caret.cyan()));
    }
    lines.push(String::new());

    lines.push(panel_title(&frame.json_title));
    for spans in &frame.json {
        lines.push(format!("│ {}", line_text(spans)));
    }
    lines
}

pub fn print_frame(frame: &DemoFrame) {
    println!(
        "\n{} {}",
        "=== VERITAS PROTOCOL ===".bold().cyan(),
        frame.step.to_string().yellow()
    );
    for line in frame_lines(frame) {
        println!("{}", line);
    }
}
