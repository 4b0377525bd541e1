//! Terminal rendering of a parsed correction.

use console::{style, Style};
use edusolve_constant::theme::term;
use edusolve_core::{Block, CodeSegment, Inline, Visibility};

fn solution_accent() -> Style {
    Style::new().color256(term::SOLUTION_ACCENT).bold()
}

fn explanation_accent() -> Style {
    Style::new().color256(term::EXPLANATION_ACCENT).bold()
}

fn inline(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text { text } => text.clone(),
            Inline::Bold { text } => style(text).bold().to_string(),
            Inline::Italic { text } => style(text).italic().to_string(),
        })
        .collect()
}

fn code(segments: &[CodeSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            CodeSegment::Plain { text } => text.clone(),
            CodeSegment::Token { text } => style(text).color256(term::CODE_TOKEN).to_string(),
        })
        .collect()
}

/// Render blocks to a string. Collapsed explanations print a one-line hint
/// naming the question so the reader knows how to open them.
pub fn render(blocks: &[Block], visibility: &Visibility) -> String {
    let mut out = String::new();
    let mut accent = solution_accent();

    for block in blocks {
        match block {
            Block::SolutionHeading { title } => {
                accent = solution_accent();
                out.push_str(&format!("\n{}\n", accent.apply_to(format!("▌ {title}"))));
            }
            Block::ExplanationsHeading { title, .. } => {
                accent = explanation_accent();
                let rule = style("─".repeat(48)).color256(term::MUTED);
                out.push_str(&format!("\n{rule}\n{}\n", accent.apply_to(format!("▌ {title}"))));
            }
            Block::QuestionHeading { title, .. } => {
                out.push_str(&format!("\n{}\n", accent.apply_to(title)));
            }
            Block::NumberedStep { number, content } => {
                out.push_str(&format!("  {} {}\n", accent.apply_to(format!("{number}.")), inline(content)));
            }
            Block::Bullet { content } => {
                out.push_str(&format!("  {} {}\n", accent.apply_to("•"), inline(content)));
            }
            Block::Code { segments } => {
                out.push_str(&format!("    {}\n", code(segments)));
            }
            Block::Spacer => out.push('\n'),
            Block::Paragraph { content } => {
                out.push_str(&inline(content));
                out.push('\n');
            }
            Block::Explanation { index, text } => {
                let bar = explanation_accent().apply_to("│");
                if visibility.is_expanded(*index) {
                    out.push_str(&format!("  {bar} {}\n", explanation_accent().apply_to("Explication")));
                    for line in text.lines() {
                        out.push_str(&format!("  {bar} {line}\n"));
                    }
                } else {
                    let hint = format!("▸ Explication masquée (question {index}, :toggle {index})");
                    out.push_str(&format!("  {}\n", style(hint).color256(term::MUTED)));
                }
            }
        }
    }
    out
}
