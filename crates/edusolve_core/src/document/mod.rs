//! Structured view of a model correction.
//!
//! The model answers in a small line-oriented grammar. Each line is classified
//! by [`classify_line`] (first matching rule wins):
//!
//! | Rule | Line shape               | Block                  |
//! |------|--------------------------|------------------------|
//! | 1    | `# 1.` …                 | solution heading       |
//! | 2    | `# 2.` …                 | explanations heading   |
//! | 3    | `## ` …                  | question heading       |
//! | 4    | `<digits>. ` …           | numbered step          |
//! | 5    | trimmed `- ` / `* ` …    | bullet                 |
//! | 6    | contains a backtick      | code line              |
//! | 7    | whitespace only          | spacer                 |
//! | 8    | anything else            | paragraph              |
//!
//! Lines between [`EXPLANATION_START`] and [`EXPLANATION_END`] are buffered and
//! emitted as one collapsible [`Block::Explanation`] tied to the latest
//! question index.

mod inline;
mod visibility;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use inline::{plain_text, resolve_emphasis, split_code, CodeSegment, Inline};
pub use visibility::Visibility;

pub const EXPLANATION_START: &str = "[[EXPLICATION]]";
pub const EXPLANATION_END: &str = "[[/EXPLICATION]]";

const SOLUTION_PREFIX: &str = "# 1.";
const EXPLANATIONS_PREFIX: &str = "# 2.";
const QUESTION_PREFIX: &str = "## ";

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\. ").expect("valid numbered regex"));

/// The eight line categories, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    SolutionHeading,
    ExplanationsHeading,
    QuestionHeading,
    NumberedStep,
    Bullet,
    Code,
    Blank,
    Paragraph,
}

pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if line.starts_with(SOLUTION_PREFIX) {
        LineKind::SolutionHeading
    } else if line.starts_with(EXPLANATIONS_PREFIX) {
        LineKind::ExplanationsHeading
    } else if line.starts_with(QUESTION_PREFIX) {
        LineKind::QuestionHeading
    } else if NUMBERED.is_match(line) {
        LineKind::NumberedStep
    } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
        LineKind::Bullet
    } else if line.contains('`') {
        LineKind::Code
    } else if trimmed.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Paragraph
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Opens the solution region (first accent).
    SolutionHeading { title: String },
    /// Opens the explanations region (second accent); starts a new page on export.
    ExplanationsHeading { title: String, section_break: bool },
    QuestionHeading { index: usize, title: String },
    NumberedStep { number: String, content: Vec<Inline> },
    Bullet { content: Vec<Inline> },
    Code { segments: Vec<CodeSegment> },
    Spacer,
    Paragraph { content: Vec<Inline> },
    /// Collapsible commentary for question `index` (0 when no question precedes it).
    Explanation { index: usize, text: String },
}

impl Block {
    pub fn paragraph(text: &str) -> Self {
        Block::Paragraph {
            content: resolve_emphasis(text),
        }
    }
}

fn heading_title(line: &str, prefix: &str) -> String {
    line[prefix.len()..].trim().to_string()
}

/// Incremental line parser. Feed lines with [`SolutionParser::push_line`],
/// then call [`SolutionParser::finish`].
#[derive(Debug, Default)]
pub struct SolutionParser {
    blocks: Vec<Block>,
    question_index: usize,
    explanation: Option<Vec<String>>,
}

impl SolutionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let marker = line.trim();

        if let Some(buffer) = self.explanation.as_mut() {
            if marker == EXPLANATION_END {
                self.flush_explanation();
            } else {
                buffer.push(line.to_string());
            }
            return;
        }
        if marker == EXPLANATION_START {
            self.explanation = Some(Vec::new());
            return;
        }
        if marker == EXPLANATION_END {
            // stray end marker
            return;
        }

        let block = match classify_line(line) {
            LineKind::SolutionHeading => Block::SolutionHeading {
                title: heading_title(line, SOLUTION_PREFIX),
            },
            LineKind::ExplanationsHeading => Block::ExplanationsHeading {
                title: heading_title(line, EXPLANATIONS_PREFIX),
                section_break: true,
            },
            LineKind::QuestionHeading => {
                self.question_index += 1;
                Block::QuestionHeading {
                    index: self.question_index,
                    title: heading_title(line, QUESTION_PREFIX),
                }
            }
            LineKind::NumberedStep => {
                let (number, rest) = match NUMBERED.captures(line) {
                    Some(caps) => {
                        let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
                        (caps[1].to_string(), &line[whole..])
                    }
                    None => (String::new(), line),
                };
                Block::NumberedStep {
                    number,
                    content: resolve_emphasis(rest),
                }
            }
            LineKind::Bullet => Block::Bullet {
                content: resolve_emphasis(&line.trim()[2..]),
            },
            LineKind::Code => Block::Code {
                segments: split_code(line),
            },
            LineKind::Blank => Block::Spacer,
            LineKind::Paragraph => Block::paragraph(line),
        };
        self.blocks.push(block);
    }

    fn flush_explanation(&mut self) {
        if let Some(lines) = self.explanation.take() {
            self.blocks.push(Block::Explanation {
                index: self.question_index,
                text: lines.join("\n"),
            });
        }
    }

    /// Close the document. An explanation still open at the end is kept.
    pub fn finish(mut self) -> Vec<Block> {
        self.flush_explanation();
        self.blocks
    }
}

/// Parse a full model answer into blocks.
pub fn parse_solution(text: &str) -> Vec<Block> {
    let mut parser = SolutionParser::new();
    for line in text.split('\n') {
        parser.push_line(line);
    }
    parser.finish()
}

/// Question indices that own an explanation block, in document order.
pub fn explanation_indices(blocks: &[Block]) -> Vec<usize> {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::Explanation { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify_line("# 1. Solution"), LineKind::SolutionHeading);
        assert_eq!(classify_line("# 2. Explications"), LineKind::ExplanationsHeading);
        assert_eq!(classify_line("## Question 1"), LineKind::QuestionHeading);
        assert_eq!(classify_line("12. Étape"), LineKind::NumberedStep);
        assert_eq!(classify_line("  - item"), LineKind::Bullet);
        assert_eq!(classify_line("* item"), LineKind::Bullet);
        assert_eq!(classify_line("appelle `foo()`"), LineKind::Code);
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("Texte libre"), LineKind::Paragraph);
    }

    #[test]
    fn test_higher_priority_wins() {
        assert_eq!(classify_line("- utilise `map`"), LineKind::Bullet);
        assert_eq!(classify_line("1. appelle `f`"), LineKind::NumberedStep);
        assert_eq!(classify_line("## `code` title"), LineKind::QuestionHeading);
        assert_eq!(classify_line("# 1. `x`"), LineKind::SolutionHeading);
    }

    #[test]
    fn test_not_numbered_without_space() {
        assert_eq!(classify_line("3.14 est pi"), LineKind::Paragraph);
        assert_eq!(classify_line("### Sous-titre"), LineKind::Paragraph);
        assert_eq!(classify_line("# Autre"), LineKind::Paragraph);
    }

    #[test]
    fn test_numbered_needs_ascii_digits() {
        assert_eq!(classify_line("٣. étape"), LineKind::Paragraph);
        assert_eq!(classify_line("１. étape"), LineKind::Paragraph);
        assert_eq!(classify_line("3. étape"), LineKind::NumberedStep);
    }

    #[test]
    fn test_end_to_end() {
        let text = "# 1. Solution\n## Q1\nAnswer one\n[[EXPLICATION]]\nBecause X\n[[/EXPLICATION]]\n# 2. Notes\nDone";
        let blocks = parse_solution(text);
        assert_eq!(
            blocks,
            vec![
                Block::SolutionHeading {
                    title: "Solution".to_string()
                },
                Block::QuestionHeading {
                    index: 1,
                    title: "Q1".to_string()
                },
                Block::paragraph("Answer one"),
                Block::Explanation {
                    index: 1,
                    text: "Because X".to_string()
                },
                Block::ExplanationsHeading {
                    title: "Notes".to_string(),
                    section_break: true
                },
                Block::paragraph("Done"),
            ]
        );
    }

    #[test]
    fn test_explanation_keeps_blank_lines() {
        let text = "[[EXPLICATION]]\nligne 1\n\n- pas une puce\n[[/EXPLICATION]]";
        let blocks = parse_solution(text);
        assert_eq!(
            blocks,
            vec![Block::Explanation {
                index: 0,
                text: "ligne 1\n\n- pas une puce".to_string()
            }]
        );
    }

    #[test]
    fn test_question_index_correlation() {
        let text = "## A\n[[EXPLICATION]]\na\n[[/EXPLICATION]]\n## B\n## C\n[[EXPLICATION]]\nc\n[[/EXPLICATION]]";
        let blocks = parse_solution(text);
        let headings: Vec<usize> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::QuestionHeading { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(headings, vec![1, 2, 3]);
        assert_eq!(explanation_indices(&blocks), vec![1, 3]);
    }

    #[test]
    fn test_unterminated_explanation_is_flushed() {
        let blocks = parse_solution("## Q\n[[EXPLICATION]]\nreste ouvert");
        assert_eq!(
            blocks.last(),
            Some(&Block::Explanation {
                index: 1,
                text: "reste ouvert".to_string()
            })
        );
    }

    #[test]
    fn test_numbered_step_content() {
        let blocks = parse_solution("2. **Créer** le fichier");
        assert_eq!(
            blocks,
            vec![Block::NumberedStep {
                number: "2".to_string(),
                content: vec![Inline::bold("Créer"), Inline::text(" le fichier")],
            }]
        );
    }

    #[test]
    fn test_bullet_strips_marker() {
        let blocks = parse_solution("  * *note* importante");
        assert_eq!(
            blocks,
            vec![Block::Bullet {
                content: vec![Inline::italic("note"), Inline::text(" importante")],
            }]
        );
    }

    #[test]
    fn test_blank_line_is_spacer() {
        let blocks = parse_solution("a\n\nb");
        assert_eq!(blocks[1], Block::Spacer);
        assert_eq!(blocks.len(), 3);
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = parse_solution("## Q1\r\nTexte\r\n");
        assert_eq!(
            blocks[0],
            Block::QuestionHeading {
                index: 1,
                title: "Q1".to_string()
            }
        );
        assert_eq!(blocks[1], Block::paragraph("Texte"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bullet_prefix_beats_code(ws in "[ \t]{0,3}", marker in "[-*]", rest in ".*") {
                let line = format!("{ws}{marker} `{rest}`");
                prop_assert_eq!(classify_line(&line), LineKind::Bullet);
            }

            #[test]
            fn numbered_prefix_beats_code(digits in "[0-9]{1,4}", rest in ".*") {
                let line = format!("{digits}. `{rest}`");
                prop_assert_eq!(classify_line(&line), LineKind::NumberedStep);
            }

            #[test]
            fn backtick_line_is_code(head in "[a-zA-Z][a-zA-Z ]{0,10}", rest in "[^\n]*") {
                let line = format!("{head}`{rest}");
                prop_assert_eq!(classify_line(&line), LineKind::Code);
            }

            #[test]
            fn every_line_yields_one_block(lines in prop::collection::vec("[^\r\n\\[]{0,40}", 1..20)) {
                let blocks = parse_solution(&lines.join("\n"));
                prop_assert_eq!(blocks.len(), lines.len());
            }

            #[test]
            fn question_indices_count_up(count in 1usize..12) {
                let text: Vec<String> = (0..count).map(|i| format!("## Q{i}\nréponse")).collect();
                let indices: Vec<usize> = parse_solution(&text.join("\n"))
                    .iter()
                    .filter_map(|b| match b {
                        Block::QuestionHeading { index, .. } => Some(*index),
                        _ => None,
                    })
                    .collect();
                prop_assert_eq!(indices, (1..=count).collect::<Vec<_>>());
            }
        }
    }
}
