//! Printable document export.
//!
//! The correction is written as a self-contained HTML page sized for A4
//! printing. Explanation blocks become `<details>` elements, open only when
//! their visibility flag is set, which is why [`export_with_expanded`] forces
//! every flag open for the duration of the export.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use edusolve_constant::app::{DISPLAY_NAME, EXPORT_FILE_PREFIX};
use edusolve_constant::theme;
use edusolve_core::document::explanation_indices;
use edusolve_core::{Block, CodeSegment, Inline, Visibility};
use edusolve_observability::{export_span, record_duration, record_error};
use pulldown_cmark::{html, CowStr, Event};
use tracing::{debug, Instrument};

use crate::error::{Result, RuntimeError};

/// Page-break strategy, after the modes of common HTML-to-PDF pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageBreakMode {
    /// Never split a block across pages
    #[default]
    AvoidAll,
    /// Honour only explicit breaks (`break-before` on the explanations heading)
    Css,
    /// Explicit breaks through the legacy `page-break-*` properties as well
    Legacy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Page margins in millimetres: top, right, bottom, left
    pub margins_mm: [f32; 4],
    /// Quality hint for embedded raster images, 0.0 to 1.0
    pub image_quality: f32,
    /// Rendering scale applied to the root font size
    pub scale: f32,
    pub page_break: PageBreakMode,
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margins_mm: [10.0, 10.0, 10.0, 10.0],
            image_quality: 0.98,
            scale: 2.0,
            page_break: PageBreakMode::AvoidAll,
            file_name: default_file_name(Local::now().date_naive()),
        }
    }
}

impl ExportOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_page_break(mut self, mode: PageBreakMode) -> Self {
        self.page_break = mode;
        self
    }

    pub fn with_margins(mut self, margins_mm: [f32; 4]) -> Self {
        self.margins_mm = margins_mm;
        self
    }
}

/// `Correction_EduSolve_<YYYY-MM-DD>.html`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("{}_{}.html", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Writes a rendered correction somewhere durable.
#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// Export `blocks` as they currently appear under `visibility`.
    /// Returns the path of the written document.
    async fn export(
        &self,
        blocks: &[Block],
        visibility: &Visibility,
        options: &ExportOptions,
    ) -> Result<PathBuf>;
}

/// Writes printable HTML files into a directory.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    output_dir: PathBuf,
}

impl HtmlExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl DocumentExporter for HtmlExporter {
    async fn export(
        &self,
        blocks: &[Block],
        visibility: &Visibility,
        options: &ExportOptions,
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(&options.file_name);
        let html = render_html(blocks, visibility, options);
        tokio::fs::write(&path, html)
            .await
            .map_err(|e| RuntimeError::Export(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Restores the visibility snapshot when dropped, whatever way the export
/// ended.
struct RestoreOnDrop<'a> {
    flags: &'a mut Visibility,
    snapshot: Option<Visibility>,
}

impl<'a> RestoreOnDrop<'a> {
    fn expand(flags: &'a mut Visibility, indices: Vec<usize>) -> Self {
        let snapshot = flags.clone();
        flags.expand_all(indices);
        Self {
            flags,
            snapshot: Some(snapshot),
        }
    }
}

impl Deref for RestoreOnDrop<'_> {
    type Target = Visibility;

    fn deref(&self) -> &Visibility {
        self.flags
    }
}

impl Drop for RestoreOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.flags.restore(snapshot);
        }
    }
}

/// Export with every explanation open.
///
/// Snapshot the flags, open them all, wait `settle`, export, then restore the
/// snapshot. Restoration also happens when the exporter fails or the future
/// is dropped mid-way.
pub async fn export_with_expanded<E>(
    exporter: &E,
    blocks: &[Block],
    visibility: &mut Visibility,
    settle: Duration,
    options: &ExportOptions,
) -> Result<PathBuf>
where
    E: DocumentExporter + ?Sized,
{
    let span = export_span!(options.file_name);
    async move {
        let start = Instant::now();
        let expanded = RestoreOnDrop::expand(visibility, explanation_indices(blocks));
        debug!(expanded = expanded.expanded_count(), "explanations forced open");

        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }

        let result = exporter.export(blocks, &expanded, options).await;
        drop(expanded);

        record_duration("duration_ms", start.elapsed());
        if let Err(e) = &result {
            record_error(e);
        }
        result
    }
    .instrument(span)
    .await
}

/// Render blocks into a standalone HTML document.
pub fn render_html(blocks: &[Block], visibility: &Visibility, options: &ExportOptions) -> String {
    let mut body = String::new();
    for block in blocks {
        render_block(&mut body, block, visibility);
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"generator\" content=\"{generator}\">\n\
<meta name=\"image-quality\" content=\"{quality}\">\n\
<title>{title}</title>\n<style>\n{css}</style>\n</head>\n<body>\n<main class=\"correction\">\n{body}</main>\n</body>\n</html>\n",
        generator = DISPLAY_NAME,
        quality = options.image_quality,
        title = escape_html(options.file_name.trim_end_matches(".html")),
        css = stylesheet(options),
        body = body,
    )
}

fn stylesheet(options: &ExportOptions) -> String {
    let [top, right, bottom, left] = options.margins_mm;
    let mut css = format!(
        "@page {{ size: A4 portrait; margin: {top}mm {right}mm {bottom}mm {left}mm; }}
html {{ font-size: {scale}%; }}
body {{ font-family: system-ui, sans-serif; color: {text}; line-height: 1.6; }}
h1.solution {{ color: {sol}; border-bottom: 3px solid {sol_dark}; }}
h1.explanations {{ color: {expl}; border-bottom: 3px solid {expl_dark}; }}
h2.question {{ border-left: 4px solid {sol}; padding-left: 0.5rem; }}
.step {{ font-weight: 600; }}
.step .number {{ color: {sol}; margin-right: 0.4rem; }}
pre.code {{ background: {code_bg}; color: #e6edf3; padding: 0.6rem; white-space: pre-wrap; }}
pre.code .token {{ color: {token}; }}
details.explanation {{ border-left: 4px solid {expl}; padding-left: 0.75rem; }}
details.explanation p {{ white-space: pre-wrap; }}
.spacer {{ height: 0.75rem; }}
",
        scale = options.scale * 50.0,
        text = theme::hex(theme::TEXT),
        sol = theme::hex(theme::SOLUTION_ACCENT),
        sol_dark = theme::hex(theme::SOLUTION_ACCENT_DARK),
        expl = theme::hex(theme::EXPLANATION_ACCENT),
        expl_dark = theme::hex(theme::EXPLANATION_ACCENT_DARK),
        code_bg = theme::hex(theme::CODE_BACKGROUND),
        token = theme::hex(theme::CODE_TOKEN),
    );

    match options.page_break {
        PageBreakMode::AvoidAll => css.push_str(
            "main > * { break-inside: avoid; }\nh1.explanations { break-before: page; }\n",
        ),
        PageBreakMode::Css => css.push_str("h1.explanations { break-before: page; }\n"),
        PageBreakMode::Legacy => css.push_str(
            "h1.explanations { break-before: page; page-break-before: always; }\nmain > * { page-break-inside: avoid; }\n",
        ),
    }
    css
}

fn render_block(out: &mut String, block: &Block, visibility: &Visibility) {
    match block {
        Block::SolutionHeading { title } => {
            out.push_str(&format!("<h1 class=\"solution\">{}</h1>\n", escape_html(title)));
        }
        Block::ExplanationsHeading {
            title,
            section_break,
        } => {
            let class = if *section_break {
                "explanations section-break"
            } else {
                "explanations"
            };
            out.push_str(&format!("<h1 class=\"{}\">{}</h1>\n", class, escape_html(title)));
        }
        Block::QuestionHeading { index, title } => {
            out.push_str(&format!(
                "<h2 class=\"question\" id=\"q{}\">{}</h2>\n",
                index,
                escape_html(title)
            ));
        }
        Block::NumberedStep { number, content } => {
            out.push_str(&format!(
                "<p class=\"step\"><span class=\"number\">{}.</span>{}</p>\n",
                escape_html(number),
                render_inline(content)
            ));
        }
        Block::Bullet { content } => {
            out.push_str(&format!("<ul><li>{}</li></ul>\n", render_inline(content)));
        }
        Block::Code { segments } => {
            out.push_str("<pre class=\"code\">");
            for segment in segments {
                match segment {
                    CodeSegment::Plain { text } => out.push_str(&escape_html(text)),
                    CodeSegment::Token { text } => out.push_str(&format!(
                        "<code class=\"token\">{}</code>",
                        escape_html(text)
                    )),
                }
            }
            out.push_str("</pre>\n");
        }
        Block::Spacer => out.push_str("<div class=\"spacer\"></div>\n"),
        Block::Paragraph { content } => {
            out.push_str(&format!("<p>{}</p>\n", render_inline(content)));
        }
        Block::Explanation { index, text } => {
            let open = if visibility.is_expanded(*index) {
                " open"
            } else {
                ""
            };
            out.push_str(&format!(
                "<details class=\"explanation\" data-question=\"{}\"{}>\n<summary>Explication</summary>\n<p>{}</p>\n</details>\n",
                index,
                open,
                escape_html(text)
            ));
        }
    }
}

fn render_inline(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text { text } => escape_html(text),
            Inline::Bold { text } => format!("<strong>{}</strong>", escape_html(text)),
            Inline::Italic { text } => format!("<em>{}</em>", escape_html(text)),
        })
        .collect()
}

/// Escape text for element content through the markdown HTML writer.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    html::push_html(&mut out, std::iter::once(Event::Text(CowStr::from(text))));
    out
}
