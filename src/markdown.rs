//! Markdown to styled terminal lines.
//!
//! The renderer walks the mdast tree produced by the `markdown` crate and
//! emits fully styled, wrapped lines. It is stateless: streaming callers
//! re-render the whole accumulated buffer on every fragment.

use markdown::{mdast, to_mdast, ParseOptions};
use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use thiserror::Error;

use crate::ansi::extract_ansi_code;
use crate::theme::{CodeHighlighterFn, MarkdownTheme, ThemeVariant};
use crate::wrap::{visible_width, wrap_styled};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("markdown parse failed: {0}")]
    Parse(String),
}

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Forces the lazy syntax and theme sets to load. Loading takes tens of
/// milliseconds, so callers can move it off the first code block by spawning
/// this on a background thread at startup.
pub fn prewarm_highlighting() {
    Lazy::force(&SYNTAX_SET);
    Lazy::force(&THEME_SET);
}

/// Syntect-backed highlighter suitable for `MarkdownTheme::with_highlighter`.
#[must_use]
pub fn syntect_highlighter(variant: ThemeVariant) -> CodeHighlighterFn {
    Box::new(move |code, lang| highlight_code_lines(code, lang, variant))
}

fn highlight_code_lines(code: &str, lang: Option<&str>, variant: ThemeVariant) -> Vec<String> {
    let syntax = lang
        .and_then(|token| SYNTAX_SET.find_syntax_by_token(token))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let Some(theme) = THEME_SET.themes.get(variant.syntect_theme_name()) else {
        return code.split('\n').map(str::to_string).collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in code.split_inclusive('\n') {
        match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(regions) => {
                let mut styled = as_24_bit_terminal_escaped(&regions, false);
                styled.truncate(styled.trim_end_matches(['\n', '\r']).len());
                styled.push_str("\x1b[0m");
                lines.push(styled);
            }
            Err(_) => lines.push(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
    lines
}

/// Renders `text` into styled lines wrapped to `width` columns.
///
/// Parse is total for CommonMark input in practice; an error here means the
/// caller should keep the raw text and try again with more of the stream.
pub fn render(
    text: &str,
    width: usize,
    theme: &MarkdownTheme,
) -> Result<Vec<String>, RenderError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let width = width.max(1);
    let normalized = text.replace('\t', "   ");
    let root = to_mdast(&normalized, &ParseOptions::gfm())
        .map_err(|message| RenderError::Parse(message.to_string()))?;

    let nodes = match root {
        mdast::Node::Root(root) => root.children,
        other => vec![other],
    };

    let renderer = Renderer { theme };
    let mut rendered = Vec::new();
    for idx in 0..nodes.len() {
        let node = &nodes[idx];
        let next_node = nodes.get(idx + 1);
        let next_is_list = matches!(next_node, Some(mdast::Node::List(_)));
        let has_next = next_node.is_some();

        let space_after = match (node_position(node), next_node.and_then(node_position)) {
            (Some((end, _)), Some((_, next_start))) => {
                has_blank_line_between(&normalized, end, next_start)
            }
            _ => false,
        };

        let raw = raw_slice(node, &normalized);
        rendered.extend(renderer.render_node(
            node,
            width,
            next_is_list,
            has_next,
            space_after,
            raw.as_deref(),
        ));
        if space_after {
            rendered.push(String::new());
        }
    }

    let mut wrapped = Vec::new();
    for line in rendered {
        wrapped.extend(wrap_styled(&line, width));
    }
    Ok(wrapped)
}

struct Renderer<'a> {
    theme: &'a MarkdownTheme,
}

impl Renderer<'_> {
    fn render_inline_nodes(&self, nodes: &[mdast::Node]) -> String {
        let mut result = String::new();
        for node in nodes {
            match node {
                mdast::Node::Text(text) => result.push_str(&text.value),
                mdast::Node::Paragraph(paragraph) => {
                    result.push_str(&self.render_inline_nodes(&paragraph.children));
                }
                mdast::Node::Strong(strong) => {
                    let content = self.render_inline_nodes(&strong.children);
                    result.push_str(&(self.theme.bold)(&content));
                }
                mdast::Node::Emphasis(emphasis) => {
                    let content = self.render_inline_nodes(&emphasis.children);
                    result.push_str(&(self.theme.italic)(&content));
                }
                mdast::Node::Delete(delete) => {
                    let content = self.render_inline_nodes(&delete.children);
                    result.push_str(&(self.theme.strikethrough)(&content));
                }
                mdast::Node::InlineCode(code) => {
                    result.push_str(&(self.theme.code)(&code.value));
                }
                mdast::Node::Link(link) => {
                    let link_text = self.render_inline_nodes(&link.children);
                    let link_text_plain = plain_text_from_nodes(&link.children);
                    let href = link.url.as_str();
                    let href_cmp = href.strip_prefix("mailto:").unwrap_or(href);
                    let styled = (self.theme.link)(&(self.theme.underline)(&link_text));
                    result.push_str(&styled);
                    if link_text_plain != href && link_text_plain != href_cmp {
                        result.push_str(&(self.theme.link_url)(&format!(" ({href})")));
                    }
                }
                mdast::Node::Break(_) => result.push('\n'),
                mdast::Node::Html(html) => result.push_str(&html.value),
                mdast::Node::Image(image) => {
                    let alt = if image.alt.is_empty() {
                        image.url.as_str()
                    } else {
                        image.alt.as_str()
                    };
                    result.push_str(alt);
                }
                mdast::Node::InlineMath(math) => result.push_str(&math.value),
                mdast::Node::Math(math) => result.push_str(&math.value),
                _ => {}
            }
        }
        result
    }

    fn render_code_block(&self, code: &mdast::Code) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push((self.theme.code_block_border)(&format!(
            "```{}",
            code.lang.clone().unwrap_or_default()
        )));
        if let Some(highlighter) = self.theme.highlight_code.as_ref() {
            for line in highlighter(&code.value, code.lang.as_deref()) {
                lines.push(format!("  {line}"));
            }
        } else {
            for line in code.value.split('\n') {
                lines.push(format!("  {}", (self.theme.code_block)(line)));
            }
        }
        lines.push((self.theme.code_block_border)("```"));
        lines
    }

    fn render_list(&self, list: &mdast::List, depth: usize) -> Vec<String> {
        let mut lines = Vec::new();
        let indent = "  ".repeat(depth);
        let start_number = list.start.unwrap_or(1);

        for (i, node) in list.children.iter().enumerate() {
            let mdast::Node::ListItem(item) = node else {
                continue;
            };
            let bullet = if list.ordered {
                format!("{}. ", start_number + i as u32)
            } else {
                "- ".to_string()
            };

            let item_lines = self.render_list_item(item, depth);
            if item_lines.is_empty() {
                lines.push(format!("{indent}{}", (self.theme.list_bullet)(&bullet)));
                continue;
            }

            let first_line = &item_lines[0];
            if is_nested_list_line(first_line) {
                lines.push(first_line.clone());
            } else {
                lines.push(format!(
                    "{indent}{}{first_line}",
                    (self.theme.list_bullet)(&bullet)
                ));
            }

            for line in item_lines.iter().skip(1) {
                if is_nested_list_line(line) {
                    lines.push(line.clone());
                } else {
                    lines.push(format!("{indent}  {line}"));
                }
            }
        }

        lines
    }

    fn render_list_item(&self, item: &mdast::ListItem, depth: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for node in item.children.iter() {
            match node {
                mdast::Node::List(list) => lines.extend(self.render_list(list, depth + 1)),
                mdast::Node::Code(code) => lines.extend(self.render_code_block(code)),
                _ => {
                    let text = self.render_inline_nodes(std::slice::from_ref(node));
                    if !text.is_empty() {
                        lines.extend(text.split('\n').map(str::to_string));
                    }
                }
            }
        }
        lines
    }

    fn render_blockquote(&self, blockquote: &mdast::Blockquote, width: usize) -> Vec<String> {
        let quote_text = self.render_inline_nodes(&blockquote.children);
        let content_width = width.saturating_sub(2).max(1);

        let mut lines = Vec::new();
        for line in quote_text.split('\n') {
            for wrapped in wrap_styled(line, content_width) {
                lines.push(format!(
                    "{}{}",
                    (self.theme.quote_border)("│ "),
                    (self.theme.quote)(&(self.theme.italic)(&wrapped))
                ));
            }
        }
        lines
    }

    fn render_table(&self, table: &mdast::Table, width: usize, raw: Option<&str>) -> Vec<String> {
        let rows: Vec<&mdast::TableRow> = table
            .children
            .iter()
            .filter_map(|node| match node {
                mdast::Node::TableRow(row) => Some(row),
                _ => None,
            })
            .collect();
        let Some(header_row) = rows.first() else {
            return Vec::new();
        };
        let num_cols = header_row.children.len();
        if num_cols == 0 {
            return Vec::new();
        }

        let mut column_widths = vec![1usize; num_cols];
        let cell_lines: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                (0..num_cols)
                    .map(|col| {
                        let text = row
                            .children
                            .get(col)
                            .map(|cell| self.render_cell(cell))
                            .unwrap_or_default();
                        column_widths[col] = column_widths[col].max(visible_width(&text));
                        text
                    })
                    .collect()
            })
            .collect();

        // Too narrow to draw the box: fall back to the raw table text.
        let border_overhead = 3 * num_cols + 1;
        let total: usize = column_widths.iter().sum::<usize>() + border_overhead;
        if total > width {
            if let Some(raw) = raw {
                let mut fallback = wrap_styled(raw, width);
                fallback.push(String::new());
                return fallback;
            }
            return Vec::new();
        }

        let rule = |left: &str, mid: &str, right: &str| {
            let cells: Vec<String> = column_widths.iter().map(|w| "─".repeat(*w)).collect();
            format!("{left}─{}─{right}", cells.join(&format!("─{mid}─")))
        };

        let mut lines = Vec::new();
        lines.push(rule("┌", "┬", "┐"));
        for (row_idx, row) in cell_lines.iter().enumerate() {
            let mut parts = Vec::with_capacity(num_cols);
            for (col, text) in row.iter().enumerate() {
                let padding = column_widths[col].saturating_sub(visible_width(text));
                let padded = format!("{text}{}", " ".repeat(padding));
                parts.push(if row_idx == 0 {
                    (self.theme.bold)(&padded)
                } else {
                    padded
                });
            }
            lines.push(format!("│ {} │", parts.join(" │ ")));
            if row_idx == 0 && cell_lines.len() > 1 {
                lines.push(rule("├", "┼", "┤"));
            }
        }
        lines.push(rule("└", "┴", "┘"));
        lines.push(String::new());
        lines
    }

    fn render_cell(&self, cell: &mdast::Node) -> String {
        match cell {
            mdast::Node::TableCell(table_cell) => self.render_inline_nodes(&table_cell.children),
            other => self.render_inline_nodes(std::slice::from_ref(other)),
        }
    }

    fn render_node(
        &self,
        node: &mdast::Node,
        width: usize,
        next_is_list: bool,
        has_next: bool,
        space_after: bool,
        raw: Option<&str>,
    ) -> Vec<String> {
        match node {
            mdast::Node::Heading(heading) => {
                let heading_text = self.render_inline_nodes(&heading.children);
                let styled = match heading.depth {
                    1 => (self.theme.heading)(&(self.theme.bold)(&(self.theme.underline)(
                        &heading_text,
                    ))),
                    2 => (self.theme.heading)(&(self.theme.bold)(&heading_text)),
                    _ => {
                        let prefix = "#".repeat(heading.depth as usize);
                        (self.theme.heading)(&(self.theme.bold)(&format!(
                            "{prefix} {heading_text}"
                        )))
                    }
                };
                let mut lines = vec![styled];
                if !space_after {
                    lines.push(String::new());
                }
                lines
            }
            mdast::Node::Paragraph(paragraph) => {
                let mut lines = vec![self.render_inline_nodes(&paragraph.children)];
                if has_next && !next_is_list && !space_after {
                    lines.push(String::new());
                }
                lines
            }
            mdast::Node::Code(code) => {
                let mut lines = self.render_code_block(code);
                if !space_after {
                    lines.push(String::new());
                }
                lines
            }
            mdast::Node::List(list) => self.render_list(list, 0),
            mdast::Node::Blockquote(blockquote) => {
                let mut lines = self.render_blockquote(blockquote, width);
                if !space_after {
                    lines.push(String::new());
                }
                lines
            }
            mdast::Node::ThematicBreak(_) => {
                let hr_text = "─".repeat(width.min(80));
                let mut lines = vec![(self.theme.hr)(&hr_text)];
                if !space_after {
                    lines.push(String::new());
                }
                lines
            }
            mdast::Node::Html(html) => vec![html.value.trim().to_string()],
            mdast::Node::Table(table) => self.render_table(table, width, raw),
            mdast::Node::Text(text) => vec![text.value.clone()],
            mdast::Node::Break(_) => vec![String::new()],
            _ => Vec::new(),
        }
    }
}

fn plain_text_from_nodes(nodes: &[mdast::Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            mdast::Node::Text(text) => out.push_str(&text.value),
            mdast::Node::InlineCode(code) => out.push_str(&code.value),
            mdast::Node::Strong(strong) => out.push_str(&plain_text_from_nodes(&strong.children)),
            mdast::Node::Emphasis(emphasis) => {
                out.push_str(&plain_text_from_nodes(&emphasis.children));
            }
            mdast::Node::Delete(delete) => out.push_str(&plain_text_from_nodes(&delete.children)),
            mdast::Node::Link(link) => out.push_str(&plain_text_from_nodes(&link.children)),
            mdast::Node::Html(html) => out.push_str(&html.value),
            mdast::Node::Image(image) => out.push_str(&image.alt),
            mdast::Node::Paragraph(paragraph) => {
                out.push_str(&plain_text_from_nodes(&paragraph.children));
            }
            _ => {}
        }
    }
    out
}

/// A nested list renders its own indentation and bullet; the parent must not
/// indent it again. Detected by a bullet right after the styling prefix.
fn is_nested_list_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    let mut idx = 0;
    while let Some(ansi) = extract_ansi_code(trimmed, idx) {
        idx += ansi.length;
    }
    match trimmed[idx..].chars().next() {
        Some(ch) if idx > 0 => ch == '-' || ch.is_ascii_digit(),
        _ => false,
    }
}

fn node_position(node: &mdast::Node) -> Option<(usize, usize)> {
    let position = match node {
        mdast::Node::Heading(heading) => heading.position.as_ref(),
        mdast::Node::Paragraph(paragraph) => paragraph.position.as_ref(),
        mdast::Node::Code(code) => code.position.as_ref(),
        mdast::Node::List(list) => list.position.as_ref(),
        mdast::Node::Blockquote(blockquote) => blockquote.position.as_ref(),
        mdast::Node::ThematicBreak(thematic) => thematic.position.as_ref(),
        mdast::Node::Html(html) => html.position.as_ref(),
        mdast::Node::Table(table) => table.position.as_ref(),
        mdast::Node::Text(text) => text.position.as_ref(),
        _ => None,
    };
    position.map(|pos| (pos.end.offset, pos.start.offset))
}

fn raw_slice(node: &mdast::Node, source: &str) -> Option<String> {
    let position = match node {
        mdast::Node::Table(table) => table.position.as_ref(),
        _ => None,
    }?;
    let start = position.start.offset.min(source.len());
    let end = position.end.offset.min(source.len());
    if start >= end {
        return None;
    }
    Some(source[start..end].to_string())
}

fn has_blank_line_between(source: &str, end: usize, start: usize) -> bool {
    if start <= end || end >= source.len() {
        return false;
    }
    let slice = &source[end..start.min(source.len())];
    let mut saw_newline = false;
    for ch in slice.chars() {
        if ch == '\n' || ch == '\r' {
            if saw_newline {
                return true;
            }
            saw_newline = true;
        } else if !ch.is_whitespace() {
            saw_newline = false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::theme::{MarkdownStyleFn, MarkdownTheme};

    fn tag(open: &'static str, close: &'static str) -> MarkdownStyleFn {
        Box::new(move |text| format!("{open}{text}{close}"))
    }

    fn theme() -> MarkdownTheme {
        MarkdownTheme {
            heading: tag("<h>", "</h>"),
            link: tag("<l>", "</l>"),
            link_url: tag("<u>", "</u>"),
            code: tag("`", "`"),
            code_block: tag("<code>", "</code>"),
            code_block_border: tag("<cb>", "</cb>"),
            quote: tag("<q>", "</q>"),
            quote_border: Box::new(|text| text.to_string()),
            hr: tag("<hr>", "</hr>"),
            list_bullet: tag("<b>", "</b>"),
            bold: tag("<b>", "</b>"),
            italic: tag("<i>", "</i>"),
            strikethrough: tag("<s>", "</s>"),
            underline: tag("<u>", "</u>"),
            highlight_code: None,
        }
    }

    #[test]
    fn headings_apply_styles_and_spacing() {
        let lines = render("# Title\nParagraph", 40, &theme()).unwrap();
        assert_eq!(lines[0], "<h><b><u>Title</u></b></h>");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Paragraph");
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render("", 80, &theme()).unwrap().is_empty());
        assert!(render("  \n ", 80, &theme()).unwrap().is_empty());
    }

    #[test]
    fn link_renders_url_only_when_needed() {
        let lines = render("[x](x)\n[y](z)", 80, &theme()).unwrap();
        assert_eq!(lines[0], "<l><u>x</u></l>");
        assert_eq!(lines[1], "<l><u>y</u></l><u> (z)</u>");
    }

    #[test]
    fn code_block_keeps_fences_and_indents() {
        let lines = render("```rust\nfn main() {}\n```", 80, &theme()).unwrap();
        assert_eq!(lines[0], "<cb>```rust</cb>");
        assert_eq!(lines[1], "  <code>fn main() {}</code>");
        assert_eq!(lines[2], "<cb>```</cb>");
    }

    #[test]
    fn blockquote_wraps_and_prefixes() {
        let lines = render("> quote", 80, &theme()).unwrap();
        assert_eq!(lines[0], "│ <q><i>quote</i></q>");
    }

    #[test]
    fn list_renders_bullets() {
        let lines = render("- one\n- two", 80, &theme()).unwrap();
        assert!(lines[0].contains("<b>- </b>one"));
        assert!(lines[1].contains("<b>- </b>two"));
    }

    #[test]
    fn ordered_list_counts_from_start() {
        let lines = render("3. three\n4. four", 80, &theme()).unwrap();
        assert!(lines[0].contains("<b>3. </b>three"));
        assert!(lines[1].contains("<b>4. </b>four"));
    }

    #[test]
    fn nested_list_indents_once() {
        let lines = render("- outer\n  - inner", 80, &theme()).unwrap();
        assert!(lines[0].contains("outer"));
        assert!(lines[1].starts_with("  "));
        assert!(lines[1].contains("inner"));
    }

    #[test]
    fn table_renders_borders() {
        let lines = render("| a | b |\n| - | - |\n| c | d |", 80, &theme()).unwrap();
        assert!(lines.iter().any(|line| line.starts_with("┌")));
        assert!(lines.iter().any(|line| line.starts_with("└")));
    }

    #[test]
    fn narrow_table_falls_back_to_raw_text() {
        let lines = render("| long header | other |\n| - | - |\n| c | d |", 8, &theme()).unwrap();
        assert!(lines.iter().all(|line| !line.starts_with("┌")));
    }

    #[test]
    fn thematic_break_caps_at_eighty() {
        let lines = render("---", 200, &theme()).unwrap();
        assert_eq!(lines[0], format!("<hr>{}</hr>", "─".repeat(80)));
    }

    #[test]
    fn long_paragraph_wraps_to_width() {
        let lines = render("aaa bbb ccc ddd", 7, &theme()).unwrap();
        assert!(lines.len() >= 2);
        assert_eq!(lines[0], "aaa bbb");
    }

    #[test]
    fn incomplete_markdown_still_renders() {
        // Streaming callers hand over prefixes mid-construct.
        let lines = render("**unclosed bold and `code", 80, &theme()).unwrap();
        assert!(!lines.is_empty());
    }
}
