//! Streamed fragments through the full render pipeline.

use mdstream::{render, AnsiPrinter, MarkdownFormatter, MarkdownTheme, PlainPrinter, Printer};

fn plain_theme() -> MarkdownTheme {
    MarkdownTheme {
        heading: Box::new(|text| text.to_string()),
        link: Box::new(|text| text.to_string()),
        link_url: Box::new(|text| text.to_string()),
        code: Box::new(|text| text.to_string()),
        code_block: Box::new(|text| text.to_string()),
        code_block_border: Box::new(|text| text.to_string()),
        quote: Box::new(|text| text.to_string()),
        quote_border: Box::new(|text| text.to_string()),
        hr: Box::new(|text| text.to_string()),
        list_bullet: Box::new(|text| text.to_string()),
        bold: Box::new(|text| text.to_string()),
        italic: Box::new(|text| text.to_string()),
        strikethrough: Box::new(|text| text.to_string()),
        underline: Box::new(|text| text.to_string()),
        highlight_code: None,
    }
}

fn split_at_whitespace(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, ' ' | '\n') {
            fragments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}

const REPLY: &str = "## Status\n\nAll **three** checks passed:\n\n\
- parser\n- writer\n- renderer\n\n\
```sh\ncargo run -- --history-file chat.md hi\n```\n";

#[test]
fn final_frame_matches_one_shot_render() {
    let theme = plain_theme();
    let formatter: MarkdownFormatter = Box::new(move |text, width| render(text, width, &theme));
    let mut printer = AnsiPrinter::new(Vec::new(), 60, formatter);

    for fragment in split_at_whitespace(REPLY) {
        printer.print(&fragment).expect("print");
    }
    assert_eq!(printer.buffer(), REPLY);

    let out = String::from_utf8(printer.into_inner()).expect("utf8");
    let last_frame = out
        .rsplit("\x1b[0J")
        .next()
        .expect("at least one redraw")
        .to_string();

    let expected = render(REPLY, 60, &plain_theme())
        .expect("render")
        .join("\r\n");
    assert_eq!(last_frame, expected);
}

#[test]
fn every_frame_is_a_rendering_of_a_reply_prefix() {
    let theme = plain_theme();
    let formatter: MarkdownFormatter = Box::new(move |text, width| render(text, width, &theme));
    let mut printer = AnsiPrinter::new(Vec::new(), 60, formatter);

    let fragments = split_at_whitespace(REPLY);
    let mut prefix = String::new();
    for fragment in &fragments[..4] {
        prefix.push_str(fragment);
        printer.print(fragment).expect("print");

        let out = String::from_utf8(printer.buffer().into()).expect("utf8");
        assert!(REPLY.starts_with(&out));
        assert_eq!(out, prefix);
    }
}

#[test]
fn plain_sink_emits_the_reply_byte_for_byte() {
    let mut printer = PlainPrinter::new(Vec::new());
    for fragment in split_at_whitespace(REPLY) {
        printer.print(&fragment).expect("print");
    }
    printer.close().expect("close");

    let out = String::from_utf8(printer.into_inner()).expect("utf8");
    assert_eq!(out, format!("{REPLY}\n"));
}
