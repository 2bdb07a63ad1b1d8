use std::borrow::Cow;

use markwright_engine::escape::{EscapeContext, escape_with, should_escape_in_text};
use markwright_engine::{Heading, MarkdownFormat, MarkdownWriter, render};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Text(String),
    EmptyLine,
    LineIfNecessary,
    Heading(u8, String),
    ListItem(String),
    Quote(String),
    Rule,
    Code(String),
}

fn op() -> impl Strategy<Value = Op> {
    let word = "[a-z]{1,6}( [a-z]{1,6})?";
    prop_oneof![
        "[a-z]{1,6}( [a-z]{1,6})?\n?".prop_map(Op::Text),
        Just(Op::EmptyLine),
        Just(Op::LineIfNecessary),
        (1u8..=6, word).prop_map(|(level, text)| Op::Heading(level, text)),
        word.prop_map(Op::ListItem),
        word.prop_map(Op::Quote),
        Just(Op::Rule),
        "[a-z]{1,6}(\n[a-z]{1,6})?".prop_map(Op::Code),
    ]
}

fn apply(writer: &mut MarkdownWriter<'_>, op: &Op) {
    match op {
        Op::Text(text) => writer.write_text(text),
        Op::EmptyLine => writer.write_empty_line(),
        Op::LineIfNecessary => writer.write_line_if_necessary(),
        Op::Heading(level, text) => writer.write_heading(*level, text.as_str()),
        Op::ListItem(text) => writer.write_list_item(text.as_str()),
        Op::Quote(text) => writer.write_block_quote(text.as_str()),
        Op::Rule => writer.write_horizontal_rule(),
        Op::Code(text) => writer.write_fenced_code_block(text, None),
    }
    .unwrap();
}

proptest! {
    #[test]
    fn escaping_is_idempotent(text in "\\PC{0,40}") {
        let once = escape_with(&text, should_escape_in_text, '\\').into_owned();
        let twice = escape_with(&once, should_escape_in_text, '\\');
        prop_assert_eq!(twice.as_ref(), once.as_str());
    }

    #[test]
    fn escaped_output_is_borrowed(text in "\\PC{0,40}") {
        let escaped = escape_with(&text, should_escape_in_text, '\\').into_owned();
        prop_assert!(matches!(
            escape_with(&escaped, should_escape_in_text, '\\'),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn plain_text_is_borrowed(text in "[a-zA-Z0-9 ,;:?]{0,40}") {
        prop_assert!(matches!(EscapeContext::Text.escape(&text), Cow::Borrowed(_)));
    }

    #[test]
    fn atx_heading_shape(level in 1u8..=6, text in "[a-zA-Z][a-zA-Z ]{0,20}[a-zA-Z]") {
        let heading = Heading::new(text.clone(), level).unwrap();
        let out = render(&heading, &MarkdownFormat::default()).unwrap();
        prop_assert_eq!(out, format!("{} {}\n", "#".repeat(usize::from(level)), text));
    }

    #[test]
    fn separator_width_fits_widest_cell(
        (columns, rows) in (1usize..4).prop_flat_map(|n| {
            (Just(n), prop::collection::vec(prop::collection::vec("[a-z]{0,8}", n), 1..5))
        })
    ) {
        let mut writer = MarkdownWriter::new(MarkdownFormat::default());
        writer.write_table(&rows).unwrap();
        writer.close().unwrap();
        let out = writer.into_buffer().unwrap();

        let separator = out.lines().nth(1).unwrap();
        let dashes: Vec<usize> = separator
            .trim_matches('|')
            .split('|')
            .map(|cell| cell.trim().len())
            .collect();
        let expected: Vec<usize> = (0..columns)
            .map(|c| rows.iter().map(|row| row[c].len()).max().unwrap_or(0).max(3))
            .collect();
        prop_assert_eq!(dashes, expected);
    }

    #[test]
    fn blank_lines_never_stack(ops in prop::collection::vec(op(), 0..20)) {
        let mut writer = MarkdownWriter::new(MarkdownFormat::default());
        for op in &ops {
            apply(&mut writer, op);
        }
        writer.close().unwrap();
        let out = writer.into_buffer().unwrap();
        prop_assert!(!out.contains("\n\n\n"), "output: {:?}", out);
        prop_assert!(!out.starts_with('\n'), "output: {:?}", out);
    }
}
