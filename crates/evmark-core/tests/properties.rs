//! Property tests for escaping, table layout and block separation

use evmark_core::{Event, RenderOptions, escape_markdown, format_table, render};
use proptest::prelude::*;

/// Drop one level of backslash escaping
fn unescape(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("|");
    for width in widths {
        line.push_str(&format!(" {} |", "-".repeat(*width)));
    }
    line
}

fn table_grid() -> impl Strategy<Value = Vec<Vec<String>>> {
    (1usize..4).prop_flat_map(|columns| {
        prop::collection::vec(prop::collection::vec("[a-z0-9]{1,8}", columns), 1..5)
    })
}

#[derive(Debug, Clone)]
enum Block {
    Paragraph(String),
    Rule,
    Heading(String),
}

impl Block {
    fn events(&self) -> Vec<Event> {
        match self {
            Block::Paragraph(word) => vec![
                Event::begin_paragraph(),
                Event::word(word.as_str()),
                Event::end_paragraph(),
            ],
            Block::Rule => vec![Event::horizontal_line()],
            Block::Heading(word) => vec![
                Event::begin_header(3),
                Event::word(word.as_str()),
                Event::end_header(3),
            ],
        }
    }
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        "[a-z]{1,10}".prop_map(Block::Paragraph),
        Just(Block::Rule),
        "[a-z]{1,10}".prop_map(Block::Heading),
    ]
}

proptest! {
    #[test]
    fn prop_escaping_only_adds_backslashes(
        text in "[ a-z0-9#>*_`|+.\\\\\n-]{0,40}",
        at_line_start in any::<bool>(),
        escape_pipes in any::<bool>(),
    ) {
        let escaped = escape_markdown(&text, at_line_start, escape_pipes);
        prop_assert_eq!(unescape(&escaped), text);
    }

    #[test]
    fn prop_escaped_text_has_no_bare_emphasis(text in "[a-z*_`]{0,30}") {
        let escaped = escape_markdown(&text, false, false);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            prop_assert!(c == '\\' || c.is_ascii_lowercase());
            if c == '\\' {
                prop_assert!(matches!(chars.next(), Some('*' | '_' | '`')));
            }
        }
    }

    #[test]
    fn prop_table_separator_matches_widest_cell(rows in table_grid()) {
        let widths = column_widths(&rows);
        let table = format_table(&rows);
        let lines: Vec<&str> = table.lines().collect();

        prop_assert_eq!(lines.len(), rows.len() + 1);
        prop_assert_eq!(lines[1], separator(&widths));
        let row_width = widths.iter().sum::<usize>() + 3 * widths.len() + 1;
        for line in lines {
            prop_assert_eq!(line.chars().count(), row_width);
        }
    }

    #[test]
    fn prop_rendered_table_matches_layout(rows in table_grid()) {
        let mut events = vec![Event::begin_table()];
        for (i, row) in rows.iter().enumerate() {
            events.push(Event::begin_table_row());
            for cell in row {
                events.push(Event::begin_table_cell(i == 0));
                events.push(Event::word(cell.as_str()));
                events.push(Event::end_table_cell(i == 0));
            }
            events.push(Event::end_table_row());
        }
        events.push(Event::end_table());

        let markdown = render(&events, &RenderOptions::default()).unwrap();
        prop_assert_eq!(markdown, format_table(&rows));
    }

    #[test]
    fn prop_blocks_are_separated_by_one_blank_line(blocks in prop::collection::vec(block(), 1..6)) {
        let options = RenderOptions::default();
        let events: Vec<Event> = blocks.iter().flat_map(Block::events).collect();
        let whole = render(&events, &options).unwrap();

        let parts: Vec<String> = blocks
            .iter()
            .map(|block| render(&block.events(), &options).unwrap())
            .collect();
        prop_assert_eq!(whole, parts.join("\n\n"));
    }
}
