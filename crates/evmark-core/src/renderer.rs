//! Event stream to Markdown renderer
//!
//! The renderer receives one event at a time. Most events are written
//! straight to the active sink; headings, links and table cells push a nested
//! sink instead, and the matching end event pops it once the whole content is
//! known (a heading underline needs the rendered heading length, table
//! separators need the widest cell of each column).

use std::str::FromStr;

use evmark_events::{Event, Format, ListKind, Parameters, ResourceReference};
use serde::{Deserialize, Serialize};

use crate::abbr::{ABBR_OPEN, parse_abbreviation};
use crate::error::{RenderError, RenderResult};
use crate::escape::{EscapingSink, SinkStack};
use crate::reference::{DefaultReferenceSerializer, ReferenceSerializer};
use crate::state::{BlockState, Transition};

const BACKTICK: &str = "`";
const TRIPLE_BACKTICK: &str = "```";

/// What to do with macros the renderer has no Markdown form for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroFallback {
    /// Drop the macro
    #[default]
    Skip,
    /// Write the macro call in wiki macro syntax (`{{id}}content{{/id}}`)
    Wiki,
}

impl FromStr for MacroFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "wiki" => Ok(Self::Wiki),
            _ => Err(format!(
                "Invalid macro fallback: {}. Expected 'skip' or 'wiki'",
                s
            )),
        }
    }
}

/// Options for the renderer
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Fallback for unhandled macros, applied by [`Renderer::render_all`]
    pub macro_fallback: MacroFallback,
    /// Keep `type:` prefixes on typed wiki references
    pub typed_prefixes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            macro_fallback: MacroFallback::Skip,
            typed_prefixes: true,
        }
    }
}

/// Outcome of rendering a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Handled,
    /// The event is a macro this renderer has no Markdown form for
    Unhandled,
}

/// Render a complete event stream to Markdown
pub fn render(events: &[Event], options: &RenderOptions) -> RenderResult<String> {
    let mut renderer = Renderer::new(options.clone());
    renderer.render_all(events)?;
    renderer.finish()
}

/// Markdown renderer state
pub struct Renderer {
    options: RenderOptions,
    sinks: SinkStack,
    state: BlockState,
    link_serializer: Box<dyn ReferenceSerializer>,
    image_serializer: Box<dyn ReferenceSerializer>,
    /// Whether a block has been rendered yet (no blank line before the first one)
    first_element_rendered: bool,
    /// Marker style of each open list
    list_styles: Vec<ListKind>,
    /// Quotation depth recorded when the last quotation began
    previous_quote_depth: usize,
    /// Rendered cells of each open table
    tables: Vec<Vec<Vec<String>>>,
    /// Abbreviations of each open document, in first-seen order
    abbreviations: Vec<Vec<(String, String)>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        let serializer = DefaultReferenceSerializer {
            typed_prefixes: options.typed_prefixes,
        };
        Self {
            options,
            sinks: SinkStack::new(),
            state: BlockState::new(),
            link_serializer: Box::new(serializer),
            image_serializer: Box::new(serializer),
            first_element_rendered: false,
            list_styles: Vec::new(),
            previous_quote_depth: 0,
            tables: Vec::new(),
            abbreviations: Vec::new(),
        }
    }

    /// Use a custom serializer for link targets
    pub fn with_link_serializer(mut self, serializer: impl ReferenceSerializer + 'static) -> Self {
        self.link_serializer = Box::new(serializer);
        self
    }

    /// Use a custom serializer for image targets
    pub fn with_image_serializer(mut self, serializer: impl ReferenceSerializer + 'static) -> Self {
        self.image_serializer = Box::new(serializer);
        self
    }

    /// Read-only view of the block-nesting state
    pub fn state(&self) -> &BlockState {
        &self.state
    }

    /// Render every event, applying the configured macro fallback
    pub fn render_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> RenderResult<()> {
        for event in events {
            if self.on_event(event)? == Rendered::Unhandled {
                self.render_macro_fallback(event);
            }
        }
        Ok(())
    }

    /// Render a single event
    pub fn on_event(&mut self, event: &Event) -> RenderResult<Rendered> {
        match Transition::of(event) {
            Transition::Open(container) => {
                self.state.open(container, event)?;
                self.render_event(event)
            }
            Transition::Close(container) => {
                self.state.check_close(container, event)?;
                let rendered = self.render_event(event)?;
                self.state.close(container);
                Ok(rendered)
            }
            Transition::Leaf => self.render_event(event),
        }
    }

    /// Finish the stream and return the Markdown text
    pub fn finish(self) -> RenderResult<String> {
        self.state.check_finished()?;
        Ok(self.sinks.into_output())
    }

    fn render_event(&mut self, event: &Event) -> RenderResult<Rendered> {
        match event {
            Event::BeginDocument { .. } => self.abbreviations.push(Vec::new()),
            Event::EndDocument { .. } => self.end_document(),
            Event::BeginParagraph { .. } => self.print_empty_line(),
            Event::EndParagraph { .. } => {}
            Event::BeginHeader { level, .. } => self.begin_header(*level),
            Event::EndHeader { level, .. } => self.end_header(*level)?,
            Event::BeginList { kind, .. } => self.begin_list(*kind),
            Event::EndList { .. } => {
                self.list_styles.pop().ok_or(RenderError::NoOpenList)?;
                self.sinks.active().flush();
            }
            Event::BeginListItem => self.begin_list_item()?,
            Event::EndListItem => {}
            Event::BeginDefinitionList { .. } | Event::EndDefinitionList { .. } => {}
            Event::BeginDefinitionTerm => {
                self.print_empty_line();
                let indent = self.definition_indent();
                self.print(&indent);
            }
            Event::BeginDefinitionDescription => {
                if self.state.definition_list_item_index() > 0 {
                    self.print("\n");
                }
                let indent = self.definition_indent();
                self.print(&format!("{}:   ", indent));
            }
            Event::EndDefinitionTerm | Event::EndDefinitionDescription => {
                self.sinks.active().flush()
            }
            Event::BeginQuotation { .. } => {
                if !self.state.is_in_quotation_line() {
                    self.print_empty_line();
                }
                self.previous_quote_depth = self.state.quotation_depth();
            }
            Event::EndQuotation { .. } => {}
            Event::BeginQuotationLine => self.begin_quotation_line(),
            Event::EndQuotationLine => self.sinks.active().flush(),
            Event::BeginTable { .. } => {
                self.print_empty_line();
                self.tables.push(Vec::new());
            }
            Event::EndTable { .. } => {
                let rows = self.tables.pop().ok_or(RenderError::NoOpenTable)?;
                self.print(&format_table(&rows));
            }
            Event::BeginTableRow { .. } => {
                self.tables
                    .last_mut()
                    .ok_or(RenderError::NoOpenTable)?
                    .push(Vec::new());
            }
            Event::EndTableRow { .. } => {}
            Event::BeginTableCell { .. } => self.sinks.push(EscapingSink::table_cell()),
            Event::EndTableCell { .. } => self.end_table_cell()?,
            Event::BeginFormat { format, .. } => self.print(format_markers(*format).0),
            Event::EndFormat { format, .. } => self.print(format_markers(*format).1),
            Event::BeginLink { .. } => {
                // The label may start a line; its escaping must know that
                let mut label = EscapingSink::new();
                label.set_at_line_start(self.sinks.active().is_at_line_start());
                self.sinks.push(label);
            }
            Event::EndLink { reference, .. } => self.end_link(reference)?,
            Event::OnImage {
                reference,
                alt,
                parameters,
                ..
            } => self.on_image(reference, alt.as_deref(), parameters),
            Event::OnWord { text } => self.sinks.active().write(text),
            Event::OnSpace => self.sinks.active().write(" "),
            Event::OnNewLine => self.print("  \n"),
            Event::OnSpecialSymbol { symbol } => self.on_special_symbol(*symbol),
            Event::OnRawText { text, .. } => self.on_raw_text(text),
            Event::OnMacro {
                id,
                parameters,
                content,
                inline,
            } => {
                let content = content.as_deref().unwrap_or_default();
                if !self.render_code_macro(id, parameters, content, *inline) {
                    return Ok(Rendered::Unhandled);
                }
            }
            Event::OnHorizontalLine { .. } => {
                self.print_empty_line();
                self.print("---");
            }
        }
        Ok(Rendered::Handled)
    }

    fn end_document(&mut self) {
        self.sinks.active().flush();
        let Some(abbreviations) = self.abbreviations.pop() else {
            return;
        };
        if abbreviations.is_empty() {
            return;
        }

        self.print_empty_line();
        let lines: Vec<String> = abbreviations
            .iter()
            .map(|(key, value)| format!("*[{}]: {}", key, value))
            .collect();
        self.print(&lines.join("\n"));
    }

    fn begin_header(&mut self, level: u8) {
        self.print_empty_line();
        if level > 2 {
            self.print(&format!("{} ", "=".repeat(level as usize)));
        }
        let mut heading = EscapingSink::new();
        heading.set_at_line_start(level <= 2);
        self.sinks.push(heading);
    }

    fn end_header(&mut self, level: u8) -> RenderResult<()> {
        let heading = self.sinks.pop()?;
        let width = heading.chars().count();
        self.print(&heading);
        match level {
            1 => self.print(&format!("\n{}", "=".repeat(width))),
            2 => self.print(&format!("\n{}", "-".repeat(width))),
            _ => self.print(&format!(" {}", "=".repeat(level as usize))),
        }
        Ok(())
    }

    fn begin_list(&mut self, kind: ListKind) {
        if self.state.list_depth() == 1 {
            self.print_empty_line();
        } else {
            self.print("\n");
        }
        self.list_styles.push(kind);
    }

    fn begin_list_item(&mut self) -> RenderResult<()> {
        let style = *self.list_styles.last().ok_or(RenderError::NoOpenList)?;
        if self.state.list_item_index() > 0 {
            self.print("\n");
        }
        let indent = " ".repeat(self.state.list_depth().saturating_sub(1) * 4);
        let marker = match style {
            ListKind::Bulleted => "*",
            ListKind::Numbered => "1.",
        };
        self.print(&format!("{}{} ", indent, marker));
        Ok(())
    }

    fn definition_indent(&self) -> String {
        " ".repeat(self.state.definition_list_depth().saturating_sub(1) * 4)
    }

    fn begin_quotation_line(&mut self) {
        if self.state.quotation_line_index() > 0 {
            self.print("\n>");
            if self.previous_quote_depth > 2 {
                self.print(&" >".repeat(self.previous_quote_depth - 2));
            }
            self.print("\n");
        }
        self.print(&"> ".repeat(self.state.quotation_depth()));
    }

    fn end_table_cell(&mut self) -> RenderResult<()> {
        let text = self.sinks.pop()?;
        self.tables
            .last_mut()
            .ok_or(RenderError::NoOpenTable)?
            .last_mut()
            .ok_or(RenderError::NoTableRow)?
            .push(text);
        Ok(())
    }

    fn end_link(&mut self, reference: &ResourceReference) -> RenderResult<()> {
        let label = self.sinks.pop()?;
        let target = self.link_serializer.serialize(reference);
        if label.is_empty() {
            self.print(&format!("[[{}]]", target));
        } else {
            self.print(&format!("[{}]({})", label, target));
        }
        Ok(())
    }

    fn on_image(&mut self, reference: &ResourceReference, alt: Option<&str>, parameters: &Parameters) {
        let target = self.image_serializer.serialize(reference);
        let alt = alt
            .or_else(|| parameters.get("alt").map(String::as_str))
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or(target.as_str());
        let image = format!("![{}]({})", alt, target);
        self.print(&image);
    }

    fn on_special_symbol(&mut self, symbol: char) {
        match symbol {
            '\u{201C}' => self.print("<<"),
            '\u{201D}' => self.print(">>"),
            '\u{2014}' => self.print("---"),
            '\u{2026}' => self.print("..."),
            '\u{2013}' => self.print("--"),
            _ => {
                let mut buf = [0u8; 4];
                self.sinks.active().write(symbol.encode_utf8(&mut buf));
            }
        }
    }

    fn on_raw_text(&mut self, text: &str) {
        if self.handle_abbreviation(text) {
            return;
        }
        if !self.state.is_in_line() {
            self.print_empty_line();
        }
        self.print(text);
    }

    /// Record and print an abbreviation tag; false when `text` is not one
    fn handle_abbreviation(&mut self, text: &str) -> bool {
        if !text.starts_with(ABBR_OPEN) {
            return false;
        }
        let Some(scope) = self.abbreviations.last_mut() else {
            return false;
        };
        let Ok(abbr) = parse_abbreviation(text) else {
            return false;
        };

        if !scope.iter().any(|(key, _)| *key == abbr.key) {
            scope.push((abbr.key.clone(), abbr.title));
        }
        self.sinks.active().write(&abbr.key);
        true
    }

    /// Render the `code` macro; false for any other macro
    pub fn render_code_macro(
        &mut self,
        id: &str,
        parameters: &Parameters,
        content: &str,
        inline: bool,
    ) -> bool {
        if id != "code" {
            return false;
        }

        if inline {
            self.print(&format!("{}{}{}", BACKTICK, content, BACKTICK));
            return true;
        }

        self.print_empty_line();
        match parameters.get("language") {
            Some(language) => {
                self.print(&format!("{}{}\n", TRIPLE_BACKTICK, language));
                self.print(content);
                self.print(&format!("\n{}", TRIPLE_BACKTICK));
            }
            None => {
                let mut lines: Vec<&str> = content
                    .split('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line))
                    .collect();
                // Trailing empty lines are dropped, unless there is only one line
                if lines.len() > 1 {
                    while lines.last().is_some_and(|line| line.is_empty()) {
                        lines.pop();
                    }
                }
                let indented: Vec<String> = lines.iter().map(|line| format!("    {}", line)).collect();
                self.print(&indented.join("\n"));
            }
        }
        true
    }

    fn render_macro_fallback(&mut self, event: &Event) {
        let Event::OnMacro {
            id,
            parameters,
            content,
            inline,
        } = event
        else {
            return;
        };
        if self.options.macro_fallback == MacroFallback::Skip {
            return;
        }

        if !inline {
            self.print_empty_line();
        }
        let mut call = format!("{{{{{}", id);
        for (key, value) in parameters {
            call.push_str(&format!(" {}=\"{}\"", key, escape_macro_parameter(value)));
        }
        match content {
            Some(content) => call.push_str(&format!("}}}}{}{{{{/{}}}}}", content, id)),
            None => call.push_str("/}}"),
        }
        self.print(&call);
    }

    /// Insert a blank line before a block, except before the first one
    fn print_empty_line(&mut self) {
        if self.first_element_rendered {
            self.print("\n\n");
        } else {
            self.first_element_rendered = true;
        }
    }

    fn print(&mut self, text: &str) {
        self.sinks.active().write_raw(text);
    }
}

/// Opening and closing markers of an inline format
fn format_markers(format: Format) -> (&'static str, &'static str) {
    match format {
        Format::Bold => ("**", "**"),
        Format::Italic => ("_", "_"),
        Format::Strikeout => ("~~", "~~"),
        Format::Underline => ("__", "__"),
        Format::Superscript => ("<sup>", "</sup>"),
        Format::Subscript => ("<sub>", "</sub>"),
        Format::Monospace => (BACKTICK, BACKTICK),
        Format::None => ("", ""),
    }
}

fn escape_macro_parameter(value: &str) -> String {
    value.replace('~', "~~").replace('"', "~\"")
}

/// Lay out table rows with centered cells and a header separator row.
///
/// Each column is as wide as its longest cell. Rows shorter than the widest
/// row only render their own cells.
pub fn format_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        write_table_row(&mut out, row, &widths, ' ', true);
        if i == 0 {
            out.push('\n');
            write_table_row(&mut out, row, &widths, '-', false);
        }
        if i + 1 < rows.len() {
            out.push('\n');
        }
    }
    out
}

fn write_table_row(out: &mut String, row: &[String], widths: &[usize], fill: char, with_text: bool) {
    out.push('|');
    for (cell, width) in row.iter().zip(widths) {
        let len = cell.chars().count();
        let before = (width - len) / 2;
        let after = width - len - before;
        let fill_str = fill.to_string();

        out.push(' ');
        out.push_str(&fill_str.repeat(before));
        if with_text {
            out.push_str(cell);
        } else {
            out.push_str(&fill_str.repeat(len));
        }
        out.push_str(&fill_str.repeat(after));
        out.push_str(" |");
    }
}
