//! Block-nesting state tracker
//!
//! Keeps track of the open containers of the event stream and answers the
//! nesting questions the renderer asks (list depth, item index, quotation
//! depth, inline context). Begin events are applied before they are rendered
//! and end events after, so every query reflects the state as of the event
//! being rendered.

use evmark_events::Event;

use crate::error::{RenderError, RenderResult};

/// Kinds of open containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Document,
    Paragraph,
    Header,
    List,
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Quotation,
    QuotationLine,
    Table,
    TableRow,
    TableCell,
    Format,
    Link,
}

impl Container {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Paragraph => "paragraph",
            Self::Header => "header",
            Self::List => "list",
            Self::ListItem => "list item",
            Self::DefinitionList => "definition list",
            Self::DefinitionTerm => "definition term",
            Self::DefinitionDescription => "definition description",
            Self::Quotation => "quotation",
            Self::QuotationLine => "quotation line",
            Self::Table => "table",
            Self::TableRow => "table row",
            Self::TableCell => "table cell",
            Self::Format => "format",
            Self::Link => "link",
        }
    }

    /// Containers whose content is inline text
    fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Header
                | Self::ListItem
                | Self::DefinitionTerm
                | Self::DefinitionDescription
                | Self::QuotationLine
                | Self::TableCell
                | Self::Format
                | Self::Link
        )
    }

    /// The container an item of this kind must be directly nested in
    fn required_parent(&self) -> Option<Self> {
        match self {
            Self::ListItem => Some(Self::List),
            Self::DefinitionTerm | Self::DefinitionDescription => Some(Self::DefinitionList),
            Self::QuotationLine => Some(Self::Quotation),
            Self::TableRow => Some(Self::Table),
            Self::TableCell => Some(Self::TableRow),
            _ => None,
        }
    }
}

/// How an event affects the container nesting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Open(Container),
    Close(Container),
    Leaf,
}

impl Transition {
    pub fn of(event: &Event) -> Self {
        use Container::*;
        match event {
            Event::BeginDocument { .. } => Self::Open(Document),
            Event::EndDocument { .. } => Self::Close(Document),
            Event::BeginParagraph { .. } => Self::Open(Paragraph),
            Event::EndParagraph { .. } => Self::Close(Paragraph),
            Event::BeginHeader { .. } => Self::Open(Header),
            Event::EndHeader { .. } => Self::Close(Header),
            Event::BeginList { .. } => Self::Open(List),
            Event::EndList { .. } => Self::Close(List),
            Event::BeginListItem => Self::Open(ListItem),
            Event::EndListItem => Self::Close(ListItem),
            Event::BeginDefinitionList { .. } => Self::Open(DefinitionList),
            Event::EndDefinitionList { .. } => Self::Close(DefinitionList),
            Event::BeginDefinitionTerm => Self::Open(DefinitionTerm),
            Event::EndDefinitionTerm => Self::Close(DefinitionTerm),
            Event::BeginDefinitionDescription => Self::Open(DefinitionDescription),
            Event::EndDefinitionDescription => Self::Close(DefinitionDescription),
            Event::BeginQuotation { .. } => Self::Open(Quotation),
            Event::EndQuotation { .. } => Self::Close(Quotation),
            Event::BeginQuotationLine => Self::Open(QuotationLine),
            Event::EndQuotationLine => Self::Close(QuotationLine),
            Event::BeginTable { .. } => Self::Open(Table),
            Event::EndTable { .. } => Self::Close(Table),
            Event::BeginTableRow { .. } => Self::Open(TableRow),
            Event::EndTableRow { .. } => Self::Close(TableRow),
            Event::BeginTableCell { .. } => Self::Open(TableCell),
            Event::EndTableCell { .. } => Self::Close(TableCell),
            Event::BeginFormat { .. } => Self::Open(Format),
            Event::EndFormat { .. } => Self::Close(Format),
            Event::BeginLink { .. } => Self::Open(Link),
            Event::EndLink { .. } => Self::Close(Link),
            Event::OnImage { .. }
            | Event::OnWord { .. }
            | Event::OnSpace
            | Event::OnNewLine
            | Event::OnSpecialSymbol { .. }
            | Event::OnRawText { .. }
            | Event::OnMacro { .. }
            | Event::OnHorizontalLine { .. } => Self::Leaf,
        }
    }
}

/// Block-nesting state
#[derive(Debug, Default)]
pub struct BlockState {
    open: Vec<Container>,
    /// Items seen so far, one entry per open list
    list_items: Vec<usize>,
    /// Terms and descriptions seen so far, one entry per open definition list
    definition_items: Vec<usize>,
    quotation_depth: usize,
    /// Lines seen since the outermost open quotation began, nested quotations included
    quotation_lines: usize,
}

impl BlockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a container (applied before the begin event is rendered)
    pub fn open(&mut self, container: Container, event: &Event) -> RenderResult<()> {
        if let Some(parent) = container.required_parent() {
            if self.open.last() != Some(&parent) {
                return Err(RenderError::Misplaced {
                    event: event.name(),
                    container: parent.name(),
                });
            }
        }

        match container {
            Container::List => self.list_items.push(0),
            Container::DefinitionList => self.definition_items.push(0),
            Container::Quotation => self.quotation_depth += 1,
            Container::ListItem => increment(&mut self.list_items),
            Container::DefinitionTerm | Container::DefinitionDescription => {
                increment(&mut self.definition_items)
            }
            Container::QuotationLine => self.quotation_lines += 1,
            _ => {}
        }
        self.open.push(container);
        Ok(())
    }

    /// Check that `container` can be closed by `event`.
    ///
    /// A document end implicitly closes paragraphs that are still open.
    pub fn check_close(&self, container: Container, event: &Event) -> RenderResult<()> {
        let innermost = self
            .open
            .iter()
            .rev()
            .find(|c| !(container == Container::Document && **c == Container::Paragraph));
        match innermost {
            Some(c) if *c == container => Ok(()),
            Some(c) => Err(RenderError::Unbalanced {
                event: event.name(),
                expected: container.name(),
                found: c.name(),
            }),
            None => Err(RenderError::UnexpectedEnd {
                event: event.name(),
                expected: container.name(),
            }),
        }
    }

    /// Leave a container (applied after the end event is rendered).
    ///
    /// Callers must have validated the close with [`BlockState::check_close`].
    pub fn close(&mut self, container: Container) {
        while let Some(top) = self.open.pop() {
            match top {
                Container::List => {
                    self.list_items.pop();
                }
                Container::DefinitionList => {
                    self.definition_items.pop();
                }
                Container::Quotation => {
                    self.quotation_depth = self.quotation_depth.saturating_sub(1);
                    if self.quotation_depth == 0 {
                        self.quotation_lines = 0;
                    }
                }
                _ => {}
            }
            if top == container {
                break;
            }
        }
    }

    /// Check that the stream left nothing open except paragraphs
    pub fn check_finished(&self) -> RenderResult<()> {
        match self.open.iter().find(|c| **c != Container::Paragraph) {
            Some(c) => Err(RenderError::Unclosed(c.name())),
            None => Ok(()),
        }
    }

    pub fn list_depth(&self) -> usize {
        self.list_items.len()
    }

    /// Zero-based index of the current item in the innermost list
    pub fn list_item_index(&self) -> usize {
        index_of(&self.list_items)
    }

    pub fn definition_list_depth(&self) -> usize {
        self.definition_items.len()
    }

    /// Zero-based index of the current term or description in the innermost definition list
    pub fn definition_list_item_index(&self) -> usize {
        index_of(&self.definition_items)
    }

    pub fn quotation_depth(&self) -> usize {
        self.quotation_depth
    }

    /// Zero-based index of the current quotation line.
    ///
    /// Lines of nested quotations share the count of the outermost quotation,
    /// which restarts only when that quotation is closed.
    pub fn quotation_line_index(&self) -> usize {
        self.quotation_lines.saturating_sub(1)
    }

    pub fn is_in_quotation_line(&self) -> bool {
        self.open.contains(&Container::QuotationLine)
    }

    /// Whether the cursor is inside inline content
    pub fn is_in_line(&self) -> bool {
        self.open.iter().any(Container::is_inline)
    }
}

fn increment(counts: &mut [usize]) {
    if let Some(count) = counts.last_mut() {
        *count += 1;
    }
}

fn index_of(counts: &[usize]) -> usize {
    counts.last().map_or(0, |count| count.saturating_sub(1))
}
