//! Document event types
//!
//! A document is described as a flat, ordered stream of begin/end/on events.
//! Begin and end events of the same kind are expected to be paired and
//! properly nested.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::reference::ResourceReference;

/// Event parameters: order-irrelevant, unique keys
pub type Parameters = BTreeMap<String, String>;

/// Marker style of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// Inline formatting kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Bold,
    Italic,
    Strikeout,
    Underline,
    Superscript,
    Subscript,
    Monospace,
    None,
}

/// A single event in a document stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    // Document boundaries
    BeginDocument {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndDocument {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },

    // Blocks
    BeginParagraph {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndParagraph {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginHeader {
        level: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndHeader {
        level: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginList {
        kind: ListKind,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndList {
        kind: ListKind,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginListItem,
    EndListItem,
    BeginDefinitionList {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndDefinitionList {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginDefinitionTerm,
    EndDefinitionTerm,
    BeginDefinitionDescription,
    EndDefinitionDescription,
    BeginQuotation {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndQuotation {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginQuotationLine,
    EndQuotationLine,
    BeginTable {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndTable {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginTableRow {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndTableRow {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginTableCell {
        #[serde(default)]
        header: bool,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndTableCell {
        #[serde(default)]
        header: bool,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },

    // Inline containers
    BeginFormat {
        format: Format,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndFormat {
        format: Format,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    BeginLink {
        reference: ResourceReference,
        #[serde(default)]
        free_standing: bool,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    EndLink {
        reference: ResourceReference,
        #[serde(default)]
        free_standing: bool,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },

    // Leaves
    OnImage {
        reference: ResourceReference,
        #[serde(default)]
        free_standing: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
    OnWord {
        text: String,
    },
    OnSpace,
    OnNewLine,
    OnSpecialSymbol {
        symbol: char,
    },
    OnRawText {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        syntax: Option<String>,
    },
    OnMacro {
        id: String,
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default)]
        inline: bool,
    },
    OnHorizontalLine {
        #[serde(default, skip_serializing_if = "Parameters::is_empty")]
        parameters: Parameters,
    },
}

impl Event {
    /// The serialized name of the event (e.g. `beginHeader`)
    pub fn name(&self) -> &'static str {
        match self {
            Event::BeginDocument { .. } => "beginDocument",
            Event::EndDocument { .. } => "endDocument",
            Event::BeginParagraph { .. } => "beginParagraph",
            Event::EndParagraph { .. } => "endParagraph",
            Event::BeginHeader { .. } => "beginHeader",
            Event::EndHeader { .. } => "endHeader",
            Event::BeginList { .. } => "beginList",
            Event::EndList { .. } => "endList",
            Event::BeginListItem => "beginListItem",
            Event::EndListItem => "endListItem",
            Event::BeginDefinitionList { .. } => "beginDefinitionList",
            Event::EndDefinitionList { .. } => "endDefinitionList",
            Event::BeginDefinitionTerm => "beginDefinitionTerm",
            Event::EndDefinitionTerm => "endDefinitionTerm",
            Event::BeginDefinitionDescription => "beginDefinitionDescription",
            Event::EndDefinitionDescription => "endDefinitionDescription",
            Event::BeginQuotation { .. } => "beginQuotation",
            Event::EndQuotation { .. } => "endQuotation",
            Event::BeginQuotationLine => "beginQuotationLine",
            Event::EndQuotationLine => "endQuotationLine",
            Event::BeginTable { .. } => "beginTable",
            Event::EndTable { .. } => "endTable",
            Event::BeginTableRow { .. } => "beginTableRow",
            Event::EndTableRow { .. } => "endTableRow",
            Event::BeginTableCell { .. } => "beginTableCell",
            Event::EndTableCell { .. } => "endTableCell",
            Event::BeginFormat { .. } => "beginFormat",
            Event::EndFormat { .. } => "endFormat",
            Event::BeginLink { .. } => "beginLink",
            Event::EndLink { .. } => "endLink",
            Event::OnImage { .. } => "onImage",
            Event::OnWord { .. } => "onWord",
            Event::OnSpace => "onSpace",
            Event::OnNewLine => "onNewLine",
            Event::OnSpecialSymbol { .. } => "onSpecialSymbol",
            Event::OnRawText { .. } => "onRawText",
            Event::OnMacro { .. } => "onMacro",
            Event::OnHorizontalLine { .. } => "onHorizontalLine",
        }
    }
}

// Convenience constructors
impl Event {
    pub fn begin_document() -> Self {
        Event::BeginDocument {
            parameters: Parameters::new(),
        }
    }

    pub fn end_document() -> Self {
        Event::EndDocument {
            parameters: Parameters::new(),
        }
    }

    pub fn begin_paragraph() -> Self {
        Event::BeginParagraph {
            parameters: Parameters::new(),
        }
    }

    pub fn end_paragraph() -> Self {
        Event::EndParagraph {
            parameters: Parameters::new(),
        }
    }

    pub fn begin_header(level: u8) -> Self {
        Event::BeginHeader {
            level,
            id: None,
            parameters: Parameters::new(),
        }
    }

    pub fn end_header(level: u8) -> Self {
        Event::EndHeader {
            level,
            id: None,
            parameters: Parameters::new(),
        }
    }

    pub fn begin_list(kind: ListKind) -> Self {
        Event::BeginList {
            kind,
            parameters: Parameters::new(),
        }
    }

    pub fn end_list(kind: ListKind) -> Self {
        Event::EndList {
            kind,
            parameters: Parameters::new(),
        }
    }

    pub fn begin_definition_list() -> Self {
        Event::BeginDefinitionList {
            parameters: Parameters::new(),
        }
    }

    pub fn end_definition_list() -> Self {
        Event::EndDefinitionList {
            parameters: Parameters::new(),
        }
    }

    pub fn begin_quotation() -> Self {
        Event::BeginQuotation {
            parameters: Parameters::new(),
        }
    }

    pub fn end_quotation() -> Self {
        Event::EndQuotation {
            parameters: Parameters::new(),
        }
    }

    pub fn begin_table() -> Self {
        Event::BeginTable {
            parameters: Parameters::new(),
        }
    }

    pub fn end_table() -> Self {
        Event::EndTable {
            parameters: Parameters::new(),
        }
    }

    pub fn begin_table_row() -> Self {
        Event::BeginTableRow {
            parameters: Parameters::new(),
        }
    }

    pub fn end_table_row() -> Self {
        Event::EndTableRow {
            parameters: Parameters::new(),
        }
    }

    pub fn begin_table_cell(header: bool) -> Self {
        Event::BeginTableCell {
            header,
            parameters: Parameters::new(),
        }
    }

    pub fn end_table_cell(header: bool) -> Self {
        Event::EndTableCell {
            header,
            parameters: Parameters::new(),
        }
    }

    pub fn begin_format(format: Format) -> Self {
        Event::BeginFormat {
            format,
            parameters: Parameters::new(),
        }
    }

    pub fn end_format(format: Format) -> Self {
        Event::EndFormat {
            format,
            parameters: Parameters::new(),
        }
    }

    pub fn begin_link(reference: ResourceReference) -> Self {
        Event::BeginLink {
            reference,
            free_standing: false,
            parameters: Parameters::new(),
        }
    }

    pub fn end_link(reference: ResourceReference) -> Self {
        Event::EndLink {
            reference,
            free_standing: false,
            parameters: Parameters::new(),
        }
    }

    pub fn image(reference: ResourceReference, alt: Option<&str>) -> Self {
        Event::OnImage {
            reference,
            free_standing: false,
            alt: alt.map(str::to_string),
            parameters: Parameters::new(),
        }
    }

    pub fn word(text: impl Into<String>) -> Self {
        Event::OnWord { text: text.into() }
    }

    pub fn special_symbol(symbol: char) -> Self {
        Event::OnSpecialSymbol { symbol }
    }

    pub fn raw_text(text: impl Into<String>) -> Self {
        Event::OnRawText {
            text: text.into(),
            syntax: None,
        }
    }

    pub fn macro_call(id: impl Into<String>, content: Option<&str>, inline: bool) -> Self {
        Event::OnMacro {
            id: id.into(),
            parameters: Parameters::new(),
            content: content.map(str::to_string),
            inline,
        }
    }

    pub fn horizontal_line() -> Self {
        Event::OnHorizontalLine {
            parameters: Parameters::new(),
        }
    }
}
