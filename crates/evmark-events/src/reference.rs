//! Resource references carried by link and image events

use serde::{Deserialize, Serialize};

use crate::event::Parameters;

/// The kind of resource a reference points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Url,
    Doc,
    Page,
    Space,
    Attach,
    PageAttach,
    Mailto,
    Path,
    Unc,
    Data,
    Icon,
    Interwiki,
    Unknown,
}

impl ResourceType {
    /// Scheme prefix used when the reference is written in typed form
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Doc => "doc",
            Self::Page => "page",
            Self::Space => "space",
            Self::Attach => "attach",
            Self::PageAttach => "pageAttach",
            Self::Mailto => "mailto",
            Self::Path => "path",
            Self::Unc => "unc",
            Self::Data => "data",
            Self::Icon => "icon",
            Self::Interwiki => "interwiki",
            Self::Unknown => "unknown",
        }
    }
}

/// A reference to a linked or embedded resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceReference {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub reference: String,
    /// Whether the reference was written with an explicit type prefix
    #[serde(default)]
    pub typed: bool,
    #[serde(default, skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
}

impl ResourceReference {
    pub fn new(kind: ResourceType, reference: impl Into<String>) -> Self {
        Self {
            kind,
            reference: reference.into(),
            typed: false,
            parameters: Parameters::new(),
        }
    }

    pub fn url(reference: impl Into<String>) -> Self {
        Self::new(ResourceType::Url, reference)
    }

    pub fn typed(mut self, typed: bool) -> Self {
        self.typed = typed;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}
