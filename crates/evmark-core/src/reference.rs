//! Link and image target serialization

use evmark_events::{ResourceReference, ResourceType};

/// Turns a resource reference into the target text of a Markdown link or image
pub trait ReferenceSerializer {
    fn serialize(&self, reference: &ResourceReference) -> String;
}

impl<F> ReferenceSerializer for F
where
    F: Fn(&ResourceReference) -> String,
{
    fn serialize(&self, reference: &ResourceReference) -> String {
        self(reference)
    }
}

/// Default serializer
///
/// URLs and paths are written as is. Wiki resources (documents, attachments,
/// ...) keep their `type:` prefix when they were typed in the source, unless
/// `typed_prefixes` is disabled. `anchor` and `queryString` parameters are
/// appended to the target.
#[derive(Debug, Clone, Copy)]
pub struct DefaultReferenceSerializer {
    pub typed_prefixes: bool,
}

impl Default for DefaultReferenceSerializer {
    fn default() -> Self {
        Self {
            typed_prefixes: true,
        }
    }
}

impl ReferenceSerializer for DefaultReferenceSerializer {
    fn serialize(&self, reference: &ResourceReference) -> String {
        let target = &reference.reference;
        let mut result = match reference.kind {
            ResourceType::Url | ResourceType::Path | ResourceType::Unknown => target.clone(),
            ResourceType::Mailto | ResourceType::Data => {
                let scheme = reference.kind.scheme();
                if target.starts_with(&format!("{}:", scheme)) {
                    target.clone()
                } else {
                    format!("{}:{}", scheme, target)
                }
            }
            kind if reference.typed && self.typed_prefixes => {
                format!("{}:{}", kind.scheme(), target)
            }
            _ => target.clone(),
        };

        if let Some(query) = reference.parameters.get("queryString") {
            result.push('?');
            result.push_str(query);
        }
        if let Some(anchor) = reference.parameters.get("anchor") {
            result.push('#');
            result.push_str(anchor);
        }
        result
    }
}
