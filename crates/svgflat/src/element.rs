//! Read-only element boundary and a small in-memory element tree.

use std::collections::HashMap;

use tracing::trace;

use crate::{ConvertError, ConvertResult};

/// Read access to a markup element.
///
/// Conversion never mutates an element; any DOM can be plugged in by
/// implementing this trait.
pub trait Element {
    /// Element name, e.g. `"rect"`.
    fn node_name(&self) -> &str;

    /// Attribute value, `None` if absent.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Child elements in document order.
    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// Owned element with its attributes and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupElement {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<MarkupElement>,
}

impl MarkupElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: MarkupElement) -> Self {
        self.children.push(child);
        self
    }

    /// Read markup and return its first top-level element.
    ///
    /// Handles start, end and self-closing tags with quoted attributes.
    /// Comments, declarations, processing instructions and text are
    /// skipped.
    pub fn parse(markup: &str) -> ConvertResult<Self> {
        let mut stack: Vec<MarkupElement> = Vec::new();
        let mut root: Option<MarkupElement> = None;

        let mut pos = 0;
        while let Some(offset) = markup[pos..].find('<') {
            let tag_start = pos + offset;
            let rest = &markup[tag_start..];

            // Skip comments
            if rest.starts_with("<!--") {
                let end = rest
                    .find("-->")
                    .ok_or_else(|| ConvertError::malformed("unterminated comment"))?;
                pos = tag_start + end + 3;
                continue;
            }

            let tag_end =
                find_tag_end(rest).ok_or_else(|| ConvertError::malformed("unterminated tag"))?;
            let tag = &rest[1..tag_end];
            pos = tag_start + tag_end + 1;

            // Declarations and processing instructions
            if tag.starts_with('!') || tag.starts_with('?') {
                continue;
            }

            if let Some(name) = tag.strip_prefix('/') {
                let name = name.trim();
                let element = stack.pop().ok_or_else(|| {
                    ConvertError::malformed(format!("unexpected closing tag </{}>", name))
                })?;
                if element.name != name {
                    return Err(ConvertError::malformed(format!(
                        "closing tag </{}> does not match <{}>",
                        name, element.name
                    )));
                }
                attach(&mut stack, &mut root, element);
                continue;
            }

            let (tag, self_closing) = match tag.strip_suffix('/') {
                Some(inner) => (inner, true),
                None => (tag, false),
            };
            let element = parse_tag(tag)?;
            trace!(element = %element.name, self_closing, "read element");

            if self_closing {
                attach(&mut stack, &mut root, element);
            } else {
                stack.push(element);
            }
        }

        if let Some(open) = stack.last() {
            return Err(ConvertError::malformed(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| ConvertError::malformed("no element found"))
    }
}

impl Element for MarkupElement {
    fn node_name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Add a finished element to its parent, or keep it as the root.
fn attach(stack: &mut [MarkupElement], root: &mut Option<MarkupElement>, element: MarkupElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

/// Byte offset of the `>` closing a tag, skipping quoted attribute values.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tag.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

/// Parse the inside of a start tag: name and attributes.
fn parse_tag(tag: &str) -> ConvertResult<MarkupElement> {
    let tag = tag.trim();
    let (name, mut attrs) = match tag.find(char::is_whitespace) {
        Some(split) => (&tag[..split], &tag[split..]),
        None => (tag, ""),
    };
    if name.is_empty() {
        return Err(ConvertError::malformed("element without a name"));
    }

    let mut element = MarkupElement::new(name);
    while let Some((key, value, rest)) = parse_attr(attrs)? {
        element.attributes.insert(key, value);
        attrs = rest;
    }
    Ok(element)
}

/// Parse a single `key="value"` attribute.
fn parse_attr(s: &str) -> ConvertResult<Option<(String, String, &str)>> {
    let s = s.trim_start();
    if s.is_empty() {
        return Ok(None);
    }

    let eq = s
        .find('=')
        .ok_or_else(|| ConvertError::malformed(format!("attribute without value: {}", s)))?;
    let key = s[..eq].trim();
    let rest = s[eq + 1..].trim_start();

    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'');
    let quote = quote.ok_or_else(|| {
        ConvertError::malformed(format!("attribute '{}' value is not quoted", key))
    })?;

    let value_end = rest[1..]
        .find(quote)
        .ok_or_else(|| ConvertError::malformed(format!("attribute '{}' is unterminated", key)))?
        + 1;
    let value = &rest[1..value_end];

    Ok(Some((key.to_string(), value.to_string(), &rest[value_end + 1..])))
}
