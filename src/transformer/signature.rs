//! Signature text rebuilt from extracted parameters.

use crate::model::Parameter;

/// One slot of a parameter list.
#[derive(Debug, Clone, Copy)]
pub enum Slot<'p> {
    /// `self` / `cls` of a method
    Receiver(&'p str),
    Param(&'p Parameter),
    /// `/`
    PositionalOnly,
    /// bare `*`
    KeywordOnly,
}

impl Slot<'_> {
    pub fn text(&self) -> String {
        match self {
            Slot::Receiver(name) => name.to_string(),
            Slot::Param(param) => format_param(param),
            Slot::PositionalOnly => "/".to_string(),
            Slot::KeywordOnly => "*".to_string(),
        }
    }

    /// Inline documentation carried by this slot
    pub fn doc(&self) -> &str {
        match self {
            Slot::Param(param) => &param.inline_doc,
            _ => "",
        }
    }
}

/// Lays out parameters with the `/` and `*` separators they were declared with.
pub fn slots<'p>(receiver: Option<&'p str>, params: &'p [Parameter]) -> Vec<Slot<'p>> {
    let mut slots = Vec::with_capacity(params.len() + 3);
    if let Some(receiver) = receiver {
        slots.push(Slot::Receiver(receiver));
    }

    let last_positional_only = params.iter().rposition(|p| p.is_positional_only);
    let has_star_args = params.iter().any(|p| p.is_variadic_positional);
    let mut star_written = has_star_args;

    for (idx, param) in params.iter().enumerate() {
        if param.is_keyword_only && !star_written {
            slots.push(Slot::KeywordOnly);
            star_written = true;
        }
        slots.push(Slot::Param(param));
        if Some(idx) == last_positional_only {
            slots.push(Slot::PositionalOnly);
        }
    }
    slots
}

/// `name: T = default`, `name=default`, `*args: T` ...
pub fn format_param(param: &Parameter) -> String {
    let mut text = param.display_name();
    if let Some(annotation) = &param.type_annotation {
        text.push_str(": ");
        text.push_str(annotation);
    }
    if let Some(default) = &param.default_value {
        if param.type_annotation.is_some() {
            text.push_str(" = ");
        } else {
            text.push('=');
        }
        text.push_str(default);
    }
    text
}

/// Comma-separated parameter list on one line
pub fn single_line(slots: &[Slot<'_>]) -> String {
    slots
        .iter()
        .map(Slot::text)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One slot per line, each followed by its inline comment.
///
/// Returns the lines between `(` and `)` including a trailing comma on every slot.
pub fn one_per_line(slots: &[Slot<'_>], indent: &str) -> Vec<String> {
    slots
        .iter()
        .map(|slot| {
            let doc = slot.doc();
            if doc.is_empty() {
                format!("{}{},", indent, slot.text())
            } else {
                format!("{}{},  # {}", indent, slot.text(), doc)
            }
        })
        .collect()
}
