//! Documentation attachment
//!
//! Each language belongs to exactly one [`DocFamily`]. Comment-adjacent
//! languages collect the run of comment lines sitting directly above a
//! declaration; Python reads the docstring embedded as the first statement
//! of the body; markup and shell languages never carry docs.

use crate::chunking::node_text;
use crate::parsing::languages::LanguageId;
use tree_sitter::Node;

/// Construct that wraps a declaration without being part of it (`export function f() {}`)
const EXPORT_WRAPPER: &str = "export_statement";

/// How a language attaches documentation to a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFamily {
    CommentAdjacent,
    Docstring,
    Unsupported,
}

impl DocFamily {
    pub const fn of(language: LanguageId) -> Self {
        match language {
            LanguageId::JavaScript
            | LanguageId::TypeScript
            | LanguageId::Tsx
            | LanguageId::Go
            | LanguageId::Rust
            | LanguageId::Java
            | LanguageId::CSharp
            | LanguageId::Ruby
            | LanguageId::C
            | LanguageId::Cpp => Self::CommentAdjacent,
            LanguageId::Python => Self::Docstring,
            LanguageId::Html | LanguageId::Css | LanguageId::Bash => Self::Unsupported,
        }
    }
}

/// Documentation found for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Documentation {
    pub text: String,
    /// Where a leading comment block begins; `None` when the docs sit inside the node
    pub leading: Option<LeadingStart>,
}

/// Start of a comment block that precedes its declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingStart {
    pub byte: usize,
    pub row: usize,
}

/// Documentation attached to `node`, if any
pub fn extract_docs(language: LanguageId, node: &Node<'_>, source: &str) -> Option<Documentation> {
    match DocFamily::of(language) {
        DocFamily::CommentAdjacent => leading_comments(node, source),
        DocFamily::Docstring => docstring(node, source),
        DocFamily::Unsupported => None,
    }
}

fn is_comment(node: &Node<'_>) -> bool {
    node.kind().contains("comment")
}

fn leading_comments(node: &Node<'_>, source: &str) -> Option<Documentation> {
    let anchor = match node.parent() {
        Some(parent) if parent.kind() == EXPORT_WRAPPER => parent,
        _ => *node,
    };

    let candidate = anchor.prev_sibling().filter(is_comment)?;

    // Walk upward while every line directly above is another comment
    let mut run = vec![candidate];
    let mut last = candidate;
    while let Some(prev) = last.prev_sibling() {
        let contiguous =
            last.start_position().row.checked_sub(1) == Some(prev.start_position().row);
        if !is_comment(&prev) || !contiguous {
            break;
        }
        run.push(prev);
        last = prev;
    }

    let text = run
        .iter()
        .rev()
        .map(|comment| node_text(comment, source).trim_end_matches(['\n', '\r']))
        .collect::<Vec<_>>()
        .join("\n");

    Some(Documentation {
        text,
        leading: Some(LeadingStart {
            byte: last.start_byte(),
            row: last.start_position().row,
        }),
    })
}

fn docstring(node: &Node<'_>, source: &str) -> Option<Documentation> {
    let body = node.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let first_statement = body
        .named_children(&mut cursor)
        .find(|child| !is_comment(child))?;
    if first_statement.kind() != "expression_statement" {
        return None;
    }

    let mut cursor = first_statement.walk();
    let parts: Vec<Node<'_>> = first_statement.named_children(&mut cursor).collect();
    match parts.as_slice() {
        [literal] if literal.kind() == "string" => Some(Documentation {
            text: node_text(literal, source).to_string(),
            leading: None,
        }),
        _ => None,
    }
}
