//! Declaration name extraction
//!
//! Resolution order, first match wins:
//! 1. the node's `name` field
//! 2. a language-specific rule (declarators, parent bindings, `key` fields)
//! 3. the first direct child of identifier kind

use crate::chunking::node_text;
use crate::parsing::languages::LanguageId;
use tree_sitter::Node;

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "property_identifier",
    "field_identifier",
    "constant",
    "name",
];

/// Kinds that end a C/C++ declarator chain
const DECLARATOR_TERMINALS: &[&str] = &[
    "identifier",
    "field_identifier",
    "type_identifier",
    "qualified_identifier",
    "destructor_name",
    "operator_name",
];

const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "generator_function",
];

/// Display name for `node`, if one can be found
pub fn extract_name(language: LanguageId, node: &Node<'_>, source: &str) -> Option<String> {
    field_text(node, "name", source)
        .or_else(|| language_rule(language, node, source))
        .or_else(|| field_text(node, "key", source))
        .or_else(|| {
            named_child_where(node, |child| IDENTIFIER_KINDS.contains(&child.kind()))
                .and_then(|child| non_empty(node_text(&child, source)))
        })
}

fn language_rule(language: LanguageId, node: &Node<'_>, source: &str) -> Option<String> {
    match language {
        LanguageId::JavaScript | LanguageId::TypeScript | LanguageId::Tsx => {
            script_binding(node, source)
        }
        LanguageId::Go => leftmost_identifier(node, source),
        LanguageId::Rust if node.kind() == "impl_item" => field_text(node, "type", source),
        LanguageId::Java if node.kind() == "field_declaration" => node
            .child_by_field_name("declarator")
            .and_then(|declarator| field_text(&declarator, "name", source)),
        LanguageId::C | LanguageId::Cpp => declarator_name(node, source),
        LanguageId::Html => {
            let tag = named_child_where(node, |child| {
                matches!(child.kind(), "start_tag" | "self_closing_tag")
            })?;
            named_child_where(&tag, |child| child.kind() == "tag_name")
                .and_then(|name| non_empty(node_text(&name, source)))
        }
        LanguageId::Css => {
            let kind = match node.kind() {
                "rule_set" => "selectors",
                "keyframes_statement" => "keyframes_name",
                _ => return None,
            };
            named_child_where(node, |child| child.kind() == kind)
                .and_then(|child| non_empty(node_text(&child, source)))
        }
        _ => None,
    }
}

/// JS/TS: function values take the name they are bound to, declarations
/// take the name of their first declarator
fn script_binding(node: &Node<'_>, source: &str) -> Option<String> {
    let kind = node.kind();
    if FUNCTION_VALUES.contains(&kind) {
        let parent = node.parent()?;
        return match parent.kind() {
            "variable_declarator" => field_text(&parent, "name", source),
            "pair" => field_text(&parent, "key", source),
            "assignment_expression" => field_text(&parent, "left", source),
            "public_field_definition" | "field_definition" => field_text(&parent, "name", source)
                .or_else(|| field_text(&parent, "property", source)),
            _ => None,
        };
    }

    if matches!(kind, "lexical_declaration" | "variable_declaration") {
        let declarator = named_child_where(node, |child| child.kind() == "variable_declarator")?;
        return field_text(&declarator, "name", source);
    }

    None
}

/// Go: some declaration forms wrap the identifier in spec nodes
/// (`type_declaration > type_spec > type_identifier`)
fn leftmost_identifier(node: &Node<'_>, source: &str) -> Option<String> {
    let mut current = *node;
    loop {
        if let Some(identifier) =
            named_child_where(&current, |child| IDENTIFIER_KINDS.contains(&child.kind()))
        {
            return non_empty(node_text(&identifier, source));
        }
        current = named_child_where(&current, |child| !child.kind().contains("comment"))?;
    }
}

/// C/C++: follow `declarator` fields down to the declared identifier
fn declarator_name(node: &Node<'_>, source: &str) -> Option<String> {
    let mut current = node.child_by_field_name("declarator")?;
    loop {
        if DECLARATOR_TERMINALS.contains(&current.kind()) {
            return non_empty(node_text(&current, source));
        }
        current = current
            .child_by_field_name("declarator")
            .or_else(|| named_child_where(&current, |_| true))?;
    }
}

fn field_text(node: &Node<'_>, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| non_empty(node_text(&child, source)))
}

fn named_child_where<'t>(
    node: &Node<'t>,
    predicate: impl Fn(&Node<'t>) -> bool,
) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|child| predicate(child))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
