//! Boundary discovery over a concrete syntax tree

use crate::chunking::docs::extract_docs;
use crate::chunking::names::extract_name;
use crate::chunking::node_text;
use crate::parsing::languages::{BoundaryTypeSet, LanguageId};
use std::collections::HashSet;
use std::sync::Arc;
use tree_sitter::Node;

/// Decides whether a boundary-eligible node is emitted
pub type BoundaryFilter = Arc<dyn Fn(LanguageId, &Node<'_>) -> bool + Send + Sync>;

/// Filter that accepts every boundary-eligible node
pub fn accept_all() -> BoundaryFilter {
    Arc::new(|_: LanguageId, _: &Node<'_>| true)
}

/// Filter that accepts only the given node kinds
pub fn kinds_filter<I, S>(kinds: I) -> BoundaryFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let kinds: HashSet<String> = kinds.into_iter().map(Into::into).collect();
    Arc::new(move |_: LanguageId, node: &Node<'_>| kinds.contains(node.kind()))
}

/// One discovered boundary, before materialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBoundary {
    /// Node kind, e.g. `function_declaration`
    pub kind: String,
    /// Names of the enclosing named boundaries, outermost first
    pub parent_chain: Vec<String>,
    pub name: Option<String>,
    /// Byte offset, moved back to the first leading doc comment when there is one
    pub start_offset: usize,
    pub end_offset: usize,
    /// The node's own text, without leading docs
    pub text: String,
    /// Attached documentation, empty when none was found
    pub docs_text: String,
    /// 1-based line of `start_offset`
    pub start_line: usize,
    /// 1-based line of `end_offset`
    pub end_line: usize,
}

/// Pre-order walk emitting a [`RawBoundary`] for every accepted node
///
/// A node is accepted when it is a named node, its kind is in
/// `boundary_types`, and `filter` returns true. Rejection only suppresses
/// output; children are always visited. Accepted nodes with a name extend the
/// parent chain seen by their descendants.
pub fn traverse<F>(
    root: Node<'_>,
    source: &str,
    language: LanguageId,
    boundary_types: &BoundaryTypeSet,
    filter: F,
) -> Vec<RawBoundary>
where
    F: Fn(LanguageId, &Node<'_>) -> bool,
{
    let mut boundaries = Vec::new();
    let mut chain: Vec<String> = Vec::new();
    // One entry per open node on the cursor path: did it push onto `chain`?
    let mut pushed: Vec<bool> = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        let accepted = node.is_named()
            && boundary_types.contains(node.kind())
            && filter(language, &node);

        let mut extends_chain = false;
        if accepted {
            let boundary = build_boundary(&node, source, language, &chain);
            if let Some(name) = &boundary.name {
                chain.push(name.clone());
                extends_chain = true;
            }
            boundaries.push(boundary);
        }
        pushed.push(extends_chain);

        if cursor.goto_first_child() {
            continue;
        }

        // Close finished nodes until a sibling is available
        loop {
            if pushed.pop() == Some(true) {
                chain.pop();
            }
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return boundaries;
            }
        }
    }
}

fn build_boundary(
    node: &Node<'_>,
    source: &str,
    language: LanguageId,
    chain: &[String],
) -> RawBoundary {
    let docs = extract_docs(language, node, source);
    let name = extract_name(language, node, source);

    let leading = docs.as_ref().and_then(|docs| docs.leading);
    let (start_offset, start_row) = leading.map_or_else(
        || (node.start_byte(), node.start_position().row),
        |start| (start.byte, start.row),
    );

    RawBoundary {
        kind: node.kind().to_string(),
        parent_chain: chain.to_vec(),
        name,
        start_offset,
        end_offset: node.end_byte(),
        text: node_text(node, source).to_string(),
        docs_text: docs.map(|docs| docs.text).unwrap_or_default(),
        start_line: start_row.saturating_add(1),
        end_line: node.end_position().row.saturating_add(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::GrammarProvider;
    use crate::parsing::languages::boundary_types;
    use tree_sitter::Tree;

    fn parse(language: LanguageId, source: &str) -> Tree {
        let provider = GrammarProvider::new();
        let parser = provider.create_parser(language).unwrap().unwrap();
        let mut parser = parser.lock().unwrap();
        parser.parse(source, None).unwrap()
    }

    fn run(language: LanguageId, source: &str, filter: &BoundaryFilter) -> Vec<RawBoundary> {
        let tree = parse(language, source);
        traverse(
            tree.root_node(),
            source,
            language,
            boundary_types(language),
            |lang, node| filter(lang, node),
        )
    }

    const NESTED_TS: &str = "\
class Shop {
  checkout() {
    const total = () => 1;
  }
}
";

    #[test]
    fn test_pre_order_and_parent_chain() {
        let boundaries = run(LanguageId::TypeScript, NESTED_TS, &accept_all());
        let summary: Vec<_> = boundaries
            .iter()
            .map(|b| (b.kind.as_str(), b.name.as_deref(), b.parent_chain.clone()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("class_declaration", Some("Shop"), vec![]),
                ("method_definition", Some("checkout"), vec!["Shop".to_string()]),
                (
                    "lexical_declaration",
                    Some("total"),
                    vec!["Shop".to_string(), "checkout".to_string()]
                ),
                (
                    "arrow_function",
                    Some("total"),
                    vec!["Shop".to_string(), "checkout".to_string(), "total".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn test_rejected_container_does_not_extend_chain() {
        let filter: BoundaryFilter = Arc::new(|_: LanguageId, node: &Node<'_>| {
            node.kind() != "class_declaration"
        });
        let boundaries = run(LanguageId::TypeScript, NESTED_TS, &filter);

        assert!(boundaries.iter().all(|b| b.kind != "class_declaration"));
        let method = boundaries
            .iter()
            .find(|b| b.kind == "method_definition")
            .unwrap();
        assert!(method.parent_chain.is_empty());
    }

    #[test]
    fn test_unnamed_boundary_is_emitted_without_extending_chain() {
        let source = "function outer() {\n  [1].map((x) => { function inner() {} });\n}\n";
        let boundaries = run(LanguageId::JavaScript, source, &accept_all());

        let arrow = boundaries.iter().find(|b| b.kind == "arrow_function").unwrap();
        assert_eq!(arrow.name, None);
        assert_eq!(arrow.parent_chain, vec!["outer".to_string()]);

        let inner = boundaries
            .iter()
            .find(|b| b.name.as_deref() == Some("inner"))
            .unwrap();
        assert_eq!(inner.parent_chain, vec!["outer".to_string()]);
    }

    #[test]
    fn test_always_false_filter_yields_nothing() {
        let filter: BoundaryFilter = Arc::new(|_: LanguageId, _: &Node<'_>| false);
        assert!(run(LanguageId::TypeScript, NESTED_TS, &filter).is_empty());
    }

    #[test]
    fn test_kinds_filter() {
        let filter = kinds_filter(["method_definition"]);
        let boundaries = run(LanguageId::TypeScript, NESTED_TS, &filter);
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name.as_deref(), Some("checkout"));
    }

    #[test]
    fn test_docs_extend_start_but_not_text() {
        let source = "const a = 1;\n// adds\n// numbers\nfunction add(a, b) { return a + b; }\n";
        let boundaries = run(LanguageId::JavaScript, source, &accept_all());
        let add = boundaries.iter().find(|b| b.kind == "function_declaration").unwrap();

        assert_eq!(add.start_offset, source.find("// adds").unwrap());
        assert_eq!(add.docs_text, "// adds\n// numbers");
        assert!(add.text.starts_with("function add"));
        assert_eq!(add.start_line, 2);
        assert_eq!(add.end_line, 4);
    }

    #[test]
    fn test_anonymous_keyword_tokens_are_not_boundaries() {
        // Ruby's `class` keyword token shares its kind with the class node
        let source = "class Greeter\n  def hi\n  end\nend\n";
        let boundaries = run(LanguageId::Ruby, source, &accept_all());
        let kinds: Vec<_> = boundaries.iter().map(|b| b.kind.as_str()).collect();
        assert_eq!(kinds, vec!["class", "method"]);
        assert_eq!(boundaries[1].parent_chain, vec!["Greeter".to_string()]);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 500;
        let mut source = String::new();
        for _ in 0..depth {
            source.push_str("(() => ");
        }
        source.push('1');
        for _ in 0..depth {
            source.push(')');
        }
        source.push(';');

        let boundaries = run(LanguageId::JavaScript, &source, &accept_all());
        assert_eq!(boundaries.len(), depth);
    }
}
