//! Conversion of raw boundary records into output chunks

use crate::chunking::boundary::RawBoundary;
use crate::parsing::languages::LanguageId;
use serde::{Deserialize, Serialize};

/// Boundary metadata carried by a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryInfo {
    /// Node kind of the boundary
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Enclosing named boundaries, outermost first
    #[serde(default)]
    pub parent: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

/// A declaration-sized slice of a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryChunk {
    /// Exactly `source[start_offset..end_offset]`
    pub content: String,
    /// Byte offset into the original source
    pub start_offset: usize,
    /// Byte offset (exclusive)
    pub end_offset: usize,
    /// Starting line number (1-indexed)
    pub start_line: usize,
    /// Ending line number (1-indexed)
    pub end_line: usize,
    pub language: LanguageId,
    pub boundary: BoundaryInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Turns [`RawBoundary`] records from one source into [`BoundaryChunk`]s
#[derive(Debug, Clone)]
pub struct ChunkMaterializer<'s> {
    source: &'s str,
    language: LanguageId,
    file_path: Option<String>,
}

impl<'s> ChunkMaterializer<'s> {
    pub const fn new(source: &'s str, language: LanguageId) -> Self {
        Self {
            source,
            language,
            file_path: None,
        }
    }

    /// Stamp every produced chunk with the originating file
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// One chunk per boundary, in input order
    pub fn to_chunks(&self, boundaries: Vec<RawBoundary>) -> Vec<BoundaryChunk> {
        boundaries
            .into_iter()
            .map(|boundary| self.to_chunk(boundary))
            .collect()
    }

    fn to_chunk(&self, boundary: RawBoundary) -> BoundaryChunk {
        let content = self
            .source
            .get(boundary.start_offset..boundary.end_offset)
            .unwrap_or_default()
            .to_string();

        BoundaryChunk {
            content,
            start_offset: boundary.start_offset,
            end_offset: boundary.end_offset,
            start_line: boundary.start_line,
            end_line: boundary.end_line,
            language: self.language,
            boundary: BoundaryInfo {
                kind: boundary.kind,
                name: boundary.name,
                parent: boundary.parent_chain,
                docs: Some(boundary.docs_text).filter(|docs| !docs.is_empty()),
            },
            file_path: self.file_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str, name: Option<&str>, start: usize, end: usize, docs: &str) -> RawBoundary {
        RawBoundary {
            kind: kind.to_string(),
            parent_chain: vec!["Outer".to_string()],
            name: name.map(str::to_string),
            start_offset: start,
            end_offset: end,
            text: String::new(),
            docs_text: docs.to_string(),
            start_line: 1,
            end_line: 1,
        }
    }

    #[test]
    fn test_content_is_slice_of_source() {
        let source = "// hi\nfn a() {}\nfn b() {}";
        let chunks = ChunkMaterializer::new(source, LanguageId::Rust).to_chunks(vec![
            raw("function_item", Some("a"), 0, 15, "// hi"),
            raw("function_item", Some("b"), 16, 25, ""),
        ]);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "// hi\nfn a() {}");
        assert_eq!(chunks[0].boundary.docs.as_deref(), Some("// hi"));
        assert_eq!(chunks[1].content, "fn b() {}");
        assert_eq!(chunks[1].boundary.docs, None);
        assert_eq!(chunks[1].boundary.parent, vec!["Outer".to_string()]);
        assert!(chunks.iter().all(|chunk| chunk.file_path.is_none()));
    }

    #[test]
    fn test_file_path_is_attached() {
        let source = "fn a() {}";
        let chunks = ChunkMaterializer::new(source, LanguageId::Rust)
            .with_file_path("src/lib.rs")
            .to_chunks(vec![raw("function_item", Some("a"), 0, 9, "")]);

        assert_eq!(chunks[0].file_path.as_deref(), Some("src/lib.rs"));
    }

    #[test]
    fn test_out_of_range_offsets_do_not_panic() {
        let chunks = ChunkMaterializer::new("short", LanguageId::Rust)
            .to_chunks(vec![raw("function_item", None, 2, 99, "")]);
        assert_eq!(chunks[0].content, "");
    }

    #[test]
    fn test_serialized_shape() {
        let chunks = ChunkMaterializer::new("fn a() {}", LanguageId::Rust)
            .to_chunks(vec![raw("function_item", None, 0, 9, "")]);
        let json = serde_json::to_value(&chunks[0]).unwrap();

        assert_eq!(json["boundary"]["type"], "function_item");
        assert_eq!(json["language"], "rust");
        assert!(json["boundary"].get("name").is_none());
        assert!(json["boundary"].get("docs").is_none());
        assert!(json.get("file_path").is_none());
    }
}
