//! Plain-text extraction from uploaded resume documents.
//!
//! Extraction never fails from the caller's point of view: any parser error,
//! I/O error or parser panic is logged and yields an empty string.

use std::path::Path;

use anyhow::{anyhow, Result};
use docx_rs::{
    DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use tracing::{debug, warn};

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Case-insensitive lookup by file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

/// Reads `path` and extracts its text as `kind`. Returns an empty string on
/// any failure.
pub async fn extract_text(path: &Path, kind: DocumentKind) -> String {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) => {
            warn!("Failed to read {} for extraction: {e}", path.display());
            return String::new();
        }
    };

    // Parsers are CPU-bound and may panic on malformed input; a panic
    // surfaces here as a JoinError.
    let result = tokio::task::spawn_blocking(move || extract_from_bytes(&bytes, kind)).await;

    match result {
        Ok(Ok(text)) => {
            debug!("Extracted {} chars from {}", text.len(), path.display());
            text
        }
        Ok(Err(e)) => {
            warn!("Error extracting text from {}: {e:#}", path.display());
            String::new()
        }
        Err(e) => {
            warn!("Text extraction aborted for {}: {e}", path.display());
            String::new()
        }
    }
}

fn extract_from_bytes(bytes: &[u8], kind: DocumentKind) -> Result<String> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| anyhow!("PDF: {e}"))
        }
        DocumentKind::Docx => extract_docx(bytes),
    }
}

/// Walks the document body in order, one line per paragraph. Paragraphs
/// nested in table cells, hyperlinks and tracked insertions are included;
/// tracked deletions are not.
fn extract_docx(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| anyhow!("DOCX: {e}"))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => push_paragraph(&mut text, p),
            DocumentChild::Table(t) => push_table(&mut text, t),
            _ => {}
        }
    }
    Ok(text)
}

fn push_paragraph(out: &mut String, paragraph: &Paragraph) {
    push_paragraph_children(out, &paragraph.children);
    out.push('\n');
}

fn push_paragraph_children(out: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(out, run),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(out, &link.children),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        push_run(out, run);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(out: &mut String, run: &Run) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

fn push_table(out: &mut String, table: &Table) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => push_paragraph(out, p),
                    TableCellContent::Table(t) => push_table(out, t),
                    _ => {}
                }
            }
        }
    }
}

/// Builds a single-paragraph-per-line DOCX in memory.
#[cfg(test)]
pub fn docx_fixture(lines: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    let mut doc = Docx::new();
    for line in lines {
        doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
    }
    let mut buf = Cursor::new(Vec::new());
    doc.build().pack(&mut buf).unwrap();
    buf.into_inner()
}

/// Builds a DOCX whose only content is a one-row table, one cell per entry.
#[cfg(test)]
pub fn docx_table_fixture(cells: &[&str]) -> Vec<u8> {
    use docx_rs::{Docx, TableCell, TableRow};
    use std::io::Cursor;

    let row = TableRow::new(
        cells
            .iter()
            .map(|c| TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(*c))))
            .collect(),
    );
    let mut buf = Cursor::new(Vec::new());
    Docx::new()
        .add_table(Table::new(vec![row]))
        .build()
        .pack(&mut buf)
        .unwrap();
    buf.into_inner()
}

/// Builds a one-page PDF showing `line` in Courier.
#[cfg(test)]
pub fn pdf_fixture(line: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(line)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_extension("doc"), None);
        assert_eq!(DocumentKind::from_extension("txt"), None);
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let bytes = docx_fixture(&["Jane Doe", "7 years of Rust"]);
        let text = extract_docx(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\n7 years of Rust\n");
    }

    #[test]
    fn test_docx_table_cells_are_extracted() {
        let bytes = docx_table_fixture(&["Jane Doe", "7 years of Python, PhD"]);
        let text = extract_docx(&bytes).unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("7 years of Python, PhD"));
    }

    #[test]
    fn test_docx_hyperlink_and_inserted_runs_are_extracted() {
        use docx_rs::{Docx, Hyperlink, HyperlinkType, Insert};
        use std::io::Cursor;

        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text("Contact: "))
            .add_hyperlink(
                Hyperlink::new("mailto:jane@example.com", HyperlinkType::External)
                    .add_run(Run::new().add_text("jane@example.com")),
            )
            .add_insert(Insert::new(Run::new().add_text(" (Rust)")));
        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(paragraph)
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_docx(&buf.into_inner()).unwrap();
        assert!(text.starts_with("Contact:"));
        assert!(text.contains("jane@example.com"));
        assert!(text.contains("(Rust)"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let bytes = pdf_fixture("5 years of Python and SQL experience, PhD in CS");
        let text = extract_from_bytes(&bytes, DocumentKind::Pdf).unwrap();
        assert!(text.contains("Python and SQL"), "got {text:?}");
        assert!(text.contains("PhD"));
    }

    #[test]
    fn test_garbage_docx_is_an_error() {
        assert!(extract_docx(b"not a zip archive").is_err());
    }

    #[tokio::test]
    async fn test_corrupt_pdf_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        tokio::fs::write(&path, b"%PDF-1.4 this is not really a pdf")
            .await
            .unwrap();

        assert_eq!(extract_text(&path, DocumentKind::Pdf).await, "");
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.docx");
        assert_eq!(extract_text(&path, DocumentKind::Docx).await, "");
    }

    #[tokio::test]
    async fn test_docx_file_extracts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        tokio::fs::write(&path, docx_fixture(&["PhD in CS"])).await.unwrap();

        let text = extract_text(&path, DocumentKind::Docx).await;
        assert!(text.contains("PhD in CS"));
    }
}
