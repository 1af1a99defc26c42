//! Output document serialization.
//!
//! Takes the generated text and wraps it in a document of the template's
//! source format:
//!
//! - **DOCX** — a minimal OOXML package (`[Content_Types].xml`, `_rels/.rels`,
//!   `word/document.xml`) holding exactly one paragraph with the entire text
//!   verbatim. No heading or structure inference, no reuse of the original
//!   template's formatting.
//! - **PDF** — a real single-font PDF: the text is word-wrapped, paginated,
//!   and written with correct xref byte offsets, so the output opens in any
//!   PDF viewer and round-trips through `pdf-extract`.

use std::io::Write;

use crate::models::SourceFormat;

/// Page geometry for PDF output (US Letter, 1" margins, 12pt Helvetica).
const PDF_PAGE_WIDTH: f64 = 612.0;
const PDF_PAGE_HEIGHT: f64 = 792.0;
const PDF_MARGIN: f64 = 72.0;
const PDF_FONT_SIZE: f64 = 12.0;
const PDF_LINE_HEIGHT: f64 = 14.0;
/// Conservative character budget per line for 12pt Helvetica.
const PDF_CHARS_PER_LINE: usize = 78;

/// Serialization error. The generate handler maps this to a
/// `serialization_failure` response.
#[derive(Debug)]
pub enum RenderError {
    Docx(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Docx(e) => write!(f, "DOCX serialization failed: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

/// Serializes generated text into a document of the given format.
pub fn render_document(text: &str, format: SourceFormat) -> Result<Vec<u8>, RenderError> {
    match format {
        SourceFormat::Docx => render_docx(text),
        SourceFormat::Pdf => Ok(render_pdf(text)),
    }
}

// ============ DOCX ============

fn render_docx(text: &str) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())
            .map_err(|e| RenderError::Docx(e.to_string()))?;

        zip.start_file("_rels/.rels", options)
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        zip.write_all(RELS_XML.as_bytes())
            .map_err(|e| RenderError::Docx(e.to_string()))?;

        zip.start_file("word/document.xml", options)
            .map_err(|e| RenderError::Docx(e.to_string()))?;
        zip.write_all(document_xml(text).as_bytes())
            .map_err(|e| RenderError::Docx(e.to_string()))?;

        zip.finish().map_err(|e| RenderError::Docx(e.to_string()))?;
    }
    Ok(buf)
}

const CONTENT_TYPES_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
</Types>";

const RELS_XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";

/// One paragraph, one run, whole text verbatim. `xml:space="preserve"` keeps
/// leading/trailing whitespace through Word's parser.
fn document_xml(text: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:body><w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p></w:body></w:document>",
        escape_xml(text)
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

// ============ PDF ============

/// Builds a complete PDF: catalog, page tree, Helvetica font, one page and
/// content stream per block of wrapped lines, then an xref table whose
/// offsets match the emitted bytes.
fn render_pdf(text: &str) -> Vec<u8> {
    let lines = wrap_lines(text, PDF_CHARS_PER_LINE);
    let lines_per_page =
        ((PDF_PAGE_HEIGHT - 2.0 * PDF_MARGIN) / PDF_LINE_HEIGHT).floor() as usize;
    let pages: Vec<&[String]> = if lines.is_empty() {
        vec![&[] as &[String]]
    } else {
        lines.chunks(lines_per_page).collect()
    };
    let page_count = pages.len();

    // Object layout: 1 catalog, 2 pages, 3 font, then (page, content) pairs.
    let page_obj = |i: usize| 4 + 2 * i;
    let content_obj = |i: usize| 5 + 2 * i;
    let total_objects = 3 + 2 * page_count;

    let mut out = Vec::new();
    let mut offsets = Vec::with_capacity(total_objects);
    out.extend_from_slice(b"%PDF-1.4\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");

    offsets.push(out.len());
    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", page_obj(i)))
        .collect::<Vec<_>>()
        .join(" ");
    out.extend_from_slice(
        format!(
            "2 0 obj << /Type /Pages /Kids [{}] /Count {} >> endobj\n",
            kids, page_count
        )
        .as_bytes(),
    );

    offsets.push(out.len());
    out.extend_from_slice(
        b"3 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n",
    );

    for (i, page_lines) in pages.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{} 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >> endobj\n",
                page_obj(i),
                PDF_PAGE_WIDTH,
                PDF_PAGE_HEIGHT,
                content_obj(i)
            )
            .as_bytes(),
        );

        let stream = page_content_stream(page_lines);
        offsets.push(out.len());
        out.extend_from_slice(
            format!("{} 0 obj << /Length {} >> stream\n", content_obj(i), stream.len()).as_bytes(),
        );
        out.extend_from_slice(stream.as_bytes());
        out.extend_from_slice(b"\nendstream endobj\n");
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", total_objects + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            total_objects + 1,
            xref_start
        )
        .as_bytes(),
    );
    out
}

/// Text-drawing operators for one page of lines.
fn page_content_stream(lines: &[String]) -> String {
    let start_y = PDF_PAGE_HEIGHT - PDF_MARGIN - PDF_FONT_SIZE;
    let mut stream = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        PDF_FONT_SIZE, PDF_LINE_HEIGHT, PDF_MARGIN, start_y
    );
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            stream.push_str("T*\n");
        }
        stream.push('(');
        stream.push_str(&escape_pdf_string(line));
        stream.push_str(") Tj\n");
    }
    stream.push_str("ET");
    stream
}

/// Escapes the PDF string-literal specials: backslash and parentheses.
fn escape_pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(c),
        }
    }
    out
}

/// Word-wraps text at `max_chars` per line, honoring existing newlines.
/// Words longer than a line are hard-split.
fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if word.chars().count() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(max_chars) {
                    lines.push(chunk.iter().collect());
                }
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_text;

    #[test]
    fn docx_output_roundtrips_through_extractor() {
        let bytes = render_document("Dear Acme, your report is ready.", SourceFormat::Docx)
            .unwrap();
        let text = extract_text(&bytes, SourceFormat::Docx).unwrap();
        assert_eq!(text, "Dear Acme, your report is ready.");
    }

    #[test]
    fn docx_output_escapes_markup() {
        let bytes = render_document("5 < 6 & 7 > 2", SourceFormat::Docx).unwrap();
        let text = extract_text(&bytes, SourceFormat::Docx).unwrap();
        assert_eq!(text, "5 < 6 & 7 > 2");
    }

    #[test]
    fn docx_package_has_required_parts() {
        let bytes = render_document("x", SourceFormat::Docx).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<String> = archive.file_names().map(|s| s.to_string()).collect();
        assert!(names.contains(&"[Content_Types].xml".to_string()));
        assert!(names.contains(&"_rels/.rels".to_string()));
        assert!(names.contains(&"word/document.xml".to_string()));
        assert!(archive.by_name("word/document.xml").is_ok());
    }

    #[test]
    fn pdf_output_is_structurally_valid() {
        let bytes = render_document("Dear Acme, thank you for your order.", SourceFormat::Pdf)
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn pdf_output_roundtrips_through_pdf_extract() {
        let bytes = render_document("Dear Acme, thank you for your order.", SourceFormat::Pdf)
            .unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(
            text.contains("Dear Acme, thank you for your order."),
            "extracted: {:?}",
            text
        );
    }

    #[test]
    fn pdf_escapes_string_specials() {
        let bytes = render_document("paren (test) and back\\slash", SourceFormat::Pdf).unwrap();
        let text = pdf_extract::extract_text_from_mem(&bytes).unwrap();
        assert!(text.contains("paren (test)"), "extracted: {:?}", text);
    }

    #[test]
    fn long_text_paginates() {
        let word = "report ";
        let long_text = word.repeat(3000); // far more than one page
        let bytes = render_document(&long_text, SourceFormat::Pdf).unwrap();
        let body = String::from_utf8_lossy(&bytes);
        let count = body
            .lines()
            .filter(|l| l.contains("/Type /Page ") && l.contains("/Contents"))
            .count();
        assert!(count > 1, "expected multiple pages, got {}", count);
    }

    #[test]
    fn empty_text_still_yields_one_page() {
        let bytes = render_document("", SourceFormat::Pdf).unwrap();
        let body = String::from_utf8_lossy(&bytes);
        assert!(body.contains("/Count 1"));
    }

    #[test]
    fn wrap_respects_word_boundaries() {
        let lines = wrap_lines("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn wrap_hard_splits_oversized_words() {
        let lines = wrap_lines("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_preserves_blank_lines() {
        let lines = wrap_lines("one\n\ntwo", 10);
        assert_eq!(lines, vec!["one", "", "two"]);
    }
}
