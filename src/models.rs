//! Core data types shared across the upload and generation paths.

use std::sync::Arc;

/// MIME type for DOCX payloads.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type for PDF payloads.
pub const MIME_PDF: &str = "application/pdf";

/// Source format of an uploaded template.
///
/// A closed variant set: each format knows its own MIME type and file
/// extension, and picks its own extractor ([`crate::extract`]) and
/// serializer ([`crate::render`]). New formats become new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Docx,
    Pdf,
}

impl SourceFormat {
    /// Maps a lowercase file extension (without the dot) to a format.
    /// Returns `None` for anything other than `docx` or `pdf`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "docx" => Some(SourceFormat::Docx),
            "pdf" => Some(SourceFormat::Pdf),
            _ => None,
        }
    }

    /// Derives the format from a filename's extension, case-insensitive.
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = name.rsplit('.').next()?;
        Self::from_extension(&ext.to_ascii_lowercase())
    }

    /// Content-type string for documents of this format.
    pub fn mime(&self) -> &'static str {
        match self {
            SourceFormat::Docx => MIME_DOCX,
            SourceFormat::Pdf => MIME_PDF,
        }
    }

    /// File extension (without the dot) for documents of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Docx => "docx",
            SourceFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// An uploaded template after text extraction.
///
/// Immutable once created: the store hands out `Arc<TemplateRecord>` and
/// there is no update operation.
#[derive(Debug, Clone)]
pub struct TemplateRecord {
    /// UUID v4 issued at upload time.
    pub id: String,
    /// Extracted plain text of the template.
    pub content: String,
    /// Format the template was uploaded as; the generated report uses the same.
    pub format: SourceFormat,
    /// Caller-supplied filename, display-only.
    pub original_name: String,
    /// Unix timestamp of the upload.
    pub created_at: i64,
}

/// Shared handle to an immutable template record.
pub type SharedTemplate = Arc<TemplateRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping() {
        assert_eq!(SourceFormat::from_extension("docx"), Some(SourceFormat::Docx));
        assert_eq!(SourceFormat::from_extension("pdf"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_extension("txt"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn filename_mapping_is_case_insensitive() {
        assert_eq!(
            SourceFormat::from_filename("Quarterly Report.DOCX"),
            Some(SourceFormat::Docx)
        );
        assert_eq!(SourceFormat::from_filename("a.b.pdf"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_filename("noextension"), None);
    }

    #[test]
    fn mime_and_extension_agree() {
        assert!(SourceFormat::Docx.mime().contains("wordprocessingml"));
        assert_eq!(SourceFormat::Pdf.mime(), "application/pdf");
        assert_eq!(SourceFormat::Docx.extension(), "docx");
    }
}
