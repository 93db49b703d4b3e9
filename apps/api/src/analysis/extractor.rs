use bytes::Bytes;
use tracing::{debug, error};

use crate::errors::AppError;

/// Returns true if the upload looks like a PDF by content type, file name or magic bytes.
pub fn is_pdf(content_type: Option<&str>, file_name: Option<&str>, head: &[u8]) -> bool {
    let ct = content_type.unwrap_or("").to_ascii_lowercase();
    let name = file_name.unwrap_or("").to_ascii_lowercase();
    ct.contains("application/pdf") || name.ends_with(".pdf") || head.starts_with(b"%PDF-")
}

/// Extracts the concatenated page text of an in-memory PDF.
///
/// Runs `pdf-extract` on the blocking pool; a panic inside the library comes back as
/// a join error and is reported like any other unreadable document.
pub async fn extract_resume_text(pdf: Bytes) -> Result<String, AppError> {
    if pdf.is_empty() {
        return Err(AppError::Extraction("the uploaded file is empty".to_string()));
    }

    let size = pdf.len();
    let extracted = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&pdf).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| {
        error!("PDF extractor aborted: {e}");
        AppError::Extraction("the document could not be parsed".to_string())
    })?
    .map_err(AppError::Extraction)?;

    let text = extracted.trim();
    if text.is_empty() {
        return Err(AppError::Extraction(
            "the document contains no extractable text".to_string(),
        ));
    }

    debug!("Extracted {} chars from {} byte PDF", text.len(), size);
    Ok(text.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a one-page PDF that shows `text` in Helvetica. `text` must not contain
    /// parentheses or backslashes.
    pub(crate) fn sample_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    #[tokio::test]
    async fn test_extracts_text_from_valid_pdf() {
        let pdf = sample_pdf("Rust engineer with Kubernetes");
        assert!(is_pdf(None, None, &pdf));

        let text = extract_resume_text(Bytes::from(pdf)).await.unwrap();
        assert!(text.contains("Rust engineer"), "got {text:?}");
        assert!(text.contains("Kubernetes"), "got {text:?}");
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_is_pdf_by_content_type() {
        assert!(is_pdf(Some("Application/PDF"), None, b""));
    }

    #[test]
    fn test_is_pdf_by_file_name_or_magic() {
        assert!(is_pdf(None, Some("cv.PDF"), b""));
        assert!(is_pdf(Some("application/octet-stream"), Some("blob"), b"%PDF-1.7\n"));
    }

    #[test]
    fn test_non_pdf_upload_is_rejected() {
        assert!(!is_pdf(Some("text/plain"), Some("resume.docx"), b"PK\x03\x04"));
    }

    #[tokio::test]
    async fn test_empty_upload_is_extraction_error() {
        let err = extract_resume_text(Bytes::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(msg) if msg.contains("empty")));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_extraction_error() {
        let err = extract_resume_text(Bytes::from_static(b"%PDF-1.4 this is not really a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
