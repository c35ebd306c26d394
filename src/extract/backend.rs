//! PDF parsing backends.
//!
//! A backend turns a PDF file into raw per-page text. Two are available behind
//! cargo features: `lopdf-backend` (preferred, reports page geometry) and
//! `pdf-extract-backend`. With neither compiled in, extraction is unavailable.

use std::path::Path;

use super::ExtractError;

/// Text of one physical page as the backend reports it
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    /// 1-based page number
    pub page_number: usize,
    pub text: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl RawPage {
    /// A page with text and no geometry
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
            width: None,
            height: None,
        }
    }
}

/// Something that can read page texts out of a PDF
pub trait PageBackend {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Read every page of the document, in order
    fn load_pages(&self, path: &Path) -> Result<Vec<RawPage>, ExtractError>;
}

/// Pick the best backend compiled into this build
#[allow(unreachable_code)]
pub fn default_backend() -> Result<Box<dyn PageBackend>, ExtractError> {
    #[cfg(feature = "lopdf-backend")]
    {
        return Ok(Box::new(LopdfBackend));
    }

    #[cfg(feature = "pdf-extract-backend")]
    {
        return Ok(Box::new(PdfExtractBackend));
    }

    tracing::warn!("No PDF backend compiled in; enable `lopdf-backend` or `pdf-extract-backend`");
    Err(ExtractError::BackendUnavailable)
}

/// Returns true if any PDF backend is available in this build
pub fn is_available() -> bool {
    cfg!(any(feature = "lopdf-backend", feature = "pdf-extract-backend"))
}

/// Backend built on `lopdf`
#[cfg(feature = "lopdf-backend")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

#[cfg(feature = "lopdf-backend")]
impl PageBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn load_pages(&self, path: &Path) -> Result<Vec<RawPage>, ExtractError> {
        let document = lopdf::Document::load(path).map_err(|err| {
            ExtractError::ExtractionFailed(format!("lopdf failed to open {}: {err}", path.display()))
        })?;

        let mut pages = Vec::new();
        for (index, (page_number, page_id)) in document.get_pages().into_iter().enumerate() {
            let text = document.extract_text(&[page_number]).map_err(|err| {
                ExtractError::ExtractionFailed(format!(
                    "lopdf failed to extract page {page_number} of {}: {err}",
                    path.display()
                ))
            })?;
            let (width, height) = media_box_size(&document, page_id).unzip();

            pages.push(RawPage {
                page_number: index + 1,
                text,
                width,
                height,
            });
        }

        Ok(pages)
    }
}

/// Width and height of a page's MediaBox, walking up the page tree if needed
#[cfg(feature = "lopdf-backend")]
fn media_box_size(document: &lopdf::Document, page_id: lopdf::ObjectId) -> Option<(f64, f64)> {
    use lopdf::Object;

    fn number(object: &Object) -> Option<f64> {
        match object {
            Object::Integer(value) => Some(*value as f64),
            Object::Real(value) => Some(*value as f64),
            _ => None,
        }
    }

    let mut current = Some(page_id);
    // Bounded walk in case of a malformed parent cycle
    for _ in 0..32 {
        let dict = document.get_dictionary(current?).ok()?;
        if let Ok(media_box) = dict.get(b"MediaBox") {
            let (_, media_box) = document.dereference(media_box).ok()?;
            let values = media_box.as_array().ok()?;
            if values.len() != 4 {
                return None;
            }
            let coords: Vec<f64> = values.iter().filter_map(number).collect();
            if coords.len() != 4 {
                return None;
            }
            return Some(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()));
        }
        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }
    None
}

/// Backend built on `pdf-extract`
#[cfg(feature = "pdf-extract-backend")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend;

#[cfg(feature = "pdf-extract-backend")]
impl PageBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn load_pages(&self, path: &Path) -> Result<Vec<RawPage>, ExtractError> {
        let texts = pdf_extract::extract_text_by_pages(path)
            .map_err(|err| ExtractError::ExtractionFailed(err.to_string()))?;

        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| RawPage::new(index + 1, text))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "lopdf-backend")]
    #[test]
    fn test_lopdf_is_preferred() {
        assert!(is_available());
        assert_eq!(default_backend().unwrap().name(), "lopdf");
    }

    #[cfg(all(feature = "pdf-extract-backend", not(feature = "lopdf-backend")))]
    #[test]
    fn test_pdf_extract_fallback() {
        assert!(is_available());
        assert_eq!(default_backend().unwrap().name(), "pdf-extract");
    }

    #[cfg(not(any(feature = "lopdf-backend", feature = "pdf-extract-backend")))]
    #[test]
    fn test_no_backend_compiled_in() {
        use crate::extract::PdfExtractor;

        assert!(!is_available());
        assert!(matches!(default_backend(), Err(ExtractError::BackendUnavailable)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let err = PdfExtractor::new(&path).unwrap_err();
        assert!(matches!(err, ExtractError::BackendUnavailable));
        assert!(err.to_string().contains("lopdf-backend"));

        // A missing file is still reported as missing
        assert!(matches!(
            PdfExtractor::new(dir.path().join("missing.pdf")),
            Err(ExtractError::NotFound(_))
        ));
    }

    #[cfg(feature = "lopdf-backend")]
    #[test]
    fn test_lopdf_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let result = LopdfBackend.load_pages(&path);
        assert!(matches!(result, Err(ExtractError::ExtractionFailed(_))));
    }
}
