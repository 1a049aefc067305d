use crate::extractor::ExtractionError;
use std::any::Any;
use std::panic;
use std::path::Path;

/// Extracts PDF text page by page, skipping pages without text.
pub fn extract_pdf(path: &Path) -> Result<String, ExtractionError> {
    let owned = path.to_path_buf();

    // pdf-extract panics on some malformed documents instead of returning an error.
    let pages = panic::catch_unwind(move || pdf_extract::extract_text_by_pages(&owned))
        .map_err(|payload| ExtractionError::Panicked(panic_message(payload)))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(join_pages(pages))
}

fn join_pages(pages: Vec<String>) -> String {
    pages
        .iter()
        .map(|page| page.trim_matches('\n'))
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
