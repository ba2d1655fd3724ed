//! PDF decoding.
//!
//! `pdf-extract` handles layout-aware text for well-formed files, but it gives
//! up on the whole document when a single page is broken. When that happens
//! the document is re-read with `lopdf` one page at a time, and a page that
//! fails contributes an empty string.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::errors::DecodeError;

const PAGE_SEPARATOR: &str = "\n";

pub fn extract_pdf(bytes: &[u8]) -> Result<String, DecodeError> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) => {
            debug!(pages = pages.len(), "PDF decoded by pdf-extract");
            return Ok(pages.join(PAGE_SEPARATOR));
        }
        Ok(Err(e)) => {
            debug!(error = %e, "pdf-extract rejected document, retrying page by page");
        }
        Err(_) => {
            warn!("pdf-extract panicked, retrying page by page");
        }
    }

    extract_pages_isolated(bytes)
}

/// Reads every page independently; only an unloadable container is an error.
fn extract_pages_isolated(bytes: &[u8]) -> Result<String, DecodeError> {
    let doc = panic::catch_unwind(|| lopdf::Document::load_mem(bytes))
        .map_err(|_| DecodeError::Pdf("parser panicked while loading document".to_string()))?
        .map_err(|e| DecodeError::Pdf(e.to_string()))?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(DecodeError::Pdf("document has no pages".to_string()));
    }

    let pages: Vec<String> = page_numbers
        .iter()
        .map(|&page| {
            match panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page]))) {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!(page, error = %e, "PDF page could not be decoded");
                    String::new()
                }
                Err(_) => {
                    warn!(page, "PDF page decoder panicked");
                    String::new()
                }
            }
        })
        .collect();

    debug!(pages = pages.len(), "PDF decoded page by page");
    Ok(pages.join(PAGE_SEPARATOR))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one page per entry in `pages`, each page one text line
    /// per entry, set in Courier.
    pub fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 11.into()]),
                Operation::new("TL", vec![14.into()]),
                Operation::new("Td", vec![50.into(), 750.into()]),
            ];
            for line in lines.iter() {
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("content encodes"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let media_box: Vec<Object> = vec![0.into(), 0.into(), 612.into(), 792.into()];
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("pdf saves");
        buf
    }
}
