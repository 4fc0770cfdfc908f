//! Attached-file text extraction
//!
//! Every attached file contributes its meta card. PDFs additionally contribute
//! their body text, provided they fit in a tenth of the memory ceiling. Each
//! file is extracted in isolation: an error or panic inside the extractor is
//! logged and the remaining files are still processed.

use std::panic::{AssertUnwindSafe, catch_unwind};

use super::ContentAssembler;
use crate::content::{AttachedFile, ContentItem, MemoryCeiling};
use crate::search::errors::{SearchError, SearchResult};

impl ContentAssembler {
    /// Collect searchable text from the item's attached files.
    ///
    /// `ceiling` is raised to the configured floor before use.
    pub fn extract_file_text(&self, item: &dyn ContentItem, ceiling: MemoryCeiling) -> String {
        let Some(file_store) = &self.file_store else {
            return String::new();
        };
        let ceiling = ceiling.raised_to(self.memory_ceiling_floor);

        let mut out = String::new();
        for file in file_store.files(item) {
            push_part(&mut out, &file.meta_card);

            if !file.is_pdf() {
                continue;
            }
            if !ceiling.admits(file.size) {
                tracing::debug!(
                    item_id = %item.id(),
                    file = %file.name,
                    size = file.size,
                    budget = ceiling.extraction_budget(),
                    "Skipping PDF text extraction for oversized file"
                );
                continue;
            }

            match self.extract_pdf(&file) {
                Ok(text) => push_part(&mut out, &text),
                Err(e) => {
                    tracing::warn!(
                        item_id = %item.id(),
                        file = %file.name,
                        error = %e,
                        "PDF text extraction failed"
                    );
                }
            }
        }
        out
    }

    fn extract_pdf(&self, file: &AttachedFile) -> SearchResult<String> {
        let Some(extractor) = &self.pdf_extractor else {
            return Ok(String::new());
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| extractor.extract_text(&file.path)));
        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(SearchError::Extraction {
                file: file.name.clone(),
                message: format!("{e:#}"),
            }),
            Err(_) => Err(SearchError::Extraction {
                file: file.name.clone(),
                message: "extractor panicked".to_string(),
            }),
        }
    }
}

fn push_part(out: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(text);
}
