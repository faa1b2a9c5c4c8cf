use std::error::Error;

use log::info;
use lopdf::Document;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/* US letter */
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const FONT_SIZE_PT: f32 = 11.0;

/// Extract text from an uploaded PDF, page by page, concatenated in page
/// order. Corrupt or encrypted input surfaces whatever `lopdf` raises.
pub fn read_pdf(bytes: &[u8]) -> Result<String, Box<dyn Error>> {
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();
    info!("Extracting text from {} page(s)", pages.len());

    let mut text = String::new();
    for page_number in pages.keys() {
        text.push_str(&document.extract_text(&[*page_number])?);
    }
    Ok(text)
}

/// Lay plain text out as a single-column paginated PDF, one paragraph row per
/// input line. Lines are passed through uninterpreted; glyphs outside the
/// builtin font's coverage may render poorly.
pub fn create_pdf(title: &str, content: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let (document, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = document.add_builtin_font(BuiltinFont::Helvetica)?;

    let mut layer = document.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
    for line in content.split('\n') {
        if y < MARGIN_MM {
            let (page, page_layer) =
                document.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = document.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        layer.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    Ok(document.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pdf_produces_a_pdf_document() {
        let bytes = create_pdf("Quiz Questions", "Q1. What?\nQ2. Why?").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn create_pdf_accepts_empty_content() {
        let bytes = create_pdf("Empty", "").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn create_pdf_paginates_long_content() {
        let many_lines = vec!["line"; 200].join("\n");
        let single = create_pdf("Short", "line").unwrap();
        let paginated = create_pdf("Long", &many_lines).unwrap();
        assert!(paginated.len() > single.len());
    }

    #[test]
    fn read_pdf_rejects_garbage_bytes() {
        assert!(read_pdf(b"this is not a pdf").is_err());
    }
}
