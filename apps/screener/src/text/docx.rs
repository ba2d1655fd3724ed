//! DOCX decoding: body paragraphs of `word/document.xml`, newline-separated.
//!
//! Paragraphs inside tables are not part of the body paragraph list and are
//! skipped. `<w:tab/>` becomes a tab, `<w:br/>` and `<w:cr/>` a newline.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::errors::DecodeError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_docx(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = String::new();
    {
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            ZipError::FileNotFound => DecodeError::MissingPart(DOCUMENT_PART),
            other => DecodeError::Archive(other),
        })?;
        part.read_to_string(&mut xml)?;
    }

    Ok(body_paragraphs(&xml)?.join("\n"))
}

/// Walks the WordprocessingML body and collects paragraph text in order.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, DecodeError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    paragraph_depth += 1;
                    // nested paragraphs (text boxes) fold into the outer one
                    if paragraph_depth == 1 && table_depth == 0 {
                        current = Some(String::new());
                    }
                }
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if paragraph_depth == 0 && table_depth == 0 => {
                    paragraphs.push(String::new());
                }
                b"w:tab" => push_char(&mut current, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut current, '\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    if paragraph_depth == 1 {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                b"w:t" => in_text_run = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(paragraph) = current.as_mut() {
        paragraph.push(c);
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    /// Wraps a raw `<w:body>` fragment into a minimal DOCX archive.
    pub fn build_docx_from_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer
            .start_file("[Content_Types].xml", options)
            .expect("start content types");
        writer
            .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
            .expect("write content types");
        writer
            .start_file("word/document.xml", options)
            .expect("start document part");
        writer.write_all(xml.as_bytes()).expect("write document part");
        writer.finish().expect("finish archive").into_inner()
    }

    /// Builds a DOCX with one body paragraph per entry.
    pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, escape(p)))
            .collect();
        build_docx_from_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{build_docx, build_docx_from_body};
    use super::*;

    #[test]
    fn test_paragraphs_joined_in_order() {
        let bytes = build_docx(&["Jane Doe", "jane@example.com", "Python & AWS"]);
        let text = extract_docx(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\njane@example.com\nPython & AWS");
    }

    #[test]
    fn test_runs_within_paragraph_concatenate() {
        let body = r#"<w:p><w:r><w:t>Data</w:t></w:r><w:r><w:tab/><w:t>Engineer</w:t></w:r></w:p>"#;
        let text = extract_docx(&build_docx_from_body(body)).unwrap();
        assert_eq!(text, "Data\tEngineer");
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let body = r#"<w:p><w:r><w:t>A</w:t></w:r></w:p><w:p/><w:p></w:p><w:p><w:r><w:t>B</w:t></w:r></w:p>"#;
        let text = extract_docx(&build_docx_from_body(body)).unwrap();
        assert_eq!(text, "A\n\n\nB");
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let body = r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#;
        let text = extract_docx(&build_docx_from_body(body)).unwrap();
        assert_eq!(text, "Before\nAfter");
    }

    #[test]
    fn test_not_a_zip_is_archive_error() {
        let err = extract_docx(b"plain text, definitely not a zip").unwrap_err();
        assert!(matches!(err, DecodeError::Archive(_)));
    }

    #[test]
    fn test_zip_without_document_part_is_missing_part() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("readme.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_docx(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::MissingPart("word/document.xml")));
    }
}
