//! PDF document information.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_bounded, ExtractionLimits, FileAccessError};

/// Document information dictionary plus container facts of one PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Raw `D:YYYYMMDDHHmmSS` string
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub encrypted: bool,
    pub page_count: usize,
    /// Set when the container could not be parsed; the other fields are then
    /// best effort.
    pub parse_error: Option<String>,
}

impl PdfMetadata {
    /// Read a PDF from disk. Only I/O failures are errors; parse failures
    /// land in `parse_error`.
    pub fn from_path(path: impl AsRef<Path>, limits: &ExtractionLimits) -> Result<Self, FileAccessError> {
        let path = path.as_ref();
        let bytes = read_bounded(path, limits.max_file_bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "reading pdf metadata");
        Ok(Self::from_bytes(&bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let declares_encryption = bytes.windows(8).any(|w| w == b"/Encrypt");

        let doc = match Document::load_mem(bytes) {
            Ok(doc) => doc,
            Err(e) => {
                return Self {
                    encrypted: declares_encryption,
                    parse_error: Some(e.to_string()),
                    ..Self::default()
                }
            }
        };

        let mut meta = Self {
            encrypted: declares_encryption || doc.trailer.get(b"Encrypt").is_ok(),
            page_count: doc.get_pages().len(),
            ..Self::default()
        };

        if let Some(info) = info_dictionary(&doc) {
            meta.title = text_entry(info, b"Title");
            meta.author = text_entry(info, b"Author");
            meta.subject = text_entry(info, b"Subject");
            meta.creator = text_entry(info, b"Creator");
            meta.producer = text_entry(info, b"Producer");
            meta.creation_date = text_entry(info, b"CreationDate");
            meta.modification_date = text_entry(info, b"ModDate");
        }
        meta
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn text_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let text = match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_text(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        _ => return None,
    };
    let text = text.trim_end_matches('\0').trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// UTF-16BE when prefixed with a byte-order mark, else single-byte text.
fn decode_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::dictionary;

    /// One-page PDF with the given info entries.
    pub(crate) fn sample_pdf(info: &[(&str, &str)]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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
        let mut info_dict = Dictionary::new();
        for (key, value) in info {
            info_dict.set(key.as_bytes().to_vec(), Object::string_literal(*value));
        }
        let info_id = doc.add_object(info_dict);
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_reads_info_dictionary() {
        let bytes = sample_pdf(&[
            ("Title", "Damage act"),
            ("Producer", "Adobe Photoshop 24.0"),
            ("CreationDate", "D:20230501100000"),
            ("ModDate", "D:20230502100000"),
        ]);
        let meta = PdfMetadata::from_bytes(&bytes);
        assert_eq!(meta.parse_error, None);
        assert_eq!(meta.title.as_deref(), Some("Damage act"));
        assert_eq!(meta.producer.as_deref(), Some("Adobe Photoshop 24.0"));
        assert_eq!(meta.creation_date.as_deref(), Some("D:20230501100000"));
        assert_eq!(meta.modification_date.as_deref(), Some("D:20230502100000"));
        assert_eq!(meta.page_count, 1);
        assert!(!meta.encrypted);
    }

    #[test]
    fn test_garbage_sets_parse_error() {
        let meta = PdfMetadata::from_bytes(b"%PDF-1.4 truncated");
        assert!(meta.parse_error.is_some());
        assert_eq!(meta.page_count, 0);
    }

    #[test]
    fn test_encrypt_marker_detected_without_parse() {
        let meta = PdfMetadata::from_bytes(b"%PDF-1.4 trailer << /Encrypt 5 0 R >>");
        assert!(meta.encrypted);
    }

    #[test]
    fn test_utf16_text() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x04, 0x10];
        assert_eq!(decode_text(&bytes), "AА");
    }
}
