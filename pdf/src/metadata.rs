use lopdf::Document;

/// Descriptive fields of a PDF's information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfMetadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
}

pub(crate) fn extract(doc: &Document) -> PdfMetadata {
    let mut meta = PdfMetadata::default();
    if let Ok(info_ref) = doc.trailer.get(b"Info")
        && let Ok(info_ref) = info_ref.as_reference()
        && let Ok(dict) = doc.get_dictionary(info_ref)
    {
        let field = |key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|v| v.as_str().ok())
                .map(to_clean_string)
                .filter(|s| !s.is_empty())
        };
        meta.title = field(b"Title");
        meta.author = field(b"Author");
    }
    meta
}

fn to_clean_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
