//! Document text sources and document identity.

use core::fmt;

use xxhash_rust::xxh3::xxh3_64;

/// Page-addressable text of an open document.
///
/// Page numbers are 1-based. An image-only page yields an empty string rather than an error;
/// errors are reserved for pages whose text could not be read at all.
pub trait DocumentSource: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Raw extracted text of `page_number` (1-based).
    fn page_text(&self, page_number: usize) -> crate::Result<String>;
}

impl<S: AsRef<str> + Send + Sync> DocumentSource for [S] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_text(&self, page_number: usize) -> crate::Result<String> {
        page_number
            .checked_sub(1)
            .and_then(|index| self.get(index))
            .map(|page| page.as_ref().to_owned())
            .ok_or_else(|| anyhow::anyhow!("page {page_number} is out of range (1..={})", self.len()))
    }
}

impl<S: AsRef<str> + Send + Sync> DocumentSource for Vec<S> {
    fn page_count(&self) -> usize {
        self.as_slice().page_count()
    }

    fn page_text(&self, page_number: usize) -> crate::Result<String> {
        self.as_slice().page_text(page_number)
    }
}

impl<D: DocumentSource + ?Sized> DocumentSource for &D {
    fn page_count(&self) -> usize {
        D::page_count(self)
    }

    fn page_text(&self, page_number: usize) -> crate::Result<String> {
        D::page_text(self, page_number)
    }
}

/// Identity of an open document.
///
/// The engine only compares identities; what they contain is up to the caller (a path, a
/// database key, or a content hash from [`DocumentId::from_content`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives a stable identity from the document's bytes.
    #[must_use]
    pub fn from_content(bytes: &[u8]) -> Self {
        Self(format!("{:016x}", xxh3_64(bytes)))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_based() {
        let pages = vec!["first", "second"];
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.page_text(1).unwrap(), "first");
        assert_eq!(pages.page_text(2).unwrap(), "second");
        assert!(pages.page_text(0).is_err());
        assert!(pages.page_text(3).is_err());
    }

    #[test]
    fn content_ids_are_stable() {
        let a = DocumentId::from_content(b"%PDF-1.7 hello");
        let b = DocumentId::from_content(b"%PDF-1.7 hello");
        let c = DocumentId::from_content(b"%PDF-1.7 other");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn display_and_conversions() {
        let id = DocumentId::from("report.pdf");
        assert_eq!(id.to_string(), "report.pdf");
        assert_eq!(id, DocumentId::new(String::from("report.pdf")));
        assert_eq!(id.as_ref(), "report.pdf");
    }
}
