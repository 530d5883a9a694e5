//! Immutable, shareable byte values

use std::fmt;
use std::sync::Arc;

/// An immutable view of cached bytes.
///
/// Cloning a `ByteView` shares the underlying buffer, so the store and every
/// reader hold the same allocation. The contents never change after
/// construction: [`as_bytes`](Self::as_bytes) only lends the buffer out
/// read-only, and the owning accessors ([`to_vec`](Self::to_vec),
/// [`to_text`](Self::to_text)) hand back independent copies.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteView {
    bytes: Arc<[u8]>,
}

impl ByteView {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Empty view
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of bytes in the view
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the contents without copying
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy the contents into a new, independently mutable buffer
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Copy the contents into a `String`
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// True when both views share one allocation
    pub fn ptr_eq(&self, other: &ByteView) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl Default for ByteView {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("len", &self.len())
            .field("text", &String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteView {
    fn from(text: String) -> Self {
        Self::new(text.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl PartialEq<[u8]> for ByteView {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for ByteView {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<str> for ByteView {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteView {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
