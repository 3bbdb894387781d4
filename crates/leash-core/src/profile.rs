//! Profile store: the four owner/identity text fields exposed over the
//! attribute surface and mirrored into the discovery payload.
//!
//! Fields live in bounded, capacity-checked containers so an over-length
//! write is rejected by construction rather than by scattered bounds
//! arithmetic. Authorization is enforced by the state container wrapper;
//! this module only owns storage and bounds.

use crate::error::{LeashError, Result};

/// Maximum length of a profile field in bytes.
pub const MAX_FIELD_LEN: usize = 20;

/// A text buffer with a fixed byte capacity.
///
/// Chunked attribute writes land at arbitrary offsets within the capacity;
/// each chunk terminates the field at `offset + len`, mirroring the
/// terminator semantics of the attribute protocol. Bytes between the old
/// terminator and a forward offset keep their previous contents, exactly
/// as a raw buffer would.
#[derive(Debug, Clone)]
pub struct BoundedText<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> BoundedText<N> {
    /// Create an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    /// Create a buffer preloaded with `text`, truncated to capacity.
    ///
    /// Only used for configured defaults; peer-supplied data goes through
    /// the checked [`Self::write_at`].
    #[must_use]
    pub fn preset(text: &str) -> Self {
        let mut this = Self::new();
        let len = text.len().min(N);
        this.buf[..len].copy_from_slice(&text.as_bytes()[..len]);
        this.len = len;
        this
    }

    /// Write `bytes` at `offset` and terminate the text at `offset + len`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` when the chunk would exceed the capacity; the
    /// buffer is left untouched.
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset.saturating_add(bytes.len());
        if end > N {
            return Err(LeashError::OutOfRange {
                offset,
                len: bytes.len(),
                capacity: N,
            });
        }
        self.buf[offset..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    /// Current text as bytes, up to the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Current text, with any non-UTF-8 bytes replaced.
    #[must_use]
    pub fn display(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Current length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for BoundedText<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The four identity/owner fields carried by the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// The pet's name.
    PetName,
    /// The owner's name.
    OwnerName,
    /// The owner's address.
    OwnerAddress,
    /// The owner's phone number.
    OwnerPhone,
}

impl ProfileField {
    /// All fields in discovery-payload order.
    pub const ALL: [Self; 4] = [
        Self::PetName,
        Self::OwnerName,
        Self::OwnerAddress,
        Self::OwnerPhone,
    ];

    /// Fixed label prefixed to the field in the discovery payload.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PetName => "Pet Name: ",
            Self::OwnerName => "Owner Name: ",
            Self::OwnerAddress => "Owner Address: ",
            Self::OwnerPhone => "Owner Phone: ",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::PetName => 0,
            Self::OwnerName => 1,
            Self::OwnerAddress => 2,
            Self::OwnerPhone => 3,
        }
    }
}

/// Owns the four profile fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    fields: [BoundedText<MAX_FIELD_LEN>; 4],
}

impl ProfileStore {
    /// Create a store with the given initial field contents.
    #[must_use]
    pub fn new(pet_name: &str, owner_name: &str, owner_address: &str, owner_phone: &str) -> Self {
        Self {
            fields: [
                BoundedText::preset(pet_name),
                BoundedText::preset(owner_name),
                BoundedText::preset(owner_address),
                BoundedText::preset(owner_phone),
            ],
        }
    }

    /// Apply one chunk of an attribute write to `field`.
    ///
    /// Each chunk is applied immediately; no atomicity across chunks.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` when `offset + bytes.len()` exceeds the field
    /// capacity.
    pub fn write(&mut self, field: ProfileField, offset: usize, bytes: &[u8]) -> Result<()> {
        self.fields[field.index()].write_at(offset, bytes)
    }

    /// Read a field. Unrestricted, always available.
    #[must_use]
    pub fn read(&self, field: ProfileField) -> &[u8] {
        self.fields[field.index()].as_bytes()
    }

    /// Field text for display and payload encoding.
    #[must_use]
    pub fn display(&self, field: ProfileField) -> std::borrow::Cow<'_, str> {
        self.fields[field.index()].display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_truncates_to_capacity() {
        let text: BoundedText<4> = BoundedText::preset("overflow");
        assert_eq!(text.as_bytes(), b"over");
    }

    #[test]
    fn test_write_at_zero_replaces() {
        let mut text: BoundedText<MAX_FIELD_LEN> = BoundedText::preset("old value here");
        text.write_at(0, b"new").unwrap();
        assert_eq!(text.as_bytes(), b"new");
    }

    #[test]
    fn test_chunked_write_continues_at_offset() {
        let mut text: BoundedText<MAX_FIELD_LEN> = BoundedText::new();
        text.write_at(0, b"0123456789").unwrap();
        text.write_at(10, b"abcdefghij").unwrap();
        assert_eq!(text.as_bytes(), b"0123456789abcdefghij");
    }

    #[test]
    fn test_write_past_capacity_rejected_untouched() {
        let mut text: BoundedText<MAX_FIELD_LEN> = BoundedText::preset("keep");
        let err = text.write_at(16, b"12345").unwrap_err();
        assert!(matches!(
            err,
            LeashError::OutOfRange {
                offset: 16,
                len: 5,
                capacity: MAX_FIELD_LEN
            }
        ));
        assert_eq!(text.as_bytes(), b"keep");
    }

    #[test]
    fn test_write_exactly_to_capacity() {
        let mut text: BoundedText<MAX_FIELD_LEN> = BoundedText::new();
        text.write_at(0, &[b'x'; MAX_FIELD_LEN]).unwrap();
        assert_eq!(text.len(), MAX_FIELD_LEN);
    }

    #[test]
    fn test_chunk_terminates_field() {
        let mut text: BoundedText<MAX_FIELD_LEN> = BoundedText::preset("a long initial value");
        text.write_at(0, b"short").unwrap();
        // The terminator moves back; trailing old content is gone.
        assert_eq!(text.as_bytes(), b"short");
    }

    #[test]
    fn test_store_reads_are_unrestricted() {
        let store = ProfileStore::new("rex", "jo", "1 main st", "555-0100");
        assert_eq!(store.read(ProfileField::PetName), b"rex");
        assert_eq!(store.read(ProfileField::OwnerPhone), b"555-0100");
    }

    #[test]
    fn test_store_write_targets_one_field() {
        let mut store = ProfileStore::new("rex", "jo", "1 main st", "555-0100");
        store.write(ProfileField::OwnerName, 0, b"sam").unwrap();
        assert_eq!(store.read(ProfileField::OwnerName), b"sam");
        assert_eq!(store.read(ProfileField::PetName), b"rex");
    }

    #[test]
    fn test_labels_match_payload_prefixes() {
        assert_eq!(ProfileField::PetName.label(), "Pet Name: ");
        assert_eq!(ProfileField::OwnerPhone.label(), "Owner Phone: ");
    }
}
