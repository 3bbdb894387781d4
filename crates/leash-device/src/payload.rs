//! Discovery payload encoding.
//!
//! Renders the four profile fields, each prefixed with its fixed label,
//! into the byte payload handed to the tag emulator. Rebuilt after every
//! successful profile write and once at startup; record framing beyond the
//! labeled lines (NDEF wrapping, language codes) is the emulator's concern.

use leash_core::{ProfileField, TagState};

/// Encode the current profile fields into a passive-read payload.
#[must_use]
pub fn encode(state: &TagState) -> Vec<u8> {
    let mut payload = Vec::new();
    for field in ProfileField::ALL {
        payload.extend_from_slice(field.label().as_bytes());
        payload.extend_from_slice(state.profile_text(field).as_bytes());
        payload.push(b'\n');
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use leash_core::{Attribute, Event, SessionHandle, TagConfig};

    #[test]
    fn test_encode_labels_all_fields() {
        let state = TagState::new(&TagConfig::default());
        let payload = String::from_utf8(encode(&state)).unwrap();

        assert!(payload.contains("Pet Name: pet name\n"));
        assert!(payload.contains("Owner Name: owner name\n"));
        assert!(payload.contains("Owner Address: owner address\n"));
        assert!(payload.contains("Owner Phone: owner phone\n"));
    }

    #[test]
    fn test_encode_reflects_profile_writes() {
        let mut state = TagState::new(&TagConfig::default());
        state
            .apply(Event::Connected {
                handle: SessionHandle(1),
            })
            .unwrap();
        state
            .apply(Event::AttributeWrite {
                attribute: Attribute::Credential,
                offset: 0,
                data: b"hello".to_vec(),
            })
            .unwrap();
        state
            .apply(Event::AttributeWrite {
                attribute: Attribute::Profile(ProfileField::PetName),
                offset: 0,
                data: b"rex".to_vec(),
            })
            .unwrap();

        let payload = String::from_utf8(encode(&state)).unwrap();
        assert!(payload.starts_with("Pet Name: rex\n"));
    }
}
