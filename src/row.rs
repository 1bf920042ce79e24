use std::fmt;

use crate::{EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE};

/// One record of the hard-coded `(id, username, email)` schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Encodes the row into a fresh fixed-width block.
    pub fn encode(&self) -> [u8; ROW_SIZE] {
        let mut block = [0u8; ROW_SIZE];
        self.encode_into(&mut block);
        block
    }

    /// Writes the row at fixed offsets into `dst`, which must be exactly `ROW_SIZE` bytes.
    ///
    /// Text shorter than its column is zero-padded. Text longer than its column
    /// is cut at the column bound; callers reject such rows before they get here.
    pub fn encode_into(&self, dst: &mut [u8]) {
        assert_eq!(dst.len(), ROW_SIZE, "row slot must be {ROW_SIZE} bytes");

        dst[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_text(
            &mut dst[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
            &self.username,
        );
        write_text(&mut dst[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE], &self.email);
    }

    /// Rebuilds a row from a block produced by [`Row::encode_into`].
    pub fn decode(src: &[u8]) -> Self {
        assert_eq!(src.len(), ROW_SIZE, "row slot must be {ROW_SIZE} bytes");

        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&src[ID_OFFSET..ID_OFFSET + ID_SIZE]);

        Self {
            id: u32::from_le_bytes(id),
            username: read_text(&src[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]),
            email: read_text(&src[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn write_text(field: &mut [u8], text: &str) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(field.len());
    field[..len].copy_from_slice(&bytes[..len]);
    field[len..].fill(0);
}

// A full-width field carries no terminator.
fn read_text(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
