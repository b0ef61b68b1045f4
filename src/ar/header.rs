//! Member header codec.
//!
//! Every member is preceded by a fixed 60-byte ASCII record:
//!
//! | Field  | Offset | Width | Encoding                       |
//! |--------|--------|-------|--------------------------------|
//! | name   | 0      | 16    | raw bytes, space padded        |
//! | mtime  | 16     | 12    | decimal                        |
//! | uid    | 28     | 6     | decimal, always `0`            |
//! | gid    | 34     | 6     | decimal, always `0`            |
//! | mode   | 40     | 8     | `100` followed by octal digits |
//! | size   | 48     | 10    | decimal                        |
//! | end    | 58     | 2     | `` `\n ``                      |
//!
//! Unused bytes are ASCII spaces.

use crate::error::{ArError, Result};

/// Archive signature at the start of every archive
pub const SIGNATURE: &[u8; 8] = b"!<arch>\n";

/// Size of an encoded member header
pub const HEADER_SIZE: usize = 60;

/// Byte written after odd-length content
pub const PAD: &[u8] = b"\n";

const TERMINATOR: &[u8] = b"`\n";
const ZERO: &[u8] = b"0";
const FILL: u8 = b' ';

/// Padding that follows `size` bytes of member content.
///
/// Content always ends on an even offset relative to the first header.
pub fn padding(size: u64) -> &'static [u8] {
    if size % 2 == 1 { PAD } else { &[] }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Text,
    Decimal,
    Octal { prefix: &'static [u8] },
    Literal,
}

#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    offset: usize,
    width: usize,
    kind: FieldKind,
}

impl Field {
    const fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }
}

const NAME: Field = Field {
    name: "name",
    offset: 0,
    width: 16,
    kind: FieldKind::Text,
};
const MTIME: Field = Field {
    name: "mtime",
    offset: 16,
    width: 12,
    kind: FieldKind::Decimal,
};
const UID: Field = Field {
    name: "uid",
    offset: 28,
    width: 6,
    kind: FieldKind::Literal,
};
const GID: Field = Field {
    name: "gid",
    offset: 34,
    width: 6,
    kind: FieldKind::Literal,
};
const MODE: Field = Field {
    name: "mode",
    offset: 40,
    width: 8,
    kind: FieldKind::Octal { prefix: b"100" },
};
const SIZE: Field = Field {
    name: "size",
    offset: 48,
    width: 10,
    kind: FieldKind::Decimal,
};
const END: Field = Field {
    name: "end",
    offset: 58,
    width: 2,
    kind: FieldKind::Literal,
};

#[derive(Debug, Clone, Copy)]
enum Value<'a> {
    Bytes(&'a [u8]),
    Int(i64),
}

/// Metadata record of one archive member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    name: String,
    mtime: i64,
    mode: u32,
    size: u64,
}

impl Header {
    pub fn new(name: impl Into<String>, mtime: i64, mode: u32, size: u64) -> Self {
        Self {
            name: name.into(),
            mtime,
            mode,
            size,
        }
    }

    /// Member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modification time in seconds since the Unix epoch
    pub fn mtime(&self) -> i64 {
        self.mtime
    }

    /// Permission bits
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Exact content length, excluding padding
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Encode into the fixed 60-byte record.
    ///
    /// # Errors
    ///
    /// `TooLongValue` when a field does not fit its slot, `UnsupportedValue`
    /// for names that could not be decoded back to the same value.
    pub fn encode(&self) -> Result<[u8; HEADER_SIZE]> {
        validate_name(self.name.as_bytes())?;
        let size = i64::try_from(self.size).map_err(|_| ArError::TooLongValue {
            field: SIZE.name,
            len: self.size.to_string().len(),
            max: SIZE.width,
        })?;

        let mut buf = [FILL; HEADER_SIZE];
        put(&mut buf, NAME, Value::Bytes(self.name.as_bytes()))?;
        put(&mut buf, MTIME, Value::Int(self.mtime))?;
        put(&mut buf, UID, Value::Bytes(ZERO))?;
        put(&mut buf, GID, Value::Bytes(ZERO))?;
        put(&mut buf, MODE, Value::Int(i64::from(self.mode)))?;
        put(&mut buf, SIZE, Value::Int(size))?;
        put(&mut buf, END, Value::Bytes(TERMINATOR))?;
        Ok(buf)
    }

    /// Decode a 60-byte record.
    ///
    /// Trailing spaces are trimmed from every field, and trailing `/` from
    /// the name so GNU-style names are accepted. Owner, group and the
    /// terminator are not inspected.
    ///
    /// # Errors
    ///
    /// `InvalidParseValue` when the input is not exactly 60 bytes or a
    /// field does not parse.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let buf: &[u8; HEADER_SIZE] = data
            .try_into()
            .map_err(|_| ArError::parse("header", data))?;

        let raw_name = text(buf, NAME)?;
        let name = std::str::from_utf8(raw_name)
            .map_err(|_| ArError::parse(NAME.name, raw_name))?
            .to_owned();

        let mode = u32::try_from(int(buf, MODE)?)
            .map_err(|_| ArError::parse(MODE.name, &buf[MODE.range()]))?;
        let size = u64::try_from(int(buf, SIZE)?)
            .map_err(|_| ArError::parse(SIZE.name, &buf[SIZE.range()]))?;

        Ok(Self {
            name,
            mtime: int(buf, MTIME)?,
            mode,
            size,
        })
    }
}

fn validate_name(name: &[u8]) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains(&b'/') {
        "name contains '/'"
    } else if name.ends_with(b" ") {
        "name ends with a space"
    } else {
        return Ok(());
    };
    Err(ArError::UnsupportedValue {
        field: NAME.name,
        reason,
    })
}

fn put(buf: &mut [u8; HEADER_SIZE], field: Field, value: Value<'_>) -> Result<()> {
    let data = match (field.kind, value) {
        (FieldKind::Text | FieldKind::Literal, Value::Bytes(bytes)) => bytes.to_vec(),
        (FieldKind::Decimal, Value::Int(n)) => n.to_string().into_bytes(),
        (FieldKind::Octal { prefix }, Value::Int(n)) if n >= 0 => {
            let mut data = prefix.to_vec();
            data.extend_from_slice(format!("{n:o}").as_bytes());
            data
        }
        _ => {
            return Err(ArError::UnsupportedValue {
                field: field.name,
                reason: "value does not match field kind",
            });
        }
    };

    if data.len() > field.width {
        return Err(ArError::TooLongValue {
            field: field.name,
            len: data.len(),
            max: field.width,
        });
    }
    buf[field.offset..field.offset + data.len()].copy_from_slice(&data);
    Ok(())
}

fn text(buf: &[u8; HEADER_SIZE], field: Field) -> Result<&[u8]> {
    let FieldKind::Text = field.kind else {
        return Err(ArError::parse(field.name, &buf[field.range()]));
    };
    let raw = &buf[field.range()];
    let end = raw
        .iter()
        .rposition(|&b| b != FILL && b != b'/')
        .map_or(0, |i| i + 1);
    Ok(&raw[..end])
}

fn int(buf: &[u8; HEADER_SIZE], field: Field) -> Result<i64> {
    let raw = &buf[field.range()];
    let (digits, radix) = match field.kind {
        FieldKind::Decimal => (trim_end(raw), 10),
        FieldKind::Octal { prefix } => {
            let trimmed = trim_end(raw);
            (trimmed.strip_prefix(prefix).unwrap_or(trimmed), 8)
        }
        FieldKind::Text | FieldKind::Literal => return Err(ArError::parse(field.name, raw)),
    };

    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| i64::from_str_radix(s, radix).ok())
        .ok_or_else(|| ArError::parse(field.name, raw))
}

fn trim_end(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|&b| b != FILL).map_or(0, |i| i + 1);
    &raw[..end]
}
