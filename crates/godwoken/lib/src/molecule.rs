//! Only the layouts the client produces are covered: little-endian unsigned integers, `Byte32`,
//! `Bytes` (a length prefixed byte vector), tables, structs and unions.
//!
//! Tables are laid out as `total_size ‖ offset * field_count ‖ fields`, with every number a
//! little-endian u32. Structs are the plain concatenation of their fields. Unions are the u32 item
//! id followed by the item.

use alloy_primitives::Bytes;

pub const NUMBER_SIZE: usize = 4;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MoleculeDecodeError {
    #[error("{type_name}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{type_name}: malformed header")]
    InvalidHeader { type_name: &'static str },
    #[error("{type_name}: expected {expected} fields, got {actual}")]
    FieldCountMismatch {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{type_name}: unknown union item id {item_id}")]
    UnknownUnionItem { type_name: &'static str, item_id: u32 },
    #[error("unknown script hash type {0}")]
    UnknownHashType(u8),
}

/// Serializes a value to its canonical molecule bytes.
pub trait MoleculeEncode {
    fn encode_molecule(&self, out: &mut Vec<u8>);

    fn molecule_bytes(&self) -> Bytes {
        let mut out = Vec::new();
        self.encode_molecule(&mut out);
        out.into()
    }
}

pub trait MoleculeDecode: Sized {
    fn decode_molecule(bytes: &[u8]) -> Result<Self, MoleculeDecodeError>;
}

pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Writes `data` as molecule `Bytes`.
pub fn write_bytes(out: &mut Vec<u8>, data: &[u8]) {
    write_u32(out, data.len() as u32);
    out.extend_from_slice(data);
}

/// Writes a table from its already encoded fields.
pub fn write_table(out: &mut Vec<u8>, fields: &[&[u8]]) {
    let header_size = NUMBER_SIZE * (fields.len() + 1);
    let total_size = header_size + fields.iter().map(|field| field.len()).sum::<usize>();

    write_u32(out, total_size as u32);
    let mut offset = header_size;
    for field in fields {
        write_u32(out, offset as u32);
        offset += field.len();
    }
    for field in fields {
        out.extend_from_slice(field);
    }
}

fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    let mut buf = [0u8; NUMBER_SIZE];
    buf.copy_from_slice(&bytes[pos..pos + NUMBER_SIZE]);
    u32::from_le_bytes(buf)
}

pub fn read_fixed<const N: usize>(
    type_name: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], MoleculeDecodeError> {
    bytes
        .try_into()
        .map_err(|_| MoleculeDecodeError::InvalidLength {
            type_name,
            expected: N,
            actual: bytes.len(),
        })
}

pub fn read_u32(type_name: &'static str, bytes: &[u8]) -> Result<u32, MoleculeDecodeError> {
    read_fixed::<4>(type_name, bytes).map(u32::from_le_bytes)
}

pub fn read_u64(type_name: &'static str, bytes: &[u8]) -> Result<u64, MoleculeDecodeError> {
    read_fixed::<8>(type_name, bytes).map(u64::from_le_bytes)
}

pub fn read_u128(type_name: &'static str, bytes: &[u8]) -> Result<u128, MoleculeDecodeError> {
    read_fixed::<16>(type_name, bytes).map(u128::from_le_bytes)
}

/// Reads molecule `Bytes` and returns the payload without its length prefix.
pub fn read_bytes<'a>(
    type_name: &'static str,
    bytes: &'a [u8],
) -> Result<&'a [u8], MoleculeDecodeError> {
    if bytes.len() < NUMBER_SIZE {
        return Err(MoleculeDecodeError::InvalidLength {
            type_name,
            expected: NUMBER_SIZE,
            actual: bytes.len(),
        });
    }
    let len = u32_at(bytes, 0) as usize;
    if bytes.len() != NUMBER_SIZE + len {
        return Err(MoleculeDecodeError::InvalidLength {
            type_name,
            expected: NUMBER_SIZE + len,
            actual: bytes.len(),
        });
    }
    Ok(&bytes[NUMBER_SIZE..])
}

/// Splits a table into its `field_count` raw fields. Tables carrying extra trailing fields are
/// rejected.
pub fn read_table<'a>(
    type_name: &'static str,
    bytes: &'a [u8],
    field_count: usize,
) -> Result<Vec<&'a [u8]>, MoleculeDecodeError> {
    if bytes.len() < NUMBER_SIZE {
        return Err(MoleculeDecodeError::InvalidLength {
            type_name,
            expected: NUMBER_SIZE,
            actual: bytes.len(),
        });
    }
    let total_size = u32_at(bytes, 0) as usize;
    if total_size != bytes.len() {
        return Err(MoleculeDecodeError::InvalidLength {
            type_name,
            expected: total_size,
            actual: bytes.len(),
        });
    }
    if field_count == 0 {
        return if total_size == NUMBER_SIZE {
            Ok(Vec::new())
        } else {
            Err(MoleculeDecodeError::InvalidHeader { type_name })
        };
    }
    if total_size < NUMBER_SIZE * 2 {
        return Err(MoleculeDecodeError::InvalidHeader { type_name });
    }

    let header_size = u32_at(bytes, NUMBER_SIZE) as usize;
    if header_size % NUMBER_SIZE != 0 || header_size < NUMBER_SIZE * 2 || header_size > total_size
    {
        return Err(MoleculeDecodeError::InvalidHeader { type_name });
    }
    let actual = header_size / NUMBER_SIZE - 1;
    if actual != field_count {
        return Err(MoleculeDecodeError::FieldCountMismatch {
            type_name,
            expected: field_count,
            actual,
        });
    }

    let mut offsets: Vec<usize> = (0..field_count)
        .map(|i| u32_at(bytes, NUMBER_SIZE * (i + 1)) as usize)
        .collect();
    offsets.push(total_size);
    if offsets.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(MoleculeDecodeError::InvalidHeader { type_name });
    }

    Ok(offsets
        .windows(2)
        .map(|pair| &bytes[pair[0]..pair[1]])
        .collect())
}

/// Splits a union into its item id and item bytes.
pub fn read_union<'a>(
    type_name: &'static str,
    bytes: &'a [u8],
) -> Result<(u32, &'a [u8]), MoleculeDecodeError> {
    if bytes.len() < NUMBER_SIZE {
        return Err(MoleculeDecodeError::InvalidLength {
            type_name,
            expected: NUMBER_SIZE,
            actual: bytes.len(),
        });
    }
    Ok((u32_at(bytes, 0), &bytes[NUMBER_SIZE..]))
}
