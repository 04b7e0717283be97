//! Consensus encoding primitives shared by the transaction types.

use std::io::{Read, Write};

use proofmarshal::ser::{SerError, SerResult};

/// The length in bytes of the CompactSize encoding of `number`.
pub fn compact_int_length(number: u64) -> usize {
    match number {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x10000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Write a Bitcoin CompactSize integer. Returns the number of bytes written.
pub fn write_compact_int<W: Write>(writer: &mut W, number: u64) -> SerResult<usize> {
    match number {
        0..=0xfc => {
            writer.write_all(&[number as u8])?;
            Ok(1)
        }
        0xfd..=0xffff => {
            writer.write_all(&[0xfd])?;
            writer.write_all(&(number as u16).to_le_bytes())?;
            Ok(3)
        }
        0x10000..=0xffff_ffff => {
            writer.write_all(&[0xfe])?;
            writer.write_all(&(number as u32).to_le_bytes())?;
            Ok(5)
        }
        _ => {
            writer.write_all(&[0xff])?;
            writer.write_all(&number.to_le_bytes())?;
            Ok(9)
        }
    }
}

/// Read a Bitcoin CompactSize integer, rejecting non-minimal encodings.
pub fn read_compact_int<R: Read>(reader: &mut R) -> SerResult<u64> {
    let mut first = [0u8; 1];
    reader.read_exact(&mut first)?;
    match first[0] {
        0xfd => {
            let mut buf = [0u8; 2];
            reader.read_exact(&mut buf)?;
            let number = u64::from(u16::from_le_bytes(buf));
            if number < 0xfd {
                return Err(SerError::OverlongVaruint);
            }
            Ok(number)
        }
        0xfe => {
            let mut buf = [0u8; 4];
            reader.read_exact(&mut buf)?;
            let number = u64::from(u32::from_le_bytes(buf));
            if number <= 0xffff {
                return Err(SerError::OverlongVaruint);
            }
            Ok(number)
        }
        0xff => {
            let mut buf = [0u8; 8];
            reader.read_exact(&mut buf)?;
            let number = u64::from_le_bytes(buf);
            if number <= 0xffff_ffff {
                return Err(SerError::OverlongVaruint);
            }
            Ok(number)
        }
        byte => Ok(u64::from(byte)),
    }
}
