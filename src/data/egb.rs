//! Binary dataset format.
//!
//! Layout (all little-endian):
//!
//! | bytes | content                                   |
//! |-------|-------------------------------------------|
//! | 8     | magic `ENCOG-00`                          |
//! | 8     | input count (`u64`)                       |
//! | 8     | ideal count (`u64`)                       |
//! | 8     | record count (`u64`)                      |
//! | ...   | `record count * (input + ideal)` `f64`s   |

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};

pub const MAGIC: &[u8; 8] = b"ENCOG-00";

/// Largest count accepted from a header before allocating.
const MAX_HEADER_COUNT: u64 = 1 << 40;

/// Values reserved up front; larger files grow as they are read.
const PREALLOCATE_LIMIT: usize = 1 << 20;

pub fn write<W: Write>(writer: &mut W, data: &Dataset) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_u64::<LittleEndian>(data.input_count() as u64)?;
    writer.write_u64::<LittleEndian>(data.ideal_count() as u64)?;
    writer.write_u64::<LittleEndian>(data.record_count() as u64)?;
    for &value in data.as_flat() {
        writer.write_f64::<LittleEndian>(value)?;
    }
    Ok(())
}

pub fn read<R: Read>(reader: &mut R) -> Result<Dataset> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(NetError::Dataset("not a binary dataset file (bad header)".into()));
    }

    let input_count = read_count(reader, "input count")?;
    let ideal_count = read_count(reader, "ideal count")?;
    let record_count = read_count(reader, "record count")?;

    let total = record_count
        .checked_mul(input_count + ideal_count)
        .ok_or_else(|| NetError::Dataset("record data size overflows".into()))?;

    let mut values = Vec::with_capacity(total.min(PREALLOCATE_LIMIT));
    for _ in 0..total {
        let value = reader.read_f64::<LittleEndian>().map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => NetError::Dataset(format!(
                "file is truncated: expected {} values, found {}",
                total,
                values.len()
            )),
            _ => NetError::Io(e),
        })?;
        values.push(value);
    }
    Dataset::from_flat(input_count, ideal_count, values)
}

pub fn save<P: AsRef<Path>>(path: P, data: &Dataset) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let mut reader = BufReader::new(File::open(path)?);
    read(&mut reader)
}

fn read_count<R: Read>(reader: &mut R, what: &str) -> Result<usize> {
    let count = reader.read_u64::<LittleEndian>()?;
    if count > MAX_HEADER_COUNT {
        return Err(NetError::Dataset(format!("{} {} is implausibly large", what, count)));
    }
    usize::try_from(count).map_err(|_| NetError::Dataset(format!("{} {} does not fit", what, count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_is_magic_then_three_counts() {
        let data = Dataset::from_flat(2, 1, vec![0.0, 1.0, 1.0]).unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &data).unwrap();
        assert_eq!(&bytes[..8], MAGIC);
        assert_eq!(bytes.len(), 8 + 3 * 8 + 3 * 8);
        assert_eq!(bytes[8], 2);
        assert_eq!(bytes[16], 1);
        assert_eq!(bytes[24], 1);
    }

    #[test]
    fn rejects_foreign_and_truncated_files() {
        let mut foreign = Cursor::new(b"NOTENCOG........................".to_vec());
        assert!(matches!(read(&mut foreign), Err(NetError::Dataset(_))));

        let data = Dataset::from_flat(2, 1, vec![0.5; 6]).unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &data).unwrap();
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(read(&mut Cursor::new(bytes)), Err(NetError::Dataset(_))));
    }

    #[test]
    fn reads_back_what_it_wrote() {
        let data = Dataset::from_flat(3, 2, (0..20).map(|i| i as f64 * 0.37 - 2.0).collect()).unwrap();
        let mut bytes = Vec::new();
        write(&mut bytes, &data).unwrap();
        let back = read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(back, data);
    }
}
