//! # Packed Bitmap Encoding
//!
//! This module serializes binary bitmaps into the LED mask's column format.
//!
//! ## Wire Format
//!
//! Two bytes per column, columns left to right. No header, length prefix, or
//! checksum; framing belongs to the transport.
//!
//! ```text
//! column word (u16), sent little-endian:
//!
//!        high byte (sent 2nd)           low byte (sent 1st)
//!   bit  15  14  13  12  11  10 9  8    7  6  5  4  3  2  1  0
//!   row   8   9  10  11  12  13 14 15   0  1  2  3  4  5  6  7
//! ```
//!
//! | Row | Word value | Byte |
//! |-----|------------|------|
//! | 0 | 128 (0x0080) | low, bit 7 |
//! | 7 | 1 (0x0001) | low, bit 0 |
//! | 8 | 32768 (0x8000) | high, bit 7 |
//! | 15 | 256 (0x0100) | high, bit 0 |
//!
//! ## Row Count
//!
//! A word holds 16 rows. The packer is configured with the pipeline's row
//! count and requires every column to carry exactly that many rows; with the
//! default 12-row mask, rows 12–15 of every word stay zero.
//!
//! ## Example
//!
//! ```
//! use ledmask::protocol::bitmap;
//! use ledmask::render::threshold::Bitmap;
//!
//! let mut column = vec![false; 16];
//! column[0] = true;
//! column[8] = true;
//!
//! let packed = bitmap::pack(&Bitmap::from_columns(vec![column]), 16).unwrap();
//! assert_eq!(packed.as_bytes(), &[0x80, 0x80]);
//! ```

use serde::Serialize;

use crate::error::{MaskError, Result};
use crate::mask::PACKED_ROWS;
use crate::render::threshold::Bitmap;

/// Bytes per packed column
pub const BYTES_PER_COLUMN: usize = 2;

/// Packed bitmap bytes, two per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackedBitmap(Vec<u8>);

impl PackedBitmap {
    #[inline]
    pub fn columns(&self) -> usize {
        self.0.len() / BYTES_PER_COLUMN
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Column words in order
    pub fn words(&self) -> impl Iterator<Item = u16> + '_ {
        self.0
            .chunks_exact(BYTES_PER_COLUMN)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }
}

/// Word bit for a row: rows 0–7 fill bits 7..0, rows 8–15 fill bits 15..8.
#[inline]
pub fn row_bit(row: usize) -> u16 {
    debug_assert!(row < PACKED_ROWS as usize);
    if row < 8 {
        1 << (7 - row)
    } else {
        1 << (23 - row)
    }
}

fn check_rows(rows: u32) -> Result<()> {
    if rows == 0 {
        return Err(MaskError::Encoding("columns must have at least one row".to_string()));
    }
    if rows > PACKED_ROWS {
        return Err(MaskError::Encoding(format!(
            "{} rows do not fit a {}-bit column word",
            rows, PACKED_ROWS
        )));
    }
    Ok(())
}

/// Pack one column into its word.
pub fn pack_column(column: &[bool]) -> u16 {
    column
        .iter()
        .take(PACKED_ROWS as usize)
        .enumerate()
        .filter(|&(_, &on)| on)
        .fold(0u16, |word, (row, _)| word | row_bit(row))
}

/// Pack a bitmap whose columns each carry exactly `rows` rows.
///
/// Any column of a different length is an [`MaskError::Encoding`] error.
pub fn pack(bitmap: &Bitmap, rows: u32) -> Result<PackedBitmap> {
    check_rows(rows)?;

    let mut data = Vec::with_capacity(bitmap.width() * BYTES_PER_COLUMN);
    for (x, column) in bitmap.columns().iter().enumerate() {
        if column.len() != rows as usize {
            return Err(MaskError::Encoding(format!(
                "column {} has {} rows, expected {}",
                x,
                column.len(),
                rows
            )));
        }
        data.extend_from_slice(&pack_column(column).to_le_bytes());
    }

    log::trace!("packed {} columns into {} bytes", bitmap.width(), data.len());
    Ok(PackedBitmap(data))
}

/// Decode packed bytes back into a bitmap with `rows` rows per column.
pub fn unpack(data: &[u8], rows: u32) -> Result<Bitmap> {
    check_rows(rows)?;
    if data.len() % BYTES_PER_COLUMN != 0 {
        return Err(MaskError::Encoding(format!(
            "packed bitmap has odd length {}",
            data.len()
        )));
    }

    let columns = data
        .chunks_exact(BYTES_PER_COLUMN)
        .map(|pair| {
            let word = u16::from_le_bytes([pair[0], pair[1]]);
            (0..rows as usize)
                .map(|row| word & row_bit(row) != 0)
                .collect()
        })
        .collect();

    Ok(Bitmap::from_columns(columns))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn column_with(rows: usize, lit: &[usize]) -> Vec<bool> {
        (0..rows).map(|r| lit.contains(&r)).collect()
    }

    #[test]
    fn test_row_bits() {
        assert_eq!(row_bit(0), 128);
        assert_eq!(row_bit(7), 1);
        assert_eq!(row_bit(8), 32768);
        assert_eq!(row_bit(15), 256);
        // All 16 rows map to distinct bits
        let all = (0..16).fold(0u16, |acc, r| {
            assert_eq!(acc & row_bit(r), 0);
            acc | row_bit(r)
        });
        assert_eq!(all, 0xFFFF);
    }

    #[test]
    fn test_row_0_and_8() {
        let bitmap = Bitmap::from_columns(vec![column_with(16, &[0, 8])]);
        let packed = pack(&bitmap, 16).unwrap();
        assert_eq!(packed.as_bytes(), &[0x80, 0x80]);
    }

    #[test]
    fn test_little_endian_order() {
        // Row 7 is the low byte's bit 0, row 15 the high byte's bit 0
        let bitmap = Bitmap::from_columns(vec![column_with(16, &[7]), column_with(16, &[15])]);
        let packed = pack(&bitmap, 16).unwrap();
        assert_eq!(packed.as_bytes(), &[0x01, 0x00, 0x00, 0x01]);
        assert_eq!(packed.words().collect::<Vec<_>>(), vec![1, 256]);
    }

    #[test]
    fn test_twelve_rows_leave_high_bits_clear() {
        let bitmap = Bitmap::from_columns(vec![vec![true; 12]]);
        let packed = pack(&bitmap, 12).unwrap();
        // Rows 0-7 fill the low byte, rows 8-11 the top nibble of the high byte
        assert_eq!(packed.as_bytes(), &[0xFF, 0xF0]);
    }

    #[test]
    fn test_wrong_column_length_is_fatal() {
        let bitmap = Bitmap::from_columns(vec![vec![false; 12], vec![false; 11]]);
        let err = pack(&bitmap, 12).unwrap_err();
        assert!(matches!(err, MaskError::Encoding(_)));
        assert!(err.to_string().contains("column 1"));
    }

    #[test]
    fn test_too_many_rows() {
        let bitmap = Bitmap::from_columns(vec![vec![false; 17]]);
        assert!(matches!(pack(&bitmap, 17), Err(MaskError::Encoding(_))));
    }

    #[test]
    fn test_zero_rows() {
        let bitmap = Bitmap::from_columns(vec![Vec::new(), Vec::new()]);
        assert!(matches!(pack(&bitmap, 0), Err(MaskError::Encoding(_))));
        assert!(matches!(unpack(&[0, 0], 0), Err(MaskError::Encoding(_))));
    }

    #[test]
    fn test_empty_bitmap() {
        let packed = pack(&Bitmap::default(), 12).unwrap();
        assert!(packed.is_empty());
        assert_eq!(packed.columns(), 0);
    }

    #[test]
    fn test_length_is_two_per_column() {
        let bitmap = Bitmap::from_columns(vec![vec![false; 12]; 40]);
        let packed = pack(&bitmap, 12).unwrap();
        assert_eq!(packed.as_bytes().len(), 80);
        assert_eq!(packed.columns(), 40);
    }

    #[test]
    fn test_unpack_round_trip() {
        let columns: Vec<Vec<bool>> = (0..16)
            .map(|x| (0..16).map(|y| (x * 7 + y * 3) % 5 == 0).collect())
            .collect();
        let bitmap = Bitmap::from_columns(columns);
        let packed = pack(&bitmap, 16).unwrap();
        assert_eq!(unpack(packed.as_bytes(), 16).unwrap(), bitmap);
    }

    #[test]
    fn test_unpack_rejects_odd_length() {
        assert!(matches!(unpack(&[0x80], 12), Err(MaskError::Encoding(_))));
    }

    #[test]
    fn test_unpack_twelve_rows_ignores_high_nibble() {
        let bitmap = unpack(&[0x00, 0x0F], 12).unwrap();
        assert_eq!(bitmap.width(), 1);
        assert_eq!(bitmap.lit_count(), 0);
    }
}
