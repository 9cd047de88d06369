//! Helper for computing and verifying section checksums.

use crc::{CRC_32_MPEG_2, Crc};

use crate::error::DecodeError;

const CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// Size of the checksum trailing every section.
pub const CHECKSUM_SIZE: usize = 4;

/// Compute the CRC-32/MPEG-2 checksum of a slice of bytes.
pub fn compute_crc(r: &[u8]) -> u32 {
    CRC.checksum(r)
}

/// Verify a section's trailing checksum against the bytes preceding it.
///
/// `r` must hold the whole section, checksum included.
pub fn verify(r: &[u8]) -> Result<(), DecodeError> {
    let Some(split) = r.len().checked_sub(CHECKSUM_SIZE) else {
        Err(DecodeError::TruncatedHeader {
            length: r.len(),
            required: CHECKSUM_SIZE,
        })?
    };

    let (covered, trailer) = r.split_at(split);
    let mut found = [0; CHECKSUM_SIZE];
    found.copy_from_slice(trailer);

    let found = u32::from_be_bytes(found);
    let calculated = compute_crc(covered);

    if found != calculated {
        Err(DecodeError::ChecksumMismatch { found, calculated })?;
    }

    Ok(())
}
