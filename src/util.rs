use sha2::{Digest, Sha256};

/// Expands bytes into bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect()
}

/// Packs bits back into bytes, most significant bit first. A trailing partial byte is
/// zero-padded on the right.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
        })
        .collect()
}

/// Leading `len * 8 / 32` bits of `SHA-256(entropy)`.
pub fn checksum_bits(entropy: &[u8]) -> Vec<bool> {
    let hash = Sha256::digest(entropy);
    let mut bits = bytes_to_bits(&hash);
    bits.truncate(entropy.len() * 8 / 32);
    bits
}

/// Splits `bits` into `width`-bit big-endian integers. The last chunk may be short.
pub fn bits_to_indices(bits: &[bool], width: usize) -> Vec<usize> {
    bits.chunks(width)
        .map(|chunk| chunk.iter().fold(0usize, |acc, &bit| (acc << 1) | bit as usize))
        .collect()
}

/// Inverse of [`bits_to_indices`] for full-width chunks.
pub fn indices_to_bits(indices: &[usize], width: usize) -> Vec<bool> {
    indices
        .iter()
        .flat_map(|&index| (0..width).rev().map(move |shift| (index >> shift) & 1 == 1))
        .collect()
}

pub(crate) fn split_digest(digest: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&digest[..32]);
    right.copy_from_slice(&digest[32..]);
    (left, right)
}

pub(crate) fn ser32(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}
