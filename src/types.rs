use std::fmt;

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Chain code of an extended key
pub type ChainCode = [u8; 32];

/// A 32-byte big-endian scalar in `[1, n)`. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Callers must have checked the scalar against the curve order.
    pub(crate) fn from_validated(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A compressed (33-byte SEC1) curve point.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 33]);

impl PublicKey {
    /// Callers must have checked that the point is on the curve.
    pub(crate) fn from_validated(bytes: [u8; 33]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 33] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// HASH160 of the compressed key, the BIP32 key identifier
    pub fn identifier(&self) -> [u8; 20] {
        let sha = Sha256::digest(self.0);
        let mut out = [0u8; 20];
        out.copy_from_slice(&Ripemd160::digest(sha));
        out
    }

    /// First 4 bytes of [`identifier`](Self::identifier)
    pub fn fingerprint(&self) -> [u8; 4] {
        let id = self.identifier();
        [id[0], id[1], id[2], id[3]]
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn private_key_debug_is_redacted() {
        let key = PrivateKey::from_validated([7u8; 32]);
        assert_eq!(format!("{key:?}"), "PrivateKey(..)");
        assert_eq!(key.to_hex(), "07".repeat(32));
    }

    #[test]
    fn bip32_vector_1_master_fingerprint() {
        let key = PublicKey::from_validated(hex!(
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2"
        ));
        assert_eq!(
            hex::encode(key.identifier()),
            "3442193e1bb70916e914552172cd4e2dbc9df811"
        );
        assert_eq!(key.fingerprint(), hex!("3442193e"));
    }

    #[test]
    fn public_key_display_is_hex() {
        let bytes = hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        let key = PublicKey::from_validated(bytes);
        assert_eq!(key.to_string(), hex::encode(bytes));
        assert_eq!(key.to_bytes(), bytes);
    }
}
