use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HdError {
    #[error("invalid entropy: expected 16 to 32 bytes in steps of 4, got {0}")]
    InvalidEntropy(usize),
    #[error("invalid strength: {0} bits is not a multiple of 32")]
    InvalidStrength(usize),
    #[error("invalid seed: private key not in range [1, n)")]
    InvalidSeed,
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),
    #[error("missing private key for hardened child key")]
    MissingPrivateKey,
    #[error("point is not on the curve")]
    InvalidPoint,
    #[error("private key not in range [1, n)")]
    InvalidPrivateKey,
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("invalid serialized key: {0}")]
    InvalidEncoding(String),
    #[error("child index space exhausted while skipping invalid keys")]
    IndexOverflow,
    #[error("keyed hash error: {0}")]
    KeyedHash(String),
}

impl From<hmac::digest::InvalidLength> for HdError {
    fn from(_: hmac::digest::InvalidLength) -> Self {
        HdError::KeyedHash("invalid HMAC key length".into())
    }
}

impl From<bs58::decode::Error> for HdError {
    fn from(err: bs58::decode::Error) -> Self {
        HdError::InvalidEncoding(err.to_string())
    }
}
