pub mod backend;
mod error;
mod hd;
mod mnemonic;
mod types;
pub mod util;
pub mod wordlist;

pub use backend::{Backend, DefaultBackend};
pub use error::HdError;
pub use hd::{
    ChildNumber, DerivationPath, ExtendedKey, ExtendedPrivateKey, ExtendedPublicKey,
    HARDENED_OFFSET, MASTER_KEY_DOMAIN,
};
pub use mnemonic::{
    entropy_to_mnemonic, generate_mnemonic, mnemonic_to_seed, Mnemonic, DEFAULT_STRENGTH,
    PBKDF2_ROUNDS, SEED_LEN,
};
pub use types::{ChainCode, PrivateKey, PublicKey};

/// Root node of the tree for `seed`
pub fn from_seed(seed: &[u8]) -> Result<ExtendedKey, HdError> {
    ExtendedKey::from_seed(seed)
}

/// Child of `node` at `index`; indexes from `2^31` up are hardened
pub fn derive(node: &ExtendedKey, index: u32) -> Result<ExtendedKey, HdError> {
    node.derive(index)
}

/// Resolves a path such as `m/44'/0'/0'/0/1` from `node`
pub fn derive_path(node: &ExtendedKey, path: &str) -> Result<ExtendedKey, HdError> {
    node.derive_path_str(path)
}

pub fn serialize(node: &ExtendedKey) -> String {
    node.serialize()
}
