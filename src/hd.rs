use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::backend::{Backend, ChecksumCodec, Curve, DefaultBackend, KeyedHash512};
use crate::error::HdError;
use crate::mnemonic::Mnemonic;
use crate::types::{ChainCode, PrivateKey, PublicKey};
use crate::util::{ser32, split_digest};

/// First hardened child index, `2^31`
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// HMAC key used to turn a seed into the root node
pub const MASTER_KEY_DOMAIN: &[u8] = b"Bitcoin seed";

/// Raw length of the serialized form: key material followed by the chain code
const SERIALIZED_LEN: usize = 65;

fn is_hardened(index: u32) -> bool {
    index >= HARDENED_OFFSET
}

fn next_index(index: u32) -> Result<u32, HdError> {
    let next = index.checked_add(1).ok_or(HdError::IndexOverflow)?;
    debug!(index, next, "derived key is invalid, retrying with next index");
    Ok(next)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "u32", into = "u32")
)]
pub struct ChildNumber {
    index: u32,
    hardened: bool,
}

impl ChildNumber {
    pub fn normal(index: u32) -> Result<Self, HdError> {
        if is_hardened(index) {
            return Err(HdError::InvalidPath(format!(
                "child index {index} exceeds maximum"
            )));
        }
        Ok(Self {
            index,
            hardened: false,
        })
    }

    pub fn hardened(index: u32) -> Result<Self, HdError> {
        if is_hardened(index) {
            return Err(HdError::InvalidPath(format!(
                "hardened child index {index} exceeds maximum"
            )));
        }
        Ok(Self {
            index,
            hardened: true,
        })
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// The index as fed to derivation, with `2^31` added for hardened children
    pub fn value(&self) -> u32 {
        if self.hardened {
            self.index + HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl From<u32> for ChildNumber {
    fn from(value: u32) -> Self {
        Self {
            index: value & !HARDENED_OFFSET,
            hardened: is_hardened(value),
        }
    }
}

impl From<ChildNumber> for u32 {
    fn from(child: ChildNumber) -> Self {
        child.value()
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// A non-empty sequence of child numbers, applied left to right
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    pub fn new(path: Vec<ChildNumber>) -> Result<Self, HdError> {
        if path.is_empty() {
            return Err(HdError::InvalidPath("empty derivation path".into()));
        }
        Ok(Self(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChildNumber> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildNumber;
    type IntoIter = std::slice::Iter<'a, ChildNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.0 {
            write!(f, "/{child}")?;
        }
        Ok(())
    }
}

/// Accepts `^(m/)?(\d+'?/)*\d+'?$` with every index below `2^31`.
impl FromStr for DerivationPath {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("m/").unwrap_or(s);
        let path = body
            .split('/')
            .map(|segment| parse_child(segment, s))
            .collect::<Result<Vec<_>, _>>()?;
        DerivationPath::new(path)
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = HdError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        path.parse()
    }
}

impl From<DerivationPath> for String {
    fn from(path: DerivationPath) -> Self {
        path.to_string()
    }
}

fn parse_child(segment: &str, path: &str) -> Result<ChildNumber, HdError> {
    let (digits, hardened) = match segment.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (segment, false),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HdError::InvalidPath(format!(
            "malformed segment {segment:?} in {path:?}"
        )));
    }
    let index: u32 = digits
        .parse()
        .map_err(|_| HdError::InvalidPath(format!("index {digits} out of range in {path:?}")))?;
    if hardened {
        ChildNumber::hardened(index)
    } else {
        ChildNumber::normal(index)
    }
}

/// A node holding a private key. The public key is computed once and cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPrivateKey<B = DefaultBackend> {
    private_key: PrivateKey,
    public_key: PublicKey,
    chain_code: ChainCode,
    index: Option<u32>,
    backend: PhantomData<B>,
}

/// A public-only node. It can derive normal children only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKey<B = DefaultBackend> {
    public_key: PublicKey,
    chain_code: ChainCode,
    index: Option<u32>,
    backend: PhantomData<B>,
}

/// One node of the derivation tree, either private-key bearing or public-only
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtendedKey<B = DefaultBackend> {
    Private(ExtendedPrivateKey<B>),
    Public(ExtendedPublicKey<B>),
}

impl<B: Backend> ExtendedPrivateKey<B> {
    /// Builds a node from raw parts, rejecting scalars outside `[1, n)`
    pub fn new(
        private_key: [u8; 32],
        chain_code: ChainCode,
        index: Option<u32>,
    ) -> Result<Self, HdError> {
        if !B::Curve::is_valid_scalar(&private_key) {
            return Err(HdError::InvalidPrivateKey);
        }
        Self::from_parts(private_key, chain_code, index)
    }

    fn from_parts(
        private_key: [u8; 32],
        chain_code: ChainCode,
        index: Option<u32>,
    ) -> Result<Self, HdError> {
        let public_key =
            B::Curve::derive_public_key(&private_key).ok_or(HdError::InvalidPrivateKey)?;
        Ok(Self {
            private_key: PrivateKey::from_validated(private_key),
            public_key: PublicKey::from_validated(public_key),
            chain_code,
            index,
            backend: PhantomData,
        })
    }

    /// Root node: `HMAC-SHA512(key = "Bitcoin seed", data = seed)` split into the
    /// private key and the chain code
    pub fn from_seed(seed: &[u8]) -> Result<Self, HdError> {
        let digest = B::Hash::hmac(MASTER_KEY_DOMAIN, seed)?;
        let (left, right) = split_digest(&digest);
        if !B::Curve::is_valid_scalar(&left) {
            return Err(HdError::InvalidSeed);
        }
        Self::from_parts(left, right, None).map_err(|_| HdError::InvalidSeed)
    }

    /// Validates `phrase`, stretches it with `passphrase` and builds the root node
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self, HdError> {
        let mnemonic = Mnemonic::parse(phrase)?;
        Self::from_seed(&mnemonic.to_seed(passphrase))
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// Index used to derive this node, `None` for the root
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Derives the child at `index`; indexes from `2^31` up are hardened.
    ///
    /// If the candidate key is invalid the next index is tried, so the returned
    /// node's [`index`](Self::index) may be larger than requested.
    pub fn derive_child(&self, index: u32) -> Result<Self, HdError> {
        let mut index = index;
        loop {
            let mut data = [0u8; 37];
            if is_hardened(index) {
                data[1..33].copy_from_slice(self.private_key.as_bytes());
            } else {
                data[..33].copy_from_slice(self.public_key.as_bytes());
            }
            data[33..].copy_from_slice(&ser32(index));

            let digest = B::Hash::hmac(&self.chain_code, &data)?;
            let (left, right) = split_digest(&digest);
            if B::Curve::is_valid_scalar(&left) {
                if let Some(child) =
                    B::Curve::add_scalar_to_private_key(self.private_key.as_bytes(), &left)
                {
                    return Self::from_parts(child, right, Some(index));
                }
            }
            index = next_index(index)?;
        }
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, HdError> {
        let mut current = self.clone();
        for child in path {
            trace!(%child, "deriving private child");
            current = current.derive_child(child.value())?;
        }
        Ok(current)
    }

    /// Drops the private key, keeping public key, chain code and index
    pub fn to_extended_public_key(&self) -> ExtendedPublicKey<B> {
        ExtendedPublicKey {
            public_key: self.public_key,
            chain_code: self.chain_code,
            index: self.index,
            backend: PhantomData,
        }
    }

    pub fn serialize(&self) -> String {
        let mut payload = [0u8; SERIALIZED_LEN];
        payload[1..33].copy_from_slice(self.private_key.as_bytes());
        payload[33..].copy_from_slice(&self.chain_code);
        B::Codec::encode_with_checksum(&payload)
    }
}

impl<B: Backend> ExtendedPublicKey<B> {
    /// Builds a node from raw parts, rejecting encodings that are not curve points
    pub fn new(
        public_key: [u8; 33],
        chain_code: ChainCode,
        index: Option<u32>,
    ) -> Result<Self, HdError> {
        if !B::Curve::is_valid_point(&public_key) {
            return Err(HdError::InvalidPoint);
        }
        Ok(Self {
            public_key: PublicKey::from_validated(public_key),
            chain_code,
            index,
            backend: PhantomData,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Derives the normal child at `index`. Hardened indexes fail with
    /// [`HdError::MissingPrivateKey`].
    pub fn derive_child(&self, index: u32) -> Result<Self, HdError> {
        let mut index = index;
        loop {
            if is_hardened(index) {
                return Err(HdError::MissingPrivateKey);
            }
            let mut data = [0u8; 37];
            data[..33].copy_from_slice(self.public_key.as_bytes());
            data[33..].copy_from_slice(&ser32(index));

            let digest = B::Hash::hmac(&self.chain_code, &data)?;
            let (left, right) = split_digest(&digest);
            if B::Curve::is_valid_scalar(&left) {
                if let Some(child) =
                    B::Curve::add_scalar_to_point(self.public_key.as_bytes(), &left)
                {
                    return Ok(Self {
                        public_key: PublicKey::from_validated(child),
                        chain_code: right,
                        index: Some(index),
                        backend: PhantomData,
                    });
                }
            }
            index = next_index(index)?;
        }
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, HdError> {
        let mut current = self.clone();
        for child in path {
            if child.is_hardened() {
                return Err(HdError::MissingPrivateKey);
            }
            trace!(%child, "deriving public child");
            current = current.derive_child(child.value())?;
        }
        Ok(current)
    }

    pub fn serialize(&self) -> String {
        let mut payload = [0u8; SERIALIZED_LEN];
        payload[..33].copy_from_slice(self.public_key.as_bytes());
        payload[33..].copy_from_slice(&self.chain_code);
        B::Codec::encode_with_checksum(&payload)
    }
}

impl<B: Backend> ExtendedKey<B> {
    pub fn from_seed(seed: &[u8]) -> Result<Self, HdError> {
        ExtendedPrivateKey::from_seed(seed).map(ExtendedKey::Private)
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        match self {
            ExtendedKey::Private(key) => Some(key.private_key()),
            ExtendedKey::Public(_) => None,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        match self {
            ExtendedKey::Private(key) => key.public_key(),
            ExtendedKey::Public(key) => key.public_key(),
        }
    }

    pub fn chain_code(&self) -> &ChainCode {
        match self {
            ExtendedKey::Private(key) => key.chain_code(),
            ExtendedKey::Public(key) => key.chain_code(),
        }
    }

    pub fn index(&self) -> Option<u32> {
        match self {
            ExtendedKey::Private(key) => key.index(),
            ExtendedKey::Public(key) => key.index(),
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, ExtendedKey::Private(_))
    }

    /// Derives a child of the same kind as `self`
    pub fn derive(&self, index: u32) -> Result<Self, HdError> {
        match self {
            ExtendedKey::Private(key) => key.derive_child(index).map(ExtendedKey::Private),
            ExtendedKey::Public(key) => key.derive_child(index).map(ExtendedKey::Public),
        }
    }

    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, HdError> {
        match self {
            ExtendedKey::Private(key) => key.derive_path(path).map(ExtendedKey::Private),
            ExtendedKey::Public(key) => key.derive_path(path).map(ExtendedKey::Public),
        }
    }

    /// Parses `path` and derives the node it names
    pub fn derive_path_str(&self, path: &str) -> Result<Self, HdError> {
        self.derive_path(&path.parse()?)
    }

    /// Public-only view of this node
    pub fn neutered(&self) -> Self {
        match self {
            ExtendedKey::Private(key) => ExtendedKey::Public(key.to_extended_public_key()),
            ExtendedKey::Public(key) => ExtendedKey::Public(key.clone()),
        }
    }

    /// Base58check of `key material (33 bytes) || chain code (32 bytes)`.
    ///
    /// Key material is `0x00 || private key` or the compressed public key. Version,
    /// depth and parent fingerprint are not included, so the result is not an
    /// `xprv`/`xpub` string.
    pub fn serialize(&self) -> String {
        match self {
            ExtendedKey::Private(key) => key.serialize(),
            ExtendedKey::Public(key) => key.serialize(),
        }
    }

    /// Reverses [`serialize`](Self::serialize). The decoded node has no index.
    pub fn deserialize(s: &str) -> Result<Self, HdError> {
        let payload = B::Codec::decode_with_checksum(s)?;
        if payload.len() != SERIALIZED_LEN {
            return Err(HdError::InvalidEncoding(format!(
                "expected {SERIALIZED_LEN} bytes, got {}",
                payload.len()
            )));
        }
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[33..]);
        if payload[0] == 0x00 {
            let mut private_key = [0u8; 32];
            private_key.copy_from_slice(&payload[1..33]);
            ExtendedPrivateKey::new(private_key, chain_code, None).map(ExtendedKey::Private)
        } else {
            let mut public_key = [0u8; 33];
            public_key.copy_from_slice(&payload[..33]);
            ExtendedPublicKey::new(public_key, chain_code, None).map(ExtendedKey::Public)
        }
    }
}

impl<B: Backend> From<ExtendedPrivateKey<B>> for ExtendedKey<B> {
    fn from(key: ExtendedPrivateKey<B>) -> Self {
        ExtendedKey::Private(key)
    }
}

impl<B: Backend> From<ExtendedPublicKey<B>> for ExtendedKey<B> {
    fn from(key: ExtendedPublicKey<B>) -> Self {
        ExtendedKey::Public(key)
    }
}

impl<B: Backend> FromStr for ExtendedKey<B> {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s)
    }
}

impl<B: Backend> fmt::Display for ExtendedKey<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
