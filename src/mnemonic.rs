//! BIP39 mnemonics: entropy to words, words back to entropy, and words to seed.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, Zeroizing};

use crate::backend::{Kdf, Pbkdf2Sha512};
use crate::error::HdError;
use crate::util::{bits_to_bytes, bits_to_indices, bytes_to_bits, checksum_bits, indices_to_bits};
use crate::wordlist::{self, ENGLISH};

/// PBKDF2 iteration count for seed stretching
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Length in bytes of the stretched seed
pub const SEED_LEN: usize = 64;

/// Entropy size in bits used when none is requested
pub const DEFAULT_STRENGTH: usize = 128;

const BITS_PER_WORD: usize = 11;
const SALT_PREFIX: &str = "mnemonic";

fn check_entropy_len(len: usize) -> Result<(), HdError> {
    if !(16..=32).contains(&len) || len % 4 != 0 {
        return Err(HdError::InvalidEntropy(len));
    }
    Ok(())
}

/// A checksummed phrase over the English wordlist, held as word indexes.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Mnemonic {
    indices: Vec<usize>,
}

impl Mnemonic {
    /// Encodes 16 to 32 bytes of entropy (a multiple of 4) with its checksum
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, HdError> {
        check_entropy_len(entropy.len())?;
        let mut bits = bytes_to_bits(entropy);
        bits.extend(checksum_bits(entropy));
        let indices = bits_to_indices(&bits, BITS_PER_WORD);
        bits.zeroize();
        Ok(Self { indices })
    }

    /// Draws `strength_bits / 8` bytes from the OS random source
    pub fn generate(strength_bits: usize) -> Result<Self, HdError> {
        if strength_bits % 32 != 0 {
            return Err(HdError::InvalidStrength(strength_bits));
        }
        check_entropy_len(strength_bits / 8)?;
        let mut entropy = Zeroizing::new(vec![0u8; strength_bits / 8]);
        OsRng.fill_bytes(&mut entropy);
        Self::from_entropy(&entropy)
    }

    /// Parses and validates a phrase: word count, wordlist membership and checksum.
    ///
    /// The phrase is NFKD-normalized and split on any whitespace.
    pub fn parse(phrase: &str) -> Result<Self, HdError> {
        let normalized = Zeroizing::new(phrase.nfkd().collect::<String>());
        let indices = normalized
            .split_whitespace()
            .enumerate()
            .map(|(position, word)| {
                wordlist::index_of(word).ok_or_else(|| {
                    HdError::InvalidMnemonic(format!("unknown word at position {}", position + 1))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !matches!(indices.len(), 12 | 15 | 18 | 21 | 24) {
            return Err(HdError::InvalidMnemonic(format!(
                "expected 12, 15, 18, 21 or 24 words, got {}",
                indices.len()
            )));
        }

        let mnemonic = Self { indices };
        let entropy = Zeroizing::new(mnemonic.to_entropy());
        if Self::from_entropy(&entropy)? != mnemonic {
            return Err(HdError::InvalidMnemonic("checksum mismatch".into()));
        }
        Ok(mnemonic)
    }

    /// The entropy this phrase encodes, without the checksum bits
    pub fn to_entropy(&self) -> Vec<u8> {
        let mut bits = indices_to_bits(&self.indices, BITS_PER_WORD);
        let entropy_bits = bits.len() * 32 / 33;
        let entropy = bits_to_bytes(&bits[..entropy_bits]);
        bits.zeroize();
        entropy
    }

    pub fn word_count(&self) -> usize {
        self.indices.len()
    }

    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.indices.iter().map(|&index| ENGLISH[index])
    }

    pub fn phrase(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }

    /// PBKDF2-HMAC-SHA512 seed for this phrase and `passphrase`
    pub fn to_seed(&self, passphrase: &str) -> [u8; SEED_LEN] {
        self.to_seed_with::<Pbkdf2Sha512>(passphrase)
    }

    pub fn to_seed_with<K: Kdf>(&self, passphrase: &str) -> [u8; SEED_LEN] {
        let phrase = Zeroizing::new(self.phrase());
        stretch::<K>(&phrase, passphrase)
    }
}

fn stretch<K: Kdf>(phrase: &str, passphrase: &str) -> [u8; SEED_LEN] {
    let password = Zeroizing::new(phrase.nfkd().collect::<String>());
    let salt = Zeroizing::new(
        format!("{SALT_PREFIX}{passphrase}")
            .nfkd()
            .collect::<String>(),
    );
    let mut seed = [0u8; SEED_LEN];
    K::derive(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed);
    seed
}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.indices.zeroize();
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words)", self.indices.len())
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase())
    }
}

impl std::str::FromStr for Mnemonic {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Mnemonic {
    type Error = HdError;

    fn try_from(phrase: String) -> Result<Self, Self::Error> {
        Self::parse(&phrase)
    }
}

impl From<Mnemonic> for String {
    fn from(mnemonic: Mnemonic) -> Self {
        mnemonic.phrase()
    }
}

/// Encodes entropy as a space-separated phrase
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<String, HdError> {
    Mnemonic::from_entropy(entropy).map(|mnemonic| mnemonic.phrase())
}

/// Random phrase of `strength_bits` entropy
pub fn generate_mnemonic(strength_bits: usize) -> Result<String, HdError> {
    Mnemonic::generate(strength_bits).map(|mnemonic| mnemonic.phrase())
}

/// Stretches any phrase into a 64-byte seed. The phrase is not validated against the
/// wordlist; use [`Mnemonic::parse`] first for that.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> [u8; SEED_LEN] {
    stretch::<Pbkdf2Sha512>(mnemonic, passphrase)
}
