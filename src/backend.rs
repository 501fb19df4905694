//! Curve, hash and encoding primitives behind the derivation engine.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, ProjectivePoint, Scalar, SecretKey};
use sha2::{Digest, Sha256, Sha512};

use crate::error::HdError;

/// Elliptic curve operations over raw big-endian encodings.
pub trait Curve {
    /// `true` iff `0 < scalar < n`
    fn is_valid_scalar(scalar: &[u8; 32]) -> bool;
    /// `true` iff `point` is a compressed encoding of a point on the curve
    fn is_valid_point(point: &[u8; 33]) -> bool;
    /// `(key + tweak) mod n`, or `None` if either input is invalid or the sum is zero
    fn add_scalar_to_private_key(key: &[u8; 32], tweak: &[u8; 32]) -> Option<[u8; 32]>;
    /// `point + tweak·G`, or `None` if either input is invalid or the sum is infinity
    fn add_scalar_to_point(point: &[u8; 33], tweak: &[u8; 32]) -> Option<[u8; 33]>;
    /// Compressed `key·G`, or `None` if `key` is not a valid scalar
    fn derive_public_key(key: &[u8; 32]) -> Option<[u8; 33]>;
}

/// HMAC with a 512-bit output.
pub trait KeyedHash512 {
    fn hmac(key: &[u8], data: &[u8]) -> Result<[u8; 64], HdError>;
}

/// Password-based key stretching.
pub trait Kdf {
    /// Fills `out` with key material stretched from `password` and `salt`
    fn derive(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]);
}

/// Text encoding with an embedded integrity checksum.
pub trait ChecksumCodec {
    fn encode_with_checksum(payload: &[u8]) -> String;
    fn decode_with_checksum(encoded: &str) -> Result<Vec<u8>, HdError>;
}

/// Bundle of the capabilities an extended key needs.
pub trait Backend: Clone {
    type Curve: Curve;
    type Hash: KeyedHash512;
    type Codec: ChecksumCodec;
}

/// secp256k1 backed by `k256`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Secp256k1;

/// HMAC-SHA512 backed by `hmac` and `sha2`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HmacSha512;

/// PBKDF2 with HMAC-SHA512 as the pseudo-random function
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pbkdf2Sha512;

/// Base58 with a 4-byte double-SHA256 checksum appended to the payload
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Base58Check;

/// The standard BIP32 parameter set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DefaultBackend;

impl Backend for DefaultBackend {
    type Curve = Secp256k1;
    type Hash = HmacSha512;
    type Codec = Base58Check;
}

fn scalar_from_bytes(bytes: &[u8; 32]) -> Option<Scalar> {
    Option::from(Scalar::from_repr(FieldBytes::from(*bytes)))
}

fn compress(key: &k256::PublicKey) -> [u8; 33] {
    let encoded = key.to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(encoded.as_bytes());
    out
}

impl Curve for Secp256k1 {
    fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
        SecretKey::from_bytes(&FieldBytes::from(*scalar)).is_ok()
    }

    fn is_valid_point(point: &[u8; 33]) -> bool {
        k256::PublicKey::from_sec1_bytes(point).is_ok()
    }

    fn add_scalar_to_private_key(key: &[u8; 32], tweak: &[u8; 32]) -> Option<[u8; 32]> {
        let sum = scalar_from_bytes(key)? + scalar_from_bytes(tweak)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&sum.to_bytes());
        Self::is_valid_scalar(&out).then_some(out)
    }

    fn add_scalar_to_point(point: &[u8; 33], tweak: &[u8; 32]) -> Option<[u8; 33]> {
        let parent = k256::PublicKey::from_sec1_bytes(point).ok()?;
        let tweak = scalar_from_bytes(tweak)?;
        let child = parent.to_projective() + ProjectivePoint::GENERATOR * tweak;
        // from_affine rejects the identity
        let child = k256::PublicKey::from_affine(child.to_affine()).ok()?;
        Some(compress(&child))
    }

    fn derive_public_key(key: &[u8; 32]) -> Option<[u8; 33]> {
        let secret = SecretKey::from_bytes(&FieldBytes::from(*key)).ok()?;
        Some(compress(&secret.public_key()))
    }
}

impl KeyedHash512 for HmacSha512 {
    fn hmac(key: &[u8], data: &[u8]) -> Result<[u8; 64], HdError> {
        let mut mac = Hmac::<Sha512>::new_from_slice(key)?;
        mac.update(data);
        let mut out = [0u8; 64];
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }
}

impl Kdf for Pbkdf2Sha512 {
    fn derive(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
        pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, rounds, out);
    }
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

impl ChecksumCodec for Base58Check {
    fn encode_with_checksum(payload: &[u8]) -> String {
        let checksum = double_sha256(payload);
        let mut out = Vec::with_capacity(payload.len() + 4);
        out.extend_from_slice(payload);
        out.extend_from_slice(&checksum[..4]);
        bs58::encode(out).into_string()
    }

    fn decode_with_checksum(encoded: &str) -> Result<Vec<u8>, HdError> {
        let decoded = bs58::decode(encoded).into_vec()?;
        if decoded.len() < 4 {
            return Err(HdError::InvalidEncoding("data too short for checksum".into()));
        }
        let (payload, checksum) = decoded.split_at(decoded.len() - 4);
        if checksum != &double_sha256(payload)[..4] {
            return Err(HdError::InvalidEncoding("checksum mismatch".into()));
        }
        Ok(payload.to_vec())
    }
}
