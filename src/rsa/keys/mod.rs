pub mod key_writer;
pub mod key_reader;
pub mod key_pair;

pub use key_pair::*;
pub use key_reader::*;
pub use key_writer::*;

use crate::rsa::arith::modular_inverse;
use crate::rsa::error::RsaError;

/// Candidate public exponents, tried smallest first.
pub const PUBLIC_EXPONENTS: std::ops::RangeInclusive<u64> = 3..=9;

/// One half of a key pair: `(e, n)` or `(d, n)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Key {
    pub exponent: u64,
    pub modulus: u64,
}

impl Key {
    pub fn new(exponent: u64, modulus: u64) -> Self {
        Self { exponent, modulus }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySet {
    pub public: Key,
    pub private: Key,
}

impl KeySet {
    /// Both halves must share the modulus to be used together.
    pub fn is_matched(&self) -> bool {
        self.public.modulus == self.private.modulus
    }
}

/// Derives `(e, d, n)` from the prime factors `p` and `q`.
///
/// `Overflow` means `p * q` does not fit in 64 bits and the caller should try
/// another factor. `NoValidKeyset` means no exponent in [`PUBLIC_EXPONENTS`] is
/// invertible modulo the totient.
pub fn derive_keys(p: u64, q: u64, verbose: bool) -> Result<KeySet, RsaError> {
    if verbose { log::debug!("P: {p}, Q: {q}"); }
    for f in [p, q] {
        if f < 2 { return Err(RsaError::InvalidFactor(f)); }
    }
    let n = p.checked_mul(q).ok_or(RsaError::Overflow { p, q })?;
    let phi = (p - 1) * (q - 1);
    if verbose { log::debug!("N: {n}, PHI: {phi}"); }
    for e in PUBLIC_EXPONENTS {
        let d = modular_inverse(e, phi);
        if verbose { log::debug!("E: {e}, D: {d:?}"); }
        if let Some(d) = d {
            check_key_set(d, e, phi, verbose);
            return Ok(KeySet { public: Key::new(e, n), private: Key::new(d, n) });
        }
    }
    Err(RsaError::NoValidKeyset { p, q })
}

fn check_key_set(d: u64, e: u64, phi: u64, verbose: bool) {
    let res = (d as u128 * e as u128) % phi as u128;
    if verbose { log::debug!("(d * e) % phi = {} % {} = {}", d as u128 * e as u128, phi, res); }
    debug_assert!(phi == 1 || res == 1);
}
