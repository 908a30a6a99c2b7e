use std::fs;
use rand::Rng;
use crate::rsa::error::RsaError;
use crate::rsa::keys::{derive_keys, KeySet};

/// Candidate factors read from a primes file.
///
/// The first line holds the decimal count `N`, the rest holds at least `N`
/// whitespace separated decimal values. Primality is not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeList {
    pub primes: Vec<u64>,
}

impl PrimeList {
    pub fn load(path: &str) -> Result<Self, RsaError> {
        let text = fs::read_to_string(path).map_err(|e| RsaError::primes_file(path, e))?;
        Self::parse(&text).map_err(|reason| RsaError::primes_file(path, reason))
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let (head, body) = text.split_once('\n').unwrap_or((text, ""));
        let head = head.trim();
        let count = head.parse::<usize>().map_err(|_| format!("invalid count `{head}`"))?;
        if count == 0 {
            return Err("no primes".to_string());
        }
        let primes = body.split_whitespace()
            .take(count)
            .map(|t| t.parse::<u64>().map_err(|_| format!("invalid prime `{t}`")))
            .collect::<Result<Vec<_>, _>>()?;
        if primes.len() < count {
            return Err(format!("expected {} primes, found {}", count, primes.len()));
        }
        Ok(Self { primes })
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.primes[rng.gen_range(0..self.primes.len())]
    }
}

/// Derives a key set from `(p, q)`, replacing `q` with `next_q()` after every
/// overflow, at most `retries` times. Other failures are returned at once.
pub fn generate_key_set(p: u64, mut q: u64, retries: usize, mut next_q: impl FnMut() -> Option<u64>, verbose: bool) -> Result<KeySet, RsaError> {
    let mut count = 0;
    loop {
        match derive_keys(p, q, verbose) {
            Err(e) if e.is_retryable() && count < retries => {
                let Some(next) = next_q() else { return Err(e); };
                log::warn!("{e}, retrying with q = {next}");
                q = next;
                count += 1;
            }
            res => return res,
        }
    }
}
