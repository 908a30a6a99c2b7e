use lazy_static::lazy_static;
use crate::MiniRsa;

/// Plaintext bytes per encrypted block.
pub const CHUNK_SIZE: usize = 4;
/// Bytes per ciphertext block.
pub const BLOCK_SIZE: usize = 8;
/// Plaintext read granularity; a multiple of `CHUNK_SIZE`.
pub const BUFFER_SIZE: usize = 1024;

lazy_static! {
    pub static ref CONFIG_DEF: MiniRsa = MiniRsa {
        mode: String::from("generate"),
        key: std::env::var("USER").unwrap_or_else(|_| String::from("key")),
        primes: String::from("Primes.txt"),
        p: None,
        q: None,
        seed: chrono::Local::now().timestamp() as u64,
        cipher: None,
        plain: None,
        retries: 3,
        verbose: false,
        progress: false,
    };
}
