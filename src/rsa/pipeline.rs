//! Chunked cipher streams.
//!
//! Plaintext is cut into [`CHUNK_SIZE`] byte chunks (the last one NUL padded),
//! every chunk is packed by [`codec::encode`] and raised to the key exponent,
//! and the result is written as one little-endian [`BLOCK_SIZE`] byte block.
//! Blocks carry no header or length, so block order is plaintext order.

use std::io::{self, Read, Write};
use indicatif::{ProgressBar, ProgressStyle};
use crate::rsa::arith::mod_pow;
use crate::rsa::codec;
use crate::rsa::config::{BLOCK_SIZE, BUFFER_SIZE, CHUNK_SIZE};
use crate::rsa::error::RsaError;
use crate::rsa::keys::Key;

/// Reads until `bytes` bytes are collected or the stream ends.
pub fn read_source(reader: &mut dyn Read, bytes: usize) -> io::Result<Vec<u8>> {
    let mut res = Vec::with_capacity(bytes);
    Read::take(&mut *reader, bytes as u64).read_to_end(&mut res)?;
    Ok(res)
}

/// Progress on stderr; hidden unless `show`. Without a known length a spinner is used.
pub fn progress_bar(len: Option<u64>, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    match len {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"));
            pb
        }
        None => ProgressBar::new_spinner(),
    }
}

/// Encrypts the whole of `reader` into `writer`, returning the block count.
pub fn write_cipher(reader: &mut dyn Read, writer: &mut dyn Write, key: &Key, verbose: bool, pb: &ProgressBar) -> Result<usize, RsaError> {
    let mut blocks = 0;
    let mut warned = false;
    loop {
        let buffer = read_source(reader, BUFFER_SIZE)?;
        if buffer.is_empty() { break; }
        for chunk in buffer.chunks(CHUNK_SIZE) {
            let mut sub = [0u8; CHUNK_SIZE];
            sub[..chunk.len()].copy_from_slice(chunk);
            let code = codec::encode(&sub);
            if code >= key.modulus && !warned {
                log::warn!("chunk code {} is not below modulus {}, it cannot be decrypted", code, key.modulus);
                warned = true;
            }
            let encrypted = mod_pow(code, key.exponent, key.modulus);
            if verbose { log::debug!("chunk {}: {:02X?} => {} => {}", blocks, sub, code, encrypted); }
            writer.write_all(&encrypted.to_le_bytes())?;
            blocks += 1;
        }
        pb.inc(buffer.len() as u64);
    }
    writer.flush()?;
    if verbose { log::debug!("wrote {} blocks", blocks); }
    Ok(blocks)
}

/// Decrypts `reader` block by block into `writer`, returning the block count.
///
/// NUL padding is trimmed from the last block only. A trailing partial block
/// fails with [`RsaError::CipherLength`]; plaintext of earlier blocks may
/// already be written by then.
pub fn read_cipher(reader: &mut dyn Read, writer: &mut dyn Write, key: &Key, verbose: bool, pb: &ProgressBar) -> Result<usize, RsaError> {
    let mut blocks = 0;
    let mut total = 0u64;
    let mut pending: Option<Vec<u8>> = None;
    loop {
        let block = read_source(reader, BLOCK_SIZE)?;
        total += block.len() as u64;
        if block.is_empty() { break; }
        if block.len() < BLOCK_SIZE {
            return Err(RsaError::CipherLength(total));
        }
        let mut value = [0u8; BLOCK_SIZE];
        value.copy_from_slice(&block);
        let value = u64::from_le_bytes(value);
        let decrypted = mod_pow(value, key.exponent, key.modulus);
        let decoded = codec::decode(decrypted);
        if verbose { log::debug!("block {}: {} => {} => {:02X?}", blocks, value, decrypted, decoded); }
        if let Some(prev) = pending.replace(decoded) {
            writer.write_all(&prev)?;
        }
        blocks += 1;
        pb.inc(BLOCK_SIZE as u64);
    }
    if let Some(mut last) = pending {
        while last.last() == Some(&0) { last.pop(); }
        writer.write_all(&last)?;
    }
    writer.flush()?;
    if verbose { log::debug!("read {} blocks", blocks); }
    Ok(blocks)
}
