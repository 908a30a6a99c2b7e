use std::fs::File;
use std::io::{self, Read};
use crate::rsa::error::RsaError;
use crate::rsa::keys::{Key, KEY_FILE_LEN};

impl Key {
    pub fn from_bytes(buf: &[u8; KEY_FILE_LEN]) -> Self {
        let mut exponent = [0u8; 8];
        let mut modulus = [0u8; 8];
        exponent.copy_from_slice(&buf[..8]);
        modulus.copy_from_slice(&buf[8..]);
        Key::new(u64::from_le_bytes(exponent), u64::from_le_bytes(modulus))
    }

    /// Reads exactly one key; anything after the first 16 bytes is left unread.
    pub fn read_from(reader: &mut dyn Read) -> io::Result<Self> {
        let mut buf = [0u8; KEY_FILE_LEN];
        reader.read_exact(&mut buf)?;
        Ok(Key::from_bytes(&buf))
    }
}

/// Loads a key file, rejecting short files and moduli that cannot carry any
/// modular arithmetic.
pub fn read_key(path: &str) -> Result<Key, RsaError> {
    let mut file = File::open(path).map_err(|e| RsaError::key_file(path, e))?;
    let key = Key::read_from(&mut file).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => RsaError::key_file(path, format!("shorter than {KEY_FILE_LEN} bytes")),
        _ => RsaError::key_file(path, e),
    })?;
    if key.modulus < 2 {
        return Err(RsaError::key_file(path, format!("invalid modulus {}", key.modulus)));
    }
    log::debug!("loaded key `{}`: {:?}", path, key);
    Ok(key)
}
