use std::fs::{self, File};
use std::io::{BufWriter, Write};
use crate::rsa::error::RsaError;
use crate::rsa::keys::{Key, KeyPair};

/// Size of one serialised key: `[exponent: u64][modulus: u64]`, little-endian.
pub const KEY_FILE_LEN: usize = 16;

impl Key {
    pub fn to_bytes(&self) -> [u8; KEY_FILE_LEN] {
        let mut buf = [0u8; KEY_FILE_LEN];
        buf[..8].copy_from_slice(&self.exponent.to_le_bytes());
        buf[8..].copy_from_slice(&self.modulus.to_le_bytes());
        buf
    }

    pub fn write_to(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    pub fn save(&self, path: &str) -> Result<(), RsaError> {
        let file = File::create(path).map_err(|e| RsaError::key_file(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer).map_err(|e| RsaError::key_file(path, e))
    }
}

/// Writes `{prefix}.pvt` and `{prefix}.pub`. A failed public write removes
/// the private file again, so no half pair is left behind.
pub fn write_key_pair(private: &Key, public: &Key, prefix: &str) -> Result<(), RsaError> {
    let private_path = KeyPair::private_path(prefix);
    private.save(&private_path)?;
    if let Err(e) = public.save(&KeyPair::public_path(prefix)) {
        if let Err(rm) = fs::remove_file(&private_path) {
            log::warn!("cannot remove `{}`: {}", private_path, rm);
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let key = Key::new(7, 3233);
        let bytes = key.to_bytes();
        assert_eq!(bytes[..8], [7u8, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(bytes[8..], [0xa1u8, 0x0c, 0, 0, 0, 0, 0, 0]);
        let mut buf: Vec<u8> = Vec::new();
        key.write_to(&mut buf).unwrap();
        assert_eq!(buf, bytes);
    }

    #[test]
    fn key_pair_save_test() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("alice").to_string_lossy().to_string();
        write_key_pair(&Key::new(1783, 3233), &Key::new(7, 3233), &prefix).unwrap();
        assert_eq!(std::fs::read(format!("{prefix}.pvt")).unwrap(), Key::new(1783, 3233).to_bytes());
        assert_eq!(std::fs::read(format!("{prefix}.pub")).unwrap(), Key::new(7, 3233).to_bytes());
    }

    #[test]
    fn test_failed_public_write_leaves_no_private() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("erin").to_string_lossy().to_string();
        fs::create_dir(format!("{prefix}.pub")).unwrap();
        let res = write_key_pair(&Key::new(1783, 3233), &Key::new(7, 3233), &prefix);
        assert!(matches!(res, Err(RsaError::KeyFile { .. })));
        assert!(!std::path::Path::new(&format!("{prefix}.pvt")).exists());
    }

    #[test]
    fn test_save_into_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("k.pub").to_string_lossy().to_string();
        assert!(matches!(Key::new(3, 55).save(&path), Err(RsaError::KeyFile { .. })));
    }
}
