use crate::rsa::error::RsaError;
use crate::rsa::keys::{read_key, write_key_pair, KeySet};

/// Key files sharing one name prefix: `{prefix}.pub` and `{prefix}.pvt`.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub prefix: String,
}

impl From<String> for KeyPair {
    fn from(prefix: String) -> Self {
        Self { prefix }
    }
}

impl KeyPair {
    pub fn public_path(prefix: &str) -> String {
        format!("{prefix}.pub")
    }

    pub fn private_path(prefix: &str) -> String {
        format!("{prefix}.pvt")
    }

    pub fn save(&self, keys: &KeySet) -> Result<(), RsaError> {
        write_key_pair(&keys.private, &keys.public, &self.prefix)
    }

    /// Loads both halves and checks that they share the modulus.
    pub fn load(&self) -> Result<KeySet, RsaError> {
        let public_path = KeyPair::public_path(&self.prefix);
        let keys = KeySet {
            public: read_key(&public_path)?,
            private: read_key(&KeyPair::private_path(&self.prefix))?,
        };
        if !keys.is_matched() {
            return Err(RsaError::key_file(&public_path, format!(
                "modulus {} does not match private modulus {}", keys.public.modulus, keys.private.modulus)));
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use crate::rsa::keys::{derive_keys, Key};
    use super::*;

    #[test]
    fn test_key_pair_load() {
        let dir = tempfile::tempdir().unwrap();
        let pair = KeyPair::from(dir.path().join("carol").to_string_lossy().to_string());
        let keys = derive_keys(61, 53, false).unwrap();
        pair.save(&keys).unwrap();
        assert_eq!(pair.load().unwrap(), keys);
    }

    #[test]
    fn test_mismatched_modulus() {
        let dir = tempfile::tempdir().unwrap();
        let pair = KeyPair::from(dir.path().join("dave").to_string_lossy().to_string());
        pair.save(&KeySet { public: Key::new(7, 3233), private: Key::new(1783, 3127) }).unwrap();
        assert!(matches!(pair.load(), Err(RsaError::KeyFile { .. })));
    }
}
