use std::collections::HashMap;
use std::fmt;

use crate::types::{KeyType, Permission};

/**
    A key decrypted from one license key container.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    kid: Vec<u8>,
    key_type: KeyType,
    key: Vec<u8>,
    permissions: Vec<Permission>,
}

impl Key {
    pub fn new(
        kid: Vec<u8>,
        key_type: KeyType,
        key: Vec<u8>,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            kid,
            key_type,
            key,
            permissions,
        }
    }

    /// Key id. The ASCII type name when the container carried no id.
    pub fn kid(&self) -> &[u8] {
        &self.kid
    }

    pub fn kid_hex(&self) -> String {
        hex::encode(&self.kid)
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn key_hex(&self) -> String {
        hex::encode(&self.key)
    }

    /// Permission flags set on an OPERATOR_SESSION key, empty for every other type.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("kid", &self.kid_hex())
            .field("key_type", &self.key_type)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}:{}", self.key_type, self.kid_hex(), self.key_hex())
    }
}

/**
    Keys from a verified license, in the order the server listed them.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRing {
    keys: Vec<Key>,
}

impl KeyRing {
    pub fn new(keys: Vec<Key>) -> Self {
        Self { keys }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// CONTENT keys only, in server order.
    pub fn content_keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter().filter(|k| k.key_type == KeyType::Content)
    }

    /// Hex kid to hex key for every CONTENT key.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.content_keys()
            .map(|k| (k.kid_hex(), k.key_hex()))
            .collect()
    }

    /**
        `"kid:key"` hex pairs for every CONTENT key, in server order.

        A repeated kid keeps the position of its first occurrence and the key
        of its last, matching [`KeyRing::to_map`].
    */
    pub fn to_list(&self) -> Vec<String> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for k in self.content_keys() {
            let kid = k.kid_hex();
            match index.get(&kid) {
                Some(&i) => pairs[i].1 = k.key_hex(),
                None => {
                    index.insert(kid.clone(), pairs.len());
                    pairs.push((kid, k.key_hex()));
                }
            }
        }
        pairs
            .into_iter()
            .map(|(kid, key)| format!("{kid}:{key}"))
            .collect()
    }
}

impl IntoIterator for KeyRing {
    type Item = Key;
    type IntoIter = std::vec::IntoIter<Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a KeyRing {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
