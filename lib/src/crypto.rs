use crate::error::{ProfileError, Result};
use crate::models::ExportDocument;
use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Separates the iv blob from the data blob in an encrypted artifact
pub const SEPARATOR: char = '*';

/// First character of every blob: base64 of the `Salted__` header starts with it
pub const ENCRYPTED_MARKER: char = 'U';

/// Password held for the duration of a session only
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_empty() { "Password(<empty>)" } else { "Password(<redacted>)" })
    }
}

/// Password-based encoding of export documents
///
/// Each blob is OpenSSL `enc` compatible: base64 of `Salted__`, an 8-byte salt
/// and AES-256-CBC ciphertext. Key and default iv come from `EVP_BytesToKey`
/// (SHA-256, one round). The data blob swaps the derived iv for a random one,
/// which travels in the iv blob as 32 hex characters.
pub struct CryptoCodec;

impl CryptoCodec {
    const SALT_HEADER: &'static [u8; 8] = b"Salted__";
    const SALT_SIZE: usize = 8;
    const KEY_SIZE: usize = 32;
    const IV_SIZE: usize = 16;
    const BLOCK_SIZE: usize = 16;

    /// Serialize a document, encrypting it when the password is non-empty
    pub fn encode(doc: &ExportDocument, password: &Password) -> Result<String> {
        let json = doc.to_json()?;
        Ok(Self::encode_text(&json, password))
    }

    /// Inverse of `encode`; every failure is `DecryptionFailure`
    pub fn decode(artifact: &str, password: &Password) -> Result<ExportDocument> {
        let text = Self::decode_text(artifact, password)?;
        ExportDocument::from_json(&text).map_err(|_| ProfileError::DecryptionFailure)
    }

    pub fn encode_text(plain: &str, password: &Password) -> String {
        if password.is_empty() {
            return plain.to_string();
        }

        let mut iv = [0u8; Self::IV_SIZE];
        rand::rng().fill_bytes(&mut iv);

        let data_blob = Self::encrypt_blob(plain.as_bytes(), password.as_str(), Some(&iv));
        let iv_blob = Self::encrypt_blob(hex::encode(iv).as_bytes(), password.as_str(), None);

        format!("{}{}{}", iv_blob, SEPARATOR, data_blob)
    }

    pub fn decode_text(artifact: &str, password: &Password) -> Result<String> {
        if password.is_empty() {
            return Ok(artifact.to_string());
        }

        let (iv_blob, data_blob) = artifact
            .trim()
            .split_once(SEPARATOR)
            .ok_or(ProfileError::DecryptionFailure)?;

        let iv_hex = Self::decrypt_blob(iv_blob, password.as_str(), None)?;
        let iv = parse_iv(&iv_hex)?;
        let data = Self::decrypt_blob(data_blob, password.as_str(), Some(&iv))?;

        String::from_utf8(data).map_err(|_| ProfileError::DecryptionFailure)
    }

    fn encrypt_blob(plain: &[u8], password: &str, iv: Option<&[u8; 16]>) -> String {
        let mut salt = [0u8; Self::SALT_SIZE];
        rand::rng().fill_bytes(&mut salt);

        let (key, derived_iv) = Self::derive_key_iv(password, &salt);
        let iv = iv.copied().unwrap_or(derived_iv);
        let ciphertext =
            Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plain);

        let mut raw = Vec::with_capacity(Self::SALT_HEADER.len() + salt.len() + ciphertext.len());
        raw.extend_from_slice(Self::SALT_HEADER);
        raw.extend_from_slice(&salt);
        raw.extend_from_slice(&ciphertext);
        STANDARD.encode(raw)
    }

    fn decrypt_blob(blob: &str, password: &str, iv: Option<&[u8; 16]>) -> Result<Vec<u8>> {
        let raw = STANDARD
            .decode(blob.trim())
            .map_err(|_| ProfileError::DecryptionFailure)?;

        let header_len = Self::SALT_HEADER.len() + Self::SALT_SIZE;
        if raw.len() < header_len + Self::BLOCK_SIZE
            || &raw[..Self::SALT_HEADER.len()] != Self::SALT_HEADER
            || (raw.len() - header_len) % Self::BLOCK_SIZE != 0
        {
            return Err(ProfileError::DecryptionFailure);
        }

        let salt = &raw[Self::SALT_HEADER.len()..header_len];
        let (key, derived_iv) = Self::derive_key_iv(password, salt);
        let iv = iv.copied().unwrap_or(derived_iv);

        Aes256CbcDec::new(&key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&raw[header_len..])
            .map_err(|_| ProfileError::DecryptionFailure)
    }

    /// OpenSSL `EVP_BytesToKey`: D_i = H(D_{i-1} || password || salt)
    fn derive_key_iv(password: &str, salt: &[u8]) -> ([u8; 32], [u8; 16]) {
        let mut material = Vec::with_capacity(64);
        let mut block: Vec<u8> = Vec::new();

        while material.len() < Self::KEY_SIZE + Self::IV_SIZE {
            let mut hasher = Sha256::new();
            hasher.update(&block);
            hasher.update(password.as_bytes());
            hasher.update(salt);
            block = hasher.finalize().to_vec();
            material.extend_from_slice(&block);
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&material[..Self::KEY_SIZE]);
        let mut iv = [0u8; 16];
        iv.copy_from_slice(&material[Self::KEY_SIZE..Self::KEY_SIZE + Self::IV_SIZE]);
        (key, iv)
    }
}

fn parse_iv(iv_hex: &[u8]) -> Result<[u8; 16]> {
    let mut iv = [0u8; 16];
    hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| ProfileError::DecryptionFailure)?;
    Ok(iv)
}
