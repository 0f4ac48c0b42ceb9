use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use bytes::{BufMut, Bytes, BytesMut};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::error::{EnvelopeError, Result};

/// Length of the plaintext hash that leads every envelope.
pub const HASH_LEN: usize = 32;

/// Length of the CBC initialization vector.
pub const IV_LEN: usize = 16;

/// Fixed header: hash (32) + IV (16) = 48 bytes.
pub const HEADER_LEN: usize = HASH_LEN + IV_LEN;

/// AES block size.
pub const BLOCK_SIZE: usize = 16;

/// Marker appended to the JSON text before padding.
pub const SENTINEL: [u8; 2] = [0x00, 0x10];

/// Value of every pad byte, whatever the pad length.
pub const PAD_BYTE: u8 = 0x10;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

/// Control characters removed from decrypted text.
const STRIPPED: [char; 3] = ['\u{10}', '\n', '\0'];

/// Borrowed view of a sealed envelope.
///
/// Wire format:
/// ```text
/// ┌────────────────────┬──────────────┬──────────────────────────┐
/// │ SHA-256(json) 32B  │ IV 16B       │ AES-256-CBC ciphertext   │
/// │ not verified       │ random       │ (n × 16 bytes)           │
/// └────────────────────┴──────────────┴──────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptedEnvelope<'a> {
    pub hash: &'a [u8],
    pub iv: [u8; IV_LEN],
    pub ciphertext: &'a [u8],
}

impl<'a> EncryptedEnvelope<'a> {
    /// Split a received buffer into its parts.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(EnvelopeError::TooShort {
                len: data.len(),
                min: HEADER_LEN,
            });
        }
        let ciphertext = &data[HEADER_LEN..];
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(EnvelopeError::UnalignedCiphertext(ciphertext.len()));
        }
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&data[HASH_LEN..HEADER_LEN]);
        Ok(Self {
            hash: &data[..HASH_LEN],
            iv,
            ciphertext,
        })
    }
}

/// Derive the AES-256 key from the controller password.
pub fn derive_key(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Seal a request body under a fresh random IV.
pub fn seal<T: Serialize + ?Sized>(body: &T, secret: &str) -> Result<Bytes> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    seal_with_iv(body, secret, iv)
}

/// Seal a request body under a caller-chosen IV.
///
/// Reusing an IV under one password leaks plaintext structure; outside of
/// tests use [`seal`].
pub fn seal_with_iv<T: Serialize + ?Sized>(
    body: &T,
    secret: &str,
    iv: [u8; IV_LEN],
) -> Result<Bytes> {
    let json = serde_json::to_string(body).map_err(EnvelopeError::Serialize)?;
    let key = derive_key(secret);

    let mut plaintext = pad(json.as_bytes());
    cbc_encrypt(&key, &iv, &mut plaintext)?;
    let hash = Sha256::digest(json.as_bytes());

    let mut out = BytesMut::with_capacity(HEADER_LEN + plaintext.len());
    out.put_slice(&hash);
    out.put_slice(&iv);
    out.put_slice(&plaintext);
    trace!(
        json_len = json.len(),
        sealed_len = out.len(),
        "sealed request body"
    );
    Ok(out.freeze())
}

/// Decrypt an envelope and return its cleaned JSON text.
///
/// The leading hash is ignored. Every `0x10`, `0x0A` and `0x00` is removed
/// from the decrypted text, which drops both the sentinel and the pad.
pub fn open(data: &[u8], secret: &str) -> Result<String> {
    let envelope = EncryptedEnvelope::parse(data)?;
    let key = derive_key(secret);

    let mut plaintext = envelope.ciphertext.to_vec();
    cbc_decrypt(&key, &envelope.iv, &mut plaintext)?;

    let text = String::from_utf8(plaintext)?;
    let cleaned: String = text.chars().filter(|c| !STRIPPED.contains(c)).collect();
    trace!(
        sealed_len = data.len(),
        text_len = cleaned.len(),
        "opened envelope"
    );
    Ok(cleaned)
}

/// Decrypt an envelope and parse its JSON body.
pub fn unseal<T: DeserializeOwned>(data: &[u8], secret: &str) -> Result<T> {
    let text = open(data, secret)?;
    serde_json::from_str(&text).map_err(EnvelopeError::Json)
}

/// Append the sentinel, then pad to a block boundary with [`PAD_BYTE`].
///
/// Always adds 1..=16 pad bytes; a full block is added when the text already
/// ends on a boundary. Not PKCS#7: the pad value never encodes the count.
fn pad(json: &[u8]) -> Vec<u8> {
    let unpadded = json.len() + SENTINEL.len();
    let pad_len = BLOCK_SIZE - unpadded % BLOCK_SIZE;

    let mut out = Vec::with_capacity(unpadded + pad_len);
    out.extend_from_slice(json);
    out.extend_from_slice(&SENTINEL);
    out.resize(unpadded + pad_len, PAD_BYTE);
    out
}

/// Encrypt block-aligned `buf` in place. Padding is applied by [`pad`].
fn cbc_encrypt(key: &[u8; 32], iv: &[u8; IV_LEN], buf: &mut [u8]) -> Result<()> {
    let len = buf.len();
    Encryptor::new(key.into(), iv.into())
        .encrypt_padded_mut::<NoPadding>(buf, len)
        .map_err(|_| EnvelopeError::UnalignedCiphertext(len))?;
    Ok(())
}

/// Decrypt block-aligned `buf` in place, leaving the pad for [`open`].
fn cbc_decrypt(key: &[u8; 32], iv: &[u8; IV_LEN], buf: &mut [u8]) -> Result<()> {
    let len = buf.len();
    Decryptor::new(key.into(), iv.into())
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| EnvelopeError::UnalignedCiphertext(len))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::rpc::RpcRequest;

    const SECRET: &str = "garden-hose";

    fn unhex(text: &str) -> Vec<u8> {
        hex::decode(text).expect("valid test hex")
    }

    #[test]
    fn key_is_sha256_of_password() {
        assert_eq!(
            derive_key("abc").to_vec(),
            unhex("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn cbc_matches_nist_vector() {
        // SP 800-38A F.2.5, first two blocks.
        let key: [u8; 32] =
            unhex("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
                .try_into()
                .unwrap();
        let iv: [u8; 16] = unhex("000102030405060708090a0b0c0d0e0f").try_into().unwrap();
        let mut buf = unhex("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51");

        cbc_encrypt(&key, &iv, &mut buf).unwrap();
        assert_eq!(
            buf,
            unhex("f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d")
        );

        cbc_decrypt(&key, &iv, &mut buf).unwrap();
        assert_eq!(
            buf,
            unhex("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51")
        );

        let mut partial = [0u8; 20];
        assert!(matches!(
            cbc_encrypt(&key, &iv, &mut partial),
            Err(EnvelopeError::UnalignedCiphertext(20))
        ));
    }

    #[test]
    fn pad_uses_fixed_value() {
        let padded = pad(b"0123456789abc");
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[13..], &[0x00, 0x10, 0x10]);

        let padded = pad(b"0123456789abcd");
        assert_eq!(padded.len(), 32);
        assert_eq!(&padded[14..16], &SENTINEL);
        assert!(padded[16..].iter().all(|b| *b == PAD_BYTE));
    }

    #[test]
    fn sealed_layout_is_hash_iv_ciphertext() {
        let body = RpcRequest::tunnel_sip("02", 1);
        let iv = [7u8; IV_LEN];
        let sealed = seal_with_iv(&body, SECRET, iv).unwrap();

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(&sealed[..HASH_LEN], Sha256::digest(json.as_bytes()).as_slice());
        assert_eq!(&sealed[HASH_LEN..HEADER_LEN], &iv);
        assert_eq!((sealed.len() - HEADER_LEN) % BLOCK_SIZE, 0);
        assert_eq!(sealed.len() - HEADER_LEN, pad(json.as_bytes()).len());
    }

    #[test]
    fn seal_is_deterministic_for_fixed_iv_only() {
        let body = RpcRequest::tunnel_sip("40", 1);
        let a = seal_with_iv(&body, SECRET, [1u8; IV_LEN]).unwrap();
        let b = seal_with_iv(&body, SECRET, [1u8; IV_LEN]).unwrap();
        assert_eq!(a, b);

        let c = seal(&body, SECRET).unwrap();
        let d = seal(&body, SECRET).unwrap();
        assert_ne!(&c[HASH_LEN..HEADER_LEN], &d[HASH_LEN..HEADER_LEN]);
        assert_eq!(&c[..HASH_LEN], &a[..HASH_LEN]);
    }

    #[test]
    fn unseal_reproduces_request_body() {
        let body = RpcRequest::tunnel_sip("3900030F", 4);
        let sealed = seal(&body, SECRET).unwrap();
        let back: RpcRequest = unseal(&sealed, SECRET).unwrap();
        assert_eq!(back, body);
    }

    #[test]
    fn unseal_reproduces_arbitrary_json() {
        let bodies = [
            json!({}),
            json!({"a": "line\nbreak", "nul": "\u{0}", "dle": "\u{10}"}),
            json!({"unicode": "zoné ☔", "n": [1, 2, 3], "nested": {"ok": true}}),
            json!("exactly-sixteen!"),
        ];
        for secret in ["", "p", "a much longer password with spaces"] {
            for body in &bodies {
                let sealed = seal(body, secret).unwrap();
                let back: Value = unseal(&sealed, secret).unwrap();
                assert_eq!(&back, body);
            }
        }
    }

    #[test]
    fn open_strips_device_control_bytes() {
        let key = derive_key(SECRET);
        let iv = [3u8; IV_LEN];
        let mut plaintext = b"{\"result\":{\"data\":\"0140\",\"length\":2}}\n".to_vec();
        plaintext.extend_from_slice(&SENTINEL);
        let target = plaintext.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        plaintext.resize(target, PAD_BYTE);
        cbc_encrypt(&key, &iv, &mut plaintext).unwrap();

        let mut data = vec![0u8; HASH_LEN];
        data.extend_from_slice(&iv);
        data.extend_from_slice(&plaintext);

        assert_eq!(
            open(&data, SECRET).unwrap(),
            "{\"result\":{\"data\":\"0140\",\"length\":2}}"
        );
    }

    #[test]
    fn wrong_password_does_not_unseal() {
        let sealed = seal(&RpcRequest::tunnel_sip("02", 1), SECRET).unwrap();
        assert!(unseal::<Value>(&sealed, "not-the-password").is_err());
    }

    #[test]
    fn short_or_unaligned_buffers_are_rejected() {
        assert!(matches!(
            EncryptedEnvelope::parse(&[0u8; 47]),
            Err(EnvelopeError::TooShort { len: 47, min: 48 })
        ));
        assert!(matches!(
            open(&[0u8; 50], SECRET),
            Err(EnvelopeError::UnalignedCiphertext(2))
        ));
        assert!(matches!(
            unseal::<Value>(&[0u8; HEADER_LEN], SECRET),
            Err(EnvelopeError::Json(_))
        ));
    }
}
