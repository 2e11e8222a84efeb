#![warn(missing_docs)]
//! The two public key cryptosystems used for payload protection.
//!
//! Request payloads are encrypted under the resolver's registry key. Each
//! request also carries a fresh ephemeral public key of the same kind, under
//! which the resolver encrypts its response.

use rsa::pkcs8::DecodePublicKey;
use rsa::pkcs8::EncodePublicKey;
use rsa::Oaep;
use rsa::RsaPrivateKey;
use rsa::RsaPublicKey;
use sha2::Sha256;

use crate::error::Error;
use crate::error::Result;

/// Modulus size of generated RSA keys.
pub const RSA_MODULUS_BITS: usize = 4096;

/// PEM label of an armored secp256k1 point.
pub const ECDSA_PEM_LABEL: &str = "ECDSA PUBLIC KEY";

/// PEM label of an armored RSA SPKI key.
pub const RSA_PEM_LABEL: &str = "RSA PUBLIC KEY";

/// The key algorithms supported by the resolver network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// secp256k1 point with ECIES authenticated encryption.
    Secp256k1,
    /// RSA-4096 with OAEP (SHA-256) encryption.
    Rsa4096,
}

/// An ephemeral key pair generated per request.
///
/// The kind always mirrors the resolver key kind, so the resolver can reply
/// with the cryptosystem it already speaks.
pub enum KeyPair {
    /// secp256k1 secret key. The public half is derived on demand.
    Secp256k1(libsecp256k1::SecretKey),
    /// RSA private key.
    Rsa4096(RsaPrivateKey),
}

impl KeyPair {
    /// Generate a fresh key pair of `kind`.
    ///
    /// RSA generation is expensive and runs on the blocking pool.
    pub async fn generate(kind: KeyKind) -> Result<Self> {
        match kind {
            KeyKind::Secp256k1 => {
                let secret = libsecp256k1::SecretKey::random(&mut rand::thread_rng());
                Ok(Self::Secp256k1(secret))
            }
            KeyKind::Rsa4096 => {
                let private = tokio::task::spawn_blocking(|| {
                    RsaPrivateKey::new(&mut rand::thread_rng(), RSA_MODULUS_BITS)
                })
                .await
                .map_err(|e| Error::Crypto(format!("Rsa keygen task failed: {e}")))?
                .map_err(|e| Error::Crypto(format!("Rsa keygen failed: {e}")))?;
                Ok(Self::Rsa4096(private))
            }
        }
    }

    /// The kind of this key pair.
    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Secp256k1(_) => KeyKind::Secp256k1,
            Self::Rsa4096(_) => KeyKind::Rsa4096,
        }
    }

    /// The public half in the form it travels on the wire: a compressed
    /// point for secp256k1, PEM armored SPKI for RSA.
    pub fn public_wire_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Secp256k1(secret) => {
                let public = libsecp256k1::PublicKey::from_secret_key(secret);
                Ok(public.serialize_compressed().to_vec())
            }
            Self::Rsa4096(private) => {
                let der = RsaPublicKey::from(private)
                    .to_public_key_der()
                    .map_err(|e| Error::Crypto(format!("Rsa spki encoding failed: {e}")))?;
                Ok(pem_encode(RSA_PEM_LABEL, der.as_bytes()).into_bytes())
            }
        }
    }

    /// Decrypt a ciphertext produced for the public half of this pair.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Secp256k1(secret) => ecies::decrypt(&secret.serialize(), ciphertext)
                .map_err(|e| Error::Crypto(format!("Ecies decryption failed: {e:?}"))),
            Self::Rsa4096(private) => private
                .decrypt(Oaep::new::<Sha256>(), ciphertext)
                .map_err(|e| Error::Crypto(format!("Rsa decryption failed: {e}"))),
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyPair({:?})", self.kind())
    }
}

enum ResolverKeyMaterial {
    /// Point bytes as parsed, compressed or uncompressed.
    Secp256k1(Vec<u8>),
    Rsa4096(RsaPublicKey),
}

/// The resolver public key interpreted from the registry record.
///
/// Keeps the verbatim registry bytes alongside the parsed material. Outgoing
/// envelopes must carry the former; the relayer looks resolvers up by exact
/// key bytes.
pub struct ResolverKey {
    material: ResolverKeyMaterial,
    registry_bytes: Vec<u8>,
}

impl ResolverKey {
    /// Interpret a registry key record.
    ///
    /// PEM armor selects the kind by its label. A bare hex blob of 33 or 65
    /// bytes is a secp256k1 point. Anything else is rejected.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();

        if trimmed.starts_with("-----BEGIN ") {
            let (label, body) = pem_decode(trimmed)
                .ok_or_else(|| Error::Registry("malformed PEM public key".to_string()))?;

            let material = match label.as_str() {
                RSA_PEM_LABEL => {
                    let public = RsaPublicKey::from_public_key_der(&body)
                        .map_err(|e| Error::Registry(format!("bad Rsa public key: {e}")))?;
                    ResolverKeyMaterial::Rsa4096(public)
                }
                ECDSA_PEM_LABEL => ResolverKeyMaterial::Secp256k1(parse_point(&body)?),
                other => {
                    return Err(Error::Registry(format!(
                        "unsupported public key label {other:?}"
                    )));
                }
            };

            return Ok(Self {
                material,
                registry_bytes: value.as_bytes().to_vec(),
            });
        }

        let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::Registry(format!("public key is neither PEM nor hex: {e}")))?;
        let point = parse_point(&bytes)?;

        Ok(Self {
            material: ResolverKeyMaterial::Secp256k1(point),
            registry_bytes: bytes,
        })
    }

    /// The kind of this key. Ephemeral request keys are generated with the
    /// same kind.
    pub fn kind(&self) -> KeyKind {
        match self.material {
            ResolverKeyMaterial::Secp256k1(_) => KeyKind::Secp256k1,
            ResolverKeyMaterial::Rsa4096(_) => KeyKind::Rsa4096,
        }
    }

    /// The key exactly as the registry returned it.
    pub fn registry_bytes(&self) -> &[u8] {
        &self.registry_bytes
    }

    /// Encrypt a request payload under this key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        match &self.material {
            ResolverKeyMaterial::Secp256k1(point) => ecies::encrypt(point, plaintext)
                .map_err(|e| Error::Crypto(format!("Ecies encryption failed: {e:?}"))),
            ResolverKeyMaterial::Rsa4096(public) => public
                .encrypt(&mut rand::thread_rng(), Oaep::new::<Sha256>(), plaintext)
                .map_err(|e| Error::Crypto(format!("Rsa encryption failed: {e}"))),
        }
    }
}

impl std::fmt::Debug for ResolverKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResolverKey({:?})", self.kind())
    }
}

fn parse_point(bytes: &[u8]) -> Result<Vec<u8>> {
    if !matches!(bytes.len(), 33 | 65) {
        return Err(Error::Registry(format!(
            "bad secp256k1 point length {}",
            bytes.len()
        )));
    }

    libsecp256k1::PublicKey::parse_slice(bytes, None)
        .map_err(|e| Error::Registry(format!("bad secp256k1 point: {e:?}")))?;
    Ok(bytes.to_vec())
}

fn pem_encode(label: &str, der: &[u8]) -> String {
    let body = base64::encode(der);

    let mut out = format!("-----BEGIN {label}-----\n");
    for chunk in body.as_bytes().chunks(64) {
        // Base64 output is ascii, every chunk boundary is a char boundary.
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}

fn pem_decode(text: &str) -> Option<(String, Vec<u8>)> {
    let mut label: Option<String> = None;
    let mut body = String::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("-----BEGIN ") {
            label = Some(rest.strip_suffix("-----")?.to_string());
        } else if line.starts_with("-----END ") {
            break;
        } else if label.is_some() {
            body.push_str(line);
        }
    }

    let label = label?;
    let der = base64::decode(body).ok()?;
    Some((label, der))
}
