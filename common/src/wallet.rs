// common/src/wallet.rs
//! Turns the configured wallet secret into a signing [`Keypair`].
//!
//! Three encodings are accepted, checked in this order:
//!
//! 1. a JSON array of the 64 keypair bytes (`solana-keygen` file contents),
//! 2. a BIP-39 mnemonic phrase, derived at `m/44'/501'/0'/0'`,
//! 3. a base58 string of the 64 keypair bytes (Phantom-style export).
//!
//! Nothing here touches the network or the filesystem.

use bip39::{Language, Mnemonic};
use log::debug;
use solana_sdk::{
    derivation_path::DerivationPath,
    signature::{keypair_from_seed_and_derivation_path, Keypair},
};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

const KEYPAIR_LENGTH: usize = 64;

/// Which encoding a secret string is in, decided purely from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretMaterial<'a> {
    RawBytes(&'a str),
    Mnemonic(&'a str),
    Base58(&'a str),
}

impl<'a> SecretMaterial<'a> {
    pub fn classify(secret: &'a str) -> Self {
        let secret = secret.trim();
        if secret.starts_with('[') {
            SecretMaterial::RawBytes(secret)
        } else if secret.split_whitespace().nth(1).is_some() {
            SecretMaterial::Mnemonic(secret)
        } else {
            SecretMaterial::Base58(secret)
        }
    }
}

/// Load a keypair from any of the supported secret encodings.
pub fn load_wallet(secret: &str) -> Result<Keypair> {
    let material = SecretMaterial::classify(secret);
    let kp = match material {
        SecretMaterial::RawBytes(json) => keypair_from_json(json)?,
        SecretMaterial::Mnemonic(phrase) => keypair_from_mnemonic(phrase)?,
        SecretMaterial::Base58(encoded) => keypair_from_base58(encoded)?,
    };
    debug!("wallet loaded from {} secret", material.kind());
    Ok(kp)
}

impl SecretMaterial<'_> {
    fn kind(&self) -> &'static str {
        match self {
            SecretMaterial::RawBytes(_) => "byte array",
            SecretMaterial::Mnemonic(_) => "mnemonic",
            SecretMaterial::Base58(_) => "base58",
        }
    }
}

fn keypair_from_json(json: &str) -> Result<Keypair> {
    let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
        serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?,
    );
    keypair_from_bytes(&bytes).map_err(Error::Parse)
}

fn keypair_from_mnemonic(phrase: &str) -> Result<Keypair> {
    let normalized = Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "));
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| Error::Derivation(e.to_string()))?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));

    // m/44'/501'/0'/0'
    let path = DerivationPath::new_bip44(Some(0), Some(0));
    keypair_from_seed_and_derivation_path(&seed[..], Some(path))
        .map_err(|e| Error::Derivation(e.to_string()))
}

fn keypair_from_base58(encoded: &str) -> Result<Keypair> {
    let bytes = Zeroizing::new(
        bs58::decode(encoded)
            .into_vec()
            .map_err(|e| Error::Decode(e.to_string()))?,
    );
    keypair_from_bytes(&bytes).map_err(Error::Decode)
}

fn keypair_from_bytes(bytes: &[u8]) -> std::result::Result<Keypair, String> {
    if bytes.len() != KEYPAIR_LENGTH {
        return Err(format!("expected {KEYPAIR_LENGTH} bytes, got {}", bytes.len()));
    }
    Keypair::from_bytes(bytes).map_err(|e| e.to_string())
}
