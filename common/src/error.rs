// common/src/error.rs
use solana_client::client_error::ClientError;
use solana_sdk::{program_error::ProgramError, signer::SignerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not set")]
    ConfigMissing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    /// Secret looked like a JSON byte array but could not be turned into a keypair
    #[error("failed to parse secret key bytes: {0}")]
    Parse(String),

    /// Secret looked like a mnemonic phrase but no key could be derived from it
    #[error("failed to derive key from mnemonic: {0}")]
    Derivation(String),

    /// Secret was treated as base58 and did not decode to a keypair
    #[error("failed to decode base58 secret key: {0}")]
    Decode(String),

    #[error("wrap amount must be greater than zero, got {0} lamports")]
    InvalidAmount(u64),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Anything that went wrong between resolving the wSOL account and confirmation.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("rpc request failed: {0}")]
    Rpc(#[from] ClientError),

    #[error("failed to build instruction: {0}")]
    Instruction(#[from] ProgramError),

    #[error("failed to sign transaction: {0}")]
    Signing(#[from] SignerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
