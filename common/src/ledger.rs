// common/src/ledger.rs
use async_trait::async_trait;
use solana_client::{client_error::ClientError, nonblocking::rpc_client::RpcClient};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

/// The ledger calls the wSOL flows depend on.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn account_exists(&self, address: &Pubkey) -> Result<bool, ClientError>;

    async fn latest_blockhash(&self) -> Result<Hash, ClientError>;

    /// Submit and block until the client's commitment level is reached.
    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature, ClientError>;
}

#[async_trait]
impl Ledger for RpcClient {
    async fn account_exists(&self, address: &Pubkey) -> Result<bool, ClientError> {
        let resp = self
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await?;
        Ok(resp.value.is_some())
    }

    async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
        self.get_latest_blockhash().await
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature, ClientError> {
        self.send_and_confirm_transaction(tx).await
    }
}
