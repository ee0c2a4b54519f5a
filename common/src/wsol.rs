// common/src/wsol.rs
use log::{debug, info};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use spl_token::{instruction as token_instruction, native_mint};

use crate::error::{Error, Result, TransactionError};
use crate::ledger::Ledger;

/// Wraps and unwraps SOL for one signer through its wSOL associated token account.
pub struct WsolRunner<'a, L: ?Sized, S> {
    ledger: &'a L,
    signer: &'a S,
}

impl<'a, L, S> WsolRunner<'a, L, S>
where
    L: Ledger + ?Sized,
    S: Signer,
{
    pub fn new(ledger: &'a L, signer: &'a S) -> Self {
        Self { ledger, signer }
    }

    /// The signer's wSOL ATA address. Derivation only, no ledger lookup.
    pub fn wrapped_account_address(&self) -> Pubkey {
        get_associated_token_address(&self.signer.pubkey(), &native_mint::id())
    }

    /// Look the wSOL ATA up on the ledger and create it if it is missing.
    pub async fn resolve_wrapped_account(&self) -> Result<Pubkey> {
        let owner = self.signer.pubkey();
        let ata = self.wrapped_account_address();

        let exists = self
            .ledger
            .account_exists(&ata)
            .await
            .map_err(TransactionError::from)?;
        if exists {
            debug!("wSOL account {ata} already exists");
            return Ok(ata);
        }

        info!("creating wSOL account {ata} for {owner}");
        let ix = create_associated_token_account_idempotent(
            &owner,
            &owner,
            &native_mint::id(),
            &spl_token::id(),
        );
        let sig = self.submit(&[ix]).await?;
        debug!("wSOL account created in {sig}");
        Ok(ata)
    }

    /// Move `amount` lamports into the wSOL account and sync its token balance.
    pub async fn wrap(&self, amount: u64) -> Result<Signature> {
        if amount == 0 {
            return Err(Error::InvalidAmount(amount));
        }
        let ata = self.resolve_wrapped_account().await?;
        let instructions = wrap_instructions(&self.signer.pubkey(), &ata, amount)?;

        let sig = self.submit(&instructions).await?;
        info!("wrapped {amount} lamports into {ata}");
        println!("transaction submitted with hash: {sig}");
        Ok(sig)
    }

    /// Close the wSOL account; all of its lamports go back to the signer.
    pub async fn unwrap(&self) -> Result<Signature> {
        let ata = self.resolve_wrapped_account().await?;
        let instructions = unwrap_instructions(&self.signer.pubkey(), &ata)?;

        let sig = self.submit(&instructions).await?;
        info!("closed wSOL account {ata}");
        println!("transaction submitted with hash: {sig}");
        Ok(sig)
    }

    async fn submit(&self, instructions: &[Instruction]) -> Result<Signature> {
        let payer = self.signer.pubkey();
        let blockhash = self
            .ledger
            .latest_blockhash()
            .await
            .map_err(TransactionError::from)?;

        let mut tx = Transaction::new_with_payer(instructions, Some(&payer));
        tx.try_sign(&[self.signer], blockhash)
            .map_err(TransactionError::from)?;

        let sig = self
            .ledger
            .send_and_confirm(&tx)
            .await
            .map_err(TransactionError::from)?;
        Ok(sig)
    }
}

/// Transfer then sync-native, in that order.
pub fn wrap_instructions(owner: &Pubkey, ata: &Pubkey, amount: u64) -> Result<Vec<Instruction>> {
    let sync = token_instruction::sync_native(&spl_token::id(), ata).map_err(TransactionError::from)?;
    Ok(vec![system_instruction::transfer(owner, ata, amount), sync])
}

pub fn unwrap_instructions(owner: &Pubkey, ata: &Pubkey) -> Result<Vec<Instruction>> {
    let close = token_instruction::close_account(&spl_token::id(), ata, owner, owner, &[])
        .map_err(TransactionError::from)?;
    Ok(vec![close])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use solana_client::client_error::{ClientError, ClientErrorKind};
    use solana_sdk::{hash::Hash, signature::Keypair, system_program};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory ledger: remembers submitted transactions, marks ATAs as created.
    #[derive(Default)]
    struct RecordingLedger {
        accounts: Mutex<HashSet<Pubkey>>,
        sent: Mutex<Vec<Transaction>>,
        fail_lookup: bool,
        fail_send: bool,
    }

    impl RecordingLedger {
        fn with_account(address: Pubkey) -> Self {
            let ledger = Self::default();
            ledger.accounts.lock().unwrap().insert(address);
            ledger
        }

        fn sent(&self) -> Vec<Transaction> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Ledger for RecordingLedger {
        async fn account_exists(&self, address: &Pubkey) -> Result<bool, ClientError> {
            if self.fail_lookup {
                return Err(ClientErrorKind::Custom("account lookup timed out".to_string()).into());
            }
            Ok(self.accounts.lock().unwrap().contains(address))
        }

        async fn latest_blockhash(&self) -> Result<Hash, ClientError> {
            Ok(Hash::new_from_array([7; 32]))
        }

        async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature, ClientError> {
            if self.fail_send {
                return Err(ClientErrorKind::Custom("node unhealthy".to_string()).into());
            }
            for ix in &tx.message.instructions {
                if tx.message.account_keys[ix.program_id_index as usize]
                    == spl_associated_token_account::id()
                {
                    // ATA is the second account of the create instruction
                    let ata = tx.message.account_keys[ix.accounts[1] as usize];
                    self.accounts.lock().unwrap().insert(ata);
                }
            }
            self.sent.lock().unwrap().push(tx.clone());
            Ok(tx.signatures[0])
        }
    }

    fn program_ids(tx: &Transaction) -> Vec<Pubkey> {
        tx.message
            .instructions
            .iter()
            .map(|ix| tx.message.account_keys[ix.program_id_index as usize])
            .collect()
    }

    #[tokio::test]
    async fn wrap_sends_transfer_then_sync() {
        let kp = Keypair::new();
        let ata = get_associated_token_address(&kp.pubkey(), &native_mint::id());
        let ledger = RecordingLedger::with_account(ata);
        let runner = WsolRunner::new(&ledger, &kp);

        let sig = runner.wrap(1000).await.unwrap();

        let sent = ledger.sent();
        assert_eq!(sent.len(), 1);
        let tx = &sent[0];
        assert_eq!(tx.signatures[0], sig);
        assert_eq!(program_ids(tx), vec![system_program::id(), spl_token::id()]);

        let expected = wrap_instructions(&kp.pubkey(), &ata, 1000).unwrap();
        let mut expected_tx = Transaction::new_with_payer(&expected, Some(&kp.pubkey()));
        expected_tx.sign(&[&kp], Hash::new_from_array([7; 32]));
        assert_eq!(tx.message, expected_tx.message);
        tx.verify().unwrap();
    }

    #[test]
    fn wrap_instructions_target_the_ata() {
        let owner = Pubkey::new_unique();
        let ata = get_associated_token_address(&owner, &native_mint::id());
        let ixs = wrap_instructions(&owner, &ata, 1000).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0], system_instruction::transfer(&owner, &ata, 1000));
        assert_eq!(ixs[1].program_id, spl_token::id());
        assert_eq!(ixs[1].accounts.len(), 1);
        assert_eq!(ixs[1].accounts[0].pubkey, ata);
    }

    #[test]
    fn unwrap_instruction_closes_to_owner() {
        let owner = Pubkey::new_unique();
        let ata = get_associated_token_address(&owner, &native_mint::id());
        let ixs = unwrap_instructions(&owner, &ata).unwrap();

        assert_eq!(ixs.len(), 1);
        let close = &ixs[0];
        assert_eq!(close.program_id, spl_token::id());
        let keys: Vec<Pubkey> = close.accounts.iter().map(|m| m.pubkey).collect();
        // account, destination, authority
        assert_eq!(keys, vec![ata, owner, owner]);
        assert!(close.accounts[2].is_signer);
    }

    #[tokio::test]
    async fn unwrap_sends_single_close() {
        let kp = Keypair::new();
        let ata = get_associated_token_address(&kp.pubkey(), &native_mint::id());
        let ledger = RecordingLedger::with_account(ata);
        let runner = WsolRunner::new(&ledger, &kp);

        runner.unwrap().await.unwrap();

        let sent = ledger.sent();
        assert_eq!(sent.len(), 1);
        let tx = &sent[0];
        assert_eq!(program_ids(tx), vec![spl_token::id()]);
        let close = &tx.message.instructions[0];
        assert_eq!(tx.message.account_keys[close.accounts[0] as usize], ata);
    }

    #[tokio::test]
    async fn missing_ata_is_created_first() {
        let kp = Keypair::new();
        let ledger = RecordingLedger::default();
        let runner = WsolRunner::new(&ledger, &kp);

        let ata = runner.resolve_wrapped_account().await.unwrap();
        assert_eq!(ata, runner.wrapped_account_address());

        let sent = ledger.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(program_ids(&sent[0]), vec![spl_associated_token_account::id()]);

        // second lookup finds it and sends nothing
        runner.resolve_wrapped_account().await.unwrap();
        assert_eq!(ledger.sent().len(), 1);
    }

    #[tokio::test]
    async fn wrap_with_fresh_account_sends_create_then_wrap() {
        let kp = Keypair::new();
        let ledger = RecordingLedger::default();
        let runner = WsolRunner::new(&ledger, &kp);

        runner.wrap(5_000).await.unwrap();

        let sent = ledger.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(program_ids(&sent[0]), vec![spl_associated_token_account::id()]);
        assert_eq!(program_ids(&sent[1]), vec![system_program::id(), spl_token::id()]);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected_before_any_call() {
        let kp = Keypair::new();
        let ledger = RecordingLedger::default();
        let runner = WsolRunner::new(&ledger, &kp);

        assert!(matches!(runner.wrap(0).await, Err(Error::InvalidAmount(0))));
        assert!(ledger.sent().is_empty());
    }

    #[tokio::test]
    async fn send_failure_surfaces_as_transaction_error() {
        let kp = Keypair::new();
        let ata = get_associated_token_address(&kp.pubkey(), &native_mint::id());
        let ledger = RecordingLedger {
            fail_send: true,
            ..RecordingLedger::with_account(ata)
        };
        let runner = WsolRunner::new(&ledger, &kp);

        let err = runner.unwrap().await.unwrap_err();
        assert!(matches!(err, Error::Transaction(TransactionError::Rpc(_))));
        assert!(err.to_string().contains("node unhealthy"));
    }

    #[tokio::test]
    async fn lookup_failure_surfaces_as_transaction_error() {
        let kp = Keypair::new();
        let ledger = RecordingLedger {
            fail_lookup: true,
            ..RecordingLedger::default()
        };
        let runner = WsolRunner::new(&ledger, &kp);

        let err = runner.wrap(1000).await.unwrap_err();
        assert!(matches!(err, Error::Transaction(TransactionError::Rpc(_))));
        assert!(err.to_string().contains("account lookup timed out"));
        assert!(ledger.sent().is_empty());

        assert!(matches!(
            runner.unwrap().await,
            Err(Error::Transaction(TransactionError::Rpc(_)))
        ));
        assert!(ledger.sent().is_empty());
    }
}
