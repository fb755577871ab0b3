use std::time::Duration;

use alloy_primitives::Address;
use clap::ValueEnum;
use godwoken_lib::{
    error::ValidationError,
    types::{
        CreateAccount, Fee, L2Transaction, L2TransactionHash, L2TransactionWithStatus,
        MetaContractArgs, RawL2Transaction, RawWithdrawalRequestBuilder, RollupTx,
        TransactionStatus, META_CONTRACT_ACCOUNT_ID,
    },
    AccountIdentity, L2Signer,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, info_span, Instrument};

use crate::{
    error::ClientError,
    resolver::{AccountResolver, ResolvedAccount, RollupContext},
    RollupClient,
};

/// Which node reported status counts as settled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SettlementPolicy {
    /// The node accepted the transaction into its pool.
    #[default]
    AcceptPending,
    /// The transaction was included in a layer 2 block.
    RequireCommitted,
}

impl SettlementPolicy {
    pub fn required_status(&self) -> TransactionStatus {
        match self {
            Self::AcceptPending => TransactionStatus::Pending,
            Self::RequireCommitted => TransactionStatus::Committed,
        }
    }

    pub fn is_settled(&self, status: TransactionStatus) -> bool {
        status >= self.required_status()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
    pub policy: SettlementPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
            policy: SettlementPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAccountStage {
    Resolving,
    NonceFetched,
    Built,
    Signed,
    Submitted,
    Polling,
    Observed,
    TimedOut,
}

/// Outcome of a settled create account transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAccount {
    pub tx_hash: L2TransactionHash,
    pub status: TransactionStatus,
    /// Identity of the new account. Its id is assigned by the node once the transaction is
    /// processed.
    pub account: AccountIdentity,
}

/// Builds, signs and submits layer 2 transactions for one rollup.
///
/// The orchestrator reserves no nonces: concurrent flows that share a sender must be serialized
/// by the caller.
pub struct TransactionOrchestrator<C> {
    client: C,
    context: RollupContext,
    poll: PollConfig,
}

impl<C: RollupClient> TransactionOrchestrator<C> {
    pub fn new(client: C, context: RollupContext, poll: PollConfig) -> Self {
        Self {
            client,
            context,
            poll,
        }
    }

    /// Fetches the rollup context from the node first.
    pub async fn connect(client: C, poll: PollConfig) -> Result<Self, ClientError> {
        let context = RollupContext::fetch(&client).await?;
        Ok(Self::new(client, context, poll))
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn context(&self) -> &RollupContext {
        &self.context
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    pub fn resolver(&self) -> AccountResolver<'_, C> {
        AccountResolver::new(&self.client, &self.context)
    }

    /// Builds and signs a meta contract call that creates the layer 2 account of
    /// `target_eth_address`, paid by `signer`'s account.
    pub async fn build_create_account_tx(
        &self,
        signer: &L2Signer,
        target_eth_address: &Address,
        fee: Fee,
    ) -> Result<L2Transaction, ClientError> {
        debug!(stage = ?CreateAccountStage::Resolving);
        let sender = self.resolver().resolve(&signer.eth_address()).await?;

        let nonce = self.client.get_nonce(sender.id).await?;
        debug!(stage = ?CreateAccountStage::NonceFetched, from_id = sender.id, nonce);

        let script = godwoken_lib::eth_account_script(
            &self.context.eth_account_lock_hash,
            &self.context.rollup_type_hash,
            target_eth_address,
        );
        let args = MetaContractArgs::CreateAccount(CreateAccount { script, fee });
        let raw = RawL2Transaction::meta_contract_call(sender.id, nonce, &args);
        debug!(stage = ?CreateAccountStage::Built, raw_hash = %raw.hash());

        let receiver_script_hash = self.client.get_script_hash(META_CONTRACT_ACCOUNT_ID).await?;
        let tx = signer.sign_transaction(
            raw,
            &sender.script_hash,
            &receiver_script_hash,
            &self.context.rollup_type_hash,
        )?;
        debug!(stage = ?CreateAccountStage::Signed, tx_hash = %tx.tx_hash());

        Ok(tx)
    }

    /// Creates the account of `target_eth_address` and waits until the node reports the
    /// transaction as settled.
    pub async fn create_account(
        &self,
        signer: &L2Signer,
        target_eth_address: &Address,
        fee: Fee,
    ) -> Result<CreatedAccount, ClientError> {
        let span = info_span!("create_account", target = %target_eth_address);
        async move {
            let tx = self
                .build_create_account_tx(signer, target_eth_address, fee)
                .await?;

            let tx_hash = self.client.submit_l2_transaction(&tx).await?;
            metrics::counter!("godwoken_tx_submitted_total").increment(1);
            info!(stage = ?CreateAccountStage::Submitted, %tx_hash, "Submitted create account");

            let settled = self.wait_for_transaction(tx_hash).await?;
            Ok(CreatedAccount {
                tx_hash,
                status: settled.status,
                account: self.context.eth_account(target_eth_address),
            })
        }
        .instrument(span)
        .await
    }

    /// Polls `gw_get_transaction` at a fixed interval until the status satisfies the settlement
    /// policy. Nothing is resubmitted; callers may call this again after a timeout.
    pub async fn wait_for_transaction(
        &self,
        tx_hash: L2TransactionHash,
    ) -> Result<L2TransactionWithStatus, ClientError> {
        let PollConfig {
            interval,
            timeout,
            policy,
        } = self.poll;
        debug!(stage = ?CreateAccountStage::Polling, %tx_hash, ?interval, ?timeout, ?policy);

        let started = Instant::now();
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            metrics::counter!("godwoken_tx_poll_attempts_total").increment(1);

            match self.client.get_transaction(tx_hash).await? {
                Some(found) if policy.is_settled(found.status) => {
                    let waited = started.elapsed();
                    metrics::histogram!("godwoken_tx_settlement_ms")
                        .record(waited.as_millis() as f64);
                    info!(
                        stage = ?CreateAccountStage::Observed,
                        %tx_hash,
                        status = ?found.status,
                        attempts,
                        ?waited,
                        "Transaction settled"
                    );
                    return Ok(found);
                }
                Some(found) => {
                    debug!(%tx_hash, status = ?found.status, attempts, "Not settled yet")
                }
                None => debug!(%tx_hash, attempts, "Transaction not observed yet"),
            }

            let waited = started.elapsed();
            if waited.saturating_add(interval) >= timeout {
                info!(stage = ?CreateAccountStage::TimedOut, %tx_hash, attempts, ?waited);
                return Err(ClientError::Timeout {
                    tx_hash,
                    attempts,
                    waited,
                });
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Signs and submits a withdrawal for `signer`'s account. The account script hash and the
    /// current nonce are filled in; everything else comes from `request`.
    pub async fn submit_withdrawal(
        &self,
        signer: &L2Signer,
        request: RawWithdrawalRequestBuilder,
    ) -> Result<L2TransactionHash, ClientError> {
        let account = self.resolver().resolve(&signer.eth_address()).await?;
        let nonce = self.client.get_nonce(account.id).await?;

        let raw = request
            .nonce(nonce)
            .account_script_hash(account.script_hash)
            .build()
            .map_err(ValidationError::from)?;
        let withdrawal = signer.sign_withdrawal(raw, &self.context.rollup_type_hash)?;
        let tx_hash = withdrawal.tx_hash();

        self.client.submit_withdrawal_request(&withdrawal).await?;
        metrics::counter!("godwoken_tx_submitted_total").increment(1);
        info!(%tx_hash, from_id = account.id, nonce, "Submitted withdrawal request");
        Ok(tx_hash)
    }

    /// Looks up the id the node assigned to a created account.
    pub async fn resolve_created_account(
        &self,
        created: &CreatedAccount,
    ) -> Result<ResolvedAccount, ClientError> {
        self.resolver()
            .resolve_script_hash(created.account.script_hash)
            .await
    }
}
