use alloy_primitives::Address;
use godwoken_lib::{
    types::{Fee, L2TransactionHash},
    L2Signer,
};
use serde::Serialize;
use tracing::info;

use crate::{
    error::ClientError, BalanceSnapshot, FeeCheckError, FeeSettlement, ResolvedAccount,
    RollupClient, TransactionOrchestrator,
};

#[derive(Debug, thiserror::Error)]
pub enum CreateAccountRunError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    FeeCheck(#[from] FeeCheckError),
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountReport {
    pub target_eth_address: Address,
    pub tx_hash: L2TransactionHash,
    pub account: ResolvedAccount,
    /// `None` when the fee check was skipped.
    pub fee_settlement: Option<FeeSettlement>,
}

/// Creates the layer 2 account of `target_eth_address` paid by `signer`, then checks that the
/// fee moved from the sender to the block producer.
pub async fn run_create_account<C: RollupClient>(
    orchestrator: &TransactionOrchestrator<C>,
    signer: &L2Signer,
    target_eth_address: Address,
    fee: Fee,
    block_producer_id: u32,
    check_fee: bool,
) -> Result<CreateAccountReport, CreateAccountRunError> {
    let resolver = orchestrator.resolver();
    let sender = resolver.resolve(&signer.eth_address()).await?;
    let block_producer = resolver.resolve_id(block_producer_id).await?;
    info!(
        from_id = sender.id,
        from_address = %sender.short_address,
        block_producer = %block_producer.short_address,
        %target_eth_address,
        fee_sudt_id = fee.sudt_id,
        fee_amount = fee.amount,
        "Creating account"
    );

    let snapshot = || {
        BalanceSnapshot::fetch(
            orchestrator.client(),
            sender.short_address,
            block_producer.short_address,
            fee.sudt_id,
        )
    };
    let before = if check_fee { Some(snapshot().await?) } else { None };

    let created = orchestrator
        .create_account(signer, &target_eth_address, fee)
        .await?;
    let account = orchestrator.resolve_created_account(&created).await?;
    info!(account_id = account.id, tx_hash = %created.tx_hash, "Created account");

    let fee_settlement = match before {
        Some(before) => {
            let settlement = FeeSettlement {
                fee: fee.amount,
                before,
                after: snapshot().await?,
            };
            info!(?settlement, "Checking fee settlement");
            settlement.verify()?;
            Some(settlement)
        }
        None => None,
    };

    Ok(CreateAccountReport {
        target_eth_address,
        tx_hash: created.tx_hash,
        account,
        fee_settlement,
    })
}
