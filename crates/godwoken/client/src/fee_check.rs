use godwoken_lib::ShortAddress;
use serde::Serialize;
use thiserror::Error;

use crate::{error::ClientError, RollupClient};

/// Balances of the fee payer and of the block producer in the fee token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSnapshot {
    pub sender: u128,
    pub block_producer: u128,
}

impl BalanceSnapshot {
    pub async fn fetch<C: RollupClient + ?Sized>(
        client: &C,
        sender: ShortAddress,
        block_producer: ShortAddress,
        sudt_id: u32,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            sender: client.get_balance(sender, sudt_id).await?,
            block_producer: client.get_balance(block_producer, sudt_id).await?,
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeeCheckError {
    #[error("sender balance {before} is not balance after create {after} + fee {fee}")]
    Sender { before: u128, after: u128, fee: u128 },
    #[error("block producer balance {before} is not balance after create {after} - fee {fee}")]
    BlockProducer { before: u128, after: u128, fee: u128 },
}

/// Balance movement expected from paying `fee`: the sender loses exactly the fee and the block
/// producer gains exactly the fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeSettlement {
    pub fee: u128,
    pub before: BalanceSnapshot,
    pub after: BalanceSnapshot,
}

impl FeeSettlement {
    pub fn verify(&self) -> Result<(), FeeCheckError> {
        let Self { fee, before, after } = *self;

        if after.sender.checked_add(fee) != Some(before.sender) {
            return Err(FeeCheckError::Sender {
                before: before.sender,
                after: after.sender,
                fee,
            });
        }
        if after.block_producer.checked_sub(fee) != Some(before.block_producer) {
            return Err(FeeCheckError::BlockProducer {
                before: before.block_producer,
                after: after.block_producer,
                fee,
            });
        }
        Ok(())
    }
}
