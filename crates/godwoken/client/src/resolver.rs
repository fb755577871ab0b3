use alloy_primitives::{Address, B256};
use godwoken_lib::{short_address, AccountIdentity, ShortAddress};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{error::ClientError, RollupClient};

/// Identity of the rollup a node serves. Both hashes enter every layer 2 script and signing
/// message, so they are fetched once per flow and passed along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupContext {
    pub rollup_type_hash: B256,
    pub eth_account_lock_hash: B256,
}

impl RollupContext {
    pub async fn fetch<C: RollupClient + ?Sized>(client: &C) -> Result<Self, ClientError> {
        let rollup_type_hash = client.get_rollup_type_hash().await?;
        let eth_account_lock_hash = client.get_eth_account_lock_hash().await?;
        debug!(%rollup_type_hash, %eth_account_lock_hash, "Fetched rollup context");
        Ok(Self {
            rollup_type_hash,
            eth_account_lock_hash,
        })
    }

    pub fn eth_account(&self, eth_address: &Address) -> AccountIdentity {
        AccountIdentity::for_eth_address(
            &self.eth_account_lock_hash,
            &self.rollup_type_hash,
            eth_address,
        )
    }
}

/// A layer 2 account that exists on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAccount {
    pub id: u32,
    pub script_hash: B256,
    pub short_address: ShortAddress,
}

/// Maps Ethereum addresses and script hashes to registered account ids. Every call queries the
/// node.
pub struct AccountResolver<'a, C: ?Sized> {
    client: &'a C,
    context: &'a RollupContext,
}

impl<'a, C: RollupClient + ?Sized> AccountResolver<'a, C> {
    pub fn new(client: &'a C, context: &'a RollupContext) -> Self {
        Self { client, context }
    }

    /// `None` when the account has not been created yet.
    #[instrument(skip(self))]
    pub async fn lookup(
        &self,
        eth_address: &Address,
    ) -> Result<Option<ResolvedAccount>, ClientError> {
        let identity = self.context.eth_account(eth_address);
        self.lookup_script_hash(identity.script_hash).await
    }

    pub async fn resolve(&self, eth_address: &Address) -> Result<ResolvedAccount, ClientError> {
        let identity = self.context.eth_account(eth_address);
        self.resolve_script_hash(identity.script_hash).await
    }

    pub async fn lookup_script_hash(
        &self,
        script_hash: B256,
    ) -> Result<Option<ResolvedAccount>, ClientError> {
        let account_id = self.client.get_account_id_by_script_hash(script_hash).await?;
        Ok(account_id.map(|id| ResolvedAccount {
            id,
            script_hash,
            short_address: short_address(&script_hash),
        }))
    }

    pub async fn resolve_script_hash(
        &self,
        script_hash: B256,
    ) -> Result<ResolvedAccount, ClientError> {
        self.lookup_script_hash(script_hash)
            .await?
            .ok_or(ClientError::AccountNotFound { script_hash })
    }

    /// Reverse lookup for accounts known by id, such as the block producer.
    pub async fn resolve_id(&self, id: u32) -> Result<ResolvedAccount, ClientError> {
        let script_hash = self.client.get_script_hash(id).await?;
        Ok(ResolvedAccount {
            id,
            script_hash,
            short_address: short_address(&script_hash),
        })
    }

    /// Finds the script hash behind a short address, then its account id.
    pub async fn lookup_short_address(
        &self,
        short_address: ShortAddress,
    ) -> Result<Option<ResolvedAccount>, ClientError> {
        match self
            .client
            .get_script_hash_by_short_address(short_address)
            .await?
        {
            Some(script_hash) => self.lookup_script_hash(script_hash).await,
            None => Ok(None),
        }
    }
}
