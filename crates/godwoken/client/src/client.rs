use std::time::Duration;

use alloy_primitives::{B256, U32};
use async_trait::async_trait;
use godwoken_lib::{
    types::{
        FeeConfig, L2Transaction, L2TransactionHash, L2TransactionWithStatus, RollupTx,
        WithdrawalRequest,
    },
    ShortAddress,
};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use tracing::{debug, instrument};
use url::Url;

use crate::{error::ClientError, GodwokenApiClient};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed access to a Godwoken node. Every method maps to exactly one RPC call; nothing is cached
/// and no call is retried.
#[async_trait]
pub trait RollupClient: Send + Sync {
    async fn submit_withdrawal_request(&self, request: &WithdrawalRequest)
        -> Result<(), ClientError>;

    async fn submit_l2_transaction(
        &self,
        tx: &L2Transaction,
    ) -> Result<L2TransactionHash, ClientError>;

    async fn get_account_id_by_script_hash(
        &self,
        script_hash: B256,
    ) -> Result<Option<u32>, ClientError>;

    async fn get_script_hash_by_short_address(
        &self,
        short_address: ShortAddress,
    ) -> Result<Option<B256>, ClientError>;

    async fn get_nonce(&self, account_id: u32) -> Result<u32, ClientError>;

    async fn get_script_hash(&self, account_id: u32) -> Result<B256, ClientError>;

    async fn get_fee_config(&self) -> Result<FeeConfig, ClientError>;

    async fn get_transaction(
        &self,
        tx_hash: L2TransactionHash,
    ) -> Result<Option<L2TransactionWithStatus>, ClientError>;

    async fn get_balance(
        &self,
        short_address: ShortAddress,
        sudt_id: u32,
    ) -> Result<u128, ClientError>;

    async fn get_rollup_type_hash(&self) -> Result<B256, ClientError>;

    async fn get_eth_account_lock_hash(&self) -> Result<B256, ClientError>;
}

/// JSON-RPC over HTTP implementation of [`RollupClient`].
#[derive(Clone, Debug)]
pub struct GodwokenClient {
    inner: HttpClient,
    url: Url,
}

#[derive(Clone, Debug)]
pub struct GodwokenClientBuilder {
    url: Url,
    request_timeout: Duration,
}

impl GodwokenClientBuilder {
    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn build(self) -> Result<GodwokenClient, ClientError> {
        let inner = HttpClientBuilder::default()
            .request_timeout(self.request_timeout)
            .build(self.url.as_str())
            .map_err(|err| ClientError::InvalidEndpoint(format!("{}: {err}", self.url)))?;
        Ok(GodwokenClient {
            inner,
            url: self.url,
        })
    }
}

impl GodwokenClient {
    pub fn builder(url: Url) -> GodwokenClientBuilder {
        GodwokenClientBuilder {
            url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn new(url: Url) -> Result<Self, ClientError> {
        Self::builder(url).build()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RollupClient for GodwokenClient {
    #[instrument(skip_all, fields(tx_hash = %request.tx_hash()))]
    async fn submit_withdrawal_request(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<(), ClientError> {
        debug!("Submitting withdrawal request");
        self.inner
            .submit_withdrawal_request(request.tx_bytes().clone())
            .await
            .map_err(ClientError::rpc("gw_submit_withdrawal_request"))
    }

    #[instrument(skip_all, fields(tx_hash = %tx.tx_hash()))]
    async fn submit_l2_transaction(
        &self,
        tx: &L2Transaction,
    ) -> Result<L2TransactionHash, ClientError> {
        debug!("Submitting layer 2 transaction");
        self.inner
            .submit_l2_transaction(tx.tx_bytes().clone())
            .await
            .map_err(ClientError::rpc("gw_submit_l2transaction"))
    }

    #[instrument(skip(self))]
    async fn get_account_id_by_script_hash(
        &self,
        script_hash: B256,
    ) -> Result<Option<u32>, ClientError> {
        let account_id = self
            .inner
            .get_account_id_by_script_hash(script_hash)
            .await
            .map_err(ClientError::rpc("gw_get_account_id_by_script_hash"))?;
        Ok(account_id.map(|id| id.to::<u32>()))
    }

    #[instrument(skip(self))]
    async fn get_script_hash_by_short_address(
        &self,
        short_address: ShortAddress,
    ) -> Result<Option<B256>, ClientError> {
        self.inner
            .get_script_hash_by_short_address(short_address)
            .await
            .map_err(ClientError::rpc("gw_get_script_hash_by_short_address"))
    }

    #[instrument(skip(self))]
    async fn get_nonce(&self, account_id: u32) -> Result<u32, ClientError> {
        let nonce = self
            .inner
            .get_nonce(U32::from(account_id))
            .await
            .map_err(ClientError::rpc("gw_get_nonce"))?;
        Ok(nonce.to::<u32>())
    }

    #[instrument(skip(self))]
    async fn get_script_hash(&self, account_id: u32) -> Result<B256, ClientError> {
        self.inner
            .get_script_hash(U32::from(account_id))
            .await
            .map_err(ClientError::rpc("gw_get_script_hash"))
    }

    #[instrument(skip(self))]
    async fn get_fee_config(&self) -> Result<FeeConfig, ClientError> {
        self.inner
            .get_fee_config()
            .await
            .map_err(ClientError::rpc("gw_get_fee_config"))
    }

    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        tx_hash: L2TransactionHash,
    ) -> Result<Option<L2TransactionWithStatus>, ClientError> {
        self.inner
            .get_transaction(tx_hash)
            .await
            .map_err(ClientError::rpc("gw_get_transaction"))
    }

    #[instrument(skip(self))]
    async fn get_balance(
        &self,
        short_address: ShortAddress,
        sudt_id: u32,
    ) -> Result<u128, ClientError> {
        let balance = self
            .inner
            .get_balance(short_address, U32::from(sudt_id))
            .await
            .map_err(ClientError::rpc("gw_get_balance"))?;
        Ok(balance.to::<u128>())
    }

    #[instrument(skip(self))]
    async fn get_rollup_type_hash(&self) -> Result<B256, ClientError> {
        self.inner
            .get_rollup_type_hash()
            .await
            .map_err(ClientError::rpc("poly_getRollupTypeHash"))
    }

    #[instrument(skip(self))]
    async fn get_eth_account_lock_hash(&self) -> Result<B256, ClientError> {
        self.inner
            .get_eth_account_lock_hash()
            .await
            .map_err(ClientError::rpc("poly_getEthAccountLockHash"))
    }
}
