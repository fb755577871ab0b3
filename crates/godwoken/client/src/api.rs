use alloy_primitives::{Bytes, B256, U128, U32};
use godwoken_lib::{
    types::{FeeConfig, L2TransactionWithStatus},
    ShortAddress,
};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// Wire surface of a Godwoken node. Parameters are positional; numbers travel as `0x` prefixed
/// minimal hex quantities and payloads as `0x` prefixed molecule bytes.
#[rpc(server, client)]
pub trait GodwokenApi {
    #[method(name = "gw_submit_withdrawal_request")]
    async fn submit_withdrawal_request(&self, withdrawal_request: Bytes) -> RpcResult<()>;

    #[method(name = "gw_submit_l2transaction")]
    async fn submit_l2_transaction(&self, l2_transaction: Bytes) -> RpcResult<B256>;

    #[method(name = "gw_get_account_id_by_script_hash")]
    async fn get_account_id_by_script_hash(&self, script_hash: B256) -> RpcResult<Option<U32>>;

    #[method(name = "gw_get_script_hash_by_short_address")]
    async fn get_script_hash_by_short_address(
        &self,
        short_address: ShortAddress,
    ) -> RpcResult<Option<B256>>;

    #[method(name = "gw_get_nonce")]
    async fn get_nonce(&self, account_id: U32) -> RpcResult<U32>;

    #[method(name = "gw_get_script_hash")]
    async fn get_script_hash(&self, account_id: U32) -> RpcResult<B256>;

    #[method(name = "gw_get_fee_config")]
    async fn get_fee_config(&self) -> RpcResult<FeeConfig>;

    #[method(name = "gw_get_transaction")]
    async fn get_transaction(&self, tx_hash: B256) -> RpcResult<Option<L2TransactionWithStatus>>;

    #[method(name = "gw_get_balance")]
    async fn get_balance(&self, short_address: ShortAddress, sudt_id: U32) -> RpcResult<U128>;

    #[method(name = "poly_getRollupTypeHash")]
    async fn get_rollup_type_hash(&self) -> RpcResult<B256>;

    #[method(name = "poly_getEthAccountLockHash")]
    async fn get_eth_account_lock_hash(&self) -> RpcResult<B256>;
}
