//! In-memory rollup used by the unit tests, reachable directly through [`RollupClient`] or over
//! HTTP through [`MockNode`].

use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
};

use alloy_primitives::{Bytes, B256, U128, U32};
use async_trait::async_trait;
use godwoken_lib::{
    generate_transaction_message, generate_withdrawal_message,
    molecule::MoleculeDecode,
    recover_address, short_address,
    test_utils::{
        ETH_ACCOUNT_LOCK_HASH, META_CONTRACT_SCRIPT_HASH, ROLLUP_TYPE_HASH, SENDER_ACCOUNT_ID,
        SENDER_SCRIPT_HASH,
    },
    types::{
        FeeConfig, L2Transaction, L2TransactionHash, L2TransactionWithStatus, MetaContractArgs,
        RollupTx, SudtFeeConfig, TransactionStatus, WithdrawalRequest, META_CONTRACT_ACCOUNT_ID,
    },
    AccountIdentity, L2Signature, ShortAddress, SigningMessage,
};
use jsonrpsee::{
    core::RpcResult,
    server::{Server, ServerHandle},
    types::{error::ErrorCode, ErrorObjectOwned},
};
use url::Url;

use crate::{error::ClientError, GodwokenApiServer, RollupClient};

pub const SENDER_INITIAL_BALANCE: u128 = 1_000_000;
pub const FEE_SUDT_ID: u32 = 1;

#[derive(Debug)]
struct MockState {
    script_hashes: BTreeMap<u32, B256>,
    nonces: HashMap<u32, u32>,
    balances: HashMap<(ShortAddress, u32), u128>,
    transactions: HashMap<L2TransactionHash, L2TransactionWithStatus>,
    scripted_transactions: VecDeque<Option<L2TransactionWithStatus>>,
    failures: HashMap<&'static str, String>,
    calls: HashMap<&'static str, u32>,
    submitted: Vec<Bytes>,
    charge_fees: bool,
}

impl MockState {
    fn nonce(&self, account_id: u32) -> u32 {
        self.nonces.get(&account_id).copied().unwrap_or_default()
    }

    fn account_id(&self, script_hash: &B256) -> Option<u32> {
        self.script_hashes
            .iter()
            .find_map(|(id, hash)| (hash == script_hash).then_some(*id))
    }

    fn balance(&self, short_address: ShortAddress, sudt_id: u32) -> u128 {
        self.balances
            .get(&(short_address, sudt_id))
            .copied()
            .unwrap_or_default()
    }
}

/// A rollup with the meta contract at id 0, which also collects fees, and the test signer's
/// account at [`SENDER_ACCOUNT_ID`]. Accepted transactions are reported as pending.
#[derive(Clone, Debug)]
pub struct MockRollup {
    state: Arc<Mutex<MockState>>,
}

impl MockRollup {
    pub const FIRST_NEW_ACCOUNT_ID: u32 = SENDER_ACCOUNT_ID + 1;
    pub const BLOCK_PRODUCER_ID: u32 = 0;

    pub fn new() -> Self {
        let script_hashes = BTreeMap::from([
            (META_CONTRACT_ACCOUNT_ID, META_CONTRACT_SCRIPT_HASH),
            (SENDER_ACCOUNT_ID, SENDER_SCRIPT_HASH),
        ]);
        let balances = HashMap::from([(
            (short_address(&SENDER_SCRIPT_HASH), FEE_SUDT_ID),
            SENDER_INITIAL_BALANCE,
        )]);
        Self {
            state: Arc::new(Mutex::new(MockState {
                script_hashes,
                nonces: HashMap::new(),
                balances,
                transactions: HashMap::new(),
                scripted_transactions: VecDeque::new(),
                failures: HashMap::new(),
                calls: HashMap::new(),
                submitted: Vec::new(),
                charge_fees: true,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Counts the call and fails it if a failure was scheduled for `method`.
    fn record(&self, method: &'static str) -> Result<MutexGuard<'_, MockState>, ClientError> {
        let mut state = self.state();
        *state.calls.entry(method).or_default() += 1;
        match state.failures.remove(method) {
            Some(message) => Err(rejection(method, message)),
            None => Ok(state),
        }
    }

    pub fn calls(&self, method: &str) -> u32 {
        self.state().calls.get(method).copied().unwrap_or_default()
    }

    pub fn submitted(&self) -> Vec<Bytes> {
        self.state().submitted.clone()
    }

    pub fn set_nonce(&self, account_id: u32, nonce: u32) {
        self.state().nonces.insert(account_id, nonce);
    }

    /// Answers the next `gw_get_transaction` calls with `responses`, in order, before falling
    /// back to the transactions actually submitted.
    pub fn script_transaction_responses(
        &self,
        responses: impl IntoIterator<Item = Option<L2TransactionWithStatus>>,
    ) {
        self.state().scripted_transactions.extend(responses);
    }

    /// Rejects the next call to `method` with an RPC error carrying `message`.
    pub fn fail_next(&self, method: &'static str, message: impl Into<String>) {
        self.state().failures.insert(method, message.into());
    }

    /// Accept account creations without moving the fee.
    pub fn waive_fees(&self) {
        self.state().charge_fees = false;
    }

    fn verify_signer(
        message: &SigningMessage,
        signature: &L2Signature,
        script_hash: &B256,
    ) -> Result<(), String> {
        let signer = recover_address(message, signature).map_err(|err| err.to_string())?;
        let identity =
            AccountIdentity::for_eth_address(&ETH_ACCOUNT_LOCK_HASH, &ROLLUP_TYPE_HASH, &signer);
        if identity.script_hash != *script_hash {
            return Err(format!("signature does not match account {script_hash}"));
        }
        Ok(())
    }
}

fn rejection(method: &'static str, message: impl Into<String>) -> ClientError {
    ClientError::Rpc {
        method,
        source: jsonrpsee::core::ClientError::Call(ErrorObjectOwned::owned(
            ErrorCode::InvalidParams.code(),
            message.into(),
            None::<()>,
        )),
    }
}

#[async_trait]
impl RollupClient for MockRollup {
    async fn submit_withdrawal_request(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<(), ClientError> {
        const METHOD: &str = "gw_submit_withdrawal_request";
        let mut state = self.record(METHOD)?;
        state.submitted.push(request.tx_bytes().clone());

        let raw = request.raw();
        let account_id = state
            .account_id(&raw.account_script_hash)
            .ok_or_else(|| rejection(METHOD, "unknown account"))?;
        let expected = state.nonce(account_id);
        if raw.nonce != expected {
            return Err(rejection(
                METHOD,
                format!("invalid nonce: expected {expected}, got {}", raw.nonce),
            ));
        }
        let message = generate_withdrawal_message(raw, &ROLLUP_TYPE_HASH);
        Self::verify_signer(&message, request.signature(), &raw.account_script_hash)
            .map_err(|err| rejection(METHOD, format!("invalid signature: {err}")))?;

        state.nonces.insert(account_id, expected + 1);
        Ok(())
    }

    async fn submit_l2_transaction(
        &self,
        tx: &L2Transaction,
    ) -> Result<L2TransactionHash, ClientError> {
        const METHOD: &str = "gw_submit_l2transaction";
        let mut state = self.record(METHOD)?;
        state.submitted.push(tx.tx_bytes().clone());

        let raw = tx.raw();
        let expected = state.nonce(raw.from_id);
        if raw.nonce != expected {
            return Err(rejection(
                METHOD,
                format!("invalid nonce: expected {expected}, got {}", raw.nonce),
            ));
        }
        let (Some(sender), Some(receiver)) = (
            state.script_hashes.get(&raw.from_id).copied(),
            state.script_hashes.get(&raw.to_id).copied(),
        ) else {
            return Err(rejection(METHOD, "unknown account"));
        };
        let message = generate_transaction_message(raw, &sender, &receiver, &ROLLUP_TYPE_HASH);
        Self::verify_signer(&message, tx.signature(), &sender)
            .map_err(|err| rejection(METHOD, format!("invalid signature: {err}")))?;

        if raw.to_id == META_CONTRACT_ACCOUNT_ID {
            let MetaContractArgs::CreateAccount(create) = MetaContractArgs::decode_molecule(
                &raw.args,
            )
            .map_err(|err| rejection(METHOD, format!("invalid meta contract args: {err}")))?;

            let script_hash = create.script.hash();
            if state.account_id(&script_hash).is_some() {
                return Err(rejection(METHOD, "account already exists"));
            }

            if state.charge_fees {
                let payer = (short_address(&sender), create.fee.sudt_id);
                let balance = state.balance(payer.0, payer.1);
                let remaining = balance
                    .checked_sub(create.fee.amount)
                    .ok_or_else(|| rejection(METHOD, "insufficient balance"))?;
                state.balances.insert(payer, remaining);

                let producer = short_address(&state.script_hashes[&Self::BLOCK_PRODUCER_ID]);
                *state
                    .balances
                    .entry((producer, create.fee.sudt_id))
                    .or_default() += create.fee.amount;
            }

            let account_id = state
                .script_hashes
                .keys()
                .next_back()
                .map_or(0, |id| id + 1);
            state.script_hashes.insert(account_id, script_hash);
        }

        state.nonces.insert(raw.from_id, expected + 1);
        let tx_hash = tx.tx_hash();
        state.transactions.insert(
            tx_hash,
            L2TransactionWithStatus {
                transaction: tx.clone(),
                status: TransactionStatus::Pending,
            },
        );
        Ok(tx_hash)
    }

    async fn get_account_id_by_script_hash(
        &self,
        script_hash: B256,
    ) -> Result<Option<u32>, ClientError> {
        let state = self.record("gw_get_account_id_by_script_hash")?;
        Ok(state.account_id(&script_hash))
    }

    async fn get_script_hash_by_short_address(
        &self,
        short_address: ShortAddress,
    ) -> Result<Option<B256>, ClientError> {
        let state = self.record("gw_get_script_hash_by_short_address")?;
        Ok(state
            .script_hashes
            .values()
            .find(|hash| hash.starts_with(short_address.as_slice()))
            .copied())
    }

    async fn get_nonce(&self, account_id: u32) -> Result<u32, ClientError> {
        let state = self.record("gw_get_nonce")?;
        Ok(state.nonce(account_id))
    }

    async fn get_script_hash(&self, account_id: u32) -> Result<B256, ClientError> {
        let state = self.record("gw_get_script_hash")?;
        Ok(state
            .script_hashes
            .get(&account_id)
            .copied()
            .unwrap_or_default())
    }

    async fn get_fee_config(&self) -> Result<FeeConfig, ClientError> {
        self.record("gw_get_fee_config")?;
        Ok(FeeConfig {
            meta_cycles_limit: 20_000,
            sudt_cycles_limit: 20_000,
            withdraw_cycles_limit: 20_000,
            sudt_fee_rate_weight: vec![SudtFeeConfig {
                sudt_id: FEE_SUDT_ID,
                fee_rate_weight: 1,
            }],
        })
    }

    async fn get_transaction(
        &self,
        tx_hash: L2TransactionHash,
    ) -> Result<Option<L2TransactionWithStatus>, ClientError> {
        let mut state = self.record("gw_get_transaction")?;
        match state.scripted_transactions.pop_front() {
            Some(response) => Ok(response),
            None => Ok(state.transactions.get(&tx_hash).cloned()),
        }
    }

    async fn get_balance(
        &self,
        short_address: ShortAddress,
        sudt_id: u32,
    ) -> Result<u128, ClientError> {
        let state = self.record("gw_get_balance")?;
        Ok(state.balance(short_address, sudt_id))
    }

    async fn get_rollup_type_hash(&self) -> Result<B256, ClientError> {
        self.record("poly_getRollupTypeHash")?;
        Ok(ROLLUP_TYPE_HASH)
    }

    async fn get_eth_account_lock_hash(&self) -> Result<B256, ClientError> {
        self.record("poly_getEthAccountLockHash")?;
        Ok(ETH_ACCOUNT_LOCK_HASH)
    }
}

impl Default for MockRollup {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON-RPC server in front of a [`MockRollup`], listening on an ephemeral local port.
pub struct MockNode {
    handle: ServerHandle,
    addr: SocketAddr,
    rollup: MockRollup,
}

struct MockNodeApi {
    rollup: MockRollup,
}

impl MockNode {
    pub async fn start() -> eyre::Result<Self> {
        Self::with_rollup(MockRollup::new()).await
    }

    pub async fn with_rollup(rollup: MockRollup) -> eyre::Result<Self> {
        let server = Server::builder().build("127.0.0.1:0").await?;
        let addr = server.local_addr()?;
        let api = MockNodeApi {
            rollup: rollup.clone(),
        };
        let handle = server.start(api.into_rpc());
        Ok(Self {
            handle,
            addr,
            rollup,
        })
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn submitted(&self) -> Vec<Bytes> {
        self.rollup.submitted()
    }

    pub async fn stop(self) {
        let _ = self.handle.stop();
        self.handle.stopped().await;
    }
}

fn into_error_object(err: ClientError) -> ErrorObjectOwned {
    err.rpc_error_object().cloned().unwrap_or_else(|| {
        ErrorObjectOwned::owned(ErrorCode::InternalError.code(), err.to_string(), None::<()>)
    })
}

fn invalid_bytes(err: impl std::fmt::Display) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        ErrorCode::InvalidParams.code(),
        format!("invalid molecule bytes: {err}"),
        None::<()>,
    )
}

#[async_trait]
impl GodwokenApiServer for MockNodeApi {
    async fn submit_withdrawal_request(&self, withdrawal_request: Bytes) -> RpcResult<()> {
        let request =
            WithdrawalRequest::decode_molecule(&withdrawal_request).map_err(invalid_bytes)?;
        self.rollup
            .submit_withdrawal_request(&request)
            .await
            .map_err(into_error_object)
    }

    async fn submit_l2_transaction(&self, l2_transaction: Bytes) -> RpcResult<B256> {
        let tx = L2Transaction::decode_molecule(&l2_transaction).map_err(invalid_bytes)?;
        self.rollup
            .submit_l2_transaction(&tx)
            .await
            .map_err(into_error_object)
    }

    async fn get_account_id_by_script_hash(&self, script_hash: B256) -> RpcResult<Option<U32>> {
        let account_id = self
            .rollup
            .get_account_id_by_script_hash(script_hash)
            .await
            .map_err(into_error_object)?;
        Ok(account_id.map(U32::from))
    }

    async fn get_script_hash_by_short_address(
        &self,
        short_address: ShortAddress,
    ) -> RpcResult<Option<B256>> {
        self.rollup
            .get_script_hash_by_short_address(short_address)
            .await
            .map_err(into_error_object)
    }

    async fn get_nonce(&self, account_id: U32) -> RpcResult<U32> {
        let nonce = self
            .rollup
            .get_nonce(account_id.to::<u32>())
            .await
            .map_err(into_error_object)?;
        Ok(U32::from(nonce))
    }

    async fn get_script_hash(&self, account_id: U32) -> RpcResult<B256> {
        self.rollup
            .get_script_hash(account_id.to::<u32>())
            .await
            .map_err(into_error_object)
    }

    async fn get_fee_config(&self) -> RpcResult<FeeConfig> {
        self.rollup.get_fee_config().await.map_err(into_error_object)
    }

    async fn get_transaction(&self, tx_hash: B256) -> RpcResult<Option<L2TransactionWithStatus>> {
        self.rollup
            .get_transaction(tx_hash)
            .await
            .map_err(into_error_object)
    }

    async fn get_balance(&self, short_address: ShortAddress, sudt_id: U32) -> RpcResult<U128> {
        let balance = self
            .rollup
            .get_balance(short_address, sudt_id.to::<u32>())
            .await
            .map_err(into_error_object)?;
        Ok(U128::from(balance))
    }

    async fn get_rollup_type_hash(&self) -> RpcResult<B256> {
        self.rollup
            .get_rollup_type_hash()
            .await
            .map_err(into_error_object)
    }

    async fn get_eth_account_lock_hash(&self) -> RpcResult<B256> {
        self.rollup
            .get_eth_account_lock_hash()
            .await
            .map_err(into_error_object)
    }
}
