//! Scripted chain, recording persistence sink and token fixtures shared by
//! unit tests.

use crate::config::{ChainScanConfig, SwapoutEncoding, TokenAddress, TokenConfig};
use crate::db::{InsertOutcome, PersistenceWriter, SwapRecord, SyncReader, SyncWatermark};
use crate::error::{ScannerError, ScannerResult};
use crate::events::{IAddressSwapout, IBridgeToken, IERC20};
use crate::rpc::{ChainBlock, ChainClient, ChainLog, ChainReceipt, ChainTransaction};
use crate::swap::SwapTxType;
use alloy::primitives::{address, keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub const TOKEN: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");
pub const ROUTER: Address = address!("1111111254EEB25477B68fb85Ed929f73A960582");
pub const DEPOSIT: Address = address!("533e3c0e6b48010873B947bddC4721b1bDFF9648");
pub const REDEEM: Address = address!("7B9A1c2F5d1e6A0b3C4d5E6f708192A3b4C5d6E7");
pub const USER: Address = address!("AbCdEf0000000000000000000000000000000001");

static TX_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Transaction with a fresh unique hash and zero value.
pub fn tx(from: Address, to: Option<Address>, input: Bytes) -> ChainTransaction {
    let n = TX_COUNTER.fetch_add(1, Ordering::Relaxed);
    ChainTransaction {
        hash: keccak256(n.to_be_bytes()),
        from,
        to,
        value: U256::ZERO,
        input,
    }
}

pub fn log(address: Address, topics: Vec<B256>, data: Vec<u8>) -> ChainLog {
    ChainLog {
        address,
        topics,
        data: data.into(),
        removed: false,
    }
}

pub fn transfer_input(to: Address, amount: u64) -> Bytes {
    IERC20::transferCall {
        to,
        amount: U256::from(amount),
    }
    .abi_encode()
    .into()
}

pub fn transfer_from_input(from: Address, to: Address, amount: u64) -> Bytes {
    IERC20::transferFromCall {
        from,
        to,
        amount: U256::from(amount),
    }
    .abi_encode()
    .into()
}

pub fn address_swapout_input(amount: u64, bindaddr: Address) -> Bytes {
    IAddressSwapout::SwapoutCall {
        amount: U256::from(amount),
        bindaddr,
    }
    .abi_encode()
    .into()
}

pub fn swapin_input(txhash: B256, account: Address, amount: u64) -> Bytes {
    IBridgeToken::SwapinCall {
        txhash,
        account,
        amount: U256::from(amount),
    }
    .abi_encode()
    .into()
}

pub fn native_token(pair_id: &str) -> TokenConfig {
    TokenConfig {
        pair_id: pair_id.to_string(),
        is_src_token: true,
        token_address: TokenAddress::Native,
        deposit_address: Some(DEPOSIT),
        redeem_address: None,
        call_by_contract: None,
        decimal: None,
        swapout_encoding: SwapoutEncoding::Address,
        detect_mint: false,
    }
}

pub fn erc20_token(pair_id: &str) -> TokenConfig {
    TokenConfig {
        token_address: TokenAddress::Contract(TOKEN),
        ..native_token(pair_id)
    }
}

pub fn dst_token(pair_id: &str) -> TokenConfig {
    TokenConfig {
        pair_id: pair_id.to_string(),
        is_src_token: false,
        token_address: TokenAddress::Contract(TOKEN),
        deposit_address: None,
        redeem_address: Some(REDEEM),
        call_by_contract: None,
        decimal: None,
        swapout_encoding: SwapoutEncoding::Address,
        detect_mint: true,
    }
}

/// Scanner knobs with no sleeping and a generous block budget.
pub fn scan_config() -> ChainScanConfig {
    ChainScanConfig {
        gateway: "http://localhost:8545".to_string(),
        scan_receipt: false,
        start_height: 0,
        end_height: 0,
        stable_height: 0,
        job_count: 1,
        process_block_timeout_secs: 60,
        rpc_interval_ms: 0,
        rpc_retry_count: 5,
        tail_interval_ms: 0,
    }
}

#[derive(Debug, Default)]
struct ChainState {
    latest: u64,
    latest_failures: u32,
    latest_calls: u32,
    blocks: HashMap<u64, ChainBlock>,
    block_failures: HashMap<u64, u32>,
    block_calls: HashMap<u64, u32>,
    receipts: HashMap<B256, ChainReceipt>,
    contract_responses: HashMap<Address, Bytes>,
    contract_calls: u32,
}

/// In-memory [`ChainClient`] with scripted failures and call counters.
#[derive(Debug, Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block `number` with a hash derived from its height.
    pub fn block(number: u64, transactions: Vec<ChainTransaction>) -> ChainBlock {
        ChainBlock {
            number,
            hash: B256::from(U256::from(number)),
            timestamp: 1_700_000_000 + number * 12,
            transactions,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    pub fn push_block(&self, block: ChainBlock) {
        self.state().blocks.insert(block.number, block);
    }

    pub fn push_receipt(&self, hash: B256, receipt: ChainReceipt) {
        self.state().receipts.insert(hash, receipt);
    }

    /// Fail the next `times` fetches of block `height`.
    pub fn fail_block(&self, height: u64, times: u32) {
        self.state().block_failures.insert(height, times);
    }

    pub fn block_calls(&self, height: u64) -> u32 {
        self.state().block_calls.get(&height).copied().unwrap_or(0)
    }

    pub fn set_latest(&self, height: u64) {
        self.state().latest = height;
    }

    /// Fail the next `times` head queries.
    pub fn fail_latest(&self, times: u32) {
        self.state().latest_failures = times;
    }

    pub fn latest_calls(&self) -> u32 {
        self.state().latest_calls
    }

    pub fn set_contract_response(&self, to: Address, output: Vec<u8>) {
        self.state().contract_responses.insert(to, output.into());
    }

    pub fn contract_calls(&self) -> u32 {
        self.state().contract_calls
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn latest_height(&self) -> ScannerResult<u64> {
        let mut state = self.state();
        state.latest_calls += 1;
        if state.latest_failures > 0 {
            state.latest_failures -= 1;
            return Err(ScannerError::rpc("scripted head failure", None));
        }
        Ok(state.latest)
    }

    async fn block_by_height(&self, height: u64) -> ScannerResult<ChainBlock> {
        let mut state = self.state();
        *state.block_calls.entry(height).or_default() += 1;
        if let Some(remaining) = state.block_failures.get_mut(&height) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ScannerError::rpc(format!("scripted failure for block {height}"), None));
            }
        }
        state
            .blocks
            .get(&height)
            .cloned()
            .ok_or_else(|| ScannerError::rpc(format!("block {height} not found"), None))
    }

    async fn receipt_by_hash(&self, hash: B256) -> ScannerResult<ChainReceipt> {
        self.state()
            .receipts
            .get(&hash)
            .cloned()
            .ok_or_else(|| ScannerError::rpc(format!("receipt {hash} not found"), None))
    }

    async fn call_contract(&self, to: Address, _data: Bytes) -> ScannerResult<Bytes> {
        let mut state = self.state();
        state.contract_calls += 1;
        state
            .contract_responses
            .get(&to)
            .cloned()
            .ok_or_else(|| ScannerError::rpc("execution reverted", None))
    }
}

#[derive(Debug, Default)]
struct SinkState {
    watermark: SyncWatermark,
    swaps: Vec<(SwapTxType, SwapRecord)>,
    start_heights: Vec<(i64, i64)>,
    synced_updates: Vec<(i64, i64)>,
    write_attempts: usize,
    fail_writes: bool,
}

/// Persistence double recording every call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    state: Mutex<SinkState>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SinkState> {
        self.state.lock().unwrap()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    pub fn swaps(&self) -> Vec<(SwapTxType, SwapRecord)> {
        self.state().swaps.clone()
    }

    pub fn start_heights(&self) -> Vec<(i64, i64)> {
        self.state().start_heights.clone()
    }

    pub fn synced_updates(&self) -> Vec<(i64, i64)> {
        self.state().synced_updates.clone()
    }

    pub fn write_attempts(&self) -> usize {
        self.state().write_attempts
    }
}

#[async_trait]
impl SyncReader for RecordingSink {
    async fn get_sync_watermark(&self) -> ScannerResult<SyncWatermark> {
        Ok(self.state().watermark)
    }
}

#[async_trait]
impl PersistenceWriter for RecordingSink {
    async fn set_start_height(&self, src_start: i64, dst_start: i64) -> ScannerResult<()> {
        self.state().start_heights.push((src_start, dst_start));
        Ok(())
    }

    async fn update_synced_height(&self, src_synced: i64, dst_synced: i64) -> ScannerResult<()> {
        self.state().synced_updates.push((src_synced, dst_synced));
        Ok(())
    }

    async fn add_swap(&self, kind: SwapTxType, record: &SwapRecord) -> ScannerResult<InsertOutcome> {
        let mut state = self.state();
        state.write_attempts += 1;
        if state.fail_writes {
            return Err(ScannerError::database("scripted write failure", None));
        }
        let exists = state.swaps.iter().any(|(k, r)| {
            *k == kind && r.pair_id == record.pair_id && r.tx_hash == record.tx_hash
        });
        if exists {
            return Ok(InsertOutcome::Duplicate);
        }
        state.swaps.push((kind, record.clone()));
        Ok(InsertOutcome::Inserted)
    }
}
