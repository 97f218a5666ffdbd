//! Scripted chain shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use alloy::primitives::{address, keccak256, Address, Bytes, B256, U256};
use async_trait::async_trait;
use bridge_swap_scanner::error::{ScannerError, ScannerResult};
use bridge_swap_scanner::rpc::{ChainBlock, ChainClient, ChainReceipt, ChainTransaction};
use std::collections::HashMap;
use std::sync::Mutex;

pub const TOKEN: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");
pub const DEPOSIT: Address = address!("533e3c0e6b48010873B947bddC4721b1bDFF9648");
pub const USER: Address = address!("AbCdEf0000000000000000000000000000000001");

/// In-memory chain answering from pre-built blocks and receipts.
#[derive(Debug, Default)]
pub struct ScriptedChain {
    latest: Mutex<u64>,
    blocks: Mutex<HashMap<u64, ChainBlock>>,
    receipts: Mutex<HashMap<B256, ChainReceipt>>,
    decimals: Mutex<Option<u8>>,
}

impl ScriptedChain {
    pub fn new(latest: u64) -> Self {
        let chain = Self::default();
        *chain.latest.lock().unwrap() = latest;
        chain
    }

    pub fn set_decimals(&self, decimals: u8) {
        *self.decimals.lock().unwrap() = Some(decimals);
    }

    pub fn add_block(&self, number: u64, transactions: Vec<ChainTransaction>) {
        let block = ChainBlock {
            number,
            hash: keccak256(number.to_be_bytes()),
            timestamp: 1_700_000_000 + number * 12,
            transactions,
        };
        self.blocks.lock().unwrap().insert(number, block);
    }

    pub fn add_receipt(&self, hash: B256, receipt: ChainReceipt) {
        self.receipts.lock().unwrap().insert(hash, receipt);
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    async fn latest_height(&self) -> ScannerResult<u64> {
        Ok(*self.latest.lock().unwrap())
    }

    async fn block_by_height(&self, height: u64) -> ScannerResult<ChainBlock> {
        self.blocks
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .ok_or_else(|| ScannerError::rpc(format!("block {height} not found"), None))
    }

    async fn receipt_by_hash(&self, hash: B256) -> ScannerResult<ChainReceipt> {
        self.receipts
            .lock()
            .unwrap()
            .get(&hash)
            .cloned()
            .ok_or_else(|| ScannerError::rpc(format!("receipt {hash} not found"), None))
    }

    async fn call_contract(&self, _to: Address, _data: Bytes) -> ScannerResult<Bytes> {
        self.decimals
            .lock()
            .unwrap()
            .map(|d| Bytes::from(U256::from(d).to_be_bytes_vec()))
            .ok_or_else(|| ScannerError::rpc("execution reverted", None))
    }
}

/// Transaction with a hash derived from `seed`.
pub fn tx(seed: u64, from: Address, to: Address, value: u64, input: Bytes) -> ChainTransaction {
    ChainTransaction {
        hash: keccak256([b"tx".as_slice(), &seed.to_be_bytes()].concat()),
        from,
        to: Some(to),
        value: U256::from(value),
        input,
    }
}
