//! Per-route swap classification.
//!
//! Every transaction of a scanned block is tested against every token route
//! of the chain side. A route is tested independently of the others, so one
//! transaction may match several routes.
//!
//! # Source chain (`deposit_address` set)
//!
//! | Token  | Mode    | Deposit                              | Redeemed                              |
//! |--------|---------|--------------------------------------|---------------------------------------|
//! | native | any     | `tx.to == deposit`                   | `tx.from == deposit`                  |
//! | ERC20  | input   | `transfer`/`transferFrom` to deposit | `transfer` sent by deposit            |
//! | ERC20  | receipt | `Transfer` log to deposit            | `Transfer` log from deposit           |
//!
//! # Destination chain (`redeem_address` set)
//!
//! | Mode    | Burn                          | Mint (when `detect_mint`)          |
//! |---------|-------------------------------|------------------------------------|
//! | input   | `Swapout` selector            | `Swapin` sent by the redeem address |
//! | receipt | `LogSwapout` log (2 topics)   | `LogSwapin` log (3 topics)          |
//!
//! Burn is tried first. A selector or log miss on the Burn branch falls
//! through to Mint.
//!
//! With `call_by_contract` set, the transaction must be sent to the router
//! and the receipt logs are always used; logs are still matched against the
//! token contract.

use crate::config::{SwapoutEncoding, TokenConfig};
use crate::events::{
    swapout_selector, swapout_topic, IAddressSwapout, IBridgeToken, IStringSwapout,
    SWAPIN_SELECTOR, SWAPIN_TOPIC, TRANSFER_FROM_SELECTOR, TRANSFER_SELECTOR, TRANSFER_TOPIC,
};
use crate::rpc::{ChainBlock, ChainLog, ChainReceipt, ChainTransaction, RetryingChainClient};
use crate::swap::{ChainSide, Classification, SwapEvent, SwapTxType, VerifyError};
use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::{SolCall, SolEvent};
use tracing::warn;

/// Position of a transaction in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    /// Block height
    pub number: u64,
    /// Block timestamp (Unix seconds)
    pub timestamp: u64,
}

impl From<&ChainBlock> for BlockContext {
    fn from(block: &ChainBlock) -> Self {
        Self {
            number: block.number,
            timestamp: block.timestamp,
        }
    }
}

/// Classifies transactions, fetching receipts for router-called routes.
#[derive(Debug, Clone, Copy)]
pub struct SwapClassifier<'a> {
    client: &'a RetryingChainClient,
}

impl<'a> SwapClassifier<'a> {
    /// Classifier fetching missing receipts through `client`.
    #[must_use]
    pub const fn new(client: &'a RetryingChainClient) -> Self {
        Self { client }
    }

    /// Classify `tx` against `token`.
    ///
    /// `receipt` is the receipt already fetched in receipt-scanning mode.
    pub async fn classify(
        &self,
        block: BlockContext,
        tx: &ChainTransaction,
        receipt: Option<&ChainReceipt>,
        token: &TokenConfig,
    ) -> Classification {
        let Some(router) = token.call_by_contract.filter(|_| !token.is_native()) else {
            return classify_tx(block, tx, receipt, token);
        };
        if tx.to != Some(router) {
            return Err(VerifyError::WrongContract);
        }
        if receipt.is_some() {
            return classify_tx(block, tx, receipt, token);
        }

        match self.client.receipt_by_hash(tx.hash).await {
            Ok(fetched) => classify_tx(block, tx, Some(&fetched), token),
            Err(e) => {
                warn!(tx = %tx.hash, pair_id = %token.pair_id, error = %e, "get tx receipt error");
                Err(VerifyError::TxNotFound)
            }
        }
    }
}

/// Classify `tx` against `token` without any chain access.
///
/// The receipt logs are used when `receipt` is present, the call input
/// otherwise. Contract-creation transactions never match.
pub fn classify_tx(
    block: BlockContext,
    tx: &ChainTransaction,
    receipt: Option<&ChainReceipt>,
    token: &TokenConfig,
) -> Classification {
    let Some(to) = tx.to else {
        return Err(VerifyError::WrongContract);
    };
    let event = |amount: U256, user: Address, bind: Option<String>| SwapEvent {
        tx_hash: tx.hash,
        block_number: block.number,
        block_time: block.timestamp,
        amount,
        user,
        bind,
    };

    match token.side() {
        ChainSide::Src => {
            let deposit = token.deposit_address.ok_or(VerifyError::WrongReceiver)?;
            let Some(contract) = token.contract_address() else {
                return if to == deposit {
                    Ok((SwapTxType::Deposit, event(tx.value, tx.from, None)))
                } else if tx.from == deposit && tx.input.is_empty() && !tx.value.is_zero() {
                    Ok((SwapTxType::Redeemed, event(tx.value, to, None)))
                } else {
                    Err(VerifyError::WrongReceiver)
                };
            };
            if Some(to) != token.comparison_target() {
                return Err(VerifyError::WrongContract);
            }
            let (kind, amount, user) = match receipt {
                None => parse_transfer_input(tx, deposit)?,
                Some(receipt) => parse_transfer_logs(&receipt.logs, contract, deposit)?,
            };
            Ok((kind, event(amount, user, None)))
        }
        ChainSide::Dst => {
            let contract = token.contract_address().ok_or(VerifyError::WrongContract)?;
            let (kind, amount, user, bind) = match receipt {
                None => {
                    if Some(to) != token.comparison_target() {
                        return Err(VerifyError::WrongContract);
                    }
                    match parse_swapout_input(tx, token.swapout_encoding) {
                        Err(VerifyError::FuncHashMismatch) if token.detect_mint => {
                            let (amount, user) = parse_swapin_input(tx, token.redeem_address)?;
                            (SwapTxType::Mint, amount, user, None)
                        }
                        Err(e) => return Err(e),
                        Ok((amount, bind)) => (SwapTxType::Burn, amount, tx.from, Some(bind)),
                    }
                }
                Some(receipt) => {
                    let logs: Vec<&ChainLog> = receipt
                        .logs
                        .iter()
                        .filter(|log| !log.removed && log.address == contract)
                        .collect();
                    if logs.is_empty() {
                        return Err(VerifyError::WrongContract);
                    }
                    match parse_swapout_logs(&logs, token.swapout_encoding) {
                        Err(VerifyError::SwapoutLogNotFound) if token.detect_mint => {
                            let (amount, user) = parse_swapin_logs(&logs)?;
                            (SwapTxType::Mint, amount, user, None)
                        }
                        Err(e) => return Err(e),
                        Ok((amount, user, bind)) => (SwapTxType::Burn, amount, user, Some(bind)),
                    }
                }
            };
            Ok((kind, event(amount, user, bind)))
        }
    }
}

/// 32-byte word at `offset`, zero-padded past the end of `data`.
fn word(data: &[u8], offset: usize) -> B256 {
    let mut out = B256::ZERO;
    if let Some(tail) = data.get(offset..) {
        let len = tail.len().min(32);
        out[..len].copy_from_slice(&tail[..len]);
    }
    out
}

fn selector(input: &[u8]) -> Result<[u8; 4], VerifyError> {
    input
        .get(..4)
        .and_then(|s| <[u8; 4]>::try_from(s).ok())
        .ok_or(VerifyError::WrongInput)
}

fn parse_transfer_input(
    tx: &ChainTransaction,
    deposit: Address,
) -> Result<(SwapTxType, U256, Address), VerifyError> {
    let input = tx.input.as_ref();
    match selector(input)? {
        TRANSFER_SELECTOR => {
            let receiver = Address::from_word(word(input, 4));
            let amount = U256::from_be_bytes(word(input, 36).0);
            if receiver == deposit {
                Ok((SwapTxType::Deposit, amount, tx.from))
            } else if tx.from == deposit {
                Ok((SwapTxType::Redeemed, amount, receiver))
            } else {
                Err(VerifyError::WrongReceiver)
            }
        }
        TRANSFER_FROM_SELECTOR => {
            let sender = Address::from_word(word(input, 4));
            let receiver = Address::from_word(word(input, 36));
            let amount = U256::from_be_bytes(word(input, 68).0);
            if receiver == deposit {
                Ok((SwapTxType::Deposit, amount, sender))
            } else {
                Err(VerifyError::WrongReceiver)
            }
        }
        _ => Err(VerifyError::FuncHashMismatch),
    }
}

fn parse_transfer_logs(
    logs: &[ChainLog],
    contract: Address,
    deposit: Address,
) -> Result<(SwapTxType, U256, Address), VerifyError> {
    let mut saw_transfer = false;
    for log in logs {
        if log.removed || log.address != contract {
            continue;
        }
        if log.topics.len() != 3 || log.data.is_empty() || log.topics[0] != TRANSFER_TOPIC {
            continue;
        }
        saw_transfer = true;
        let from = Address::from_word(log.topics[1]);
        let to = Address::from_word(log.topics[2]);
        let amount = U256::from_be_bytes(word(&log.data, 0).0);
        if to == deposit {
            return Ok((SwapTxType::Deposit, amount, from));
        }
        if from == deposit {
            return Ok((SwapTxType::Redeemed, amount, to));
        }
    }
    if saw_transfer {
        Err(VerifyError::WrongReceiver)
    } else {
        Err(VerifyError::DepositLogNotFound)
    }
}

fn parse_swapout_input(
    tx: &ChainTransaction,
    encoding: SwapoutEncoding,
) -> Result<(U256, String), VerifyError> {
    let input = tx.input.as_ref();
    if selector(input)? != swapout_selector(encoding) {
        return Err(VerifyError::FuncHashMismatch);
    }
    match encoding {
        SwapoutEncoding::Address => IAddressSwapout::SwapoutCall::abi_decode(input)
            .map(|call| (call.amount, format!("{:?}", call.bindaddr))),
        SwapoutEncoding::String => {
            IStringSwapout::SwapoutCall::abi_decode(input).map(|call| (call.amount, call.bindaddr))
        }
    }
    .map_err(|_| VerifyError::WrongInput)
}

fn parse_swapin_input(
    tx: &ChainTransaction,
    redeem: Option<Address>,
) -> Result<(U256, Address), VerifyError> {
    let input = tx.input.as_ref();
    if selector(input)? != SWAPIN_SELECTOR {
        return Err(VerifyError::FuncHashMismatch);
    }
    if redeem != Some(tx.from) {
        return Err(VerifyError::WrongReceiver);
    }
    IBridgeToken::SwapinCall::abi_decode(input)
        .map(|call| (call.amount, call.account))
        .map_err(|_| VerifyError::WrongInput)
}

fn parse_swapout_logs(
    logs: &[&ChainLog],
    encoding: SwapoutEncoding,
) -> Result<(U256, Address, String), VerifyError> {
    let topic = swapout_topic(encoding);
    let log = logs
        .iter()
        .find(|log| log.topics.len() == 2 && !log.data.is_empty() && log.topics[0] == topic)
        .ok_or(VerifyError::SwapoutLogNotFound)?;
    let topics = log.topics.iter().copied();
    match encoding {
        SwapoutEncoding::Address => IAddressSwapout::LogSwapout::decode_raw_log(topics, &log.data)
            .map(|ev| (ev.amount, ev.account, format!("{:?}", ev.bindaddr))),
        SwapoutEncoding::String => IStringSwapout::LogSwapout::decode_raw_log(topics, &log.data)
            .map(|ev| (ev.amount, ev.account, ev.bindaddr)),
    }
    .map_err(|_| VerifyError::WrongInput)
}

fn parse_swapin_logs(logs: &[&ChainLog]) -> Result<(U256, Address), VerifyError> {
    let log = logs
        .iter()
        .find(|log| log.topics.len() == 3 && !log.data.is_empty() && log.topics[0] == SWAPIN_TOPIC)
        .ok_or(VerifyError::SwapinLogNotFound)?;
    IBridgeToken::LogSwapin::decode_raw_log(log.topics.iter().copied(), &log.data)
        .map(|ev| (ev.amount, ev.account))
        .map_err(|_| VerifyError::WrongInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        address_swapout_input, dst_token, erc20_token, log, native_token, swapin_input,
        transfer_from_input, transfer_input, tx, DEPOSIT, MockChain, REDEEM, ROUTER, TOKEN, USER,
    };
    use alloy::primitives::{Bytes, U256};
    use std::sync::Arc;
    use std::time::Duration;

    const BLOCK: BlockContext = BlockContext {
        number: 100,
        timestamp: 1_700_000_000,
    };

    fn receipt(logs: Vec<ChainLog>) -> ChainReceipt {
        ChainReceipt {
            block_number: Some(100),
            logs,
        }
    }

    fn transfer_log(from: Address, to: Address, amount: u64) -> ChainLog {
        log(
            TOKEN,
            vec![TRANSFER_TOPIC, from.into_word(), to.into_word()],
            U256::from(amount).to_be_bytes_vec(),
        )
    }

    #[test]
    fn test_native_deposit() {
        let one_eth = U256::from(1_000_000_000_000_000_000_u128);
        let mut transfer = tx(USER, Some(DEPOSIT), Bytes::new());
        transfer.value = one_eth;

        let (kind, event) = classify_tx(BLOCK, &transfer, None, &native_token("eth")).unwrap();

        assert_eq!(kind, SwapTxType::Deposit);
        assert_eq!(event.amount, one_eth);
        assert_eq!(event.user, USER);
        assert_eq!(event.block_number, 100);
        assert_eq!(event.block_time, 1_700_000_000);
    }

    #[test]
    fn test_native_redeemed() {
        let mut payout = tx(DEPOSIT, Some(USER), Bytes::new());
        payout.value = U256::from(7_u8);

        let (kind, event) = classify_tx(BLOCK, &payout, None, &native_token("eth")).unwrap();

        assert_eq!(kind, SwapTxType::Redeemed);
        assert_eq!(event.user, USER);
    }

    #[test]
    fn test_native_route_ignores_contract_calls_from_deposit() {
        let token_payout = tx(DEPOSIT, Some(TOKEN), transfer_input(USER, 42));
        let result = classify_tx(BLOCK, &token_payout, None, &native_token("eth"));
        assert_eq!(result, Err(VerifyError::WrongReceiver));

        // Same payout still counts on the ERC20 route
        let (kind, event) = classify_tx(BLOCK, &token_payout, None, &erc20_token("usdt")).unwrap();
        assert_eq!(kind, SwapTxType::Redeemed);
        assert_eq!(event.amount, U256::from(42_u8));

        let empty = tx(DEPOSIT, Some(USER), Bytes::new());
        let result = classify_tx(BLOCK, &empty, None, &native_token("eth"));
        assert_eq!(result, Err(VerifyError::WrongReceiver));
    }

    #[test]
    fn test_native_unrelated_tx() {
        let other = tx(USER, Some(TOKEN), Bytes::new());
        let result = classify_tx(BLOCK, &other, None, &native_token("eth"));
        assert_eq!(result, Err(VerifyError::WrongReceiver));
    }

    #[test]
    fn test_erc20_transfer_input_deposit() {
        let transfer = tx(USER, Some(TOKEN), transfer_input(DEPOSIT, 500));

        let (kind, event) = classify_tx(BLOCK, &transfer, None, &erc20_token("usdt")).unwrap();

        assert_eq!(kind, SwapTxType::Deposit);
        assert_eq!(event.amount, U256::from(500_u64));
        assert_eq!(event.user, USER);
    }

    #[test]
    fn test_erc20_transfer_from_input_deposit() {
        let owner = Address::repeat_byte(0x77);
        let transfer = tx(USER, Some(TOKEN), transfer_from_input(owner, DEPOSIT, 900));

        let (kind, event) = classify_tx(BLOCK, &transfer, None, &erc20_token("usdt")).unwrap();

        assert_eq!(kind, SwapTxType::Deposit);
        assert_eq!(event.amount, U256::from(900_u64));
        assert_eq!(event.user, owner);
    }

    #[test]
    fn test_erc20_transfer_input_redeemed() {
        let payout = tx(DEPOSIT, Some(TOKEN), transfer_input(USER, 42));

        let (kind, event) = classify_tx(BLOCK, &payout, None, &erc20_token("usdt")).unwrap();

        assert_eq!(kind, SwapTxType::Redeemed);
        assert_eq!(event.user, USER);
        assert_eq!(event.amount, U256::from(42_u64));
    }

    #[test]
    fn test_erc20_input_mismatches() {
        let token = erc20_token("usdt");

        let approve = tx(USER, Some(TOKEN), Bytes::from(vec![0x09, 0x5e, 0xa7, 0xb3, 0, 0]));
        assert_eq!(classify_tx(BLOCK, &approve, None, &token), Err(VerifyError::FuncHashMismatch));

        let elsewhere = tx(USER, Some(TOKEN), transfer_input(USER, 1));
        assert_eq!(classify_tx(BLOCK, &elsewhere, None, &token), Err(VerifyError::WrongReceiver));

        let other_contract = tx(USER, Some(ROUTER), transfer_input(DEPOSIT, 1));
        assert_eq!(classify_tx(BLOCK, &other_contract, None, &token), Err(VerifyError::WrongContract));

        let short = tx(USER, Some(TOKEN), Bytes::from(vec![0xa9, 0x05]));
        assert_eq!(classify_tx(BLOCK, &short, None, &token), Err(VerifyError::WrongInput));
    }

    #[test]
    fn test_truncated_input_is_zero_padded() {
        // Receiver present, amount word cut short
        let mut input = transfer_input(DEPOSIT, 0).to_vec();
        input.truncate(40);
        let transfer = tx(USER, Some(TOKEN), Bytes::from(input));

        let (kind, event) = classify_tx(BLOCK, &transfer, None, &erc20_token("usdt")).unwrap();
        assert_eq!(kind, SwapTxType::Deposit);
        assert_eq!(event.amount, U256::ZERO);
    }

    #[test]
    fn test_contract_creation_never_matches() {
        let create = tx(USER, None, transfer_input(DEPOSIT, 1));
        assert_eq!(
            classify_tx(BLOCK, &create, None, &erc20_token("usdt")),
            Err(VerifyError::WrongContract)
        );
    }

    #[test]
    fn test_erc20_log_deposit_and_redeemed() {
        let token = erc20_token("usdt");
        let call = tx(USER, Some(TOKEN), Bytes::new());

        let deposit = receipt(vec![transfer_log(USER, DEPOSIT, 500)]);
        let (kind, event) = classify_tx(BLOCK, &call, Some(&deposit), &token).unwrap();
        assert_eq!(kind, SwapTxType::Deposit);
        assert_eq!(event.user, USER);
        assert_eq!(event.amount, U256::from(500_u64));

        let payout = receipt(vec![transfer_log(DEPOSIT, USER, 30)]);
        let (kind, event) = classify_tx(BLOCK, &call, Some(&payout), &token).unwrap();
        assert_eq!(kind, SwapTxType::Redeemed);
        assert_eq!(event.user, USER);
    }

    #[test]
    fn test_erc20_log_filters() {
        let token = erc20_token("usdt");
        let call = tx(USER, Some(TOKEN), Bytes::new());

        let mut removed = transfer_log(USER, DEPOSIT, 500);
        removed.removed = true;
        let mut foreign = transfer_log(USER, DEPOSIT, 500);
        foreign.address = ROUTER;
        let filtered = receipt(vec![removed, foreign]);
        assert_eq!(
            classify_tx(BLOCK, &call, Some(&filtered), &token),
            Err(VerifyError::DepositLogNotFound)
        );

        let elsewhere = receipt(vec![transfer_log(USER, ROUTER, 500)]);
        assert_eq!(
            classify_tx(BLOCK, &call, Some(&elsewhere), &token),
            Err(VerifyError::WrongReceiver)
        );
    }

    #[test]
    fn test_burn_from_input() {
        let bind = Address::repeat_byte(0xbb);
        let swapout = tx(USER, Some(TOKEN), address_swapout_input(1_000, bind));

        let (kind, event) = classify_tx(BLOCK, &swapout, None, &dst_token("usdt")).unwrap();

        assert_eq!(kind, SwapTxType::Burn);
        assert_eq!(event.amount, U256::from(1_000_u64));
        assert_eq!(event.user, USER);
        assert_eq!(event.bind, Some(format!("{bind:?}")));
    }

    #[test]
    fn test_string_burn_from_input() {
        let mut token = dst_token("btc");
        token.swapout_encoding = SwapoutEncoding::String;
        let call = IStringSwapout::SwapoutCall {
            amount: U256::from(5_u8),
            bindaddr: "bc1qexample".to_string(),
        };
        let swapout = tx(USER, Some(TOKEN), Bytes::from(call.abi_encode()));

        let (kind, event) = classify_tx(BLOCK, &swapout, None, &token).unwrap();

        assert_eq!(kind, SwapTxType::Burn);
        assert_eq!(event.bind.as_deref(), Some("bc1qexample"));
    }

    #[test]
    fn test_mint_from_input() {
        let swapin = tx(REDEEM, Some(TOKEN), swapin_input(B256::repeat_byte(1), USER, 250));

        let (kind, event) = classify_tx(BLOCK, &swapin, None, &dst_token("usdt")).unwrap();

        assert_eq!(kind, SwapTxType::Mint);
        assert_eq!(event.user, USER);
        assert_eq!(event.amount, U256::from(250_u64));

        let mut no_mint = dst_token("usdt");
        no_mint.detect_mint = false;
        assert_eq!(
            classify_tx(BLOCK, &swapin, None, &no_mint),
            Err(VerifyError::FuncHashMismatch)
        );

        let forged = tx(USER, Some(TOKEN), swapin_input(B256::repeat_byte(1), USER, 250));
        assert_eq!(
            classify_tx(BLOCK, &forged, None, &dst_token("usdt")),
            Err(VerifyError::WrongReceiver)
        );
    }

    #[test]
    fn test_burn_and_mint_from_logs() {
        let token = dst_token("usdt");
        let call = tx(USER, Some(TOKEN), Bytes::new());
        let bind = Address::repeat_byte(0xbb);

        let swapout_data = [bind.into_word().0, U256::from(77_u8).to_be_bytes()].concat();
        let burn = receipt(vec![log(
            TOKEN,
            vec![swapout_topic(SwapoutEncoding::Address), USER.into_word()],
            swapout_data,
        )]);
        let (kind, event) = classify_tx(BLOCK, &call, Some(&burn), &token).unwrap();
        assert_eq!(kind, SwapTxType::Burn);
        assert_eq!(event.user, USER);
        assert_eq!(event.amount, U256::from(77_u8));
        assert_eq!(event.bind, Some(format!("{bind:?}")));

        let mint = receipt(vec![log(
            TOKEN,
            vec![SWAPIN_TOPIC, B256::repeat_byte(9), USER.into_word()],
            U256::from(12_u8).to_be_bytes_vec(),
        )]);
        let (kind, event) = classify_tx(BLOCK, &call, Some(&mint), &token).unwrap();
        assert_eq!(kind, SwapTxType::Mint);
        assert_eq!(event.amount, U256::from(12_u8));

        let mut no_mint = dst_token("usdt");
        no_mint.detect_mint = false;
        assert_eq!(
            classify_tx(BLOCK, &call, Some(&mint), &no_mint),
            Err(VerifyError::SwapoutLogNotFound)
        );

        let unrelated = receipt(vec![transfer_log(USER, DEPOSIT, 1)]);
        let mut foreign = unrelated.clone();
        foreign.logs[0].address = ROUTER;
        assert_eq!(
            classify_tx(BLOCK, &call, Some(&foreign), &token),
            Err(VerifyError::WrongContract)
        );
        assert_eq!(
            classify_tx(BLOCK, &call, Some(&unrelated), &token),
            Err(VerifyError::SwapinLogNotFound)
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let token = erc20_token("usdt");
        let transfer = tx(USER, Some(TOKEN), transfer_input(DEPOSIT, 500));
        assert_eq!(
            classify_tx(BLOCK, &transfer, None, &token),
            classify_tx(BLOCK, &transfer, None, &token)
        );
    }

    #[tokio::test]
    async fn test_router_route_fetches_receipt() {
        let chain = Arc::new(MockChain::new());
        let client = RetryingChainClient::new(chain.clone(), Duration::ZERO, 1);
        let mut token = erc20_token("usdt");
        token.call_by_contract = Some(ROUTER);

        let call = tx(USER, Some(ROUTER), Bytes::new());
        chain.push_receipt(call.hash, receipt(vec![transfer_log(USER, DEPOSIT, 64)]));

        let classifier = SwapClassifier::new(&client);
        let (kind, event) = classifier.classify(BLOCK, &call, None, &token).await.unwrap();
        assert_eq!(kind, SwapTxType::Deposit);
        assert_eq!(event.amount, U256::from(64_u8));

        let direct = tx(USER, Some(TOKEN), transfer_input(DEPOSIT, 1));
        assert_eq!(
            classifier.classify(BLOCK, &direct, None, &token).await,
            Err(VerifyError::WrongContract)
        );
    }

    #[tokio::test]
    async fn test_router_route_without_receipt() {
        let chain = Arc::new(MockChain::new());
        let client = RetryingChainClient::new(chain.clone(), Duration::ZERO, 1);
        let mut token = erc20_token("usdt");
        token.call_by_contract = Some(ROUTER);

        let call = tx(USER, Some(ROUTER), Bytes::new());
        let result = SwapClassifier::new(&client).classify(BLOCK, &call, None, &token).await;
        assert_eq!(result, Err(VerifyError::TxNotFound));
    }
}
