//! Swap event model shared by the classifier, the block processor and the
//! persistence boundary.
//!
//! Swap events on the source chain:
//! - transfer into the MPC deposit address (`Deposit`)
//! - MPC transfer back out to a user (`Redeemed`)
//!
//! Swap events on the destination chain:
//! - swap-in performed by the MPC (`Mint`)
//! - swap-out requested by a user (`Burn`)

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a bridge route a scanner is watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainSide {
    /// Source chain, where users deposit into (and are redeemed from) the MPC address.
    Src,
    /// Destination chain, where the bridged token is minted and burned.
    Dst,
}

impl fmt::Display for ChainSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Src => write!(f, "src"),
            Self::Dst => write!(f, "dst"),
        }
    }
}

/// Kind of a matched swap transaction.
///
/// The "no match" case is carried by [`VerifyError`] in a [`Classification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapTxType {
    /// Transfer into the MPC deposit address on the source chain.
    Deposit,
    /// Swap-in on the destination chain.
    Mint,
    /// Swap-out on the destination chain.
    Burn,
    /// MPC transfer back to a user on the source chain.
    Redeemed,
}

impl SwapTxType {
    /// Stable lower-case name, used as the storage discriminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Mint => "mint",
            Self::Burn => "burn",
            Self::Redeemed => "redeemed",
        }
    }
}

impl fmt::Display for SwapTxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reason a `(transaction, token)` pair did not classify as a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifyError {
    /// The call's 4-byte selector is not one this token route accepts.
    FuncHashMismatch,
    /// The decoded receiver is not the configured MPC address.
    WrongReceiver,
    /// The transaction was not sent to the token (or router) contract.
    WrongContract,
    /// Input data too short to carry a selector, or undecodable arguments.
    WrongInput,
    /// No matching ERC20 `Transfer` log was found in the receipt.
    DepositLogNotFound,
    /// No matching `LogSwapout` log was found in the receipt.
    SwapoutLogNotFound,
    /// No matching `LogSwapin` log was found in the receipt.
    SwapinLogNotFound,
    /// The receipt needed by the log-based branch could not be fetched.
    TxNotFound,
}

impl VerifyError {
    /// Mismatches that are a normal consequence of scanning every
    /// transaction against every token and are not worth reporting.
    #[must_use]
    pub const fn is_expected(self) -> bool {
        matches!(
            self,
            Self::FuncHashMismatch | Self::WrongReceiver | Self::WrongContract | Self::TxNotFound
        )
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::FuncHashMismatch => "func hash mismatch",
            Self::WrongReceiver => "tx with wrong receiver",
            Self::WrongContract => "tx with wrong contract",
            Self::WrongInput => "tx with wrong input",
            Self::DepositLogNotFound => "deposit log not found",
            Self::SwapoutLogNotFound => "swapout log not found",
            Self::SwapinLogNotFound => "swapin log not found",
            Self::TxNotFound => "tx not found",
        };
        f.write_str(text)
    }
}

impl std::error::Error for VerifyError {}

/// A detected swap, before conversion to its persisted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapEvent {
    /// Transaction hash
    pub tx_hash: B256,
    /// Block number containing the transaction
    pub block_number: u64,
    /// Block timestamp (Unix seconds)
    pub block_time: u64,
    /// Raw token amount
    pub amount: U256,
    /// Depositor, redeemed user, swap-in account or swap-out sender
    pub user: Address,
    /// Destination-chain binding of a swap-out (address or string form)
    pub bind: Option<String>,
}

/// Outcome of classifying one transaction against one token route.
pub type Classification = Result<(SwapTxType, SwapEvent), VerifyError>;
