//! Contract bindings for bridge swap detection with compile-time type safety.
//!
//! This module uses Alloy's `sol!` macro to generate selectors, event topics
//! and decoders directly from Solidity signatures, so no hash is typed by
//! hand anywhere in the classifier.
//!
//! ## Bindings
//!
//! - [`IERC20`]: `transfer`, `transferFrom`, `decimals` and the `Transfer` event
//! - [`IBridgeToken`]: the MPC-driven `Swapin` call and its `LogSwapin` event
//! - [`IAddressSwapout`]: `Swapout(uint256,address)` for ETH-like destinations
//! - [`IStringSwapout`]: `Swapout(uint256,string)` for BTC-like destinations
//!
//! ## Example
//!
//! ```
//! use bridge_swap_scanner::events::IERC20;
//! use alloy::sol_types::SolCall;
//!
//! assert_eq!(IERC20::transferCall::SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
//! ```

use crate::config::SwapoutEncoding;
use alloy::primitives::B256;
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};

sol! {
    /// Minimal ERC20 surface touched by deposits and redemptions.
    interface IERC20 {
        /// Emitted on every token movement; `from` and `to` are indexed.
        event Transfer(address indexed from, address indexed to, uint256 value);

        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
    }
}

sol! {
    /// Bridge token minted on the destination chain by the MPC.
    interface IBridgeToken {
        /// Emitted by `Swapin`; carries the source-chain tx hash and the credited account.
        event LogSwapin(bytes32 indexed txhash, address indexed account, uint256 amount);

        function Swapin(bytes32 txhash, address account, uint256 amount) external returns (bool);
    }
}

sol! {
    /// Swap-out with an EVM destination address.
    interface IAddressSwapout {
        event LogSwapout(address indexed account, address bindaddr, uint256 amount);

        function Swapout(uint256 amount, address bindaddr) external returns (bool);
    }
}

sol! {
    /// Swap-out with a free-form (e.g. BTC) destination address.
    interface IStringSwapout {
        event LogSwapout(address indexed account, uint256 amount, string bindaddr);

        function Swapout(uint256 amount, string bindaddr) external returns (bool);
    }
}

/// Selector of `transfer(address,uint256)`.
pub const TRANSFER_SELECTOR: [u8; 4] = IERC20::transferCall::SELECTOR;

/// Selector of `transferFrom(address,address,uint256)`.
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = IERC20::transferFromCall::SELECTOR;

/// Selector of `Swapin(bytes32,address,uint256)`.
pub const SWAPIN_SELECTOR: [u8; 4] = IBridgeToken::SwapinCall::SELECTOR;

/// Topic of the ERC20 `Transfer` event.
pub const TRANSFER_TOPIC: B256 = IERC20::Transfer::SIGNATURE_HASH;

/// Topic of the `LogSwapin` event.
pub const SWAPIN_TOPIC: B256 = IBridgeToken::LogSwapin::SIGNATURE_HASH;

/// `Swapout` selector for the given destination encoding.
#[must_use]
pub const fn swapout_selector(encoding: SwapoutEncoding) -> [u8; 4] {
    match encoding {
        SwapoutEncoding::Address => IAddressSwapout::SwapoutCall::SELECTOR,
        SwapoutEncoding::String => IStringSwapout::SwapoutCall::SELECTOR,
    }
}

/// `LogSwapout` topic for the given destination encoding.
#[must_use]
pub const fn swapout_topic(encoding: SwapoutEncoding) -> B256 {
    match encoding {
        SwapoutEncoding::Address => IAddressSwapout::LogSwapout::SIGNATURE_HASH,
        SwapoutEncoding::String => IStringSwapout::LogSwapout::SIGNATURE_HASH,
    }
}
