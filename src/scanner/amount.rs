//! Display amounts and token decimals.

use crate::config::{TokenConfig, NATIVE_DECIMALS};
use crate::events::IERC20;
use crate::rpc::RetryingChainClient;
use alloy::primitives::U256;
use alloy::sol_types::SolCall;
use dashmap::DashMap;
use tracing::{debug, warn};

/// Largest decimal count whose power of ten fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

/// Scale a raw token amount by `10^decimal` for display.
///
/// Splits into quotient and remainder before converting, so amounts that
/// divide evenly are exact even when the raw value exceeds `f64` precision.
///
/// ```
/// use alloy::primitives::U256;
/// use bridge_swap_scanner::scanner::to_float;
///
/// assert_eq!(to_float(U256::from(1_000_000_000_000_000_000_u128), 18), 1.0);
/// ```
#[must_use]
pub fn to_float(amount: U256, decimal: u8) -> f64 {
    let Some(unit) = U256::from(10u8).checked_pow(U256::from(decimal)) else {
        return f64::from(amount) / 10f64.powi(i32::from(decimal));
    };
    let quotient = amount / unit;
    let remainder = amount % unit;
    f64::from(quotient) + f64::from(remainder) / f64::from(unit)
}

/// Per-route memo of resolved token decimals.
///
/// A configured `decimal` always wins and native coins use 18. Otherwise a
/// single `decimals()` call is made; a failed or out-of-range answer
/// resolves to 0 for this event and is asked again next time.
#[derive(Debug, Default)]
pub struct DecimalCache {
    resolved: DashMap<String, u8>,
}

impl DecimalCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `pair_id`, if resolved.
    #[must_use]
    pub fn get(&self, pair_id: &str) -> Option<u8> {
        self.resolved.get(pair_id).map(|entry| *entry)
    }

    /// Decimals of `token`, resolving through `client` when needed.
    pub async fn resolve(&self, token: &TokenConfig, client: &RetryingChainClient) -> u8 {
        if let Some(decimal) = token.decimal {
            return decimal;
        }
        let Some(contract) = token.contract_address() else {
            return NATIVE_DECIMALS;
        };
        if let Some(decimal) = self.get(&token.pair_id) {
            return decimal;
        }

        let data = IERC20::decimalsCall {}.abi_encode();
        let decimal = match client.call_contract(contract, data.into()).await {
            Ok(output) if output.len() >= 32 => {
                let value = U256::from_be_slice(&output[..32]);
                u8::try_from(value).ok().filter(|d| *d <= MAX_DECIMALS)
            }
            Ok(output) => {
                warn!(pair_id = %token.pair_id, len = output.len(), "short decimals() result");
                None
            }
            Err(e) => {
                warn!(pair_id = %token.pair_id, error = %e, "decimals() call failed");
                None
            }
        };

        match decimal {
            Some(decimal) => {
                debug!(pair_id = %token.pair_id, decimal, "Resolved token decimals");
                self.resolved.insert(token.pair_id.clone(), decimal);
                decimal
            }
            None => 0,
        }
    }
}
