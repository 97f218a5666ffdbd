//! Configuration management for the bridge swap scanner.
//!
//! Configuration is read from a TOML file through the `config` crate, with
//! environment overrides (`SWAPSCAN_` prefix, `__` as the nesting separator,
//! e.g. `SWAPSCAN_SRC__JOB_COUNT=8`). A `.env` file is honoured via `dotenvy`.
//! All operations return [`ScannerResult`].
//!
//! ## Example file
//!
//! ```toml
//! database_url = "sqlite:./swaps.db"
//!
//! [src]
//! gateway = "https://rpc.ankr.com/eth"
//! start_height = -200
//! stable_height = 10
//! job_count = 4
//!
//! [dst]
//! gateway = "https://rpcapi.fantom.network"
//!
//! [[tokens]]
//! pair_id = "usdt"
//! is_src_token = true
//! token_address = "0xdAC17F958D2ee523a2206206994597C13D831ec7"
//! deposit_address = "0x533e3c0e6b48010873B947bddC4721b1bDFF9648"
//!
//! [[tokens]]
//! pair_id = "usdt"
//! is_src_token = false
//! token_address = "0x049d68029688eAbF473097a2fC38ef61633A3C7A"
//! redeem_address = "0x533e3c0e6b48010873B947bddC4721b1bDFF9648"
//! ```
//!
//! A route normally has one source and one destination entry sharing a
//! `pair_id`; a `pair_id` is unique per chain side.

use crate::error::{ScannerError, ScannerResult};
use crate::swap::ChainSide;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Sentinel used in `token_address` for the chain's native coin.
pub const NATIVE_TOKEN: &str = "native";

/// Decimals assumed for the chain's native coin.
pub const NATIVE_DECIMALS: u8 = 18;

/// Token contract address, or the native coin sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenAddress {
    /// The chain's native coin (ETH, FTM, ...).
    Native,
    /// An ERC20 token contract.
    Contract(Address),
}

impl TryFrom<String> for TokenAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case(NATIVE_TOKEN) {
            return Ok(Self::Native);
        }
        Address::from_str(&value)
            .map(Self::Contract)
            .map_err(|e| format!("wrong 'token_address' {value}: {e}"))
    }
}

impl From<TokenAddress> for String {
    fn from(value: TokenAddress) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str(NATIVE_TOKEN),
            Self::Contract(address) => write!(f, "{address}"),
        }
    }
}

/// How a swap-out encodes its destination-chain address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapoutEncoding {
    /// `Swapout(uint256,address)` for ETH-like destinations.
    #[default]
    Address,
    /// `Swapout(uint256,string)` for BTC-like destinations.
    String,
}

/// One configured bridge token route on one chain side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Route identifier, unique per chain side
    pub pair_id: String,
    /// Whether this entry belongs to the source chain
    pub is_src_token: bool,
    /// Token contract, or `native`
    pub token_address: TokenAddress,
    /// Source-chain MPC address receiving deposits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_address: Option<Address>,
    /// Destination-chain MPC address performing swap-ins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeem_address: Option<Address>,
    /// Router contract through which the token is called
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_by_contract: Option<Address>,
    /// Token decimals; resolved on chain when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal: Option<u8>,
    /// Destination encoding used by swap-outs (destination tokens only)
    #[serde(default)]
    pub swapout_encoding: SwapoutEncoding,
    /// Whether swap-ins are classified as Mint (destination tokens only)
    #[serde(default = "default_true")]
    pub detect_mint: bool,
}

impl TokenConfig {
    /// Whether this route moves the chain's native coin.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self.token_address, TokenAddress::Native)
    }

    /// Token contract address, if not native.
    #[must_use]
    pub const fn contract_address(&self) -> Option<Address> {
        match self.token_address {
            TokenAddress::Native => None,
            TokenAddress::Contract(address) => Some(address),
        }
    }

    /// Address a matching transaction must be sent to: the router when
    /// `call_by_contract` is set, the token contract otherwise.
    #[must_use]
    pub fn comparison_target(&self) -> Option<Address> {
        self.call_by_contract.or_else(|| self.contract_address())
    }

    /// Chain side this route is scanned on.
    #[must_use]
    pub const fn side(&self) -> ChainSide {
        if self.is_src_token {
            ChainSide::Src
        } else {
            ChainSide::Dst
        }
    }

    /// Validate one token entry in isolation.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a required field is missing or
    /// the entry combines fields that cannot work together.
    pub fn check(&self) -> ScannerResult<()> {
        if self.pair_id.trim().is_empty() {
            return Err(ScannerError::config("empty 'pair_id'", None));
        }
        if self.is_src_token {
            if self.deposit_address.is_none() {
                return Err(ScannerError::config(
                    format!("source token '{}' has no 'deposit_address'", self.pair_id),
                    None,
                ));
            }
        } else {
            if self.redeem_address.is_none() {
                return Err(ScannerError::config(
                    format!("destination token '{}' has no 'redeem_address'", self.pair_id),
                    None,
                ));
            }
            if self.is_native() {
                return Err(ScannerError::config(
                    format!("destination token '{}' cannot be native", self.pair_id),
                    None,
                ));
            }
        }
        Ok(())
    }
}

/// Scanner knobs for one chain side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainScanConfig {
    /// RPC endpoint URL
    pub gateway: String,
    /// Inspect receipts (logs) instead of call input
    #[serde(default)]
    pub scan_receipt: bool,
    /// 0 = no backfill, >0 absolute start, <0 = blocks behind head
    #[serde(default = "default_start_height")]
    pub start_height: i64,
    /// Backfill end height (exclusive); 0 = tail the chain forever
    #[serde(default)]
    pub end_height: u64,
    /// Trailing margin kept behind the head when advancing the watermark
    #[serde(default)]
    pub stable_height: u64,
    /// Number of concurrent backfill workers
    #[serde(default = "default_job_count")]
    pub job_count: u64,
    /// Budget for scanning one block's transactions
    #[serde(default = "default_block_timeout")]
    pub process_block_timeout_secs: u64,
    /// Delay between RPC retry attempts
    #[serde(default = "default_rpc_interval")]
    pub rpc_interval_ms: u64,
    /// Attempts for bounded RPC retries (blocks, receipts)
    #[serde(default = "default_rpc_retry_count")]
    pub rpc_retry_count: u32,
    /// Pause between tailing iterations
    #[serde(default = "default_tail_interval")]
    pub tail_interval_ms: u64,
}

impl ChainScanConfig {
    /// Per-block scan budget.
    #[must_use]
    pub const fn process_block_timeout(&self) -> Duration {
        Duration::from_secs(self.process_block_timeout_secs)
    }

    /// Delay between RPC retry attempts.
    #[must_use]
    pub const fn rpc_interval(&self) -> Duration {
        Duration::from_millis(self.rpc_interval_ms)
    }

    /// Pause between tailing iterations.
    #[must_use]
    pub const fn tail_interval(&self) -> Duration {
        Duration::from_millis(self.tail_interval_ms)
    }

    fn check(&self, side: ChainSide) -> ScannerResult<()> {
        if self.gateway.trim().is_empty() {
            return Err(ScannerError::config(format!("[{side}] empty 'gateway'"), None));
        }
        if self.job_count == 0 {
            return Err(ScannerError::config(
                format!("[{side}] 'job_count' must be at least 1"),
                None,
            ));
        }
        if self.process_block_timeout_secs == 0 {
            return Err(ScannerError::config(
                format!("[{side}] 'process_block_timeout_secs' must be at least 1"),
                None,
            ));
        }
        if self.rpc_retry_count == 0 {
            return Err(ScannerError::config(
                format!("[{side}] 'rpc_retry_count' must be at least 1"),
                None,
            ));
        }
        Ok(())
    }
}

/// Command-line overrides applied on top of the file configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Force receipt scanning on
    pub scan_receipt: bool,
    /// Replace `start_height`
    pub start_height: Option<i64>,
    /// Replace `process_block_timeout_secs`
    pub timeout_secs: Option<u64>,
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// SQLite database URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Source chain scanner
    pub src: ChainScanConfig,
    /// Destination chain scanner
    #[serde(default)]
    pub dst: Option<ChainScanConfig>,
    /// Token routes, in scan order
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

impl ScanConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// This function:
    /// 1. Loads `.env` using `dotenvy` (if present)
    /// 2. Reads the TOML file
    /// 3. Applies `SWAPSCAN_*` environment overrides
    /// 4. Validates the result
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed, or if
    /// validation fails (see [`ScanConfig::validate`]).
    pub fn load(path: impl AsRef<Path>) -> ScannerResult<Self> {
        dotenvy::dotenv().ok();

        let path = path.as_ref();
        info!(path = %path.display(), "Loading config file");
        if !path.exists() {
            return Err(ScannerError::config(
                format!("config file '{}' does not exist", path.display()),
                None,
            ));
        }

        let builder = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(
                config::Environment::with_prefix("SWAPSCAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or validation fails.
    pub fn from_toml_str(text: &str) -> ScannerResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> ScannerResult<Self> {
        let config: Self = builder
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ScannerError::config("failed to parse config", Some(Box::new(e))))?;

        config.validate()?;

        if let Ok(json) = serde_json::to_string(&config) {
            debug!(config = %json, "Config loaded");
        }
        info!(
            tokens = config.tokens.len(),
            dst = config.dst.is_some(),
            "Config validated"
        );
        Ok(config)
    }

    /// Validate the whole configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty token list, duplicate
    /// pair IDs on one side, duplicate token/deposit pairs, invalid token
    /// entries or invalid scanner knobs.
    pub fn validate(&self) -> ScannerResult<()> {
        if self.tokens.is_empty() {
            return Err(ScannerError::config("no token config exist", None));
        }

        self.src.check(ChainSide::Src)?;
        if let Some(dst) = &self.dst {
            dst.check(ChainSide::Dst)?;
        }

        let mut pair_ids = HashSet::new();
        let mut token_keys = HashSet::new();
        for token in &self.tokens {
            token.check()?;

            if token.side() == ChainSide::Dst && self.dst.is_none() {
                return Err(ScannerError::config(
                    format!(
                        "destination token '{}' configured without a [dst] section",
                        token.pair_id
                    ),
                    None,
                ));
            }

            let pair_key = (token.side(), token.pair_id.to_lowercase());
            if !pair_ids.insert(pair_key) {
                return Err(ScannerError::config(
                    format!("duplicate pair_id config '{}'", token.pair_id),
                    None,
                ));
            }

            if let Some(contract) = token.contract_address() {
                let token_key = (contract, token.deposit_address);
                if !token_keys.insert(token_key) {
                    return Err(ScannerError::config(
                        format!(
                            "duplicate token config {contract}:{}",
                            token
                                .deposit_address
                                .map_or_else(String::new, |a| a.to_string())
                        ),
                        None,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Apply command-line overrides to every configured chain side.
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden configuration no longer validates.
    pub fn apply_overrides(&mut self, overrides: Overrides) -> ScannerResult<()> {
        let sides = std::iter::once(&mut self.src).chain(self.dst.as_mut());
        for chain in sides {
            if overrides.scan_receipt {
                chain.scan_receipt = true;
            }
            if let Some(start) = overrides.start_height {
                chain.start_height = start;
            }
            if let Some(timeout) = overrides.timeout_secs {
                chain.process_block_timeout_secs = timeout;
            }
        }
        self.validate()
    }

    /// Scanner knobs for a chain side, if that side is configured.
    #[must_use]
    pub const fn chain(&self, side: ChainSide) -> Option<&ChainScanConfig> {
        match side {
            ChainSide::Src => Some(&self.src),
            ChainSide::Dst => self.dst.as_ref(),
        }
    }

    /// Token routes scanned on a chain side, in configuration order.
    #[must_use]
    pub fn tokens_for(&self, side: ChainSide) -> Vec<TokenConfig> {
        self.tokens
            .iter()
            .filter(|token| token.side() == side)
            .cloned()
            .collect()
    }
}

const fn default_true() -> bool {
    true
}

const fn default_start_height() -> i64 {
    -200
}

const fn default_job_count() -> u64 {
    1
}

const fn default_block_timeout() -> u64 {
    300
}

const fn default_rpc_interval() -> u64 {
    1_000
}

const fn default_rpc_retry_count() -> u32 {
    5
}

const fn default_tail_interval() -> u64 {
    1_000
}

fn default_database_url() -> String {
    "sqlite:./swaps.db".to_string()
}
