//! Ledger-wide constants
//! Centralized location for metadata limits and runtime defaults

// PRECISION
pub const TOKEN_DECIMALS: u8 = 9;                 // 1 unit == 1 lamport
pub const LAMPORTS_PER_TOKEN: u64 = 1_000_000_000; // 1e9

// METADATA LIMITS
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;

// DEFAULT METADATA
pub const DEFAULT_TOKEN_NAME: &str = "TW3 Wrapped SOL";
pub const DEFAULT_TOKEN_SYMBOL: &str = "tw3SOL";

// IN-PROCESS RUNTIME
pub const MAX_CALL_DEPTH: usize = 64;             // nested frames before CallDepthExceeded
