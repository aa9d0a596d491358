pub mod config;

pub use config::{ChainSpec, MAINNET_SPEC};
