use std::path::PathBuf;

use alloy_primitives::Address;
use clap::Parser;
use godwoken_lib::{L2Signer, LogFormat};
use url::Url;

use crate::{load_client_config, ClientConfig, SettlementPolicy};

/// Creates a layer 2 account for an Ethereum address and checks that the fee was settled
#[derive(Parser, Debug)]
pub struct CreateAccountArgs {
    /// Path to the config toml file
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Node endpoint. Overrides `rpc_url` from the config file.
    #[arg(long)]
    pub rpc_url: Option<Url>,

    /// Hex encoded key of an account that already exists on layer 2 and pays the fee.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: L2Signer,

    /// Address to create the account for. A throwaway address is generated when omitted.
    #[arg(long)]
    pub target_eth_address: Option<Address>,

    #[arg(long, value_enum)]
    pub settlement: Option<SettlementPolicy>,

    #[arg(long)]
    pub skip_fee_check: bool,

    #[arg(long = "log-format", value_name = "FORMAT", default_value_t = LogFormat::Terminal)]
    pub log_format: LogFormat,
}

impl CreateAccountArgs {
    /// Config file contents with command line overrides applied.
    pub fn client_config(&self) -> eyre::Result<ClientConfig> {
        let mut config = match (&self.config_path, &self.rpc_url) {
            (Some(path), _) => load_client_config(path)?,
            (None, Some(rpc_url)) => ClientConfig::new(rpc_url.clone()),
            (None, None) => eyre::bail!("either --config-path or --rpc-url is required"),
        };
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(settlement) = self.settlement {
            config.polling.settlement = settlement;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use godwoken_lib::test_utils::{test_signer, TARGET_ETH_ADDRESS};

    use super::*;

    const KEY: &str = "0xdd50cac37ec6dd12539a968c1a2cbedda75bd8724f7bcad486548eaabb87fc8b";

    #[test]
    fn test_parse_args() -> eyre::Result<()> {
        let args = CreateAccountArgs::try_parse_from([
            "godwoken-create-account",
            "--rpc-url",
            "http://127.0.0.1:8024",
            "--private-key",
            KEY,
            "--target-eth-address",
            "0xa9b2e1a8b4e6b2cf3b9e4f5c1e0d62b3a4c5d6e7",
            "--settlement",
            "require-committed",
            "--log-format",
            "json",
        ])?;
        assert_eq!(args.private_key.eth_address(), test_signer().eth_address());
        assert_eq!(args.target_eth_address, Some(TARGET_ETH_ADDRESS));
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(!args.skip_fee_check);

        let config = args.client_config()?;
        assert_eq!(config.rpc_url.port(), Some(8024));
        assert_eq!(config.polling.settlement, SettlementPolicy::RequireCommitted);
        Ok(())
    }

    #[test]
    fn test_rejects_malformed_private_key() {
        let parsed = CreateAccountArgs::try_parse_from([
            "godwoken-create-account",
            "--rpc-url",
            "http://127.0.0.1:8024",
            "--private-key",
            "0x1234",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_requires_an_endpoint() -> eyre::Result<()> {
        let args =
            CreateAccountArgs::try_parse_from(["godwoken-create-account", "--private-key", KEY])?;
        assert!(args.client_config().is_err());
        Ok(())
    }
}
