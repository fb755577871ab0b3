use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SudtFeeConfig {
    #[serde(with = "alloy_serde::quantity")]
    pub sudt_id: u32,
    #[serde(with = "alloy_serde::quantity")]
    pub fee_rate_weight: u64,
}

/// Fee parameters of the node, fetched read-only through `gw_get_fee_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    #[serde(with = "alloy_serde::quantity")]
    pub meta_cycles_limit: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub sudt_cycles_limit: u64,
    #[serde(with = "alloy_serde::quantity")]
    pub withdraw_cycles_limit: u64,
    pub sudt_fee_rate_weight: Vec<SudtFeeConfig>,
}

impl FeeConfig {
    pub fn fee_rate_weight(&self, sudt_id: u32) -> Option<u64> {
        self.sudt_fee_rate_weight
            .iter()
            .find(|config| config.sudt_id == sudt_id)
            .map(|config| config.fee_rate_weight)
    }
}
