//! Records for the blockchain datasets.
//!
//! **Feature flag:** `blockchain`
//!
//! Each type binds the columns of one dataset (for example `BITCOIN/BLOCK` into
//! [`Block`]). Columns not requested are left at their default values.
//!
//! ```no_run
//! use blockwatch_client_sdk::blockchain::Block;
//! use blockwatch_client_sdk::config::Config;
//! use blockwatch_client_sdk::data::{Client, types::request::TableRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_env(Config::default())?;
//! let request = TableRequest::builder()
//!     .database("BITCOIN")
//!     .dataset("BLOCK")
//!     .limit(5)
//!     .build();
//!
//! for block in client.table_records::<Block>(&request).await? {
//!     println!("{} {} txs", block.height, block.tx_count);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};

crate::record! {
    /// A block header with per-block aggregates.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct Block {
        pub row_id: u64 => "row_id",
        pub parent_id: u64 => "parent_id",
        pub is_orphan: bool => "is_orphan",
        pub hash: String => "hash",
        pub time: DateTime<Utc> => "time",
        pub median_time: DateTime<Utc> => "mediantime",
        pub height: u64 => "height",
        pub version: i64 => "version",
        pub size: u64 => "size",
        pub weight: u64 => "weight",
        pub bits: u64 => "bits",
        pub chain_work: f64 => "chainwork",
        pub difficulty: f64 => "difficulty",
        /// Raw coinbase script.
        pub coinbase: Vec<u8> => "coinbase",
        pub addresses_seen: u64 => "n_addr",
        pub addresses_created: u64 => "n_new_addr",
        pub addresses_emptied: u64 => "n_empty_addr",
        pub addresses_funded: u64 => "n_funded_addr",
        pub tx_count: u64 => "n_tx",
        pub utxo_consumed: u64 => "n_vin",
        pub utxo_created: u64 => "n_vout",
        pub spendable_utxo_created: u64 => "n_vout_spendable",
        pub volume: f64 => "volume",
        pub reward: f64 => "reward",
        pub fee: f64 => "fee",
        pub burned: f64 => "burned",
        pub days_destroyed: f64 => "days_destroyed",
        /// Seconds since the parent block.
        pub solvetime: u64 => "solvetime",
    }
}

crate::record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct Tx {
        pub row_id: u64 => "row_id",
        pub time: DateTime<Utc> => "time",
        pub height: u64 => "height",
        /// Position inside the block.
        pub position: u64 => "tx_n",
        pub tx_id: String => "tx_id",
        pub locktime: i64 => "locktime",
        pub size: i64 => "size",
        pub vsize: i64 => "vsize",
        pub version: i64 => "version",
        pub n_in: i64 => "n_in",
        pub n_out: i64 => "n_out",
        pub tx_type: String => "type",
        pub has_data: bool => "has_data",
        pub volume: f64 => "volume",
        pub fee: f64 => "fee",
        pub days_destroyed: f64 => "days_destroyed",
    }
}

crate::record! {
    /// Running chain totals at one height.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct Chain {
        pub height: u64 => "height",
        pub time: DateTime<Utc> => "time",
        pub difficulty: f64 => "difficulty",
        pub hashrate_3h: f64 => "hashrate_3h",
        pub hashrate_12h: f64 => "hashrate_12h",
        pub total_work: f64 => "total_work",
        pub total_size: u64 => "total_size",
        pub total_tx: u64 => "total_tx",
        pub total_utxo: u64 => "total_utxo",
        pub total_addr: u64 => "total_addr",
        pub funded_addr: u64 => "funded_addr",
        pub total_supply: f64 => "total_supply",
        pub minted_supply: f64 => "minted_supply",
        pub mined_supply: f64 => "mined_supply",
        pub current_supply: f64 => "current_supply",
        pub locked_supply: f64 => "locked_supply",
        pub burned_supply: f64 => "burned_supply",
    }
}

crate::record! {
    /// One output from funding to (optional) spending.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct Flow {
        pub row_id: u64 => "row_id",
        pub fund_time: DateTime<Utc> => "fund_time",
        pub fund_height: u64 => "fund_height",
        pub fund_position: u64 => "fund_txpos",
        pub fund_output: u64 => "fund_vout",
        pub fund_tx_id: String => "fund_txid",
        pub volume: f64 => "volume",
        pub coin_gen_min: u64 => "coin_gen_min",
        pub coin_gen_max: u64 => "coin_gen_max",
        pub address_count: u64 => "n_addr",
        pub signature_count: u64 => "n_req_sig",
        pub address_type: String => "addr_type",
        pub address: String => "addr",
        pub data: Vec<u8> => "data",
        pub is_burned: bool => "is_burned",
        pub is_spendable: bool => "is_spendable",
        pub is_spent: bool => "is_spent",
        pub spend_time: DateTime<Utc> => "spend_time",
        pub spend_height: u64 => "spend_height",
        pub spend_position: u64 => "spend_txpos",
        pub spend_input: u64 => "spend_vin",
        pub spend_tx_id: String => "spend_txid",
    }
}

crate::record! {
    /// Addresses and funds dormant for at least N years, for N in 1..=20.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct AddressAgeStats {
        pub time: DateTime<Utc> => "time",
        pub y1_addr: i64 => "y1_addr",
        pub y1_funds: f64 => "y1_funds",
        pub y2_addr: i64 => "y2_addr",
        pub y2_funds: f64 => "y2_funds",
        pub y3_addr: i64 => "y3_addr",
        pub y3_funds: f64 => "y3_funds",
        pub y4_addr: i64 => "y4_addr",
        pub y4_funds: f64 => "y4_funds",
        pub y5_addr: i64 => "y5_addr",
        pub y5_funds: f64 => "y5_funds",
        pub y6_addr: i64 => "y6_addr",
        pub y6_funds: f64 => "y6_funds",
        pub y7_addr: i64 => "y7_addr",
        pub y7_funds: f64 => "y7_funds",
        pub y8_addr: i64 => "y8_addr",
        pub y8_funds: f64 => "y8_funds",
        pub y9_addr: i64 => "y9_addr",
        pub y9_funds: f64 => "y9_funds",
        pub y10_addr: i64 => "y10_addr",
        pub y10_funds: f64 => "y10_funds",
        pub y11_addr: i64 => "y11_addr",
        pub y11_funds: f64 => "y11_funds",
        pub y12_addr: i64 => "y12_addr",
        pub y12_funds: f64 => "y12_funds",
        pub y13_addr: i64 => "y13_addr",
        pub y13_funds: f64 => "y13_funds",
        pub y14_addr: i64 => "y14_addr",
        pub y14_funds: f64 => "y14_funds",
        pub y15_addr: i64 => "y15_addr",
        pub y15_funds: f64 => "y15_funds",
        pub y16_addr: i64 => "y16_addr",
        pub y16_funds: f64 => "y16_funds",
        pub y17_addr: i64 => "y17_addr",
        pub y17_funds: f64 => "y17_funds",
        pub y18_addr: i64 => "y18_addr",
        pub y18_funds: f64 => "y18_funds",
        pub y19_addr: i64 => "y19_addr",
        pub y19_funds: f64 => "y19_funds",
        pub y20_addr: i64 => "y20_addr",
        pub y20_funds: f64 => "y20_funds",
    }
}

crate::record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct AddressActivityStats {
        pub time: DateTime<Utc> => "time",
        pub block_count: i64 => "n_blocks",
        pub avg_solvetime: f64 => "avg_solvetime",
        pub size_growth: i64 => "size_growth",
        pub sum_rewards: f64 => "sum_rewards",
        pub sum_burned: f64 => "sum_burned",
        pub sum_days_destroyed: f64 => "sum_cdd",
        pub sum_volume: f64 => "sum_vol",
        pub sum_fee: f64 => "sum_fee",
        pub tx_count: i64 => "n_tx",
        pub utxo_created: i64 => "n_vout",
        pub spendable_utxo_created: i64 => "n_svout",
        pub unspendable_txo_created: i64 => "n_uvout",
        pub utxo_consumed: i64 => "n_vin",
        pub addresses_active: i64 => "n_addr_active",
        pub addresses_new: i64 => "n_addr_new",
        pub addresses_funded: i64 => "n_addr_funded",
        pub addresses_empty: i64 => "n_addr_empty",
        pub address_reuse_pct: f64 => "pct_addr_reuse",
        pub vol_top1: f64 => "vol_top1",
        pub vol_top10: f64 => "vol_top10",
        pub vol_top100: f64 => "vol_top100",
        pub vol_top1k: f64 => "vol_top1k",
        pub vol_top10k: f64 => "vol_top10k",
        pub vol_top100k: f64 => "vol_top100k",
        pub tx_top1: i64 => "tx_top1",
        pub tx_top10: i64 => "tx_top10",
        pub tx_top100: i64 => "tx_top100",
        pub tx_top1k: i64 => "tx_top1k",
        pub tx_top10k: i64 => "tx_top10k",
        pub tx_top100k: i64 => "tx_top100k",
    }
}

crate::record! {
    /// Wealth distribution. `funds_eN` and `addrs_eN` cover addresses holding at least
    /// 10^N base units.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct AddressBalanceStats {
        pub time: DateTime<Utc> => "time",
        pub rich_top1: f64 => "rich_top1",
        pub rich_top10: f64 => "rich_top10",
        pub rich_top100: f64 => "rich_top100",
        pub rich_top1k: f64 => "rich_top1k",
        pub rich_top10k: f64 => "rich_top10k",
        pub rich_top100k: f64 => "rich_top100k",
        pub funds_e0: f64 => "funds_e0",
        pub funds_e1: f64 => "funds_e1",
        pub funds_e2: f64 => "funds_e2",
        pub funds_e3: f64 => "funds_e3",
        pub funds_e4: f64 => "funds_e4",
        pub funds_e5: f64 => "funds_e5",
        pub funds_e6: f64 => "funds_e6",
        pub funds_e7: f64 => "funds_e7",
        pub funds_e8: f64 => "funds_e8",
        pub funds_e9: f64 => "funds_e9",
        pub funds_e10: f64 => "funds_e10",
        pub funds_e11: f64 => "funds_e11",
        pub funds_e12: f64 => "funds_e12",
        pub funds_e13: f64 => "funds_e13",
        pub funds_e14: f64 => "funds_e14",
        pub funds_e15: f64 => "funds_e15",
        pub funds_e16: f64 => "funds_e16",
        pub addrs_e0: i64 => "addrs_e0",
        pub addrs_e1: i64 => "addrs_e1",
        pub addrs_e2: i64 => "addrs_e2",
        pub addrs_e3: i64 => "addrs_e3",
        pub addrs_e4: i64 => "addrs_e4",
        pub addrs_e5: i64 => "addrs_e5",
        pub addrs_e6: i64 => "addrs_e6",
        pub addrs_e7: i64 => "addrs_e7",
        pub addrs_e8: i64 => "addrs_e8",
        pub addrs_e9: i64 => "addrs_e9",
        pub addrs_e10: i64 => "addrs_e10",
        pub addrs_e11: i64 => "addrs_e11",
        pub addrs_e12: i64 => "addrs_e12",
        pub addrs_e13: i64 => "addrs_e13",
        pub addrs_e14: i64 => "addrs_e14",
        pub addrs_e15: i64 => "addrs_e15",
        pub addrs_e16: i64 => "addrs_e16",
    }
}

crate::record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct SupplyStats {
        pub time: DateTime<Utc> => "time",
        pub total: f64 => "total",
        pub current: f64 => "current",
        pub circulating: f64 => "circulating",
        pub mined: f64 => "mined",
        pub locked: f64 => "locked",
        pub burned: f64 => "burned",
        pub untouched: f64 => "untouched",
        pub hodl_3m: f64 => "hodl_3m",
        pub tx_3m: f64 => "tx_3m",
        pub days_destroyed_3m: f64 => "cdd_3m",
        /// Coins issued over the last 24 hours.
        pub inflation: f64 => "inflation",
        pub inflation_rate: f64 => "inflation_rate",
    }
}

crate::record! {
    /// Per transaction type distribution of fees, sizes, inputs, outputs and volume.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct TxStats {
        pub time: DateTime<Utc> => "time",
        pub tx_type: String => "type",
        pub count: i64 => "n_tx",
        pub min_fee: f64 => "min_fee",
        pub max_fee: f64 => "max_fee",
        pub mean_fee: f64 => "mean_fee",
        pub median_fee: f64 => "median_fee",
        pub sum_fee: f64 => "sum_fee",
        pub min_fee_rate: f64 => "min_fee_rate",
        pub max_fee_rate: f64 => "max_fee_rate",
        pub mean_fee_rate: f64 => "mean_fee_rate",
        pub median_fee_rate: f64 => "median_fee_rate",
        pub sum_fee_rate: f64 => "sum_fee_rate",
        pub min_size: i64 => "min_size",
        pub max_size: i64 => "max_size",
        pub mean_size: f64 => "mean_size",
        pub median_size: f64 => "median_size",
        pub sum_size: i64 => "sum_size",
        pub min_inputs: i64 => "min_n_vin",
        pub max_inputs: i64 => "max_n_vin",
        pub mean_inputs: f64 => "mean_n_vin",
        pub median_inputs: f64 => "median_n_vin",
        pub sum_inputs: i64 => "sum_n_vin",
        pub min_outputs: i64 => "min_n_vout",
        pub max_outputs: i64 => "max_n_vout",
        pub mean_outputs: f64 => "mean_n_vout",
        pub median_outputs: f64 => "median_n_vout",
        pub sum_outputs: i64 => "sum_n_vout",
        pub min_volume: f64 => "min_vol",
        pub max_volume: f64 => "max_vol",
        pub mean_volume: f64 => "mean_vol",
        pub median_volume: f64 => "median_vol",
        pub sum_volume: f64 => "sum_vol",
        pub min_days_destroyed: f64 => "min_cdd",
        pub max_days_destroyed: f64 => "max_cdd",
        pub mean_days_destroyed: f64 => "mean_cdd",
        pub median_days_destroyed: f64 => "median_cdd",
        pub sum_days_destroyed: f64 => "sum_cdd",
        pub min_avg_days_destroyed: f64 => "min_add",
        pub max_avg_days_destroyed: f64 => "max_add",
        pub mean_avg_days_destroyed: f64 => "mean_add",
        pub median_avg_days_destroyed: f64 => "median_add",
        pub sum_avg_days_destroyed: f64 => "sum_add",
    }
}

crate::record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct UtxoStats {
        pub time: DateTime<Utc> => "time",
        pub utxo_type: String => "type",
        pub count: i64 => "n_out",
        pub volume: f64 => "vol",
    }
}
