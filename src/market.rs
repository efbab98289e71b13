//! Records for the market datasets.
//!
//! **Feature flag:** `market`

use chrono::{DateTime, Utc};

crate::record! {
    /// A single exchange trade.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct Trade {
        pub id: i64 => "id",
        pub time: DateTime<Utc> => "time",
        pub price: f64 => "price",
        pub amount: f64 => "amount",
        /// `true` when the taker sold.
        pub is_sell: bool => "sell",
    }
}

crate::record! {
    /// One candle of an OHLCV series. Volumes are split by taker side in base and quote
    /// currency.
    #[derive(Debug, Clone, Default, PartialEq)]
    #[non_exhaustive]
    pub struct Ohlcv {
        pub time: DateTime<Utc> => "time",
        pub open: f64 => "open",
        pub close: f64 => "close",
        pub high: f64 => "high",
        pub low: f64 => "low",
        pub vwap: f64 => "vwap",
        pub stddev: f64 => "stddev",
        pub mean: f64 => "mean",
        pub trade_count: i64 => "n_trades",
        pub buy_count: i64 => "n_buy",
        pub sell_count: i64 => "n_sell",
        pub vol_base: f64 => "vol_base",
        pub vol_quote: f64 => "vol_quote",
        pub vol_buy_base: f64 => "vol_buy_base",
        pub vol_buy_quote: f64 => "vol_buy_quote",
        pub vol_sell_base: f64 => "vol_sell_base",
        pub vol_sell_quote: f64 => "vol_sell_quote",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Dataframe, DescriptorCache};

    #[test]
    fn trades_should_bind_in_row_order() {
        let mut frame: Dataframe = serde_json::from_str(
            r#"{
                "columns": [
                    {"name": "Id", "code": "id", "type": "int64"},
                    {"name": "Time", "code": "time", "type": "datetime"},
                    {"name": "Price", "code": "price", "type": "float64"},
                    {"name": "Amount", "code": "amount", "type": "float64"},
                    {"name": "Sell", "code": "sell", "type": "boolean"}
                ],
                "data": [
                    [1, 1700000000000, 37000.5, 0.25, true],
                    [2, 1700000001000, 37001.0, 1.5, false]
                ]
            }"#,
        )
        .unwrap();

        let trades: Vec<Trade> = frame.decode_all(&DescriptorCache::new()).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].id, 1);
        assert!(trades[0].is_sell, "first trade is a sell");
        assert_eq!(trades[1].price.to_string(), "37001");
        assert_eq!(trades[1].time.timestamp_millis(), 1_700_000_001_000);
    }

    #[test]
    fn ohlcv_should_ignore_unknown_columns() {
        let mut frame: Dataframe = serde_json::from_str(
            r#"{
                "columns": [
                    {"name": "Time", "code": "time", "type": "datetime"},
                    {"name": "Open", "code": "open", "type": "float64"},
                    {"name": "Exchange", "code": "exchange", "type": "string"},
                    {"name": "Trades", "code": "n_trades", "type": "int64"}
                ],
                "data": [[1700000000000, 36990.0, "kraken", 42]]
            }"#,
        )
        .unwrap();

        let candles: Vec<Ohlcv> = frame.decode_all(&DescriptorCache::new()).unwrap();

        assert_eq!(candles[0].trade_count, 42);
        assert_eq!(candles[0].open.to_string(), "36990");
        assert_eq!(candles[0].close.to_string(), "0", "close untouched");
    }
}
