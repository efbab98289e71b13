//! Market data as typed records.
//!
//! Fetches the latest trades and hourly candles of one market and binds them into
//! [`Trade`] and [`Ohlcv`] records.
//!
//! Requires an API key in `BLOCKWATCH_API_KEY`. Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example records --features data,market,tracing -- KRAKEN BTC_USD
//! ```

use blockwatch_client_sdk::config::Config;
use blockwatch_client_sdk::data::Client;
use blockwatch_client_sdk::data::types::request::{SeriesRequest, TableRequest};
use blockwatch_client_sdk::data::types::{CollapseMode, OrderMode};
use blockwatch_client_sdk::market::{Ohlcv, Trade};
use blockwatch_client_sdk::types::{TimeDelta, Utc};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let exchange = args.next().unwrap_or_else(|| "KRAKEN".to_owned());
    let market = args.next().unwrap_or_else(|| "BTC_USD".to_owned());

    let client = Client::from_env(Config::default())?;

    let request = TableRequest::builder()
        .database(&exchange)
        .dataset(format!("{market}_TRADE"))
        .columns(vec![
            "id".to_owned(),
            "time".to_owned(),
            "price".to_owned(),
            "amount".to_owned(),
            "sell".to_owned(),
        ])
        .limit(10)
        .build();

    match client.table_records::<Trade>(&request).await {
        Ok(trades) => {
            info!(endpoint = "trades", count = trades.len());
            for trade in &trades {
                info!(
                    endpoint = "trades",
                    id = trade.id,
                    time = %trade.time,
                    price = trade.price,
                    amount = trade.amount,
                    sell = trade.is_sell
                );
            }
        }
        Err(e) => error!(endpoint = "trades", error = %e),
    }

    let now = Utc::now();
    let request = SeriesRequest::builder()
        .database(&exchange)
        .dataset(format!("{market}_OHLCV"))
        .collapse(CollapseMode::OneHour)
        .order(OrderMode::Desc)
        .start_date(now - TimeDelta::hours(12))
        .end_date(now)
        .build();

    match client.series_records::<Ohlcv>(&request).await {
        Ok(candles) => {
            for candle in &candles {
                info!(
                    endpoint = "ohlcv",
                    time = %candle.time,
                    open = candle.open,
                    close = candle.close,
                    vwap = candle.vwap,
                    trades = candle.trade_count
                );
            }
        }
        Err(e) => error!(endpoint = "ohlcv", error = %e),
    }

    Ok(())
}
