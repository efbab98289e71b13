//! Data API explorer.
//!
//! Lists the available databases, prints the schema of one dataset, pages through the
//! most recent blocks and fetches a daily chain series.
//!
//! Requires an API key in `BLOCKWATCH_API_KEY`. Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example blockwatch --features data,blockchain,tracing -- BITCOIN 799990
//! ```
//!
//! Optionally log to a file:
//! ```sh
//! LOG_FILE=blockwatch.log RUST_LOG=info cargo run --example blockwatch --features data,blockchain,tracing
//! ```

use std::fs::File;

use blockwatch_client_sdk::blockchain::{Block, Chain};
use blockwatch_client_sdk::config::Config;
use blockwatch_client_sdk::data::Client;
use blockwatch_client_sdk::data::types::request::{
    DatabasesRequest, DatasetRequest, SeriesRequest, TableRequest,
};
use blockwatch_client_sdk::data::types::{CollapseMode, Filter, FilterMode, Filters, OrderMode};
use blockwatch_client_sdk::types::{TimeDelta, Utc};
use futures::StreamExt as _;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let mut args = std::env::args().skip(1);
    let database = args.next().unwrap_or_else(|| "BITCOIN".to_owned());
    let from_height = args.next().unwrap_or_else(|| "799990".to_owned());

    let client = Client::from_env(Config::default())?;

    match client
        .databases(&DatabasesRequest::builder().limit(10).build())
        .await
    {
        Ok(list) => {
            info!(endpoint = "databases", count = list.meta.count, cursor = ?list.meta.cursor);
            for db in &list.databases {
                info!(endpoint = "databases", code = %db.code, name = %db.name, premium = db.is_premium);
            }
        }
        Err(e) => error!(endpoint = "databases", error = %e),
    }

    match client
        .dataset(
            &DatasetRequest::builder()
                .database(&database)
                .dataset("BLOCK")
                .build(),
        )
        .await
    {
        Ok(dataset) => {
            for column in &dataset.columns {
                info!(endpoint = "dataset", code = %column.code, r#type = %column.field_type);
            }
        }
        Err(e) => warn!(endpoint = "dataset", database = %database, error = %e),
    }

    // Page through blocks above the requested height, 5 rows at a time
    let request = TableRequest::builder()
        .database(&database)
        .dataset("BLOCK")
        .filters(Filters::new().with(Filter::new("height", FilterMode::Gte, from_height)))
        .limit(5)
        .build();

    let stream = client.stream_table(&request).take(3);
    tokio::pin!(stream);

    while let Some(page) = stream.next().await {
        let mut page = match page {
            Ok(page) => page,
            Err(e) => {
                error!(endpoint = "table", error = %e);
                break;
            }
        };

        match page.column("n_tx") {
            Ok((index, values)) => info!(endpoint = "table", column = "n_tx", index, rows = values.len()),
            Err(e) => warn!(endpoint = "table", column = "n_tx", error = %e),
        }

        let blocks: Vec<Block> = page.decode_all(client.descriptors())?;
        for block in &blocks {
            info!(
                endpoint = "table",
                height = block.height,
                time = %block.time,
                txs = block.tx_count,
                hash = %block.hash
            );
        }
    }

    let now = Utc::now();
    let request = SeriesRequest::builder()
        .database(&database)
        .dataset("CHAIN")
        .collapse(CollapseMode::Daily)
        .order(OrderMode::Asc)
        .start_date(now - TimeDelta::days(7))
        .end_date(now)
        .build();

    match client.series_records::<Chain>(&request).await {
        Ok(days) => {
            for day in &days {
                info!(endpoint = "series", time = %day.time, height = day.height, total_tx = day.total_tx);
            }
        }
        Err(e) => error!(endpoint = "series", error = %e),
    }

    Ok(())
}
