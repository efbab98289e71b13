#![cfg(feature = "data")]
#![allow(
    clippy::unwrap_used,
    reason = "Do not need additional syntax for setting up tests"
)]

mod common;

mod metadata {
    use blockwatch_client_sdk::data::types::request::{
        DatabasesRequest, DatasetRequest, DatasetsRequest,
    };
    use blockwatch_client_sdk::frame::FieldType;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::{API_KEY, API_KEY_HEADER, block_columns, client};

    #[tokio::test]
    async fn databases_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/databases")
                .query_param("limit", "2")
                .header(API_KEY_HEADER, API_KEY);
            then.status(StatusCode::OK).json_body(json!({
                "meta": { "count": 2, "cursor": "BITCOIN" },
                "databases": [
                    { "database_id": "d1", "code": "BITCOIN", "name": "Bitcoin", "type": "table" },
                    { "database_id": "d2", "code": "LITECOIN", "name": "Litecoin", "type": "table", "is_premium": true }
                ]
            }));
        });

        let request = DatabasesRequest::builder().limit(2).build();
        let list = client.databases(&request).await?;

        mock.assert();
        assert_eq!(list.meta.count, 2);
        assert_eq!(list.meta.cursor.as_deref(), Some("BITCOIN"));
        assert_eq!(list.databases[0].code, "BITCOIN");
        assert!(list.databases[1].is_premium, "second database is premium");

        Ok(())
    }

    #[tokio::test]
    async fn datasets_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/databases/BITCOIN/codes.json");
            then.status(StatusCode::OK).json_body(json!([
                { "database_code": "BITCOIN", "dataset_code": "BLOCK", "type": "table" },
                { "database_code": "BITCOIN", "dataset_code": "CHAIN", "type": "series" }
            ]));
        });

        let request = DatasetsRequest::builder().database("BITCOIN").build();
        let datasets = client.datasets(&request).await?;

        mock.assert();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[1].dataset, "CHAIN");
        assert_eq!(datasets[1].dataset_type, "series");

        Ok(())
    }

    #[tokio::test]
    async fn dataset_should_return_schema() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/databases/BITCOIN/BLOCK/metadata.json");
            then.status(StatusCode::OK).json_body(json!({
                "database_code": "BITCOIN",
                "dataset_code": "BLOCK",
                "type": "table",
                "name": "Blocks",
                "columns": block_columns(),
                "filters": ["height", "time"],
                "primary_key": ["height"]
            }));
        });

        let request = DatasetRequest::builder()
            .database("BITCOIN")
            .dataset("BLOCK")
            .build();
        let dataset = client.dataset(&request).await?;

        mock.assert();
        assert_eq!(dataset.columns.len(), 6);
        assert_eq!(dataset.columns[1].field_type, FieldType::Datetime);
        assert_eq!(dataset.primary_fields, ["height"]);

        Ok(())
    }
}

mod table {
    use blockwatch_client_sdk::data::types::request::TableRequest;
    use blockwatch_client_sdk::data::types::{Filter, FilterMode, Filters};
    use blockwatch_client_sdk::error::{ApiError, Kind};
    use blockwatch_client_sdk::frame::ColumnValues;
    use futures_util::StreamExt as _;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::{block_columns, block_rows, client};

    #[tokio::test]
    async fn table_should_send_columns_and_filters() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/tables/BITCOIN/BLOCK.json")
                .query_param("columns", "height,time,hash,n_tx,volume,coinbase")
                .query_param("height.gte", "800000")
                .query_param("limit", "2");
            then.status(StatusCode::OK).json_body(json!({
                "columns": block_columns(),
                "data": block_rows(),
                "limit": 2,
                "count": 2,
                "cursor": "800001"
            }));
        });

        let request = TableRequest::builder()
            .database("BITCOIN")
            .dataset("BLOCK")
            .columns(
                ["height", "time", "hash", "n_tx", "volume", "coinbase"]
                    .map(str::to_owned)
                    .to_vec(),
            )
            .filters(Filters::new().with(Filter::new("height", FilterMode::Gte, "800000")))
            .limit(2)
            .build();
        let table = client.table(&request).await?;

        mock.assert();
        assert_eq!(table.len(), 2);
        assert_eq!(table.count, 2);
        assert_eq!(table.cursor.as_deref(), Some("800001"));
        assert_eq!(table.uint64_at(0, 1)?, 800_001);
        assert_eq!(table.string_at(2, 0)?, "00000000000000000002a7c4");

        let (index, values) = table.column("n_tx")?;
        assert_eq!(index, 3);
        assert!(
            matches!(&values, ColumnValues::Uint64(counts) if counts == &[3721, 2954]),
            "{values:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn table_rows_should_keep_wire_numerals() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/tables/BITCOIN/FLOW.json");
            then.status(StatusCode::OK)
                .header("content-type", "application/json")
                .body(
                    r#"{"columns": [
                        {"name": "Delta", "code": "delta", "type": "int64"},
                        {"name": "Amount", "code": "amount", "type": "float64"}
                    ],
                    "data": [[-0, 1.50], [3, 1e400]],
                    "count": 2}"#,
                );
        });

        let request = TableRequest::builder()
            .database("BITCOIN")
            .dataset("FLOW")
            .build();
        let table = client.table(&request).await?;

        mock.assert();
        assert_eq!(table.rows()[0].as_str(), "[-0, 1.50]");
        assert_eq!(table.int64_at(0, 0)?, 0);
        assert_eq!(table.int64_at(0, 1)?, 3);

        let err = table.float64_at(1, 1).unwrap_err();
        assert_eq!(err.kind(), Kind::Decode);
        assert!(err.to_string().contains("1e400"), "{err}");

        Ok(())
    }

    #[tokio::test]
    async fn in_body_error_should_fail_as_api_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/tables/BITCOIN/BLOCK.json");
            then.status(StatusCode::OK).json_body(json!({
                "columns": [],
                "data": [],
                "error": {
                    "code": 2001,
                    "status": 400,
                    "message": "invalid filter",
                    "detail": "column 'foo' does not exist",
                    "requestId": "req-1"
                }
            }));
        });

        let request = TableRequest::builder()
            .database("BITCOIN")
            .dataset("BLOCK")
            .build();
        let err = client.table(&request).await.unwrap_err();

        mock.assert();
        assert_eq!(err.kind(), Kind::Api);
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.code, 2001);
        assert_eq!(
            api.to_string(),
            "invalid filter: column 'foo' does not exist (request req-1)"
        );

        Ok(())
    }

    #[tokio::test]
    async fn stream_table_should_follow_cursor() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);
        let rows = block_rows();

        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/tables/BITCOIN/BLOCK.json")
                .query_param("cursor", "start");
            then.status(StatusCode::OK).json_body(json!({
                "columns": block_columns(),
                "data": [rows[0]],
                "count": 1,
                "cursor": "800000"
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/tables/BITCOIN/BLOCK.json")
                .query_param("cursor", "800000");
            then.status(StatusCode::OK).json_body(json!({
                "columns": block_columns(),
                "data": [rows[1]],
                "count": 1,
                "cursor": "800001"
            }));
        });
        let last = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/tables/BITCOIN/BLOCK.json")
                .query_param("cursor", "800001");
            then.status(StatusCode::OK).json_body(json!({
                "columns": block_columns(),
                "data": [],
                "count": 0,
                "cursor": "800001"
            }));
        });

        let request = TableRequest::builder()
            .database("BITCOIN")
            .dataset("BLOCK")
            .cursor("start")
            .build();

        let pages: Vec<_> = client.stream_table(&request).collect().await;

        first.assert();
        second.assert();
        last.assert();
        assert_eq!(pages.len(), 3);

        let heights = pages
            .into_iter()
            .map(|page| {
                let page = page.unwrap();
                (0..page.len())
                    .map(|row| page.uint64_at(0, row).unwrap())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert_eq!(heights, vec![vec![800_000], vec![800_001], vec![]]);

        Ok(())
    }

    #[tokio::test]
    async fn stream_table_should_stop_on_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/tables/BITCOIN/BLOCK.json");
            then.status(StatusCode::INTERNAL_SERVER_ERROR).body("boom");
        });

        let request = TableRequest::builder()
            .database("BITCOIN")
            .dataset("BLOCK")
            .build();
        let pages: Vec<_> = client.stream_table(&request).collect().await;

        mock.assert();
        assert_eq!(pages.len(), 1);
        let err = pages.into_iter().next().unwrap().unwrap_err();
        assert_eq!(err.kind(), Kind::Status);
        assert!(err.is_temporary(), "server errors are temporary");

        Ok(())
    }
}

mod series {
    use blockwatch_client_sdk::data::types::request::SeriesRequest;
    use blockwatch_client_sdk::data::types::{CollapseMode, OrderMode};
    use blockwatch_client_sdk::types::DateTime;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::client;

    #[tokio::test]
    async fn series_should_send_range_and_collapse() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/series/BITCOIN/CHAIN.json")
                .query_param("collapse", "1d")
                .query_param("order", "asc")
                .query_param("start_date", "2024-01-01T00:00:00Z")
                .query_param("end_date", "2024-01-03T00:00:00Z");
            then.status(StatusCode::OK).json_body(json!({
                "columns": [
                    { "name": "Time", "code": "time", "type": "datetime" },
                    { "name": "Transactions", "code": "total_tx", "type": "uint64" }
                ],
                "data": [
                    [1_704_067_200_000_i64, 950_000_000],
                    [1_704_153_600_000_i64, 950_400_000]
                ],
                "collapse": "1d",
                "order": "asc",
                "start_date": 1_704_067_200_000_i64,
                "end_date": 1_704_240_000_000_i64,
                "count": 2
            }));
        });

        let request = SeriesRequest::builder()
            .database("BITCOIN")
            .dataset("CHAIN")
            .collapse(CollapseMode::Daily)
            .order(OrderMode::Asc)
            .start_date(DateTime::from_timestamp(1_704_067_200, 0).unwrap())
            .end_date(DateTime::from_timestamp(1_704_240_000, 0).unwrap())
            .build();
        let series = client.series(&request).await?;

        mock.assert();
        assert_eq!(series.collapse, CollapseMode::Daily);
        assert_eq!(series.count, 2);
        assert_eq!(series.start_date, request.start_date);
        assert_eq!(series.uint64_column(1)?, vec![950_000_000, 950_400_000]);
        assert_eq!(series.time_at(0, 1)?.timestamp(), 1_704_153_600);

        Ok(())
    }
}

mod errors {
    use blockwatch_client_sdk::RATE_LIMIT_RESET_HEADER;
    use blockwatch_client_sdk::data::types::request::{DatabasesRequest, DatasetsRequest};
    use blockwatch_client_sdk::error::{Kind, RateLimited, Status};
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::client;

    #[tokio::test]
    async fn error_envelope_should_become_status_message() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/databases");
            then.status(StatusCode::UNAUTHORIZED).json_body(json!({
                "errors": [{
                    "code": 1001,
                    "status": 401,
                    "message": "access denied",
                    "detail": "invalid API key",
                    "requestId": "r-42"
                }]
            }));
        });

        let err = client
            .databases(&DatabasesRequest::default())
            .await
            .unwrap_err();

        mock.assert();
        assert_eq!(err.kind(), Kind::Status);
        assert!(!err.is_temporary(), "unauthorized is permanent");
        let status = err.downcast_ref::<Status>().unwrap();
        assert_eq!(status.status_code, StatusCode::UNAUTHORIZED);
        assert_eq!(status.message, "access denied: invalid API key (request r-42)");
        assert_eq!(status.errors[0].code, 1001);

        Ok(())
    }

    #[tokio::test]
    async fn too_many_requests_should_report_reset() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/databases");
            then.status(StatusCode::TOO_MANY_REQUESTS)
                .header(RATE_LIMIT_RESET_HEADER, "4102444800")
                .body("slow down");
        });

        let err = client
            .databases(&DatabasesRequest::default())
            .await
            .unwrap_err();

        mock.assert();
        assert_eq!(err.kind(), Kind::RateLimited);
        let limited = err.downcast_ref::<RateLimited>().unwrap();
        assert_eq!(limited.reset.unwrap().timestamp(), 4_102_444_800);
        assert_eq!(limited.message, "slow down");
        assert!(!limited.remaining().is_zero(), "reset lies in the future");

        Ok(())
    }

    #[cfg(feature = "retry")]
    #[tokio::test]
    async fn rate_limited_request_should_be_retried() -> anyhow::Result<()> {
        use std::time::Duration;

        use blockwatch_client_sdk::config::{Config, RetryConfig};
        use blockwatch_client_sdk::data::Client;

        use crate::common::API_KEY;

        let server = MockServer::start();

        let mut retry = RetryConfig::default();
        retry.max_attempts = Some(3);
        retry.initial_backoff = Duration::from_millis(5);
        retry.max_backoff = Duration::from_millis(20);

        let config = Config::builder()
            .host(server.url("/v1/"))
            .retry(retry)
            .build();
        let client = Client::new(API_KEY.into(), config)?;

        // Reset already passed, so the backoff interval applies.
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/databases");
            then.status(StatusCode::TOO_MANY_REQUESTS)
                .header(RATE_LIMIT_RESET_HEADER, "1");
        });

        let err = client
            .databases(&DatabasesRequest::default())
            .await
            .unwrap_err();

        mock.assert_calls(3);
        assert_eq!(err.kind(), Kind::RateLimited);

        Ok(())
    }

    #[tokio::test]
    async fn null_body_should_be_not_found() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/databases");
            then.status(StatusCode::OK).json_body(json!(null));
        });

        let err = client
            .databases(&DatabasesRequest::default())
            .await
            .unwrap_err();

        mock.assert();
        let status = err.downcast_ref::<Status>().unwrap();
        assert_eq!(status.status_code, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[tokio::test]
    async fn empty_success_body_should_be_status_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = client(&server);

        let no_content = server.mock(|when, then| {
            when.method(GET).path("/v1/databases");
            then.status(StatusCode::NO_CONTENT);
        });
        let blank = server.mock(|when, then| {
            when.method(GET).path("/v1/databases/BITCOIN/codes.json");
            then.status(StatusCode::OK).body("  \n");
        });

        let err = client
            .databases(&DatabasesRequest::default())
            .await
            .unwrap_err();
        no_content.assert();
        assert_eq!(err.kind(), Kind::Status);
        let status = err.downcast_ref::<Status>().unwrap();
        assert_eq!(status.status_code, StatusCode::NO_CONTENT);
        assert_eq!(status.message, "Empty response body");
        assert!(!err.is_temporary());

        let err = client
            .datasets(&DatasetsRequest::builder().database("BITCOIN").build())
            .await
            .unwrap_err();
        blank.assert();
        let status = err.downcast_ref::<Status>().unwrap();
        assert_eq!(status.status_code, StatusCode::OK);
        assert_eq!(status.message, "Empty response body");

        Ok(())
    }
}
