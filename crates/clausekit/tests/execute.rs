//! Execution hand-off against a live database. Skipped without `DATABASE_URL`.

use clausekit::{BuilderError, BuilderResult, BuilderSettings, FluentBuilder, FormatHint};
use tokio_postgres::NoTls;

async fn connect(test: &str) -> BuilderResult<Option<tokio_postgres::Client>> {
    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return Ok(None);
        }
    };

    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(BuilderError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });
    Ok(Some(client))
}

#[tokio::test]
async fn bound_values_round_trip() -> BuilderResult<()> {
    let Some(client) = connect("bound_values_round_trip").await? else {
        return Ok(());
    };

    let id = uuid::Uuid::new_v4();
    let at = chrono::Utc::now();
    let mut b = FluentBuilder::new();
    b.select(|s| {
        s.append_formatted(id, FormatHint::None)
            .append_literal("::uuid AS id, ")
            .append_formatted(at, FormatHint::None)
            .append_literal("::timestamptz AS at, ")
            .append_formatted(7_i64, FormatHint::None)
            .append_literal("::int8 AS n");
    })?;

    let row = b.build()?.query_one(&client).await?;
    let got_id: uuid::Uuid = row.get("id");
    let got_at: chrono::DateTime<chrono::Utc> = row.get("at");
    let n: i64 = row.get("n");
    assert_eq!(got_id, id);
    assert_eq!(got_at.timestamp_micros(), at.timestamp_micros());
    assert_eq!(n, 7);
    Ok(())
}

#[tokio::test]
async fn disabled_filters_inside_transaction() -> BuilderResult<()> {
    let Some(mut client) = connect("disabled_filters_inside_transaction").await? else {
        return Ok(());
    };

    let tx = client.transaction().await.map_err(BuilderError::from_db_error)?;
    tx.execute(
        "CREATE TEMP TABLE clausekit_orders (id int8 PRIMARY KEY, status text NOT NULL, total int8 NOT NULL)",
        &[],
    )
    .await?;

    let mut insert = FluentBuilder::new();
    insert.insert_into(|s| {
        s.append_literal("clausekit_orders (id, status, total)");
    })?;
    for (id, status, total) in [(1_i64, "open", 10_i64), (2, "paid", 20), (3, "open", 30)] {
        insert.values(|s| {
            s.append_formatted(id, FormatHint::None)
                .append_literal(", ")
                .append_formatted(status, FormatHint::None)
                .append_literal(", ")
                .append_formatted(total, FormatHint::None);
        })?;
    }
    assert_eq!(insert.build()?.execute(&tx).await?, 3);

    let status: Option<&'static str> = Some("open");
    let min_total: Option<i64> = None;
    let mut b = FluentBuilder::new();
    b.select(|s| {
        s.append_literal("id");
    })?
    .from(|s| {
        s.append_literal("clausekit_orders");
    })?
    .where_if(status.is_some(), |s| {
        s.append_literal("status = ").append_param(status);
    })?
    .where_if(min_total.is_some(), |s| {
        s.append_literal("total >= ").append_param(min_total);
    })?
    .order_by(|s| {
        s.append_raw("id").append_literal(" DESC");
    })?
    .limit(10)?;

    let query = b.build()?;
    assert_eq!(query.params().len(), 1);
    let ids: Vec<i64> = query.query(&tx).await?.iter().map(|r| r.get(0)).collect();
    assert_eq!(ids, vec![3, 1]);

    let mut missing = FluentBuilder::new();
    missing
        .select(|s| {
            s.append_literal("id");
        })?
        .from(|s| {
            s.append_literal("clausekit_orders");
        })?
        .where_(|s| {
            s.append_literal("id = ").append_formatted(99_i64, FormatHint::None);
        })?;
    let query = missing.build()?;
    assert!(query.query_opt(&tx).await?.is_none());
    assert!(query.query_one(&tx).await.unwrap_err().is_not_found());

    tx.rollback().await.map_err(BuilderError::from_db_error)?;
    Ok(())
}

#[tokio::test]
async fn named_placeholders_are_not_executable() -> BuilderResult<()> {
    let Some(client) = connect("named_placeholders_are_not_executable").await? else {
        return Ok(());
    };

    let mut b = FluentBuilder::with_settings(BuilderSettings::default().with_named_placeholders('@'));
    b.select(|s| {
        s.append_formatted(1_i32, FormatHint::None);
    })?;
    let err = b.build()?.query(&client).await.unwrap_err();
    assert!(err.is_invalid_operation());
    Ok(())
}
