//! Clause composition without a database
//!
//! Run with: cargo run --example compose -p clausekit

use clausekit::{BuilderError, BuilderSettings, FluentBuilder, FormatHint};

struct Filters {
    customer_id: i64,
    status: Option<&'static str>,
    min_total: Option<i64>,
    sort_column: &'static str,
    page: u64,
}

fn orders_query(f: &Filters, settings: BuilderSettings) -> Result<FluentBuilder, BuilderError> {
    let mut b = FluentBuilder::with_settings(settings);
    b.select(|s| {
        s.append_literal("o.id, o.total, c.name");
    })?
    .from(|s| {
        s.append_literal("orders o");
    })?
    .left_join(|s| {
        s.append_literal("customers c ON c.id = o.customer_id");
    })?
    .where_(|s| {
        s.append_literal("c.id = ")
            .append_formatted(f.customer_id, FormatHint::None);
    })?
    .where_filter_if(f.status.is_some(), |s| {
        s.append_literal("o.status = ").append_param(f.status);
    })?
    .with_or_filter_if(f.status.is_some(), |s| {
        s.append_literal("o.status IS NULL");
    })?
    .where_if(f.min_total.is_some(), |s| {
        s.append_literal("o.total >= ").append_param(f.min_total);
    })?
    .order_by(|s| {
        s.append_raw(f.sort_column).append_literal(" DESC");
    })?
    .limit(20)?
    .offset_if(f.page > 0, f.page * 20)?;
    Ok(b)
}

fn main() -> Result<(), BuilderError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let filters = Filters {
        customer_id: 42,
        status: Some("open"),
        min_total: None,
        sort_column: "o.created_at",
        page: 2,
    };

    println!("=== $n placeholders ===");
    let (sql, params) = orders_query(&filters, BuilderSettings::default())?.render()?;
    println!("{sql}");
    for p in &params {
        println!("  {} = {:?}", p.name(), p.value());
    }

    println!("\n=== @name placeholders, lower case ===");
    let settings = BuilderSettings::default()
        .with_named_placeholders('@')
        .with_lower_case_clauses(true);
    let (sql, params) = orders_query(&filters, settings)?.render()?;
    println!("{sql}");
    for p in &params {
        println!("  {} = {:?}", p.name(), p.value());
    }

    println!("\n=== No optional filters ===");
    let filters = Filters {
        status: None,
        page: 0,
        ..filters
    };
    let (sql, params) = orders_query(&filters, BuilderSettings::default())?.render()?;
    println!("{sql}");
    println!("  ({} parameters)", params.len());

    Ok(())
}
