//! Country listing and detail handlers.

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use globedash_core::config::Config;
use globedash_core::countries::{CountryRecord, fetch_countries};
use globedash_core::pipeline::{self, SortColumn, SortDirection, SortSpec, ViewState};

use super::auth::auth_context;

const NOT_LOGGED_IN: &str = "Not logged in. Run `globedash login --email <EMAIL>` first.";

pub struct ListOptions {
    pub search: String,
    pub column: SortColumn,
    pub direction: SortDirection,
    pub page: usize,
}

fn require_session(config: &Config) -> Result<()> {
    let auth = auth_context(config);
    match auth.identity() {
        Some(identity) => {
            tracing::debug!(identity, "session active");
            Ok(())
        }
        None => anyhow::bail!(NOT_LOGGED_IN),
    }
}

pub async fn list(config: &Config, options: ListOptions) -> Result<()> {
    require_session(config)?;
    let records = fetch_countries(config).await;

    let view = ViewState {
        search_text: options.search,
        sort: SortSpec::new(options.column.field_path(), options.direction),
        page: options.page,
    };
    let output = pipeline::process(&records, &view);

    if output.is_empty() {
        println!("No countries found");
        return Ok(());
    }

    println!("{}", render_table(&output.rows, &view.sort));
    println!("{}", output.page.summary());
    println!("Page {} of {}", output.page.page, output.page.total_pages);
    Ok(())
}

fn header_label(column: SortColumn, sort: &SortSpec) -> String {
    if column.is_active(sort) {
        format!("{} {}", column.label(), sort.direction.arrow())
    } else {
        column.label().to_string()
    }
}

fn render_table(rows: &[&CountryRecord], sort: &SortSpec) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_label(SortColumn::Name, sort),
        header_label(SortColumn::Region, sort),
        header_label(SortColumn::Capital, sort),
        header_label(SortColumn::Population, sort),
        "Currencies".to_string(),
        "Languages".to_string(),
    ]);

    for record in rows {
        table.add_row(vec![
            record.name.common.clone(),
            record.region_cell().to_string(),
            record.capital_cell().to_string(),
            record.population_display(),
            record.currency_cell().to_string(),
            record.languages_display(),
        ]);
    }
    table
}

/// First record whose common or official name equals `name`, ignoring case.
fn find_by_name<'a>(records: &'a [CountryRecord], name: &str) -> Option<&'a CountryRecord> {
    let needle = name.trim().to_lowercase();
    records.iter().find(|r| {
        r.name.common.to_lowercase() == needle || r.name.official.to_lowercase() == needle
    })
}

pub async fn show(config: &Config, name: &str) -> Result<()> {
    require_session(config)?;
    let records = fetch_countries(config).await;

    let Some(record) = find_by_name(&records, name) else {
        anyhow::bail!("No country named '{name}'");
    };

    println!("{}", record.detail_title());
    for (label, value) in record.detail_fields() {
        println!("{label}: {value}");
    }
    Ok(())
}
