use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use termcolor::{ColorChoice, StandardStream};

use hostfilter::cli::inventory::InventorySnapshot;
use hostfilter::cli::render;
use hostfilter::models::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE};
use hostfilter::utils::logging;
use hostfilter::{
    FilterConfig, FilterController, MemoryHistory, SortField, SortOrder, TablePagination,
    TableSort,
};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Filter, sort and paginate an inventory computer list")]
struct Args {
    /// Inventory snapshot (JSON with `computers` and `domains`)
    #[clap(short, long)]
    inventory: PathBuf,

    /// Query string to seed the list from (e.g. "hostname=web&page=2")
    #[clap(short, long, default_value = "")]
    query: String,

    /// Field change applied after seeding, as key=value (repeatable)
    #[clap(short, long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Reset every filter before applying --set
    #[clap(long)]
    clear: bool,

    /// Table change: page to show
    #[clap(long)]
    page: Option<usize>,

    /// Table change: page size
    #[clap(long)]
    limit: Option<usize>,

    /// Table change: sort column
    #[clap(long)]
    sort_by: Option<String>,

    /// Table change: sort order (asc or desc)
    #[clap(long)]
    sort_order: Option<String>,

    /// Default page size
    #[clap(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Debounce window for text filters, in milliseconds
    #[clap(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Print the page as JSON instead of a table
    #[clap(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[clap(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logger(logging::get_log_level(&args.log_level));

    info!("Starting hostfilter v{}", env!("CARGO_PKG_VERSION"));

    let config = FilterConfig {
        default_page_size: args.page_size.max(1),
        debounce_window_ms: args.debounce_ms,
    };

    let snapshot = InventorySnapshot::load(&args.inventory)
        .with_context(|| format!("loading inventory {}", args.inventory.display()))?;
    let (computers, domains) = snapshot.into_parts();

    let mut controller =
        FilterController::new(config, &args.query, MemoryHistory::new(args.query.clone()));
    controller.set_records(computers);
    controller.set_domains(domains.clone());

    if args.clear {
        controller.clear_all();
    }

    for assignment in &args.set {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got {:?}", assignment))?;
        controller.set_param(key, value)?;
    }

    if args.page.is_some() || args.limit.is_some() || args.sort_by.is_some() || args.sort_order.is_some() {
        apply_table_change(&mut controller, &args)?;
    }

    // text filters reach the pipeline through the debouncer
    controller.settle().await;
    debug!("Effective filter state: {:?}", controller.effective_state());

    let page = controller.page();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        render::write_table(&mut stdout, &page, &domains)?;
    }

    let query = controller.query();
    eprintln!("?{}", query);

    Ok(())
}

/// Forward table flags as a single table change event
fn apply_table_change(
    controller: &mut FilterController<MemoryHistory>,
    args: &Args,
) -> Result<()> {
    let state = controller.state();

    let field = match &args.sort_by {
        Some(raw) => raw
            .parse::<SortField>()
            .map_err(|_| anyhow!("unknown sort column {:?}", raw))?,
        None => state.sort_by,
    };
    let order = match &args.sort_order {
        Some(raw) => raw
            .parse::<SortOrder>()
            .map_err(|_| anyhow!("unknown sort order {:?}", raw))?,
        None => state.sort_order,
    };
    let pagination = TablePagination {
        current: args.page.unwrap_or(state.page),
        page_size: args.limit.unwrap_or(state.page_size),
    };

    controller.on_table_change(
        pagination,
        TableSort {
            field: Some(field),
            order: Some(order),
        },
    );
    Ok(())
}
