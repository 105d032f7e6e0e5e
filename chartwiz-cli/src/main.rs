//! ChartWiz CLI: browse indicators and build charts without the terminal UI.
//!
//! Commands:
//! - `categories`: list categories with backend ids and step counts
//! - `indicators`: one page of a category's indicators, searched and sorted
//! - `build`: run the wizard from a TOML recipe and record the payload
//! - `inspect`: summarise a chart log
//! - `indicator-config`: stored chart settings for one indicator or group
//! - `export-csv`: run a recipe up to the preview and write its series

mod recipe;
mod report;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use chartwiz_core::catalog::{fetch_combined, normalize_page};
use chartwiz_core::data::{PageRequest, Pagination};
use chartwiz_core::domain::{Category, DateWindow};
use chartwiz_core::{IndicatorQuery, SortKey};
use chartwiz_wizard::{logging, steps_for, ChartLog, Collaborators, SessionOptions, Settings, WizardSession};

use crate::recipe::Recipe;

#[derive(Parser)]
#[command(name = "chartwiz", about = "ChartWiz CLI: build report charts from indicators")]
struct Cli {
    /// Settings file (TOML). Environment variables override it.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Read indicators from a local JSON fixture instead of the API.
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List indicator categories.
    Categories,
    /// List one page of a category's indicators.
    Indicators {
        /// Category id or title (macro, micro, options, cta, combination, exclusive).
        #[arg(long)]
        category: Category,

        /// Start date (YYYY-MM-DD). Defaults to 2000-01-01.
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Page size. Defaults to the configured catalog page size.
        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Case-insensitive name filter.
        #[arg(long)]
        search: Option<String>,

        /// name or date.
        #[arg(long, default_value = "name")]
        sort: SortKey,
    },
    /// Run the wizard non-interactively from a recipe.
    Build {
        #[arg(long)]
        recipe: PathBuf,

        /// Append the payload to this JSONL chart log. Without it the payload
        /// is printed as JSON.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the chart settings stored for one indicator or group.
    IndicatorConfig {
        /// Indicator id, or group name.
        #[arg(long)]
        id: String,

        /// Report block the settings were saved under.
        #[arg(long)]
        block_id: Option<String>,
    },
    /// Summarise the charts recorded in a chart log.
    Inspect {
        #[arg(long)]
        log: PathBuf,
    },
    /// Write a recipe's preview series as CSV (date,indicator,value).
    ExportCsv {
        #[arg(long)]
        recipe: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_stderr("warn");

    match cli.command {
        Commands::Categories => run_categories(),
        Commands::Indicators {
            category,
            start,
            end,
            limit,
            offset,
            search,
            sort,
        } => {
            let settings = load_settings(cli.settings.as_deref(), cli.fixture)?;
            let query = IndicatorQuery::new(search.unwrap_or_default(), sort);
            run_indicators(&settings, category, start, end, limit, offset, &query)
        }
        Commands::Build { recipe, out } => {
            let settings = load_settings(cli.settings.as_deref(), cli.fixture)?;
            run_build(&settings, &recipe, out)
        }
        Commands::IndicatorConfig { id, block_id } => {
            let settings = load_settings(cli.settings.as_deref(), cli.fixture)?;
            run_indicator_config(&settings, &id, block_id.as_deref())
        }
        Commands::Inspect { log } => run_inspect(&log),
        Commands::ExportCsv { recipe, out } => {
            let settings = load_settings(cli.settings.as_deref(), cli.fixture)?;
            run_export_csv(&settings, &recipe, &out)
        }
    }
}

fn load_settings(path: Option<&Path>, fixture: Option<PathBuf>) -> Result<Settings> {
    let mut settings = Settings::load(path)?;
    if fixture.is_some() {
        settings.api.fixture = fixture;
    }
    Ok(settings)
}

/// How long to wait for one catalog fetch, retries included.
fn fetch_timeout(settings: &Settings) -> Duration {
    let attempts = u64::from(settings.api.max_retries) + 1;
    Duration::from_secs(settings.api.timeout_secs.saturating_mul(attempts) + 5)
}

fn open_session(settings: &Settings, chart_log: Option<PathBuf>) -> Result<WizardSession> {
    let mut options = SessionOptions::from(settings);
    if chart_log.is_some() {
        options.chart_log = chart_log;
    }
    let collaborators = Collaborators::from_settings(settings)?;
    Ok(WizardSession::new(collaborators, options)?)
}

fn run_categories() -> Result<()> {
    println!("{:<4} {:<12} {:<6} Description", "Id", "Category", "Steps");
    println!("{}", "-".repeat(72));
    for category in Category::ALL {
        println!(
            "{:<4} {:<12} {:<6} {}",
            category.backend_id(),
            category.as_str(),
            steps_for(Some(category)).len(),
            category.description()
        );
    }
    Ok(())
}

fn run_indicators(
    settings: &Settings,
    category: Category,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    limit: Option<u32>,
    offset: u32,
    query: &IndicatorQuery,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let max = DateWindow::max_until(today);
    let window = DateWindow::new(start.unwrap_or(max.start()), end.unwrap_or(today))?;
    let collaborators = Collaborators::from_settings(settings)?;
    let source = collaborators.source.as_ref();

    let (data, pagination) = if category.is_combination() {
        let data = fetch_combined(
            source,
            &settings.catalog.combined_sources,
            &window,
            settings.catalog.page_size,
            settings.catalog.combined_max_pages,
            settings.api.report_type_id,
        )?;
        let total = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let pagination = Pagination {
            total,
            limit: total,
            offset: 0,
            has_more: false,
        };
        (data, pagination)
    } else {
        let page = PageRequest {
            limit: limit.unwrap_or(settings.catalog.page_size).max(1),
            offset,
            report_type_id: settings.api.report_type_id,
        };
        let result = source.fetch_page(category, &window, &page)?;
        (normalize_page(category, &window, result.data), result.pagination)
    };

    println!("{} indicators ({window}) via {}", category.title(), source.name());
    println!("{}", report::indicator_header());
    let rows = query.apply(&data);
    for descriptor in &rows {
        println!("{}", report::indicator_row(descriptor));
    }
    println!();
    println!(
        "Showing {} of {} (offset {}){}",
        rows.len(),
        pagination.total,
        pagination.offset,
        if pagination.has_more { ", more available" } else { "" }
    );
    Ok(())
}

fn run_build(settings: &Settings, recipe_path: &Path, out: Option<PathBuf>) -> Result<()> {
    let recipe = Recipe::from_file(recipe_path)?;
    let mut session = open_session(settings, out.clone())?;
    let payload = recipe::build(&mut session, &recipe, fetch_timeout(settings))?;

    for notice in session.notices().iter().filter(|n| n.level != chartwiz_wizard::NoticeLevel::Info) {
        eprintln!("{}: {} ({})", notice.level.label(), notice.message, notice.context);
    }

    match out {
        Some(path) => println!(
            "Chart '{}' with {} indicator(s) appended to {}",
            payload.title(),
            payload.selected_indicators().len(),
            path.display()
        ),
        None => println!("{}", serde_json::to_string_pretty(&payload)?),
    }
    Ok(())
}

fn run_indicator_config(settings: &Settings, id: &str, block_id: Option<&str>) -> Result<()> {
    let collaborators = Collaborators::from_settings(settings)?;
    match collaborators.configs.get(id, block_id)? {
        Some(record) => println!("{}", report::config_line(id, &record)),
        None => println!("No stored settings for {id}"),
    }
    Ok(())
}

fn run_inspect(log: &Path) -> Result<()> {
    let payloads = ChartLog::new(log)
        .read_all()
        .with_context(|| format!("reading chart log {}", log.display()))?;
    if payloads.is_empty() {
        println!("No charts recorded in {}", log.display());
        return Ok(());
    }
    println!("{} chart(s) in {}", payloads.len(), log.display());
    for (i, payload) in payloads.iter().enumerate() {
        println!("{}", report::summary_line(i, payload));
    }
    Ok(())
}

fn run_export_csv(settings: &Settings, recipe_path: &Path, out: &Path) -> Result<()> {
    let recipe = Recipe::from_file(recipe_path)?;
    let mut session = open_session(settings, None)?;
    recipe::drive_to_preview(&mut session, &recipe, fetch_timeout(settings))?;
    let preview = session.preview();
    session.cancel();

    let csv = report::export_preview_csv(&preview)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, csv).with_context(|| format!("writing {}", out.display()))?;
    let rows: usize = preview.datasets.iter().map(|d| d.points.len()).sum();
    println!(
        "Wrote {rows} row(s) from {} series to {}",
        preview.datasets.len(),
        out.display()
    );
    Ok(())
}
