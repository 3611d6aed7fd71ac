use anyhow::Context;
use chart::ChartOptions;
use chrono::{DateTime, Utc};
use config::Config;
use query::{DynamoStore, RangeQuery, ReadingStore};
use series::ChartInput;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

mod chart;
mod config;
mod credentials;
mod query;
mod reading;
mod series;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load_or_default().context("Failed to load configuration")?;

    TermLogger::init(
        config.log_level()?,
        ConfigBuilder::new()
            .set_time_format_rfc3339()
            .set_time_offset_to_local()
            .map_err(|_| anyhow::anyhow!("Failed to set time offset to local"))?
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;

    if let Err(e) = run(&config).await {
        log::error!("{e:?}");
    }

    Ok(())
}

pub async fn run(config: &Config) -> Result<(), anyhow::Error> {
    let credentials = credentials::bootstrap(&config.aws).await?;
    let store = DynamoStore::new(&config.aws.region, credentials);

    render(&store, config, Utc::now()).await
}

/// Queries `store` and writes the chart page. A failed query is logged and
/// leaves the output untouched.
pub async fn render<S: ReadingStore>(
    store: &S,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<(), anyhow::Error> {
    log::info!("Querying {} for {}", config.query.table_name, config.query.client_id);
    let query = RangeQuery::new(&config.query, now);

    let input = match load_chart(store, &query, config.chart.utc_offset_millis()).await {
        Ok(input) => input,
        Err(e) => {
            log::error!("{e:?}");
            return Ok(());
        }
    };
    log::info!("Loaded {} readings", input.len());

    let options = ChartOptions::new(&config.chart.title, &input);
    let html = chart::render_page(&config.chart, &options)?;
    chart::write_page(&config.chart.output, &html)?;
    log::info!("Chart written to {}", config.chart.output.display());

    Ok(())
}

pub async fn load_chart<S: ReadingStore>(
    store: &S,
    query: &RangeQuery,
    offset_millis: i64,
) -> Result<ChartInput, anyhow::Error> {
    let readings = store.query(query).await?;
    Ok(ChartInput::from_readings(&readings, offset_millis))
}
