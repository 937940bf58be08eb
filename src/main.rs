// Udaan CLI - search the property registries and the unified store
//
// Progress goes to stderr, responses go to stdout as JSON.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use udaan::{AppConfig, PropertySearchService, RecordQuery, SearchCriteria, Source};

#[derive(Parser)]
#[command(name = "udaan")]
#[command(about = "Aggregate property records from DORIS, DLR, CERSAI and MCA21", version)]
struct Cli {
    /// Unified store container (overrides UDAAN_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// JSON file replacing the built-in registry datasets (overrides UDAAN_FIXTURES)
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Simulated latency for every registry, in ms (overrides UDAAN_LATENCY_MS)
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search every relevant registry and merge the results into the store
    Search(Filters),

    /// Search one registry without persisting
    Source {
        /// Registry name (doris, dlr, cersai, mca21)
        name: String,

        #[command(flatten)]
        filters: Filters,
    },

    /// Read records back from the unified store
    Retrieve {
        /// Condition on a canonical field, e.g. --where ownerName=Suresh
        #[arg(long = "where", value_name = "KEY=VALUE")]
        conditions: Vec<String>,
    },

    /// List the known registries
    Sources,
}

#[derive(Args)]
struct Filters {
    #[arg(long)]
    owner: Option<String>,
    /// urban or rural
    #[arg(long)]
    property_type: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    street_address: Option<String>,
    #[arg(long)]
    village: Option<String>,
    #[arg(long)]
    survey_number: Option<String>,
    #[arg(long)]
    registration_number: Option<String>,
    #[arg(long)]
    property_id: Option<String>,
    #[arg(long)]
    company_name: Option<String>,
    #[arg(long)]
    cin: Option<String>,
    #[arg(long)]
    director_name: Option<String>,
}

impl From<Filters> for SearchCriteria {
    fn from(f: Filters) -> Self {
        SearchCriteria {
            owner_name: f.owner,
            property_type: f.property_type,
            state: f.state,
            district: f.district,
            street_address: f.street_address,
            village: f.village,
            survey_number: f.survey_number,
            registration_number: f.registration_number,
            property_id: f.property_id,
            company_name: f.company_name,
            cin: f.cin,
            director_name: f.director_name,
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct SourceInfo<'a> {
    code: &'a str,
    name: &'a str,
}

fn parse_conditions(conditions: &[String]) -> Result<RecordQuery> {
    let mut query = RecordQuery::new();
    for condition in conditions {
        let Some((key, value)) = condition.split_once('=') else {
            bail!("invalid --where condition {:?}, expected KEY=VALUE", condition);
        };
        query = query.with(key.trim(), value);
    }
    Ok(query)
}

fn print_sources() -> Result<()> {
    let sources: Vec<SourceInfo> = Source::ALL
        .iter()
        .map(|s| SourceInfo {
            code: s.code(),
            name: s.name(),
        })
        .collect();
    print_json(&sources)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{}", json);
    Ok(())
}

async fn build_service(cli: &Cli) -> Result<PropertySearchService> {
    let mut config = AppConfig::from_env().context("Invalid UDAAN_* environment")?;
    if let Some(path) = &cli.data_file {
        config = config.with_data_file(path);
    }
    if let Some(path) = &cli.fixtures {
        config = config.with_fixtures_file(path);
    }
    if let Some(ms) = cli.latency_ms {
        config = config.with_latency(Duration::from_millis(ms));
    }

    eprintln!("📂 Unified store: {}", config.data_file.display());
    PropertySearchService::from_config(&config)
        .await
        .context("Failed to initialize search service")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("udaan=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if matches!(cli.command, Command::Sources) {
        return print_sources();
    }

    let service = build_service(&cli).await?;
    run(&service, cli.command).await
}

async fn run(service: &PropertySearchService, command: Command) -> Result<()> {
    match command {
        Command::Search(filters) => {
            let criteria = SearchCriteria::from(filters);
            let sources = PropertySearchService::select_sources(&criteria);
            eprintln!(
                "🔎 Searching {} registries: {}",
                sources.len(),
                sources.iter().map(Source::code).collect::<Vec<_>>().join(", ")
            );

            let response = service.search_all(&criteria).await;
            eprintln!("✓ Found {} records", response.results.len());
            print_json(&response)?;
        }
        Command::Source { name, filters } => {
            eprintln!("🔎 Searching {}...", name);
            let records = service.search_source(&name, &SearchCriteria::from(filters)).await;
            eprintln!("✓ Found {} records (not stored)", records.len());
            print_json(&records)?;
        }
        Command::Retrieve { conditions } => {
            let query = parse_conditions(&conditions)?;
            let response = service.retrieve_unified_data(&query).await;
            if response.success {
                eprintln!("✓ Retrieved {} records", response.results.len());
            } else {
                eprintln!("❌ Retrieval failed");
            }
            print_json(&response)?;
        }
        Command::Sources => print_sources()?,
    }
    Ok(())
}
