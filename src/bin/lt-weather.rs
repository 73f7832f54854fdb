use chrono::Utc;
use clap::{Parser, Subcommand};
use lt_weather_parsers::{
    all_parsers, default_params_file, JsonFetcher, JsonFileParamStore, JsonLinesSink, LatLon,
    ParamStore, ParserRegistry, ReqwestSource, RetryPolicy, RunOutcome,
};
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "lt-weather", version, about = "Lithuanian weather parsers for irrigation controllers")]
struct Cli {
    /// Controller latitude in decimal degrees
    #[arg(long, global = true, allow_negative_numbers = true)]
    latitude: Option<f64>,

    /// Controller longitude in decimal degrees
    #[arg(long, global = true, allow_negative_numbers = true)]
    longitude: Option<f64>,

    /// Parameter file (defaults to params.json in the user's config directory)
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available parsers
    List,
    /// Find the nearest station for a parser and store it
    Locate {
        #[arg(long)]
        parser: String,
    },
    /// Run one parser, or every parser, once and print the measurements as JSON lines
    Run {
        #[arg(long)]
        parser: Option<String>,
    },
    /// Keep running every parser on its own interval
    Daemon,
}

fn location(cli: &Cli) -> LatLon {
    match (cli.latitude, cli.longitude) {
        (Some(lat), Some(lon)) => LatLon(lat, lon),
        _ => {
            log::error!("--latitude and --longitude are required for this command");
            exit(2);
        }
    }
}

fn param_store(cli: &Cli) -> JsonFileParamStore {
    let path = match &cli.params {
        Some(path) => path.clone(),
        None => match default_params_file() {
            Ok(path) => path,
            Err(e) => {
                log::error!("{}", e);
                exit(1);
            }
        },
    };
    log::debug!("Using parameter file {}", path.display());
    JsonFileParamStore::new(path)
}

fn report(name: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Completed { measurements, .. } => {
            log::info!("{}: {} measurements", name, measurements)
        }
        RunOutcome::ParserFailed(e) => log::error!("{}: {}", name, e),
        RunOutcome::HostFailed(e) => log::error!("{}: {}", name, e),
    }
}

#[tokio::main]
async fn main() {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let cli = Cli::parse();

    let source = match ReqwestSource::new() {
        Ok(source) => source,
        Err(e) => {
            log::error!("Failed to set up the HTTP client: {}", e);
            exit(1);
        }
    };
    let fetcher = JsonFetcher::new(Arc::new(source), RetryPolicy::default());
    let mut registry = ParserRegistry::with_parsers(all_parsers(&fetcher));

    match &cli.command {
        Command::List => {
            for parser in registry.parsers() {
                let info = parser.info();
                let kind = if info.forecast { "forecast" } else { "historical" };
                println!(
                    "{:<28} {:<10} every {:>2} h  {}",
                    info.name,
                    kind,
                    info.interval.as_secs() / 3600,
                    info.description
                );
            }
        }
        Command::Locate { parser } => {
            let location = location(&cli);
            let mut store = param_store(&cli);
            let Some(found) = registry.get(parser) else {
                log::error!("Unknown parser '{}', see `lt-weather list`", parser);
                exit(2);
            };
            let name = found.info().name;

            let mut params = match store.load(name).await {
                Ok(stored) => stored.unwrap_or_default(),
                Err(e) => {
                    log::error!("{}", e);
                    exit(1);
                }
            };
            params.merge_defaults(&found.default_params());

            match found.locate(location, &params).await {
                Ok(id) => {
                    println!("{}", id);
                    params.set(found.info().station_param, id);
                    if let Err(e) = store.save(name, &params).await {
                        log::error!("{}", e);
                        exit(1);
                    }
                }
                Err(e) => {
                    log::error!("No station found for {}: {}", location, e);
                    exit(1);
                }
            }
        }
        Command::Run { parser } => {
            let location = location(&cli);
            let mut store = param_store(&cli);
            let mut sink = JsonLinesSink::new(std::io::stdout().lock());
            let names: Vec<&'static str> = match parser {
                Some(wanted) => match registry.get(wanted) {
                    Some(p) => vec![p.info().name],
                    None => {
                        log::error!("Unknown parser '{}', see `lt-weather list`", wanted);
                        exit(2);
                    }
                },
                None => registry.names(),
            };

            let mut failed = false;
            for name in names {
                match registry
                    .run(name, location, &mut store, &mut sink, Utc::now())
                    .await
                {
                    Ok(outcome) => {
                        report(name, &outcome);
                        failed |= !outcome.is_success();
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        failed = true;
                    }
                }
            }
            if failed {
                exit(1);
            }
        }
        Command::Daemon => {
            let location = location(&cli);
            let mut store = param_store(&cli);
            let mut sink = JsonLinesSink::new(std::io::stdout());
            log::info!("Running {} parsers for {}", registry.names().len(), location);

            loop {
                let now = Utc::now();
                for (name, outcome) in registry.run_due(location, &mut store, &mut sink, now).await
                {
                    report(name, &outcome);
                }

                let now = Utc::now();
                let pause = registry
                    .next_due(now)
                    .and_then(|next| (next - now).to_std().ok())
                    .unwrap_or(Duration::from_secs(1));
                log::debug!("Sleeping {:?} until the next parser is due", pause);

                tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    _ = tokio::signal::ctrl_c() => {
                        log::info!("Received Ctrl+C, shutting down");
                        break;
                    }
                }
            }
        }
    }
}
