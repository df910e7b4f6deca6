use anyhow::Context;
use clap::Parser;
use evergy_client::utils::{logger, validation::Validate};
use evergy_client::{
    CliConfig, Credentials, PortalClient, PortalError, Premise, Result as PortalResult, UsageRecord,
};

fn main() {
    let config = CliConfig::parse();
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if let Err(e) = run(&config) {
        tracing::error!("❌ {:#}", e);
        match e.downcast_ref::<PortalError>() {
            Some(portal_error) => {
                if let Some(status) = portal_error.status() {
                    tracing::debug!("Portal answered HTTP {}", status);
                }
                eprintln!("❌ {}", portal_error.user_friendly_message())
            }
            None => eprintln!("❌ {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> anyhow::Result<()> {
    config.validate()?;

    let credentials = Credentials::from_file(&config.credentials)
        .with_context(|| format!("failed to load credentials from {}", config.credentials))?;
    let settings = config.portal_settings()?;
    let mut client = PortalClient::with_settings(credentials, &settings)?;

    let fetched = fetch(&mut client, config);
    client.logout();

    let (usage, premises) = fetched?;
    for premise in premises {
        println!("{}\t{}", premise.premise_id, premise.address);
    }

    if config.json {
        println!("{}", serde_json::to_string_pretty(&usage)?);
    } else {
        for record in &usage {
            println!(
                "{}\t{}\t{}",
                record.period().unwrap_or("-"),
                record
                    .usage()
                    .map(|kwh| format!("{:.3} kWh", kwh))
                    .unwrap_or_else(|| "-".to_string()),
                record
                    .cost()
                    .map(|cost| format!("${:.2}", cost))
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }

    match usage.last().and_then(|record| record.usage()) {
        Some(kwh) => println!("Today's kWh: {}", kwh),
        None => tracing::warn!("No usage reported for the requested range"),
    }

    Ok(())
}

/// Usage first; premises are only listed once the usage call went through.
fn fetch(
    client: &mut PortalClient,
    config: &CliConfig,
) -> PortalResult<(Vec<UsageRecord>, Vec<Premise>)> {
    let usage = match (config.start, config.end) {
        (Some(start), Some(end)) => client.get_usage_range(start, end, config.interval)?,
        _ => client.get_usage(config.days, config.interval)?,
    };
    let premises = client.get_premises()?;
    Ok((usage, premises))
}
