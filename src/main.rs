use anyhow::{bail, Context, Result};
use certman::{
    client::create_client, config::Settings, telemetry, CertificateController, NewCertificate,
};
use chrono::{NaiveDate, Utc};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env and configuration
    dotenvy::dotenv().ok();
    let settings = Settings::load().context("Failed to load configuration")?;

    // 2. Initialize telemetry
    telemetry::init_logging(&settings).context("Failed to initialize logging")?;
    info!("Starting {} against {} backend", settings.general.app_name, settings.backend.mode);

    // 3. Build the certificate client and controller
    let client = create_client(&settings)?;
    let controller = CertificateController::new(client);

    // 4. Dispatch the subcommand
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("list");

    match command {
        "list" => {
            controller.refresh().await?;
        }
        "show" => {
            let id = args.get(1).context("Usage: certman show <id>")?;
            let cert = controller.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&cert)?);
            return Ok(());
        }
        "create" => {
            if args.len() < 6 {
                bail!("Usage: certman create <domain> <common-name> <issuer> <valid-from> <valid-until>");
            }
            let input = NewCertificate {
                domain_name: args[1].clone(),
                common_name: args[2].clone(),
                issuer: args[3].clone(),
                valid_from: parse_date(&args[4])?,
                valid_until: parse_date(&args[5])?,
            };
            let cert = controller.create(&input).await?;
            info!("Created certificate {}", cert.id);
        }
        "rotate" => {
            let id = args.get(1).context("Usage: certman rotate <id>")?;
            controller.rotate(id).await?;
        }
        "delete" => {
            let id = args.get(1).context("Usage: certman delete <id>")?;
            controller.remove(id).await?;
        }
        other => bail!("Unknown command: {}", other),
    }

    print_table(&controller);

    Ok(())
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", input))
}

fn print_table(controller: &CertificateController) {
    let items = controller.items();
    if items.is_empty() {
        println!("No certificates.");
        return;
    }

    let now = Utc::now();
    println!(
        "{:<38} {:<28} {:<16} {:<8} {:<12} {:>9}",
        "ID", "DOMAIN", "ISSUER", "STATUS", "EXPIRY", "DAYS LEFT"
    );
    for cert in items {
        println!(
            "{:<38} {:<28} {:<16} {:<8} {:<12} {:>9}",
            cert.id,
            cert.domain_name,
            cert.issuer,
            cert.status.to_string(),
            cert.valid_until.format("%Y-%m-%d"),
            cert.days_remaining(now)
        );
    }
}
