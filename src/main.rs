use anyhow::Result;
use clap::Parser;
use inventory_sheets::{
    config::{Args, Settings},
    run_update,
    sheets::{auth::ServiceAccountTokens, MemorySheets, SheetsClient},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) configuration ────────────────────────────────────────────
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // ─── 2) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let settings = match Settings::from_args(args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    info!("starting CSV to Google Sheets updater");

    // ─── 3) run against the chosen backend ───────────────────────────
    if settings.dry_run {
        info!("dry run: nothing is sent to the spreadsheet");
        let sink = MemorySheets::new();
        run_update(&sink, &settings).await?;
    } else {
        let tokens = ServiceAccountTokens::from_key_file(&settings.service_account_file).await?;
        let client = SheetsClient::new(settings.spreadsheet_id.clone(), tokens)?;
        run_update(&client, &settings).await?;
    }

    info!("finished");
    Ok(())
}
