use crate::cli::commands::StatsArgs;
use crate::errors::QrTraceError;

pub async fn handle_stats(args: StatsArgs) -> Result<(), QrTraceError> {
    let config = super::load_config(args.config.as_deref()).await?;
    let db = super::open_database(&config)?;
    let stats = db.statistics()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
