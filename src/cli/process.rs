use crate::cli::commands::ProcessArgs;
use crate::errors::QrTraceError;
use crate::pipeline::Submission;

/// One-off local run: feed an image file through the full pipeline and print
/// the reply that would have been texted back.
pub async fn handle_process(args: ProcessArgs) -> Result<(), QrTraceError> {
    let config = super::load_config(args.config.as_deref()).await?;
    let db = super::open_database(&config)?;
    let pipeline = super::build_pipeline(db, &config)?;

    let image = tokio::fs::read(&args.image).await?;
    let submission = Submission {
        image,
        caption: args.caption,
        sender: args.sender,
    };

    let reply = pipeline.process(&submission).await?;
    println!("{}", reply);
    Ok(())
}
