use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "qrtrace", version, about = "QR code field research pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook and read-API server
    Serve(ServeArgs),
    /// Run one local image through the pipeline and print the reply
    Process(ProcessArgs),
    /// Print store statistics
    Stats(StatsArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bind address override
    #[arg(long)]
    pub host: Option<String>,

    /// Port override
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Args, Clone)]
pub struct ProcessArgs {
    /// Path to the image file
    pub image: String,

    /// Caption text, as if sent with the image
    #[arg(short = 'm', long, default_value = "")]
    pub caption: String,

    /// Sender identifier recorded with the sighting
    #[arg(long, default_value = "local")]
    pub sender: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct StatsArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Configuration file to check
    #[arg(short, long, default_value = "qrtrace.yaml")]
    pub config: String,
}
