use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "guardian", version, about = "AI-assisted cybersecurity analysis service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP REST API server
    Serve(ServeArgs),
    /// Ask the security chatbot a one-off question
    Ask(AskArgs),
    /// Run a single analysis from the command line
    Analyze(AnalyzeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Persist runtime settings to this JSON file (in-memory if omitted)
    #[arg(long)]
    pub settings: Option<String>,
}

#[derive(Args, Clone)]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Gemini API key (or use GEMINI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    #[command(subcommand)]
    pub target: AnalyzeTarget,

    /// Gemini API key (or use GEMINI_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Clone)]
pub enum AnalyzeTarget {
    /// URL reputation analysis
    Url {
        /// URL to analyze
        url: String,
    },
    /// Image inspection for QR codes and phishing
    Image {
        /// Path to the image file
        path: String,
    },
    /// Passive website vulnerability assessment
    Vulns {
        /// Website URL to assess
        url: String,
    },
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
