use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::analysis::{analyze_or_demo, demo_result, AnalysisOutcome, AnalysisRequest, Analyzer};
use crate::cli::commands::AskArgs;
use crate::config::{credentials, GuardianConfig};
use crate::errors::GuardianError;
use crate::llm::GeminiClient;

pub async fn handle_ask(args: AskArgs) -> Result<(), GuardianError> {
    let request = AnalysisRequest::Chat { question: args.question.clone() };
    request.validate()?;

    let outcome = match resolve_key(args.api_key.as_deref()) {
        Ok(key) => {
            let client = GeminiClient::new(&key, args.model.as_deref());
            let analyzer = Analyzer::new(Box::new(client));
            let spinner = make_spinner("Consulting GuardianAI...");
            let outcome = analyze_or_demo(&analyzer, &request).await;
            spinner.finish_and_clear();
            outcome
        }
        Err(e) => {
            eprintln!("{} {}", style("warning:").yellow().bold(), e);
            demo_result(request.kind())
        }
    };

    if let AnalysisOutcome::Chat(reply) = outcome {
        println!("{}", reply.response);
    }

    Ok(())
}

pub(crate) fn resolve_key(explicit: Option<&str>) -> Result<String, GuardianError> {
    let config = GuardianConfig::from_env();
    let configured = config.api_key();
    credentials::resolve_api_key(explicit, None, configured.as_deref())
}

pub(crate) fn make_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message.to_string());
    if let Ok(tick_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(tick_style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
