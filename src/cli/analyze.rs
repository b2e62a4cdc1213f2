use console::style;
use data_encoding::BASE64;

use crate::analysis::{
    analyze_or_demo, demo_result, AnalysisOutcome, AnalysisRequest, Analyzer, RiskLevel,
};
use crate::cli::ask::{make_spinner, resolve_key};
use crate::cli::commands::{AnalyzeArgs, AnalyzeTarget};
use crate::errors::GuardianError;
use crate::llm::GeminiClient;

pub async fn handle_analyze(args: AnalyzeArgs) -> Result<(), GuardianError> {
    let request = build_request(&args.target)?;
    request.validate()?;

    let outcome = match resolve_key(args.api_key.as_deref()) {
        Ok(key) => {
            let client = GeminiClient::new(&key, args.model.as_deref());
            let analyzer = Analyzer::new(Box::new(client));
            let spinner = make_spinner("Analyzing...");
            let outcome = analyze_or_demo(&analyzer, &request).await;
            spinner.finish_and_clear();
            outcome
        }
        Err(e) => {
            eprintln!("{} {}", style("warning:").yellow().bold(), e);
            demo_result(request.kind())
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn build_request(target: &AnalyzeTarget) -> Result<AnalysisRequest, GuardianError> {
    match target {
        AnalyzeTarget::Url { url } => Ok(AnalysisRequest::Url { url: url.clone() }),
        AnalyzeTarget::Vulns { url } => Ok(AnalysisRequest::Vulnerabilities { url: url.clone() }),
        AnalyzeTarget::Image { path } => {
            let bytes = std::fs::read(path)?;
            Ok(AnalysisRequest::Image { image_base64: BASE64.encode(&bytes) })
        }
    }
}

fn print_outcome(outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Url(url) => {
            println!("{}", style("URL analysis").bold());
            println!("  {}", url.summary);
            println!("  confidence: {}", url.confidence);
        }
        AnalysisOutcome::Image(image) => {
            println!("{}", style("Image analysis").bold());
            println!("  QR code:  {}", yes_no(image.contains_qr));
            println!("  phishing: {}", yes_no(image.phishing_detected));
            println!("  confidence: {}", image.confidence);
        }
        AnalysisOutcome::Vulnerabilities(report) => {
            println!("{}", style("Vulnerability assessment").bold());
            print_finding("ssl", &report.ssl);
            print_finding("open ports", &report.open_ports);
            print_finding("database", &report.db_interaction);
            print_finding("general", &report.general);
            println!("  overall risk: {}", style_risk(report.overall_risk));
        }
        AnalysisOutcome::Chat(reply) => println!("{}", reply.response),
    }
}

fn print_finding(label: &str, finding: &crate::analysis::Finding) {
    let marker = if finding.is_vulnerable {
        style("vulnerable").red().bold()
    } else {
        style("ok").green()
    };
    println!("  {:<12} {} ({}%)", label, marker, finding.confidence);
    println!("  {:<12} {}", "", finding.description);
}

fn style_risk(risk: RiskLevel) -> console::StyledObject<&'static str> {
    match risk {
        RiskLevel::Low => style("low").green(),
        RiskLevel::Medium => style("medium").yellow(),
        RiskLevel::High => style("high").red(),
        RiskLevel::Critical => style("critical").red().bold(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
