//! # MedCalc CLI
//!
//! Command line front end over `medcalc_core`: browse the catalog, run a
//! calculator from flags or interactively, and ask the clinical assistant
//! which tool fits a question.

mod config;
mod gemini;
mod interactive;

use std::io;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use medcalc_core::advisory::{catalog_context, Advisor};
use medcalc_core::engine::CalculatorSession;
use medcalc_core::file_io::{load_or_default, save_preferences};
use medcalc_core::registry::REGISTRY;
use medcalc_core::{CalculatorDefinition, Specialty, SpecialtyFilter, Theme};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::gemini::GeminiClient;

#[derive(Parser)]
#[command(name = "medcalc", version, about = "Clinical formula catalog and calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List calculators, optionally filtered
    List {
        /// Only this specialty (e.g. "critical-care")
        #[arg(short, long)]
        specialty: Option<Specialty>,
        /// Case-insensitive match on name or short name
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Print calculators per specialty instead
        #[arg(long)]
        counts: bool,
    },
    /// Show a calculator's fields and choices
    Show { id: String },
    /// Evaluate a calculator from field=value pairs
    Calc {
        id: String,
        /// Field entry, repeatable (e.g. --set weight=70)
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Prompt for each field, then evaluate
    Interactive { id: String },
    /// Ask the clinical assistant which calculator to use
    Advise {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show or change the saved theme
    Theme { name: Option<Theme> },
    /// Print the catalog summary sent to the assistant
    Context,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((field.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env();

    match cli.command {
        Commands::List { specialty, search, counts } => {
            if counts {
                list_counts();
            } else {
                list(specialty.into(), search.as_deref().unwrap_or(""));
            }
        }
        Commands::Show { id } => show(REGISTRY.get(&id)?),
        Commands::Calc { id, set, json } => calc(&id, &set, json)?,
        Commands::Interactive { id } => {
            let mut session = CalculatorSession::open(REGISTRY.get(&id)?);
            let stdin = io::stdin();
            interactive::run(&mut session, &mut stdin.lock(), &mut io::stdout())?;
        }
        Commands::Advise { query } => advise(&config, &query.join(" ")).await?,
        Commands::Theme { name } => theme(&config, name)?,
        Commands::Context => print!("{}", catalog_context(REGISTRY.all())),
    }

    Ok(())
}

fn list(filter: SpecialtyFilter, search: &str) {
    let hits = REGISTRY.by_specialty_and_search(filter, search);
    if hits.is_empty() {
        println!("No calculators match.");
        return;
    }
    let width = hits.iter().map(|c| c.id.len()).max().unwrap_or(0);
    for calc in hits {
        println!(
            "{:<width$}  {:<18}  {}",
            calc.id,
            calc.specialty.display_name(),
            calc.name,
            width = width
        );
    }
}

fn list_counts() {
    for (specialty, count) in REGISTRY.specialty_counts() {
        println!("{:<18} {:>3}", specialty.display_name(), count);
    }
    println!("{:<18} {:>3}", "Total", REGISTRY.len());
}

fn show(calc: &CalculatorDefinition) {
    println!("{} ({})", calc.name, calc.short_name);
    println!("Specialty: {}", calc.specialty);
    println!("{}", calc.description);
    println!();
    for field in calc.fields {
        let unit = if field.unit.is_empty() {
            String::new()
        } else {
            format!(" [{}]", field.unit)
        };
        let default = field
            .default_value
            .map(|v| format!(" (default {})", medcalc_core::format::number(v)))
            .unwrap_or_default();
        println!("  {}: {}{}{}", field.id, field.label, unit, default);
        for choice in field.choices() {
            println!("      {} = {}", medcalc_core::format::number(choice.value), choice.label);
        }
    }
}

fn calc(id: &str, assignments: &[(String, String)], json: bool) -> anyhow::Result<()> {
    let mut session = CalculatorSession::open(REGISTRY.get(id)?);
    for (field, raw) in assignments {
        session.set_field(field, raw)?;
    }
    let result = session.calculate();

    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        interactive::write_result(&mut io::stdout(), result)?;
    }
    Ok(())
}

async fn advise(config: &CliConfig, query: &str) -> anyhow::Result<()> {
    let prefs = load_or_default(&config.prefs_path)?;
    let mut settings = prefs.advisory;
    if let Some(model) = &config.model_override {
        settings.model = model.clone();
    }
    info!(model = %settings.model, "asking clinical assistant");

    let advisor = Advisor::new(GeminiClient::new(config.api_key.clone())?, settings);
    match advisor.ask(query).await {
        Some(reply) => println!("{}", reply),
        None => bail!("query is empty"),
    }
    Ok(())
}

fn theme(config: &CliConfig, name: Option<Theme>) -> anyhow::Result<()> {
    let mut prefs = load_or_default(&config.prefs_path)?;

    let Some(theme) = name else {
        for t in Theme::ALL {
            let marker = if t == prefs.theme { '*' } else { ' ' };
            println!("{} {}", marker, t.name());
        }
        return Ok(());
    };

    prefs.set_theme(theme);
    save_preferences(&prefs, &config.prefs_path)
        .with_context(|| format!("saving preferences to {}", config.prefs_path.display()))?;
    println!("Theme set to {}", theme.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("weight=70").unwrap(),
            ("weight".to_string(), "70".to_string())
        );
        assert_eq!(parse_assignment("x=").unwrap(), ("x".to_string(), String::new()));
        assert!(parse_assignment("weight").is_err());
        assert!(parse_assignment("=70").is_err());
    }

    #[test]
    fn test_calc_args() {
        let cli = Cli::try_parse_from([
            "medcalc", "calc", "bmi", "--set", "weight=70", "-s", "height=175", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Calc { id, set, json } => {
                assert_eq!(id, "bmi");
                assert_eq!(set.len(), 2);
                assert!(json);
            }
            _ => panic!("expected calc"),
        }
    }

    #[test]
    fn test_specialty_and_theme_args() {
        let cli = Cli::try_parse_from(["medcalc", "list", "--specialty", "critical-care"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List { specialty: Some(Specialty::CriticalCare), .. }
        ));

        let cli = Cli::try_parse_from(["medcalc", "theme", "high_contrast"]).unwrap();
        assert!(matches!(cli.command, Commands::Theme { name: Some(Theme::HighContrast) }));

        assert!(Cli::try_parse_from(["medcalc", "theme", "neon"]).is_err());
    }

    #[test]
    fn test_calc_rejects_unknown_field() {
        let err = calc("bmi", &[("mass".to_string(), "70".to_string())], false).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }
}
