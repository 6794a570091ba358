use anyhow::Result;
use data_assistant::{AssistantConfig, DataAssistant, OutcomeStatus};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const EXAMPLE_QUERIES: &[&str] = &[
    "Show me the top 10 products by quantity",
    "What is the total revenue by region?",
    "Find all orders from the last 30 days",
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("Data Assistant");
    println!("{}", "=".repeat(50));

    let config = AssistantConfig::from_env()?;
    let assistant = DataAssistant::from_config(&config)?;
    println!(
        "Initialized with {} provider, table {}",
        assistant.provider_name(),
        assistant.table()
    );

    println!("\nExample Queries:");
    println!("{}", "-".repeat(50));
    for (i, question) in EXAMPLE_QUERIES.iter().enumerate() {
        println!("\n{}. Natural Language: {question}", i + 1);
        let outcome = assistant.query(question, false).await;
        match outcome.status {
            OutcomeStatus::Success => println!("   SQL Query: {}", outcome.sql_query),
            OutcomeStatus::Error => {
                println!("   Error: {}", outcome.error.unwrap_or_default())
            }
        }
    }

    println!("\n{}", "=".repeat(50));
    println!("Interactive Mode (type 'exit' to quit)");
    println!("{}", "=".repeat(50));

    let stdin = io::stdin();
    loop {
        print!("\nEnter your question: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();

        if matches!(question.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Goodbye!");
            break;
        }
        if question.is_empty() {
            continue;
        }

        let outcome = assistant.query(question, false).await;
        if outcome.status == OutcomeStatus::Error {
            println!("\nError: {}", outcome.error.unwrap_or_default());
            continue;
        }
        println!("\nGenerated SQL:\n{}", outcome.sql_query);

        print!("\nExecute this query? (y/n): ");
        io::stdout().flush()?;
        let mut choice = String::new();
        stdin.lock().read_line(&mut choice)?;
        if choice.trim().to_lowercase() != "y" {
            continue;
        }

        let outcome = assistant.query(question, true).await;
        match outcome.status {
            OutcomeStatus::Success => {
                let rows = outcome.results.unwrap_or_default();
                println!("\nResults: {} rows returned", rows.len());
                for row in rows.iter().take(5) {
                    println!("{row}");
                }
                if rows.len() > 5 {
                    println!("... and {} more rows", rows.len() - 5);
                }
            }
            OutcomeStatus::Error => {
                println!("\nError executing query: {}", outcome.error.unwrap_or_default())
            }
        }
    }

    Ok(())
}
