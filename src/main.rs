use std::fs::File;
use std::{env, process};

use tracing::info;

use wallet_ledger::dlq::LogDlq;
use wallet_ledger::domain::{Store, money};
use wallet_ledger::engine::Engine;
use wallet_ledger::ingestion::CsvReader;
use wallet_ledger::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: wallet_ledger <transactions.csv>");
        process::exit(2);
    };
    let file = File::open(&path)?;

    let mut ingestion = CsvReader::new(file);
    let engine = Engine::new(MemoryStore::new());
    let dlq = LogDlq;

    let outcome = engine.process(&mut ingestion, &dlq).await;
    info!(
        applied = outcome.applied,
        rejected = outcome.rejected,
        malformed = outcome.malformed,
        "batch complete"
    );

    let mut accounts = engine.store().accounts().await?;
    accounts.sort_by_key(|account| (account.user_id, account.currency.as_str()));

    println!("user,currency,balance");
    for account in accounts {
        println!(
            "{},{},{}",
            account.user_id,
            account.currency,
            money::format_balance(account.balance)
        );
    }

    Ok(())
}
