use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::Path;

use jobledger::{
    get_all_transactions, insert_transactions, load_ledger_csv, parse_ledger_date, setup_database,
    verify_count, EntityRegistry, FilterCriteria, ProfitReport, ReportBuilder, SortColumn,
    SortDirection, SortState, TransactionStatus,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") => run_import(&args[2..]),
        Some("report") => run_report(&args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("jobledger {} - service-business P&L reporting", jobledger::VERSION);
    println!();
    println!("Usage:");
    println!("  jobledger import <ledger.csv> <transactions.db>");
    println!("  jobledger report <transactions.db> <roster.json> [options]");
    println!();
    println!("Report options:");
    println!("  --from DATE     inclusive start date (YYYY-MM-DD or MM/DD/YYYY)");
    println!("  --to DATE       inclusive end date");
    println!("  --entity ID     restrict to an entity (repeatable)");
    println!("  --status S      completed | pending | cancelled");
    println!("  --search TERM   case-insensitive entity name match");
    println!("  --sort COLUMN   name | jobs | revenue | cost | expenses | profit");
    println!("  --asc           sort ascending (default: descending)");
}

fn run_import(args: &[String]) -> Result<()> {
    let [csv_arg, db_arg] = args else {
        bail!("Usage: jobledger import <ledger.csv> <transactions.db>");
    };

    println!("🗄️  Ledger Import - CSV → SQLite + WAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let csv_path = Path::new(csv_arg);
    let db_path = Path::new(db_arg);

    println!("\n📂 Loading ledger CSV...");
    let transactions = load_ledger_csv(csv_path)?;
    println!("✓ Loaded {} transactions from CSV", transactions.len());

    println!("\n🔧 Setting up database...");
    let conn = Connection::open(db_path)?;
    setup_database(&conn)?;
    println!("✓ Database initialized with WAL mode");

    println!("\n💾 Inserting transactions...");
    insert_transactions(&conn, &transactions)?;

    println!("\n🔍 Verifying database...");
    let count = verify_count(&conn)?;
    println!("✓ Database contains {} transactions", count);

    Ok(())
}

fn run_report(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        bail!("Usage: jobledger report <transactions.db> <roster.json> [options]");
    }

    let db_path = Path::new(&args[0]);
    let roster_path = Path::new(&args[1]);

    if !db_path.exists() {
        eprintln!("❌ Database not found: {}", db_path.display());
        eprintln!("   Run: jobledger import <ledger.csv> {}", db_path.display());
        std::process::exit(1);
    }

    let (criteria, sort) = parse_report_options(&args[2..])?;

    println!("📊 Loading transactions...");
    let conn = Connection::open(db_path)?;
    let transactions = get_all_transactions(&conn)?;
    println!("✓ Loaded {} transactions", transactions.len());

    println!("📇 Loading roster...");
    let registry = EntityRegistry::from_file(roster_path)?;
    println!("✓ Loaded {} entities\n", registry.len());

    let report = ReportBuilder::new(&registry)
        .criteria(criteria)
        .sort(sort)
        .build(&transactions);

    print_report(&report);

    Ok(())
}

fn parse_report_options(args: &[String]) -> Result<(FilterCriteria, SortState)> {
    let mut criteria = FilterCriteria::default();
    let mut sort = SortState::default();

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--from" => {
                let raw = iter.next().context("--from needs a date")?;
                criteria.date_range.from =
                    Some(parse_ledger_date(raw).with_context(|| format!("Bad date: {}", raw))?);
            }
            "--to" => {
                let raw = iter.next().context("--to needs a date")?;
                criteria.date_range.to =
                    Some(parse_ledger_date(raw).with_context(|| format!("Bad date: {}", raw))?);
            }
            "--entity" => {
                let id = iter.next().context("--entity needs an id")?;
                criteria.entity_ids.insert(id.clone());
            }
            "--status" => {
                let raw = iter.next().context("--status needs a value")?;
                criteria.status_filter = Some(
                    TransactionStatus::parse(raw)
                        .with_context(|| format!("Unknown status: {}", raw))?,
                );
            }
            "--search" => {
                criteria.search_term = iter.next().context("--search needs a term")?.clone().into();
            }
            "--sort" => {
                let raw = iter.next().context("--sort needs a column")?;
                let column = SortColumn::parse(raw)
                    .with_context(|| format!("Unknown sort column: {}", raw))?;
                sort = SortState::new(column, sort.direction);
            }
            "--asc" => sort.direction = SortDirection::Ascending,
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok((criteria, sort))
}

fn print_report(report: &ProfitReport) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{:<24} {:>5} {:>12} {:>12} {:>10} {:>12} {:>8}",
        "Entity", "Jobs", "Revenue", "Payout", "Expenses", "Profit", "Margin"
    );
    println!("──────────────────────────────────────────────────────────────────────────");

    for record in &report.records {
        println!(
            "{:<24} {:>5} {:>12} {:>12} {:>10} {:>12} {:>7.1}%",
            record.entity_name,
            record.total_jobs,
            format_currency(record.total_revenue),
            format_currency(record.entity_cost),
            format_currency(record.expenses),
            format_currency(record.company_profit),
            record.profit_margin(),
        );
    }

    println!("──────────────────────────────────────────────────────────────────────────");
    println!(
        "{:<24} {:>5} {:>12} {:>12} {:>10} {:>12}",
        "TOTAL",
        "",
        format_currency(report.totals.grand_total_revenue),
        format_currency(report.totals.grand_total_cost),
        format_currency(report.totals.grand_total_expenses),
        format_currency(report.totals.grand_total_profit),
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if report.transactions_rejected > 0 {
        println!(
            "⚠️  {} of {} transactions were excluded (bad date or amount)",
            report.transactions_rejected, report.transactions_seen
        );
    }

    println!("\n{}", report.summary());
}

/// Display formatting only - numbers are never recomputed here
fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}
