// 🗄️ Transaction Store - CSV ledger → SQLite + WAL
// Supplies the immutable transaction list everything downstream consumes.
// The store is write-once at import time; the engines treat its output
// as a read-only slice and never mutate it.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

// ============================================================================
// CATEGORY & STATUS
// ============================================================================

/// What kind of money movement a transaction represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    /// Customer payment for a completed job (revenue)
    Payment,

    /// Money spent on a job (materials, fuel, permits, ...)
    Expense,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Payment => "payment",
            TransactionCategory::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<TransactionCategory> {
        match s {
            "payment" => Some(TransactionCategory::Payment),
            "expense" => Some(TransactionCategory::Expense),
            _ => None,
        }
    }
}

/// Lifecycle status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<TransactionStatus> {
        match s {
            "completed" => Some(TransactionStatus::Completed),
            "pending" => Some(TransactionStatus::Pending),
            "cancelled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// An immutable financial event tied to an entity and a calendar date.
/// Core fields never change after import; metadata can grow without
/// breaking the schema.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Transaction {
    // ========================================================================
    // CORE FIELDS (immutable after import)
    // ========================================================================
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Description")]
    pub description: String,

    /// Amount in a single consistent currency unit. Expected non-negative;
    /// negative or non-finite amounts are screened out before aggregation.
    #[serde(rename = "Amount")]
    pub amount: f64,

    #[serde(rename = "Category")]
    pub category: TransactionCategory,

    /// Technician id or job-source id this transaction belongs to
    #[serde(rename = "Entity_Ref")]
    pub entity_ref: String,

    #[serde(rename = "Status")]
    pub status: TransactionStatus,

    /// Per-transaction override of the entity's default payment rate.
    /// When present it always wins over the entity default.
    #[serde(rename = "Rate_Value")]
    #[serde(default)]
    pub rate_value: Option<f64>,

    /// Whether `rate_value` is a percentage (true) or a flat per-job
    /// amount (false). Absent means percentage.
    #[serde(rename = "Rate_Is_Percentage")]
    #[serde(default)]
    pub rate_is_percentage: Option<bool>,

    #[serde(rename = "Quote_Status")]
    #[serde(default)]
    pub quote_status: Option<String>,

    // ========================================================================
    // IDENTITY & PROVENANCE
    // ========================================================================
    /// Stable identity (UUID) - assigned at import, never changes
    #[serde(default = "default_uuid")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// When this record entered the store
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingested_at: Option<DateTime<Utc>>,

    // ========================================================================
    // EXTENSIBLE METADATA (can grow without schema changes)
    // ========================================================================
    #[serde(default)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

fn default_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Transaction {
    /// Parse the calendar date. Accepts ISO (`2025-01-31`) and US
    /// (`01/31/2025`) formats; anything else is None. Time-of-day is
    /// never carried - all comparisons happen at day granularity.
    pub fn parse_date(&self) -> Option<NaiveDate> {
        parse_ledger_date(&self.date)
    }

    /// Compute idempotency hash for duplicate detection on import.
    /// NOTE: this is for DEDUPLICATION, not identity - identity is `id`.
    pub fn compute_idempotency_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}{}{}{}",
            self.date, self.amount, self.entity_ref, self.description
        ));
        format!("{:x}", hasher.finalize())
    }

    /// Percentage-rate override for this transaction, if one applies.
    /// A rate flagged as non-percentage is a flat per-job override instead.
    pub fn percentage_override(&self) -> Option<f64> {
        match (self.rate_value, self.rate_is_percentage) {
            (Some(rate), Some(true)) | (Some(rate), None) => Some(rate),
            _ => None,
        }
    }

    /// Flat per-job override for this transaction, if one applies.
    pub fn flat_override(&self) -> Option<f64> {
        match (self.rate_value, self.rate_is_percentage) {
            (Some(rate), Some(false)) => Some(rate),
            _ => None,
        }
    }

    /// Initialize identity and provenance for a freshly imported row
    pub fn init_import_fields(&mut self, source_file: &str) {
        if self.id.is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
        if self.ingested_at.is_none() {
            self.ingested_at = Some(Utc::now());
        }
        self.metadata.insert(
            "source_file".to_string(),
            serde_json::json!(source_file),
        );
    }

    /// Get metadata value by key
    pub fn get_metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }
}

/// Lenient ledger date parsing shared by the store and the screens
pub fn parse_ledger_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            idempotency_hash TEXT UNIQUE NOT NULL,
            tx_uuid TEXT UNIQUE,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            entity_ref TEXT NOT NULL,
            status TEXT NOT NULL,
            rate_value REAL,
            rate_is_percentage INTEGER,
            quote_status TEXT,
            ingested_at TEXT,
            metadata TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes - date, entity and category are the filter dimensions
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_idempotency_hash ON transactions(idempotency_hash)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_date ON transactions(date)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entity_ref ON transactions(entity_ref)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_category ON transactions(category)",
        [],
    )?;

    Ok(())
}

pub fn load_ledger_csv(csv_path: &Path) -> Result<Vec<Transaction>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open ledger CSV")?;

    let source_file = csv_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| csv_path.display().to_string());

    let mut transactions = Vec::new();

    for result in rdr.deserialize() {
        let mut transaction: Transaction = result.context("Failed to deserialize transaction")?;
        transaction.init_import_fields(&source_file);
        transactions.push(transaction);
    }

    Ok(transactions)
}

pub fn insert_transactions(conn: &Connection, transactions: &[Transaction]) -> Result<usize> {
    let mut inserted = 0;
    let mut duplicates = 0;

    for tx in transactions {
        let hash = tx.compute_idempotency_hash();
        let metadata_json = serde_json::to_string(&tx.metadata)?;
        let ingested_at_str = tx.ingested_at.map(|dt| dt.to_rfc3339());

        let result = conn.execute(
            "INSERT INTO transactions (
                idempotency_hash, tx_uuid, date, description, amount,
                category, entity_ref, status, rate_value, rate_is_percentage,
                quote_status, ingested_at, metadata
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                hash,
                if tx.id.is_empty() { None } else { Some(&tx.id) },
                tx.date,
                tx.description,
                tx.amount,
                tx.category.as_str(),
                tx.entity_ref,
                tx.status.as_str(),
                tx.rate_value,
                tx.rate_is_percentage,
                tx.quote_status,
                ingested_at_str,
                metadata_json,
            ],
        );

        match result {
            Ok(_) => inserted += 1,
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                duplicates += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("✓ Inserted: {} transactions", inserted);
    println!("✓ Skipped duplicates: {}", duplicates);

    Ok(inserted)
}

pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT date, description, amount, category, entity_ref, status,
                rate_value, rate_is_percentage, quote_status,
                tx_uuid, ingested_at, metadata
         FROM transactions
         ORDER BY date DESC, id DESC",
    )?;

    let transactions = stmt
        .query_map([], |row| {
            let category_str: String = row.get(3)?;
            let status_str: String = row.get(5)?;
            let tx_uuid: Option<String> = row.get(9)?;
            let ingested_at_str: Option<String> = row.get(10)?;
            let metadata_json: Option<String> = row.get(11)?;

            let metadata = metadata_json
                .and_then(|json_str| serde_json::from_str(&json_str).ok())
                .unwrap_or_default();
            let ingested_at = ingested_at_str
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc));

            Ok(Transaction {
                date: row.get(0)?,
                description: row.get(1)?,
                amount: row.get(2)?,
                category: TransactionCategory::parse(&category_str)
                    .unwrap_or(TransactionCategory::Expense),
                entity_ref: row.get(4)?,
                status: TransactionStatus::parse(&status_str)
                    .unwrap_or(TransactionStatus::Pending),
                rate_value: row.get(6)?,
                rate_is_percentage: row.get(7)?,
                quote_status: row.get(8)?,
                id: tx_uuid.unwrap_or_default(),
                ingested_at,
                metadata,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
    Ok(count)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_transaction(
        date: &str,
        amount: f64,
        category: TransactionCategory,
        entity_ref: &str,
    ) -> Transaction {
        Transaction {
            date: date.to_string(),
            description: format!("Test job for {}", entity_ref),
            amount,
            category,
            entity_ref: entity_ref.to_string(),
            status: TransactionStatus::Completed,
            rate_value: None,
            rate_is_percentage: None,
            quote_status: None,
            id: uuid::Uuid::new_v4().to_string(),
            ingested_at: Some(Utc::now()),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_parse_ledger_date_formats() {
        assert_eq!(
            parse_ledger_date("2025-01-31"),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert_eq!(
            parse_ledger_date("01/31/2025"),
            NaiveDate::from_ymd_opt(2025, 1, 31)
        );
        assert_eq!(parse_ledger_date("31 Jan 2025"), None);
        assert_eq!(parse_ledger_date(""), None);
    }

    #[test]
    fn test_compute_idempotency_hash_stable() {
        let tx = create_test_transaction("2025-01-15", 500.0, TransactionCategory::Payment, "tech-1");
        let hash1 = tx.compute_idempotency_hash();
        let hash2 = tx.compute_idempotency_hash();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 hex

        // Different amount → different hash
        let mut other = tx.clone();
        other.amount = 501.0;
        assert_ne!(hash1, other.compute_idempotency_hash());
    }

    #[test]
    fn test_rate_override_accessors() {
        let mut tx = create_test_transaction("2025-01-15", 500.0, TransactionCategory::Payment, "tech-1");
        assert_eq!(tx.percentage_override(), None);
        assert_eq!(tx.flat_override(), None);

        // Bare rate value means percentage
        tx.rate_value = Some(25.0);
        assert_eq!(tx.percentage_override(), Some(25.0));
        assert_eq!(tx.flat_override(), None);

        tx.rate_is_percentage = Some(true);
        assert_eq!(tx.percentage_override(), Some(25.0));

        // Flagged non-percentage → flat per-job override
        tx.rate_is_percentage = Some(false);
        assert_eq!(tx.percentage_override(), None);
        assert_eq!(tx.flat_override(), Some(25.0));
    }

    #[test]
    fn test_idempotency_import_twice() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let transactions = vec![
            create_test_transaction("2025-01-10", 500.0, TransactionCategory::Payment, "tech-1"),
            create_test_transaction("2025-01-11", 300.0, TransactionCategory::Payment, "tech-2"),
            create_test_transaction("2025-01-12", 50.0, TransactionCategory::Expense, "tech-1"),
        ];

        let first = insert_transactions(&conn, &transactions).unwrap();
        assert_eq!(first, 3);
        assert_eq!(verify_count(&conn).unwrap(), 3);

        // Importing the same rows again inserts nothing
        let second = insert_transactions(&conn, &transactions).unwrap();
        assert_eq!(second, 0);
        assert_eq!(verify_count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_roundtrip_preserves_rate_override() {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let mut tx = create_test_transaction("2025-02-01", 800.0, TransactionCategory::Payment, "tech-9");
        tx.rate_value = Some(30.0);
        tx.rate_is_percentage = Some(true);
        tx.quote_status = Some("accepted".to_string());

        insert_transactions(&conn, &[tx.clone()]).unwrap();

        let loaded = get_all_transactions(&conn).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].rate_value, Some(30.0));
        assert_eq!(loaded[0].rate_is_percentage, Some(true));
        assert_eq!(loaded[0].quote_status.as_deref(), Some("accepted"));
        assert_eq!(loaded[0].category, TransactionCategory::Payment);
        assert_eq!(loaded[0].status, TransactionStatus::Completed);
        assert_eq!(loaded[0].id, tx.id);
    }

    #[test]
    fn test_csv_load() {
        use std::io::Write;

        let dir = std::env::temp_dir();
        let path = dir.join("jobledger_test_ledger.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "Date,Description,Amount,Category,Entity_Ref,Status,Rate_Value,Rate_Is_Percentage,Quote_Status"
        )
        .unwrap();
        writeln!(file, "2025-01-10,Water heater install,500.0,payment,tech-1,completed,,,").unwrap();
        writeln!(file, "2025-01-11,Copper pipe,42.5,expense,tech-1,completed,,,").unwrap();
        writeln!(file, "2025-01-12,Panel upgrade,900.0,payment,tech-2,completed,25.0,true,accepted").unwrap();
        drop(file);

        let transactions = load_ledger_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].category, TransactionCategory::Payment);
        assert_eq!(transactions[1].category, TransactionCategory::Expense);
        assert_eq!(transactions[2].percentage_override(), Some(25.0));
        assert!(!transactions[0].id.is_empty());
        assert_eq!(
            transactions[0].get_metadata("source_file").unwrap(),
            &serde_json::json!("jobledger_test_ledger.csv")
        );
    }
}
