use crate::crypto::FieldCipher;
use crate::errors::{AppError, ResultExt};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Database storage service for encrypted analysis records.
///
/// One fresh insert per analysis request; records are never updated or
/// deleted by this pipeline.
pub struct AnalysisStorage {
    pool: SqlitePool,
}

/// Plaintext values of one audit record, sealed individually before write.
#[derive(Debug)]
pub struct NewAnalysisRecord<'a> {
    pub industry: &'a str,
    pub revenue: f64,
    pub profit: f64,
    pub risk_level: &'a str,
    pub ai_summary: &'a str,
}

/// A stored record read back and decrypted. Numeric fields come back as the
/// strings they were sealed from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnalysisRecord {
    pub id: Uuid,
    pub industry: String,
    pub revenue: String,
    pub profit: String,
    pub risk_level: String,
    pub ai_summary: String,
}

#[derive(sqlx::FromRow)]
struct EncryptedRow {
    id: String,
    industry: String,
    revenue: String,
    profit: String,
    risk_level: String,
    ai_summary: String,
}

impl AnalysisStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Seal each field with the process-wide cipher and insert one record.
    ///
    /// Callers treat any error here as fire-and-forget relative to the HTTP
    /// response: it is logged, never propagated to the client.
    pub async fn store_analysis(
        &self,
        cipher: &FieldCipher,
        record: &NewAnalysisRecord<'_>,
    ) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO financial_records
                (id, industry, revenue, profit, risk_level, ai_summary, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(cipher.seal(record.industry)?)
        .bind(cipher.seal(&record.revenue.to_string())?)
        .bind(cipher.seal(&record.profit.to_string())?)
        .bind(cipher.seal(record.risk_level)?)
        .bind(cipher.seal(record.ai_summary)?)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert financial record")?;

        Ok(id)
    }

    /// Read one record back and decrypt every field.
    #[allow(dead_code)]
    pub async fn load_record(
        &self,
        cipher: &FieldCipher,
        id: Uuid,
    ) -> Result<Option<StoredAnalysisRecord>, AppError> {
        let row = sqlx::query_as::<_, EncryptedRow>(
            r#"
            SELECT id, industry, revenue, profit, risk_level, ai_summary
            FROM financial_records
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to load financial record")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(StoredAnalysisRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| AppError::InternalError(format!("Corrupt record id: {}", e)))?,
            industry: cipher.open(&row.industry)?,
            revenue: cipher.open(&row.revenue)?,
            profit: cipher.open(&row.profit)?,
            risk_level: cipher.open(&row.risk_level)?,
            ai_summary: cipher.open(&row.ai_summary)?,
        }))
    }

    /// Number of stored records; used by tests and operability checks.
    #[allow(dead_code)]
    pub async fn record_count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM financial_records")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count financial records")?;
        Ok(count)
    }
}
