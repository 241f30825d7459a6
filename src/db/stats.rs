use crate::errors::QrTraceError;
use super::Database;

impl Database {
    /// Summary statistics for the health endpoint and the stats command.
    pub fn statistics(&self) -> Result<serde_json::Value, QrTraceError> {
        let conn = self.conn.lock().unwrap();

        let count = |sql: &str| -> Result<i64, QrTraceError> {
            conn.query_row(sql, [], |row| row.get(0))
                .map_err(|e| QrTraceError::Database(format!("Stats query failed: {}", e)))
        };

        let total_codes = count("SELECT COUNT(*) FROM qr_codes")?;
        let total_sightings = count("SELECT COUNT(*) FROM qr_sightings")?;
        let malicious = count("SELECT COUNT(*) FROM qr_codes WHERE is_malicious = 1")?;
        let needs_review = count("SELECT COUNT(*) FROM qr_codes WHERE needs_review = 1")?;
        let unclassified = count("SELECT COUNT(*) FROM qr_codes WHERE classification IS NULL")?;

        Ok(serde_json::json!({
            "total_unique_codes": total_codes,
            "total_sightings": total_sightings,
            "malicious_count": malicious,
            "needs_review": needs_review,
            "unclassified": unclassified,
        }))
    }
}
