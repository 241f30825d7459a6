use chrono::Utc;
use sha2::{Digest, Sha256};
use crate::errors::QrTraceError;
use crate::models::QrCode;
use super::Database;

const CODE_COLUMNS: &str = "id, content_hash, qr_content, first_seen, times_found, \
     destination_url, final_url, site_title, classification, \
     classification_confidence, is_malicious, needs_review";

/// Deterministic content fingerprint: SHA-256 hex of the payload UTF-8 bytes.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) fn map_code(row: &rusqlite::Row) -> rusqlite::Result<QrCode> {
    Ok(QrCode {
        id: row.get(0)?,
        content_hash: row.get(1)?,
        qr_content: row.get(2)?,
        first_seen: row.get(3)?,
        times_found: row.get(4)?,
        destination_url: row.get(5)?,
        final_url: row.get(6)?,
        site_title: row.get(7)?,
        classification: row.get(8)?,
        classification_confidence: row.get(9)?,
        is_malicious: row.get::<_, i64>(10)? != 0,
        needs_review: row.get::<_, i64>(11)? != 0,
    })
}

impl Database {
    /// Atomic find-or-create for a decoded payload. A single upsert statement
    /// against the content_hash uniqueness constraint guarantees two
    /// concurrent resolutions of the same payload converge on one row with a
    /// correctly incremented counter. Returns the row plus whether this
    /// resolution created it.
    pub fn find_or_create_code(&self, qr_content: &str) -> Result<(QrCode, bool), QrTraceError> {
        let hash = fingerprint(qr_content);
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let conn = self.conn.lock().unwrap();
        let code = conn
            .query_row(
                &format!(
                    "INSERT INTO qr_codes (id, content_hash, qr_content, first_seen, times_found) \
                     VALUES (?1, ?2, ?3, ?4, 1) \
                     ON CONFLICT(content_hash) DO UPDATE SET times_found = times_found + 1 \
                     RETURNING {}",
                    CODE_COLUMNS
                ),
                rusqlite::params![id, hash, qr_content, now],
                map_code,
            )
            .map_err(|e| QrTraceError::Database(format!("Find-or-create failed: {}", e)))?;

        // A duplicate can never come back at 1: the counter starts there and
        // only ever increments.
        let is_new = code.times_found == 1;
        Ok((code, is_new))
    }

    pub fn get_code(&self, id: &str) -> Result<Option<QrCode>, QrTraceError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM qr_codes WHERE id = ?1", CODE_COLUMNS))
            .map_err(|e| QrTraceError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![id], map_code) {
            Ok(code) => Ok(Some(code)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(QrTraceError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn get_code_by_hash(&self, content_hash: &str) -> Result<Option<QrCode>, QrTraceError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM qr_codes WHERE content_hash = ?1", CODE_COLUMNS))
            .map_err(|e| QrTraceError::Database(format!("Query failed: {}", e)))?;

        match stmt.query_row(rusqlite::params![content_hash], map_code) {
            Ok(code) => Ok(Some(code)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(QrTraceError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_codes(&self, limit: usize, offset: usize) -> Result<Vec<QrCode>, QrTraceError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM qr_codes ORDER BY first_seen DESC LIMIT ?1 OFFSET ?2",
                CODE_COLUMNS
            ))
            .map_err(|e| QrTraceError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map(rusqlite::params![limit as i64, offset as i64], map_code)
            .map_err(|e| QrTraceError::Database(format!("Query error: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| QrTraceError::Database(format!("Row error: {}", e)))?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint("https://example.com");
        let b = fingerprint("https://example.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_content() {
        assert_ne!(fingerprint("https://a.com"), fingerprint("https://b.com"));
    }

    #[test]
    fn test_find_or_create_new_code() {
        let db = Database::in_memory().unwrap();
        let (code, is_new) = db.find_or_create_code("https://example.com").unwrap();
        assert!(is_new);
        assert_eq!(code.times_found, 1);
        assert_eq!(code.qr_content, "https://example.com");
        assert_eq!(code.content_hash, fingerprint("https://example.com"));
        assert!(code.classification.is_none());
    }

    #[test]
    fn test_find_or_create_duplicate_increments() {
        let db = Database::in_memory().unwrap();
        let (first, _) = db.find_or_create_code("https://example.com").unwrap();
        let (second, is_new) = db.find_or_create_code("https://example.com").unwrap();
        assert!(!is_new);
        assert_eq!(second.id, first.id);
        assert_eq!(second.times_found, 2);

        let (third, _) = db.find_or_create_code("https://example.com").unwrap();
        assert_eq!(third.times_found, 3);
    }

    #[test]
    fn test_find_or_create_distinct_payloads_distinct_rows() {
        let db = Database::in_memory().unwrap();
        let (a, _) = db.find_or_create_code("https://a.com").unwrap();
        let (b, _) = db.find_or_create_code("https://b.com").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(db.list_codes(10, 0).unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_resolutions_single_row() {
        let db = Database::in_memory().unwrap();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            handles.push(std::thread::spawn(move || {
                db.find_or_create_code("https://race.example.com").unwrap()
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let codes = db.list_codes(10, 0).unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].times_found, 8);
    }

    #[test]
    fn test_get_code_by_hash() {
        let db = Database::in_memory().unwrap();
        db.find_or_create_code("hello world").unwrap();
        let found = db.get_code_by_hash(&fingerprint("hello world")).unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().qr_content, "hello world");
    }

    #[test]
    fn test_get_code_nonexistent() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_code("no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_list_codes_pagination() {
        let db = Database::in_memory().unwrap();
        for i in 0..5 {
            db.find_or_create_code(&format!("https://example.com/{}", i)).unwrap();
        }
        assert_eq!(db.list_codes(10, 0).unwrap().len(), 5);
        assert_eq!(db.list_codes(2, 0).unwrap().len(), 2);
        assert_eq!(db.list_codes(10, 4).unwrap().len(), 1);
    }
}
