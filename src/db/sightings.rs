use chrono::Utc;
use crate::errors::QrTraceError;
use crate::models::{Classification, NewSighting, Sighting};
use super::Database;

/// Destination details captured during inspection, applied at finalize.
#[derive(Debug, Clone)]
pub struct DestinationUpdate {
    pub destination_url: String,
    pub final_url: Option<String>,
    pub site_title: Option<String>,
}

fn map_sighting(row: &rusqlite::Row) -> rusqlite::Result<Sighting> {
    Ok(Sighting {
        id: row.get(0)?,
        qr_code_id: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        timestamp: row.get(4)?,
        image_path: row.get(5)?,
        screenshot_path: row.get(6)?,
        device_make: row.get(7)?,
        device_model: row.get(8)?,
        submitted_by: row.get(9)?,
        created_at: row.get(10)?,
    })
}

impl Database {
    /// Commit one submission's durable writes as a single transaction:
    /// the sighting insert plus any destination and classification updates
    /// on the owning code row. All-or-nothing; a failure here leaves no
    /// half-built record.
    pub fn finalize_submission(
        &self,
        qr_code_id: &str,
        sighting: &NewSighting,
        destination: Option<&DestinationUpdate>,
        classification: Option<(&Classification, bool)>,
    ) -> Result<Sighting, QrTraceError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| QrTraceError::Database(format!("Transaction begin failed: {}", e)))?;

        tx.execute(
            "INSERT INTO qr_sightings (id, qr_code_id, latitude, longitude, timestamp, \
             image_path, screenshot_path, device_make, device_model, submitted_by, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                id,
                qr_code_id,
                sighting.latitude,
                sighting.longitude,
                sighting.timestamp,
                sighting.image_path,
                sighting.screenshot_path,
                sighting.device_make,
                sighting.device_model,
                sighting.submitted_by,
                created_at,
            ],
        )
        .map_err(|e| QrTraceError::Database(format!("Sighting insert failed: {}", e)))?;

        if let Some(dest) = destination {
            tx.execute(
                "UPDATE qr_codes SET destination_url = ?2, final_url = ?3, site_title = ?4 \
                 WHERE id = ?1",
                rusqlite::params![qr_code_id, dest.destination_url, dest.final_url, dest.site_title],
            )
            .map_err(|e| QrTraceError::Database(format!("Destination update failed: {}", e)))?;
        }

        // A missing classification never overwrites a stored prior; callers
        // pass Some only when the classifier actually produced a verdict.
        if let Some((class, needs_review)) = classification {
            tx.execute(
                "UPDATE qr_codes SET classification = ?2, classification_confidence = ?3, \
                 is_malicious = ?4, needs_review = ?5 WHERE id = ?1",
                rusqlite::params![
                    qr_code_id,
                    class.category.as_str(),
                    class.confidence,
                    class.is_malicious as i64,
                    needs_review as i64,
                ],
            )
            .map_err(|e| QrTraceError::Database(format!("Classification update failed: {}", e)))?;
        }

        tx.commit()
            .map_err(|e| QrTraceError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(Sighting {
            id,
            qr_code_id: qr_code_id.to_string(),
            latitude: sighting.latitude,
            longitude: sighting.longitude,
            timestamp: sighting.timestamp.clone(),
            image_path: sighting.image_path.clone(),
            screenshot_path: sighting.screenshot_path.clone(),
            device_make: sighting.device_make.clone(),
            device_model: sighting.device_model.clone(),
            submitted_by: sighting.submitted_by.clone(),
            created_at,
        })
    }

    pub fn list_sightings(&self, qr_code_id: &str) -> Result<Vec<Sighting>, QrTraceError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, qr_code_id, latitude, longitude, timestamp, image_path, \
                 screenshot_path, device_make, device_model, submitted_by, created_at \
                 FROM qr_sightings WHERE qr_code_id = ?1 ORDER BY created_at ASC",
            )
            .map_err(|e| QrTraceError::Database(format!("Query failed: {}", e)))?;

        let rows = stmt
            .query_map(rusqlite::params![qr_code_id], map_sighting)
            .map_err(|e| QrTraceError::Database(format!("Query error: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| QrTraceError::Database(format!("Row error: {}", e)))?);
        }
        Ok(results)
    }

    pub fn count_sightings(&self, qr_code_id: &str) -> Result<i64, QrTraceError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM qr_sightings WHERE qr_code_id = ?1",
            rusqlite::params![qr_code_id],
            |row| row.get(0),
        )
        .map_err(|e| QrTraceError::Database(format!("Count failed: {}", e)))
    }
}
