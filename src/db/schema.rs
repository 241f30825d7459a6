pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS qr_codes (
    id TEXT PRIMARY KEY,
    content_hash TEXT NOT NULL UNIQUE,
    qr_content TEXT NOT NULL,
    first_seen TEXT NOT NULL,
    times_found INTEGER NOT NULL DEFAULT 1,
    destination_url TEXT,
    final_url TEXT,
    site_title TEXT,
    classification TEXT,
    classification_confidence REAL,
    is_malicious INTEGER NOT NULL DEFAULT 0,
    needs_review INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS qr_sightings (
    id TEXT PRIMARY KEY,
    qr_code_id TEXT NOT NULL REFERENCES qr_codes(id),
    latitude REAL,
    longitude REAL,
    timestamp TEXT NOT NULL,
    image_path TEXT,
    screenshot_path TEXT,
    device_make TEXT,
    device_model TEXT,
    submitted_by TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_qr_codes_hash ON qr_codes(content_hash);
CREATE INDEX IF NOT EXISTS idx_sightings_code ON qr_sightings(qr_code_id);
";
