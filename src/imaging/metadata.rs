use chrono::NaiveDateTime;
use exif::{In, Tag, Value};

/// Capture metadata read from an image's EXIF container. Every field is
/// independently optional; cameras and messaging apps vary widely in what
/// they embed, and absence is the common case, not an error.
#[derive(Debug, Clone, Default)]
pub struct CaptureMetadata {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<NaiveDateTime>,
    pub device_make: Option<String>,
    pub device_model: Option<String>,
}

impl CaptureMetadata {
    pub fn has_gps(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Pure read of GPS coordinates, capture timestamp and device identifiers.
/// Images without EXIF (or with a truncated container) yield an empty value.
pub fn extract_metadata(bytes: &[u8]) -> CaptureMetadata {
    let mut cursor = std::io::Cursor::new(bytes);
    let reader = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(reader) => reader,
        Err(_) => return CaptureMetadata::default(),
    };

    let (latitude, longitude) = parse_gps(&reader);

    CaptureMetadata {
        latitude,
        longitude,
        timestamp: parse_timestamp(&reader),
        device_make: ascii_field(&reader, Tag::Make),
        device_model: ascii_field(&reader, Tag::Model),
    }
}

fn parse_gps(reader: &exif::Exif) -> (Option<f64>, Option<f64>) {
    let lat = rational_degrees(reader, Tag::GPSLatitude);
    let lat_ref = ascii_field_raw(reader, Tag::GPSLatitudeRef);
    let lon = rational_degrees(reader, Tag::GPSLongitude);
    let lon_ref = ascii_field_raw(reader, Tag::GPSLongitudeRef);

    match (lat, lat_ref, lon, lon_ref) {
        (Some(lat), Some(lat_ref), Some(lon), Some(lon_ref)) => {
            let lat = if lat_ref.starts_with('N') { lat } else { -lat };
            let lon = if lon_ref.starts_with('E') { lon } else { -lon };
            (Some(lat), Some(lon))
        }
        _ => (None, None),
    }
}

/// Convert a degrees/minutes/seconds rational triple to decimal degrees.
fn rational_degrees(reader: &exif::Exif, tag: Tag) -> Option<f64> {
    let field = reader.get_field(tag, In::PRIMARY)?;
    if let Value::Rational(ref parts) = field.value {
        if parts.len() >= 3 {
            let d = parts[0].to_f64();
            let m = parts[1].to_f64();
            let s = parts[2].to_f64();
            return Some(d + m / 60.0 + s / 3600.0);
        }
    }
    None
}

fn parse_timestamp(reader: &exif::Exif) -> Option<NaiveDateTime> {
    // Preference order matches how cameras populate these tags
    for tag in [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime] {
        if let Some(raw) = ascii_field_raw(reader, tag) {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S") {
                return Some(ts);
            }
        }
    }
    None
}

fn ascii_field(reader: &exif::Exif, tag: Tag) -> Option<String> {
    ascii_field_raw(reader, tag).map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn ascii_field_raw(reader: &exif::Exif, tag: Tag) -> Option<String> {
    let field = reader.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref parts) = field.value {
        if let Some(first) = parts.first() {
            return Some(String::from_utf8_lossy(first).into_owned());
        }
    }
    None
}
