//! Conversion of raw EXIF values into JSON-friendly [`MetadataValue`]s.

use exif::Value;

use super::MetadataValue;

/// Byte strings longer than this are summarised instead of hex-encoded.
const MAX_HEX_BYTES: usize = 32;

/// Sanitize one EXIF field value.
///
/// Rationals become ints when exact, floats otherwise; byte strings become
/// text when printable UTF-8, else hex or a `<N bytes>` placeholder.
/// Multi-valued fields become lists; single values collapse to scalars.
pub fn sanitize_value(value: &Value) -> MetadataValue {
    match value {
        Value::Byte(bytes) => sanitize_bytes(bytes),
        Value::Undefined(bytes, _) => sanitize_bytes(bytes),
        Value::Ascii(strings) => collapse(
            strings
                .iter()
                .map(|s| {
                    let text = String::from_utf8_lossy(s);
                    MetadataValue::Text(text.trim_end_matches('\0').trim_end().to_string())
                })
                .collect(),
        ),
        Value::Short(v) => collapse(v.iter().map(|x| MetadataValue::Int(i64::from(*x))).collect()),
        Value::Long(v) => collapse(v.iter().map(|x| MetadataValue::Int(i64::from(*x))).collect()),
        Value::SByte(v) => collapse(v.iter().map(|x| MetadataValue::Int(i64::from(*x))).collect()),
        Value::SShort(v) => collapse(v.iter().map(|x| MetadataValue::Int(i64::from(*x))).collect()),
        Value::SLong(v) => collapse(v.iter().map(|x| MetadataValue::Int(i64::from(*x))).collect()),
        Value::Rational(v) => collapse(
            v.iter()
                .map(|r| rational(i64::from(r.num), i64::from(r.denom)))
                .collect(),
        ),
        Value::SRational(v) => collapse(
            v.iter()
                .map(|r| rational(i64::from(r.num), i64::from(r.denom)))
                .collect(),
        ),
        Value::Float(v) => collapse(v.iter().map(|x| MetadataValue::Float(f64::from(*x))).collect()),
        Value::Double(v) => collapse(v.iter().map(|x| MetadataValue::Float(*x)).collect()),
        Value::Unknown(typ, count, _) => {
            MetadataValue::Text(format!("<unknown type {} x{}>", typ, count))
        }
        #[allow(unreachable_patterns)]
        _ => MetadataValue::Text(format!("{:?}", value)),
    }
}

/// Sanitize a raw byte string.
pub fn sanitize_bytes(bytes: &[u8]) -> MetadataValue {
    if let Ok(text) = std::str::from_utf8(bytes) {
        if text.chars().all(|c| !c.is_control()) {
            return MetadataValue::Text(text.to_string());
        }
    }
    if bytes.len() <= MAX_HEX_BYTES {
        MetadataValue::Text(hex::encode(bytes))
    } else {
        MetadataValue::Text(format!("<{} bytes>", bytes.len()))
    }
}

/// Exact rationals become ints, others floats.
fn rational(num: i64, denom: i64) -> MetadataValue {
    if denom == 0 {
        return MetadataValue::Text(format!("{}/0", num));
    }
    if num % denom == 0 {
        MetadataValue::Int(num / denom)
    } else {
        MetadataValue::Float(num as f64 / denom as f64)
    }
}

fn collapse(mut items: Vec<MetadataValue>) -> MetadataValue {
    if items.len() == 1 {
        items.remove(0)
    } else {
        MetadataValue::List(items)
    }
}
