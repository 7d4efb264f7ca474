use std::fmt;

use tracing::error;

use crate::effects::EffectSpec;

/// Deterministic digest of an effect configuration, used as a preview cache
/// key. Not a security boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn fingerprint(spec: &EffectSpec) -> Fingerprint {
    match serde_json::to_value(spec) {
        Ok(value) => fingerprint_value(&value),
        Err(err) => {
            // Plain data with string keys; only reachable if a field type
            // gains a non-serializable representation.
            debug_assert!(false, "effect spec did not serialize: {err}");
            error!(%err, "effect spec did not serialize, fingerprinting its debug form");
            fingerprint_value(&serde_json::Value::String(format!("{spec:?}")))
        }
    }
}

/// Fingerprint an arbitrary configuration document.
///
/// Object keys are visited in sorted order at every depth, so two documents
/// that differ only in key order hash identically.
pub fn fingerprint_value(value: &serde_json::Value) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    write_value(&mut hasher, value);
    Fingerprint(hasher.finalize().to_hex().to_string())
}

fn write_value(h: &mut blake3::Hasher, v: &serde_json::Value) {
    match v {
        serde_json::Value::Null => write_tag(h, 0),
        serde_json::Value::Bool(x) => {
            write_tag(h, 1);
            write_tag(h, u8::from(*x));
        }
        serde_json::Value::Number(n) => {
            write_tag(h, 2);
            // -0.0 == 0.0, so both zeros share one encoding.
            match n.as_f64() {
                Some(f) if f == 0.0 => write_str(h, "0"),
                _ => write_str(h, &n.to_string()),
            }
        }
        serde_json::Value::String(s) => {
            write_tag(h, 3);
            write_str(h, s);
        }
        serde_json::Value::Array(items) => {
            write_tag(h, 4);
            write_len(h, items.len());
            for item in items {
                write_value(h, item);
            }
        }
        serde_json::Value::Object(map) => {
            write_tag(h, 5);
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            write_len(h, entries.len());
            for (k, item) in entries {
                write_str(h, k);
                write_value(h, item);
            }
        }
    }
}

fn write_tag(h: &mut blake3::Hasher, tag: u8) {
    h.update(&[tag]);
}

fn write_len(h: &mut blake3::Hasher, len: usize) {
    h.update(&(len as u64).to_le_bytes());
}

fn write_str(h: &mut blake3::Hasher, s: &str) {
    write_len(h, s.len());
    h.update(s.as_bytes());
}
