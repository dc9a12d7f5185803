//! Opaque pagination cursors for the scored conversation feed.
//!
//! A cursor encodes the last-seen `(score, id, last_update)` triple as
//! URL-safe base64 of `"{score}:{id}:{millis}"`. It is a reversible,
//! non-cryptographic serialization with no integrity check. A token that
//! fails to decode is treated as no cursor at all and the feed restarts from
//! the first page; callers log a warning when that happens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

/// Last-seen pagination position in the `(score DESC, id DESC)` ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub score: f64,
    pub id: i64,
    pub last_update: DateTime<Utc>,
}

pub fn encode(cursor: &Cursor) -> String {
    let raw = format!(
        "{}:{}:{}",
        cursor.score,
        cursor.id,
        cursor.last_update.timestamp_millis()
    );
    URL_SAFE_NO_PAD.encode(raw)
}

/// Decode a cursor token. Any malformed token yields `None`.
pub fn decode(token: &str) -> Option<Cursor> {
    let decoded = URL_SAFE_NO_PAD.decode(token).ok()?;
    let raw = String::from_utf8(decoded).ok()?;

    let mut parts = raw.splitn(3, ':');
    let score = parts.next()?.parse::<f64>().ok()?;
    let id = parts.next()?.parse::<i64>().ok()?;
    let millis = parts.next()?.parse::<i64>().ok()?;

    if !score.is_finite() {
        return None;
    }

    let last_update = DateTime::<Utc>::from_timestamp_millis(millis)?;
    Some(Cursor {
        score,
        id,
        last_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Cursor {
        Cursor {
            score: 0.8512345,
            id: 42,
            // Millisecond precision: the token only carries millis
            last_update: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn roundtrip_preserves_all_fields() {
        let cursor = sample();
        let decoded = decode(&encode(&cursor)).unwrap();
        assert_eq!(decoded, cursor);
    }

    #[test]
    fn roundtrip_preserves_negative_scores() {
        let cursor = Cursor {
            score: -0.031,
            ..sample()
        };
        assert_eq!(decode(&encode(&cursor)).unwrap(), cursor);
    }

    #[test]
    fn token_is_url_query_safe() {
        let token = encode(&sample());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert!(decode("").is_none());
        assert!(decode("not base64 at all!").is_none());
        // valid base64, wrong shape
        assert!(decode(&URL_SAFE_NO_PAD.encode("hello")).is_none());
        assert!(decode(&URL_SAFE_NO_PAD.encode("0.5:abc:123")).is_none());
        assert!(decode(&URL_SAFE_NO_PAD.encode("0.5:7")).is_none());
    }

    #[test]
    fn non_finite_scores_are_rejected() {
        assert!(decode(&URL_SAFE_NO_PAD.encode("NaN:7:0")).is_none());
        assert!(decode(&URL_SAFE_NO_PAD.encode("inf:7:0")).is_none());
    }
}
