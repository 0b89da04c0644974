//! Conversion from stored rows to transport cookies.

use cookie::Cookie;
use time::{OffsetDateTime, PrimitiveDateTime};

use super::StoredCookie;

/// Convert stored rows into cookies, one for one and in order.
///
/// The same-site attribute is not mapped and stays unset.
pub fn convert(rows: Vec<StoredCookie>) -> Vec<Cookie<'static>> {
    rows.into_iter().map(to_cookie).collect()
}

fn to_cookie(row: StoredCookie) -> Cookie<'static> {
    Cookie::build((row.name, row.value))
        .path(row.path)
        .domain(row.host)
        .expires(expiry_instant(row.expiry))
        .secure(row.is_secure)
        .http_only(row.is_http_only)
        .build()
}

/// Absolute instant `seconds` after the Unix epoch, saturating at the
/// bounds `time` can represent.
pub fn expiry_instant(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).unwrap_or_else(|_| {
        if seconds < 0 {
            PrimitiveDateTime::MIN.assume_utc()
        } else {
            PrimitiveDateTime::MAX.assume_utc()
        }
    })
}
