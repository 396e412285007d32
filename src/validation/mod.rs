//! Request validation.
//!
//! Every check runs and every violation is reported, in a fixed order, so
//! clients can fix a payload in one round trip.

pub mod pagination;
pub mod post;

pub use pagination::{validate_pagination, PageRequest, PaginationCheck, PaginationQuery};
pub use post::{create_post_errors, validate_create_post, validate_post_id, CreatePostPayload};

/// Base-10 integer prefix: leading whitespace, an optional sign, then the
/// longest run of ASCII digits. Anything after the digits is ignored, so
/// `"2abc"` and `"5.0"` read as 2 and 5. No digits means not a number.
/// Values beyond `i64` saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let value = rest[..digits].bytes().fold(0i64, |acc, d| {
        let d = i64::from(d - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(d)
        } else {
            acc.saturating_mul(10).saturating_add(d)
        }
    });

    Some(value)
}
