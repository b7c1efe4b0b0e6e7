//! Normalization helpers shared by adapters
//!
//! Adapters turn heterogeneous upstream shapes into [`NewsItem`]s. These helpers
//! cover the parts every adapter needs: dropping malformed records, ordering
//! by timestamp, resolving links and reading the dates Chinese sites print.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use frontline_core::{NewsItem, SortOrder};
use tracing::debug;

/// UTC offset of the upstream sites' wall clock (Asia/Shanghai, no DST)
const SHANGHAI_OFFSET_SECS: i32 = 8 * 3600;

fn shanghai() -> FixedOffset {
    FixedOffset::east_opt(SHANGHAI_OFFSET_SECS).unwrap_or(Utc.fix())
}

/// Drop records that cannot be rendered: empty id/url or a non-http(s) URL
pub fn retain_valid(items: Vec<NewsItem>) -> Vec<NewsItem> {
    let before = items.len();
    let kept: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| item.is_valid() && is_http_url(&item.url))
        .collect();

    if kept.len() < before {
        debug!("Dropped {} malformed items", before - kept.len());
    }
    kept
}

fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw.trim())
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Stable sort on `extra.date`; undated items always go last
pub fn sort_by_date(items: &mut [NewsItem], order: SortOrder) {
    items.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(x), Some(y)) => match order {
            SortOrder::Desc => y.cmp(&x),
            SortOrder::Asc => x.cmp(&y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Resolve `href` against `base`
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let base = url::Url::parse(base).ok()?;
    base.join(href.trim()).ok().map(String::from)
}

/// Route an upstream image through the local image proxy
pub fn proxy_picture(url: &str) -> String {
    format!("/proxy/image?url={}", urlencoding::encode(url))
}

/// Strip tags, decode common entities and collapse whitespace
pub fn clean_text(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an upstream timestamp into epoch milliseconds
///
/// RFC 3339 strings keep their own offset; bare `YYYY-MM-DD HH:MM[:SS]`
/// strings are read as Shanghai wall time.
pub fn parse_local_datetime(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];

    FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
        shanghai()
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.timestamp_millis())
    })
}

/// `now - delta` in epoch milliseconds, `None` when out of range
fn ago(now: DateTime<Utc>, delta: Duration) -> Option<i64> {
    now.checked_sub_signed(delta).map(|dt| dt.timestamp_millis())
}

/// Parse a relative timestamp ("5分钟前", "昨天 10:20", "3 hours ago")
pub fn parse_relative_date(raw: &str, now: DateTime<Utc>) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "刚刚" || raw.eq_ignore_ascii_case("just now") {
        return Some(now.timestamp_millis());
    }

    let zh = regex::Regex::new(r"^(\d+)\s*(秒|分钟|小时|天)前$").ok()?;
    if let Some(caps) = zh.captures(raw) {
        let n: i64 = caps.get(1)?.as_str().parse().ok()?;
        let delta = match caps.get(2)?.as_str() {
            "秒" => Duration::try_seconds(n),
            "分钟" => Duration::try_minutes(n),
            "小时" => Duration::try_hours(n),
            _ => Duration::try_days(n),
        };
        return ago(now, delta?);
    }

    let en = regex::Regex::new(r"(?i)^(\d+)\s*(second|minute|hour|day)s?\s+ago$").ok()?;
    if let Some(caps) = en.captures(raw) {
        let n: i64 = caps.get(1)?.as_str().parse().ok()?;
        let delta = match caps.get(2)?.as_str().to_lowercase().as_str() {
            "second" => Duration::try_seconds(n),
            "minute" => Duration::try_minutes(n),
            "hour" => Duration::try_hours(n),
            _ => Duration::try_days(n),
        };
        return ago(now, delta?);
    }

    // "昨天 10:20" or a bare "10:20" on today's Shanghai date
    let (days_back, clock) = match raw.strip_prefix("昨天") {
        Some(rest) => (1, rest.trim()),
        None => (0, raw),
    };
    let time = NaiveTime::parse_from_str(clock, "%H:%M").ok()?;
    let local_now = now.with_timezone(&shanghai());
    let date = local_now.date_naive() - Duration::days(days_back);
    shanghai()
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontline_core::NewsExtra;

    fn dated(id: &str, date: Option<i64>) -> NewsItem {
        let item = NewsItem::new(id, id, format!("https://example.com/{id}"));
        match date {
            Some(d) => item.with_extra(NewsExtra::dated(d)),
            None => item,
        }
    }

    #[test]
    fn test_retain_valid_drops_malformed() {
        let items = vec![
            NewsItem::new("1", "ok", "https://example.com/1"),
            NewsItem::new("", "no id", "https://example.com/2"),
            NewsItem::new("3", "no url", ""),
            NewsItem::new("4", "relative", "/news/4"),
            NewsItem::new("5", "ftp", "ftp://example.com/5"),
        ];
        let kept = retain_valid(items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn test_sort_by_date_desc_puts_undated_last() {
        let mut items = vec![dated("a", Some(1)), dated("b", None), dated("c", Some(3))];
        sort_by_date(&mut items, SortOrder::Desc);
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_sort_by_date_asc_is_stable() {
        let mut items = vec![
            dated("x", Some(2)),
            dated("a", Some(1)),
            dated("y", Some(2)),
            dated("n", None),
        ];
        sort_by_date(&mut items, SortOrder::Asc);
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "x", "y", "n"]);
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://36kr.com", "/newsflashes/123").as_deref(),
            Some("https://36kr.com/newsflashes/123")
        );
        assert_eq!(
            absolutize("https://github.com", "https://other.org/x").as_deref(),
            Some("https://other.org/x")
        );
        assert!(absolutize("not a url", "/x").is_none());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("<p>Hello <b>world</b>&nbsp;&amp; more\n\n</p>"),
            "Hello world & more"
        );
    }

    #[test]
    fn test_proxy_picture_encodes() {
        assert_eq!(
            proxy_picture("https://img.example.com/a b.png"),
            "/proxy/image?url=https%3A%2F%2Fimg.example.com%2Fa%20b.png"
        );
    }

    #[test]
    fn test_parse_local_datetime_uses_shanghai() {
        // 2024-05-01 08:00 in Shanghai is midnight UTC
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap().timestamp_millis();
        assert_eq!(parse_local_datetime("2024-05-01 08:00:00"), Some(expected));
        assert_eq!(parse_local_datetime("2024-05-01 08:00"), Some(expected));
        assert_eq!(parse_local_datetime("2024-05-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_local_datetime("yesterday-ish"), None);
    }

    #[test]
    fn test_parse_relative_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let ms = |dt: DateTime<Utc>| dt.timestamp_millis();

        assert_eq!(parse_relative_date("刚刚", now), Some(ms(now)));
        assert_eq!(parse_relative_date("5分钟前", now), Some(ms(now - Duration::minutes(5))));
        assert_eq!(parse_relative_date("2小时前", now), Some(ms(now - Duration::hours(2))));
        assert_eq!(parse_relative_date("3 days ago", now), Some(ms(now - Duration::days(3))));

        // 12:00 UTC is 20:00 in Shanghai; yesterday 10:20 Shanghai is 02:20 UTC on Apr 30
        let yesterday = Utc.with_ymd_and_hms(2024, 4, 30, 2, 20, 0).unwrap();
        assert_eq!(parse_relative_date("昨天 10:20", now), Some(ms(yesterday)));
        assert_eq!(parse_relative_date("someday", now), None);
    }

    #[test]
    fn test_parse_relative_date_out_of_range_is_none() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_relative_date("100000000天前", now), None);
        assert_eq!(parse_relative_date("9223372036854775807 seconds ago", now), None);
        assert_eq!(parse_relative_date("99999999999999999999小时前", now), None);
    }
}
