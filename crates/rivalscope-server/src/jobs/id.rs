use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rivalscope_scraper::host_of;
use sha2::{Digest, Sha256};

/// Issues job ids of the form `{host}_{unix_millis}_{4 hex}`.
///
/// The hex suffix hashes the url, the timestamp and a process-wide counter so
/// two submissions of the same url in the same millisecond still differ.
#[derive(Debug, Default)]
pub(crate) struct JobIdGenerator {
    seq: AtomicU64,
}

impl JobIdGenerator {
    pub(crate) fn next(&self, url: &str, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let digest = Sha256::digest(format!("{url}|{millis}|{seq}").as_bytes());
        format!(
            "{}_{millis}_{:02x}{:02x}",
            id_safe_host(url),
            digest[0],
            digest[1]
        )
    }
}

fn id_safe_host(url: &str) -> String {
    let host: String = host_of(url)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if host.is_empty() {
        "site".to_string()
    } else {
        host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_starts_with_host_and_timestamp() {
        let now = Utc::now();
        let id = JobIdGenerator::default().next("https://www.acme.io/pricing", now);
        let prefix = format!("www.acme.io_{}_", now.timestamp_millis());
        assert!(id.starts_with(&prefix), "{id}");
        assert_eq!(id.len(), prefix.len() + 4);
    }

    #[test]
    fn ids_for_same_url_and_instant_are_unique() {
        let generator = JobIdGenerator::default();
        let now = Utc::now();
        let ids: HashSet<String> = (0..500)
            .map(|_| generator.next("https://acme.io", now))
            .collect();
        // 16 bits of suffix: a handful of collisions in 500 draws would be
        // unlucky but possible, so only require near-uniqueness.
        assert!(ids.len() > 490, "{} unique ids", ids.len());
    }

    #[test]
    fn id_is_query_string_safe() {
        let id = JobIdGenerator::default().next("https://exa_mple.io:8080", Utc::now());
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')));
    }
}
