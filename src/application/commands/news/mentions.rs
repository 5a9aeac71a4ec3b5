// src/application/commands/news/mentions.rs
use crate::domain::news::UserId;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9][A-Za-z0-9._-]*)").expect("valid mention pattern"));

/// Usernames mentioned as `@username` tokens in an article body.
pub(super) fn extract_mentions(body: &str) -> BTreeSet<UserId> {
    MENTION_PATTERN
        .captures_iter(body)
        .filter_map(|capture| UserId::new(&capture[1]).ok())
        .collect()
}

/// Mentions introduced by the new body: users already notified under the
/// previous body are suppressed.
pub(super) fn new_mentions(previous_body: &str, current_body: &str) -> BTreeSet<UserId> {
    let previous = extract_mentions(previous_body);
    extract_mentions(current_body)
        .into_iter()
        .filter(|user| !previous.contains(user))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_unique_usernames() {
        let mentions = extract_mentions("ping @maia and @noor, then @maia again");
        let names: Vec<_> = mentions.iter().map(UserId::as_str).collect();
        assert_eq!(names, vec!["maia", "noor"]);
    }

    #[test]
    fn previously_notified_users_are_suppressed() {
        let fresh = new_mentions("hello @maia", "hello @maia and @noor");
        let names: Vec<_> = fresh.iter().map(UserId::as_str).collect();
        assert_eq!(names, vec!["noor"]);
    }

    #[test]
    fn no_mentions_yields_empty_set() {
        assert!(extract_mentions("plain text, mail me at nowhere").is_empty());
    }
}
