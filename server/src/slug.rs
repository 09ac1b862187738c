use uuid::Uuid;

use crate::config::{SLUG_PREFIX_MAX_CHARS, SLUG_SUFFIX_CHARS};

const FALLBACK_PREFIX: &str = "flower";

/// URL-safe slug for a title: a deterministic prefix from the title's ASCII
/// words plus a random suffix, e.g. `"Hello, World!"` -> `hello-world-3f9a1c`.
pub fn slugify(title: &str) -> String {
    let suffix = random_suffix();
    format!("{}-{suffix}", slug_prefix(title))
}

pub fn slug_prefix(title: &str) -> String {
    let mut prefix = String::with_capacity(SLUG_PREFIX_MAX_CHARS);
    let words = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty());

    for word in words {
        let word = word.to_ascii_lowercase();
        let sep = usize::from(!prefix.is_empty());
        if prefix.len() + sep + word.len() > SLUG_PREFIX_MAX_CHARS {
            if prefix.is_empty() {
                prefix.push_str(&word[..SLUG_PREFIX_MAX_CHARS]);
            }
            break;
        }
        if sep == 1 {
            prefix.push('-');
        }
        prefix.push_str(&word);
    }

    if prefix.is_empty() {
        FALLBACK_PREFIX.to_owned()
    } else {
        prefix
    }
}

fn random_suffix() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SLUG_SUFFIX_CHARS)
        .collect()
}
