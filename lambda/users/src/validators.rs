use regex::Regex;
use std::sync::OnceLock;

const EMAIL_MIN_LEN: usize = 3;
const EMAIL_MAX_LEN: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Unanchored: a candidate passes if any substring matches.
        let pattern = r"[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?";
        Regex::new(pattern).unwrap_or_else(|e| panic!("email regex failed to compile: {e}"))
    })
}

/// Checks that `email` is a plausible address: 3 to 254 bytes long and
/// shaped like `local@domain.tld`. Only lowercase letters are accepted.
pub fn is_email_valid(email: &str) -> bool {
    if email.len() < EMAIL_MIN_LEN || email.len() > EMAIL_MAX_LEN {
        return false;
    }
    email_regex().is_match(email)
}
