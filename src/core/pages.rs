//! GitHub Pages URL conventions.

const PAGES_DOMAIN: &str = "github.io";

/// `https://{account}.github.io`, the account's pages host.
pub fn homepage(account: &str) -> String {
    format!("https://{}.{}", account, PAGES_DOMAIN)
}

/// Public URL a repository is served at.
///
/// A repository named `{account}.github.io` is the account's user site and
/// lives at the bare host; any other repository is a project site under
/// `/{repo}`.
pub fn pages_url(account: &str, repo: &str) -> String {
    if is_user_site(account, repo) {
        format!("{}/", homepage(account))
    } else {
        format!("{}/{}", homepage(account), repo)
    }
}

pub fn is_user_site(account: &str, repo: &str) -> bool {
    repo.eq_ignore_ascii_case(&format!("{}.{}", account, PAGES_DOMAIN))
}

/// Where Pages can be switched on by hand.
pub fn settings_url(account: &str, repo: &str) -> String {
    format!("https://github.com/{}/{}/settings/pages", account, repo)
}
