//! Named websites for the "open" command

use std::collections::BTreeMap;

/// Sites available out of the box
const DEFAULT_SITES: &[(&str, &str)] = &[
    ("youtube", "https://youtube.com"),
    ("google", "https://google.com"),
    ("github", "https://github.com"),
    ("stackoverflow", "https://stackoverflow.com"),
    ("instagram", "https://instagram.com"),
    ("facebook", "https://facebook.com"),
    ("twitter", "https://twitter.com"),
    ("whatsapp", "https://www.whatsapp.com"),
];

/// Lookup from spoken site name to URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTable {
    sites: BTreeMap<String, String>,
}

impl Default for SiteTable {
    fn default() -> Self {
        Self {
            sites: DEFAULT_SITES
                .iter()
                .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
                .collect(),
        }
    }
}

impl SiteTable {
    /// Default sites plus `extra`, which wins on name clashes
    #[must_use]
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Self {
        let mut table = Self::default();
        table
            .sites
            .extend(extra.iter().map(|(name, url)| (name.to_lowercase(), url.clone())));
        table
    }

    /// URL for a site name
    #[must_use]
    pub fn url(&self, name: &str) -> Option<&str> {
        self.sites.get(name).map(String::as_str)
    }

    /// Configured site names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sites.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sites() {
        let table = SiteTable::default();
        assert_eq!(table.url("youtube"), Some("https://youtube.com"));
        assert_eq!(table.url("whatsapp"), Some("https://www.whatsapp.com"));
        assert_eq!(table.url("myspace"), None);
        assert_eq!(table.names().count(), DEFAULT_SITES.len());
    }

    #[test]
    fn test_extra_sites_override() {
        let mut extra = BTreeMap::new();
        extra.insert("Reddit".to_string(), "https://reddit.com".to_string());
        extra.insert("google".to_string(), "https://google.co.uk".to_string());

        let table = SiteTable::with_extra(&extra);
        assert_eq!(table.url("reddit"), Some("https://reddit.com"));
        assert_eq!(table.url("google"), Some("https://google.co.uk"));
    }
}
