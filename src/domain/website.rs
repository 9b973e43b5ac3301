use super::models::SENTINEL;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebsiteWarning {
    Missing,
    Invalid(String),
}

impl std::fmt::Display for WebsiteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebsiteWarning::Missing => write!(f, "This company does not have a valid URL."),
            WebsiteWarning::Invalid(raw) => write!(f, "This company does not have a valid URL: {raw}"),
        }
    }
}

/// Checks a stored website value. Only absolute http(s) URLs with a host pass.
pub fn check_website(raw: &str) -> Result<Url, WebsiteWarning> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == SENTINEL {
        return Err(WebsiteWarning::Missing);
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(url),
        _ => Err(WebsiteWarning::Invalid(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url() {
        assert_eq!(check_website("N/A"), Err(WebsiteWarning::Missing));
        assert_eq!(check_website("  "), Err(WebsiteWarning::Missing));
    }

    #[test]
    fn test_valid_url() {
        let url = check_website("https://example.com/shop").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(check_website("example.com"), Err(WebsiteWarning::Invalid(_))));
        assert!(matches!(check_website("mailto:a@b.c"), Err(WebsiteWarning::Invalid(_))));
    }
}
