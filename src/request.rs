//! Request Parsing Module
//!
//! Pulls the certificate identity out of an incoming slash-command style
//! request. The domain comes from link markup in the free-form `text` field,
//! e.g. `<http://example.com|example.com>`, and the user from `user_name`.

use regex::Regex;
use serde::Deserialize;

const DOMAIN_PATTERN: &str = r"<http://(.*)\|";
pub const DEFAULT_FALLBACK_DOMAIN: &str = "certs.hshrckt.com";

/// Form fields accepted by the certificate endpoint
#[derive(Debug, Default, Deserialize)]
pub struct CertRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Extracts the target domain from request text, falling back to a fixed domain
#[derive(Debug, Clone)]
pub struct DomainExtractor {
    pattern: Regex,
    fallback: String,
}

impl DomainExtractor {
    pub fn new(fallback: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(DOMAIN_PATTERN)?,
            fallback: fallback.to_string(),
        })
    }

    /// Return the first `<http://...|` capture in `text`, or the fallback domain
    ///
    /// The capture is greedy and runs up to the last `|` on the line.
    pub fn extract(&self, text: &str) -> String {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl CertRequest {
    /// Fill fields missing from `self` with those from `other`
    ///
    /// Used to let form body values win over query string values.
    pub fn or(self, other: CertRequest) -> CertRequest {
        CertRequest {
            text: self.text.or(other.text),
            user_name: self.user_name.or(other.user_name),
        }
    }

    /// Split the request into the `(user, domain)` pair used for issuing
    pub fn identity(&self, extractor: &DomainExtractor) -> (String, String) {
        (
            self.user_name.clone().unwrap_or_default(),
            extractor.extract(self.text.as_deref().unwrap_or_default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DomainExtractor {
        DomainExtractor::new(DEFAULT_FALLBACK_DOMAIN).unwrap()
    }

    #[test]
    fn test_extract_link_markup() {
        assert_eq!(
            extractor().extract("<http://example.com|example.com>"),
            "example.com"
        );
        assert_eq!(
            extractor().extract("please sign <http://api.example.org|api.example.org> thanks"),
            "api.example.org"
        );
    }

    #[test]
    fn test_capture_is_greedy() {
        assert_eq!(
            extractor().extract("<http://a.com|a.com> and <http://b.com|b.com>"),
            "a.com|a.com> and <http://b.com"
        );
    }

    #[test]
    fn test_fallback_domain() {
        assert_eq!(extractor().extract(""), "certs.hshrckt.com");
        assert_eq!(extractor().extract("example.com"), "certs.hshrckt.com");
        assert_eq!(
            extractor().extract("<https://example.com|example.com>"),
            "certs.hshrckt.com"
        );

        let custom = DomainExtractor::new("fallback.test").unwrap();
        assert_eq!(custom.extract("nothing here"), "fallback.test");
        assert_eq!(custom.fallback(), "fallback.test");
    }

    #[test]
    fn test_identity() {
        let request = CertRequest {
            text: Some("<http://example.com|example.com>".to_string()),
            user_name: Some("alice".to_string()),
        };
        assert_eq!(
            request.identity(&extractor()),
            ("alice".to_string(), "example.com".to_string())
        );

        let empty = CertRequest::default();
        assert_eq!(
            empty.identity(&extractor()),
            (String::new(), "certs.hshrckt.com".to_string())
        );
    }

    #[test]
    fn test_body_fields_win_over_query() {
        let body = CertRequest {
            text: Some("<http://body.example|body>".to_string()),
            user_name: None,
        };
        let query = CertRequest {
            text: Some("<http://query.example|query>".to_string()),
            user_name: Some("erin".to_string()),
        };
        assert_eq!(
            body.or(query).identity(&extractor()),
            ("erin".to_string(), "body.example".to_string())
        );
    }
}
