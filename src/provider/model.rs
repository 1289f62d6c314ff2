use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

/// One posting as returned by the provider, timestamp still unparsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPosting {
    #[serde(rename = "job_title")]
    pub title: String,
    #[serde(rename = "employer_name")]
    pub employer: String,
    #[serde(rename = "job_apply_link")]
    pub apply_link: String,
    #[serde(rename = "job_posted_at_datetime_utc", default)]
    pub posted_at: Option<String>,
}

/// Top-level provider response body.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<RawPosting>,
}

/// A posting that passed the freshness filter.
#[derive(Debug, Clone)]
pub struct Posting {
    pub title: String,
    pub employer: String,
    pub apply_link: String,
    pub posted_at: DateTime<Utc>,
}

/// Per-user search parameters used to build one provider query.
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub country: String,
}

impl SearchCriteria {
    /// Keywords and location joined with `+`, the provider's expected shape.
    pub fn query_string(&self) -> String {
        let mut parts: Vec<&str> = self.keywords.iter().map(String::as_str).collect();
        if let Some(location) = self.location.as_deref() {
            parts.push(location);
        }
        parts.join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_joins_keywords_and_location() {
        let criteria = SearchCriteria {
            keywords: vec!["ai".to_string(), "internship".to_string()],
            location: Some("Berlin".to_string()),
            country: "de".to_string(),
        };
        assert_eq!(criteria.query_string(), "ai+internship+Berlin");
    }

    #[test]
    fn test_query_string_without_location() {
        let criteria = SearchCriteria {
            keywords: vec!["rust".to_string()],
            location: None,
            country: "us".to_string(),
        };
        assert_eq!(criteria.query_string(), "rust");
    }
}
