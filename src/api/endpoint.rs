//! Endpoint catalogue of the dashboard API

use crate::consts::cli_consts::search::MAX_QUERY_LEN;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Period {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    #[default]
    Likes,
    Shares,
    Comments,
}

fn default_limit() -> u32 {
    10
}

fn default_hours() -> u32 {
    24
}

/// One request the dashboard knows how to make. Filters such as period and
/// metric live here so they survive every refresh of the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    Trending {
        #[serde(default = "default_limit")]
        limit: u32,
        #[serde(default = "default_hours")]
        hours: u32,
    },
    TrendingArticles,
    Search {
        query: String,
    },
    EngagementSummary {
        #[serde(default)]
        period: Period,
    },
    TopEngagedTopics {
        #[serde(default)]
        period: Period,
        #[serde(default)]
        metric: Metric,
        #[serde(default = "default_limit")]
        limit: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
    Recommendations {
        #[serde(default = "default_limit")]
        limit: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_confidence: Option<f64>,
    },
    RecommendationsBySource {
        source: String,
        #[serde(default = "default_limit")]
        limit: u32,
    },
    SchedulerStatus,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Concrete HTTP request for an endpoint, relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    fn optional_param(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }
}

impl Endpoint {
    pub fn request(&self) -> ApiRequest {
        match self {
            Endpoint::Trending { limit, hours } => ApiRequest::get("/api/trending")
                .param("limit", limit)
                .param("hours", hours),
            Endpoint::TrendingArticles => ApiRequest::get("/api/trending/articles"),
            Endpoint::Search { query } => ApiRequest {
                method: Method::Post,
                path: "/api/search".to_string(),
                query: Vec::new(),
                body: Some(json!({ "query": query.trim() })),
            },
            Endpoint::EngagementSummary { period } => {
                ApiRequest::get("/api/engagement/summary").param("period", period)
            }
            Endpoint::TopEngagedTopics {
                period,
                metric,
                limit,
                category,
            } => ApiRequest::get("/api/engagement/topics/top")
                .param("period", period)
                .param("metric", metric)
                .param("limit", limit)
                .optional_param("category", category.as_ref()),
            Endpoint::Recommendations {
                limit,
                category,
                min_confidence,
            } => ApiRequest::get("/api/recommendations")
                .param("limit", limit)
                .optional_param("category", category.as_ref())
                .optional_param("min_confidence", *min_confidence),
            Endpoint::RecommendationsBySource { source, limit } => ApiRequest::get(format!(
                "/api/recommendations/sources/{}",
                urlencoding::encode(source)
            ))
            .param("limit", limit),
            Endpoint::SchedulerStatus => ApiRequest::get("/api/scheduler/status"),
        }
    }

    /// Checks parameters the server would reject anyway.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Endpoint::Search { query } => validate_search_query(query),
            Endpoint::RecommendationsBySource { source, limit } => {
                if source.is_empty()
                    || !source
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                {
                    return Err(format!("invalid recommendation source '{}'", source));
                }
                if !(1..=50).contains(limit) {
                    return Err(format!("limit {} is outside 1..=50", limit));
                }
                Ok(())
            }
            Endpoint::Recommendations {
                min_confidence: Some(confidence),
                ..
            } if !(0.0..=1.0).contains(confidence) => {
                Err(format!("min_confidence {} is outside 0..=1", confidence))
            }
            _ => Ok(()),
        }
    }
}

/// Search queries are plain text: letters, digits, whitespace and `-_.,!?`.
pub fn validate_search_query(query: &str) -> Result<(), String> {
    let query = query.trim();
    if query.is_empty() {
        return Err("search query is required".to_string());
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(format!(
            "search query is longer than {} characters",
            MAX_QUERY_LEN
        ));
    }
    if let Some(bad) = query
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || c.is_whitespace() || "-_.,!?".contains(*c)))
    {
        return Err(format!("search query contains invalid character '{}'", bad));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_request_carries_limit_and_hours() {
        let request = Endpoint::Trending {
            limit: 5,
            hours: 48,
        }
        .request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/api/trending");
        assert_eq!(
            request.query,
            vec![("limit", "5".to_string()), ("hours", "48".to_string())]
        );
    }

    #[test]
    fn test_search_is_a_json_post() {
        let request = Endpoint::Search {
            query: "  rust async  ".to_string(),
        }
        .request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(json!({ "query": "rust async" })));
    }

    #[test]
    fn test_top_engaged_topics_keeps_selected_filters() {
        let request = Endpoint::TopEngagedTopics {
            period: Period::Monthly,
            metric: Metric::Shares,
            limit: 3,
            category: None,
        }
        .request();
        assert_eq!(
            request.query,
            vec![
                ("period", "monthly".to_string()),
                ("metric", "shares".to_string()),
                ("limit", "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_source_path_segment_is_encoded() {
        let request = Endpoint::RecommendationsBySource {
            source: "open ai".to_string(),
            limit: 10,
        }
        .request();
        assert_eq!(request.path, "/api/recommendations/sources/open%20ai");
    }

    #[test]
    fn test_endpoint_deserializes_with_defaults() {
        let endpoint: Endpoint =
            serde_json::from_value(json!({ "kind": "engagement_summary" })).unwrap();
        assert_eq!(
            endpoint,
            Endpoint::EngagementSummary {
                period: Period::Daily
            }
        );

        let endpoint: Endpoint = serde_json::from_value(json!({
            "kind": "recommendations",
            "min_confidence": 0.7
        }))
        .unwrap();
        assert_eq!(
            endpoint.request().query,
            vec![
                ("limit", "10".to_string()),
                ("min_confidence", "0.7".to_string())
            ]
        );
    }

    #[test]
    fn test_search_query_validation() {
        assert!(validate_search_query("latest AI news!").is_ok());
        assert!(validate_search_query("   ").is_err());
        assert!(validate_search_query("<script>").is_err());
        assert!(validate_search_query(&"a".repeat(201)).is_err());
    }

    #[test]
    fn test_source_validation() {
        let bad = Endpoint::RecommendationsBySource {
            source: "../etc".to_string(),
            limit: 10,
        };
        assert!(bad.validate().is_err());

        let good = Endpoint::RecommendationsBySource {
            source: "gemini".to_string(),
            limit: 10,
        };
        assert!(good.validate().is_ok());
    }
}
