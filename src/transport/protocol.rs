/// Wire types for the JSON line protocol
///
/// One request object per input line, one response object per output line.

use crate::config::Config;
use crate::core::SearchQuery;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// A search request
///
/// Missing and `null` fields both mean "use the default".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub case_sensitive: bool,
    /// Falls back to the configured default when missing
    #[serde(default)]
    pub max_results: Option<i64>,
}

impl Request {
    /// Turn this into an engine query. Negative budgets become zero.
    pub fn to_query(&self, config: &Config) -> SearchQuery {
        let max_results = match self.max_results {
            Some(n) => usize::try_from(n).unwrap_or(0),
            None => config.max_results,
        };

        SearchQuery {
            text: self.query.clone(),
            case_sensitive: self.case_sensitive,
            max_results,
        }
    }
}

/// A search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub query: String,
    pub results: Vec<String>,
    /// Search time in nanoseconds
    #[serde(serialize_with = "serialize_nanos")]
    pub elapsed: Duration,
}

/// Written instead of a `Response` when a request line can't be decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn serialize_nanos<S>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
    serializer.serialize_u64(nanos)
}
