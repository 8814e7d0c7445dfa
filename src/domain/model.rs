use crate::utils::error::{PoiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Results requested per page; also the provider's maximum for `extensions=all`.
pub const PAGE_SIZE: usize = 20;

/// Status value the provider uses for a successful query.
pub const STATUS_OK: &str = "1";

/// A POI object exactly as the provider returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPoiRecord {
    pub data: Map<String, Value>,
}

impl RawPoiRecord {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Text form of a field; missing keys and `null` yield an empty string.
    pub fn text(&self, key: &str) -> String {
        self.data.get(key).map(value_to_text).unwrap_or_default()
    }
}

impl From<Value> for RawPoiRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(data) => Self { data },
            _ => Self::default(),
        }
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // 高德對空欄位會回傳 []
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(";"),
        Value::Object(_) => value.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPoiRecord {
    pub name: String,
    pub longitude: String,
    pub latitude: String,
    #[serde(rename = "type")]
    pub poi_type: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub address: String,
}

impl NormalizedPoiRecord {
    pub const HEADERS: [&'static str; 8] = [
        "名称",
        "经度",
        "纬度",
        "类型",
        "省份",
        "城市",
        "区县",
        "详细地址",
    ];

    /// Field values in header order.
    pub fn fields(&self) -> [&str; 8] {
        [
            self.name.as_str(),
            self.longitude.as_str(),
            self.latitude.as_str(),
            self.poi_type.as_str(),
            self.province.as_str(),
            self.city.as_str(),
            self.district.as_str(),
            self.address.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub keywords: String,
    pub city: String,
    pub page: u32,
}

impl QueryRequest {
    pub fn new(keywords: &str, city: &str, page: u32) -> Self {
        Self {
            keywords: keywords.to_string(),
            city: city.to_string(),
            page,
        }
    }

    pub fn query_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("key", api_key.to_string()),
            ("keywords", self.keywords.clone()),
            ("city", self.city.clone()),
            ("offset", PAGE_SIZE.to_string()),
            ("page", self.page.to_string()),
            ("extensions", "all".to_string()),
        ]
    }
}

/// Top-level object of one search response, kept unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    body: Map<String, Value>,
}

impl ResultPage {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            other => Err(PoiError::MalformedResponse {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// The response object exactly as the service returned it.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(Value::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(STATUS_OK)
    }

    pub fn info(&self) -> Option<&str> {
        self.body.get("info").and_then(Value::as_str)
    }

    pub fn infocode(&self) -> Option<&str> {
        self.body.get("infocode").and_then(Value::as_str)
    }

    /// Upstream total; informational only, pagination never relies on it.
    pub fn count(&self) -> Option<u64> {
        match self.body.get("count")? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn pois(&self) -> Vec<RawPoiRecord> {
        match self.body.get("pois") {
            Some(Value::Array(items)) => items.iter().cloned().map(RawPoiRecord::from).collect(),
            _ => Vec::new(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Why the pagination loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back with fewer than [`PAGE_SIZE`] results.
    LastPage { returned: usize },
    EmptyPage,
    Rejected {
        status: Option<String>,
        info: Option<String>,
    },
    TransportFailed { message: String },
    PageLimit { max_pages: u32 },
}

impl StopReason {
    /// True when the upstream result set was read to its end.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, StopReason::LastPage { .. } | StopReason::EmptyPage)
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::LastPage { returned } => write!(f, "last page ({} results)", returned),
            StopReason::EmptyPage => write!(f, "empty page"),
            StopReason::Rejected { status, info } => write!(
                f,
                "rejected by upstream (status {}, info {})",
                status.as_deref().unwrap_or("missing"),
                info.as_deref().unwrap_or("none")
            ),
            StopReason::TransportFailed { message } => write!(f, "transport failure: {}", message),
            StopReason::PageLimit { max_pages } => write!(f, "page limit {} reached", max_pages),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub records: Vec<RawPoiRecord>,
    pub pages_requested: u32,
    pub stop: StopReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: String, rows: usize },
    NothingToExport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub records_written: usize,
    pub output_path: String,
    pub pages_requested: u32,
    pub stop: StopReason,
}

/// Progress notifications sent while a download runs in the background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    PageFetched {
        page: u32,
        returned: usize,
        accumulated: usize,
    },
    FetchStopped {
        pages: u32,
        reason: StopReason,
    },
    Exported {
        path: String,
        rows: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_handles_missing_and_non_string_values() {
        let record = RawPoiRecord::from(json!({
            "name": "三里屯咖啡",
            "address": [],
            "tel": ["010-1234", "010-5678"],
            "distance": 42,
            "biz_ext": {"rating": "4.5"},
            "alias": null
        }));

        assert_eq!(record.text("name"), "三里屯咖啡");
        assert_eq!(record.text("address"), "");
        assert_eq!(record.text("tel"), "010-1234;010-5678");
        assert_eq!(record.text("distance"), "42");
        assert_eq!(record.text("biz_ext"), r#"{"rating":"4.5"}"#);
        assert_eq!(record.text("alias"), "");
        assert_eq!(record.text("missing"), "");
    }

    #[test]
    fn test_query_params_are_fixed() {
        let request = QueryRequest::new("coffee", "Beijing", 3);
        let params = request.query_params("secret");

        assert_eq!(
            params,
            vec![
                ("key", "secret".to_string()),
                ("keywords", "coffee".to_string()),
                ("city", "Beijing".to_string()),
                ("offset", "20".to_string()),
                ("page", "3".to_string()),
                ("extensions", "all".to_string()),
            ]
        );
    }

    #[test]
    fn test_result_page_accessors() {
        let page = ResultPage::from_value(json!({
            "status": "1",
            "count": "57",
            "info": "OK",
            "infocode": "10000",
            "pois": [{"name": "A"}, "not an object"]
        }))
        .unwrap();

        assert!(page.is_success());
        assert_eq!(page.count(), Some(57));
        assert_eq!(page.info(), Some("OK"));
        assert_eq!(page.infocode(), Some("10000"));

        let pois = page.pois();
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].text("name"), "A");
        assert!(pois[1].data.is_empty());
    }

    #[test]
    fn test_result_page_status_must_be_string_one() {
        let numeric = ResultPage::from_value(json!({"status": 1, "pois": []})).unwrap();
        assert!(!numeric.is_success());

        let missing = ResultPage::from_value(json!({"pois": []})).unwrap();
        assert_eq!(missing.status(), None);
        assert!(!missing.is_success());
    }

    #[test]
    fn test_result_page_rejects_non_object_body() {
        let err = ResultPage::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, PoiError::MalformedResponse { .. }));
    }

    #[test]
    fn test_headers_match_field_order() {
        let record = NormalizedPoiRecord {
            name: "n".into(),
            longitude: "lon".into(),
            latitude: "lat".into(),
            poi_type: "t".into(),
            province: "p".into(),
            city: "c".into(),
            district: "d".into(),
            address: "a".into(),
        };
        assert_eq!(
            record.fields(),
            ["n", "lon", "lat", "t", "p", "c", "d", "a"]
        );
        assert_eq!(NormalizedPoiRecord::HEADERS[0], "名称");
        assert_eq!(NormalizedPoiRecord::HEADERS[7], "详细地址");
    }
}
