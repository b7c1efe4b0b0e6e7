//! Uniform `{code, msg, data}` response envelope

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Envelope code signalling success
pub const SUCCESS_CODE: u16 = 200;

/// Response wrapper crossing the HTTP boundary for every JSON endpoint
///
/// `code == 200` means `data` holds the payload. Any other code is a failure
/// and `data` is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(msg: impl Into<String>, code: u16) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Unwrap into a result, mapping a failed envelope back onto its message
    pub fn into_result(self) -> Result<T, String> {
        match (self.code, self.data) {
            (SUCCESS_CODE, Some(data)) => Ok(data),
            (_, _) => Err(self.msg),
        }
    }
}

impl<T> From<FeedError> for ApiResponse<T> {
    fn from(err: FeedError) -> Self {
        ApiResponse::error(err.to_string(), err.code())
    }
}

impl<T> From<Result<T, FeedError>> for ApiResponse<T> {
    fn from(result: Result<T, FeedError>) -> Self {
        match result {
            Ok(data) => ApiResponse::success(data),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::NewsItem;
    use serde_json::json;

    #[test]
    fn test_success_round_trip() {
        let payload = vec![NewsItem::new("1", "T", "https://x")];
        let wire = serde_json::to_string(&ApiResponse::success(payload.clone())).unwrap();
        let back: ApiResponse<Vec<NewsItem>> = serde_json::from_str(&wire).unwrap();
        assert_eq!(back.code, 200);
        assert_eq!(back.data, Some(payload));
    }

    #[test]
    fn test_error_has_null_data() {
        let resp: ApiResponse<Vec<NewsItem>> = FeedError::unknown_platform("nope").into();
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["code"], 404);
        assert_eq!(value["data"], json!(null));
        assert!(value["msg"].as_str().unwrap().contains("nope"));
        assert!(!resp.is_success());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ApiResponse::success(5).into_result(), Ok(5));
        assert_eq!(
            ApiResponse::<i32>::error("bad", 400).into_result(),
            Err("bad".to_string())
        );
    }
}
