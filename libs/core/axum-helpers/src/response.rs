use crate::pagination::PaginationMeta;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MESSAGE_OK: &str = "Returned successfully";

/// Success envelope shared by every endpoint.
///
/// `pagination` is present only on paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            pagination: None,
            message: MESSAGE_OK.to_string(),
            data,
        }
    }

    pub fn paginated(data: T, pagination: PaginationMeta) -> Self {
        Self {
            pagination: Some(pagination),
            message: MESSAGE_OK.to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PaginationParams;

    #[test]
    fn plain_envelope_omits_pagination() {
        let envelope = ApiResponse::ok(vec![1, 2, 3]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("pagination").is_none());
        assert_eq!(json["message"], MESSAGE_OK);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn paginated_envelope_carries_meta() {
        let params = PaginationParams { page: 2, size: 5 };
        let envelope = ApiResponse::paginated(vec!["a"], PaginationMeta::new(&params, 11));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["size"], 5);
        assert_eq!(json["pagination"]["total"], 11);
    }
}
