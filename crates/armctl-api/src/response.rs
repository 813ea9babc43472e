use reqwest::StatusCode;

/// Uniform result shape for every management operation.
///
/// Successful calls carry the remote status and decoded body unchanged.
/// Failures surfaced by `armctl-core` are rendered into the same shape
/// with a synthesized status and the failure message as `reason`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse<T> {
    pub status: StatusCode,
    pub reason: String,
    /// `x-ms-request-id` from the management endpoint, when present.
    pub request_id: Option<String>,
    pub body: Option<T>,
}

impl<T> OperationResponse<T> {
    /// A response as received from the management endpoint.
    pub fn from_remote(status: StatusCode, request_id: Option<String>, body: Option<T>) -> Self {
        Self {
            status,
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            request_id,
            body,
        }
    }

    /// A synthesized failure with no body.
    pub fn failure(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            request_id: None,
            body: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }

    /// Transform the body, keeping status and correlation metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResponse<U> {
        OperationResponse {
            status: self.status,
            reason: self.reason,
            request_id: self.request_id,
            body: self.body.map(f),
        }
    }

    /// Re-type a body-less response (failures, deletes).
    pub fn without_body<U>(self) -> OperationResponse<U> {
        OperationResponse {
            status: self.status,
            reason: self.reason,
            request_id: self.request_id,
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_reason_is_canonical() {
        let resp = OperationResponse::from_remote(StatusCode::CREATED, None, Some(1));
        assert_eq!(resp.reason, "Created");
        assert!(resp.is_success());
        assert_eq!(resp.map(|n| n + 1).into_body(), Some(2));
    }

    #[test]
    fn failure_keeps_message() {
        let resp: OperationResponse<()> =
            OperationResponse::failure(StatusCode::BAD_REQUEST, "subnet address space is empty");
        assert!(!resp.is_success());
        assert_eq!(resp.reason, "subnet address space is empty");
        assert!(resp.body.is_none());
    }
}
