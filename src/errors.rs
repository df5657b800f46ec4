use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Map a non-success HTTP status plus best-effort body text to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ClientError::Unauthorized,
            404 => ClientError::NotFound,
            _ => {
                let message = if body.is_empty() {
                    "no response body".to_string()
                } else {
                    body.chars().take(200).collect()
                };
                ClientError::Api { status, message }
            }
        }
    }

    /// Whether the error came from the network layer rather than the API.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_statuses() {
        assert!(matches!(
            ClientError::from_status(401, String::new()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            ClientError::from_status(403, String::new()),
            ClientError::Unauthorized
        ));
    }

    #[test]
    fn test_not_found_status() {
        assert!(matches!(
            ClientError::from_status(404, String::new()),
            ClientError::NotFound
        ));
    }

    #[test]
    fn test_api_error_keeps_body_prefix() {
        let err = ClientError::from_status(500, "boom".repeat(100));
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message.chars().count(), 200);
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_empty_body() {
        match ClientError::from_status(502, String::new()) {
            ClientError::Api { message, .. } => assert_eq!(message, "no response body"),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }
}
