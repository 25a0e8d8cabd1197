use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header::AUTHORIZATION};

use crate::database::models::AccessTokenInput;
use crate::error::AppError;

/// Opaque access token taken from `Authorization: Bearer <token>`.
///
/// The token is only extracted here; resolving it to a user happens inside the
/// unit of work of the operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefers the header; falls back to an `access_token` request body.
    pub fn or_body(
        header: Option<BearerToken>,
        body: Option<AccessTokenInput>,
    ) -> Result<Self, AppError> {
        header
            .or_else(|| {
                body.map(|input| input.access_token)
                    .filter(|t| !t.trim().is_empty())
                    .map(BearerToken)
            })
            .ok_or(AppError::Unauthenticated)
    }
}

impl FromRequest for BearerToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        match token {
            Some(token) => ready(Ok(BearerToken(token.to_string()))),
            None => ready(Err(AppError::Unauthenticated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn extracts_bearer_tokens() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer tok-123"))
            .to_http_request();

        let token = BearerToken::extract(&req).await.unwrap();
        assert_eq!(token.as_str(), "tok-123");
    }

    #[actix_web::test]
    async fn rejects_missing_or_malformed_headers() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            BearerToken::extract(&req).await,
            Err(AppError::Unauthenticated)
        ));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic abc"))
            .to_http_request();
        assert!(matches!(
            BearerToken::extract(&req).await,
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn body_token_is_used_only_without_a_header() {
        let body = || {
            Some(AccessTokenInput {
                access_token: "tok-body".to_string(),
            })
        };

        let token = BearerToken::or_body(Some(BearerToken("tok-header".into())), body()).unwrap();
        assert_eq!(token.as_str(), "tok-header");

        let token = BearerToken::or_body(None, body()).unwrap();
        assert_eq!(token.as_str(), "tok-body");

        let blank = Some(AccessTokenInput {
            access_token: "  ".to_string(),
        });
        assert!(matches!(
            BearerToken::or_body(None, blank),
            Err(AppError::Unauthenticated)
        ));
        assert!(matches!(
            BearerToken::or_body(None, None),
            Err(AppError::Unauthenticated)
        ));
    }
}
