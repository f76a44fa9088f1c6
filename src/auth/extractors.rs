use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::UserRole;

/// The identity `AuthMiddleware` resolved from the bearer credential.
///
/// Inserted into request extensions by the middleware; handlers receive it
/// through the extractors below. If it is missing (the middleware did not run
/// or did not insert it), extraction fails with 401.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentUser {
    pub id: i32,
    pub role: UserRole,
}

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().copied() {
            Some(user) => ready(Ok(user)),
            None => {
                let err = AppError::Unauthorized(
                    "No authenticated user in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

/// The optional admin gate, declared per-route by taking this extractor.
///
/// Runs only after the base gate succeeded: a missing identity is still a
/// 401, an attached identity without the admin role is a 403.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub CurrentUser);

impl FromRequest for AdminUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>().copied() {
            Some(user) if user.role.is_admin() => ready(Ok(AdminUser(user))),
            Some(_) => {
                let err = AppError::Forbidden("Admin role required".to_string());
                ready(Err(err.into()))
            }
            None => {
                let err = AppError::Unauthorized(
                    "No authenticated user in request. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_current_user_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(CurrentUser {
            id: 123,
            role: UserRole::User,
        });

        let mut payload = Payload::None;
        let extracted = CurrentUser::from_request(&req, &mut payload).await;
        assert!(extracted.is_ok());
        assert_eq!(extracted.unwrap().id, 123);
    }

    #[actix_rt::test]
    async fn test_current_user_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();
        // Nothing inserted into extensions

        let mut payload = Payload::None;
        let result = CurrentUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_admin_extractor_accepts_admin() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(CurrentUser {
            id: 1,
            role: UserRole::Admin,
        });

        let mut payload = Payload::None;
        let extracted = AdminUser::from_request(&req, &mut payload).await;
        assert!(extracted.is_ok());
        assert_eq!(extracted.unwrap().0.id, 1);
    }

    #[actix_rt::test]
    async fn test_admin_extractor_rejects_non_admin_with_403() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(CurrentUser {
            id: 2,
            role: UserRole::User,
        });

        let mut payload = Payload::None;
        let result = AdminUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_rt::test]
    async fn test_admin_extractor_without_identity_is_401() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = AdminUser::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
