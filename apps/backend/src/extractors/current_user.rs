use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};

use crate::auth::jwt::Claims;
use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::users::{self, User};
use crate::state::app_state::AppState;

/// The authenticated user, resolved from the JWT `sub` stored in request
/// extensions by `JwtExtract`.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub sub: String,
    pub login: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            sub: user.sub,
            login: user.login,
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<Claims>()
                .cloned()
                .ok_or_else(AppError::unauthorized)?;

            let app_state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                AppError::internal(ErrorCode::Internal, "AppState not available")
            })?;
            let db = require_db(app_state)?;

            let user = users::find_user_by_sub(db, &claims.sub)
                .await?
                .ok_or_else(AppError::forbidden_user_not_found)?;

            Ok(user.into())
        })
    }
}
