use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use sqlx::PgPool;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use crate::db::users::find_user_by_id;
use crate::errors::AppError;
use crate::middleware::auth::validate_jwt_from_request;

pub struct AdminMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AdminMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let claims = match validate_jwt_from_request(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };

        if !claims.is_admin() {
            tracing::warn!("Non-admin user attempted admin access: {} (role: {})", claims.username, claims.role);
            return Box::pin(async move {
                Err(AppError::Forbidden("Insufficient privileges".to_string()).into())
            });
        }

        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        // The token may predate a demotion, so the stored role has the final say
        Box::pin(async move {
            let pool = pool.ok_or_else(|| AppError::Internal("Database pool not configured".to_string()))?;
            let user = find_user_by_id(&pool, claims.user_id()?)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

            if !user.is_admin() {
                tracing::warn!("Revoked admin attempted admin access: {} (role: {})", user.username, user.role);
                return Err(AppError::Forbidden("Insufficient privileges".to_string()).into());
            }

            req.extensions_mut().insert(claims);
            let res = service.call(req).await?;
            Ok(res)
        })
    }
}
