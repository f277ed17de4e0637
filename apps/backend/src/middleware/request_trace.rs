//! Per-request trace id, span and completion log.
//!
//! Each request gets a uuid trace id which is
//! - stored in request extensions as `TraceId`,
//! - made the task-local trace context (`trace_ctx::with_trace_id`) so error
//!   responses and DB error logs can report it,
//! - attached to an `http_request` span instrumenting the handler future,
//! - echoed back in the `x-trace-id` response header.
//!
//! Errors raised by inner middleware (e.g. `JwtExtract`) are rendered here,
//! inside the trace scope, so their problem body carries the same id.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::trace_ctx;

/// Trace id of the current request, readable from extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let trace_id = Uuid::new_v4().to_string();
        let method = req.method().to_string();
        let path = req.path().to_string();

        req.extensions_mut().insert(TraceId(trace_id.clone()));

        let span = info_span!(
            "http_request",
            trace_id = %trace_id,
            method = %method,
            path = %path
        );
        let http_req = req.request().clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            let handled = async move {
                match fut.instrument(span).await {
                    Ok(res) => res.map_into_left_body(),
                    Err(err) => ServiceResponse::from_err(err, http_req).map_into_right_body(),
                }
            };
            let mut res = trace_ctx::with_trace_id(trace_id.clone(), handled).await;

            let status = res.status();
            let duration_us = start.elapsed().as_micros() as u64;
            let status_code = status.as_u16();

            if status.is_server_error() {
                error!(%method, %path, status_code, duration_us, %trace_id, "request_completed");
            } else if status.is_client_error() {
                warn!(%method, %path, status_code, duration_us, %trace_id, "request_completed");
            } else {
                info!(%method, %path, status_code, duration_us, %trace_id, "request_completed");
            }

            if let Ok(value) = HeaderValue::from_str(&trace_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static("x-trace-id"), value);
            }
            Ok(res)
        })
    }
}
