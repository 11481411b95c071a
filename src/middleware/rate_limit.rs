// src/middleware/rate_limit.rs - Per-IP admission gate
use std::rc::Rc;
use std::time::Duration;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::debug;
use serde_json::json;

use crate::limiter::RateLimiter;

/// Fixed admission policy: 100 requests per minute per client IP
pub const REQUESTS_PER_MINUTE: u32 = 100;
pub const REFILL_INTERVAL: Duration = Duration::from_secs(60);

/// Middleware that gates every request through the rate limiter.
///
/// Rejected requests are answered with 429 and a fixed JSON body; the
/// downstream handler is never invoked for them.
pub struct RateLimit {
    limiter: RateLimiter,
}

impl RateLimit {
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        })
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = client_key(&req);

        if self.limiter.admit(&key) {
            let fut = self.service.call(req);
            Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
        } else {
            debug!("Rate limit exceeded for client '{}'", key);

            let response = HttpResponse::TooManyRequests().json(json!({
                "error": "Too many requests. Limit: 100 requests per minute per IP."
            }));

            Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
        }
    }
}

/// Derives the rate-limit key for a request: the first entry of the
/// `X-Forwarded-For` header when present, otherwise the peer IP.
fn client_key(req: &ServiceRequest) -> String {
    if let Some(forwarded) = req.headers().get("X-Forwarded-For") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                return first.trim().to_string();
            }
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn counted(hits: web::Data<Arc<AtomicUsize>>) -> HttpResponse {
        hits.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().body("ok")
    }

    // Capacity-1 limiter makes rejection observable on the second request
    macro_rules! gated_app {
        ($hits:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($hits.clone()))
                    .wrap(RateLimit::new(RateLimiter::new(
                        1,
                        Duration::from_secs(60),
                    )))
                    .route("/", web::get().to(counted)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn admits_within_limit_and_rejects_beyond() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = gated_app!(hits);

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 429);

        let body = test::read_body(res).await;
        assert_eq!(
            body,
            r#"{"error":"Too many requests. Limit: 100 requests per minute per IP."}"#.as_bytes()
        );

        // The rejected request never reached the handler
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn distinct_clients_are_limited_independently() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = gated_app!(hits);

        for ip in ["198.51.100.1", "198.51.100.2"] {
            let req = test::TestRequest::get()
                .uri("/")
                .insert_header(("X-Forwarded-For", ip))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), 200, "first request for {} must pass", ip);
        }
    }

    #[actix_web::test]
    async fn forwarded_for_uses_first_entry_only() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = gated_app!(hits);

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Forwarded-For", "192.0.2.1, 10.0.0.1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200);

        // Same client behind a different proxy chain shares the bucket
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Forwarded-For", "192.0.2.1, 10.9.9.9"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 429);
    }
}
