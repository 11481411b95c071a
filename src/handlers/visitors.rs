use actix_web::{cookie::time::Duration as CookieDuration, cookie::Cookie, web, HttpRequest, HttpResponse, Responder};
use log::debug;
use uuid::Uuid;

use crate::{models::VisitorStats, services::VisitorService, types::Result};

pub const VISITOR_COOKIE: &str = "visitor_id";

const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Report visit counters, bumping them as a side effect.
///
/// Every call counts as a visit. A caller without the `visitor_id` cookie
/// additionally counts as a unique visitor and gets the cookie set.
pub async fn visitor_stats_handler(
    req: HttpRequest,
    service: web::Data<VisitorService>,
) -> Result<impl Responder> {
    service.increment_total();

    let is_new_visitor = req.cookie(VISITOR_COOKIE).is_none();

    let mut response = HttpResponse::Ok();
    if is_new_visitor {
        service.increment_unique();

        let visitor_id = Uuid::new_v4().to_string();
        debug!("New visitor, issuing id {}", visitor_id);

        response.cookie(
            Cookie::build(VISITOR_COOKIE, visitor_id)
                .path("/")
                .max_age(CookieDuration::days(COOKIE_MAX_AGE_DAYS))
                .finish(),
        );
    }

    Ok(response.json(VisitorStats {
        total_visits: service.total_visits(),
        unique_visitors: service.unique_visitors(),
        is_new_visitor,
    }))
}
