mod rate_limit;

pub use rate_limit::{RateLimit, REFILL_INTERVAL, REQUESTS_PER_MINUTE};
