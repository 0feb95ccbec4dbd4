//! Request pacing for the remote API.

mod limiter;
mod retry;

pub use limiter::RateLimiter;
pub use retry::RetryConfig;
