//! Authentication and authorization module

pub mod clock;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use jwt::{Claims, TokenCodec, TokenError};
pub use middleware::{access_guard_middleware, extract_token, AccessGuard, Identity, RoutePattern};
pub use password::PasswordHasher;
