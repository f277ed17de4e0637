pub mod jwt_extract;
pub mod request_trace;

pub use jwt_extract::JwtExtract;
pub use request_trace::RequestTrace;
