//! HTTP handler types

mod handlers;

pub use self::handlers::{Handler, HandlerResponse};
