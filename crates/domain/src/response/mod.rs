//! HTTP Response domain types

mod spec;

pub(crate) use spec::duration_millis;
pub use spec::{CapturedResponse, ResponseBody};
