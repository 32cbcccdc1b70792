//! Request dispatch and the testing client built on top of it.
mod batch;
mod cancel;
mod client;
mod cookies;
mod dispatch;
mod interceptor;
mod request;
mod response;
mod state;
mod transfer;
mod verbs;


pub use client::RequestClient;
pub use interceptor::{RequestInterceptor, ResponseInterceptor};
pub use request::{HttpMethod, OutgoingRequest, Payload, RequestOptions, RequestSpec};
pub use response::{ApiResponse, Dispatch, ResponseBody};
