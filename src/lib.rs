//! Core library for `ucuptest`, a small HTTP API testing helper.
//!
//! [`RequestClient`] issues requests against a base URL, carries cookies
//! between calls, runs request/response interceptors, optionally checks
//! response bodies against a [`Schema`](schema::Schema), and keeps a
//! pass/fail log that [`RequestClient::run_tests`] prints as a report.
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod results;
pub mod schema;

pub use config::{ClientConfig, load_config};
pub use error::{ClientError, ClientResult};
pub use http::{
    ApiResponse, Dispatch, HttpMethod, OutgoingRequest, Payload, RequestClient, RequestOptions,
    RequestSpec, ResponseBody,
};
pub use results::{TestRecord, TestResults, TestStatus};
