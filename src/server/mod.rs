pub mod handler;
pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use handler::{handler, Handler};
pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, query_params, Malformed, Request};
pub use response::Response;
pub use service::{health_endpoint, AppService};
