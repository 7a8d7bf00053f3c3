pub mod http_client;
pub mod service;
pub mod wire;

pub use http_client::{AgentHttpError, AgentHttpErrorKind, HttpClient};
pub use service::HttpAgentService;
