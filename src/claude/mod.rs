// Claude Messages API: wire types and HTTP client

pub mod client;
pub mod types;

pub use client::{ClaudeClient, ClientError, DEFAULT_BASE_URL};
pub use types::{ContentBlock, Message, MessageRequest, MessageResponse};
