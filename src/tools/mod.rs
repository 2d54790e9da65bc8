// Tools module - JSON-RPC facade exposing ticket operations to agents

pub mod catalog;
pub mod http;
pub mod rpc;
pub mod stdio;

pub use rpc::ToolServer;
