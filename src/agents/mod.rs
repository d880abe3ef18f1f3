//! Agent runtime for Hangar
//!
//! - `llm/` - Gemini provider, wire types and the credential seam
//! - `mapper` - turns an agent, its tools and chat history into a request
//! - `sandbox` - chat sessions with one in-flight turn per session

pub mod error;
pub mod llm;
pub mod mapper;
pub mod sandbox;

pub use error::*;
pub use mapper::{build_request, map_history, map_tools, run_agent, AgentRequest};
pub use sandbox::{SandboxController, SandboxStats, SessionSnapshot, SessionState};
