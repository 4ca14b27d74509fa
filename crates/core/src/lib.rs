//! EconTutor Core
//!
//! Conversation and multi-agent orchestration layer for the EconTutor
//! learning client. This crate owns the message history, turns user input
//! into backend chat requests, merges responses back into history in the
//! correct order, and tracks which courses the user has already reviewed.
//! Presentation (rendering, navigation) lives in the front-end service and
//! only reads the state exposed here.

pub mod catalog;
pub mod course;
pub mod gateway;
pub mod greeting;
pub mod message;
pub mod session;

pub use catalog::CourseCatalog;
pub use course::{Course, CourseMemory};
pub use gateway::{
    AgentKind, AgentReply, ChatGateway, ChatRequest, CollaborateReply, GatewayError, HttpGateway,
};
pub use greeting::{Greeting, agent_greeting, collaborative_greeting};
pub use message::{Message, MessageLog, Role};
pub use session::{
    AGENT_FALLBACK_REPLY, AgentSession, COLLABORATIVE_FALLBACK_REPLY, CollaborativeSession,
};
