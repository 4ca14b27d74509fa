//! Session Greetings
//!
//! Deterministic opening messages shown before the first user turn. Each
//! agent has a variant for "course selected" and "no course selected"; the
//! collaborative session greets with a system-role message. No I/O and no
//! failure mode here.

use crate::course::Course;
use crate::gateway::AgentKind;
use crate::message::Role;

/// The role and content of a session's first message.
#[derive(Debug, Clone, PartialEq)]
pub struct Greeting {
    pub role: Role,
    pub content: String,
}

/// Greeting for a single-agent session.
pub fn agent_greeting(agent: AgentKind, course: Option<&Course>) -> Greeting {
    let content = match (agent, course) {
        (AgentKind::Professor, Some(course)) => format!(
            "Hello! I'm your economics professor. I see you're interested in \"{}\". \
             What would you like to learn about?",
            course.title
        ),
        (AgentKind::Professor, None) => "Hello! I'm your economics professor. Ask me anything \
             about economic concepts, and I'll explain them clearly with examples."
            .to_string(),
        (AgentKind::Coach, Some(course)) => format!(
            "Hey there! I'm your economics coach. Ready to practice \"{}\" with some exercises? \
             Let's get started!",
            course.title
        ),
        (AgentKind::Coach, None) => "Hey! I'm your economics coach. Let's practice with \
             exercises, case studies, and practical applications. What topic do you want to \
             work on?"
            .to_string(),
    };

    let role = match agent {
        AgentKind::Professor => Role::Professor,
        AgentKind::Coach => Role::Coach,
    };
    Greeting { role, content }
}

/// Greeting for a collaborative session.
pub fn collaborative_greeting(course: Option<&Course>) -> Greeting {
    let content = match course {
        Some(course) => format!(
            "Let's start a collaborative session on \"{}\". Ask a question to get an \
             explanation from the Professor, followed by an exercise from the Coach.",
            course.title
        ),
        None => "Welcome to the Collaborative Session! Select a course and ask a question \
             to begin."
            .to_string(),
    };
    Greeting {
        role: Role::System,
        content,
    }
}
