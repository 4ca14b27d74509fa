//! Conversation Session Orchestrators
//!
//! A session owns one message log and drives the turn cycle: validate the
//! buffered input, append the user message, issue exactly one gateway call,
//! then merge the outcome back into the log. Two orchestrators share this
//! shape:
//!
//! - `AgentSession` talks to a single agent (professor or coach) and attaches
//!   the viewed-course titles from `CourseMemory` to every send.
//! - `CollaborativeSession` drives both agents through one request and
//!   appends their replies in fixed professor-then-coach order.
//!
//! Each turn is a small state machine: `begin_turn` raises the in-flight
//! flag and produces the request, `complete_turn` merges the outcome and
//! lowers the flag. The flag is the only admission control: while it is
//! raised, further submissions are silently ignored, so turns within one
//! session never overlap. A gateway failure is never fatal; it is recorded
//! as one error-role message and the session returns to idle.

use crate::course::{Course, CourseMemory};
use crate::gateway::{
    AgentKind, AgentReply, ChatGateway, ChatRequest, CollaborateReply, GatewayError,
};
use crate::greeting::{agent_greeting, collaborative_greeting};
use crate::message::{MessageLog, Role};
use tracing::warn;

/// Fallback shown when a single-agent send fails.
pub const AGENT_FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Fallback shown when a collaborative send fails.
pub const COLLABORATIVE_FALLBACK_REPLY: &str = "Sorry, an error occurred. Please try again.";

/// A conversation with one agent.
#[derive(Debug)]
pub struct AgentSession {
    agent: AgentKind,
    course: Option<Course>,
    log: MessageLog,
    input: String,
    sending: bool,
}

impl AgentSession {
    /// Creates a session and seeds its log with the agent's greeting.
    pub fn new(agent: AgentKind, course: Option<Course>) -> Self {
        let mut log = MessageLog::new();
        let greeting = agent_greeting(agent, course.as_ref());
        log.push(greeting.role, greeting.content);
        Self {
            agent,
            course,
            log,
            input: String::new(),
            sending: false,
        }
    }

    pub fn agent(&self) -> AgentKind {
        self.agent
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a request is currently in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Starts a turn from the buffered input.
    ///
    /// Returns `None` without touching the log when the input is blank or a
    /// turn is already in flight. Otherwise appends the user message, clears
    /// the buffer, raises the in-flight flag, and returns the request to
    /// send, carrying the course content and the viewed-course titles.
    pub fn begin_turn(&mut self, memory: &CourseMemory) -> Option<ChatRequest> {
        if self.sending || self.input.trim().is_empty() {
            return None;
        }

        let message = std::mem::take(&mut self.input);
        self.log.push(Role::User, message.clone());
        self.sending = true;

        Some(ChatRequest {
            message,
            course_context: self.course.as_ref().map(|c| c.content.clone()),
            viewed_courses_context: Some(memory.titles()),
        })
    }

    /// Finishes a turn by merging the gateway outcome into the log.
    ///
    /// Success appends the agent's reply under its own role; failure appends
    /// one error-role message with the fixed fallback text. The session is
    /// idle again afterwards either way.
    pub fn complete_turn(&mut self, outcome: Result<AgentReply, GatewayError>) {
        match outcome {
            Ok(reply) => {
                let role = match self.agent {
                    AgentKind::Professor => Role::Professor,
                    AgentKind::Coach => Role::Coach,
                };
                self.log.push(role, reply.response);
            }
            Err(e) => {
                warn!(agent = %self.agent, error = %e, "Chat request failed");
                self.log.push(Role::Error, AGENT_FALLBACK_REPLY);
            }
        }
        self.sending = false;
    }

    /// Runs one full turn: validate, send, merge.
    ///
    /// Blank input or an in-flight turn makes this a silent no-op.
    pub async fn submit(&mut self, gateway: &dyn ChatGateway, memory: &CourseMemory) {
        let Some(request) = self.begin_turn(memory) else {
            return;
        };
        let outcome = gateway.send_agent(self.agent, request).await;
        self.complete_turn(outcome);
    }
}

/// A conversation driving both agents together from one user utterance.
#[derive(Debug)]
pub struct CollaborativeSession {
    course: Option<Course>,
    log: MessageLog,
    input: String,
    sending: bool,
}

impl CollaborativeSession {
    /// Creates a session and seeds its log with the system greeting.
    pub fn new(course: Option<Course>) -> Self {
        let mut log = MessageLog::new();
        let greeting = collaborative_greeting(course.as_ref());
        log.push(greeting.role, greeting.content);
        Self {
            course,
            log,
            input: String::new(),
            sending: false,
        }
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Starts a turn from the buffered input.
    ///
    /// Collaborative turns additionally require a bound course; without one
    /// this is a no-op regardless of the input text.
    pub fn begin_turn(&mut self) -> Option<ChatRequest> {
        if self.sending || self.input.trim().is_empty() {
            return None;
        }
        let course = self.course.as_ref()?;
        let course_context = Some(course.content.clone());

        let message = std::mem::take(&mut self.input);
        self.log.push(Role::User, message.clone());
        self.sending = true;

        Some(ChatRequest {
            message,
            course_context,
            viewed_courses_context: None,
        })
    }

    /// Finishes a turn by merging the gateway outcome into the log.
    ///
    /// Success appends exactly two messages in fixed order, professor first
    /// and coach second. Consumers may rely on that ordering. Failure
    /// appends exactly one error-role message; the two halves of the pair
    /// are not reported separately.
    pub fn complete_turn(&mut self, outcome: Result<CollaborateReply, GatewayError>) {
        match outcome {
            Ok(reply) => {
                self.log.push(Role::Professor, reply.professor_response);
                self.log.push(Role::Coach, reply.coach_response);
            }
            Err(e) => {
                warn!(error = %e, "Collaborative chat request failed");
                self.log.push(Role::Error, COLLABORATIVE_FALLBACK_REPLY);
            }
        }
        self.sending = false;
    }

    /// Runs one full turn: validate, send, merge.
    pub async fn submit(&mut self, gateway: &dyn ChatGateway) {
        let Some(request) = self.begin_turn() else {
            return;
        };
        let outcome = gateway.send_collaborate(request).await;
        self.complete_turn(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockChatGateway;

    fn course(id: &str, title: &str) -> Course {
        Course {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            content: format!("Content of {title}"),
        }
    }

    fn roles(session_log: &MessageLog) -> Vec<Role> {
        session_log.messages().iter().map(|m| m.role).collect()
    }

    #[test]
    fn test_new_session_starts_with_greeting_only() {
        let session = AgentSession::new(AgentKind::Professor, None);
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().messages()[0].role, Role::Professor);
        assert!(!session.is_sending());
    }

    #[test]
    fn test_begin_turn_appends_user_message_before_any_response() {
        let memory = CourseMemory::new();
        let mut session = AgentSession::new(AgentKind::Professor, None);
        session.set_input("What is GDP?");

        let request = session.begin_turn(&memory).unwrap();

        assert_eq!(request.message, "What is GDP?");
        assert_eq!(session.log().len(), 2);
        assert_eq!(session.log().last().unwrap().role, Role::User);
        assert_eq!(session.log().last().unwrap().content, "What is GDP?");
        assert!(session.is_sending());
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_blank_input_leaves_log_unchanged() {
        let memory = CourseMemory::new();
        let mut session = AgentSession::new(AgentKind::Coach, None);

        for blank in ["", "   ", "\n\t "] {
            session.set_input(blank);
            assert!(session.begin_turn(&memory).is_none());
            assert_eq!(session.log().len(), 1);
            assert!(!session.is_sending());
        }
    }

    #[test]
    fn test_second_turn_while_sending_is_a_no_op() {
        let memory = CourseMemory::new();
        let mut session = AgentSession::new(AgentKind::Professor, None);
        session.set_input("first question");
        assert!(session.begin_turn(&memory).is_some());

        let len_before = session.log().len();
        session.set_input("second question");
        assert!(session.begin_turn(&memory).is_none());
        assert_eq!(session.log().len(), len_before);
    }

    #[test]
    fn test_request_carries_course_and_memory_context() {
        let mut memory = CourseMemory::new();
        memory.record(course("gdp-economic-growth", "GDP and Economic Growth"));
        memory.record(course("international-trade", "International Trade"));

        let mut session = AgentSession::new(
            AgentKind::Professor,
            Some(course("supply-demand", "Supply and Demand")),
        );
        session.set_input("What is elasticity?");

        let request = session.begin_turn(&memory).unwrap();
        assert_eq!(
            request.course_context.as_deref(),
            Some("Content of Supply and Demand")
        );
        assert_eq!(
            request.viewed_courses_context,
            Some(vec![
                "GDP and Economic Growth".to_string(),
                "International Trade".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_successful_turn_grows_log_by_two() {
        let memory = CourseMemory::new();
        let mut gateway = MockChatGateway::new();
        gateway.expect_send_agent().times(1).returning(|_, _| {
            Ok(AgentReply {
                response: "GDP measures total output.".to_string(),
            })
        });

        let mut session = AgentSession::new(AgentKind::Professor, None);
        session.set_input("What is GDP?");
        session.submit(&gateway, &memory).await;

        assert_eq!(
            roles(session.log()),
            vec![Role::Professor, Role::User, Role::Professor]
        );
        assert_eq!(
            session.log().last().unwrap().content,
            "GDP measures total output."
        );
        assert!(!session.is_sending());
    }

    #[tokio::test]
    async fn test_coach_reply_carries_coach_role() {
        let memory = CourseMemory::new();
        let mut gateway = MockChatGateway::new();
        gateway.expect_send_agent().returning(|_, _| {
            Ok(AgentReply {
                response: "Try this exercise.".to_string(),
            })
        });

        let mut session = AgentSession::new(AgentKind::Coach, None);
        session.set_input("Give me practice");
        session.submit(&gateway, &memory).await;

        assert_eq!(session.log().last().unwrap().role, Role::Coach);
    }

    #[tokio::test]
    async fn test_failed_turn_appends_one_fallback_error() {
        let memory = CourseMemory::new();
        let mut gateway = MockChatGateway::new();
        gateway
            .expect_send_agent()
            .times(1)
            .returning(|_, _| Err(GatewayError::Network("connection refused".to_string())));

        let mut session = AgentSession::new(
            AgentKind::Professor,
            Some(course("supply-demand", "Supply and Demand")),
        );
        session.set_input("What is elasticity?");
        session.submit(&gateway, &memory).await;

        let log = session.log().messages();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].role, Role::User);
        assert_eq!(log[1].content, "What is elasticity?");
        assert_eq!(log[2].role, Role::Error);
        assert_eq!(log[2].content, AGENT_FALLBACK_REPLY);
        assert!(!session.is_sending());
    }

    #[tokio::test]
    async fn test_session_stays_usable_after_failure() {
        let memory = CourseMemory::new();
        let mut gateway = MockChatGateway::new();
        let mut failed_once = false;
        gateway.expect_send_agent().times(2).returning(move |_, _| {
            if !failed_once {
                failed_once = true;
                Err(GatewayError::Status(500))
            } else {
                Ok(AgentReply {
                    response: "Recovered.".to_string(),
                })
            }
        });

        let mut session = AgentSession::new(AgentKind::Professor, None);
        session.set_input("first");
        session.submit(&gateway, &memory).await;
        session.set_input("second");
        session.submit(&gateway, &memory).await;

        assert_eq!(session.log().last().unwrap().content, "Recovered.");
    }

    #[tokio::test]
    async fn test_blank_submit_never_calls_gateway() {
        let memory = CourseMemory::new();
        let gateway = MockChatGateway::new();

        let mut session = AgentSession::new(AgentKind::Coach, None);
        session.set_input("   ");
        session.submit(&gateway, &memory).await;

        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_collaborative_session_requires_a_course() {
        let mut session = CollaborativeSession::new(None);
        session.set_input("Explain opportunity cost");

        assert!(session.begin_turn().is_none());
        assert_eq!(session.log().len(), 1);
        assert!(!session.is_sending());
        // The input is kept so the user can submit it after selecting a course.
        assert_eq!(session.input(), "Explain opportunity cost");
    }

    #[tokio::test]
    async fn test_collaborative_success_appends_professor_then_coach() {
        let mut gateway = MockChatGateway::new();
        gateway.expect_send_collaborate().times(1).returning(|_| {
            Ok(CollaborateReply {
                professor_response: "Opportunity cost is the value of the next best alternative."
                    .to_string(),
                coach_response: "Your turn: list two opportunity costs of studying tonight."
                    .to_string(),
            })
        });

        let mut session =
            CollaborativeSession::new(Some(course("supply-demand", "Supply and Demand")));
        session.set_input("Explain opportunity cost");
        session.submit(&gateway).await;

        let log = session.log().messages();
        assert_eq!(log.len(), 4);
        assert_eq!(log[1].role, Role::User);
        assert_eq!(log[2].role, Role::Professor);
        assert_eq!(log[3].role, Role::Coach);
        assert!(log[2].sequence < log[3].sequence);
    }

    #[tokio::test]
    async fn test_collaborative_failure_appends_single_error() {
        let mut gateway = MockChatGateway::new();
        gateway
            .expect_send_collaborate()
            .times(1)
            .returning(|_| Err(GatewayError::Decode("missing field".to_string())));

        let mut session =
            CollaborativeSession::new(Some(course("supply-demand", "Supply and Demand")));
        session.set_input("Explain opportunity cost");
        session.submit(&gateway).await;

        let log = session.log().messages();
        assert_eq!(log.len(), 3);
        assert_eq!(log[2].role, Role::Error);
        assert_eq!(log[2].content, COLLABORATIVE_FALLBACK_REPLY);
        assert!(!session.is_sending());
    }

    #[test]
    fn test_collaborative_request_omits_viewed_courses() {
        let mut session =
            CollaborativeSession::new(Some(course("supply-demand", "Supply and Demand")));
        session.set_input("Explain opportunity cost");

        let request = session.begin_turn().unwrap();
        assert!(request.viewed_courses_context.is_none());
        assert_eq!(
            request.course_context.as_deref(),
            Some("Content of Supply and Demand")
        );
    }

    #[test]
    fn test_collaborative_second_turn_while_sending_is_a_no_op() {
        let mut session =
            CollaborativeSession::new(Some(course("supply-demand", "Supply and Demand")));
        session.set_input("first");
        assert!(session.begin_turn().is_some());

        session.set_input("second");
        assert!(session.begin_turn().is_none());
        assert_eq!(session.log().len(), 2);
    }
}
