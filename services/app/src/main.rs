//! EconTutor Terminal Front-End
//!
//! A thin interactive wrapper around `econtutor-core`. It owns the pieces
//! that outlive individual chat sessions (the gateway, the catalog client,
//! and the cross-session course memory), renders message logs as they grow,
//! and maps slash commands to navigation between agent views. All
//! conversation semantics live in the core crate.

mod config;

use anyhow::Context;
use clap::Parser;
use config::Config;
use econtutor_core::{
    AgentKind, AgentSession, CollaborativeSession, Course, CourseCatalog, CourseMemory,
    HttpGateway, Message, MessageLog, Role,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "econtutor", about = "Chat with the EconTutor Professor and Coach agents")]
struct Cli {
    /// Course id to open before the first session.
    #[arg(long)]
    course: Option<String>,
}

/// The currently active agent view. Navigating to another view discards
/// this one; only the course memory survives the switch.
enum ActiveSession {
    Single(AgentSession),
    Collaborative(CollaborativeSession),
}

impl ActiveSession {
    fn log(&self) -> &MessageLog {
        match self {
            ActiveSession::Single(session) => session.log(),
            ActiveSession::Collaborative(session) => session.log(),
        }
    }

    fn set_input(&mut self, text: &str) {
        match self {
            ActiveSession::Single(session) => session.set_input(text),
            ActiveSession::Collaborative(session) => session.set_input(text),
        }
    }

    async fn submit(&mut self, gateway: &HttpGateway, memory: &CourseMemory) {
        match self {
            ActiveSession::Single(session) => session.submit(gateway, memory).await,
            ActiveSession::Collaborative(session) => session.submit(gateway).await,
        }
    }
}

fn speaker_label(role: Role) -> &'static str {
    match role {
        Role::User => "👤 You",
        Role::Professor => "🎓 Professor",
        Role::Coach => "💪 Coach",
        Role::System => "🤖 System",
        Role::Error => "⚠️ Error",
    }
}

/// Prints every message appended since the last render and advances the
/// render cursor.
fn render_new_messages(log: &MessageLog, rendered: &mut usize) {
    for message in &log.messages()[*rendered..] {
        render_message(message);
    }
    *rendered = log.len();
}

fn render_message(message: &Message) {
    println!("\n{}:\n{}", speaker_label(message.role), message.content);
}

fn print_help() {
    println!(
        "\nCommands:\n  \
         /courses          list available courses\n  \
         /open <id>        open a course for reading\n  \
         /professor        chat with the Professor\n  \
         /coach            chat with the Coach\n  \
         /collab           collaborative session with both agents\n  \
         /help             show this help\n  \
         /quit             exit\n\n\
         Anything else is sent to the active agent."
    );
}

async fn list_courses(catalog: &CourseCatalog) {
    match catalog.list().await {
        Ok(courses) => {
            println!("\nAvailable courses:");
            for course in courses {
                println!("  {:<24} {}", course.id, course.title);
            }
        }
        Err(e) => println!("\nCould not load the course list: {e}"),
    }
}

async fn open_course(catalog: &CourseCatalog, memory: &mut CourseMemory, id: &str) -> Course {
    let course = catalog.fetch(id).await;
    memory.record(course.clone());
    println!("\n=== {} ===\n{}", course.title, course.content);
    course
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    // Log to stderr so tracing output does not interleave with the chat.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();
    info!(api_base_url = %config.api_base_url, "Starting EconTutor client");

    let gateway = HttpGateway::new(&config.api_base_url);
    let catalog = CourseCatalog::new(&config.api_base_url);
    let mut memory = CourseMemory::new();
    let mut selected: Option<Course> = None;

    if let Some(id) = &cli.course {
        let course = open_course(&catalog, &mut memory, id).await;
        selected = Some(course);
    }

    println!("💡 EconTutor");
    print_help();

    let mut session = ActiveSession::Single(AgentSession::new(
        AgentKind::Professor,
        selected.clone(),
    ));
    let mut rendered = 0;
    render_new_messages(session.log(), &mut rendered);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("\n> ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.split_once(' ').map_or((line.as_str(), ""), |(c, r)| (c, r.trim())) {
            ("/quit", _) | ("/exit", _) => break,
            ("/help", _) => print_help(),
            ("/courses", _) => list_courses(&catalog).await,
            ("/open", "") => println!("Usage: /open <course-id>"),
            ("/open", id) => {
                selected = Some(open_course(&catalog, &mut memory, id).await);
            }
            ("/professor", _) => {
                session = ActiveSession::Single(AgentSession::new(
                    AgentKind::Professor,
                    selected.clone(),
                ));
                rendered = 0;
                render_new_messages(session.log(), &mut rendered);
            }
            ("/coach", _) => {
                session = ActiveSession::Single(AgentSession::new(
                    AgentKind::Coach,
                    selected.clone(),
                ));
                rendered = 0;
                render_new_messages(session.log(), &mut rendered);
            }
            ("/collab", _) => {
                session = ActiveSession::Collaborative(CollaborativeSession::new(
                    selected.clone(),
                ));
                rendered = 0;
                render_new_messages(session.log(), &mut rendered);
            }
            (text, _) if text.starts_with('/') => {
                println!("Unknown command: {text} (try /help)");
            }
            _ => {
                session.set_input(&line);
                session.submit(&gateway, &memory).await;
                if matches!(&session, ActiveSession::Collaborative(s) if s.course().is_none()) {
                    println!("Select a course first with /open <id>.");
                }
                render_new_messages(session.log(), &mut rendered);
            }
        }
        print!("\n> ");
        std::io::stdout().flush()?;
    }

    info!("EconTutor client exiting");
    Ok(())
}
