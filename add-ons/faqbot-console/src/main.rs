//! Terminal front door for the FAQ bot.
//!
//! One conversation per process. `:grades <five scores>` runs the grade calculator
//! without touching the conversation; everything else is a chat turn.

use faqbot_core::{evaluate_grades, BotConfig, Chatbot, SessionController};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const GRADES_COMMAND: &str = ":grades";
const GREETING: &str = "Hi! I'm a chatbot. Type a question, or 'quit' to leave.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Exit,
}

/// Handles one input line and returns the bot's reply.
fn handle_line(bot: &mut Chatbot, session: &mut SessionController, line: &str) -> (String, Step) {
    if let Some(rest) = line.trim_start().strip_prefix(GRADES_COMMAND) {
        let reply = match evaluate_grades(rest) {
            Ok(report) => report.to_string(),
            Err(e) => e.to_string(),
        };
        return (reply, Step::Continue);
    }

    let response = session.submit_utterance(bot, line);
    let step = if response.ended { Step::Exit } else { Step::Continue };
    (response.answer, step)
}

/// Adds a non-blank line to the editor history.
fn remember(editor: &mut DefaultEditor, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if let Err(e) = editor.add_history_entry(line) {
        tracing::debug!(target: "faqbot::console", error = %e, "History entry not recorded");
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = BotConfig::load()?;
    let mut bot = Chatbot::from_config(&config)?;
    let mut session = SessionController::new();
    let mut editor = DefaultEditor::new()?;

    println!("{}", config.app_name);
    println!("Bot: {}", GREETING);

    loop {
        match editor.readline("You: ") {
            Ok(line) => {
                remember(&mut editor, &line);
                let (reply, step) = handle_line(&mut bot, &mut session, &line);
                println!("Bot: {}", reply);
                if step == Step::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Bot: Goodbye!");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[faqbot-console] .env not loaded: {} (using system environment)", e);
    }

    // Logs go to stderr so they do not interleave with the conversation on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        tracing::error!(target: "faqbot::console", error = %e, "Console stopped");
        eprintln!("faqbot-console: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqbot_core::{InMemoryPersistence, KnowledgeBase, KnowledgeStore, Lexicon, Matcher, QaPair, Reply, WordList};

    fn bot_with(persistence: InMemoryPersistence) -> Chatbot {
        let store = KnowledgeStore::open(persistence).unwrap();
        let lexicon = Lexicon::new(WordList::from_words(["darn"]), WordList::default());
        Chatbot::new(store, lexicon, Matcher::default())
    }

    fn seeded() -> InMemoryPersistence {
        InMemoryPersistence::with_base(KnowledgeBase::from_pairs(vec![QaPair::new(
            "What is Rust?",
            "A systems programming language.",
        )]))
    }

    #[test]
    fn test_known_question_is_answered() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();
        let (reply, step) = handle_line(&mut bot, &mut session, "what is rust");
        assert_eq!(reply, "A systems programming language.");
        assert_eq!(step, Step::Continue);
    }

    #[test]
    fn test_teach_then_recall() {
        let persistence = seeded();
        let mut bot = bot_with(persistence.clone());
        let mut session = SessionController::new();

        let (reply, _) = handle_line(&mut bot, &mut session, "Where do penguins live?");
        assert_eq!(reply, Reply::TeachMe.to_string());
        let (reply, _) = handle_line(&mut bot, &mut session, "Mostly in Antarctica.");
        assert_eq!(reply, Reply::Learned.to_string());
        assert_eq!(persistence.save_count(), 1);

        let (reply, _) = handle_line(&mut bot, &mut session, "where do penguins live");
        assert_eq!(reply, "Mostly in Antarctica.");
    }

    #[test]
    fn test_quit_exits() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();
        let (reply, step) = handle_line(&mut bot, &mut session, "  QUIT ");
        assert_eq!(reply, "Goodbye!");
        assert_eq!(step, Step::Exit);
    }

    #[test]
    fn test_grades_command_leaves_learning_untouched() {
        let persistence = seeded();
        let mut bot = bot_with(persistence.clone());
        let mut session = SessionController::new();

        handle_line(&mut bot, &mut session, "Where do penguins live?");
        let (reply, step) = handle_line(&mut bot, &mut session, ":grades 20 20 20 20 20");
        assert!(reply.contains("20.00"));
        assert!(reply.contains("passed"));
        assert_eq!(step, Step::Continue);
        assert_eq!(persistence.save_count(), 0);

        // Still waiting for the penguin answer.
        let (reply, _) = handle_line(&mut bot, &mut session, "Antarctica");
        assert_eq!(reply, Reply::Learned.to_string());
    }

    #[test]
    fn test_grades_command_reports_bad_input() {
        let mut bot = bot_with(seeded());
        let mut session = SessionController::new();
        let (reply, _) = handle_line(&mut bot, &mut session, ":grades 1 2 x 4 5");
        assert!(!reply.is_empty());
        let (reply, _) = handle_line(&mut bot, &mut session, ":grades 1 2 3");
        assert!(reply.contains("exactly 5"));
    }

    #[test]
    fn test_remember_skips_blank_lines() {
        use rustyline::history::History;

        let mut editor = DefaultEditor::new().unwrap();
        remember(&mut editor, "   ");
        assert_eq!(editor.history().len(), 0);
        remember(&mut editor, "What is Rust?");
        assert_eq!(editor.history().len(), 1);
    }
}
