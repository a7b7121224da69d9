mod commands;
mod completion;
mod config;
mod db;
mod errors;
mod models;
mod state;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::completion::CompletionClient;
use crate::config::Config;
use crate::models::{Question, UserProfile};
use crate::state::{Snapshot, Tab};
use crate::store::EntityStore;

#[derive(Parser)]
#[command(
    name = "upwork-helper",
    version,
    about = "Drafts Upwork job-application content: cover letter, Q&A list, personal info"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the personal info used in generation prompts
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage the cover-letter template
    Letter {
        #[command(subcommand)]
        action: LetterAction,
    },
    /// Manage the saved question/answer list
    Question {
        #[command(subcommand)]
        action: QuestionAction,
    },
    /// Show the current state of the active view
    Status,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create or replace the profile
    Set {
        #[arg(long)]
        name: String,
        #[arg(long)]
        job_title: String,
        #[arg(long)]
        years: String,
        #[arg(long)]
        skills: String,
    },
    /// Print the stored profile
    Show,
}

#[derive(Subcommand)]
enum LetterAction {
    /// Print the stored cover letter
    Show,
    /// Save the given text as the cover letter
    Save { text: String },
    /// Generate a cover letter from the profile, with optional extra requirements
    Generate { requirements: Option<String> },
    /// Delete the stored cover letter
    Delete,
}

#[derive(Subcommand)]
enum QuestionAction {
    /// Save a question with an answer you already have
    Add {
        question: String,
        #[arg(short, long, default_value = "")]
        answer: String,
    },
    /// Answer a question with AI assistance and save the pair
    Answer { question: String },
    /// Edit a saved question; omitted fields keep their current values
    Update {
        id: i64,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },
    /// List saved questions, newest first
    List,
    /// Delete the question with the given id
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting upwork-helper v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::create_pool(&config.database_path).await?;
    let store = EntityStore::new(pool);
    let completer = CompletionClient::new(config.openai_api_key.clone());

    let mut snapshot = Snapshot::default();
    snapshot.load(&store).await?;

    match cli.command {
        Command::Profile { action } => match action {
            ProfileAction::Set {
                name,
                job_title,
                years,
                skills,
            } => {
                let profile = UserProfile {
                    name,
                    job_title,
                    years_of_experience: years,
                    skills,
                };
                commands::set_profile(&store, &mut snapshot, profile).await?;
                println!("Profile saved");
            }
            ProfileAction::Show => {
                snapshot.set_active_tab(Tab::PersonalInfo);
                print!("{}", commands::render_status(&snapshot));
            }
        },
        Command::Letter { action } => match action {
            LetterAction::Show => {
                snapshot.set_active_tab(Tab::Main);
                print!("{}", commands::render_status(&snapshot));
            }
            LetterAction::Save { text } => {
                commands::save_letter(&store, &mut snapshot, text).await?;
                println!("Cover letter saved");
            }
            LetterAction::Generate { requirements } => {
                let text = commands::generate_letter(
                    &store,
                    &mut snapshot,
                    &completer,
                    requirements.as_deref().unwrap_or(""),
                )
                .await?;
                println!("{text}");
            }
            LetterAction::Delete => {
                commands::delete_letter(&store, &mut snapshot).await?;
                println!("Cover letter deleted");
            }
        },
        Command::Question { action } => match action {
            QuestionAction::Add { question, answer } => {
                let id =
                    commands::add_question(&store, &mut snapshot, Question { question, answer })
                        .await?;
                println!("Question saved with id {id}");
            }
            QuestionAction::Answer { question } => {
                let answer =
                    commands::answer_question(&store, &mut snapshot, &completer, question).await?;
                println!("{answer}");
            }
            QuestionAction::Update {
                id,
                question,
                answer,
            } => {
                commands::update_question(&store, &mut snapshot, id, question, answer).await?;
                println!("Question updated");
            }
            QuestionAction::List => {
                snapshot.set_active_tab(Tab::Questions);
                print!("{}", commands::render_status(&snapshot));
            }
            QuestionAction::Delete { id } => {
                commands::delete_question(&store, &mut snapshot, id).await?;
                println!("Question deleted");
            }
        },
        Command::Status => {
            print!("{}", commands::render_status(&snapshot));
        }
    }

    Ok(())
}
