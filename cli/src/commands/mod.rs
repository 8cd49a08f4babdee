pub mod notes;
pub mod run;
pub mod send;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "quizbot",
    author,
    version,
    about = "Quizbot - multiple-choice quizzes from your study notes",
    long_about = "Reads the last few days of date-headed notes, asks a language model for a \
                  multiple-choice quiz and pushes it to a chat recipient.\n\nCredentials and \
                  defaults come from environment variables (NOTION_*, GEMINI_*, LINE_*, QUIZ_*)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate a quiz from recent notes and deliver it")]
    Run(run::RunArgs),

    #[command(about = "List recently edited notes")]
    Notes(notes::NotesArgs),

    #[command(about = "Send a plain text message to the configured recipient")]
    Send(send::SendArgs)
}
