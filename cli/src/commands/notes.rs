use anyhow::Result;
use chrono::Utc;
use clap::Args;
use notes::{NoteAggregator, create_notion_client};

use crate::output;

#[derive(Args)]
pub struct NotesArgs {
    /// Look back this many days by last edit time
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: u32
}

pub async fn run(args: NotesArgs) -> Result<()> {
    let notion = config::load_notion_from_env()?;
    let http = config::load_http_from_env()?;

    let aggregator = NoteAggregator::new(create_notion_client(notion, &http)?);
    let notes = aggregator.fetch_recent_notes(args.days, Utc::now()).await?;

    output::header(&format!("Notes edited in the last {} day(s)", args.days));
    if notes.is_empty() {
        output::hint("No notes were edited in this window");
        return Ok(());
    }

    for note in &notes {
        println!();
        output::note(note);
    }

    Ok(())
}
