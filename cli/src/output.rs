use colored::Colorize;
use quiz_core::types::Note;

/// Characters of note content shown in listings.
pub const PREVIEW_CHARS: usize = 500;

pub fn header(title: &str) {
    println!("{}", title.bold().underline());
}

pub fn hint(msg: &str) {
    println!("{} {}", "hint:".cyan().bold(), msg.dimmed());
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

pub fn note(note: &Note) {
    println!("{}", note.title.bold());
    println!("  {} {}", "id:".dimmed(), note.id);
    println!(
        "  {} {}",
        "edited:".dimmed(),
        note.last_edited.format("%Y-%m-%d %H:%M UTC")
    );
    println!("{}", preview(&note.content, PREVIEW_CHARS));
}

pub fn message_part(index: usize, total: usize, text: &str) {
    println!(
        "{}",
        format!("--- message {}/{} ({} chars) ---", index, total, delivery::message_length(text))
            .dimmed()
    );
    println!("{}", text);
}

/// First `limit` characters, with an ellipsis when anything was cut.
pub fn preview(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
