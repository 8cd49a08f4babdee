use anyhow::Result;
use clap::Args;
use delivery::{QuizDelivery, create_line_client};
use errors::PipelineError;

use crate::output;

#[derive(Args)]
pub struct SendArgs {
    /// Message text
    #[arg(value_name = "TEXT")]
    pub text: String
}

pub async fn run(args: SendArgs) -> Result<()> {
    let line = config::load_line_from_env()?;
    let http = config::load_http_from_env()?;

    let recipient = line.user_id.clone();
    let delivery = QuizDelivery::new(create_line_client(line, &http)?, recipient);
    delivery
        .send_text(&args.text)
        .await
        .map_err(PipelineError::from)?;

    output::success("Message sent");
    Ok(())
}
