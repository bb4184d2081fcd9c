use clap::Args;
use std::path::Path;

use super::{engine, print_json, CommandResult};

#[derive(Args)]
pub struct AnswersArgs {
    /// Course ID
    #[arg(long)]
    pub course: String,
    /// Problem block ID
    #[arg(long)]
    pub problem: String,
    /// Problem part (defaults to the first)
    #[arg(long)]
    pub part: Option<String>,
}

pub async fn run(config: Option<&Path>, args: AnswersArgs) -> CommandResult {
    let engine = engine(config)?;
    let report = engine
        .answer_distribution(&args.course, &args.problem, args.part.as_deref())
        .await?;
    print_json(&report)
}
