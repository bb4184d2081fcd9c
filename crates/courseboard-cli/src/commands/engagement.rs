use clap::Args;
use std::path::Path;

use super::{engine, print_json, CommandResult};

#[derive(Args)]
pub struct TimelineArgs {
    /// Course ID
    #[arg(long)]
    pub course: String,
    /// Video block ID or pipeline video ID
    #[arg(long)]
    pub video: String,
}

pub async fn timeline(config: Option<&Path>, args: TimelineArgs) -> CommandResult {
    let engine = engine(config)?;
    print_json(&engine.video_timeline(&args.course, &args.video).await?)
}
