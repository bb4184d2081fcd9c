use clap::Args;
use std::path::Path;

use courseboard_core::ContentKind;

use super::{engine, print_json, CommandResult};

#[derive(Args)]
pub struct SectionsArgs {
    /// Course ID
    #[arg(long)]
    pub course: String,
    /// Table to build: graded, ungraded or videos
    #[arg(long, default_value = "graded")]
    pub kind: ContentKind,
    /// Drill into one section
    #[arg(long)]
    pub section: Option<String>,
    /// Drill into one subsection of --section
    #[arg(long, requires = "section")]
    pub subsection: Option<String>,
}

#[derive(Args)]
pub struct AssignmentsArgs {
    /// Course ID
    #[arg(long)]
    pub course: String,
    /// Only assignments of this type (e.g. "Homework")
    #[arg(long = "type")]
    pub assignment_type: Option<String>,
    /// Drill into one assignment
    #[arg(long, conflicts_with = "assignment_type")]
    pub assignment: Option<String>,
    /// List the course's assignment types instead
    #[arg(long, conflicts_with_all = ["assignment_type", "assignment"])]
    pub types: bool,
}

pub async fn sections(config: Option<&Path>, args: SectionsArgs) -> CommandResult {
    let engine = engine(config)?;
    let report = match (&args.section, &args.subsection) {
        (Some(section), Some(subsection)) => {
            engine
                .subsection(&args.course, args.kind, section, subsection)
                .await?
        }
        (Some(section), None) => engine.section(&args.course, args.kind, section).await?,
        _ => engine.sections(&args.course, args.kind).await?,
    };
    print_json(&report)
}

pub async fn assignments(config: Option<&Path>, args: AssignmentsArgs) -> CommandResult {
    let engine = engine(config)?;
    if args.types {
        return print_json(&engine.assignment_types(&args.course).await?);
    }
    let report = match &args.assignment {
        Some(assignment) => engine.assignment(&args.course, assignment).await?,
        None => {
            engine
                .assignments(&args.course, args.assignment_type.as_deref())
                .await?
        }
    };
    print_json(&report)
}
