use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::Path;

use super::{engine, print_json, CommandResult};

#[derive(Args)]
pub struct EnrollmentArgs {
    /// Course ID
    #[arg(long)]
    pub course: String,
    /// Extend the trend through this day (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum DemographicsAction {
    /// Age histogram and median
    Ages {
        #[arg(long)]
        course: String,
    },
    /// Education levels
    Education {
        #[arg(long)]
        course: String,
    },
    /// Gender shares
    Gender {
        #[arg(long)]
        course: String,
    },
    /// Top countries
    Geography {
        #[arg(long)]
        course: String,
    },
}

pub async fn enrollment(config: Option<&Path>, args: EnrollmentArgs) -> CommandResult {
    let engine = engine(config)?;
    print_json(&engine.enrollment_trend(&args.course, args.end).await?)
}

pub async fn demographics(config: Option<&Path>, action: DemographicsAction) -> CommandResult {
    let engine = engine(config)?;
    match action {
        DemographicsAction::Ages { course } => print_json(&engine.ages(&course).await?),
        DemographicsAction::Education { course } => print_json(&engine.education(&course).await?),
        DemographicsAction::Gender { course } => print_json(&engine.gender(&course).await?),
        DemographicsAction::Geography { course } => print_json(&engine.geography(&course).await?),
    }
}
