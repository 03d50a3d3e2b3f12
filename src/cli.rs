use std::path::PathBuf;

use clap::Parser;

use crate::components::event_form::LaunchPayload;

#[derive(Debug, Parser)]
#[command(
    name = "calendar-event-entry",
    version,
    about = "Create a calendar event in the terminal"
)]
pub struct Cli {
    /// Day to seed start and end with: YYYYMMDD or YYYYMMDDHHMM
    pub day_code: Option<String>,

    /// SQLite database to store the event in
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn payload(&self) -> LaunchPayload {
        LaunchPayload {
            day_code: self.day_code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_code_is_positional() {
        let cli = Cli::try_parse_from(["calendar-event-entry", "20240310", "--database", "x.db"])
            .unwrap();
        assert_eq!(cli.payload().day_code.as_deref(), Some("20240310"));
        assert_eq!(cli.database, Some(PathBuf::from("x.db")));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn day_code_is_optional() {
        let cli = Cli::try_parse_from(["calendar-event-entry"]).unwrap();
        assert_eq!(cli.payload().day_code, None);
    }
}
