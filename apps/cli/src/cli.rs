use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use unicompass_core::sorting::SortKey;
use unicompass_core::{Category, Priority, ProfileInput, TodoStatus};

#[derive(Parser, Debug)]
#[command(name = "unicompass")]
#[command(about = "Discover, shortlist and lock universities, then track your application")]
#[command(version)]
pub struct Cli {
    /// Base URL of the UniCompass API
    #[arg(long, env = "UNICOMPASS_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Where the signed-in session is kept between runs
    #[arg(
        long,
        env = "UNICOMPASS_SESSION_FILE",
        default_value = ".unicompass-session.json"
    )]
    pub session_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Sign in and keep the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show or update your onboarding profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Progress, completion and your lists at a glance
    Dashboard,
    /// Browse the catalog and manage your shortlist
    Universities {
        #[command(subcommand)]
        action: UniversityAction,
    },
    /// Application guidance and to-dos (needs a locked university)
    Application,
    /// Manage to-dos
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },
    /// Ask the AI counsellor
    Chat {
        /// Your question
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Let the AI counsellor analyze your profile
    Analysis,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Show,
    /// Save answers; flags you leave out keep their stored value
    Set(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub current_degree: Option<String>,
    #[arg(long)]
    pub current_gpa: Option<f64>,
    #[arg(long)]
    pub current_institution: Option<String>,
    #[arg(long)]
    pub field_of_study: Option<String>,
    #[arg(long)]
    pub graduation_year: Option<i32>,
    #[arg(long)]
    pub desired_degree: Option<String>,
    #[arg(long)]
    pub desired_field: Option<String>,
    /// Comma separated, e.g. "Germany, Canada"
    #[arg(long)]
    pub preferred_countries: Option<String>,
    #[arg(long)]
    pub study_start_year: Option<i32>,
    #[arg(long)]
    pub budget_min: Option<f64>,
    #[arg(long)]
    pub budget_max: Option<f64>,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long)]
    pub toefl_score: Option<i32>,
    #[arg(long)]
    pub ielts_score: Option<f64>,
    #[arg(long)]
    pub gre_score: Option<i32>,
    #[arg(long)]
    pub gmat_score: Option<i32>,
    #[arg(long)]
    pub exam_status: Option<String>,
    #[arg(long)]
    pub work_experience_years: Option<i32>,
    #[arg(long)]
    pub research_experience: Option<bool>,
    #[arg(long)]
    pub publications: Option<i32>,
}

impl From<ProfileArgs> for ProfileInput {
    fn from(args: ProfileArgs) -> Self {
        ProfileInput {
            current_degree: args.current_degree,
            current_gpa: args.current_gpa,
            current_institution: args.current_institution,
            field_of_study: args.field_of_study,
            graduation_year: args.graduation_year,
            desired_degree: args.desired_degree,
            desired_field: args.desired_field,
            preferred_countries: args.preferred_countries,
            study_start_year: args.study_start_year,
            budget_min: args.budget_min,
            budget_max: args.budget_max,
            currency: args.currency,
            toefl_score: args.toefl_score,
            ielts_score: args.ielts_score,
            gre_score: args.gre_score,
            gmat_score: args.gmat_score,
            exam_status: args.exam_status,
            work_experience_years: args.work_experience_years,
            research_experience: args.research_experience,
            publications: args.publications,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum UniversityAction {
    /// List universities matching your profile
    List {
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        budget_min: Option<f64>,
        #[arg(long)]
        budget_max: Option<f64>,
        /// Ignore every filter
        #[arg(long)]
        all: bool,
        /// rank, tuition_low, tuition_high or acceptance
        #[arg(long, default_value = "rank")]
        sort: SortKey,
    },
    /// Show one university
    Show { id: i64 },
    /// Add a university to your shortlist
    Shortlist {
        id: i64,
        /// dream, target or safe
        #[arg(long)]
        category: Category,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Commit to applying to a shortlisted university
    Lock { id: i64 },
    /// Undo a lock; the university stays shortlisted
    Unlock { id: i64 },
    /// Your shortlist
    Shortlisted,
    /// Your locked universities
    Locked,
    /// Side by side comparison of shortlisted or locked universities
    Compare {
        /// Two to four ids; defaults to your shortlisted and locked universities
        ids: Vec<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TodoAction {
    List,
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Attach to a university
        #[arg(long)]
        university: Option<i64>,
    },
    /// Change a to-do's status
    Status {
        id: i64,
        /// pending, in_progress or completed
        status: TodoStatus,
    },
    /// Mark a to-do completed
    Done { id: i64 },
    Delete { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_university_list() {
        let cli = Cli::try_parse_from([
            "unicompass",
            "--api-url",
            "http://api.test",
            "universities",
            "list",
            "--country",
            "Germany",
            "--sort",
            "tuition_low",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://api.test");
        let Command::Universities {
            action:
                UniversityAction::List {
                    country, all, sort, ..
                },
        } = cli.command
        else {
            panic!("expected universities list");
        };
        assert_eq!(country.as_deref(), Some("Germany"));
        assert!(!all);
        assert_eq!(sort, SortKey::TuitionLow);
    }

    #[test]
    fn test_parse_shortlist_category() {
        let cli = Cli::try_parse_from([
            "unicompass",
            "universities",
            "shortlist",
            "12",
            "--category",
            "Dream",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Universities {
                action: UniversityAction::Shortlist {
                    id: 12,
                    category: Category::Dream,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = Cli::try_parse_from([
            "unicompass",
            "universities",
            "shortlist",
            "12",
            "--category",
            "reach",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_compare_ids() {
        let cli = Cli::try_parse_from(["unicompass", "universities", "compare", "4", "9"]).unwrap();
        let Command::Universities {
            action: UniversityAction::Compare { ids },
        } = cli.command
        else {
            panic!("expected universities compare");
        };
        assert_eq!(ids, vec![4, 9]);

        let cli = Cli::try_parse_from(["unicompass", "universities", "compare"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Universities {
                action: UniversityAction::Compare { ids }
            } if ids.is_empty()
        ));
    }

    #[test]
    fn test_profile_args_map_onto_input() {
        let args = ProfileArgs {
            current_gpa: Some(3.8),
            preferred_countries: Some("Germany".into()),
            ..Default::default()
        };
        let input = ProfileInput::from(args);
        assert_eq!(input.current_gpa, Some(3.8));
        assert_eq!(input.preferred_countries.as_deref(), Some("Germany"));
        assert_eq!(input.budget_max, None);
    }
}
