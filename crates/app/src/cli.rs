use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use planner_core::model::{Difficulty, TaskId};

#[derive(Parser, Debug, Clone)]
#[command(name = "plania")]
#[command(version)]
#[command(about = "Study planner: track subjects, exam dates and daily tasks", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// SQLite database holding sessions, accounts and subjects
    #[arg(long = "db", env = "PLANIA_DB_URL", default_value = "sqlite://plania.sqlite3", global = true)]
    pub db_url: String,

    /// Keep a separate subject list for each account
    #[arg(long, env = "PLANIA_SUBJECTS_PER_USER", default_value_t = false, global = true)]
    pub subjects_per_user: bool,

    /// Base URL of the schedule backend; the built-in sample plan is used when unset
    #[arg(long, env = "PLANIA_API_BASE_URL", global = true)]
    pub api_base_url: Option<String>,

    /// Bearer token sent to the schedule backend
    #[arg(long, env = "PLANIA_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// Schedule backend request timeout in milliseconds
    #[arg(long, env = "PLANIA_API_TIMEOUT_MS", default_value_t = 30_000, global = true)]
    pub api_timeout_ms: u64,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Signup(SignupArgs),
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Weekly schedule, today's tasks and overall progress
    Dashboard {
        /// Flip completion of a task before showing progress (repeatable)
        #[arg(long = "toggle", value_name = "ID")]
        toggles: Vec<TaskId>,
    },
    /// Manage subjects and exam dates
    #[command(subcommand)]
    Subjects(SubjectsCommand),
}

#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub display_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubjectsCommand {
    /// List subjects with their exam dates
    List,
    /// Add a subject
    Add {
        name: String,
        /// Exam date as YYYY-MM-DD
        #[arg(long)]
        exam_date: Option<String>,
        #[arg(long, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// Study material file to attach (repeatable)
        #[arg(long = "material", value_name = "FILE")]
        materials: Vec<PathBuf>,
    },
    /// Change the exam date or attach more materials
    Update {
        name: String,
        /// New exam date as YYYY-MM-DD
        #[arg(long)]
        exam_date: Option<String>,
        #[arg(long = "material", value_name = "FILE")]
        materials: Vec<PathBuf>,
    },
    /// Remove every subject with this name
    Remove { name: String },
}
