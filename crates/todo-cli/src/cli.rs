use clap::{Parser, Subcommand};
use todo_core::StatusFilter;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo - minimal task list service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database URL
    #[arg(long, env = "DATABASE_URL", default_value = todo_api::config::DEFAULT_DATABASE_URL)]
    pub database_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start API server
    Serve {
        /// Address to bind
        #[arg(long, env = "API_HOST", default_value = todo_api::config::DEFAULT_HOST)]
        host: String,

        /// Port to listen on
        #[arg(long, env = "API_PORT", default_value_t = todo_api::config::DEFAULT_PORT)]
        port: u16,

        /// Keep todos in memory instead of the database
        #[arg(long)]
        in_memory: bool,
    },

    /// Add a todo
    Add {
        /// Todo title
        title: String,
    },

    /// List todos, newest first
    List {
        /// Filter by status (all, active, completed)
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },

    /// Show a single todo
    Show {
        /// Todo ID
        id: i64,
    },

    /// Update a todo's title and/or completion flag
    Update {
        /// Todo ID
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Completion flag
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Flip a todo between active and completed
    Toggle {
        /// Todo ID
        id: i64,
    },

    /// Delete a todo
    Rm {
        /// Todo ID
        id: i64,
    },

    /// Delete all todos, or only the completed ones
    Clear {
        /// Only delete completed todos
        #[arg(long)]
        completed: bool,
    },
}
