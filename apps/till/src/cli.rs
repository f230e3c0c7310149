//! Command line definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Register session control for Meridian POS.
#[derive(Debug, Parser)]
#[command(name = "meridian-till", about = "Open, recover and close register shifts", version)]
pub struct Cli {
    /// Path to meridian.toml (default: platform config directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Outlet to work in. Selecting an outlet clears the configured till.
    #[arg(long, global = true, value_name = "OUTLET_ID")]
    pub outlet: Option<String>,

    /// Till (register) within the outlet
    #[arg(long, global = true, value_name = "TILL_ID")]
    pub till: Option<String>,

    /// Operator to act as
    #[arg(long, global = true, value_name = "USER_ID")]
    pub user: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show whether this register has an open shift
    Status {
        /// Resume a shift from the outlet's open list
        #[arg(long, value_name = "SHIFT_ID")]
        adopt: Option<String>,
    },

    /// List every open shift in the outlet
    OpenShifts,

    /// Open a new shift on the selected till
    Open {
        /// Cash counted into the drawer, e.g. 100.00
        #[arg(long, value_name = "AMOUNT")]
        opening: String,

        /// Change float handed to the till
        #[arg(long = "float", value_name = "AMOUNT", default_value = "0")]
        floating: String,

        /// Business date (default: today)
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Count the drawer and close a shift
    Close {
        shift_id: String,

        /// Counted closing cash, e.g. 137.50
        amount: String,

        #[arg(long)]
        notes: Option<String>,

        /// Close without stopping at the reconciliation preview
        #[arg(long)]
        yes: bool,
    },

    /// Remember the current outlet, till and operator in meridian.toml
    SaveContext,
}

/// Context selections given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub outlet: Option<String>,
    pub till: Option<String>,
    pub user: Option<String>,
}

impl Cli {
    pub fn selection(&self) -> Selection {
        Selection {
            outlet: self.outlet.clone(),
            till: self.till.clone(),
            user: self.user.clone(),
        }
    }
}
