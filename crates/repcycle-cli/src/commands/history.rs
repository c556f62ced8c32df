use chrono::NaiveDate;
use clap::Subcommand;
use repcycle_core::{HistoryFilter, HistoryStore};

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List finished workouts, newest first
    List {
        /// Case-insensitive workout name filter
        #[arg(long)]
        search: Option<String>,
        /// Earliest completion date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest completion date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Maximum entries (defaults to history.default_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one entry with its blocks
    Show { id: String },
    /// Delete an entry
    Delete { id: String },
}

pub fn run(action: HistoryAction, user: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(user)?;

    match action {
        HistoryAction::List {
            search,
            from,
            to,
            limit,
        } => {
            if let (Some(from), Some(to)) = (from, to) {
                if from > to {
                    return Err(format!("--from {from} is after --to {to}").into());
                }
            }
            let filter = HistoryFilter {
                query: search,
                from,
                to,
            };
            let limit = limit.unwrap_or(ctx.config.history.default_limit);
            let entries = ctx.db.list_history(&ctx.user, &filter, Some(limit))?;
            print_json(&entries)?;
        }
        HistoryAction::Show { id } => match ctx.db.get_history(&ctx.user, &id)? {
            Some(entry) => print_json(&entry)?,
            None => return Err(format!("no history entry '{id}'").into()),
        },
        HistoryAction::Delete { id } => {
            if !ctx.db.delete_history(&ctx.user, &id)? {
                return Err(format!("no history entry '{id}'").into());
            }
            println!("History entry deleted: {id}");
        }
    }
    Ok(())
}
