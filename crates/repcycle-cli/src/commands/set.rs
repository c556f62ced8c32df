use clap::Subcommand;
use repcycle_core::plan::search_planned_sets;
use repcycle_core::PlannedSet;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum SetAction {
    /// Add a planned set
    Add {
        /// Exercise name (unique per user)
        exercise: String,
        /// Number of sets
        #[arg(long)]
        sets: u32,
        /// Reps per set
        #[arg(long)]
        reps: u32,
        /// Weight in kg
        #[arg(long, default_value = "0")]
        weight: f64,
        /// Rest between sets in seconds (0 = no rest)
        #[arg(long, default_value = "0")]
        rest: u32,
    },
    /// List planned sets
    List {
        /// Case-insensitive exercise filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Edit a planned set (by id or exercise name)
    Edit {
        set: String,
        #[arg(long)]
        exercise: Option<String>,
        #[arg(long)]
        sets: Option<u32>,
        #[arg(long)]
        reps: Option<u32>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        rest: Option<u32>,
    },
    /// Delete a planned set (by id or exercise name)
    Delete { set: String },
}

pub fn run(action: SetAction, user: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(user)?;

    match action {
        SetAction::Add {
            exercise,
            sets,
            reps,
            weight,
            rest,
        } => {
            let set = PlannedSet::new(&exercise, sets, reps, weight, rest)?;
            ctx.db.create_planned_set(&ctx.user, &set)?;
            print_json(&set)?;
        }
        SetAction::List { search } => {
            let sets = ctx.db.list_planned_sets(&ctx.user)?;
            match search {
                Some(query) => print_json(&search_planned_sets(&sets, &query))?,
                None => print_json(&sets)?,
            }
        }
        SetAction::Edit {
            set,
            exercise,
            sets,
            reps,
            weight,
            rest,
        } => {
            let mut planned = ctx.db.find_planned_set(&ctx.user, &set)?;
            if let Some(exercise) = exercise {
                planned.exercise = exercise.trim().to_string();
            }
            if let Some(sets) = sets {
                planned.sets = sets;
            }
            if let Some(reps) = reps {
                planned.reps = reps;
            }
            if let Some(weight) = weight {
                planned.weight = weight;
            }
            if let Some(rest) = rest {
                planned.rest_time = rest;
            }
            ctx.db.update_planned_set(&ctx.user, &planned)?;
            print_json(&planned)?;
        }
        SetAction::Delete { set } => {
            let planned = ctx.db.find_planned_set(&ctx.user, &set)?;
            ctx.db.delete_planned_set(&ctx.user, &planned.id)?;
            println!("Planned set deleted: {}", planned.exercise);
        }
    }
    Ok(())
}
