use clap::Subcommand;
use repcycle_core::{Template, TemplateBlock, UserId};
use serde::Serialize;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Create a template.
    ///
    /// Blocks are given in order as `set:<planned set>`, `rest[:<seconds>]`
    /// or `note:<text>`.
    Create {
        name: String,
        #[arg(required = true)]
        blocks: Vec<String>,
    },
    /// Append a block to a template
    Add { template: String, block: String },
    /// Move block FROM to position TO
    Move {
        template: String,
        from: usize,
        to: usize,
    },
    /// Remove the block at INDEX
    Remove { template: String, index: usize },
    /// Rename a template
    Rename { template: String, name: String },
    /// List templates
    List,
    /// Show a template's blocks
    Show { template: String },
    /// Delete a template
    Delete { template: String },
}

#[derive(Serialize)]
struct BlockLine {
    index: usize,
    block: String,
}

#[derive(Serialize)]
struct TemplateView<'a> {
    id: &'a str,
    name: &'a str,
    blocks: Vec<BlockLine>,
}

impl<'a> From<&'a Template> for TemplateView<'a> {
    fn from(template: &'a Template) -> Self {
        Self {
            id: &template.id,
            name: &template.name,
            blocks: template
                .blocks
                .iter()
                .enumerate()
                .map(|(index, b)| BlockLine {
                    index,
                    block: b.describe(),
                })
                .collect(),
        }
    }
}

fn parse_block(
    ctx: &Context,
    user: &UserId,
    token: &str,
) -> Result<TemplateBlock, Box<dyn std::error::Error>> {
    let block = match token.split_once(':') {
        Some(("set", reference)) => {
            TemplateBlock::PlannedSet(ctx.db.find_planned_set(user, reference)?)
        }
        Some(("rest", secs)) => TemplateBlock::Rest {
            duration: secs
                .trim()
                .parse()
                .map_err(|_| format!("invalid rest duration '{secs}'"))?,
        },
        Some(("note", text)) => TemplateBlock::Note {
            text: text.trim().to_string(),
        },
        None if token == "rest" => TemplateBlock::Rest {
            duration: ctx.config.playback.default_rest_secs,
        },
        _ => {
            return Err(format!(
                "unrecognized block '{token}' (expected set:<name>, rest[:<secs>] or note:<text>)"
            )
            .into())
        }
    };
    block.validate()?;
    Ok(block)
}

pub fn run(action: TemplateAction, user: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(user)?;
    let user = &ctx.user;

    match action {
        TemplateAction::Create { name, blocks } => {
            let mut template = Template::new(&name)?;
            for token in &blocks {
                template.push(parse_block(&ctx, user, token)?)?;
            }
            ctx.db.create_template(user, &template)?;
            print_json(&TemplateView::from(&template))?;
        }
        TemplateAction::Add { template, block } => {
            let mut stored = ctx.db.find_template(user, &template)?;
            stored.push(parse_block(&ctx, user, &block)?)?;
            ctx.db.update_template(user, &stored)?;
            print_json(&TemplateView::from(&stored))?;
        }
        TemplateAction::Move { template, from, to } => {
            let mut stored = ctx.db.find_template(user, &template)?;
            stored.move_block(from, to)?;
            ctx.db.update_template(user, &stored)?;
            print_json(&TemplateView::from(&stored))?;
        }
        TemplateAction::Remove { template, index } => {
            let mut stored = ctx.db.find_template(user, &template)?;
            stored.remove(index)?;
            ctx.db.update_template(user, &stored)?;
            print_json(&TemplateView::from(&stored))?;
        }
        TemplateAction::Rename { template, name } => {
            let mut stored = ctx.db.find_template(user, &template)?;
            stored.rename(&name)?;
            ctx.db.update_template(user, &stored)?;
            print_json(&TemplateView::from(&stored))?;
        }
        TemplateAction::List => {
            let templates = ctx.db.list_templates(user)?;
            let views: Vec<TemplateView> = templates.iter().map(TemplateView::from).collect();
            print_json(&views)?;
        }
        TemplateAction::Show { template } => {
            let stored = ctx.db.find_template(user, &template)?;
            print_json(&TemplateView::from(&stored))?;
        }
        TemplateAction::Delete { template } => {
            let stored = ctx.db.find_template(user, &template)?;
            ctx.db.delete_template(user, &stored.id)?;
            println!("Template deleted: {}", stored.name);
        }
    }
    Ok(())
}
