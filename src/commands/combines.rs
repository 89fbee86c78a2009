//! # Combines Command Implementation
//!
//! This module implements the `combines` subcommand, which shows how a
//! request would be served.
//!
//! ## Functionality
//!
//! - **Conflict check**: A request whose files conflict is rejected before
//!   any planning.
//! - **Plan tree**: Accepted bundles with their members (implicit members
//!   are marked), followed by files served on their own.
//! - **Deliverables**: The final list in load order with each entry's
//!   minify flag.

use std::borrow::Cow;
use std::io::{self, Write};

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use ptree::{print_tree, Style, TreeItem};

use asset_concentrator::Resolver;

use super::ManifestArgs;

/// Plan which bundles to serve for requested files
#[derive(Args, Debug)]
pub struct CombinesArgs {
    #[command(flatten)]
    pub source: ManifestArgs,

    /// Files the page asks for
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,
}

/// Execute the `combines` command.
pub fn execute(args: CombinesArgs) -> Result<()> {
    let mut resolver = args.source.resolver()?;

    let conflicts = resolver
        .conflicts(&args.files)
        .context("Failed to check conflicts")?;
    if !conflicts.is_empty() {
        let files: Vec<&str> = conflicts.keys().map(String::as_str).collect();
        bail!(
            "Request has conflicts declared by {}; run `concentrate conflicts` for details",
            files.join(", ")
        );
    }

    let plan = resolver
        .combines(&args.files)
        .context("Failed to plan combines")?;
    let tree = plan_tree(&mut resolver, &args.files, &plan.combines, &plan.files)?;
    print_tree(&tree).map_err(|e| anyhow!("Failed to display plan: {}", e))?;

    let mut deliverables = plan.files;
    resolver
        .sort_files(&mut deliverables)
        .context("Failed to order deliverables")?;

    let mut out = io::stdout().lock();
    writeln!(out)?;
    writeln!(out, "Serve in order:")?;
    for file in deliverables {
        let flag = if resolver.is_minified(&file)? {
            "minify"
        } else {
            "raw"
        };
        writeln!(out, "  {file} [{flag}]")?;
    }
    Ok(())
}

fn plan_tree(
    resolver: &mut Resolver,
    request: &[String],
    accepted: &[String],
    deliverables: &[String],
) -> Result<PlanNode> {
    let combines = resolver.combines_info()?;
    let mut children = Vec::new();

    for name in accepted {
        let members = combines
            .get(name)
            .map(|combine| {
                combine
                    .includes
                    .iter()
                    .map(|(file, member)| {
                        if member.explicit {
                            PlanNode::leaf(file.clone())
                        } else {
                            PlanNode::leaf(format!("{file} (implicit)"))
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        children.push(PlanNode {
            label: format!("{name} (bundle)"),
            children: members,
        });
    }

    for file in deliverables.iter().filter(|file| !accepted.contains(file)) {
        children.push(PlanNode::leaf(file.clone()));
    }

    Ok(PlanNode {
        label: format!("request ({} file(s))", request.len()),
        children,
    })
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct PlanNode {
    label: String,
    children: Vec<PlanNode>,
}

impl PlanNode {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

impl TreeItem for PlanNode {
    type Child = PlanNode;

    fn write_self<W: Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
