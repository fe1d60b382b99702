//! CLI subcommand handlers

use std::path::Path;

use anyhow::Result;
use complex::{Skeleton, TopologyReport};
use orchestrator::{deploy_with, DeployOptions, DryRunBackend, ResourcePatterns};
use serde::Serialize;

use crate::config;
use crate::output::OutputHandler;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Deploy a declaration against the dry-run backend and show what would happen
pub async fn plan(path: &Path, options: &DeployOptions, output: &OutputHandler, json: bool) -> Result<()> {
    let conf = config::load_complex(path)?;
    let backend = DryRunBackend::new();
    let deployment = deploy_with(&conf, &backend, options).await?;

    if json {
        return print_json(&deployment.output());
    }

    output.print_plan(&deployment.plan);
    output.print_summary(&deployment.summary);
    output.print_report(&deployment.report);
    Ok(())
}

/// Report on the complex a declaration generates, without planning it
pub fn report(path: &Path, output: &OutputHandler, json: bool) -> Result<()> {
    let conf = config::load_complex(path)?;
    let skeleton = Skeleton::from_bases(conf.bases());
    let report = TopologyReport::new(&skeleton);

    if json {
        return print_json(&report);
    }
    output.print_report(&report);
    Ok(())
}

/// Report on captured live network memberships
pub fn analyze(path: &Path, output: &OutputHandler, json: bool) -> Result<()> {
    let memberships = config::load_memberships(path)?;

    match orchestrator::analyze(&memberships) {
        Some(report) if json => print_json(&report),
        Some(report) => {
            output.print_report(&report);
            Ok(())
        }
        None => {
            output.print_warning("No network has any members");
            Ok(())
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Owned<'a> {
    networks: Vec<&'a str>,
    resources: Vec<&'a str>,
}

/// Sort resource names into those owned by `complex` under the naming contract
pub fn inventory(complex: &str, names: &[String], output: &OutputHandler, json: bool) -> Result<()> {
    let patterns = ResourcePatterns::new(complex)?;
    let owned = Owned {
        networks: names.iter().map(String::as_str).filter(|n| patterns.is_network(n)).collect(),
        resources: names.iter().map(String::as_str).filter(|n| patterns.is_vertex(n)).collect(),
    };

    if json {
        return print_json(&owned);
    }

    output.print_header(&format!("Resources owned by {}", complex));
    for name in &owned.networks {
        output.print_info(&format!("network  {}", name));
    }
    for name in &owned.resources {
        output.print_info(&format!("resource {}", name));
    }
    if owned.networks.is_empty() && owned.resources.is_empty() {
        output.print_warning("Nothing matches");
    }
    Ok(())
}
