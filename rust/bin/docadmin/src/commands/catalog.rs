//! Catalog inspection: URN building, labels, actions, resource types.

use anyhow::Result;

use super::{Env, print_json};

/// `docadmin resolve <type> <id>`
pub fn resolve(env: &Env, resource_type: &str, id: &str) -> Result<()> {
    let catalogs = env.catalogs()?;
    let urn = catalogs.resources.resolve(resource_type, id)?;
    if env.json {
        return print_json(&serde_json::json!({
            "urn": urn,
            "label": catalogs.resources.label(&urn),
        }));
    }
    println!("{}", urn);
    Ok(())
}

/// `docadmin label <urn>...`
pub fn label(env: &Env, urns: &[String]) -> Result<()> {
    let catalogs = env.catalogs()?;
    if env.json {
        let rows: Vec<_> = urns
            .iter()
            .map(|urn| {
                let described = catalogs.resources.describe(urn);
                serde_json::json!({
                    "urn": urn,
                    "label": catalogs.resources.label(urn),
                    "resource_type": described.as_ref().map(|r| r.resource_type.id.as_str()),
                    "identifier": described.as_ref().map(|r| r.identifier),
                })
            })
            .collect();
        return print_json(&rows);
    }
    for urn in urns {
        println!("{:50} {}", urn, catalogs.resources.label(urn));
    }
    Ok(())
}

/// `docadmin actions`
pub fn actions(env: &Env) -> Result<()> {
    let catalogs = env.catalogs()?;
    if env.json {
        return print_json(catalogs.actions.categories());
    }
    for category in catalogs.actions.categories() {
        println!("{}", category.name);
        for def in &category.actions {
            println!("  {:40} {}", def.action, def.label);
        }
    }
    Ok(())
}

/// `docadmin resource-types`
pub fn resource_types(env: &Env) -> Result<()> {
    let catalogs = env.catalogs()?;
    let types: Vec<_> = catalogs.resources.types().collect();
    if env.json {
        return print_json(&types);
    }

    println!("{:14} {:14} {}", "ID", "LABEL", "PATTERN");
    for t in &types {
        println!("{:14} {:14} {}", t.id, t.label, t.urn_pattern);
    }
    for overlap in catalogs.resources.overlaps() {
        println!(
            "warning: '{}' shadows '{}' for reverse lookups",
            overlap.winner, overlap.shadowed
        );
    }
    Ok(())
}
