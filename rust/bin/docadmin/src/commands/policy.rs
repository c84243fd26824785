//! Policy lifecycle commands.

use anyhow::Result;
use docadmin_core::ListParams;
use docadmin_iam::editor::parse_statements;
use docadmin_iam::model::{CreatePolicy, Policy};

use super::statements::print_statements;
use super::{Env, print_json, read_input};

/// `docadmin policy create <name> [--description] [-f file]`
pub fn create(env: &Env, name: &str, description: Option<String>, file: Option<&str>) -> Result<()> {
    let statements = match file {
        Some(path) => parse_statements(&read_input(path)?)?,
        None => Vec::new(),
    };
    let mut input = CreatePolicy::new(name).with_statements(statements);
    input.description = description;

    let policy = env.service()?.create_policy(input)?;
    if env.json {
        return print_json(&policy);
    }
    println!("Policy \"{}\" created.", policy.name);
    println!("  ID:         {}", policy.id);
    println!("  Statements: {}", policy.statements.len());
    Ok(())
}

/// `docadmin policy list`
pub fn list(env: &Env, limit: Option<usize>, offset: Option<usize>) -> Result<()> {
    let defaults = ListParams::default();
    let params = ListParams {
        limit: limit.unwrap_or(defaults.limit),
        offset: offset.unwrap_or(defaults.offset),
    };
    let result = env.service()?.list_policies(&params)?;
    if env.json {
        return print_json(&result);
    }

    if result.items.is_empty() {
        println!("No policies.");
        return Ok(());
    }
    println!("{:32} {:30} {:8} {:10}", "ID", "NAME", "VERSION", "STATEMENTS");
    for p in &result.items {
        println!("{:32} {:30} {:8} {:10}", p.id, p.name, p.version, p.statements.len());
    }
    if result.total > result.items.len() {
        println!("({} of {} shown)", result.items.len(), result.total);
    }
    Ok(())
}

/// `docadmin policy show <id>`
pub fn show(env: &Env, id: &str) -> Result<()> {
    let service = env.service()?;
    let policy = service.get_policy(id)?;
    if env.json {
        return print_json(&policy);
    }

    let catalogs = env.catalogs()?;
    print_header(&policy);
    let attachments = service.attachments_for_policy(id)?;
    println!("Attached to:  {}", attachments.len());
    for a in &attachments {
        println!("  {} ({})", a.principal_urn, catalogs.resources.label(&a.principal_urn));
    }
    println!();
    print_statements(&catalogs, &policy.statements);
    Ok(())
}

/// `docadmin policy save <id> -f <file>`
pub fn save(env: &Env, id: &str, path: &str) -> Result<()> {
    let statements = parse_statements(&read_input(path)?)?;
    let policy = env.service()?.save_statements(id, statements)?;
    if env.json {
        return print_json(&policy);
    }
    println!(
        "Policy \"{}\" saved with {} statement(s).",
        policy.name,
        policy.statements.len()
    );
    Ok(())
}

/// `docadmin policy delete <id>`
pub fn delete(env: &Env, id: &str) -> Result<()> {
    env.service()?.delete_policy(id)?;
    println!("Policy {} deleted.", id);
    Ok(())
}

fn print_header(policy: &Policy) {
    println!("ID:           {}", policy.id);
    println!("Name:         {}", policy.name);
    if let Some(d) = &policy.description {
        println!("Description:  {}", d);
    }
    println!("Version:      {}", policy.version);
    println!("Updated:      {}", policy.updated_at);
}
