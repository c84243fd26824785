//! Offline commands on raw statement files.

use anyhow::{Context, Result};
use docadmin_iam::Catalogs;
use docadmin_iam::editor::{parse_statements, serialize_statements};
use docadmin_iam::model::Statement;

use super::{Env, print_json, read_input};

/// `docadmin validate <file>`
pub fn validate(env: &Env, path: &str) -> Result<()> {
    let text = read_input(path)?;
    let statements = parse_statements(&text).with_context(|| path.to_string())?;

    if env.json {
        return print_json(&serde_json::json!({
            "valid": true,
            "statements": statements.len(),
        }));
    }

    let catalogs = env.catalogs()?;
    println!("{}: {} statement(s) OK", path, statements.len());
    print_statements(&catalogs, &statements);
    Ok(())
}

/// `docadmin fmt <file> [-w]`
pub fn fmt(path: &str, write: bool) -> Result<()> {
    let text = read_input(path)?;
    let statements = parse_statements(&text).with_context(|| path.to_string())?;
    let mut formatted = serialize_statements(&statements)?;
    formatted.push('\n');

    if write && path != "-" {
        if formatted != text {
            std::fs::write(path, &formatted)?;
            eprintln!("formatted {}", path);
        }
    } else {
        print!("{}", formatted);
    }
    Ok(())
}

/// One block per statement with catalog labels.
pub fn print_statements(catalogs: &Catalogs, statements: &[Statement]) {
    for (i, s) in statements.iter().enumerate() {
        match &s.sid {
            Some(sid) => println!("#{} {} ({})", i + 1, s.effect, sid),
            None => println!("#{} {}", i + 1, s.effect),
        }
        for action in &s.actions {
            println!("    action    {:40} {}", action, catalogs.actions.label_of(action));
        }
        for urn in &s.resources {
            println!("    resource  {:40} {}", urn, catalogs.resources.label(urn));
        }
        if let Some(conditions) = &s.conditions {
            println!("    conditions {}", conditions.as_str());
        }
    }
}
