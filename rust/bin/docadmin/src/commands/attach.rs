//! Policy attachment commands.

use anyhow::Result;

use super::{Env, print_json};

/// `docadmin attach <policy-id> <principal-urn>`
pub fn attach(env: &Env, policy_id: &str, principal: &str) -> Result<()> {
    let attachment = env.service()?.attach(policy_id, principal)?;
    if env.json {
        return print_json(&attachment);
    }
    println!("Attached policy {} to {}.", policy_id, attachment.principal_urn);
    println!("  Attachment: {}", attachment.id);
    Ok(())
}

/// `docadmin detach <policy-id> <attachment-id>`
pub fn detach(env: &Env, policy_id: &str, attachment_id: &str) -> Result<()> {
    env.service()?.detach(policy_id, attachment_id)?;
    println!("Attachment {} removed.", attachment_id);
    Ok(())
}

/// `docadmin attachments <policy-id>`
pub fn attachments(env: &Env, policy_id: &str) -> Result<()> {
    let attachments = env.service()?.attachments_for_policy(policy_id)?;
    if env.json {
        return print_json(&attachments);
    }
    if attachments.is_empty() {
        println!("Policy {} is not attached to anyone.", policy_id);
        return Ok(());
    }
    println!("{:32} {:40} {}", "ID", "PRINCIPAL", "ATTACHED");
    for a in &attachments {
        println!("{:32} {:40} {}", a.id, a.principal_urn, a.attached_on);
    }
    Ok(())
}

/// `docadmin principal-policies <urn>`
pub fn principal_policies(env: &Env, principal: &str) -> Result<()> {
    let attached = env.service()?.policies_for_principal(principal)?;
    if env.json {
        return print_json(&attached);
    }
    if attached.is_empty() {
        println!("No policies attached to {}.", principal);
        return Ok(());
    }
    println!("{:32} {:30} {:32} {}", "POLICY", "NAME", "ATTACHMENT", "ATTACHED");
    for ap in &attached {
        println!(
            "{:32} {:30} {:32} {}",
            ap.policy.id, ap.policy.name, ap.attachment.id, ap.attachment.attached_on
        );
    }
    Ok(())
}

/// `docadmin attachable <urn>`
pub fn attachable(env: &Env, principal: &str) -> Result<()> {
    let policies = env.service()?.attachable_policies(principal)?;
    if env.json {
        return print_json(&policies);
    }
    if policies.is_empty() {
        println!("Every policy is already attached to {}.", principal);
        return Ok(());
    }
    println!("{:32} {}", "ID", "NAME");
    for p in &policies {
        println!("{:32} {}", p.id, p.name);
    }
    Ok(())
}
