use anyhow::Result;
use helpdesk_storage::{MigrationState, MigrationStatus, Migrator};

pub(crate) async fn run(migrator: &Migrator, json: bool) -> Result<()> {
    let statuses = migrator.status().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else {
        print!("{}", render_table(&statuses));
    }
    Ok(())
}

fn state_label(state: MigrationState) -> &'static str {
    match state {
        MigrationState::Applied | MigrationState::Orphaned => "up",
        MigrationState::Pending => "down",
    }
}

pub(crate) fn render_table(statuses: &[MigrationStatus]) -> String {
    let mut out = format!("{:<8}  {:<14}  {}\n", "Status", "Migration ID", "Migration Name");
    out.push_str(&format!("{}\n", "-".repeat(50)));
    for status in statuses {
        let name = status.name.as_deref().unwrap_or("********** NO FILE **********");
        out.push_str(&format!("{:<8}  {:<14}  {}\n", state_label(status.state), status.version, name));
    }
    out
}
