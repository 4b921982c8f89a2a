use anyhow::Result;
use helpdesk_storage::Migrator;

pub(crate) async fn run(migrator: &Migrator) -> Result<()> {
    let applied = migrator.up().await?;
    if applied.is_empty() {
        println!("Schema is up to date.");
    }
    for version in applied {
        println!("applied {version}");
    }
    Ok(())
}
