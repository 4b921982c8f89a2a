use anyhow::Result;
use helpdesk_storage::Migrator;

pub(crate) async fn run(migrator: &Migrator, steps: u32) -> Result<()> {
    let reverted = migrator.down(usize::try_from(steps)?).await?;
    if reverted.is_empty() {
        println!("Nothing to revert.");
    }
    for version in reverted {
        println!("reverted {version}");
    }
    Ok(())
}
