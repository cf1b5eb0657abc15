//! Demo: hand the active document from one workspace to another.
//!
//! Two in-memory workspaces play the two browser tabs of a share: the
//! sender opens a session and prints its share link, the receiver parses
//! the link and pulls the document in.

use snippet_sdk::handoff::MemoryRendezvous;
use snippet_sdk::{Result, Workspace, WorkspaceConfig, WorkspaceConfigBuilder};

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async_main()).unwrap();
}

async fn async_main() -> Result<()> {
    let broker = MemoryRendezvous::new();

    // Sender side: a workspace with an edited document.
    let config: WorkspaceConfig = WorkspaceConfigBuilder::new()
        .origin("http://localhost:3000")
        .build();
    let mut alice = Workspace::in_memory(config)?;
    let id = alice.registry().active_id().clone();
    alice.registry_mut().rename(&id, "Launch Notes")?;
    alice.registry_mut().update_content(
        &id,
        "<h1>Launch Notes</h1><p>Ship the <strong>handoff</strong> demo.</p>",
    )?;

    let counts = alice.active_counts()?;
    println!(
        "sender: \"{}\" ({} words, {} characters)",
        alice.registry().active()?.name,
        counts.words,
        counts.characters
    );

    let share = alice.share_active(broker.endpoint()).await?;
    let url = share.link().url();
    println!("sender: share link {url}");

    let mut status = share.status();
    let watcher = tokio::spawn(async move {
        loop {
            let current = status.borrow().clone();
            println!("sender: status {current}");
            if current.is_terminal() || status.changed().await.is_err() {
                break;
            }
        }
    });
    let sender = tokio::spawn(share.send());

    // Receiver side: a second workspace follows the link.
    let mut bob = Workspace::in_memory(WorkspaceConfig::default())?;
    let received_id = bob.receive(broker.endpoint(), &url).await?;
    sender.await.unwrap()?;
    watcher.await.unwrap();

    let received = match bob.registry().get(&received_id) {
        Some(doc) => doc,
        None => unreachable!("received document is registered"),
    };
    println!(
        "receiver: got \"{}\" ({} documents total)",
        received.name,
        bob.registry().len()
    );

    let export = bob.export_active_markdown()?;
    println!("receiver: exported {}", export.file_name);
    println!("{}", export.markdown);

    Ok(())
}
