//! Load a sheet, edit it in a session, and print what changed.
//!
//! Uses the in-memory remote so it runs without credentials; swap in a
//! real `RemoteTable` implementation to talk to a live service.

use anyhow::Result;
use sheetsync_core::{CellValue, InMemoryRemote, SheetLocation, Snapshot};

fn main() -> Result<()> {
    let remote = InMemoryRemote::new();
    let location = SheetLocation::new("demo-book", "inventory");
    remote.seed(
        &location,
        &[
            &["sku", "name", "stock"],
            &["A-001", "widget", "12"],
            &["A-002", "sprocket", "0"],
        ],
    );

    let snapshot = Snapshot::load(remote.clone(), "demo-book", "inventory")?;
    println!("loaded:\n{}", snapshot.head(10));

    snapshot.update(|table| {
        table.set(1, "stock", 40.0);
        table.set(0, "discontinued", false);
        table.set(1, "discontinued", false);
        Ok(())
    })?;

    println!("after commit:\n{}", snapshot.head(10));
    println!(
        "remote batches issued: {} (header D1 = {})",
        remote.write_calls(),
        remote.cell(&location, 0, 3)
    );

    // A no-op session costs nothing.
    snapshot.update(|_| Ok(()))?;
    assert_eq!(remote.write_calls(), 1);
    assert_eq!(
        remote.cell(&location, 2, 2),
        CellValue::Number(40.0),
        "C3 should hold the new stock level"
    );

    Ok(())
}
