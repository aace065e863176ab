use collection_store::{RecordStore, UpsertRequest};
use serde_json::json;

fn main() -> Result<(), collection_store::Error> {
    let dir = std::env::temp_dir().join("collection_store_example_basic");
    let store = RecordStore::open(&dir)?;

    // upsert from a raw request body, or from typed parts
    store.upsert(
        "units",
        UpsertRequest::from_slice(br#"{"id": "u1", "item": {"hp": 10}}"#),
    )?;
    store.put("weapons", "rifle", json!({"damage": 4, "ammo": "7.62"}))?;
    println!("units   = {}", json!(store.get_all("units")?));
    println!("weapons = {}", json!(store.get_all("weapons")?));

    // overwrite, then delete (twice: the second is a no-op)
    store.put("units", "u1", json!({"hp": 3}))?;
    println!("removed = {}", store.delete("units", "u1")?);
    println!("removed = {}", store.delete("units", "u1")?);

    // unknown names are reported, not fatal
    if let Err(e) = store.get_all("spells") {
        println!("error   = {e}");
    }

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
