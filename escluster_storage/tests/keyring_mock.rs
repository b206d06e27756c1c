use escluster_core::{credential_key, CredentialStore, Credentials};
use escluster_storage::KeyringCredentialStore;

// The mock backend hands out an independent credential per `Entry`, so this
// only checks how "nothing stored" is mapped, not persistence across calls.
#[test]
fn absent_entries_read_as_none_and_delete_cleanly() -> anyhow::Result<()> {
    keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
    let store = KeyringCredentialStore::new();
    let key = credential_key("never-saved");

    assert_eq!(store.get(&key)?, None);
    store.delete(&key)?;
    store.put(&key, &Credentials::new("admin", "s3cr3t"))?;
    Ok(())
}
