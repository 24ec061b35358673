//! Basic usage example for `phivault`.

use phivault::prelude::*;
use serde_json::{json, Map, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("phivault Basic Usage Example");
    println!("============================\n");

    // Provision a fresh key (in production this comes from configuration)
    let key_hex = generate_key_hex();
    assert!(is_strong(&key_hex));
    let key = KeyMaterial::load(Some(&key_hex), Some("1"))?;
    println!("✓ Key material loaded (version {})\n", key.version());

    // Encrypt a whole record
    let patient = json!({
        "patientId": "p-1001",
        "name": "Alice Example",
        "ssn": "123-45-6789",
    });

    let records = RecordCipher::new(AesGcmProvider);
    let record = records.encrypt(&key, &patient)?;
    println!("✓ Record encrypted with {} at {}", record.algorithm, record.encrypted_at);

    let recovered: Value = records.decrypt(&key, &record)?;
    assert_eq!(recovered, patient);
    println!("✓ Record round-trip verified\n");

    // Encrypt a single column value
    let fields = FieldCipher::new(AesGcmProvider);
    let encoded = fields.encrypt_field(&key, Some("555-0134"))?.unwrap();
    println!("✓ Field encrypted ({} hex chars)", encoded.len());

    let phone = fields.decrypt_field(&key, Some(&encoded))?.unwrap();
    assert_eq!(phone, "555-0134");
    println!("✓ Field round-trip verified\n");

    // Index token for equality search, stored alongside the ciphertext
    let token = hash_for_index(&AesGcmProvider, &key, "555-0134")?;
    let token_again = hash_for_index(&AesGcmProvider, &key, "555-0134")?;
    assert_eq!(token, token_again);
    println!("✓ Index token (hex): {token}\n");

    // Bulk encryption over the sensitive subset of a document
    let codec = BulkFieldCodec::new(AesGcmProvider);
    let document: Map<String, Value> = patient.as_object().unwrap().clone();
    let protected = codec.encrypt_fields(&key, &document, &["name", "ssn"])?;
    println!("✓ Bulk-encrypted document: {}", serde_json::to_string_pretty(&protected)?);

    let restored = codec.decrypt_fields(&key, &protected, &["name", "ssn"])?;
    assert_eq!(restored["ssn"], json!("123-45-6789"));
    println!("✓ Bulk round-trip verified\n");

    // Retention-tracked backup envelope
    let backups = RetentionBackupBuilder::new(AesGcmProvider);
    let mut metadata = Map::new();
    metadata.insert("source".to_string(), json!("example"));
    let envelope = backups.create_backup(&key, &patient, metadata)?;
    println!("✓ Backup {} retained until {}", envelope.backup_id, envelope.retention_until);

    println!("\n============================");
    println!("All operations successful!");

    Ok(())
}
