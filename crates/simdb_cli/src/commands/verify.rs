//! Verify command implementation.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Verification result.
#[derive(Debug, Default)]
pub struct VerifyResult {
    /// Number of records checked.
    pub records_checked: usize,
    /// Number of records with a unique identity.
    pub valid_records: usize,
    /// Identities carried by more than one record.
    pub duplicate_ids: Vec<i64>,
    /// List of errors found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.duplicate_ids.is_empty() && self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(path: &Path, entry: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match entry {
        Some(entry) => println!("Verifying {entry} in {:?}", path),
        None => println!("Verifying {:?}", path),
    }
    println!();

    let envelope = super::load_document(path, entry)?;
    let result = verify_records(&envelope.records);
    print_result(&result);

    println!();
    if result.is_ok() {
        println!("✓ Document verification passed");
        Ok(())
    } else {
        println!("✗ Document verification failed");
        Err("Verification failed".into())
    }
}

/// Checks that every record carries an integer `id` (any case) and that no
/// identity repeats.
///
/// Only the first repeat of an identity is reported as an error; later ones
/// are counted in `duplicate_ids` once.
pub fn verify_records(records: &[Value]) -> VerifyResult {
    let mut result = VerifyResult::default();
    let mut first_seen: HashMap<i64, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        result.records_checked += 1;

        let Some(id) = identity_of(record) else {
            result
                .errors
                .push(format!("Record {index} has no integer identity"));
            continue;
        };

        match first_seen.get(&id) {
            Some(&first) => {
                if !result.duplicate_ids.contains(&id) {
                    result.duplicate_ids.push(id);
                    result.errors.push(format!(
                        "Record {index} repeats identity {id} of record {first}"
                    ));
                }
            }
            None => {
                first_seen.insert(id, index);
                result.valid_records += 1;
            }
        }
    }

    result
}

fn identity_of(record: &Value) -> Option<i64> {
    record
        .as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("id"))
        .and_then(|(_, value)| value.as_i64())
}

fn print_result(result: &VerifyResult) {
    println!("  Records checked: {}", result.records_checked);
    println!("  Unique records:  {}", result.valid_records);
    println!("  Duplicate ids:   {}", result.duplicate_ids.len());

    if !result.errors.is_empty() {
        println!("  Errors:");
        for error in &result.errors {
            println!("    - {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unique_identities_pass() {
        let records = vec![json!({ "id": 1 }), json!({ "ID": 2 }), json!({ "Id": 3 })];

        let result = verify_records(&records);
        assert!(result.is_ok());
        assert_eq!(result.records_checked, 3);
        assert_eq!(result.valid_records, 3);
    }

    #[test]
    fn repeated_identity_is_reported_once() {
        let records = vec![
            json!({ "id": 7, "name": "first" }),
            json!({ "id": 7, "name": "second" }),
            json!({ "id": 7, "name": "third" }),
            json!({ "id": 8 }),
        ];

        let result = verify_records(&records);
        assert!(!result.is_ok());
        assert_eq!(result.duplicate_ids, vec![7]);
        assert_eq!(result.valid_records, 2);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("record 0"));
    }

    #[test]
    fn missing_identity_is_an_error() {
        let records = vec![json!({ "name": "anon" }), json!({ "id": "seven" }), json!(3)];

        let result = verify_records(&records);
        assert_eq!(result.errors.len(), 3);
        assert_eq!(result.valid_records, 0);
    }

    #[test]
    fn empty_document_passes() {
        assert!(verify_records(&[]).is_ok());
    }
}
