//! Pre-flight validation of grid write batches
//!
//! Every record in an incoming create/update batch is checked against the
//! embedded row schema before anything touches storage. One malformed
//! record rejects the whole batch with a diagnostic naming the record and
//! the violation; nothing is silently coerced.

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{RelishError, RelishResult};

/// Validate a write batch against the review row schema.
///
/// Returns the verdict for the batch as a whole: `Ok(())` only when every
/// record conforms. Grid bookkeeping keys (phantom ids and the like) pass
/// through; a field carrying the wrong shape - an empty object where a
/// string belongs is the classic case - fails the batch.
pub fn validate_batch(records: &[Value]) -> RelishResult<()> {
    let schema_str = include_str!("../schema/review.schema.json");
    let schema_value: Value = serde_json::from_str(schema_str)?;

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|e| RelishError::Validation(format!("Failed to compile row schema: {}", e)))?;

    for (index, record) in records.iter().enumerate() {
        if let Err(errors) = compiled.validate(record) {
            // instance_path names the offending field ("/notes")
            let error_messages: Vec<String> = errors
                .map(|e| format!("  - {}: {}", e.instance_path, e))
                .collect();
            return Err(RelishError::Validation(format!(
                "record {} failed schema validation:\n{}",
                index,
                error_messages.join("\n")
            )));
        }
    }

    Ok(())
}
