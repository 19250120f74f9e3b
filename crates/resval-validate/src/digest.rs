use resval_core::Resolution;
use sha2::{Digest, Sha256};

/// SHA-256 over the JSON encoding of the records, in input order.
///
/// Field order is fixed by the struct definition, so equal inputs always
/// encode to equal bytes.
pub fn input_digest(records: &[Resolution]) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(records)?;
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_input_sensitive() {
        let a = vec![Resolution::new("1").with_number("R-0001-2025")];
        let b = vec![Resolution::new("1").with_number("R-0002-2025")];
        let h1 = input_digest(&a).unwrap();
        assert_eq!(h1, input_digest(&a).unwrap());
        assert_eq!(h1.len(), 64);
        assert_ne!(h1, input_digest(&b).unwrap());
    }
}
