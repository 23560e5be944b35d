use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;
use uuid::Uuid;

fn hash_with_seed<T: Serialize>(data: &T, seed: u64) -> Result<u64, String> {
    let mut hasher = XxHash64::with_seed(seed);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish())
}

/// Derives a stable UUID from serializable data.
///
/// Two XxHash64 passes with different seeds fill the 128 bits, so the same
/// hook inputs always produce the same instruction ids.
pub fn hash_as_uuid<T: Serialize>(data: &T) -> Result<Uuid, String> {
    let high = hash_with_seed(data, 0)?;
    let low = hash_with_seed(data, 1)?;
    Ok(Uuid::from_u128(((high as u128) << 64) | low as u128))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_halves_use_different_seeds() -> Result<(), String> {
        let id = hash_as_uuid(&("account", "ACCRUE", 1))?;
        let (high, low) = ((id.as_u128() >> 64) as u64, id.as_u128() as u64);
        assert_ne!(high, low);
        assert_eq!(high, hash_with_seed(&("account", "ACCRUE", 1), 0)?);
        Ok(())
    }

    #[test]
    fn test_uuid_is_stable() {
        let first = hash_as_uuid(&"batch-1").unwrap();
        assert_eq!(first, hash_as_uuid(&"batch-1").unwrap());
        assert_ne!(first, hash_as_uuid(&"batch-2").unwrap());
    }
}
