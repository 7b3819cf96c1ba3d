//! Live adapter for the `IdGenerator` port.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Live ID generator that produces random UUIDs.
pub struct LiveIdGenerator;

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_unique_ids() {
        let ids = LiveIdGenerator;
        let id1 = ids.generate_id();
        let id2 = ids.generate_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36); // UUID format: 8-4-4-4-12
    }
}
