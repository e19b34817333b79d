use uuid::Uuid;

/// Source of the `uuid` stamped on every exported object. Identifiers use the
/// 8-4-4-4-12 lowercase hex grouping.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random version 4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `00000000-0000-0000-0000-000000000001`, `...002`, and so on.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    issued: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        self.issued += 1;
        format!("00000000-0000-0000-0000-{:012x}", self.issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouping(id: &str) -> Vec<usize> {
        id.split('-').map(str::len).collect()
    }

    #[test]
    fn ids_use_canonical_grouping() {
        let id = RandomIds.next_id();
        assert_eq!(grouping(&id), vec![8, 4, 4, 4, 12]);
        assert!(id.chars().all(|c| c == '-' || matches!(c, '0'..='9' | 'a'..='f')));

        let mut seq = SequentialIds::new();
        assert_eq!(seq.next_id(), "00000000-0000-0000-0000-000000000001");
        assert_eq!(grouping(&seq.next_id()), vec![8, 4, 4, 4, 12]);
    }
}
