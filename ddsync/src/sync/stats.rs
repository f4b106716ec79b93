use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub deleted: usize,
}

impl PushStats {
    pub fn changed(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

impl fmt::Display for PushStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} updated={} skipped={} deleted={}",
            self.created, self.updated, self.skipped, self.deleted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_line_lists_every_counter() {
        let stats = PushStats {
            created: 1,
            updated: 2,
            skipped: 3,
            deleted: 4,
        };
        assert_eq!(
            stats.to_string(),
            "created=1 updated=2 skipped=3 deleted=4"
        );
        assert_eq!(stats.changed(), 7);
    }
}
