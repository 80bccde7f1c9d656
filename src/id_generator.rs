/// Produces ids of the form `{prefix}-{n}` from a monotonically increasing
/// counter, skipping any id that is already taken.
///
/// Loaded documents may contain ids the counter never produced (including
/// timestamp-based ones), so every candidate is checked before it is handed
/// out.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = format!("{prefix}-{}", self.next);
            self.next += 1;
            if !is_taken(&candidate) {
                return candidate;
            }
        }
    }
}
