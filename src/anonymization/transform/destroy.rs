//! Constant replacement

/// Overwrites every cell, nulls included, with a fixed string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyTransform {
    replace_with: String,
}

impl DestroyTransform {
    pub fn new(replace_with: impl Into<String>) -> Self {
        Self {
            replace_with: replace_with.into(),
        }
    }

    pub fn replacement(&self) -> &str {
        &self.replace_with
    }
}

impl Default for DestroyTransform {
    fn default() -> Self {
        Self::new("CONFIDENTIAL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_replacement() {
        assert_eq!(DestroyTransform::default().replacement(), "CONFIDENTIAL");
        assert_eq!(DestroyTransform::new("XXX").replacement(), "XXX");
    }
}
