use serde::{Deserialize, Serialize};

/// What a query is asking for. Drives the retrieval weight table and
/// whether graph expansion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// "Section 17", "Article 21", "Order 7 Rule 11".
    StatuteLookup,
    /// "Smith v. Jones", reporter citations.
    CaseLookup,
    /// "What is adverse possession".
    Definition,
    /// "How to file an appeal".
    Procedure,
    /// "Compare X and Y", "difference between".
    Comparison,
    /// Open question about what the law says on a set of facts.
    Factual,
    /// "What if", "suppose".
    Hypothetical,
    #[default]
    General,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Self::StatuteLookup,
        Self::CaseLookup,
        Self::Definition,
        Self::Procedure,
        Self::Comparison,
        Self::Factual,
        Self::Hypothetical,
        Self::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StatuteLookup => "statute_lookup",
            Self::CaseLookup => "case_lookup",
            Self::Definition => "definition",
            Self::Procedure => "procedure",
            Self::Comparison => "comparison",
            Self::Factual => "factual",
            Self::Hypothetical => "hypothetical",
            Self::General => "general",
        }
    }

    /// Lookups are answered by exact references; keyword matching dominates.
    pub fn is_lookup(self) -> bool {
        matches!(self, Self::StatuteLookup | Self::CaseLookup)
    }

    /// Intents that benefit from multi-hop graph expansion.
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            Self::Comparison | Self::Factual | Self::Hypothetical | Self::Procedure
        )
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
