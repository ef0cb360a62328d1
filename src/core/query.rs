// src/core/query.rs

use crate::{constants::MODEL_QUERY_MARKER, models::QueryKind};
use std::fmt;
use thiserror::Error;

/// Why a model query could not be built.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// No model was given.
    #[error("Please choose a model.")]
    MissingModel,
    /// `Find` without an id.
    #[error("Finding by ID needs an ID.")]
    MissingId,
    /// `Custom` without an expression.
    #[error("A custom query needs an expression, e.g. where('active', 1)->get().")]
    MissingExpression,
    /// The choice index does not name a kind.
    #[error("Unknown query type '{0}'.")]
    UnknownKind(String),
}

impl QueryKind {
    /// Choice labels in the order used by [`QueryKind::from_choice`].
    pub const CHOICES: [&'static str; 5] = [
        "Get all (all())",
        "First (first())",
        "Find by ID (find())",
        "Count (count())",
        "Custom query",
    ];

    /// Builds a kind from a choice index and the free-text parameter field.
    pub fn from_choice(index: usize, params: &str) -> Result<Self, QueryError> {
        let params = params.trim();
        match index {
            0 => Ok(Self::All),
            1 => Ok(Self::First),
            2 if params.is_empty() => Err(QueryError::MissingId),
            2 => Ok(Self::Find(params.to_string())),
            3 => Ok(Self::Count),
            4 if params.is_empty() => Err(QueryError::MissingExpression),
            4 => Ok(Self::Custom(params.to_string())),
            other => Err(QueryError::UnknownKind(other.to_string())),
        }
    }

    /// Whether this kind needs the parameter field.
    pub fn needs_params(index: usize) -> bool {
        matches!(index, 2 | 4)
    }

    fn label(&self) -> &'static str {
        let index = match self {
            Self::All => 0,
            Self::First => 1,
            Self::Find(_) => 2,
            Self::Count => 3,
            Self::Custom(_) => 4,
        };
        Self::CHOICES.get(index).copied().unwrap_or_default()
    }
}

/// A canned query against one model, ready to be turned into PHP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelQuery {
    model: String,
    kind: QueryKind,
}

impl ModelQuery {
    /// Validates the model name and the parameters of `kind`.
    pub fn new(model: impl Into<String>, kind: QueryKind) -> Result<Self, QueryError> {
        let model = model.into().trim().to_string();
        if model.is_empty() {
            return Err(QueryError::MissingModel);
        }
        match &kind {
            QueryKind::Find(id) if id.trim().is_empty() => return Err(QueryError::MissingId),
            QueryKind::Custom(expr) if expr.trim().is_empty() => {
                return Err(QueryError::MissingExpression);
            }
            _ => {}
        }
        Ok(Self { model, kind })
    }

    /// The model class as given.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The query shape.
    pub fn kind(&self) -> &QueryKind {
        &self.kind
    }

    /// The PHP for this query, preceded by the marker comment that keeps the
    /// transformer from touching it.
    pub fn to_code(&self) -> String {
        let model = &self.model;
        let statement = match &self.kind {
            QueryKind::All => format!("echo formatOutput({model}::all());"),
            QueryKind::First => format!("echo formatOutput({model}::first());"),
            QueryKind::Find(id) => format!("echo formatOutput({model}::find({}));", id.trim()),
            QueryKind::Count => format!("echo 'Total: ' . {model}::count();"),
            QueryKind::Custom(expr) => format!("echo formatOutput({model}::{});", expr.trim()),
        };
        format!("{MODEL_QUERY_MARKER} {model}\n{statement}")
    }
}

impl fmt::Display for ModelQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.model, self.kind.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transformer::transform;
    use std::borrow::Cow;

    #[test]
    fn test_generated_code_per_kind() {
        let cases = [
            (QueryKind::All, "echo formatOutput(App\\Models\\User::all());"),
            (QueryKind::First, "echo formatOutput(App\\Models\\User::first());"),
            (
                QueryKind::Find("5".to_string()),
                "echo formatOutput(App\\Models\\User::find(5));",
            ),
            (QueryKind::Count, "echo 'Total: ' . App\\Models\\User::count();"),
            (
                QueryKind::Custom("where('active', 1)->get()".to_string()),
                "echo formatOutput(App\\Models\\User::where('active', 1)->get());",
            ),
        ];

        for (kind, statement) in cases {
            let code = ModelQuery::new("App\\Models\\User", kind).unwrap().to_code();
            assert_eq!(code, format!("// Model query: App\\Models\\User\n{}", statement));
        }
    }

    #[test]
    fn test_generated_code_is_not_transformed() {
        let code = ModelQuery::new("App\\Models\\Post", QueryKind::Count)
            .unwrap()
            .to_code();
        assert!(matches!(transform(&code), Cow::Borrowed(_)));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            ModelQuery::new("  ", QueryKind::All),
            Err(QueryError::MissingModel)
        );
        assert_eq!(
            ModelQuery::new("App\\Models\\User", QueryKind::Find(" ".to_string())),
            Err(QueryError::MissingId)
        );
        assert_eq!(
            ModelQuery::new("App\\Models\\User", QueryKind::Custom(String::new())),
            Err(QueryError::MissingExpression)
        );
    }

    #[test]
    fn test_from_choice() {
        assert_eq!(QueryKind::from_choice(0, ""), Ok(QueryKind::All));
        assert_eq!(QueryKind::from_choice(2, " 12 "), Ok(QueryKind::Find("12".to_string())));
        assert_eq!(QueryKind::from_choice(2, ""), Err(QueryError::MissingId));
        assert_eq!(QueryKind::from_choice(4, ""), Err(QueryError::MissingExpression));
        assert!(matches!(
            QueryKind::from_choice(9, ""),
            Err(QueryError::UnknownKind(_))
        ));
        assert!(QueryKind::needs_params(2));
        assert!(!QueryKind::needs_params(3));
    }

    #[test]
    fn test_display() {
        let query = ModelQuery::new("App\\Models\\User", QueryKind::First).unwrap();
        assert_eq!(query.to_string(), "App\\Models\\User (First (first()))");
    }
}
