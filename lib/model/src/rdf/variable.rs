use crate::InvalidTermValue;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const ANY_NAME: &str = "_";

static VARIABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+$").unwrap()
});

/// A [SPARQL query](https://www.w3.org/TR/sparql11-query/) variable or an anonymous wildcard.
///
/// A variable without a name (see [Variable::any]) matches anything and is only equal to other
/// anonymous variables.
///
/// ```
/// use rdf_memo_model::Variable;
///
/// assert_eq!("?foo", Variable::new("foo")?.to_string());
/// assert_eq!("?_", Variable::any().to_string());
/// # Result::<_, rdf_memo_model::InvalidTermValue>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Variable {
    name: Option<String>,
}

impl Variable {
    /// Creates a variable name from a unique identifier.
    ///
    /// The name `_` is reserved for the anonymous wildcard.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidTermValue> {
        let name = name.into();
        if name == ANY_NAME {
            Ok(Self::any())
        } else if VARIABLE_NAME.is_match(&name) {
            Ok(Self { name: Some(name) })
        } else {
            Err(InvalidTermValue::VariableName(name))
        }
    }

    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Creates the anonymous wildcard pattern.
    pub fn any() -> Self {
        Self { name: None }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Variable {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "?{name}"),
            None => write!(f, "?{ANY_NAME}"),
        }
    }
}
