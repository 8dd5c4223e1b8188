/*!
Variable sets and parsed parameter records.

[`Variables`] is the declaration side: label -> parameter, owned by a command.
[`Matches`] is the per-invocation result: label -> value, seeded from the
declared defaults and overwritten by whatever the user supplied.
*/

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::param::{BooleanParam, ChoiceParam, IntegerParam, Parameter, StringParam, Value};

/// Named parameters declared on a command.
///
/// Labels are unique; declaring an existing label fails with
/// `Error::DuplicateParameter` and leaves the set unchanged.
#[derive(Debug, Default)]
pub struct Variables {
    parameters: BTreeMap<String, Box<dyn Parameter>>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register any parameter kind.
    pub fn declare(mut self, parameter: impl Parameter + 'static) -> Result<Self> {
        self.insert(Box::new(parameter))?;
        Ok(self)
    }

    /// Register a boxed parameter in place.
    pub fn insert(&mut self, parameter: Box<dyn Parameter>) -> Result<()> {
        let label = parameter.label().to_string();
        if self.parameters.contains_key(&label) {
            return Err(Error::DuplicateParameter { label });
        }
        self.parameters.insert(label, parameter);
        Ok(())
    }

    pub fn string(
        self,
        label: impl Into<String>,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        self.declare(StringParam::new(label, default, description))
    }

    pub fn integer(
        self,
        label: impl Into<String>,
        default: i64,
        description: impl Into<String>,
    ) -> Result<Self> {
        self.declare(IntegerParam::new(label, default, description))
    }

    pub fn boolean(
        self,
        label: impl Into<String>,
        default: bool,
        description: impl Into<String>,
    ) -> Result<Self> {
        self.declare(BooleanParam::new(label, default, description))
    }

    pub fn choice<I, S>(
        self,
        label: impl Into<String>,
        choices: I,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(ChoiceParam::new(label, choices, default, description))
    }

    /// A fresh record holding every declared default.
    pub fn reset_all_to_default(&self) -> Matches {
        let mut out = Matches::default();
        for p in self.parameters.values() {
            p.reset_to_default(&mut out);
        }
        out
    }

    pub fn get(&self, label: &str) -> Option<&dyn Parameter> {
        self.parameters.get(label).map(|p| &**p)
    }

    /// Parameters in label order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Parameter> {
        self.parameters.values().map(|p| &**p)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Greedy-prefix parse: consume `label value` pairs while the first
    /// remaining word is a declared label, stopping at the first word that
    /// is not. Returns the record and the positional tail.
    pub fn parse<'w>(&self, words: &'w [String]) -> Result<(Matches, &'w [String])> {
        let mut out = self.reset_all_to_default();
        let mut rest = words;
        while let Some((first, tail)) = rest.split_first() {
            let Some(p) = self.parameters.get(first) else {
                break;
            };
            rest = p.consume(tail, &mut out)?;
            tracing::trace!(label = %first, "parameter consumed");
        }
        Ok((out, rest))
    }
}

/// Parsed parameter values for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matches {
    values: BTreeMap<String, Value>,
    #[serde(skip)]
    explicit: BTreeSet<String>,
}

impl Matches {
    /// Record a user-supplied value.
    pub fn set(&mut self, label: &str, value: Value) {
        self.values.insert(label.to_string(), value);
        self.explicit.insert(label.to_string());
    }

    /// Record a default; clears any explicit mark for `label`.
    pub fn set_default(&mut self, label: &str, value: Value) {
        self.values.insert(label.to_string(), value);
        self.explicit.remove(label);
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.values.get(label)
    }

    pub fn get_str(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(Value::as_str)
    }

    pub fn get_i64(&self, label: &str) -> Option<i64> {
        self.get(label).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, label: &str) -> Option<bool> {
        self.get(label).and_then(Value::as_bool)
    }

    /// Whether `label` was given on the command line rather than defaulted.
    pub fn is_explicit(&self, label: &str) -> bool {
        self.explicit.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
