// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Application identity and its `name:namespace` resource id form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HarbormasterError;

/// The `(name, namespace)` pair addressing a single Application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity {
    pub name: String,
    pub namespace: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.namespace)
    }
}

impl FromStr for Identity {
    type Err = HarbormasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, namespace)) = s.split_once(':') else {
            return Err(HarbormasterError::InvalidResourceId(s.to_string()));
        };

        if name.is_empty() || namespace.is_empty() || namespace.contains(':') {
            return Err(HarbormasterError::InvalidResourceId(s.to_string()));
        }

        Ok(Identity::new(name, namespace))
    }
}

impl TryFrom<String> for Identity {
    type Error = HarbormasterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.to_string()
    }
}
