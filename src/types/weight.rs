// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;

/// A word's sampling weight. Always positive and finite.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Serialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    /// The weight of a word that has never been answered.
    pub const BASELINE: Weight = Weight(1.0);

    /// The largest representable weight.
    pub const MAX: Weight = Weight(f64::MAX);

    pub fn new(value: f64) -> Fallible<Self> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(ErrorReport::with_kind(
                ErrorKind::InvalidWeight,
                format!("invalid weight: {value}"),
            ))
        }
    }

    /// Replace anything that would break proportional sampling with the
    /// baseline weight.
    pub fn sanitize(value: f64) -> Self {
        Self::new(value).unwrap_or(Self::BASELINE)
    }

    pub fn is_valid(value: f64) -> bool {
        value.is_finite() && value > 0.0
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored weights are read leniently: a missing, null, or invalid weight
/// becomes the baseline.
impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<f64> = Option::deserialize(deserializer)?;
        Ok(value.map(Weight::sanitize).unwrap_or_default())
    }
}

impl ToSql for Weight {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}
