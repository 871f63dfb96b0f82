// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! URL query parameter extraction
//!
//! Turns `?background=0.1,0.2,0.3&fps=[true,false,true]&lut=Cool` into a
//! name → value map. Nothing is validated here; [`crate::ViewerConfig`]
//! interprets the values and falls back to defaults.

use nom::{
    bytes::complete::take_while,
    character::complete::char,
    combinator::all_consuming,
    multi::separated_list0,
    sequence::delimited,
    IResult,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Parameters whose comma-delimited values are split into a list.
pub const MULTI_VALUE_KEYS: &[&str] = &["background", "fps"];

/// Short list of parameter values, inline up to four entries
pub type ParamList = SmallVec<[String; 4]>;

/// Value of a single URL parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Key present without a value: `?fps`
    Flag,
    /// `key=value`
    Single(String),
    /// Bracketed, repeated or comma-delimited multi-value key
    List(ParamList),
}

impl ParamValue {
    /// Classify a raw (already percent-decoded) value for `key`.
    fn classify(key: &str, raw: Option<String>) -> Self {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return ParamValue::Flag,
        };

        if let Ok((_, items)) = bracketed_list(&raw) {
            return ParamValue::List(
                items
                    .into_iter()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }

        if MULTI_VALUE_KEYS.contains(&key) && raw.contains(',') {
            return ParamValue::List(raw.split(',').map(|s| s.trim().to_string()).collect());
        }

        ParamValue::Single(raw)
    }

    /// Value as a single string. Lists yield their first item, flags nothing.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Flag => None,
            ParamValue::Single(value) => Some(value),
            ParamValue::List(items) => items.first().map(String::as_str),
        }
    }

    /// All values in order. A flag reads as the single value `"true"`.
    pub fn items(&self) -> SmallVec<[&str; 4]> {
        match self {
            ParamValue::Flag => smallvec::smallvec!["true"],
            ParamValue::Single(value) => smallvec::smallvec![value.as_str()],
            ParamValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    fn into_items(self) -> ParamList {
        match self {
            ParamValue::Flag => smallvec::smallvec!["true".to_string()],
            ParamValue::Single(value) => smallvec::smallvec![value],
            ParamValue::List(items) => items,
        }
    }

    /// Merge a repeated occurrence of the same key.
    fn accumulate(&mut self, next: ParamValue) {
        let previous = std::mem::replace(self, ParamValue::Flag);
        let mut items = previous.into_items();
        items.extend(next.into_items());
        *self = ParamValue::List(items);
    }
}

/// Parse a bracketed list: `[a, b, c]`
fn bracketed_list(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(delimited(
        char('['),
        separated_list0(char(','), take_while(|c: char| c != ',' && c != ']')),
        char(']'),
    ))(input)
}

/// Parameters extracted from the page URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParams {
    values: FxHashMap<String, ParamValue>,
}

impl UrlParams {
    /// Parse a query string. The leading `?` and any `#fragment` are ignored.
    /// Keys and values are form-decoded (`%XX` escapes, `+` as space).
    pub fn parse(query: &str) -> Self {
        let query = query.split('#').next().unwrap_or_default();
        let query = query.strip_prefix('?').unwrap_or(query);

        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), Some(value.into_owned())));

        Self::from_pairs(pairs)
    }

    /// Build from already-decoded `(key, value)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Option<String>)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            params.insert(key, value);
        }
        params
    }

    fn insert(&mut self, key: String, raw: Option<String>) {
        let value = ParamValue::classify(&key, raw);
        match self.values.get_mut(&key) {
            Some(existing) => existing.accumulate(value),
            None => {
                self.values.insert(key, value);
            }
        }
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    /// Whether `key` appeared in the query at all
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Single string value for `key`
    pub fn single(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(ParamValue::as_str)
    }

    /// Ordered values for `key`; empty when absent.
    pub fn values(&self, key: &str) -> SmallVec<[&str; 4]> {
        self.values
            .get(key)
            .map(ParamValue::items)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
