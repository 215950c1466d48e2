//! Query specification: the parameters attached to a read request.
//!
//! # Encoding
//! `to_query_pairs` produces ordered `(key, value)` pairs:
//!
//! | member      | key                | value                                  |
//! |-------------|--------------------|----------------------------------------|
//! | `fields`    | `fields`           | comma-joined                           |
//! | `filter`    | `filter`           | JSON                                   |
//! | `search`    | `search`           | as-is                                  |
//! | `sort`      | `sort`             | comma-joined, `-` prefix for DESC      |
//! | `limit` ..  | `limit`/`offset`/`page` | decimal                           |
//! | `deep`      | `deep`             | JSON, nested specs fully encoded       |
//! | `aggregate` | `aggregate[<fn>]`  | target field                           |
//! | `group_by`  | `group_by`         | comma-joined                           |
//! | `aliases`   | `alias`            | JSON object `{alias: original}`        |
//! | `meta`      | `meta`             | comma-joined                           |
//! | `lang`      | `lang`             | as-is                                  |
//!
//! Empty members are omitted. Zero is not a valid limit, offset or page and
//! is treated as unset. A filter that constrains nothing (`Filter::is_empty`,
//! e.g. `{}` or `{"_not":{}}`) is omitted.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use super::filter::Filter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parses the wire form: `-field` is descending, anything else ascending.
impl From<&str> for Sort {
    fn from(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Sort::desc(field),
            None => Sort::asc(raw),
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => f.write_str(&self.field),
            SortDirection::Desc => write!(f, "-{}", self.field),
        }
    }
}

/// Server-side aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Aggregate {
    Count,
    CountDistinct,
    Sum,
    SumDistinct,
    Avg,
    AvgDistinct,
    Min,
    Max,
}

impl Aggregate {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::CountDistinct => "countDistinct",
            Aggregate::Sum => "sum",
            Aggregate::SumDistinct => "sumDistinct",
            Aggregate::Avg => "avg",
            Aggregate::AvgDistinct => "avgDistinct",
            Aggregate::Min => "min",
            Aggregate::Max => "max",
        }
    }
}

/// Parameters of one read request. Built with `QueryBuilder` or filled in
/// directly; encoded with `to_query_pairs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub fields: Vec<String>,
    pub filter: Option<Filter>,
    pub search: Option<String>,
    pub sort: Vec<Sort>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub page: Option<u64>,
    /// Relation field name to the query applied to that relation.
    pub deep: BTreeMap<String, QuerySpec>,
    /// One target field per function; a later entry for the same function
    /// replaces the earlier one.
    pub aggregate: BTreeMap<Aggregate, String>,
    pub group_by: Vec<String>,
    /// Original field name to output alias.
    pub aliases: BTreeMap<String, String>,
    /// Metadata counters to return in the response `meta`, e.g. `total_count`.
    pub meta: Vec<String>,
    /// Language code for translation fields, e.g. `en-US`.
    pub lang: Option<String>,
}

impl QuerySpec {
    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }

    fn active_filter(&self) -> Option<&Filter> {
        self.filter.as_ref().filter(|f| !f.is_empty())
    }

    fn active_search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: String| pairs.push((key.to_string(), value));

        if !self.fields.is_empty() {
            push("fields", self.fields.join(","));
        }
        if let Some(filter) = self.active_filter() {
            push("filter", filter.to_value().to_string());
        }
        if let Some(search) = self.active_search() {
            push("search", search.to_string());
        }
        if !self.sort.is_empty() {
            push("sort", join_sort(&self.sort));
        }
        if let Some(limit) = positive(self.limit) {
            push("limit", limit.to_string());
        }
        if let Some(offset) = positive(self.offset) {
            push("offset", offset.to_string());
        }
        if let Some(page) = positive(self.page) {
            push("page", page.to_string());
        }
        if !self.deep.is_empty() {
            push("deep", Value::Object(self.deep_relations()).to_string());
        }
        for (function, field) in &self.aggregate {
            push(&format!("aggregate[{}]", function.as_str()), field.clone());
        }
        if !self.group_by.is_empty() {
            push("group_by", self.group_by.join(","));
        }
        if !self.aliases.is_empty() {
            push("alias", Value::Object(self.alias_object()).to_string());
        }
        if !self.meta.is_empty() {
            push("meta", self.meta.join(","));
        }
        if let Some(lang) = self.lang.as_deref().filter(|l| !l.is_empty()) {
            push("lang", lang.to_string());
        }
        pairs
    }

    /// Encoding of this spec as the value of a `deep` entry: every parameter
    /// under its `_`-prefixed name, nested relations under their own names.
    pub fn to_deep_value(&self) -> Value {
        let mut node = Map::new();
        if !self.fields.is_empty() {
            node.insert("_fields".to_string(), string_array(&self.fields));
        }
        if let Some(filter) = self.active_filter() {
            node.insert("_filter".to_string(), filter.to_value());
        }
        if let Some(search) = self.active_search() {
            node.insert("_search".to_string(), Value::from(search));
        }
        if !self.sort.is_empty() {
            let sort: Vec<Value> = self.sort.iter().map(|s| Value::from(s.to_string())).collect();
            node.insert("_sort".to_string(), Value::Array(sort));
        }
        if let Some(limit) = positive(self.limit) {
            node.insert("_limit".to_string(), Value::from(limit));
        }
        if let Some(offset) = positive(self.offset) {
            node.insert("_offset".to_string(), Value::from(offset));
        }
        if let Some(page) = positive(self.page) {
            node.insert("_page".to_string(), Value::from(page));
        }
        if !self.aggregate.is_empty() {
            let aggregate: Map<String, Value> = self
                .aggregate
                .iter()
                .map(|(function, field)| (function.as_str().to_string(), Value::from(field.as_str())))
                .collect();
            node.insert("_aggregate".to_string(), Value::Object(aggregate));
        }
        if !self.group_by.is_empty() {
            node.insert("_group_by".to_string(), string_array(&self.group_by));
        }
        if !self.aliases.is_empty() {
            node.insert("_alias".to_string(), Value::Object(self.alias_object()));
        }
        node.extend(self.deep_relations());
        Value::Object(node)
    }

    fn deep_relations(&self) -> Map<String, Value> {
        self.deep
            .iter()
            .map(|(relation, nested)| (relation.clone(), nested.to_deep_value()))
            .collect()
    }

    fn alias_object(&self) -> Map<String, Value> {
        self.aliases
            .iter()
            .map(|(original, alias)| (alias.clone(), Value::from(original.as_str())))
            .collect()
    }
}

fn positive(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v > 0)
}

fn join_sort(sort: &[Sort]) -> String {
    sort.iter().map(Sort::to_string).collect::<Vec<_>>().join(",")
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().map(|v| Value::from(v.as_str())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_spec_encodes_nothing() {
        assert!(QuerySpec::default().to_query_pairs().is_empty());
        assert!(QuerySpec::default().is_empty());
    }

    #[test]
    fn zero_pagination_is_unset() {
        let spec = QuerySpec {
            limit: Some(0),
            offset: Some(0),
            page: Some(0),
            search: Some(String::new()),
            filter: Some(Filter::and(Vec::new())),
            ..QuerySpec::default()
        };
        assert!(spec.to_query_pairs().is_empty());
    }

    #[test]
    fn members_encode_in_order() {
        let mut spec = QuerySpec {
            fields: vec!["id".into(), "author.first_name".into()],
            filter: Some(Filter::equal("status", "published")),
            search: Some("rust".into()),
            sort: vec![Sort::desc("date"), Sort::asc("title")],
            limit: Some(10),
            offset: Some(20),
            page: Some(3),
            group_by: vec!["author".into(), "year".into()],
            meta: vec!["total_count".into(), "filter_count".into()],
            lang: Some("de-DE".into()),
            ..QuerySpec::default()
        };
        spec.aggregate.insert(Aggregate::Sum, "views".into());
        spec.aggregate.insert(Aggregate::Count, "id".into());
        spec.aliases.insert("author".into(), "written_by".into());

        assert_eq!(
            spec.to_query_pairs(),
            owned(&[
                ("fields", "id,author.first_name"),
                ("filter", r#"{"status":{"_eq":"published"}}"#),
                ("search", "rust"),
                ("sort", "-date,title"),
                ("limit", "10"),
                ("offset", "20"),
                ("page", "3"),
                ("aggregate[count]", "id"),
                ("aggregate[sum]", "views"),
                ("group_by", "author,year"),
                ("alias", r#"{"written_by":"author"}"#),
                ("meta", "total_count,filter_count"),
                ("lang", "de-DE"),
            ])
        );
    }

    #[test]
    fn filter_that_constrains_nothing_is_omitted() {
        let spec = QuerySpec {
            filter: Some(Filter::not(Filter::and(Vec::new()))),
            lang: Some(String::new()),
            ..QuerySpec::default()
        };
        assert!(spec.to_query_pairs().is_empty());
    }

    #[test]
    fn deep_is_recursive_not_flattened() {
        let mut languages = QuerySpec {
            filter: Some(Filter::equal("code", "en-US")),
            ..QuerySpec::default()
        };
        languages.limit = Some(1);

        let mut translations = QuerySpec {
            fields: vec!["title".into()],
            sort: vec![Sort::desc("date_updated")],
            limit: Some(3),
            ..QuerySpec::default()
        };
        translations.deep.insert("languages_code".into(), languages);

        let mut spec = QuerySpec::default();
        spec.deep.insert("translations".into(), translations);

        let encoded = spec.to_query_pairs();
        assert_eq!(encoded.len(), 1);
        assert_eq!(encoded[0].0, "deep");
        let deep: Value = serde_json::from_str(&encoded[0].1).unwrap();
        assert_eq!(
            deep,
            json!({
                "translations": {
                    "_fields": ["title"],
                    "_sort": ["-date_updated"],
                    "_limit": 3,
                    "languages_code": {
                        "_filter": {"code": {"_eq": "en-US"}},
                        "_limit": 1
                    }
                }
            })
        );
    }

    #[test]
    fn sort_wire_form_parses_back() {
        assert_eq!(Sort::from("-date"), Sort::desc("date"));
        assert_eq!(Sort::from("title"), Sort::asc("title"));
        assert_eq!(Sort::desc("date").to_string(), "-date");
    }
}
