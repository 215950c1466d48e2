//! Evaluation of Directus query parameters against in-memory items.
//!
//! Covers the subset the client emits for top-level item queries: filter
//! rules, `search`, `sort`, `limit`/`offset`/`page`, `fields` projection and
//! `meta`. Dotted paths in filters and sort keys walk nested objects; in
//! `fields` they keep the top-level key.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{Map, Value};

pub type Item = Map<String, Value>;

/// Directus' default page size when no `limit` is given.
pub const DEFAULT_LIMIT: usize = 100;

/// Parsed list parameters of one request.
#[derive(Debug, Default)]
pub struct ListQuery {
    pub fields: Vec<String>,
    pub filter: Option<Value>,
    pub search: Option<String>,
    pub sort: Vec<(String, bool)>,
    /// `None` means everything (`limit=-1`).
    pub limit: Option<usize>,
    pub offset: usize,
    pub meta: Vec<String>,
}

impl ListQuery {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, String> {
        let mut query = ListQuery {
            limit: Some(DEFAULT_LIMIT),
            ..ListQuery::default()
        };

        if let Some(fields) = params.get("fields") {
            query.fields = split_list(fields);
        }
        if let Some(raw) = params.get("filter") {
            let filter: Value =
                serde_json::from_str(raw).map_err(|e| format!("Invalid JSON in filter: {e}"))?;
            if !filter.is_object() {
                return Err("Filter must be an object".to_string());
            }
            query.filter = Some(filter);
        }
        query.search = params.get("search").filter(|s| !s.is_empty()).cloned();
        if let Some(sort) = params.get("sort") {
            query.sort = split_list(sort)
                .into_iter()
                .map(|key| match key.strip_prefix('-') {
                    Some(field) => (field.to_string(), true),
                    None => (key, false),
                })
                .collect();
        }
        if let Some(limit) = params.get("limit") {
            let limit: i64 = limit
                .parse()
                .map_err(|_| format!("\"limit\" has to be a number, got {limit:?}"))?;
            query.limit = usize::try_from(limit).ok();
        }
        if let Some(offset) = params.get("offset") {
            query.offset = offset
                .parse()
                .map_err(|_| format!("\"offset\" has to be a non-negative number, got {offset:?}"))?;
        }
        if let Some(page) = params.get("page") {
            let page: usize = page
                .parse()
                .map_err(|_| format!("\"page\" has to be a positive number, got {page:?}"))?;
            if let (Some(limit), true) = (query.limit, page > 0) {
                query.offset = (page - 1)
                    .checked_mul(limit)
                    .ok_or_else(|| format!("\"page\" {page} is out of range for limit {limit}"))?;
            }
        }
        if let Some(meta) = params.get("meta") {
            query.meta = split_list(meta);
        }
        Ok(query)
    }

    pub fn wants_meta(&self, counter: &str) -> bool {
        self.meta.iter().any(|m| m == counter || m == "*")
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Value at a dotted path, `None` when any segment is missing.
pub fn lookup<'v>(item: &'v Item, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = item.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Whether `item` satisfies a filter-rules object.
pub fn matches(item: &Item, filter: &Value) -> Result<bool, String> {
    let rules = filter
        .as_object()
        .ok_or_else(|| format!("Invalid filter node: {filter}"))?;
    for (key, rule) in rules {
        let ok = match key.as_str() {
            "_and" => all_of(item, rule)?,
            "_or" => any_of(item, rule)?,
            "_not" => !matches(item, rule)?,
            field => field_matches(lookup(item, field), rule)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn children(rule: &Value) -> Result<&Vec<Value>, String> {
    rule.as_array()
        .ok_or_else(|| "Logical operators expect an array".to_string())
}

fn all_of(item: &Item, rule: &Value) -> Result<bool, String> {
    for child in children(rule)? {
        if !matches(item, child)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_of(item: &Item, rule: &Value) -> Result<bool, String> {
    for child in children(rule)? {
        if matches(item, child)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn field_matches(value: Option<&Value>, rule: &Value) -> Result<bool, String> {
    let conditions = rule
        .as_object()
        .ok_or_else(|| format!("Invalid filter condition: {rule}"))?;
    let value = value.unwrap_or(&Value::Null);
    for (operator, operand) in conditions {
        if !apply(operator, value, operand)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn apply(operator: &str, value: &Value, operand: &Value) -> Result<bool, String> {
    let result = match operator {
        "_eq" => loose_eq(value, operand),
        "_neq" => !loose_eq(value, operand),
        "_lt" => compare(value, operand) == Some(Ordering::Less),
        "_lte" => matches!(compare(value, operand), Some(Ordering::Less | Ordering::Equal)),
        "_gt" => compare(value, operand) == Some(Ordering::Greater),
        "_gte" => matches!(compare(value, operand), Some(Ordering::Greater | Ordering::Equal)),
        "_in" => list(operator, operand)?.iter().any(|v| loose_eq(value, v)),
        "_nin" => !list(operator, operand)?.iter().any(|v| loose_eq(value, v)),
        "_between" => between(value, operand)?,
        "_nbetween" => !between(value, operand)?,
        "_null" => value.is_null() == truthy(operand),
        "_nnull" => !value.is_null() == truthy(operand),
        "_empty" => is_empty(value) == truthy(operand),
        "_nempty" => !is_empty(value) == truthy(operand),
        "_contains" => contains(value, operand, false),
        "_ncontains" => !contains(value, operand, false),
        "_icontains" => contains(value, operand, true),
        "_starts_with" => text_pair(value, operand).is_some_and(|(v, o)| v.starts_with(&o)),
        "_ends_with" => text_pair(value, operand).is_some_and(|(v, o)| v.ends_with(&o)),
        other => return Err(format!("Invalid filter operator: {other}")),
    };
    Ok(result)
}

fn truthy(operand: &Value) -> bool {
    match operand {
        Value::Bool(b) => *b,
        Value::String(s) => s != "false" && s != "0",
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

fn list<'o>(operator: &str, operand: &'o Value) -> Result<&'o Vec<Value>, String> {
    operand
        .as_array()
        .ok_or_else(|| format!("{operator} expects an array"))
}

fn between(value: &Value, operand: &Value) -> Result<bool, String> {
    match operand.as_array().map(Vec::as_slice) {
        Some([lo, hi]) => Ok(matches!(
            (compare(value, lo), compare(value, hi)),
            (Some(Ordering::Greater | Ordering::Equal), Some(Ordering::Less | Ordering::Equal))
        )),
        _ => Err("_between expects an array of two values".to_string()),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn contains(value: &Value, operand: &Value, case_insensitive: bool) -> bool {
    if let Value::Array(values) = value {
        return values.iter().any(|v| loose_eq(v, operand));
    }
    match text_pair(value, operand) {
        Some((v, o)) if case_insensitive => v.to_lowercase().contains(&o.to_lowercase()),
        Some((v, o)) => v.contains(&o),
        None => false,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_pair(value: &Value, operand: &Value) -> Option<(String, String)> {
    Some((as_text(value)?, as_text(operand)?))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Query strings carry everything as JSON, but callers mix `1` and `"1"`
/// freely; numbers compare by value.
fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::Number(_), _) | (_, Value::Number(_)) => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        _ => false,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => as_number(a)?.partial_cmp(&as_number(b)?),
    }
}

/// Total order for sorting: nulls first, then by `compare`.
fn sort_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
    }
}

/// Case-insensitive substring match over string and number fields.
pub fn search_matches(item: &Item, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    item.values().any(|value| match value {
        Value::String(s) => s.to_lowercase().contains(&needle),
        Value::Number(n) => n.to_string() == needle,
        _ => false,
    })
}

pub fn sort_items(items: &mut [Item], keys: &[(String, bool)]) {
    items.sort_by(|a, b| {
        for (field, descending) in keys {
            let ord = sort_order(lookup(a, field), lookup(b, field));
            let ord = if *descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Keeps the requested top-level keys; `*` or an empty list keeps all.
pub fn project(item: &Item, fields: &[String]) -> Item {
    if fields.is_empty() || fields.iter().any(|f| f == "*") {
        return item.clone();
    }
    item.iter()
        .filter(|(key, _)| {
            fields
                .iter()
                .any(|f| f == *key || f.split('.').next() == Some(key.as_str()))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn article() -> Item {
        item(json!({
            "id": 1,
            "title": "Rust in Production",
            "status": "published",
            "views": 150,
            "tags": ["rust", "backend"],
            "author": {"name": "Ada"},
            "deleted_at": null
        }))
    }

    #[test]
    fn comparison_operators() {
        let a = article();
        let cases = [
            (json!({"status": {"_eq": "published"}}), true),
            (json!({"status": {"_neq": "published"}}), false),
            (json!({"views": {"_gt": 100}}), true),
            (json!({"views": {"_lte": "150"}}), true),
            (json!({"views": {"_between": [100, 200]}}), true),
            (json!({"views": {"_nbetween": [100, 200]}}), false),
            (json!({"id": {"_in": [1, 2]}}), true),
            (json!({"id": {"_nin": ["1"]}}), false),
            (json!({"deleted_at": {"_null": true}}), true),
            (json!({"missing": {"_null": true}}), true),
            (json!({"title": {"_nnull": true}}), true),
            (json!({"title": {"_icontains": "RUST"}}), true),
            (json!({"title": {"_contains": "RUST"}}), false),
            (json!({"title": {"_starts_with": "Rust"}}), true),
            (json!({"title": {"_ends_with": "Rust"}}), false),
            (json!({"tags": {"_contains": "rust"}}), true),
            (json!({"author.name": {"_eq": "Ada"}}), true),
        ];
        for (filter, expected) in cases {
            assert_eq!(matches(&a, &filter).unwrap(), expected, "{filter}");
        }
    }

    #[test]
    fn logical_operators() {
        let a = article();
        let filter = json!({"_and": [
            {"_or": [{"status": {"_eq": "draft"}}, {"views": {"_gte": 100}}]},
            {"_not": {"title": {"_contains": "draft"}}}
        ]});
        assert!(matches(&a, &filter).unwrap());
        assert!(matches(&a, &json!({})).unwrap());
        assert!(!matches(&a, &json!({"_or": []})).unwrap());
    }

    #[test]
    fn unknown_operator_is_an_error() {
        let err = matches(&article(), &json!({"title": {"_regex": "x"}})).unwrap_err();
        assert!(err.contains("_regex"));
    }

    #[test]
    fn sort_puts_nulls_first_and_honors_direction() {
        let mut items = vec![
            item(json!({"id": 1, "rank": 2})),
            item(json!({"id": 2, "rank": null})),
            item(json!({"id": 3, "rank": 1})),
        ];
        sort_items(&mut items, &[("rank".to_string(), false)]);
        let ids: Vec<_> = items.iter().map(|i| i["id"].clone()).collect();
        assert_eq!(ids, vec![json!(2), json!(3), json!(1)]);

        sort_items(&mut items, &[("rank".to_string(), true)]);
        assert_eq!(items[0]["id"], 1);
    }

    #[test]
    fn projection_keeps_top_level_of_dotted_fields() {
        let projected = project(&article(), &["id".to_string(), "author.name".to_string()]);
        assert_eq!(projected.len(), 2);
        assert!(projected.contains_key("author"));
        assert_eq!(project(&article(), &["*".to_string()]).len(), article().len());
    }

    #[test]
    fn page_is_converted_to_offset() {
        let mut params = HashMap::new();
        params.insert("limit".to_string(), "10".to_string());
        params.insert("page".to_string(), "3".to_string());
        let query = ListQuery::parse(&params).unwrap();
        assert_eq!(query.offset, 20);

        params.insert("limit".to_string(), "-1".to_string());
        assert_eq!(ListQuery::parse(&params).unwrap().limit, None);
    }

    #[test]
    fn page_beyond_addressable_range_is_rejected() {
        let mut params = HashMap::new();
        params.insert("limit".to_string(), "10".to_string());
        params.insert("page".to_string(), usize::MAX.to_string());
        let err = ListQuery::parse(&params).unwrap_err();
        assert!(err.contains("out of range"), "{err}");
    }

    #[test]
    fn invalid_filter_json_is_rejected() {
        let mut params = HashMap::new();
        params.insert("filter".to_string(), "{not json".to_string());
        assert!(ListQuery::parse(&params).is_err());
    }
}
