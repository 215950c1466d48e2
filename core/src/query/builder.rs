//! Fluent, mutable construction of a `QuerySpec`.
//!
//! Every method mutates the builder in place and returns `&mut Self`, so
//! calls chain and the same builder can be `reset` or `clone`d between
//! requests. `build` hands out an owned snapshot; later mutations of the
//! builder never reach a spec that was already built.
//!
//! ```
//! use directus_core::query::{Filter, QueryBuilder};
//!
//! let spec = QueryBuilder::new()
//!     .select(["id", "title"])
//!     .where_("status", "_eq", "published")
//!     .or([Filter::equal("featured", true)])
//!     .order_by_desc("date")
//!     .limit(10)
//!     .build();
//! assert_eq!(spec.limit, Some(10));
//! ```

use serde_json::Value;

use super::filter::{Filter, Operator};
use super::spec::{Aggregate, QuerySpec, Sort, SortDirection};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    spec: QuerySpec,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the field list.
    pub fn select<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Adds a comparison. Successive conditions are combined with AND.
    pub fn where_(
        &mut self,
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.filter(Filter::compare(field, operator, value))
    }

    pub fn where_in<I, V>(&mut self, field: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(Filter::in_list(field, values))
    }

    pub fn where_not_in<I, V>(&mut self, field: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter(Filter::not_in_list(field, values))
    }

    pub fn where_between(
        &mut self,
        field: impl Into<String>,
        lo: impl Into<Value>,
        hi: impl Into<Value>,
    ) -> &mut Self {
        self.filter(Filter::between(field, lo, hi))
    }

    pub fn where_null(&mut self, field: impl Into<String>) -> &mut Self {
        self.filter(Filter::is_null(field))
    }

    pub fn where_not_null(&mut self, field: impl Into<String>) -> &mut Self {
        self.filter(Filter::is_not_null(field))
    }

    pub fn where_contains(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.filter(Filter::contains(field, value))
    }

    /// ANDs an arbitrary expression into the current filter. An existing
    /// conjunction is extended rather than nested.
    pub fn filter(&mut self, condition: Filter) -> &mut Self {
        self.spec.filter = Some(match self.spec.filter.take() {
            None => condition,
            Some(existing) if existing.is_empty() => condition,
            Some(Filter::And(mut children)) => {
                children.push(condition);
                Filter::And(children)
            }
            Some(existing) => Filter::And(vec![existing, condition]),
        });
        self
    }

    /// Wraps the current filter and `conditions` in a new `_and`. The current
    /// filter, if any, becomes the first child, so chained calls nest instead
    /// of replacing each other. Empty conditions are skipped; with no
    /// conditions at all this is a no-op.
    pub fn and(&mut self, conditions: impl IntoIterator<Item = Filter>) -> &mut Self {
        self.combine(conditions, Filter::And)
    }

    /// Like `and`, producing `_or`.
    pub fn or(&mut self, conditions: impl IntoIterator<Item = Filter>) -> &mut Self {
        self.combine(conditions, Filter::Or)
    }

    /// ANDs the negation of `condition` into the current filter. An empty
    /// condition is ignored.
    pub fn not(&mut self, condition: Filter) -> &mut Self {
        if condition.is_empty() {
            return self;
        }
        self.filter(Filter::not(condition))
    }

    fn combine(
        &mut self,
        conditions: impl IntoIterator<Item = Filter>,
        wrap: fn(Vec<Filter>) -> Filter,
    ) -> &mut Self {
        let mut conditions = conditions.into_iter().peekable();
        if conditions.peek().is_none() {
            return self;
        }

        let mut children = Vec::new();
        if let Some(existing) = self.spec.filter.take() {
            if existing.is_empty() {
                self.spec.filter = Some(existing);
            } else {
                children.push(existing);
            }
        }
        children.extend(conditions.filter(|c| !c.is_empty()));

        if !children.is_empty() {
            self.spec.filter = Some(wrap(children));
        }
        self
    }

    pub fn search(&mut self, query: impl Into<String>) -> &mut Self {
        self.spec.search = Some(query.into());
        self
    }

    pub fn order_by(&mut self, field: impl Into<String>, direction: SortDirection) -> &mut Self {
        self.spec.sort.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn order_by_asc(&mut self, field: impl Into<String>) -> &mut Self {
        self.order_by(field, SortDirection::Asc)
    }

    pub fn order_by_desc(&mut self, field: impl Into<String>) -> &mut Self {
        self.order_by(field, SortDirection::Desc)
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.spec.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.spec.offset = Some(offset);
        self
    }

    pub fn page(&mut self, page: u64) -> &mut Self {
        self.spec.page = Some(page);
        self
    }

    /// Applies `nested` to the related items under `relation`. A second call
    /// for the same relation replaces the first.
    pub fn deep(&mut self, relation: impl Into<String>, nested: QuerySpec) -> &mut Self {
        self.spec.deep.insert(relation.into(), nested);
        self
    }

    pub fn aggregate(&mut self, function: Aggregate, field: impl Into<String>) -> &mut Self {
        self.spec.aggregate.insert(function, field.into());
        self
    }

    pub fn count(&mut self, field: impl Into<String>) -> &mut Self {
        self.aggregate(Aggregate::Count, field)
    }

    pub fn sum(&mut self, field: impl Into<String>) -> &mut Self {
        self.aggregate(Aggregate::Sum, field)
    }

    pub fn avg(&mut self, field: impl Into<String>) -> &mut Self {
        self.aggregate(Aggregate::Avg, field)
    }

    pub fn min(&mut self, field: impl Into<String>) -> &mut Self {
        self.aggregate(Aggregate::Min, field)
    }

    pub fn max(&mut self, field: impl Into<String>) -> &mut Self {
        self.aggregate(Aggregate::Max, field)
    }

    pub fn group_by<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.group_by.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Returns `field` under the name `alias` in the response.
    pub fn alias(&mut self, field: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.spec.aliases.insert(field.into(), alias.into());
        self
    }

    pub fn meta<I, S>(&mut self, counters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.meta.extend(counters.into_iter().map(Into::into));
        self
    }

    /// Language for translation fields.
    pub fn lang(&mut self, code: impl Into<String>) -> &mut Self {
        self.spec.lang = Some(code.into());
        self
    }

    pub fn build(&self) -> QuerySpec {
        self.spec.clone()
    }

    pub fn reset(&mut self) -> &mut Self {
        self.spec = QuerySpec::default();
        self
    }
}

impl From<&QueryBuilder> for QuerySpec {
    fn from(builder: &QueryBuilder) -> Self {
        builder.build()
    }
}
