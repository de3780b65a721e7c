use bson::{doc, Document};
use serde::Serialize;

use crate::query::fields::ResourceFields;
use crate::query::filter::{Comparison, Condition, FilterExpr, FilterValue, QueryError};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 25;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parsed list request: filter, projection, ordering and page window
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub filter: FilterExpr,
    pub select: Option<Vec<String>>,
    pub sort: Vec<(String, SortDirection)>,
    pub page: u64,
    pub limit: u64,
}

impl QueryParams {
    /// Parses raw query-string pairs against a resource's field allowlist
    pub fn parse(pairs: &[(String, String)], fields: &ResourceFields) -> Result<Self, QueryError> {
        let mut filter = FilterExpr::new();
        let mut select = None;
        let mut sort = Vec::new();
        let mut page = DEFAULT_PAGE;
        let mut limit = DEFAULT_LIMIT;

        for (key, raw) in pairs {
            match key.as_str() {
                "select" => select = Some(parse_select(raw, fields)?),
                "sort" => sort = parse_sort(raw, fields)?,
                "page" => page = parse_positive("page", raw)?,
                "limit" => limit = parse_positive("limit", raw)?.min(MAX_LIMIT),
                _ => filter.push(parse_condition(key, raw, fields)?)?,
            }
        }

        if sort.is_empty() {
            sort.push(("createdAt".to_string(), SortDirection::Desc));
        }
        check_page_window(page, limit)?;

        Ok(QueryParams { filter, select, sort, page, limit })
    }

    /// Restricts results to documents whose `field` equals `value`
    pub fn scoped(mut self, field: &str, value: FilterValue) -> Self {
        self.filter.scope(field, value);
        self
    }

    pub fn has_select(&self) -> bool {
        self.select.is_some()
    }

    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn compile(&self) -> CompiledQuery {
        let mut sort = Document::new();
        for (field, direction) in &self.sort {
            sort.insert(field.clone(), if *direction == SortDirection::Asc { 1 } else { -1 });
        }

        let projection = self.select.as_ref().map(|fields| {
            let mut projection = Document::new();
            for field in fields {
                projection.insert(field.clone(), 1);
            }
            projection
        });

        CompiledQuery {
            filter: self.filter.to_document(),
            sort,
            projection,
            skip: self.skip(),
            limit: self.limit as i64,
        }
    }

    pub fn pagination(&self, total: u64) -> Pagination {
        Pagination::new(self.page, self.limit, total)
    }
}

/// What the repositories execute
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub filter: Document,
    pub sort: Document,
    pub projection: Option<Document>,
    pub skip: u64,
    /// Zero means no limit
    pub limit: i64,
}

impl CompiledQuery {
    /// Every match, newest first
    pub fn filter_only(filter: Document) -> Self {
        CompiledQuery {
            filter,
            sort: doc! { "createdAt": -1 },
            projection: None,
            skip: 0,
            limit: 0,
        }
    }

    pub fn with_projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let start = page.saturating_sub(1).saturating_mul(limit);
        let end = page.saturating_mul(limit);
        Pagination {
            page,
            limit,
            total,
            next: (end < total).then(|| PageRef { page: page + 1, limit }),
            prev: (start > 0).then(|| PageRef { page: page - 1, limit }),
        }
    }
}

fn check_field_name(field: &str) -> Result<(), QueryError> {
    if field.is_empty() || field.starts_with('$') || field.contains(['$', '\0']) {
        return Err(QueryError::UnknownField(field.to_string()));
    }
    Ok(())
}

/// `field=value` or `field[op]=value`
fn parse_condition(key: &str, raw: &str, fields: &ResourceFields) -> Result<Condition, QueryError> {
    let (field, op) = match key.split_once('[') {
        Some((field, rest)) => {
            let op = rest
                .strip_suffix(']')
                .ok_or_else(|| QueryError::UnknownOperator(rest.to_string()))?;
            (field, Comparison::parse(op)?)
        }
        None => (key, Comparison::Eq),
    };

    check_field_name(field)?;
    let field_type = fields
        .filter_type(field)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;

    let value = match op {
        Comparison::In => FilterValue::parse_list(field, raw, field_type)?,
        _ => FilterValue::parse(field, raw, field_type)?,
    };

    Ok(Condition { field: field.to_string(), op, value })
}

fn parse_select(raw: &str, fields: &ResourceFields) -> Result<Vec<String>, QueryError> {
    let selected: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    if selected.is_empty() {
        return Err(QueryError::InvalidValue { field: "select".to_string(), value: raw.to_string() });
    }
    for field in &selected {
        check_field_name(field)?;
        if !fields.is_selectable(field) {
            return Err(QueryError::UnknownField(field.clone()));
        }
    }
    Ok(selected)
}

fn parse_sort(raw: &str, fields: &ResourceFields) -> Result<Vec<(String, SortDirection)>, QueryError> {
    raw.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|key| {
            let (field, direction) = match key.strip_prefix('-') {
                Some(field) => (field, SortDirection::Desc),
                None => (key, SortDirection::Asc),
            };
            check_field_name(field)?;
            if !fields.is_sortable(field) {
                return Err(QueryError::UnknownField(field.to_string()));
            }
            Ok((field.to_string(), direction))
        })
        .collect()
}

/// The last document of the page must be addressable as a signed 64-bit offset
fn check_page_window(page: u64, limit: u64) -> Result<(), QueryError> {
    match page.checked_mul(limit) {
        Some(end) if end <= i64::MAX as u64 => Ok(()),
        _ => Err(QueryError::InvalidPagination("page is out of range".to_string())),
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u64, QueryError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(QueryError::InvalidPagination(format!("{} must be a positive integer", name))),
    }
}
