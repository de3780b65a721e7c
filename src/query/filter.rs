use bson::{oid::ObjectId, Bson, DateTime, Document};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Unknown query field: {0}")]
    UnknownField(String),
    #[error("Unknown query operator: {0}")]
    UnknownOperator(String),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
    #[error("Duplicate filter on {0}")]
    DuplicateCondition(String),
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}

/// How raw query-string values for a field are typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Bool,
    Id,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Comparison {
    pub fn parse(op: &str) -> Result<Self, QueryError> {
        match op {
            "gt" => Ok(Comparison::Gt),
            "gte" => Ok(Comparison::Gte),
            "lt" => Ok(Comparison::Lt),
            "lte" => Ok(Comparison::Lte),
            "in" => Ok(Comparison::In),
            other => Err(QueryError::UnknownOperator(other.to_string())),
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            Comparison::Eq => "$eq",
            Comparison::Gt => "$gt",
            Comparison::Gte => "$gte",
            Comparison::Lt => "$lt",
            Comparison::Lte => "$lte",
            Comparison::In => "$in",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Id(ObjectId),
    Date(DateTime),
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Types a single raw value according to the field it targets
    pub fn parse(field: &str, raw: &str, field_type: FieldType) -> Result<Self, QueryError> {
        let invalid = || QueryError::InvalidValue { field: field.to_string(), value: raw.to_string() };
        match field_type {
            FieldType::Text => Ok(FilterValue::Text(raw.to_string())),
            FieldType::Number => {
                if let Ok(i) = raw.parse::<i64>() {
                    Ok(FilterValue::Int(i))
                } else {
                    raw.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(FilterValue::Float)
                        .ok_or_else(invalid)
                }
            }
            FieldType::Bool => match raw {
                "true" => Ok(FilterValue::Bool(true)),
                "false" => Ok(FilterValue::Bool(false)),
                _ => Err(invalid()),
            },
            FieldType::Id => ObjectId::parse_str(raw).map(FilterValue::Id).map_err(|_| invalid()),
            FieldType::Date => DateTime::parse_rfc3339_str(raw).map(FilterValue::Date).map_err(|_| invalid()),
        }
    }

    /// Comma-separated list for `in`
    pub fn parse_list(field: &str, raw: &str, field_type: FieldType) -> Result<Self, QueryError> {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| FilterValue::parse(field, item, field_type))
            .collect::<Result<Vec<_>, _>>()
            .map(FilterValue::List)
    }

    pub fn into_bson(self) -> Bson {
        match self {
            FilterValue::Text(s) => Bson::String(s),
            FilterValue::Int(i) => Bson::Int64(i),
            FilterValue::Float(f) => Bson::Double(f),
            FilterValue::Bool(b) => Bson::Boolean(b),
            FilterValue::Id(id) => Bson::ObjectId(id),
            FilterValue::Date(d) => Bson::DateTime(d),
            FilterValue::List(items) => Bson::Array(items.into_iter().map(FilterValue::into_bson).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Comparison,
    pub value: FilterValue,
}

/// Conjunction of per-field conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpr {
    conditions: Vec<Condition>,
}

impl FilterExpr {
    pub fn new() -> Self {
        FilterExpr::default()
    }

    pub fn push(&mut self, condition: Condition) -> Result<(), QueryError> {
        if self.conditions.iter().any(|c| c.field == condition.field && c.op == condition.op) {
            return Err(QueryError::DuplicateCondition(condition.field));
        }
        self.conditions.push(condition);
        Ok(())
    }

    /// Replaces every condition on `field` with a single equality
    pub fn scope(&mut self, field: &str, value: FilterValue) {
        self.conditions.retain(|c| c.field != field);
        self.conditions.push(Condition { field: field.to_string(), op: Comparison::Eq, value });
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Builds the MongoDB filter. A lone equality stays `{field: value}`;
    /// anything else on the same field becomes an operator document.
    pub fn to_document(&self) -> Document {
        let mut fields: Vec<(&str, Vec<&Condition>)> = Vec::new();
        for condition in &self.conditions {
            match fields.iter_mut().find(|(name, _)| *name == condition.field) {
                Some((_, group)) => group.push(condition),
                None => fields.push((condition.field.as_str(), vec![condition])),
            }
        }

        let mut filter = Document::new();
        for (field, group) in fields {
            if let [only] = group.as_slice() {
                if only.op == Comparison::Eq {
                    filter.insert(field, only.value.clone().into_bson());
                    continue;
                }
            }
            let mut operators = Document::new();
            for condition in group {
                operators.insert(condition.op.operator(), condition.value.clone().into_bson());
            }
            filter.insert(field, operators);
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn cond(field: &str, op: Comparison, value: FilterValue) -> Condition {
        Condition { field: field.to_string(), op, value }
    }

    #[test]
    fn test_value_typing() {
        assert_eq!(FilterValue::parse("tuition", "100", FieldType::Number).unwrap(), FilterValue::Int(100));
        assert_eq!(FilterValue::parse("tuition", "99.5", FieldType::Number).unwrap(), FilterValue::Float(99.5));
        assert_eq!(FilterValue::parse("housing", "true", FieldType::Bool).unwrap(), FilterValue::Bool(true));
        assert_eq!(FilterValue::parse("name", "123", FieldType::Text).unwrap(), FilterValue::Text("123".into()));
        assert!(FilterValue::parse("tuition", "cheap", FieldType::Number).is_err());
        assert!(FilterValue::parse("tuition", "NaN", FieldType::Number).is_err());
        assert!(FilterValue::parse("user", "nope", FieldType::Id).is_err());
    }

    #[test]
    fn test_lone_equality_is_plain() {
        let mut expr = FilterExpr::new();
        expr.push(cond("location.state", Comparison::Eq, FilterValue::Text("MA".into()))).unwrap();
        assert_eq!(expr.to_document(), doc! { "location.state": "MA" });
    }

    #[test]
    fn test_range_and_equality_merge() {
        let mut expr = FilterExpr::new();
        expr.push(cond("averageCost", Comparison::Lte, FilterValue::Int(10000))).unwrap();
        expr.push(cond("averageCost", Comparison::Gt, FilterValue::Int(5000))).unwrap();
        expr.push(cond("averageCost", Comparison::Eq, FilterValue::Int(8000))).unwrap();
        assert_eq!(
            expr.to_document(),
            doc! { "averageCost": { "$lte": 10000_i64, "$gt": 5000_i64, "$eq": 8000_i64 } }
        );
    }

    #[test]
    fn test_in_list() {
        let mut expr = FilterExpr::new();
        let list = FilterValue::parse_list("careers", "Business, Other", FieldType::Text).unwrap();
        expr.push(cond("careers", Comparison::In, list)).unwrap();
        assert_eq!(expr.to_document(), doc! { "careers": { "$in": ["Business", "Other"] } });
    }

    #[test]
    fn test_duplicate_condition_rejected() {
        let mut expr = FilterExpr::new();
        expr.push(cond("weeks", Comparison::Gt, FilterValue::Int(1))).unwrap();
        assert_eq!(
            expr.push(cond("weeks", Comparison::Gt, FilterValue::Int(2))),
            Err(QueryError::DuplicateCondition("weeks".into()))
        );
    }

    #[test]
    fn test_scope_replaces_conditions() {
        let id = ObjectId::new();
        let mut expr = FilterExpr::new();
        expr.push(cond("bootcamp", Comparison::Eq, FilterValue::Id(ObjectId::new()))).unwrap();
        expr.scope("bootcamp", FilterValue::Id(id));
        assert_eq!(expr.to_document(), doc! { "bootcamp": id });
    }
}
