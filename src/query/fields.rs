use crate::query::filter::FieldType;

/// Fields a list endpoint lets clients filter, project and sort on
#[derive(Debug, Clone, Copy)]
pub struct ResourceFields {
    pub filterable: &'static [(&'static str, FieldType)],
    pub selectable: &'static [&'static str],
    pub sortable: &'static [&'static str],
}

impl ResourceFields {
    pub fn filter_type(&self, field: &str) -> Option<FieldType> {
        self.filterable.iter().find(|(name, _)| *name == field).map(|(_, ty)| *ty)
    }

    pub fn is_selectable(&self, field: &str) -> bool {
        self.selectable.contains(&field)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.sortable.contains(&field)
    }
}

pub const BOOTCAMP_FIELDS: ResourceFields = ResourceFields {
    filterable: &[
        ("_id", FieldType::Id),
        ("name", FieldType::Text),
        ("slug", FieldType::Text),
        ("careers", FieldType::Text),
        ("averageCost", FieldType::Number),
        ("housing", FieldType::Bool),
        ("jobAssistance", FieldType::Bool),
        ("jobGuarantee", FieldType::Bool),
        ("acceptGi", FieldType::Bool),
        ("location.city", FieldType::Text),
        ("location.state", FieldType::Text),
        ("location.zipcode", FieldType::Text),
        ("location.country", FieldType::Text),
        ("user", FieldType::Id),
        ("createdAt", FieldType::Date),
    ],
    selectable: &[
        "name",
        "slug",
        "description",
        "website",
        "phone",
        "email",
        "location",
        "careers",
        "averageCost",
        "photo",
        "housing",
        "jobAssistance",
        "jobGuarantee",
        "acceptGi",
        "user",
        "createdAt",
    ],
    sortable: &["name", "averageCost", "createdAt"],
};

pub const COURSE_FIELDS: ResourceFields = ResourceFields {
    filterable: &[
        ("_id", FieldType::Id),
        ("title", FieldType::Text),
        ("weeks", FieldType::Number),
        ("tuition", FieldType::Number),
        ("minimumSkill", FieldType::Text),
        ("scholarshipAvailable", FieldType::Bool),
        ("bootcamp", FieldType::Id),
        ("user", FieldType::Id),
        ("createdAt", FieldType::Date),
    ],
    selectable: &[
        "title",
        "description",
        "weeks",
        "tuition",
        "minimumSkill",
        "scholarshipAvailable",
        "bootcamp",
        "user",
        "createdAt",
    ],
    sortable: &["title", "weeks", "tuition", "createdAt"],
};
