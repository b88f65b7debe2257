use super::list::NonEmpty;
use super::value::ValueFilter;

/// Which attribute of a test a leaf filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Id,
    Name,
    Assembly,
    Namespace,
    Member,
    Type,
    ExactType,
}

impl FilterKey {
    pub const ALL: [FilterKey; 7] = [
        FilterKey::Id,
        FilterKey::Name,
        FilterKey::Assembly,
        FilterKey::Namespace,
        FilterKey::Member,
        FilterKey::Type,
        FilterKey::ExactType,
    ];

    /// Case-sensitive lookup; unknown keys address metadata.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Id" => Some(FilterKey::Id),
            "Name" => Some(FilterKey::Name),
            "Assembly" => Some(FilterKey::Assembly),
            "Namespace" => Some(FilterKey::Namespace),
            "Member" => Some(FilterKey::Member),
            "Type" => Some(FilterKey::Type),
            "ExactType" => Some(FilterKey::ExactType),
            _ => None,
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            FilterKey::Id => "Id",
            FilterKey::Name => "Name",
            FilterKey::Assembly => "Assembly",
            FilterKey::Namespace => "Namespace",
            FilterKey::Member => "Member",
            FilterKey::Type => "Type",
            FilterKey::ExactType => "ExactType",
        }
    }
}

/// An immutable predicate over tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every test.
    Any,
    /// Matches no test.
    None,
    And(NonEmpty<Filter>),
    Or(NonEmpty<Filter>),
    Not(Box<Filter>),
    Id(ValueFilter),
    Name(ValueFilter),
    Assembly(ValueFilter),
    Namespace(ValueFilter),
    Member(ValueFilter),
    Type {
        value: ValueFilter,
        include_derived: bool,
    },
    Metadata {
        key: String,
        value: ValueFilter,
    },
}

impl Filter {
    /// Build the leaf filter addressed by `key`.
    ///
    /// `Type` includes derived types, `ExactType` does not, and any key
    /// outside the fixed set becomes a metadata filter.
    pub fn for_key(key: &str, value: ValueFilter) -> Filter {
        match FilterKey::from_key(key) {
            Some(FilterKey::Id) => Filter::Id(value),
            Some(FilterKey::Name) => Filter::Name(value),
            Some(FilterKey::Assembly) => Filter::Assembly(value),
            Some(FilterKey::Namespace) => Filter::Namespace(value),
            Some(FilterKey::Member) => Filter::Member(value),
            Some(FilterKey::Type) => Filter::Type {
                value,
                include_derived: true,
            },
            Some(FilterKey::ExactType) => Filter::Type {
                value,
                include_derived: false,
            },
            None => Filter::Metadata {
                key: key.to_string(),
                value,
            },
        }
    }

    /// Conjunction of `children`; a single child is returned as is.
    pub fn all_of(children: NonEmpty<Filter>) -> Filter {
        children.into_single().unwrap_or_else(Filter::And)
    }

    /// Disjunction of `children`; a single child is returned as is.
    pub fn any_of(children: NonEmpty<Filter>) -> Filter {
        children.into_single().unwrap_or_else(Filter::Or)
    }

    pub fn negate(child: Filter) -> Filter {
        Filter::Not(Box::new(child))
    }

    pub fn metadata(key: impl Into<String>, value: ValueFilter) -> Filter {
        Filter::Metadata {
            key: key.into(),
            value,
        }
    }

    /// The key a leaf would be written with, `None` for combinators.
    pub fn key(&self) -> Option<&str> {
        match self {
            Filter::Id(_) => Some(FilterKey::Id.canonical_name()),
            Filter::Name(_) => Some(FilterKey::Name.canonical_name()),
            Filter::Assembly(_) => Some(FilterKey::Assembly.canonical_name()),
            Filter::Namespace(_) => Some(FilterKey::Namespace.canonical_name()),
            Filter::Member(_) => Some(FilterKey::Member.canonical_name()),
            Filter::Type {
                include_derived: true,
                ..
            } => Some(FilterKey::Type.canonical_name()),
            Filter::Type {
                include_derived: false,
                ..
            } => Some(FilterKey::ExactType.canonical_name()),
            Filter::Metadata { key, .. } => Some(key),
            Filter::Any | Filter::None | Filter::And(_) | Filter::Or(_) | Filter::Not(_) => None,
        }
    }

    /// The value filter of a leaf, `None` for combinators.
    pub fn value(&self) -> Option<&ValueFilter> {
        match self {
            Filter::Id(value)
            | Filter::Name(value)
            | Filter::Assembly(value)
            | Filter::Namespace(value)
            | Filter::Member(value)
            | Filter::Type { value, .. }
            | Filter::Metadata { value, .. } => Some(value),
            Filter::Any | Filter::None | Filter::And(_) | Filter::Or(_) | Filter::Not(_) => None,
        }
    }
}
