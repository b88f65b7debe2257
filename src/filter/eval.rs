use super::expr::Filter;
use crate::descriptor::TestDescriptor;

impl Filter {
    /// Whether `test` satisfies this filter.
    pub fn is_match<D: TestDescriptor + ?Sized>(&self, test: &D) -> bool {
        match self {
            Filter::Any => true,
            Filter::None => false,
            Filter::And(children) => children.iter().all(|child| child.is_match(test)),
            Filter::Or(children) => children.iter().any(|child| child.is_match(test)),
            Filter::Not(child) => !child.is_match(test),
            Filter::Id(value) => value.is_match(test.id()),
            Filter::Name(value) => value.is_match(test.name()),
            Filter::Assembly(value) => value.is_match(test.assembly_name()),
            Filter::Namespace(value) => value.is_match(test.namespace_name()),
            Filter::Member(value) => value.is_match(test.member_name()),
            Filter::Type {
                value,
                include_derived,
            } => {
                test.type_ref().is_some_and(|t| value.matches_type(t))
                    || (*include_derived && test.is_subtype_of(&|t| value.matches_type(t)))
            }
            Filter::Metadata { key, value } => test
                .metadata()
                .get(key)
                .iter()
                .any(|actual| value.is_match(Some(actual.as_str()))),
        }
    }
}
