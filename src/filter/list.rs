use std::ops::Deref;

/// An ordered list that always holds at least one element.
///
/// Combinator nodes store their children in this type so that an empty
/// `And` or `Or` cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmpty<T>(Vec<T>);

impl<T> NonEmpty<T> {
    pub fn new(first: T) -> Self {
        Self(vec![first])
    }

    pub fn push(&mut self, item: T) {
        self.0.push(item);
    }

    pub fn first(&self) -> &T {
        &self.0[0]
    }

    /// The only element, or the whole list back when there are several.
    pub fn into_single(mut self) -> Result<T, Self> {
        if self.0.len() == 1 {
            Ok(self.0.remove(0))
        } else {
            Err(self)
        }
    }
}

impl<T> Deref for NonEmpty<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'a, T> IntoIterator for &'a NonEmpty<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut list = NonEmpty::new(1);
        list.push(2);
        assert_eq!(list.len(), 2);
        assert_eq!(*list.first(), 1);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_into_single() {
        assert_eq!(NonEmpty::new(7).into_single().ok(), Some(7));

        let mut list = NonEmpty::new(1);
        list.push(2);
        assert!(list.into_single().is_err());
    }
}
