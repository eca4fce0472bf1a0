// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The family of names derived from a memoized method's name.

/// Names derived from a memoized method's original name.
///
/// A trailing `?` or `!` is stripped to form the bare name. Internal entries
/// use a stem that doubles the bare name whenever punctuation was present, so
/// `question?` yields `question_question_base_key` while `method1` yields
/// `method1_base_key`. Public aliases keep the original punctuation.
///
/// # Examples
///
/// ```
/// use perma_cache::MethodNames;
///
/// let names = MethodNames::new("question?");
/// assert_eq!(names.base_key(), "question_question_base_key");
/// assert_eq!(names.with_perma_cache(), "question_with_perma_cache?");
/// assert_eq!(names.key_segment(), "question");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodNames {
    original: String,
    bare: String,
    punctuation: Option<char>,
    stem: String,
}

impl MethodNames {
    /// Derives the name family for `original`.
    #[must_use]
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        let (bare, punctuation) = match original.strip_suffix(['?', '!']) {
            Some(bare) => (bare.to_owned(), original.chars().last()),
            None => (original.clone(), None),
        };
        let stem = if punctuation.is_some() { format!("{bare}_{bare}") } else { bare.clone() };

        Self {
            original,
            bare,
            punctuation,
            stem,
        }
    }

    /// The name as declared, which is also the public read-through alias.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The public read-through alias. Identical to [`original`](Self::original).
    #[must_use]
    pub fn public(&self) -> &str {
        &self.original
    }

    /// The final key segment: the original name without trailing punctuation.
    #[must_use]
    pub fn key_segment(&self) -> &str {
        &self.bare
    }

    /// The internal stem that prefixes most generated names.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The trailing `?` or `!` of the original name, if any.
    #[must_use]
    pub fn punctuation(&self) -> Option<char> {
        self.punctuation
    }

    /// `<stem>_base_key`
    #[must_use]
    pub fn base_key(&self) -> String {
        format!("{}_base_key", self.stem)
    }

    /// `<stem>_perma_cache_key`
    #[must_use]
    pub fn perma_cache_key(&self) -> String {
        format!("{}_perma_cache_key", self.stem)
    }

    /// `<stem>!`
    #[must_use]
    pub fn rebuild(&self) -> String {
        format!("{}!", self.stem)
    }

    /// `<stem>_get_perma_cache`
    #[must_use]
    pub fn get_perma_cache(&self) -> String {
        format!("{}_get_perma_cache", self.stem)
    }

    /// `<bare>_with_perma_cache` followed by the original punctuation.
    #[must_use]
    pub fn with_perma_cache(&self) -> String {
        self.punctuated(&format!("{}_with_perma_cache", self.bare))
    }

    /// `<bare>_without_perma_cache` followed by the original punctuation.
    #[must_use]
    pub fn without_perma_cache(&self) -> String {
        self.punctuated(&format!("{}_without_perma_cache", self.bare))
    }

    /// `<stem>_was_rebuilt?`
    #[must_use]
    pub fn was_rebuilt(&self) -> String {
        format!("{}_was_rebuilt?", self.stem)
    }

    fn punctuated(&self, name: &str) -> String {
        match self.punctuation {
            Some(p) => format!("{name}{p}"),
            None => name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::plain("method1", "method1", "method1", None)]
    #[case::predicate("question?", "question", "question_question", Some('?'))]
    #[case::bang("save!", "save", "save_save", Some('!'))]
    #[case::only_last_mark("check?!", "check?", "check?_check?", Some('!'))]
    fn derives_bare_and_stem(#[case] original: &str, #[case] bare: &str, #[case] stem: &str, #[case] punctuation: Option<char>) {
        let names = MethodNames::new(original);
        assert_eq!(names.original(), original);
        assert_eq!(names.public(), original);
        assert_eq!(names.key_segment(), bare);
        assert_eq!(names.stem(), stem);
        assert_eq!(names.punctuation(), punctuation);
    }

    #[test]
    fn plain_method_family() {
        let names = MethodNames::new("method1");
        assert_eq!(names.base_key(), "method1_base_key");
        assert_eq!(names.perma_cache_key(), "method1_perma_cache_key");
        assert_eq!(names.rebuild(), "method1!");
        assert_eq!(names.get_perma_cache(), "method1_get_perma_cache");
        assert_eq!(names.with_perma_cache(), "method1_with_perma_cache");
        assert_eq!(names.without_perma_cache(), "method1_without_perma_cache");
        assert_eq!(names.was_rebuilt(), "method1_was_rebuilt?");
    }

    #[test]
    fn predicate_method_family() {
        let names = MethodNames::new("question?");
        assert_eq!(names.base_key(), "question_question_base_key");
        assert_eq!(names.perma_cache_key(), "question_question_perma_cache_key");
        assert_eq!(names.rebuild(), "question_question!");
        assert_eq!(names.get_perma_cache(), "question_question_get_perma_cache");
        assert_eq!(names.with_perma_cache(), "question_with_perma_cache?");
        assert_eq!(names.without_perma_cache(), "question_without_perma_cache?");
        assert_eq!(names.was_rebuilt(), "question_question_was_rebuilt?");
    }

    #[test]
    fn bang_method_family() {
        let names = MethodNames::new("save!");
        assert_eq!(names.rebuild(), "save_save!");
        assert_eq!(names.with_perma_cache(), "save_with_perma_cache!");
        assert_eq!(names.without_perma_cache(), "save_without_perma_cache!");
    }
}
