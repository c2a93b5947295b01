//! Ancestor-exclusion policy for generic content rules.
//!
//! Some blocks (preconditions, data loading, raw SQL) carry names and values
//! that naming conventions do not apply to. An element is exempt when it or
//! any of its ancestors carries one of the configured tag names. Exemption is
//! per branch: siblings outside an exempt block are still checked.

use crate::document::Element;
use std::collections::HashSet;

/// Tag names exempt by default.
pub const DEFAULT_EXCLUDED_TAGS: &[&str] = &[
    "preConditions",
    "loadData",
    "loadUpdateData",
    "sql",
    "sqlFile",
    "createProcedure",
];

/// Set of tag names whose subtrees generic content rules skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorPolicy {
    tags: HashSet<String>,
}

impl Default for AncestorPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_TAGS.iter().copied())
    }
}

impl AncestorPolicy {
    /// Creates a policy from tag names.
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that exempts nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            tags: HashSet::new(),
        }
    }

    /// Returns true if `name` is an exempt tag.
    #[must_use]
    pub fn is_excluded_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    /// Returns true if `element` or one of its ancestors is exempt.
    #[must_use]
    pub fn is_excluded(&self, element: Element<'_>) -> bool {
        std::iter::once(element)
            .chain(element.ancestors())
            .any(|e| self.is_excluded_tag(e.name()))
    }

    /// Elements of the subtree under `root` that content rules must check,
    /// pre-order. Exempt branches are pruned, other branches are still walked.
    #[must_use]
    pub fn checked_elements<'doc>(&self, root: Element<'doc>) -> Vec<Element<'doc>> {
        if self.is_excluded(root) {
            return Vec::new();
        }

        let mut checked = Vec::new();
        let mut stack = vec![root];
        while let Some(element) = stack.pop() {
            if self.is_excluded_tag(element.name()) {
                continue;
            }
            checked.push(element);
            let children: Vec<Element<'doc>> = element.children().collect();
            stack.extend(children.into_iter().rev());
        }
        checked
    }

    /// Iterates the exempt tag names.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::XmlParser;
    use crate::document::DocumentParser;

    const CHANGE_SET: &str = r#"<databaseChangeLog>
  <changeSet id="1" author="a">
    <preConditions>
      <tableExists tableName="old-table"/>
    </preConditions>
    <createTable tableName="new-table">
      <column name="id"/>
    </createTable>
    <loadData tableName="seed-data" file="seed.csv">
      <column name="x-y"/>
    </loadData>
  </changeSet>
</databaseChangeLog>"#;

    #[test]
    fn descendants_of_excluded_tags_are_excluded() {
        let doc = XmlParser.parse(CHANGE_SET).unwrap();
        let cs = doc.change_sets().next().unwrap();
        let policy = AncestorPolicy::default();

        let table_exists = cs.find_elements_by_name("tableExists")[0];
        assert!(policy.is_excluded(table_exists));

        let create_table = cs.find_elements_by_name("createTable")[0];
        assert!(!policy.is_excluded(create_table));
    }

    #[test]
    fn checked_elements_prunes_only_excluded_branches() {
        let doc = XmlParser.parse(CHANGE_SET).unwrap();
        let cs = doc.change_sets().next().unwrap();
        let policy = AncestorPolicy::default();

        let names: Vec<&str> = policy
            .checked_elements(cs)
            .into_iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(names, vec!["changeSet", "createTable", "column"]);
    }

    #[test]
    fn empty_policy_checks_everything() {
        let doc = XmlParser.parse(CHANGE_SET).unwrap();
        let cs = doc.change_sets().next().unwrap();
        assert_eq!(
            AncestorPolicy::none().checked_elements(cs).len(),
            cs.descendants().count()
        );
    }
}
