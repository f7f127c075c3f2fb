//! Resource tag helpers

use std::collections::BTreeMap;

pub type Tags = BTreeMap<String, String>;

/// Prefix reserved for tags managed by AWS itself
const AWS_TAG_PREFIX: &str = "aws:";

/// Drop AWS-managed tags; they can be neither set nor removed by users
pub fn ignore_aws(tags: &Tags) -> Tags {
    tags.iter()
        .filter(|(key, _)| !key.starts_with(AWS_TAG_PREFIX))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Calls needed to move a resource's tags from `old` to `new`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagDiff {
    /// Keys to untag
    pub remove: Vec<String>,
    /// New or changed key/value pairs to tag
    pub upsert: Tags,
}

impl TagDiff {
    pub fn between(old: &Tags, new: &Tags) -> Self {
        let old = ignore_aws(old);
        let new = ignore_aws(new);

        let remove = old
            .keys()
            .filter(|key| !new.contains_key(*key))
            .cloned()
            .collect();
        let upsert = new
            .into_iter()
            .filter(|(key, value)| old.get(key) != Some(value))
            .collect();

        Self { remove, upsert }
    }

    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.upsert.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_add_change_remove() {
        let old = tags(&[("env", "dev"), ("team", "core"), ("stale", "x")]);
        let new = tags(&[("env", "prod"), ("team", "core"), ("owner", "mito")]);

        let diff = TagDiff::between(&old, &new);
        assert_eq!(diff.remove, vec!["stale".to_string()]);
        assert_eq!(diff.upsert, tags(&[("env", "prod"), ("owner", "mito")]));
    }

    #[test]
    fn test_aws_tags_are_ignored() {
        let old = tags(&[("aws:cloudformation:stack-name", "s1")]);
        let new = tags(&[("aws:created-by", "x")]);

        assert!(TagDiff::between(&old, &new).is_empty());
        assert!(ignore_aws(&new).is_empty());
    }
}
