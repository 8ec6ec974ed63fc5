//! `sort_by` / `sort_desc` handling
//!
//! Every listable resource exposes a closed set of sort keys so that
//! user input never reaches an ORDER BY clause verbatim.

use super::ValidationError;

/// A whitelisted sort key for one resource.
pub trait SortKey: Copy + Default {
    /// Parse the `sort_by` query value.
    fn parse(s: &str) -> Option<Self>;

    /// Direction used when `sort_desc` is not supplied.
    fn default_descending(self) -> bool;
}

/// Resolved ordering for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<K> {
    pub key: K,
    pub descending: bool,
}

impl<K: SortKey> Sort<K> {
    pub fn new(key: K, descending: bool) -> Self {
        Self { key, descending }
    }

    /// Resolve query parameters; unknown keys are a validation error.
    pub fn from_params(sort_by: Option<&str>, sort_desc: Option<bool>) -> Result<Self, ValidationError> {
        let key = match sort_by.map(str::trim) {
            None | Some("") => K::default(),
            Some(s) => K::parse(s).ok_or_else(|| ValidationError::InvalidVariant {
                field: "sort_by",
                value: s.to_owned(),
            })?,
        };

        Ok(Self {
            key,
            descending: sort_desc.unwrap_or_else(|| key.default_descending()),
        })
    }

    /// SQL direction keyword.
    pub fn direction(&self) -> &'static str {
        if self.descending {
            "DESC"
        } else {
            "ASC"
        }
    }

    /// Orient an ascending comparison according to the direction.
    pub fn orient(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl<K: SortKey> Default for Sort<K> {
    fn default() -> Self {
        let key = K::default();
        Self {
            key,
            descending: key.default_descending(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    enum Key {
        #[default]
        Created,
        Name,
    }

    impl SortKey for Key {
        fn parse(s: &str) -> Option<Self> {
            match s {
                "created_at" => Some(Self::Created),
                "name" => Some(Self::Name),
                _ => None,
            }
        }

        fn default_descending(self) -> bool {
            matches!(self, Self::Created)
        }
    }

    #[test]
    fn defaults_follow_key() {
        let sort = Sort::<Key>::from_params(None, None).unwrap();
        assert_eq!(sort, Sort::new(Key::Created, true));

        let sort = Sort::<Key>::from_params(Some("name"), None).unwrap();
        assert_eq!(sort, Sort::new(Key::Name, false));
    }

    #[test]
    fn explicit_direction_wins() {
        let sort = Sort::<Key>::from_params(Some("created_at"), Some(false)).unwrap();
        assert_eq!(sort.direction(), "ASC");
    }

    #[test]
    fn rejects_unknown_key() {
        let err = Sort::<Key>::from_params(Some("password"), None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "sort_by", .. }));
    }
}
