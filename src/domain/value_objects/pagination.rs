use serde::Deserialize;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

/// Raw `?limit=&offset=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationQuery {
    pub fn validate(&self) -> Result<Pagination, String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if limit <= 0 {
            return Err("limit must be a positive number".to_string());
        }
        if limit > MAX_LIST_LIMIT {
            return Err(format!("limit must be <= {}", MAX_LIST_LIMIT));
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err("offset must not be negative".to_string());
        }

        Ok(Pagination { limit, offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let page = PaginationQuery::default().validate().unwrap();
        assert_eq!(page, Pagination::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let too_big = PaginationQuery {
            limit: Some(MAX_LIST_LIMIT + 1),
            offset: None,
        };
        assert!(too_big.validate().is_err());

        let zero = PaginationQuery {
            limit: Some(0),
            offset: None,
        };
        assert!(zero.validate().is_err());

        let negative_offset = PaginationQuery {
            limit: None,
            offset: Some(-1),
        };
        assert!(negative_offset.validate().is_err());
    }
}
