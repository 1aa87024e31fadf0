use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Query structs carry `page`/`per_page` as direct fields because
// serde_urlencoded cannot deserialize numbers through #[serde(flatten)].
#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Most list endpoints are scoped to one canteen, the tenancy boundary.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CanteenScope {
    pub canteen_id: Uuid,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl CanteenScope {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub canteen_id: Option<Uuid>,
    pub day: Option<String>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
}

impl MenuQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PopularItemsQuery {
    pub canteen_id: Uuid,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SupplierQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub canteen_id: Uuid,
    pub is_active: Option<bool>,
}

impl SupplierQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub canteen_id: Option<Uuid>,
    pub status: Option<String>,
    pub order_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatisticsQuery {
    pub canteen_id: Uuid,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::*;

    #[test]
    fn order_list_query_parses_page_params() {
        let uri: Uri = "/orders?page=2&per_page=10&status=pending".parse().unwrap();
        let Query(query) = Query::<OrderListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.pagination().normalize(), (2, 10, 10));
        assert_eq!(query.status.as_deref(), Some("pending"));
    }

    #[test]
    fn canteen_scope_parses_page_params() {
        let uri: Uri =
            "/inventory?canteen_id=00000000-0000-0000-0000-000000000000&page=3&per_page=5"
                .parse()
                .unwrap();
        let Query(query) = Query::<CanteenScope>::try_from_uri(&uri).unwrap();
        assert_eq!(query.pagination().normalize(), (3, 5, 10));
    }

    #[test]
    fn pagination_defaults_when_absent() {
        let uri: Uri = "/menu?category=lunch".parse().unwrap();
        let Query(query) = Query::<MenuQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.pagination().normalize(), (1, 20, 0));
    }
}
