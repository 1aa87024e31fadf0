use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        CreateOrderRequest, OrderList, OrderStatistics, OrderWithItems, UpdateOrderRequest,
        UpdateOrderStatusRequest,
    },
    entity::{
        canteens::Entity as Canteens,
        discounts::ActiveModel as DiscountActive,
        menu_items::{ActiveModel as MenuItemActive, Entity as MenuItems},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder, StatisticsQuery},
    services::discount_service,
    state::AppState,
};

pub const ORDER_STATUSES: [&str; 6] = [
    "pending",
    "confirmed",
    "preparing",
    "ready",
    "completed",
    "cancelled",
];
pub const ORDER_TYPES: [&str; 3] = ["dine-in", "takeaway", "delivery"];
pub const PAYMENT_METHODS: [&str; 5] = ["cash", "card", "upi", "netbanking", "wallet"];
pub const PAYMENT_STATUSES: [&str; 4] = ["pending", "completed", "failed", "refunded"];

/// Linear kitchen progression; cancellation is allowed from any state that
/// has not reached a terminal one.
pub fn status_transition_allowed(from: &str, to: &str) -> bool {
    match (from, to) {
        ("pending", "confirmed")
        | ("confirmed", "preparing")
        | ("preparing", "ready")
        | ("ready", "completed") => true,
        (from, "cancelled") => !matches!(from, "completed" | "cancelled"),
        _ => false,
    }
}

/// `ORD` + yyyymmdd + zero-padded daily sequence, e.g. `ORD202608300007`.
pub fn build_order_number(date: NaiveDate, seq: i64) -> String {
    format!("ORD{}{:04}", date.format("%Y%m%d"), seq)
}

pub fn order_total(subtotal: i64, tax: i64, discount_amount: i64) -> i64 {
    subtotal + tax - discount_amount
}

fn validate_order_status(status: &str) -> Result<(), AppError> {
    if ORDER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid order status".into()))
    }
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(canteen_id) = query.canteen_id {
        condition = condition.add(OrderCol::CanteenId.eq(canteen_id));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }
    if let Some(order_type) = query.order_type.as_ref().filter(|t| !t.is_empty()) {
        condition = condition.add(OrderCol::OrderType.eq(order_type.clone()));
    }
    if let Some(start_date) = query.start_date {
        condition = condition.add(OrderCol::CreatedAt.gte(start_date));
    }
    if let Some(end_date) = query.end_date {
        condition = condition.add(OrderCol::CreatedAt.lte(end_date));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Order",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Create an order: snapshot menu item prices, bump popularity, apply the
/// discount, and generate the daily order number — all inside one
/// transaction holding the canteen row lock, so a concurrent create against
/// the same canteen cannot produce a duplicate number or a partial write.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order must contain items".into()));
    }
    if !ORDER_TYPES.contains(&payload.order_type.as_str()) {
        return Err(AppError::BadRequest("Invalid order type".into()));
    }
    if !PAYMENT_METHODS.contains(&payload.payment_method.as_str()) {
        return Err(AppError::BadRequest("Invalid payment method".into()));
    }
    let tax = payload.tax.unwrap_or(0);
    if tax < 0 {
        return Err(AppError::BadRequest("Tax must not be negative".into()));
    }

    let txn = state.orm.begin().await?;

    // Serializes order creation per canteen; the daily sequence below is
    // computed under this lock.
    let canteen = Canteens::find_by_id(payload.canteen_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let canteen = match canteen {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let mut subtotal: i64 = 0;
    let mut lines: Vec<OrderItemActive> = Vec::with_capacity(payload.items.len());
    let order_id = Uuid::new_v4();

    for line in &payload.items {
        if line.quantity < 1 {
            return Err(AppError::BadRequest("Quantity must be at least 1".into()));
        }

        let menu_item = MenuItems::find_by_id(line.menu_item_id).one(&txn).await?;
        let menu_item = match menu_item {
            Some(m) if m.canteen_id == canteen.id => m,
            _ => {
                return Err(AppError::BadRequest(format!(
                    "Menu item {} not found",
                    line.menu_item_id
                )));
            }
        };
        if !menu_item.is_available {
            return Err(AppError::BadRequest(format!(
                "{} is not available",
                menu_item.name
            )));
        }

        let line_total = menu_item.price * i64::from(line.quantity);
        subtotal += line_total;

        lines.push(OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            menu_item_id: Set(menu_item.id),
            item_name: Set(menu_item.name.clone()),
            quantity: Set(line.quantity),
            price: Set(menu_item.price),
            line_total: Set(line_total),
            special_instructions: Set(line.special_instructions.clone()),
            created_at: NotSet,
        });

        let score = menu_item.popularity_score + 1;
        let mut active: MenuItemActive = menu_item.into();
        active.popularity_score = Set(score);
        active.update(&txn).await?;
    }

    let mut discount_id = None;
    let mut discount_amount = 0;
    if let Some(code) = payload.discount_code.as_ref().filter(|c| !c.is_empty()) {
        let discount = discount_service::find_active_code(&txn, code, canteen.id).await?;
        let discount = match discount {
            Some(d) => d,
            None => return Err(AppError::BadRequest("Invalid discount code".into())),
        };

        discount_amount = discount_service::evaluate(&discount, subtotal, Utc::now())?;
        discount_id = Some(discount.id);

        let usage_count = discount.usage_count + 1;
        let mut active: DiscountActive = discount.into();
        active.usage_count = Set(usage_count);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;
    }

    let now = Utc::now();
    let start_of_day = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let todays_orders = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CanteenId.eq(canteen.id))
                .add(OrderCol::CreatedAt.gte(start_of_day))
                .add(OrderCol::CreatedAt.lt(start_of_day + Duration::days(1))),
        )
        .count(&txn)
        .await? as i64;
    let order_number = build_order_number(now.date_naive(), todays_orders + 1);

    let order = OrderActive {
        id: Set(order_id),
        canteen_id: Set(canteen.id),
        order_number: Set(order_number),
        customer_name: Set(payload.customer_name),
        customer_phone: Set(payload.customer_phone),
        order_type: Set(payload.order_type),
        table_number: Set(payload.table_number),
        subtotal: Set(subtotal),
        tax: Set(tax),
        discount_id: Set(discount_id),
        discount_amount: Set(discount_amount),
        total_amount: Set(order_total(subtotal, tax, discount_amount)),
        payment_method: Set(payload.payment_method),
        payment_status: Set("pending".into()),
        status: Set("pending".into()),
        estimated_preparation_time: Set(payload.estimated_preparation_time),
        actual_preparation_time: Set(None),
        notes: Set(payload.notes),
        processed_by: Set(Some(user.user_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for line in lines {
        let item = line.insert(&txn).await?;
        order_items.push(OrderItem::from(item));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "order_number": order.order_number,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order: Order::from(order),
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if let Some(payment_status) = payload.payment_status.as_deref() {
        if !PAYMENT_STATUSES.contains(&payment_status) {
            return Err(AppError::BadRequest("Invalid payment status".into()));
        }
    }

    let mut active: OrderActive = existing.into();
    if let Some(customer_name) = payload.customer_name {
        active.customer_name = Set(Some(customer_name));
    }
    if let Some(customer_phone) = payload.customer_phone {
        active.customer_phone = Set(Some(customer_phone));
    }
    if let Some(table_number) = payload.table_number {
        active.table_number = Set(Some(table_number));
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    if let Some(estimated) = payload.estimated_preparation_time {
        active.estimated_preparation_time = Set(Some(estimated));
    }
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status);
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    validate_order_status(&payload.status)?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if !status_transition_allowed(&existing.status, &payload.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot move order from {} to {}",
            existing.status, payload.status
        )));
    }

    let now = Utc::now();
    let created_at = existing.created_at.with_timezone(&Utc);
    let mut active: OrderActive = existing.into();
    if payload.status == "completed" {
        let minutes = (now - created_at).num_minutes();
        active.actual_preparation_time = Set(Some(minutes as i32));
    }
    active.status = Set(payload.status);
    active.updated_at = Set(now.into());
    let order = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order status updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}

pub async fn order_statistics(
    state: &AppState,
    query: StatisticsQuery,
) -> AppResult<ApiResponse<OrderStatistics>> {
    let mut condition = Condition::all().add(OrderCol::CanteenId.eq(query.canteen_id));
    if let Some(start_date) = query.start_date {
        condition = condition.add(OrderCol::CreatedAt.gte(start_date));
    }
    if let Some(end_date) = query.end_date {
        condition = condition.add(OrderCol::CreatedAt.lte(end_date));
    }

    let orders = Orders::find().filter(condition).all(&state.orm).await?;

    let total_orders = orders.len() as i64;
    let total_revenue: i64 = orders.iter().map(|o| o.total_amount).sum();
    let average_order_value = if total_orders > 0 {
        total_revenue / total_orders
    } else {
        0
    };

    let mut orders_by_status: HashMap<String, i64> = HashMap::new();
    let mut orders_by_type: HashMap<String, i64> = HashMap::new();
    let mut orders_by_payment_method: HashMap<String, i64> = HashMap::new();
    for order in &orders {
        *orders_by_status.entry(order.status.clone()).or_insert(0) += 1;
        *orders_by_type.entry(order.order_type.clone()).or_insert(0) += 1;
        *orders_by_payment_method
            .entry(order.payment_method.clone())
            .or_insert(0) += 1;
    }

    let stats = OrderStatistics {
        total_orders,
        total_revenue,
        average_order_value,
        orders_by_status,
        orders_by_type,
        orders_by_payment_method,
    };

    Ok(ApiResponse::success("Order statistics", stats, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).expect("valid date");
        assert_eq!(build_order_number(date, 1), "ORD202608300001");
        assert_eq!(build_order_number(date, 42), "ORD202608300042");
        assert_eq!(build_order_number(date, 12345), "ORD2026083012345");
    }

    #[test]
    fn totals_follow_subtotal_plus_tax_minus_discount() {
        // Two lines: 40 x 2 and 80 x 1, tax 6, no discount.
        let subtotal = 40 * 2 + 80;
        assert_eq!(subtotal, 160);
        assert_eq!(order_total(subtotal, 6, 0), 166);
        assert_eq!(order_total(subtotal, 6, 50), 116);
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(status_transition_allowed("pending", "confirmed"));
        assert!(status_transition_allowed("confirmed", "preparing"));
        assert!(status_transition_allowed("preparing", "ready"));
        assert!(status_transition_allowed("ready", "completed"));
    }

    #[test]
    fn skipping_states_is_rejected() {
        assert!(!status_transition_allowed("pending", "preparing"));
        assert!(!status_transition_allowed("pending", "completed"));
        assert!(!status_transition_allowed("confirmed", "ready"));
        assert!(!status_transition_allowed("ready", "pending"));
    }

    #[test]
    fn cancellation_only_before_terminal_states() {
        assert!(status_transition_allowed("pending", "cancelled"));
        assert!(status_transition_allowed("preparing", "cancelled"));
        assert!(status_transition_allowed("ready", "cancelled"));
        assert!(!status_transition_allowed("completed", "cancelled"));
        assert!(!status_transition_allowed("cancelled", "cancelled"));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for to in ORDER_STATUSES {
            assert!(!status_transition_allowed("completed", to));
            assert!(!status_transition_allowed("cancelled", to));
        }
    }
}
