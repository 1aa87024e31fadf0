use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::suppliers::{CreateSupplierRequest, SupplierList, UpdateSupplierRequest},
    entity::suppliers::{ActiveModel, Column, Entity as Suppliers},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Supplier,
    response::{ApiResponse, Meta},
    routes::params::SupplierQuery,
    state::AppState,
};

fn validate_rating(rating: i32) -> Result<(), AppError> {
    if (0..=5).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Rating must be between 0 and 5".into()))
    }
}

pub async fn list_suppliers(
    state: &AppState,
    query: SupplierQuery,
) -> AppResult<ApiResponse<SupplierList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(Column::CanteenId.eq(query.canteen_id));
    if let Some(is_active) = query.is_active {
        condition = condition.add(Column::IsActive.eq(is_active));
    }

    let finder = Suppliers::find()
        .filter(condition)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Supplier::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Suppliers",
        SupplierList { items },
        Some(meta),
    ))
}

pub async fn get_supplier(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Supplier>> {
    let supplier = Suppliers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Supplier::from);
    let supplier = match supplier {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Supplier", supplier, None))
}

pub async fn create_supplier(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    let rating = payload.rating.unwrap_or(0);
    validate_rating(rating)?;

    let supplier = ActiveModel {
        id: Set(Uuid::new_v4()),
        canteen_id: Set(payload.canteen_id),
        name: Set(payload.name),
        contact_person: Set(payload.contact_person),
        email: Set(payload.email.to_lowercase()),
        phone: Set(payload.phone),
        address_street: Set(payload.address_street),
        address_city: Set(payload.address_city),
        address_state: Set(payload.address_state),
        address_pincode: Set(payload.address_pincode),
        gst_number: Set(payload.gst_number.map(|g| g.to_uppercase())),
        rating: Set(rating),
        is_active: Set(true),
        notes: Set(payload.notes),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "supplier_create",
        Some("suppliers"),
        Some(serde_json::json!({ "supplier_id": supplier.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Supplier created",
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}

pub async fn update_supplier(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    let existing = Suppliers::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(contact_person) = payload.contact_person {
        active.contact_person = Set(contact_person);
    }
    if let Some(email) = payload.email {
        active.email = Set(email.to_lowercase());
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(street) = payload.address_street {
        active.address_street = Set(street);
    }
    if let Some(city) = payload.address_city {
        active.address_city = Set(city);
    }
    if let Some(st) = payload.address_state {
        active.address_state = Set(st);
    }
    if let Some(pincode) = payload.address_pincode {
        active.address_pincode = Set(pincode);
    }
    if let Some(gst_number) = payload.gst_number {
        active.gst_number = Set(Some(gst_number.to_uppercase()));
    }
    if let Some(rating) = payload.rating {
        active.rating = Set(rating);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    let supplier = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "supplier_update",
        Some("suppliers"),
        Some(serde_json::json!({ "supplier_id": supplier.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Supplier updated",
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}

pub async fn delete_supplier(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Suppliers::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "supplier_delete",
        Some("suppliers"),
        Some(serde_json::json!({ "supplier_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Supplier deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn toggle_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Supplier>> {
    let existing = Suppliers::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let activated = !existing.is_active;
    let mut active: ActiveModel = existing.into();
    active.is_active = Set(activated);
    let supplier = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "supplier_toggle",
        Some("suppliers"),
        Some(serde_json::json!({ "supplier_id": supplier.id, "is_active": activated })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if activated {
        "Supplier activated"
    } else {
        "Supplier deactivated"
    };
    Ok(ApiResponse::success(
        message,
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}
