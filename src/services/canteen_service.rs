use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::canteens::{AddStaffRequest, CanteenDetail, CanteenList, RegisterCanteenRequest, UpdateCanteenRequest},
    entity::{
        canteen_members::{
            ActiveModel as MemberActive, Column as MemberCol, Entity as CanteenMembers,
        },
        canteens::{ActiveModel as CanteenActive, Column as CanteenCol, Entity as Canteens},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::{Canteen, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn register_canteen(
    state: &AppState,
    user: &AuthUser,
    payload: RegisterCanteenRequest,
) -> AppResult<ApiResponse<Canteen>> {
    ensure_owner(user)?;
    let RegisterCanteenRequest {
        name,
        location,
        owner_ids,
    } = payload;

    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Canteen name is required".into()));
    }
    if location.trim().is_empty() {
        return Err(AppError::BadRequest("Canteen location is required".into()));
    }
    if owner_ids.is_empty() {
        return Err(AppError::BadRequest("At least one owner is required".into()));
    }

    let owners = Users::find()
        .filter(UserCol::Id.is_in(owner_ids.clone()))
        .all(&state.orm)
        .await?;
    if owners.len() != owner_ids.len() {
        return Err(AppError::BadRequest("Some owners do not exist".into()));
    }
    if owners.iter().any(|u| u.role != "owner") {
        return Err(AppError::BadRequest(
            "All owners must have the owner role".into(),
        ));
    }

    let existing = Canteens::find()
        .filter(CanteenCol::Name.eq(name.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("Canteen already registered".into()));
    }

    let txn = state.orm.begin().await?;

    let canteen = CanteenActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        location: Set(location),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for owner in &owners {
        MemberActive {
            id: Set(Uuid::new_v4()),
            canteen_id: Set(canteen.id),
            user_id: Set(owner.id),
            member_role: Set("owner".into()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "canteen_register",
        Some("canteens"),
        Some(serde_json::json!({ "canteen_id": canteen.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Canteen registered",
        Canteen::from(canteen),
        Some(Meta::empty()),
    ))
}

pub async fn list_canteens_for_user(
    state: &AppState,
    user_id: Uuid,
) -> AppResult<ApiResponse<CanteenList>> {
    let user = Users::find_by_id(user_id).one(&state.orm).await?;
    if user.is_none() {
        return Err(AppError::NotFound);
    }

    let canteens = CanteenMembers::find()
        .filter(MemberCol::UserId.eq(user_id))
        .find_also_related(Canteens)
        .all(&state.orm)
        .await?
        .into_iter()
        .filter_map(|(_, canteen)| canteen.map(Canteen::from))
        .collect();

    Ok(ApiResponse::success(
        "Canteens",
        CanteenList { items: canteens },
        None,
    ))
}

pub async fn get_canteen(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CanteenDetail>> {
    let canteen = Canteens::find_by_id(id).one(&state.orm).await?;
    let canteen = match canteen {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let detail = canteen_detail(state, canteen).await?;
    Ok(ApiResponse::success("Canteen", detail, None))
}

pub async fn update_canteen(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCanteenRequest,
) -> AppResult<ApiResponse<CanteenDetail>> {
    ensure_owner(user)?;
    let existing = Canteens::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let current_name = existing.name.clone();
    let mut active: CanteenActive = existing.into();
    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        if name != current_name {
            let taken = Canteens::find()
                .filter(CanteenCol::Name.eq(name.as_str()))
                .one(&state.orm)
                .await?;
            if taken.is_some() {
                return Err(AppError::BadRequest("Canteen name already in use".into()));
            }
        }
        active.name = Set(name);
    }
    if let Some(location) = payload.location.filter(|l| !l.trim().is_empty()) {
        active.location = Set(location);
    }
    let canteen = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "canteen_update",
        Some("canteens"),
        Some(serde_json::json!({ "canteen_id": canteen.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = canteen_detail(state, canteen).await?;
    Ok(ApiResponse::success(
        "Canteen updated",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn add_staff(
    state: &AppState,
    user: &AuthUser,
    canteen_id: Uuid,
    payload: AddStaffRequest,
) -> AppResult<ApiResponse<CanteenDetail>> {
    ensure_owner(user)?;
    if payload.staff_ids.is_empty() {
        return Err(AppError::BadRequest("Staff IDs are required".into()));
    }

    let canteen = Canteens::find_by_id(canteen_id).one(&state.orm).await?;
    let canteen = match canteen {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let staff_users = Users::find()
        .filter(UserCol::Id.is_in(payload.staff_ids.clone()))
        .all(&state.orm)
        .await?;
    if staff_users.len() != payload.staff_ids.len() {
        return Err(AppError::BadRequest("Some staff users do not exist".into()));
    }

    let existing_ids: Vec<Uuid> = CanteenMembers::find()
        .filter(
            Condition::all()
                .add(MemberCol::CanteenId.eq(canteen_id))
                .add(MemberCol::UserId.is_in(payload.staff_ids.clone())),
        )
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();

    let txn = state.orm.begin().await?;
    for staff_id in payload
        .staff_ids
        .iter()
        .filter(|id| !existing_ids.contains(id))
    {
        MemberActive {
            id: Set(Uuid::new_v4()),
            canteen_id: Set(canteen_id),
            user_id: Set(*staff_id),
            member_role: Set("staff".into()),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "canteen_staff_add",
        Some("canteens"),
        Some(serde_json::json!({ "canteen_id": canteen_id, "staff_ids": payload.staff_ids })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = canteen_detail(state, canteen).await?;
    Ok(ApiResponse::success(
        "Staff added to canteen",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn remove_staff(
    state: &AppState,
    user: &AuthUser,
    canteen_id: Uuid,
    staff_id: Uuid,
) -> AppResult<ApiResponse<CanteenDetail>> {
    ensure_owner(user)?;
    let canteen = Canteens::find_by_id(canteen_id).one(&state.orm).await?;
    let canteen = match canteen {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let member = CanteenMembers::find()
        .filter(
            Condition::all()
                .add(MemberCol::CanteenId.eq(canteen_id))
                .add(MemberCol::UserId.eq(staff_id))
                .add(MemberCol::MemberRole.eq("staff")),
        )
        .one(&state.orm)
        .await?;
    let member = match member {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    member.delete(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "canteen_staff_remove",
        Some("canteens"),
        Some(serde_json::json!({ "canteen_id": canteen_id, "staff_id": staff_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let detail = canteen_detail(state, canteen).await?;
    Ok(ApiResponse::success(
        "Staff removed from canteen",
        detail,
        Some(Meta::empty()),
    ))
}

async fn canteen_detail(
    state: &AppState,
    canteen: crate::entity::canteens::Model,
) -> AppResult<CanteenDetail> {
    let members = CanteenMembers::find()
        .filter(MemberCol::CanteenId.eq(canteen.id))
        .find_also_related(Users)
        .order_by_asc(MemberCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut owners: Vec<User> = Vec::new();
    let mut staff: Vec<User> = Vec::new();
    for (member, member_user) in members {
        let Some(member_user) = member_user else {
            continue;
        };
        if member.member_role == "owner" {
            owners.push(User::from(member_user));
        } else {
            staff.push(User::from(member_user));
        }
    }

    Ok(CanteenDetail {
        canteen: Canteen::from(canteen),
        owners,
        staff,
    })
}
